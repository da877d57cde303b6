use axum::{routing::get, Router};
use registry::AppRegistry;

use crate::handler::reservation::{
    choose_room, post_make_reservation, reservation_summary, show_make_reservation,
};

pub fn build_reservation_routers() -> Router<AppRegistry> {
    Router::new()
        .route("/choose-room/:room_id", get(choose_room))
        .route(
            "/make-reservation",
            get(show_make_reservation).post(post_make_reservation),
        )
        .route("/reservation-summary", get(reservation_summary))
}
