use axum::{routing::get, Router};
use registry::AppRegistry;

use crate::handler::availability::{
    availability_json, post_search_availability, show_search_availability,
};

pub fn build_availability_routers() -> Router<AppRegistry> {
    Router::new()
        .route(
            "/search-availability",
            get(show_search_availability).post(post_search_availability),
        )
        .route("/search-availability-json", get(availability_json))
}
