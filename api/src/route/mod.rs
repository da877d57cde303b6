pub mod availability;
pub mod health;
pub mod page;
pub mod reservation;

use axum::Router;
use registry::AppRegistry;

use self::{
    availability::build_availability_routers, health::build_health_check_routers,
    page::build_page_routers, reservation::build_reservation_routers,
};

pub fn routes() -> Router<AppRegistry> {
    Router::new()
        .merge(build_health_check_routers())
        .merge(build_page_routers())
        .merge(build_availability_routers())
        .merge(build_reservation_routers())
}
