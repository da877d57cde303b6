use axum::{routing::get, Router};
use registry::AppRegistry;

use crate::handler::page::{about, contact, generals_quarters, home, majors_suite};

pub fn build_page_routers() -> Router<AppRegistry> {
    Router::new()
        .route("/", get(home))
        .route("/about", get(about))
        .route("/contact", get(contact))
        .route("/generals-quarters", get(generals_quarters))
        .route("/majors-suite", get(majors_suite))
}
