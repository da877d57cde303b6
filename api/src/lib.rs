pub mod extractor;
pub mod form;
pub mod handler;
pub mod model;
pub mod render;
pub mod route;
