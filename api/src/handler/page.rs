use axum::{extract::State, response::Html};
use registry::AppRegistry;
use shared::error::AppResult;

use crate::{
    extractor::AppSession,
    render::{render_page, TemplateData},
};

pub async fn home(
    session: AppSession,
    State(registry): State<AppRegistry>,
) -> AppResult<Html<String>> {
    render_page(
        &session,
        &registry.template_store(),
        "home.page.html",
        TemplateData::default(),
    )
    .await
}

pub async fn about(
    session: AppSession,
    State(registry): State<AppRegistry>,
) -> AppResult<Html<String>> {
    let td = TemplateData::default().with_string("test", "Hello Again!");
    render_page(&session, &registry.template_store(), "about.page.html", td).await
}

pub async fn contact(
    session: AppSession,
    State(registry): State<AppRegistry>,
) -> AppResult<Html<String>> {
    render_page(
        &session,
        &registry.template_store(),
        "contact.page.html",
        TemplateData::default(),
    )
    .await
}

pub async fn generals_quarters(
    session: AppSession,
    State(registry): State<AppRegistry>,
) -> AppResult<Html<String>> {
    render_page(
        &session,
        &registry.template_store(),
        "generals-quarters.page.html",
        TemplateData::default(),
    )
    .await
}

pub async fn majors_suite(
    session: AppSession,
    State(registry): State<AppRegistry>,
) -> AppResult<Html<String>> {
    render_page(
        &session,
        &registry.template_store(),
        "majors-suite.page.html",
        TemplateData::default(),
    )
    .await
}
