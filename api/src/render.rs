use std::{collections::HashMap, io::Write};

use adapter::template::TemplateStore;
use axum::response::Html;
use minijinja::Value;
use serde::Serialize;
use shared::error::{AppError, AppResult};

use crate::{
    extractor::{AppSession, MessageKind},
    form::Form,
};

// テンプレートに渡す値。csrf_token 以降はレンダリング時に自動で埋められる
#[derive(Default, Serialize)]
pub struct TemplateData {
    pub string_map: HashMap<String, String>,
    pub data: HashMap<String, Value>,
    pub form: Option<Form>,
    pub csrf_token: String,
    pub flash: String,
    pub error: String,
    pub warning: String,
}

impl TemplateData {
    pub fn with_string(mut self, key: &str, value: impl Into<String>) -> Self {
        self.string_map.insert(key.into(), value.into());
        self
    }

    pub fn with_data<T: Serialize>(mut self, key: &str, value: &T) -> Self {
        self.data.insert(key.into(), Value::from_serialize(value));
        self
    }

    pub fn with_form(mut self, form: Form) -> Self {
        self.form = Some(form);
        self
    }
}

pub async fn add_default_data(
    mut td: TemplateData,
    session: &AppSession,
) -> AppResult<TemplateData> {
    td.csrf_token = session.csrf_token().await?;
    td.flash = session
        .pop_message(MessageKind::Flash)
        .await?
        .unwrap_or_default();
    td.error = session
        .pop_message(MessageKind::Error)
        .await?
        .unwrap_or_default();
    td.warning = session
        .pop_message(MessageKind::Warning)
        .await?
        .unwrap_or_default();
    Ok(td)
}

// 中間バッファに描画し切ってから sink に書き出す。
// 途中で失敗した場合、sink には何も書き込まれない
pub async fn render<W: Write>(
    sink: &mut W,
    session: &AppSession,
    store: &TemplateStore,
    name: &str,
    td: TemplateData,
) -> AppResult<()> {
    let unit = store.get(name, store.use_cache())?;
    let td = add_default_data(td, session).await?;
    let buf = unit.execute(&td)?;
    sink.write_all(buf.as_bytes())
        .and_then(|_| sink.flush())
        .map_err(AppError::WriteFailure)
}

pub async fn render_page(
    session: &AppSession,
    store: &TemplateStore,
    name: &str,
    td: TemplateData,
) -> AppResult<Html<String>> {
    let mut out = Vec::new();
    render(&mut out, session, store, name, td).await?;
    String::from_utf8(out)
        .map(Html)
        .map_err(|e| AppError::WriteFailure(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}
