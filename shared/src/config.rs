use std::path::PathBuf;

use anyhow::Result;

use crate::env::{which, Environment};

pub struct AppConfig {
    pub database: DatabaseConfig,
    pub template: TemplateConfig,
    pub session: SessionConfig,
    pub static_dir: PathBuf,
}

impl AppConfig {
    pub fn new() -> Result<Self> {
        let environment = which();
        let database = DatabaseConfig {
            host: std::env::var("DATABASE_HOST")?,
            port: std::env::var("DATABASE_PORT")?.parse()?,
            username: std::env::var("DATABASE_USERNAME")?,
            password: std::env::var("DATABASE_PASSWORD")?,
            database: std::env::var("DATABASE_NAME")?,
        };
        // 本番環境ではテンプレートキャッシュを既定で有効にする
        let template = TemplateConfig {
            dir: var_or("TEMPLATE_DIR", "templates").into(),
            use_cache: match std::env::var("TEMPLATE_USE_CACHE") {
                Ok(v) => v.parse()?,
                Err(_) => environment == Environment::Production,
            },
        };
        let session = SessionConfig {
            lifetime_hours: var_or("SESSION_LIFETIME_HOURS", "24").parse()?,
            secure: environment == Environment::Production,
        };
        Ok(Self {
            database,
            template,
            session,
            static_dir: var_or("STATIC_DIR", "static").into(),
        })
    }
}

fn var_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
}

pub struct TemplateConfig {
    pub dir: PathBuf,
    pub use_cache: bool,
}

pub struct SessionConfig {
    pub lifetime_hours: i64,
    pub secure: bool,
}
