use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use minijinja::{Environment, UndefinedBehavior};
use serde::Serialize;
use shared::error::{AppError, AppResult};

pub const PAGE_SUFFIX: &str = ".page.html";
pub const LAYOUT_SUFFIX: &str = ".layout.html";

// ページ 1 枚と共通レイアウトをまとめてコンパイルした、繰り返し実行可能なテンプレート
pub struct RenderUnit {
    name: String,
    env: Environment<'static>,
}

impl RenderUnit {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn execute<S: Serialize>(&self, ctx: S) -> AppResult<String> {
        self.env
            .get_template(&self.name)
            .and_then(|tmpl| tmpl.render(ctx))
            .map_err(AppError::TemplateExecution)
    }
}

pub type TemplateSet = HashMap<String, Arc<RenderUnit>>;

/// Compiles every `*.page.html` in `dir` together with all `*.layout.html`
/// files of the same directory, keyed by the page's file name.
pub fn build_all(dir: &Path) -> AppResult<TemplateSet> {
    let mut pages = Vec::new();
    let mut layouts = Vec::new();

    for entry in fs::read_dir(dir).map_err(AppError::TemplateIo)? {
        let path = entry.map_err(AppError::TemplateIo)?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.ends_with(PAGE_SUFFIX) {
            pages.push((name.to_string(), path.clone()));
        } else if name.ends_with(LAYOUT_SUFFIX) {
            let source = fs::read_to_string(&path).map_err(AppError::TemplateIo)?;
            layouts.push((name.to_string(), source));
        }
    }

    let mut set = TemplateSet::with_capacity(pages.len());
    for (name, path) in pages {
        let source = fs::read_to_string(&path).map_err(AppError::TemplateIo)?;

        let mut env = Environment::new();
        // 未設定の値の属性参照はエラーにせず空として扱う
        env.set_undefined_behavior(UndefinedBehavior::Chainable);
        for (layout_name, layout_source) in &layouts {
            env.add_template_owned(layout_name.clone(), layout_source.clone())
                .map_err(AppError::TemplateParse)?;
        }
        env.add_template_owned(name.clone(), source)
            .map_err(AppError::TemplateParse)?;

        set.insert(name.clone(), Arc::new(RenderUnit { name, env }));
    }

    Ok(set)
}

pub struct TemplateStore {
    dir: PathBuf,
    use_cache: bool,
    cache: TemplateSet,
}

impl TemplateStore {
    // 起動時に一度だけテンプレート一式をコンパイルし、キャッシュとして保持する
    pub fn new(dir: impl Into<PathBuf>, use_cache: bool) -> AppResult<Self> {
        let dir = dir.into();
        let cache = build_all(&dir)?;
        tracing::info!(
            templates.dir = %dir.display(),
            templates.count = cache.len(),
            templates.use_cache = use_cache,
            "template set compiled"
        );
        Ok(Self {
            dir,
            use_cache,
            cache,
        })
    }

    pub fn use_cache(&self) -> bool {
        self.use_cache
    }

    // use_cache が false の場合はディレクトリ全体を毎回コンパイルし直す
    pub fn get(&self, name: &str, use_cache: bool) -> AppResult<Arc<RenderUnit>> {
        let unit = if use_cache {
            self.cache.get(name).cloned()
        } else {
            build_all(&self.dir)?.remove(name)
        };
        unit.ok_or_else(|| AppError::TemplateNotFound(name.into()))
    }
}
