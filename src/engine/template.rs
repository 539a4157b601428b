//! Templating collaborator used by the `html` interpreter

use serde_json::Value;
use tera::{Context, Tera};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template rendering failed: {0}")]
    Render(#[from] tera::Error),
}

/// Renders a template string against bindings
pub trait TemplateEngine: Send + Sync {
    fn render(&self, template: &str, bindings: &Value) -> Result<String, TemplateError>;
}

/// Tera-backed engine. Bindings are exposed to the template as `data`,
/// so `{"content": "x"}` is read with `{{ data.content }}`.
///
/// Autoescaping is off: bound content is already rendered markup.
#[derive(Debug, Clone, Copy, Default)]
pub struct TeraEngine;

impl TemplateEngine for TeraEngine {
    fn render(&self, template: &str, bindings: &Value) -> Result<String, TemplateError> {
        let mut ctx = Context::new();
        ctx.insert("data", bindings);
        Ok(Tera::one_off(template, &ctx, false)?)
    }
}
