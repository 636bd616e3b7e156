//! Template rendering: balance check, normalize, parse, execute.

use std::fmt;
use std::sync::Arc;

use super::extract::extract_variables;
use super::limits::TemplateLimits;
use super::normalize::normalize;
use super::program::{Bindings, Program};
use super::syntax::{CLOSE_DELIM, OPEN_DELIM};
use super::types::{TemplateError, TemplateResult};

/// Stateless template engine. Cheap to clone and safe to share across tasks.
#[derive(Debug, Clone, Default)]
pub struct TemplateEngine {
    limits: Arc<TemplateLimits>,
}

impl TemplateEngine {
    pub fn new(limits: Arc<TemplateLimits>) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &TemplateLimits {
        &self.limits
    }

    /// Compile template text into an executable program.
    pub fn compile(&self, content: &str) -> TemplateResult<Program> {
        check_balance(content)?;
        Program::parse(&normalize(content))
    }

    /// Render template text against a binding set.
    ///
    /// Unbound identifiers render as the empty string.
    pub fn render<B>(&self, content: &str, bindings: &B) -> TemplateResult<String>
    where
        B: Bindings + ?Sized,
    {
        let mut out = String::with_capacity(content.len());
        self.render_to(content, bindings, &mut out)?;
        Ok(out)
    }

    /// Render into an arbitrary sink. Sink failures surface as `RenderFailed`.
    pub fn render_to<B, W>(&self, content: &str, bindings: &B, out: &mut W) -> TemplateResult<()>
    where
        B: Bindings + ?Sized,
        W: fmt::Write,
    {
        let program = self.compile(content)?;

        if tracing::enabled!(tracing::Level::DEBUG) {
            let unbound: Vec<&str> = program
                .field_names()
                .filter(|name| bindings.lookup(name).is_none())
                .collect();
            if !unbound.is_empty() {
                tracing::debug!(unbound = ?unbound, "Rendering with unbound variables");
            }
        }

        program.execute(bindings, out)
    }

    pub fn extract(&self, content: &str) -> Vec<String> {
        extract_variables(content)
    }
}

/// Reject text whose `{{` and `}}` counts differ.
pub fn check_balance(content: &str) -> TemplateResult<()> {
    let opens = content.matches(OPEN_DELIM).count();
    let closes = content.matches(CLOSE_DELIM).count();
    if opens != closes {
        return Err(TemplateError::MalformedTemplate(format!(
            "unbalanced placeholder delimiters ({} '{{{{' vs {} '}}}}')",
            opens, closes
        )));
    }
    Ok(())
}
