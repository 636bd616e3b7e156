//! Rewrites surface placeholders into the engine's internal action syntax.
//!
//! Every `{{ token }}` becomes one of two actions:
//! - `{{.token}}` when the token is an identifier (read a bound variable)
//! - `{{"token"}}` otherwise (emit the token verbatim as a quoted literal)
//!
//! Text outside placeholders is left untouched.

use regex::Captures;

use super::syntax::{is_identifier, PLACEHOLDER};

/// Translate raw template text into the internal action syntax.
pub fn normalize(content: &str) -> String {
    PLACEHOLDER
        .replace_all(content, |caps: &Captures<'_>| {
            let token = caps[1].trim();
            if is_identifier(token) {
                format!("{{{{.{}}}}}", token)
            } else {
                format!("{{{{{}}}}}", quote_literal(token))
            }
        })
        .into_owned()
}

/// Quote a literal payload so it survives parsing unchanged.
///
/// Uses the `Debug` form of `str`: wrapped in double quotes with `"`, `\` and
/// control characters escaped. The parser understands exactly these escapes.
fn quote_literal(token: &str) -> String {
    format!("{:?}", token)
}
