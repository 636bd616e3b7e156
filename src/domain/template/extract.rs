//! Variable name extraction for editors and input forms.

use std::collections::HashSet;

use super::syntax::STRICT_PLACEHOLDER;

/// List the distinct `{{name}}` placeholders in `content`, in first-seen order.
///
/// Only tight placeholders (`{{name}}`, word characters, no inner spaces) are
/// reported. Names are not checked against the identifier rules.
pub fn extract_variables(content: &str) -> Vec<String> {
    let mut seen = HashSet::new();

    STRICT_PLACEHOLDER
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|name| seen.insert(*name))
        .map(str::to_string)
        .collect()
}
