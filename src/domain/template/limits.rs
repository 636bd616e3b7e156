//! Size and naming limits for templates and variables.
//!
//! `TemplateLimits` is loaded once from configuration and shared immutably
//! by the engine, the service and the HTTP handlers.

use std::collections::HashMap;

use serde::Deserialize;

use super::syntax::is_identifier;
use super::types::{TemplateError, TemplateResult, TemplateVariable};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TemplateLimits {
    #[serde(default = "default_max_name_len")]
    pub max_name_len: usize,
    #[serde(default = "default_max_description_len")]
    pub max_description_len: usize,
    #[serde(default = "default_max_content_len")]
    pub max_content_len: usize,
    #[serde(default = "default_max_category_len")]
    pub max_category_len: usize,
    /// Maximum declared variables per template and bound variables per render
    #[serde(default = "default_max_variables")]
    pub max_variables: usize,
    #[serde(default = "default_max_variable_name_len")]
    pub max_variable_name_len: usize,
    #[serde(default = "default_max_display_name_len")]
    pub max_display_name_len: usize,
    #[serde(default = "default_max_description_len")]
    pub max_variable_description_len: usize,
    #[serde(default = "default_max_variable_value_len")]
    pub max_variable_value_len: usize,
}

fn default_max_name_len() -> usize {
    200
}

fn default_max_description_len() -> usize {
    2000
}

fn default_max_content_len() -> usize {
    10_000
}

fn default_max_category_len() -> usize {
    100
}

fn default_max_variables() -> usize {
    50
}

fn default_max_variable_name_len() -> usize {
    100
}

fn default_max_display_name_len() -> usize {
    100
}

fn default_max_variable_value_len() -> usize {
    1000
}

impl Default for TemplateLimits {
    fn default() -> Self {
        Self {
            max_name_len: default_max_name_len(),
            max_description_len: default_max_description_len(),
            max_content_len: default_max_content_len(),
            max_category_len: default_max_category_len(),
            max_variables: default_max_variables(),
            max_variable_name_len: default_max_variable_name_len(),
            max_display_name_len: default_max_display_name_len(),
            max_variable_description_len: default_max_description_len(),
            max_variable_value_len: default_max_variable_value_len(),
        }
    }
}

impl TemplateLimits {
    /// Variable names must be non-empty, bounded, and ASCII identifiers.
    pub fn validate_variable_name(&self, name: &str) -> TemplateResult<()> {
        if name.trim().is_empty() {
            return Err(TemplateError::InvalidVariableName(
                "variable name is required".to_string(),
            ));
        }
        if name.len() > self.max_variable_name_len {
            return Err(TemplateError::InvalidVariableName(format!(
                "variable name too long (max {})",
                self.max_variable_name_len
            )));
        }
        if !is_identifier(name) {
            return Err(TemplateError::InvalidVariableName(format!(
                "invalid variable name format: {}",
                name
            )));
        }
        Ok(())
    }

    pub fn validate_variable_value(&self, name: &str, value: &str) -> TemplateResult<()> {
        if value.len() > self.max_variable_value_len {
            return Err(TemplateError::ValueTooLong {
                name: name.to_string(),
                max: self.max_variable_value_len,
            });
        }
        Ok(())
    }

    /// Validate a render-time binding set: count, then each name and value.
    pub fn validate_bindings(&self, bindings: &HashMap<String, String>) -> TemplateResult<()> {
        if bindings.len() > self.max_variables {
            return Err(TemplateError::TooManyVariables {
                max: self.max_variables,
            });
        }
        for (name, value) in bindings {
            self.validate_variable_name(name)?;
            self.validate_variable_value(name, value)?;
        }
        Ok(())
    }

    /// Content must be non-empty after trimming and within the size limit.
    pub fn validate_template_content(&self, content: &str) -> TemplateResult<()> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(TemplateError::InvalidTemplateContent(
                "content is required".to_string(),
            ));
        }
        if trimmed.len() > self.max_content_len {
            return Err(TemplateError::InvalidTemplateContent(format!(
                "content too long (max {})",
                self.max_content_len
            )));
        }
        Ok(())
    }

    pub fn validate_template_name(&self, name: &str) -> TemplateResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TemplateError::InvalidRequest("name is required".to_string()));
        }
        if name.len() > self.max_name_len {
            return Err(TemplateError::InvalidRequest(format!(
                "name too long (max {})",
                self.max_name_len
            )));
        }
        Ok(())
    }

    pub fn validate_description(&self, description: &str) -> TemplateResult<()> {
        if description.len() > self.max_description_len {
            return Err(TemplateError::InvalidRequest(format!(
                "description too long (max {})",
                self.max_description_len
            )));
        }
        Ok(())
    }

    /// Empty category means "uncategorized" and is allowed.
    pub fn validate_category(&self, category: &str) -> TemplateResult<()> {
        if category.len() > self.max_category_len {
            return Err(TemplateError::InvalidRequest(format!(
                "category too long (max {})",
                self.max_category_len
            )));
        }
        Ok(())
    }

    pub fn validate_declared_variables(&self, variables: &[TemplateVariable]) -> TemplateResult<()> {
        if variables.len() > self.max_variables {
            return Err(TemplateError::TooManyVariables {
                max: self.max_variables,
            });
        }
        variables
            .iter()
            .try_for_each(|variable| self.validate_declared_variable(variable))
    }

    fn validate_declared_variable(&self, variable: &TemplateVariable) -> TemplateResult<()> {
        self.validate_variable_name(variable.name.trim())?;

        if variable.display_name.len() > self.max_display_name_len {
            return Err(TemplateError::InvalidRequest(format!(
                "variable display_name too long (max {})",
                self.max_display_name_len
            )));
        }
        if variable.description.len() > self.max_variable_description_len {
            return Err(TemplateError::InvalidRequest(format!(
                "variable description too long (max {})",
                self.max_variable_description_len
            )));
        }
        if variable.default_value.len() > self.max_variable_value_len {
            return Err(TemplateError::ValueTooLong {
                name: variable.name.clone(),
                max: self.max_variable_value_len,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variable(name: &str) -> TemplateVariable {
        TemplateVariable {
            name: name.to_string(),
            display_name: String::new(),
            description: String::new(),
            default_value: String::new(),
            required: true,
            sort_order: 0,
        }
    }

    #[test]
    fn test_default_limits() {
        let limits = TemplateLimits::default();
        assert_eq!(limits.max_content_len, 10_000);
        assert_eq!(limits.max_variables, 50);
        assert_eq!(limits.max_variable_name_len, 100);
        assert_eq!(limits.max_variable_value_len, 1000);
    }

    #[test]
    fn test_variable_name_length_boundary() {
        let limits = TemplateLimits::default();
        let at_limit = "a".repeat(limits.max_variable_name_len);
        let over_limit = "a".repeat(limits.max_variable_name_len + 1);

        assert!(limits.validate_variable_name(&at_limit).is_ok());
        assert!(matches!(
            limits.validate_variable_name(&over_limit),
            Err(TemplateError::InvalidVariableName(_))
        ));
    }

    #[test]
    fn test_variable_name_format() {
        let limits = TemplateLimits::default();
        assert!(limits.validate_variable_name("user_name").is_ok());
        for bad in ["", "   ", "1abc", "user-name", "名前", " name"] {
            assert!(
                matches!(
                    limits.validate_variable_name(bad),
                    Err(TemplateError::InvalidVariableName(_))
                ),
                "expected {:?} to be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_value_length_boundary() {
        let limits = TemplateLimits::default();
        assert!(limits.validate_variable_value("v", &"x".repeat(1000)).is_ok());
        assert!(matches!(
            limits.validate_variable_value("v", &"x".repeat(1001)),
            Err(TemplateError::ValueTooLong { max: 1000, .. })
        ));
    }

    #[test]
    fn test_binding_count_limit() {
        let limits = TemplateLimits {
            max_variables: 2,
            ..Default::default()
        };
        let mut bindings = HashMap::new();
        bindings.insert("a".to_string(), "1".to_string());
        bindings.insert("b".to_string(), "2".to_string());
        assert!(limits.validate_bindings(&bindings).is_ok());

        bindings.insert("c".to_string(), "3".to_string());
        assert_eq!(
            limits.validate_bindings(&bindings),
            Err(TemplateError::TooManyVariables { max: 2 })
        );
    }

    #[test]
    fn test_binding_with_bad_name_is_rejected() {
        let limits = TemplateLimits::default();
        let bindings = HashMap::from([("bad key".to_string(), "v".to_string())]);
        assert!(matches!(
            limits.validate_bindings(&bindings),
            Err(TemplateError::InvalidVariableName(_))
        ));
    }

    #[test]
    fn test_template_content_rules() {
        let limits = TemplateLimits {
            max_content_len: 10,
            ..Default::default()
        };
        assert!(limits.validate_template_content("  hello  ").is_ok());
        assert!(limits.validate_template_content(" 0123456789 ").is_ok());
        assert!(matches!(
            limits.validate_template_content("\n\t "),
            Err(TemplateError::InvalidTemplateContent(_))
        ));
        assert!(matches!(
            limits.validate_template_content("01234567890"),
            Err(TemplateError::InvalidTemplateContent(_))
        ));
    }

    #[test]
    fn test_declared_variables() {
        let limits = TemplateLimits::default();
        assert!(limits
            .validate_declared_variables(&[variable("topic"), variable(" tone ")])
            .is_ok());

        let mut long_default = variable("topic");
        long_default.default_value = "x".repeat(1001);
        assert!(matches!(
            limits.validate_declared_variables(&[long_default]),
            Err(TemplateError::ValueTooLong { .. })
        ));

        let too_many: Vec<_> = (0..51).map(|i| variable(&format!("v{}", i))).collect();
        assert!(matches!(
            limits.validate_declared_variables(&too_many),
            Err(TemplateError::TooManyVariables { max: 50 })
        ));
    }

    #[test]
    fn test_category_and_name() {
        let limits = TemplateLimits::default();
        assert!(limits.validate_category("").is_ok());
        assert!(limits.validate_category(&"c".repeat(101)).is_err());
        assert!(limits.validate_template_name("  ").is_err());
        assert!(limits.validate_template_name(&"n".repeat(200)).is_ok());
        assert!(limits.validate_template_name(&"n".repeat(201)).is_err());
    }
}
