//! Template types and error definitions

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::limits::TemplateLimits;

/// Template-specific error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("Malformed template: {0}")]
    MalformedTemplate(String),

    #[error("Render failed: {0}")]
    RenderFailed(String),

    #[error("Invalid variable name: {0}")]
    InvalidVariableName(String),

    #[error("Variable value too long: {name} (max {max})")]
    ValueTooLong { name: String, max: usize },

    #[error("Too many variables (max {max})")]
    TooManyVariables { max: usize },

    #[error("Invalid template content: {0}")]
    InvalidTemplateContent(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl TemplateError {
    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            TemplateError::MalformedTemplate(_) => "MALFORMED_TEMPLATE",
            TemplateError::RenderFailed(_) => "RENDER_FAILED",
            TemplateError::InvalidVariableName(_) => "INVALID_VARIABLE_NAME",
            TemplateError::ValueTooLong { .. } => "VALUE_TOO_LONG",
            TemplateError::TooManyVariables { .. } => "TOO_MANY_VARIABLES",
            TemplateError::InvalidTemplateContent(_) => "INVALID_TEMPLATE_CONTENT",
            TemplateError::InvalidRequest(_) => "INVALID_REQUEST",
        }
    }
}

/// Result type for template operations
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Declared variable metadata attached to a stored template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateVariable {
    /// Variable name as referenced by `{{name}}`
    pub name: String,

    /// Label shown in input forms
    #[serde(default)]
    pub display_name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub default_value: String,

    #[serde(default = "default_required")]
    pub required: bool,

    #[serde(default)]
    pub sort_order: i32,
}

fn default_required() -> bool {
    true
}

/// A stored prompt template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptTemplate {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: String,

    /// Template text with `{{variable}}` placeholders
    pub content: String,

    pub variables: Vec<TemplateVariable>,
    pub category: String,
    pub is_public: bool,

    /// Number of successful renders
    pub usage_count: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PromptTemplate {
    /// Build a new record from a validated create request.
    pub fn from_request(req: CreateTemplateRequest, user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            name: req.name.trim().to_string(),
            description: req.description,
            content: req.content,
            variables: req.variables,
            category: req.category,
            is_public: req.is_public,
            usage_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update. Fields left as `None` keep their value.
    pub fn apply(&mut self, updates: UpdateTemplateRequest) {
        if let Some(name) = updates.name {
            self.name = name.trim().to_string();
        }
        if let Some(description) = updates.description {
            self.description = description;
        }
        if let Some(content) = updates.content {
            self.content = content;
        }
        if let Some(category) = updates.category {
            self.category = category;
        }
        if let Some(is_public) = updates.is_public {
            self.is_public = is_public;
        }
        if let Some(variables) = updates.variables {
            self.variables = variables;
        }
        self.updated_at = Utc::now();
    }
}

/// Request to create a new template
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTemplateRequest {
    pub name: String,

    #[serde(default)]
    pub description: String,

    pub content: String,

    #[serde(default)]
    pub variables: Vec<TemplateVariable>,

    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub is_public: bool,
}

impl CreateTemplateRequest {
    pub fn validate(&self, limits: &TemplateLimits) -> TemplateResult<()> {
        limits.validate_template_name(&self.name)?;
        limits.validate_description(&self.description)?;
        limits.validate_template_content(&self.content)?;
        limits.validate_category(&self.category)?;
        limits.validate_declared_variables(&self.variables)
    }
}

/// Request to update an existing template
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTemplateRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub variables: Option<Vec<TemplateVariable>>,
    pub category: Option<String>,
    pub is_public: Option<bool>,
}

impl UpdateTemplateRequest {
    pub fn validate(&self, limits: &TemplateLimits) -> TemplateResult<()> {
        if let Some(name) = &self.name {
            limits.validate_template_name(name)?;
        }
        if let Some(description) = &self.description {
            limits.validate_description(description)?;
        }
        if let Some(content) = &self.content {
            limits.validate_template_content(content)?;
        }
        if let Some(category) = &self.category {
            limits.validate_category(category)?;
        }
        if let Some(variables) = &self.variables {
            limits.validate_declared_variables(variables)?;
        }
        Ok(())
    }
}

/// Request to render a stored template
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    pub template_id: Uuid,
    #[serde(default)]
    pub variables: HashMap<String, String>,
}

impl GenerateRequest {
    pub fn validate(&self, limits: &TemplateLimits) -> TemplateResult<()> {
        if self.template_id.is_nil() {
            return Err(TemplateError::InvalidRequest(
                "template_id is required".to_string(),
            ));
        }
        limits.validate_bindings(&self.variables)
    }
}

/// Rendered output of a generate call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub result: String,
    pub prompt: String,
}

impl GenerateResponse {
    pub fn new(rendered: String) -> Self {
        Self {
            prompt: rendered.clone(),
            result: rendered,
        }
    }
}

/// Request body for variable extraction
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractVariablesRequest {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractVariablesResponse {
    pub variables: Vec<String>,
}

/// One page of templates
#[derive(Debug, Serialize)]
pub struct TemplateListResponse {
    pub data: Vec<PromptTemplate>,
    pub page: u32,
    pub page_size: u32,

    /// Number of templates on this page
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request() -> CreateTemplateRequest {
        CreateTemplateRequest {
            name: "  Blog outline  ".to_string(),
            description: "Outline a post".to_string(),
            content: "Write about {{topic}}".to_string(),
            variables: vec![TemplateVariable {
                name: "topic".to_string(),
                display_name: "Topic".to_string(),
                description: String::new(),
                default_value: String::new(),
                required: true,
                sort_order: 0,
            }],
            category: "writing".to_string(),
            is_public: true,
        }
    }

    #[test]
    fn test_from_request_trims_name_and_zeroes_usage() {
        let template = PromptTemplate::from_request(create_request(), Uuid::nil());
        assert_eq!(template.name, "Blog outline");
        assert_eq!(template.usage_count, 0);
        assert_eq!(template.created_at, template.updated_at);
    }

    #[test]
    fn test_apply_partial_update() {
        let mut template = PromptTemplate::from_request(create_request(), Uuid::nil());
        let before = template.updated_at;

        template.apply(UpdateTemplateRequest {
            content: Some("New {{body}}".to_string()),
            is_public: Some(false),
            ..Default::default()
        });

        assert_eq!(template.content, "New {{body}}");
        assert!(!template.is_public);
        assert_eq!(template.name, "Blog outline");
        assert_eq!(template.category, "writing");
        assert!(template.updated_at >= before);
    }

    #[test]
    fn test_create_request_validation() {
        let limits = TemplateLimits::default();
        assert!(create_request().validate(&limits).is_ok());

        let mut bad = create_request();
        bad.content = "   ".to_string();
        assert!(matches!(
            bad.validate(&limits),
            Err(TemplateError::InvalidTemplateContent(_))
        ));

        let mut bad = create_request();
        bad.variables[0].name = "not valid".to_string();
        assert!(matches!(
            bad.validate(&limits),
            Err(TemplateError::InvalidVariableName(_))
        ));
    }

    #[test]
    fn test_generate_request_requires_template_id() {
        let req = GenerateRequest {
            template_id: Uuid::nil(),
            variables: HashMap::new(),
        };
        assert!(matches!(
            req.validate(&TemplateLimits::default()),
            Err(TemplateError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_variable_defaults_when_deserializing() {
        let variable: TemplateVariable = serde_json::from_str(r#"{"name": "topic"}"#).unwrap();
        assert!(variable.required);
        assert_eq!(variable.sort_order, 0);
        assert!(variable.display_name.is_empty());
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            TemplateError::MalformedTemplate("x".into()).code(),
            "MALFORMED_TEMPLATE"
        );
        assert_eq!(
            TemplateError::TooManyVariables { max: 50 }.code(),
            "TOO_MANY_VARIABLES"
        );
    }
}
