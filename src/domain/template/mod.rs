//! Prompt template system.
//!
//! This module provides:
//! - Template records with `{{variable}}` placeholders
//! - A placeholder engine that renders templates against caller-supplied values
//! - Variable extraction for editors and input forms
//! - Validation of names, values and content sizes
//!
//! # Placeholders
//!
//! `{{ name }}` where `name` is an ASCII identifier reads a bound variable.
//! Any other token (`{{你好}}`, `{{user-name}}`) is reproduced verbatim.
//! Unbound variables render as the empty string.
//!
//! # Example
//!
//! ```ignore
//! let engine = TemplateEngine::new(Arc::new(TemplateLimits::default()));
//!
//! let variables = HashMap::from([("topic".to_string(), "Rust".to_string())]);
//! let rendered = engine.render("Write about {{ topic }}", &variables)?;
//!
//! assert_eq!(rendered, "Write about Rust");
//! assert_eq!(extract_variables("{{a}}{{b}}{{a}}"), vec!["a", "b"]);
//! ```

mod engine;
mod extract;
mod limits;
mod normalize;
mod program;
mod service;
mod syntax;
mod types;

pub use engine::{check_balance, TemplateEngine};
pub use extract::extract_variables;
pub use limits::TemplateLimits;
pub use normalize::normalize;
pub use program::{Bindings, Instruction, Program};
pub use service::{ListScope, Pagination, TemplateService};
pub use syntax::{is_identifier, CLOSE_DELIM, OPEN_DELIM};
pub use types::{
    CreateTemplateRequest, ExtractVariablesRequest, ExtractVariablesResponse, GenerateRequest,
    GenerateResponse, PromptTemplate, TemplateError, TemplateListResponse, TemplateResult,
    TemplateVariable, UpdateTemplateRequest,
};
