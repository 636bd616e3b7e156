//! API layer - HTTP endpoint handlers organized by domain.

mod generate;
mod health;
mod metrics;
mod routes;
mod template;

// Re-export all handlers for use in server/app.rs
pub use generate::{extract_variables, generate};
pub use health::{health, HealthResponse, SERVICE_NAME};
pub use metrics::prometheus_metrics;
pub use routes::api_routes;
pub use template::{
    create_template, delete_template, get_template, list_public_templates, list_templates,
    update_template, DeleteTemplateResponse, ListTemplatesParams, USER_ID_HEADER,
};
