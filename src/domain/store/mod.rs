//! Template record storage.
//!
//! Backends:
//! - `memory`: DashMap-backed, for development and tests
//! - `postgres`: `prompt_templates` table via sqlx

mod backend;
mod factory;
mod memory_backend;
mod postgres_backend;

pub use backend::{StoreError, StoreResult, TemplateQuery, TemplateRepository};
pub use factory::create_template_repository;
pub use memory_backend::MemoryTemplateRepository;
pub use postgres_backend::PostgresTemplateRepository;
