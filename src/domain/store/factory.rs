//! Template repository factory

use std::sync::Arc;

use crate::config::DatabaseConfig;
use crate::postgres::PostgresPool;

use super::backend::TemplateRepository;
use super::memory_backend::MemoryTemplateRepository;
use super::postgres_backend::PostgresTemplateRepository;

/// Create a template repository based on configuration.
///
/// - `"postgres"`: a `PostgresTemplateRepository` if a pool is provided
/// - `"memory"` (default): a `MemoryTemplateRepository`
pub fn create_template_repository(
    settings: &DatabaseConfig,
    postgres_pool: Option<&PostgresPool>,
) -> Arc<dyn TemplateRepository> {
    match settings.backend.as_str() {
        "postgres" => {
            if let Some(pool) = postgres_pool {
                tracing::info!(backend = "postgres", "Creating PostgreSQL template repository");
                Arc::new(PostgresTemplateRepository::new(pool.pool().clone()))
            } else {
                tracing::warn!(
                    "PostgreSQL backend requested but no pool provided, falling back to memory"
                );
                Arc::new(MemoryTemplateRepository::new())
            }
        }
        "memory" => {
            tracing::info!(backend = "memory", "Creating in-memory template repository");
            Arc::new(MemoryTemplateRepository::new())
        }
        other => {
            tracing::warn!(
                backend = %other,
                "Unknown template repository backend, using memory"
            );
            Arc::new(MemoryTemplateRepository::new())
        }
    }
}
