//! Backend trait for template record storage.
//!
//! This module defines the abstraction layer for template repositories,
//! allowing different storage implementations (memory, PostgreSQL) to be
//! used interchangeably.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::template::PromptTemplate;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No template with this ID
    #[error("Template not found: {0}")]
    NotFound(Uuid),

    /// A template with this ID already exists
    #[error("Template already exists: {0}")]
    AlreadyExists(Uuid),

    /// PostgreSQL operation failed
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Filter and window for listing templates.
///
/// Results are ordered newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateQuery {
    /// Only templates in this category
    pub category: Option<String>,

    /// Only templates marked public
    pub public_only: bool,

    pub limit: u32,
    pub offset: u32,
}

impl Default for TemplateQuery {
    fn default() -> Self {
        Self {
            category: None,
            public_only: false,
            limit: 20,
            offset: 0,
        }
    }
}

impl TemplateQuery {
    /// Check whether a template passes the filters (window ignored).
    pub fn matches(&self, template: &PromptTemplate) -> bool {
        if let Some(category) = &self.category {
            if &template.category != category {
                return false;
            }
        }
        if self.public_only && !template.is_public {
            return false;
        }
        true
    }
}

/// Trait for template record storage.
#[async_trait]
pub trait TemplateRepository: Send + Sync {
    /// Backend type identifier (for logging and health output)
    fn backend_type(&self) -> &'static str;

    /// Insert a new template.
    async fn create(&self, template: &PromptTemplate) -> StoreResult<()>;

    /// Fetch a template by ID.
    async fn get_by_id(&self, id: Uuid) -> StoreResult<PromptTemplate>;

    /// List templates matching the query.
    async fn list(&self, query: &TemplateQuery) -> StoreResult<Vec<PromptTemplate>>;

    /// Replace a stored template. The usage counter is left untouched.
    async fn update(&self, template: &PromptTemplate) -> StoreResult<()>;

    /// Delete a template by ID.
    async fn delete(&self, id: Uuid) -> StoreResult<()>;

    /// Atomically add one to the template's usage counter.
    async fn increment_usage(&self, id: Uuid) -> StoreResult<()>;

    /// Total number of stored templates.
    async fn count(&self) -> StoreResult<u64>;
}
