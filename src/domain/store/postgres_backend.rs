//! PostgreSQL-based template repository.
//!
//! Templates live in the `prompt_templates` table with declared variables
//! stored as JSONB.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::template::{PromptTemplate, TemplateVariable};

use super::backend::{StoreError, StoreResult, TemplateQuery, TemplateRepository};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS prompt_templates (
        id UUID PRIMARY KEY,
        user_id UUID NOT NULL,
        name VARCHAR(200) NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        content TEXT NOT NULL,
        variables JSONB NOT NULL DEFAULT '[]',
        category VARCHAR(100) NOT NULL DEFAULT '',
        is_public BOOLEAN NOT NULL DEFAULT FALSE,
        usage_count BIGINT NOT NULL DEFAULT 0,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_prompt_templates_user_id ON prompt_templates (user_id)",
    "CREATE INDEX IF NOT EXISTS idx_prompt_templates_category ON prompt_templates (category)",
    "CREATE INDEX IF NOT EXISTS idx_prompt_templates_created_at ON prompt_templates (created_at DESC)",
];

const SELECT_COLUMNS: &str = "id, user_id, name, description, content, variables, category, \
                              is_public, usage_count, created_at, updated_at";

#[derive(Debug, FromRow)]
struct TemplateRow {
    id: Uuid,
    user_id: Uuid,
    name: String,
    description: String,
    content: String,
    variables: Json<Vec<TemplateVariable>>,
    category: String,
    is_public: bool,
    usage_count: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TemplateRow> for PromptTemplate {
    fn from(row: TemplateRow) -> Self {
        PromptTemplate {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            description: row.description,
            content: row.content,
            variables: row.variables.0,
            category: row.category,
            is_public: row.is_public,
            usage_count: row.usage_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// PostgreSQL-based template repository.
pub struct PostgresTemplateRepository {
    pool: PgPool,
}

impl PostgresTemplateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the table and indexes if they do not exist.
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        for statement in SCHEMA {
            sqlx::query(*statement).execute(&self.pool).await?;
        }
        tracing::info!("prompt_templates schema ready");
        Ok(())
    }
}

#[async_trait]
impl TemplateRepository for PostgresTemplateRepository {
    fn backend_type(&self) -> &'static str {
        "postgres"
    }

    async fn create(&self, template: &PromptTemplate) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO prompt_templates
                (id, user_id, name, description, content, variables, category,
                 is_public, usage_count, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(template.id)
        .bind(template.user_id)
        .bind(&template.name)
        .bind(&template.description)
        .bind(&template.content)
        .bind(Json(&template.variables))
        .bind(&template.category)
        .bind(template.is_public)
        .bind(template.usage_count)
        .bind(template.created_at)
        .bind(template.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::AlreadyExists(template.id));
        }

        tracing::debug!(template_id = %template.id, "Template inserted into PostgreSQL");
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> StoreResult<PromptTemplate> {
        let sql = format!("SELECT {} FROM prompt_templates WHERE id = $1", SELECT_COLUMNS);
        let row: Option<TemplateRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(PromptTemplate::from).ok_or(StoreError::NotFound(id))
    }

    async fn list(&self, query: &TemplateQuery) -> StoreResult<Vec<PromptTemplate>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM prompt_templates
            WHERE ($1::TEXT IS NULL OR category = $1)
              AND ($2 = FALSE OR is_public = TRUE)
            ORDER BY created_at DESC, id ASC
            LIMIT $3 OFFSET $4
            "#,
            SELECT_COLUMNS
        );

        let rows: Vec<TemplateRow> = sqlx::query_as(&sql)
            .bind(query.category.as_deref())
            .bind(query.public_only)
            .bind(i64::from(query.limit))
            .bind(i64::from(query.offset))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(PromptTemplate::from).collect())
    }

    async fn update(&self, template: &PromptTemplate) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE prompt_templates
            SET name = $2, description = $3, content = $4, variables = $5,
                category = $6, is_public = $7, updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(template.id)
        .bind(&template.name)
        .bind(&template.description)
        .bind(&template.content)
        .bind(Json(&template.variables))
        .bind(&template.category)
        .bind(template.is_public)
        .bind(template.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(template.id));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM prompt_templates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn increment_usage(&self, id: Uuid) -> StoreResult<()> {
        let result =
            sqlx::query("UPDATE prompt_templates SET usage_count = usage_count + 1 WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn count(&self) -> StoreResult<u64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM prompt_templates")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }
}
