//! Template service: CRUD, rendering and extraction over a repository.

use std::sync::Arc;
use std::time::Instant;

use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::metrics::{ExtractMetrics, RenderMetrics, UsageMetrics};
use crate::store::{TemplateQuery, TemplateRepository};

use super::engine::TemplateEngine;
use super::extract::extract_variables;
use super::types::{
    CreateTemplateRequest, GenerateRequest, PromptTemplate, UpdateTemplateRequest,
};

const DEFAULT_PAGE: u32 = 1;
const DEFAULT_PAGE_SIZE: u32 = 20;
const MAX_PAGE_SIZE: u32 = 100;

/// Which templates a listing covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListScope {
    All,
    Public,
}

/// Page window for listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    /// Parse raw query values. Missing, non-numeric or zero values fall back
    /// to the defaults; the page size is capped.
    pub fn from_query(page: Option<&str>, page_size: Option<&str>) -> Self {
        let parse = |raw: Option<&str>, default: u32| {
            raw.and_then(|v| v.trim().parse::<u32>().ok())
                .filter(|v| *v >= 1)
                .unwrap_or(default)
        };

        Self {
            page: parse(page, DEFAULT_PAGE),
            page_size: parse(page_size, DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE),
        }
    }

    pub fn limit(&self) -> u32 {
        self.page_size
    }

    pub fn offset(&self) -> u32 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

pub struct TemplateService {
    repository: Arc<dyn TemplateRepository>,
    engine: TemplateEngine,
}

impl TemplateService {
    pub fn new(repository: Arc<dyn TemplateRepository>, engine: TemplateEngine) -> Self {
        Self { repository, engine }
    }

    pub fn engine(&self) -> &TemplateEngine {
        &self.engine
    }

    pub fn repository(&self) -> &Arc<dyn TemplateRepository> {
        &self.repository
    }

    pub async fn create(
        &self,
        request: CreateTemplateRequest,
        user_id: Uuid,
    ) -> Result<PromptTemplate> {
        request.validate(self.engine.limits())?;

        let template = PromptTemplate::from_request(request, user_id);
        self.repository.create(&template).await?;

        tracing::info!(
            template_id = %template.id,
            name = %template.name,
            variables = template.variables.len(),
            "Template created"
        );

        Ok(template)
    }

    pub async fn get(&self, id: Uuid) -> Result<PromptTemplate> {
        Ok(self.repository.get_by_id(id).await?)
    }

    pub async fn list(
        &self,
        scope: ListScope,
        category: Option<&str>,
        pagination: Pagination,
    ) -> Result<Vec<PromptTemplate>> {
        let category = category.map(str::trim).filter(|c| !c.is_empty());
        if let Some(category) = category {
            self.engine.limits().validate_category(category)?;
        }

        let query = TemplateQuery {
            category: category.map(str::to_string),
            public_only: scope == ListScope::Public,
            limit: pagination.limit(),
            offset: pagination.offset(),
        };

        Ok(self.repository.list(&query).await?)
    }

    pub async fn update(&self, id: Uuid, request: UpdateTemplateRequest) -> Result<PromptTemplate> {
        request.validate(self.engine.limits())?;

        let mut template = self.repository.get_by_id(id).await?;
        template.apply(request);
        self.repository.update(&template).await?;

        tracing::info!(template_id = %id, "Template updated");

        // Re-read so the returned usage counter reflects concurrent renders
        Ok(self.repository.get_by_id(id).await?)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        self.repository.delete(id).await?;
        tracing::info!(template_id = %id, "Template deleted");
        Ok(())
    }

    /// Render a stored template and bump its usage counter in the background.
    #[tracing::instrument(name = "template.generate", skip(self, request), fields(template_id = %request.template_id))]
    pub async fn generate(&self, request: &GenerateRequest) -> Result<String> {
        request.validate(self.engine.limits())?;

        let template = self.repository.get_by_id(request.template_id).await?;

        let started = Instant::now();
        let rendered = match self.engine.render(&template.content, &request.variables) {
            Ok(rendered) => rendered,
            Err(e) => {
                RenderMetrics::record_failure(&e);
                tracing::warn!(error = %e, "Template render failed");
                return Err(AppError::Template(e));
            }
        };
        RenderMetrics::record_success(started.elapsed());

        self.spawn_usage_increment(template.id);

        Ok(rendered)
    }

    /// Validate content and list its variable names in first-seen order.
    pub fn extract(&self, content: &str) -> Result<Vec<String>> {
        self.engine.limits().validate_template_content(content)?;

        let variables = extract_variables(content);
        ExtractMetrics::record_extracted(variables.len());
        Ok(variables)
    }

    fn spawn_usage_increment(&self, id: Uuid) {
        let repository = Arc::clone(&self.repository);
        tokio::spawn(async move {
            if let Err(e) = repository.increment_usage(id).await {
                UsageMetrics::record_increment_failure();
                tracing::warn!(template_id = %id, error = %e, "Failed to increment usage count");
            }
        });
    }
}
