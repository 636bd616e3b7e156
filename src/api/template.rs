//! Template CRUD endpoints.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::server::AppState;
use crate::template::{
    CreateTemplateRequest, ListScope, Pagination, PromptTemplate, TemplateListResponse,
    UpdateTemplateRequest,
};

/// Header carrying the caller's user id, set by the upstream gateway
pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Debug, Default, Deserialize)]
pub struct ListTemplatesParams {
    pub category: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeleteTemplateResponse {
    pub message: String,
}

pub(crate) fn parse_template_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::Validation("invalid template ID".to_string()))
}

fn caller_id(headers: &HeaderMap) -> Uuid {
    headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| Uuid::parse_str(v.trim()).ok())
        .unwrap_or_else(Uuid::nil)
}

/// POST /api/templates - Create a new template
#[tracing::instrument(name = "http.create_template", skip(state, headers, payload))]
pub async fn create_template(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: std::result::Result<Json<CreateTemplateRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PromptTemplate>)> {
    let Json(request) = payload?;

    let template = state
        .template_service
        .create(request, caller_id(&headers))
        .await?;

    Ok((StatusCode::CREATED, Json(template)))
}

/// GET /api/templates - List templates, newest first
#[tracing::instrument(name = "http.list_templates", skip(state))]
pub async fn list_templates(
    State(state): State<AppState>,
    Query(params): Query<ListTemplatesParams>,
) -> Result<Json<TemplateListResponse>> {
    list(&state, ListScope::All, params).await
}

/// GET /api/templates/public - List public templates
#[tracing::instrument(name = "http.list_public_templates", skip(state))]
pub async fn list_public_templates(
    State(state): State<AppState>,
    Query(params): Query<ListTemplatesParams>,
) -> Result<Json<TemplateListResponse>> {
    list(&state, ListScope::Public, params).await
}

async fn list(
    state: &AppState,
    scope: ListScope,
    params: ListTemplatesParams,
) -> Result<Json<TemplateListResponse>> {
    let pagination = Pagination::from_query(params.page.as_deref(), params.page_size.as_deref());

    let data = state
        .template_service
        .list(scope, params.category.as_deref(), pagination)
        .await?;
    let total = data.len();

    Ok(Json(TemplateListResponse {
        data,
        page: pagination.page,
        page_size: pagination.page_size,
        total,
    }))
}

/// GET /api/templates/{id} - Get a specific template
#[tracing::instrument(name = "http.get_template", skip(state))]
pub async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PromptTemplate>> {
    let id = parse_template_id(&id)?;
    Ok(Json(state.template_service.get(id).await?))
}

/// PUT /api/templates/{id} - Partially update a template
#[tracing::instrument(name = "http.update_template", skip(state, payload))]
pub async fn update_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<UpdateTemplateRequest>, JsonRejection>,
) -> Result<Json<PromptTemplate>> {
    let id = parse_template_id(&id)?;
    let Json(request) = payload?;

    Ok(Json(state.template_service.update(id, request).await?))
}

/// DELETE /api/templates/{id} - Delete a template
#[tracing::instrument(name = "http.delete_template", skip(state))]
pub async fn delete_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteTemplateResponse>> {
    let id = parse_template_id(&id)?;
    state.template_service.delete(id).await?;

    Ok(Json(DeleteTemplateResponse {
        message: "template deleted".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_parse_template_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_template_id(&id.to_string()).unwrap(), id);
        assert!(matches!(
            parse_template_id("not-a-uuid"),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_caller_id_from_header() {
        let id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        assert_eq!(caller_id(&headers), Uuid::nil());

        headers.insert(USER_ID_HEADER, HeaderValue::from_str(&id.to_string()).unwrap());
        assert_eq!(caller_id(&headers), id);

        headers.insert(USER_ID_HEADER, HeaderValue::from_static("garbage"));
        assert_eq!(caller_id(&headers), Uuid::nil());
    }
}
