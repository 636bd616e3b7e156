//! Rendering and variable extraction endpoints.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::error::Result;
use crate::server::AppState;
use crate::template::{
    ExtractVariablesRequest, ExtractVariablesResponse, GenerateRequest, GenerateResponse,
};

/// POST /api/generate - Render a stored template with the supplied variables
#[tracing::instrument(name = "http.generate", skip(state, payload))]
pub async fn generate(
    State(state): State<AppState>,
    payload: std::result::Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>> {
    let Json(request) = payload?;

    let rendered = state.template_service.generate(&request).await?;
    Ok(Json(GenerateResponse::new(rendered)))
}

/// POST /api/generate/extract-variables - List placeholder names in content
#[tracing::instrument(name = "http.extract_variables", skip(state, payload))]
pub async fn extract_variables(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ExtractVariablesRequest>, JsonRejection>,
) -> Result<Json<ExtractVariablesResponse>> {
    let Json(request) = payload?;

    let variables = state.template_service.extract(&request.content)?;
    Ok(Json(ExtractVariablesResponse { variables }))
}
