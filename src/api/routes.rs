use axum::{
    routing::{get, post},
    Router,
};

use crate::server::AppState;

use super::generate::{extract_variables, generate};
use super::health::health;
use super::metrics::prometheus_metrics;
use super::template::{
    create_template, delete_template, get_template, list_public_templates, list_templates,
    update_template,
};

pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health & metrics
        .route("/health", get(health))
        .route("/metrics", get(prometheus_metrics))
        // Template endpoints
        .nest(
            "/api",
            Router::new()
                .route("/health", get(health))
                .route("/templates", post(create_template).get(list_templates))
                .route("/templates/public", get(list_public_templates))
                .route(
                    "/templates/{id}",
                    get(get_template).put(update_template).delete(delete_template),
                )
                .route("/generate", post(generate))
                .route("/generate/extract-variables", post(extract_variables)),
        )
}
