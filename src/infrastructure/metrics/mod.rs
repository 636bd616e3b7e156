//! Prometheus metrics for the prompt template service.
//!
//! - Render metrics (rendered, failures by kind, duration)
//! - Usage counter metrics
//! - Extraction metrics
//! - Stored template gauge

mod helpers;

pub use helpers::{encode_metrics, ExtractMetrics, RenderMetrics, StoreMetrics, UsageMetrics};

use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, register_int_gauge,
    Histogram, IntCounter, IntCounterVec, IntGauge,
};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "prompt";

lazy_static! {
    // ============================================================================
    // Render Metrics
    // ============================================================================

    /// Total successful template renders
    pub static ref TEMPLATES_RENDERED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_templates_rendered_total", METRIC_PREFIX),
        "Total templates rendered successfully"
    ).unwrap();

    /// Render failures by error kind
    pub static ref RENDER_FAILURES_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_render_failures_total", METRIC_PREFIX),
        "Total template render failures",
        &["kind"]
    ).unwrap();

    /// Render duration in seconds
    pub static ref RENDER_DURATION_SECONDS: Histogram = register_histogram!(
        format!("{}_render_duration_seconds", METRIC_PREFIX),
        "Template render duration in seconds",
        vec![0.00001, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1]
    ).unwrap();

    // ============================================================================
    // Usage Metrics
    // ============================================================================

    /// Usage counter increments that failed in the background
    pub static ref USAGE_INCREMENT_FAILURES_TOTAL: IntCounter = register_int_counter!(
        format!("{}_usage_increment_failures_total", METRIC_PREFIX),
        "Total failed usage counter increments"
    ).unwrap();

    // ============================================================================
    // Extraction Metrics
    // ============================================================================

    /// Variable names returned by extraction
    pub static ref VARIABLES_EXTRACTED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_variables_extracted_total", METRIC_PREFIX),
        "Total variable names extracted from template content"
    ).unwrap();

    // ============================================================================
    // Store Metrics
    // ============================================================================

    /// Number of stored templates (updated on scrape)
    pub static ref TEMPLATES_STORED: IntGauge = register_int_gauge!(
        format!("{}_templates_stored", METRIC_PREFIX),
        "Number of templates in the repository"
    ).unwrap();
}
