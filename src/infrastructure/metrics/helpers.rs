//! Metrics helper structs for convenient metric recording

use std::time::Duration;

use prometheus::{Encoder, TextEncoder};

use crate::template::TemplateError;

use super::{
    RENDER_DURATION_SECONDS, RENDER_FAILURES_TOTAL, TEMPLATES_RENDERED_TOTAL, TEMPLATES_STORED,
    USAGE_INCREMENT_FAILURES_TOTAL, VARIABLES_EXTRACTED_TOTAL,
};

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

/// Helper struct for recording render metrics
pub struct RenderMetrics;

impl RenderMetrics {
    /// Record a successful render and its duration
    pub fn record_success(elapsed: Duration) {
        TEMPLATES_RENDERED_TOTAL.inc();
        RENDER_DURATION_SECONDS.observe(elapsed.as_secs_f64());
    }

    /// Record a failed render, labelled by error kind
    pub fn record_failure(error: &TemplateError) {
        RENDER_FAILURES_TOTAL
            .with_label_values(&[Self::failure_kind(error)])
            .inc();
    }

    fn failure_kind(error: &TemplateError) -> &'static str {
        match error {
            TemplateError::MalformedTemplate(_) => "malformed",
            TemplateError::RenderFailed(_) => "render",
            _ => "validation",
        }
    }
}

/// Helper struct for usage counter metrics
pub struct UsageMetrics;

impl UsageMetrics {
    /// Record a usage increment that could not be persisted
    pub fn record_increment_failure() {
        USAGE_INCREMENT_FAILURES_TOTAL.inc();
    }
}

/// Helper struct for extraction metrics
pub struct ExtractMetrics;

impl ExtractMetrics {
    pub fn record_extracted(count: usize) {
        VARIABLES_EXTRACTED_TOTAL.inc_by(count as u64);
    }
}

/// Helper struct for repository metrics
pub struct StoreMetrics;

impl StoreMetrics {
    /// Update the stored templates gauge (call on scrape)
    pub fn set_templates_stored(count: u64) {
        TEMPLATES_STORED.set(i64::try_from(count).unwrap_or(i64::MAX));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_kind_labels() {
        assert_eq!(
            RenderMetrics::failure_kind(&TemplateError::MalformedTemplate("x".into())),
            "malformed"
        );
        assert_eq!(
            RenderMetrics::failure_kind(&TemplateError::RenderFailed("x".into())),
            "render"
        );
        assert_eq!(
            RenderMetrics::failure_kind(&TemplateError::TooManyVariables { max: 1 }),
            "validation"
        );
    }

    #[test]
    fn test_record_helpers() {
        let before = TEMPLATES_RENDERED_TOTAL.get();
        RenderMetrics::record_success(Duration::from_micros(40));
        assert!(TEMPLATES_RENDERED_TOTAL.get() > before);

        let before = USAGE_INCREMENT_FAILURES_TOTAL.get();
        UsageMetrics::record_increment_failure();
        assert!(USAGE_INCREMENT_FAILURES_TOTAL.get() > before);

        StoreMetrics::set_templates_stored(7);
        ExtractMetrics::record_extracted(2);
    }
}
