//! @ai:module:intent Parse provider metrics JSON, substituting the fallback on failure
//! @ai:module:layer application
//! @ai:module:public_api MetricsParser, ParsedMetrics, MetricsParseError, strip_code_fences
//! @ai:module:stateless true

use crate::metrics::types::MetricsReport;
use thiserror::Error;

/// @ai:intent Why provider metrics were rejected; never leaves the metrics channel
#[derive(Debug, Error)]
pub enum MetricsParseError {
    #[error("Metrics JSON malformed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("overallScore {0} outside 0-10")]
    ScoreOutOfRange(f64),

    #[error("{0} contains a non-finite value")]
    NonFinite(&'static str),

    #[error("{0} is empty")]
    EmptySection(&'static str),
}

/// @ai:intent Metrics for the report and whether they are the fallback
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedMetrics {
    pub report: MetricsReport,
    pub used_fallback: bool,
}

impl ParsedMetrics {
    pub fn fallback() -> Self {
        Self {
            report: MetricsReport::fallback(),
            used_fallback: true,
        }
    }
}

/// @ai:intent Remove surrounding markdown code-fence markers
/// @ai:effects pure
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the info string (e.g. "json") on the opening fence line
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// @ai:intent Turns raw completion text into a MetricsReport
#[derive(Debug, Default, Clone, Copy)]
pub struct MetricsParser;

impl MetricsParser {
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Parse and validate, reporting the reason on failure
    /// @ai:effects pure
    pub fn try_parse(&self, raw: &str) -> Result<MetricsReport, MetricsParseError> {
        let report: MetricsReport = serde_json::from_str(strip_code_fences(raw))?;
        Self::check(&report)?;
        Ok(report)
    }

    /// @ai:intent Parse metrics, returning the fallback constant on any failure
    /// @ai:post report is either the parsed record unchanged or exactly MetricsReport::fallback()
    /// @ai:effects log
    pub fn parse(&self, raw: &str) -> ParsedMetrics {
        match self.try_parse(raw) {
            Ok(report) => ParsedMetrics {
                report,
                used_fallback: false,
            },
            Err(e) => {
                tracing::warn!("Using fallback metrics: {}", e);
                ParsedMetrics::fallback()
            }
        }
    }

    fn check(report: &MetricsReport) -> Result<(), MetricsParseError> {
        if !report.overall_score.is_finite() {
            return Err(MetricsParseError::NonFinite("overallScore"));
        }
        if !(0.0..=10.0).contains(&report.overall_score) {
            return Err(MetricsParseError::ScoreOutOfRange(report.overall_score));
        }

        for (name, map) in report.sections() {
            if map.is_empty() {
                return Err(MetricsParseError::EmptySection(name));
            }
            if map.values().any(|v| !v.is_finite()) {
                return Err(MetricsParseError::NonFinite(name));
            }
        }
        Ok(())
    }
}
