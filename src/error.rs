//! @ai:module:intent Request-level error taxonomy and its HTTP mapping
//! @ai:module:layer domain
//! @ai:module:public_api PipelineError
//! @ai:module:stateless true

use crate::charts::RenderError;
use crate::completion::CompletionError;
use crate::delivery::DeliveryError;
use crate::narrative::NarrativeError;
use crate::report::ComposeError;
use crate::validation::ValidationErrors;
use std::time::Duration;
use thiserror::Error;

/// @ai:intent Every way an evaluation or contact request can fail
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Evaluation exceeded {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("Analysis is missing sections: {}", .0.join(", "))]
    MissingSections(Vec<String>),

    #[error("Chart rendering failed: {0}")]
    ChartRender(#[from] RenderError),

    #[error("Delivery failed: {0}")]
    Delivery(#[from] DeliveryError),
}

impl PipelineError {
    /// @ai:intent Stable machine-readable tag
    /// @ai:effects pure
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Validation(_) => "validation",
            PipelineError::Timeout(_) => "timeout",
            PipelineError::Generation(_) | PipelineError::MissingSections(_) => "generation",
            PipelineError::ChartRender(_) => "chart_render",
            PipelineError::Delivery(_) => "delivery",
        }
    }

    /// @ai:intent HTTP status for this failure
    /// @ai:effects pure
    pub fn status_code(&self) -> u16 {
        match self {
            PipelineError::Validation(_) => 400,
            PipelineError::Timeout(_) => 504,
            _ => 500,
        }
    }

    /// @ai:intent Message safe to show the end user
    /// @ai:effects pure
    pub fn user_message(&self) -> &'static str {
        match self {
            PipelineError::Validation(_) => "Please correct the highlighted fields",
            PipelineError::Timeout(_) => {
                "The analysis took too long to complete. Please try again with a shorter description."
            }
            PipelineError::Generation(_) => "Failed to generate the analysis",
            PipelineError::MissingSections(_) => "The generated analysis was incomplete",
            PipelineError::ChartRender(_) => "Failed to render the report charts",
            PipelineError::Delivery(_) => "Failed to deliver the evaluation report by email",
        }
    }
}

impl From<ValidationErrors> for PipelineError {
    fn from(errors: ValidationErrors) -> Self {
        PipelineError::Validation(errors)
    }
}

impl From<CompletionError> for PipelineError {
    fn from(err: CompletionError) -> Self {
        PipelineError::Generation(err.to_string())
    }
}

impl From<NarrativeError> for PipelineError {
    fn from(err: NarrativeError) -> Self {
        match err {
            NarrativeError::MissingSections(ids) => {
                PipelineError::MissingSections(ids.iter().map(|id| id.title().to_string()).collect())
            }
        }
    }
}

impl From<ComposeError> for PipelineError {
    fn from(err: ComposeError) -> Self {
        match err {
            ComposeError::MissingSection(id) => {
                PipelineError::MissingSections(vec![id.title().to_string()])
            }
            ComposeError::MissingChart(slot) => {
                PipelineError::ChartRender(RenderError::NotRendered(slot.title()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::ChartSlot;
    use crate::prompt::SectionId;

    #[test]
    fn test_status_codes() {
        assert_eq!(PipelineError::Validation(ValidationErrors::new()).status_code(), 400);
        assert_eq!(PipelineError::Timeout(Duration::from_secs(50)).status_code(), 504);
        assert_eq!(PipelineError::Generation("x".into()).status_code(), 500);
        assert_eq!(
            PipelineError::Delivery(DeliveryError::Rejected("x".into())).status_code(),
            500
        );
    }

    #[test]
    fn test_delivery_kind_distinct_from_generation() {
        let delivery = PipelineError::Delivery(DeliveryError::Rejected("x".into()));
        let generation = PipelineError::Generation("x".into());
        assert_eq!(delivery.kind(), "delivery");
        assert_eq!(generation.kind(), "generation");
        assert_ne!(delivery.user_message(), generation.user_message());
    }

    #[test]
    fn test_timeout_message() {
        let err = PipelineError::Timeout(Duration::from_secs(50));
        assert!(err.user_message().contains("took too long"));
        assert_eq!(err.to_string(), "Evaluation exceeded 50s");
    }

    #[test]
    fn test_missing_sections_are_generation_failures() {
        let err: PipelineError = NarrativeError::MissingSections(vec![
            SectionId::MarketAnalysis,
            SectionId::RiskAssessment,
        ])
        .into();
        assert_eq!(err.kind(), "generation");
        assert_eq!(err.to_string(), "Analysis is missing sections: Market Analysis, Risk Assessment");
    }

    #[test]
    fn test_missing_chart_maps_to_chart_render() {
        let err: PipelineError = ComposeError::MissingChart(ChartSlot::RevenueProjection).into();
        assert_eq!(err.kind(), "chart_render");
    }
}
