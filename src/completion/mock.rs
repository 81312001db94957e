//! @ai:module:intent Scripted completion client for dry runs and tests
//! @ai:module:layer infrastructure
//! @ai:module:public_api MockCompletionClient, MockReply, sample_narrative, sample_metrics_json

use crate::completion::client::{CompletionError, TextCompletion};
use crate::prompt::{SectionId, METRICS_PROMPT_MARKER};
use std::fmt::Write as FmtWrite;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// @ai:intent What the mock answers for one kind of prompt
#[derive(Debug, Clone)]
pub enum MockReply {
    Text(String),
    Fail(String),
}

/// @ai:intent Mock client that answers narrative and metrics prompts differently
pub struct MockCompletionClient {
    narrative: MockReply,
    metrics: MockReply,
    delay: Duration,
    calls: AtomicUsize,
}

impl MockCompletionClient {
    /// @ai:intent Create a mock returning fixed texts
    /// @ai:effects pure
    pub fn new(narrative: impl Into<String>, metrics: impl Into<String>) -> Self {
        Self {
            narrative: MockReply::Text(narrative.into()),
            metrics: MockReply::Text(metrics.into()),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    /// @ai:intent Mock with a complete eight-section narrative and well-formed metrics
    /// @ai:effects pure
    pub fn sample() -> Self {
        Self::new(sample_narrative(), sample_metrics_json())
    }

    pub fn with_narrative(mut self, reply: MockReply) -> Self {
        self.narrative = reply;
        self
    }

    pub fn with_metrics(mut self, reply: MockReply) -> Self {
        self.metrics = reply;
        self
    }

    /// Delay every reply, e.g. to exceed the pipeline timeout
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TextCompletion for MockCompletionClient {
    /// @ai:intent Return the scripted reply for the prompt kind
    /// @ai:effects time
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let reply = if prompt.contains(METRICS_PROMPT_MARKER) {
            &self.metrics
        } else {
            &self.narrative
        };

        match reply {
            MockReply::Text(text) => Ok(text.clone()),
            MockReply::Fail(message) => Err(CompletionError::Unavailable(message.clone())),
        }
    }
}

/// @ai:intent Narrative text covering every section the way a model answers
/// @ai:effects pure
pub fn sample_narrative() -> String {
    let mut text = String::new();
    for section in SectionId::ALL {
        let _ = writeln!(text, "# {section}");
        let _ = writeln!(text);
        let _ = writeln!(
            text,
            "The {} of this idea looks **promising** overall.",
            section.title().to_lowercase()
        );
        let _ = writeln!(text);
        for point in section.prompts() {
            let _ = writeln!(text, "- {point}: covered in detail");
        }
        let _ = writeln!(text);
    }
    text
}

/// @ai:intent Fenced metrics JSON as a model typically returns it
/// @ai:effects pure
pub fn sample_metrics_json() -> String {
    r#"```json
{
  "overallScore": 8,
  "categoryScores": {"innovation": 8, "marketPotential": 7, "feasibility": 9, "scalability": 6, "profitability": 7},
  "marketAnalysis": {"currentMarketSize": 55, "projectedGrowth": 80, "competitionLevel": 40},
  "implementationTimeline": {"planning": 15, "development": 45, "testing": 25, "launch": 15},
  "costBreakdown": {"development": 50, "marketing": 20, "operations": 20, "other": 10},
  "revenueProjection": {"year1": 40000, "year2": 90000, "year3": 180000, "year4": 320000, "year5": 500000}
}
```"#
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::PromptBuilder;

    #[tokio::test]
    async fn test_mock_routes_by_prompt_kind() {
        let client = MockCompletionClient::new("narrative text", "{}");
        let prompts = PromptBuilder::new().build("idea");

        assert_eq!(client.complete(&prompts.narrative).await.unwrap(), "narrative text");
        assert_eq!(client.complete(&prompts.metrics).await.unwrap(), "{}");
        assert_eq!(client.call_count(), 2);
    }

    #[tokio::test]
    async fn test_mock_failure_reply() {
        let client = MockCompletionClient::sample()
            .with_narrative(MockReply::Fail("provider down".to_string()));
        let prompts = PromptBuilder::new().build("idea");

        let err = client.complete(&prompts.narrative).await.unwrap_err();
        assert!(err.to_string().contains("provider down"));
    }

    #[test]
    fn test_sample_narrative_has_every_heading() {
        let text = sample_narrative();
        for section in SectionId::ALL {
            assert!(text.contains(&format!("# {section}")));
        }
    }
}
