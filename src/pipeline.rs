//! @ai:module:intent Orchestrate one evaluation from submission to delivered report
//! @ai:module:layer application
//! @ai:module:public_api EvaluationPipeline, EvaluationOutcome, PipelineSettings, create_pipeline
//! @ai:module:stateless false

use crate::charts::{renderer_from_config, ChartRenderer, ChartSpecBuilder, RenderOptions};
use crate::completion::{GeminiClient, TextCompletion};
use crate::config::{AppConfig, Credentials};
use crate::delivery::{DeliveryReceipt, EmailMessage, HttpMailer, Mailer};
use crate::error::PipelineError;
use crate::metrics::{MetricsParser, MetricsReport, ParsedMetrics};
use crate::narrative::NarrativeParser;
use crate::prompt::PromptBuilder;
use crate::report::{contact_message_html, ComposedReport, ReportComposer};
use crate::validation::{word_count, ContactMessage, IdeaSubmission};
use anyhow::Context;
use chrono::Utc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// @ai:intent Per-deployment values the pipeline needs beyond its collaborators
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub timeout: Duration,
    pub report_subject: String,
    pub owner_inbox: String,
    pub contact_subject: String,
    pub chart_options: RenderOptions,
}

impl From<&AppConfig> for PipelineSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            timeout: config.pipeline.timeout(),
            report_subject: config.delivery.report_subject.clone(),
            owner_inbox: config.delivery.owner_inbox.clone(),
            contact_subject: config.delivery.contact_subject.clone(),
            chart_options: RenderOptions::from(&config.charts),
        }
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

/// @ai:intent Result of a delivered evaluation
#[derive(Debug, Clone)]
pub struct EvaluationOutcome {
    pub request_id: Uuid,
    pub receipt: DeliveryReceipt,
    pub report: ComposedReport,
    pub metrics: MetricsReport,
    /// Whether the fallback metrics replaced the provider's answer
    pub used_fallback_metrics: bool,
    pub elapsed: Duration,
}

/// @ai:intent Runs validation, generation, composition and delivery under one timeout
pub struct EvaluationPipeline<C: TextCompletion, M: Mailer> {
    completion: Arc<C>,
    mailer: Arc<M>,
    renderer: Arc<dyn ChartRenderer>,
    prompts: PromptBuilder,
    metrics_parser: MetricsParser,
    narrative_parser: NarrativeParser,
    chart_specs: ChartSpecBuilder,
    composer: ReportComposer,
    settings: PipelineSettings,
}

impl<C: TextCompletion, M: Mailer> EvaluationPipeline<C, M> {
    /// @ai:intent Create a pipeline from explicitly constructed collaborators
    /// @ai:effects pure
    pub fn new(
        completion: Arc<C>,
        mailer: Arc<M>,
        renderer: Arc<dyn ChartRenderer>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            completion,
            mailer,
            renderer,
            prompts: PromptBuilder::new(),
            metrics_parser: MetricsParser::new(),
            narrative_parser: NarrativeParser::new(),
            chart_specs: ChartSpecBuilder::new(settings.chart_options.clone()),
            composer: ReportComposer::new(),
            settings,
        }
    }

    /// @ai:intent Evaluate an idea and email the report to the submitter
    /// @ai:pre none; the submission is validated before any external call
    /// @ai:post on timeout no delivery has been attempted by this call after expiry
    /// @ai:effects network
    pub async fn evaluate(
        &self,
        submission: &IdeaSubmission,
    ) -> Result<EvaluationOutcome, PipelineError> {
        submission.validate()?;

        let request_id = Uuid::new_v4();
        let started = Instant::now();
        tracing::info!(
            %request_id,
            idea_words = word_count(&submission.idea_text),
            "evaluation started"
        );

        match tokio::time::timeout(self.settings.timeout, self.run(request_id, submission, started))
            .await
        {
            Ok(Ok(outcome)) => {
                tracing::info!(
                    %request_id,
                    elapsed_ms = outcome.elapsed.as_millis() as u64,
                    fallback_metrics = outcome.used_fallback_metrics,
                    "evaluation delivered"
                );
                Ok(outcome)
            }
            Ok(Err(e)) => {
                tracing::error!(%request_id, kind = e.kind(), "evaluation failed: {}", e);
                Err(e)
            }
            Err(_) => {
                tracing::warn!(
                    %request_id,
                    timeout_secs = self.settings.timeout.as_secs(),
                    "evaluation timed out"
                );
                Err(PipelineError::Timeout(self.settings.timeout))
            }
        }
    }

    async fn run(
        &self,
        request_id: Uuid,
        submission: &IdeaSubmission,
        started: Instant,
    ) -> Result<EvaluationOutcome, PipelineError> {
        let prompts = self.prompts.build(&submission.idea_text);

        let (narrative, metrics_text) = tokio::join!(
            self.completion.complete(&prompts.narrative),
            self.completion.complete(&prompts.metrics)
        );
        let narrative = narrative?;
        tracing::debug!(%request_id, narrative_len = narrative.len(), "completions received");

        let ParsedMetrics {
            report: metrics,
            used_fallback: used_fallback_metrics,
        } = match metrics_text {
            Ok(raw) => self.metrics_parser.parse(&raw),
            Err(e) => {
                tracing::warn!(%request_id, "Metrics completion failed, using fallback: {}", e);
                ParsedMetrics::fallback()
            }
        };

        let sections = self.narrative_parser.parse_complete(&narrative)?;
        let specs = self.chart_specs.build(&metrics);
        let charts = self.renderer.render_all(&specs)?;
        let report = self.composer.compose(&sections, &charts, Utc::now())?;
        tracing::debug!(%request_id, html_len = report.html().len(), "report composed");

        let message = EmailMessage {
            to: submission.email.trim().to_string(),
            subject: self.settings.report_subject.clone(),
            html: report.html().to_string(),
        };
        let receipt = self.mailer.send(&message).await?;

        Ok(EvaluationOutcome {
            request_id,
            receipt,
            report,
            metrics,
            used_fallback_metrics,
            elapsed: started.elapsed(),
        })
    }

    /// @ai:intent Relay a contact-form message to the owner inbox
    /// @ai:effects network
    pub async fn relay_contact(
        &self,
        contact: &ContactMessage,
    ) -> Result<DeliveryReceipt, PipelineError> {
        contact.validate()?;

        let message = EmailMessage {
            to: self.settings.owner_inbox.clone(),
            subject: self.settings.contact_subject.clone(),
            html: contact_message_html(contact.email.trim(), &contact.message),
        };

        match tokio::time::timeout(self.settings.timeout, self.mailer.send(&message)).await {
            Ok(Ok(receipt)) => {
                tracing::info!(message_len = contact.message.len(), "contact message relayed");
                Ok(receipt)
            }
            Ok(Err(e)) => {
                tracing::error!("contact relay failed: {}", e);
                Err(e.into())
            }
            Err(_) => Err(PipelineError::Timeout(self.settings.timeout)),
        }
    }
}

/// @ai:intent Build the production pipeline from configuration and credentials
/// @ai:effects pure
pub fn create_pipeline(
    config: &AppConfig,
    credentials: &Credentials,
) -> anyhow::Result<EvaluationPipeline<GeminiClient, HttpMailer>> {
    let completion = GeminiClient::new(
        config.completion.clone(),
        credentials.completion_api_key.clone(),
    )
    .context("Failed to build completion client")?;

    let mailer = HttpMailer::new(
        &config.delivery,
        credentials.delivery_api_key.clone(),
        credentials.sender.clone(),
    )
    .context("Failed to build delivery client")?;

    Ok(EvaluationPipeline::new(
        Arc::new(completion),
        Arc::new(mailer),
        renderer_from_config(&config.charts),
        PipelineSettings::from(config),
    ))
}
