//! @ai:module:intent Idea evaluation service library
//! @ai:module:layer application
//! @ai:module:public_api config, validation, prompt, completion, metrics, charts, narrative, report, delivery, pipeline, server

pub mod charts;
pub mod completion;
pub mod config;
pub mod delivery;
pub mod error;
pub mod metrics;
pub mod narrative;
pub mod pipeline;
pub mod prompt;
pub mod report;
pub mod server;
pub mod validation;

pub use charts::{ChartRenderer, ChartSpec, RenderError};
pub use completion::{GeminiClient, MockCompletionClient, TextCompletion};
pub use config::{AppConfig, Credentials};
pub use delivery::{HttpMailer, Mailer, MockMailer};
pub use error::PipelineError;
pub use metrics::{MetricsParser, MetricsReport};
pub use narrative::{NarrativeParser, NarrativeSections};
pub use pipeline::{create_pipeline, EvaluationOutcome, EvaluationPipeline, PipelineSettings};
pub use prompt::{PromptBuilder, SectionId};
pub use report::{ComposedReport, MarkdownFormatter, ReportComposer};
pub use validation::{ContactMessage, IdeaSubmission, ValidationErrors};
