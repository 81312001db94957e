//! @ai:module:intent Prompt construction for the completion provider
//! @ai:module:layer application
//! @ai:module:public_api PromptBuilder, PromptPair, SectionId

pub mod builder;
pub mod sections;

pub use builder::{
    default_metrics_template, default_narrative_template, PromptBuilder, PromptPair,
    METRICS_PROMPT_MARKER,
};
pub use sections::SectionId;
