//! @ai:module:intent Build the narrative and metrics prompts for an idea
//! @ai:module:layer application
//! @ai:module:public_api PromptBuilder, PromptPair
//! @ai:module:stateless true

use crate::prompt::sections::SectionId;
use std::fmt::Write as FmtWrite;

/// Phrase that opens every metrics prompt; lets collaborators tell the two prompts apart
pub const METRICS_PROMPT_MARKER: &str = "respond ONLY with valid JSON";

/// @ai:intent The two prompts issued for one evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub narrative: String,
    pub metrics: String,
}

/// @ai:intent Combines fixed instructional templates with user idea text
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    narrative_template: String,
    metrics_template: String,
}

impl PromptBuilder {
    /// @ai:intent Create a builder using the built-in templates
    /// @ai:effects pure
    pub fn new() -> Self {
        Self {
            narrative_template: default_narrative_template(),
            metrics_template: default_metrics_template(),
        }
    }

    /// @ai:intent Build the long-form analysis prompt
    /// @ai:pre idea has passed validation
    /// @ai:post idea appears verbatim after the template, untruncated and unescaped
    /// @ai:effects pure
    pub fn narrative_prompt(&self, idea: &str) -> String {
        format!("{}\n\nIdea: {}", self.narrative_template, idea)
    }

    /// @ai:intent Build the strict-JSON metrics prompt
    /// @ai:post idea appears verbatim after the template, untruncated and unescaped
    /// @ai:effects pure
    pub fn metrics_prompt(&self, idea: &str) -> String {
        format!("{}\n\nIdea: {}", self.metrics_template, idea)
    }

    pub fn build(&self, idea: &str) -> PromptPair {
        PromptPair {
            narrative: self.narrative_prompt(idea),
            metrics: self.metrics_prompt(idea),
        }
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// @ai:intent Narrative template enumerating every fixed section as a numbered heading
/// @ai:effects pure
pub fn default_narrative_template() -> String {
    let mut template = String::from(
        "Thoroughly evaluate the following business/project idea. \
         Provide analysis in the following structure, using each numbered heading \
         exactly as written on its own line:\n",
    );

    for section in SectionId::ALL {
        let _ = writeln!(template, "# {section}");
        for point in section.prompts() {
            let _ = writeln!(template, "   - {point}");
        }
    }

    template.push_str(
        "\nUse plain paragraphs, \"- \" bullet points and **bold** for emphasis. \
         Do not add sections beyond the ones listed.",
    );
    template
}

/// @ai:intent Metrics template describing the exact JSON object expected back
/// @ai:effects pure
pub fn default_metrics_template() -> String {
    r#"Analyze the following business/project idea and respond ONLY with valid JSON (no markdown, no explanation) in this exact format:
{
  "overallScore": <number 0-10>,
  "categoryScores": {
    "innovation": <number 0-10>,
    "marketPotential": <number 0-10>,
    "feasibility": <number 0-10>,
    "scalability": <number 0-10>,
    "profitability": <number 0-10>
  },
  "marketAnalysis": {
    "currentMarketSize": <percentage 0-100>,
    "projectedGrowth": <percentage 0-100>,
    "competitionLevel": <percentage 0-100>
  },
  "implementationTimeline": {
    "planning": <weight>,
    "development": <weight>,
    "testing": <weight>,
    "launch": <weight>
  },
  "costBreakdown": {
    "development": <percentage>,
    "marketing": <percentage>,
    "operations": <percentage>,
    "other": <percentage>
  },
  "revenueProjection": {
    "year1": <amount in USD>,
    "year2": <amount in USD>,
    "year3": <amount in USD>,
    "year4": <amount in USD>,
    "year5": <amount in USD>
  }
}
The implementationTimeline weights should sum to roughly 100."#
        .to_string()
}
