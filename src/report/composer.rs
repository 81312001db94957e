//! @ai:module:intent Merge narrative sections and rendered charts into the report document
//! @ai:module:layer application
//! @ai:module:public_api ReportComposer, ComposedReport, ComposeError
//! @ai:module:stateless true

use crate::charts::{ChartSlot, RenderedChart};
use crate::narrative::{NarrativeSection, NarrativeSections};
use crate::prompt::SectionId;
use crate::report::formatter::{escape_html, MarkdownFormatter};
use crate::report::template::report_document;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// @ai:intent Inputs could not be merged without dropping content
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ComposeError {
    #[error("Section '{}' is required as a chart anchor", .0.title())]
    MissingSection(SectionId),

    #[error("No rendered chart for slot '{}'", .0.title())]
    MissingChart(ChartSlot),
}

/// @ai:intent Complete HTML email body for one evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedReport {
    html: String,
}

impl ComposedReport {
    pub fn html(&self) -> &str {
        &self.html
    }

    /// Number of chart images embedded in the document
    pub fn image_count(&self) -> usize {
        self.html.matches("<img ").count()
    }
}

/// @ai:intent Builds the report from structured sections, placing charts by section id
#[derive(Debug, Default, Clone, Copy)]
pub struct ReportComposer {
    formatter: MarkdownFormatter,
}

impl ReportComposer {
    pub fn new() -> Self {
        Self::default()
    }

    /// @ai:intent Format each section on its own and append its chart blocks
    /// @ai:pre every chart anchor section and every chart slot is present
    /// @ai:post each chart block follows its anchor section's body, before the next section heading
    /// @ai:effects pure
    pub fn compose_body(
        &self,
        sections: &NarrativeSections,
        charts: &[RenderedChart],
    ) -> Result<String, ComposeError> {
        for slot in ChartSlot::ALL {
            if sections.get(slot.anchor()).is_none() {
                return Err(ComposeError::MissingSection(slot.anchor()));
            }
            if !charts.iter().any(|c| c.slot == slot) {
                return Err(ComposeError::MissingChart(slot));
            }
        }

        let mut body = String::new();
        for section in sections.iter() {
            body.push_str(&self.formatter.section_heading(&Self::section_title(section)));
            body.push_str(&self.formatter.format(&section.body));

            // Chart markup never passes through the formatter
            for chart in charts.iter().filter(|c| c.slot.anchor() == section.id) {
                body.push_str(&self.formatter.subheading(chart.slot.heading()));
                body.push_str(&Self::chart_block(chart));
            }
        }
        Ok(body)
    }

    /// @ai:intent Produce the finished HTML report
    /// @ai:effects pure
    pub fn compose(
        &self,
        sections: &NarrativeSections,
        charts: &[RenderedChart],
        generated_at: DateTime<Utc>,
    ) -> Result<ComposedReport, ComposeError> {
        let body = self.compose_body(sections, charts)?;
        Ok(ComposedReport {
            html: report_document(&body, generated_at),
        })
    }

    fn section_title(section: &NarrativeSection) -> String {
        if section.heading.eq_ignore_ascii_case(section.id.title()) {
            section.id.to_string()
        } else {
            format!("{}. {}", section.id.number(), section.heading)
        }
    }

    fn chart_block(chart: &RenderedChart) -> String {
        format!(
            r#"<div style="margin: 20px 0; text-align: center;"><img src="{src}" alt="{alt}" style="max-width: 100%; height: auto; margin: 15px auto; display: block;"><p style="color: #666; font-size: 14px;">{caption}</p></div>"#,
            src = escape_html(&chart.src),
            alt = chart.slot.alt_text(),
            caption = chart.slot.caption(),
        )
    }
}
