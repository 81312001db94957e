//! @ai:module:intent Split narrative completion text into the fixed analysis sections
//! @ai:module:layer application
//! @ai:module:public_api NarrativeParser, NarrativeError, recognize_heading
//! @ai:module:stateless true

use crate::narrative::sections::{NarrativeSection, NarrativeSections};
use crate::prompt::SectionId;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

static HEADING_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(?P<hashes>#{1,6})?\s*(?P<bold>\*\*)?\s*(?:(?P<num>\d{1,2})\.\s*)?(?P<title>.+?)\s*(?:\*\*)?\s*:?\s*$",
    )
    .expect("heading pattern is valid")
});

static PARENTHETICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\([^()]*\)$").expect("parenthetical pattern is valid"));

/// @ai:intent Narrative did not contain every expected section
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NarrativeError {
    #[error("Analysis is missing sections: {}", titles(.0).join(", "))]
    MissingSections(Vec<SectionId>),
}

fn titles(ids: &[SectionId]) -> Vec<&'static str> {
    ids.iter().map(|id| id.title()).collect()
}

/// @ai:intent Identify a line as the heading of one of the fixed sections
/// @ai:post returns the section and the undecorated heading text
/// @ai:effects pure
pub fn recognize_heading(line: &str) -> Option<(SectionId, String)> {
    let caps = HEADING_LINE.captures(line)?;
    let decorated =
        caps.name("hashes").is_some() || caps.name("bold").is_some() || caps.name("num").is_some();
    if !decorated {
        return None;
    }

    let hashed = caps.name("hashes").is_some();
    let title = caps["title"].trim_end_matches([':', '*']).trim();
    let lower = title.to_lowercase();
    let id = SectionId::ALL.into_iter().find(|id| {
        lower
            .strip_prefix(&id.title().to_lowercase())
            .is_some_and(|rest| only_decoration_follows(rest.trim_start(), hashed))
    })?;
    Some((id, title.to_string()))
}

// A bold or numbered label followed by prose is body text, not a heading.
// Only a `#` line may carry a subtitle after the section title.
fn only_decoration_follows(rest: &str, hashed: bool) -> bool {
    if rest.is_empty() || PARENTHETICAL.is_match(rest) {
        return true;
    }
    hashed && rest.starts_with(['-', '–', ':', '/']) && !rest.contains("**")
}

/// @ai:intent Turns model narrative text into NarrativeSections
#[derive(Debug, Default, Clone, Copy)]
pub struct NarrativeParser;

impl NarrativeParser {
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Collect every recognised section with the text up to the next heading
    /// @ai:post text before the first heading is discarded; a repeated heading stays in the body
    /// @ai:effects pure
    pub fn parse(&self, text: &str) -> NarrativeSections {
        let mut sections = NarrativeSections::new();
        let mut current: Option<(SectionId, String)> = None;
        let mut body: Vec<&str> = Vec::new();

        for line in text.lines() {
            if let Some((id, heading)) = recognize_heading(line) {
                let seen = sections.get(id).is_some() || current.as_ref().is_some_and(|c| c.0 == id);
                if !seen {
                    if let Some((prev, prev_heading)) = current.take() {
                        sections.insert(Self::section(prev, prev_heading, &body));
                    }
                    body.clear();
                    current = Some((id, heading));
                    continue;
                }
            }
            if current.is_some() {
                body.push(line);
            }
        }

        if let Some((id, heading)) = current {
            sections.insert(Self::section(id, heading, &body));
        }
        sections
    }

    /// @ai:intent Parse and require all eight sections
    /// @ai:effects pure
    pub fn parse_complete(&self, text: &str) -> Result<NarrativeSections, NarrativeError> {
        let sections = self.parse(text);
        let missing = sections.missing();
        if missing.is_empty() {
            Ok(sections)
        } else {
            Err(NarrativeError::MissingSections(missing))
        }
    }

    fn section(id: SectionId, heading: String, body: &[&str]) -> NarrativeSection {
        NarrativeSection {
            id,
            heading,
            body: body
                .iter()
                .map(|line| line.trim_end())
                .collect::<Vec<_>>()
                .join("\n")
                .trim()
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::mock::sample_narrative;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_recognize_heading_variants() {
        let cases = [
            ("# 1. Project Overview", SectionId::ProjectOverview),
            ("## 3. Market Analysis", SectionId::MarketAnalysis),
            ("**4. Financial Analysis**", SectionId::FinancialAnalysis),
            ("5. Implementation Challenges:", SectionId::ImplementationChallenges),
            ("# Risk Assessment", SectionId::RiskAssessment),
            ("**Overall Score (1-10):**", SectionId::OverallScore),
        ];
        for (line, expected) in cases {
            assert_eq!(recognize_heading(line).map(|(id, _)| id), Some(expected), "{line}");
        }
    }

    #[test]
    fn test_body_lines_are_not_headings() {
        for line in [
            "Market analysis suggests a crowded field.",
            "1. Core concept",
            "3. Market analysis is crowded",
            "Project Overview",
            "**Overall Score:** 7/10 at first glance",
            "**Market Analysis**: demand is strong",
            "3. Market Analysis: demand is strong",
            "",
        ] {
            assert_eq!(recognize_heading(line), None, "{line}");
        }
    }

    #[test]
    fn test_hash_heading_keeps_subtitle() {
        let (id, heading) = recognize_heading("## 6. Risk Assessment: Key Threats").unwrap();
        assert_eq!(id, SectionId::RiskAssessment);
        assert_eq!(heading, "Risk Assessment: Key Threats");
    }

    #[test]
    fn test_bold_label_inside_body_stays_in_section() {
        let text = sample_narrative().replacen(
            "# 2. Technical Requirements",
            "**Overall Score:** 7/10 at first glance\n\n# 2. Technical Requirements",
            1,
        );
        let sections = NarrativeParser::new().parse_complete(&text).unwrap();

        let overview = &sections.get(SectionId::ProjectOverview).unwrap().body;
        assert!(overview.ends_with("**Overall Score:** 7/10 at first glance"), "{overview}");
        let score = &sections.get(SectionId::OverallScore).unwrap().body;
        assert!(!score.contains("first glance"));
        assert!(!score.is_empty());
    }

    #[test]
    fn test_heading_text_is_undecorated() {
        let (_, heading) = recognize_heading("**8. Overall Score (1-10)**").unwrap();
        assert_eq!(heading, "Overall Score (1-10)");
    }

    #[test]
    fn test_parse_sample_narrative_is_complete() {
        let sections = NarrativeParser::new().parse_complete(&sample_narrative()).unwrap();
        assert_eq!(sections.len(), 8);
        assert!(!sections.get(SectionId::ProjectOverview).unwrap().body.is_empty());
    }

    #[test]
    fn test_parse_splits_bodies_between_headings() {
        let text = "Preamble is dropped\n# 1. Project Overview\nA tool.\n\n- fast\n# 2. Technical Requirements\nRust.\n";
        let sections = NarrativeParser::new().parse(text);
        assert_eq!(sections.get(SectionId::ProjectOverview).unwrap().body, "A tool.\n\n- fast");
        assert_eq!(sections.get(SectionId::TechnicalRequirements).unwrap().body, "Rust.");
    }

    #[test]
    fn test_repeated_heading_stays_in_body() {
        let text = "# 1. Project Overview\nfirst\n# 1. Project Overview\nagain";
        let sections = NarrativeParser::new().parse(text);
        assert_eq!(sections.len(), 1);
        assert_eq!(
            sections.get(SectionId::ProjectOverview).unwrap().body,
            "first\n# 1. Project Overview\nagain"
        );
    }

    #[test]
    fn test_missing_sections_reported_in_order() {
        let text = "# 1. Project Overview\nx\n# 8. Overall Score\n9/10";
        let err = NarrativeParser::new().parse_complete(text).unwrap_err();
        let NarrativeError::MissingSections(missing) = err;
        assert_eq!(missing.len(), 6);
        assert_eq!(missing[0], SectionId::TechnicalRequirements);
        assert_eq!(missing[5], SectionId::RiskAssessment);
    }
}
