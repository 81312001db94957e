//! @ai:module:intent Convert model markdown into inline-styled email HTML
//! @ai:module:layer application
//! @ai:module:public_api MarkdownFormatter, FormatError, escape_html
//! @ai:module:stateless true

use crate::narrative::recognize_heading;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

const H1_STYLE: &str = "color: #2C3E50; font-size: 24px; margin-top: 24px; margin-bottom: 16px; border-bottom: 2px solid #ECF0F1; padding-bottom: 8px;";
const H2_STYLE: &str = "color: #2C3E50; font-size: 20px; margin-top: 20px; margin-bottom: 12px;";
const H3_STYLE: &str = "color: #2C3E50; font-size: 18px; margin-top: 16px; margin-bottom: 10px;";
const P_STYLE: &str = "margin: 16px 0; line-height: 1.6;";
const UL_STYLE: &str = "margin: 12px 0; padding-left: 20px; list-style-type: disc;";
const LI_STYLE: &str = "margin: 8px 0; line-height: 1.5;";
const STRONG_STYLE: &str = "color: #2C3E50;";

/// Tags the formatter emits and must balance
const CHECKED_TAGS: [&str; 7] = ["p", "ul", "li", "h1", "h2", "h3", "strong"];

static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^<>]*>").expect("tag pattern is valid"));
static OWN_TAGS: LazyLock<Vec<String>> = LazyLock::new(|| {
    let styled = [
        ("h1", H1_STYLE),
        ("h2", H2_STYLE),
        ("h3", H3_STYLE),
        ("p", P_STYLE),
        ("ul", UL_STYLE),
        ("li", LI_STYLE),
        ("strong", STRONG_STYLE),
    ];
    let mut tags: Vec<String> = styled
        .iter()
        .flat_map(|(tag, style)| [format!("<{tag} style=\"{style}\">"), format!("</{tag}>")])
        .collect();
    tags.push("<br>".to_string());
    tags
});
static FINAL_RECOMMENDATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\*\*)?Final\s+[Rr]ecommendation:?(?:\*\*)?:?\s*(.*)$")
        .expect("final recommendation pattern is valid")
});
static NUMBERED_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#{1,3}\s*(?:\*\*)?\s*(\d+\.\s+.+?)\s*(?:\*\*)?\s*$")
        .expect("numbered heading pattern is valid")
});
static HASH_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#{1,6}\s*(?:\*\*)?\s*(.+?)\s*(?:\*\*)?\s*$").expect("hash heading pattern is valid")
});
static BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-*]\s+(.+)$").expect("bullet pattern is valid"));
static LABEL_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\*\*)?([A-Za-z][A-Za-z0-9 ]*:)(?:\*\*)?$").expect("label pattern is valid")
});
static KEYWORD_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][^.!?<>]*\b(?:Overview|Analysis|Timeline|Projection)\b[^.!?<>]*$")
        .expect("keyword heading pattern is valid")
});
static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("bold pattern is valid"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));
static BETWEEN_TAGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r">\s+<").expect("between tags pattern is valid"));

/// Keyword headings longer than this are treated as prose
const MAX_KEYWORD_HEADING_WORDS: usize = 8;

/// @ai:intent Structured formatting could not produce well-formed markup
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("Unbalanced <{0}> tags in formatted output")]
    Unbalanced(&'static str),
}

/// @ai:intent Escape text for inclusion in HTML content or attribute values
/// @ai:effects pure
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[derive(Debug, PartialEq)]
enum Line<'a> {
    Blank,
    Formatted(&'a str),
    H1(String),
    H2(String),
    H3(String),
    Item(String),
    Text(String),
}

/// @ai:intent Line-oriented markdown-to-HTML conversion with a safe fallback
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkdownFormatter;

impl MarkdownFormatter {
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Format text, falling back to escaped text with line breaks on failure
    /// @ai:post output is always well-formed HTML
    /// @ai:effects pure
    pub fn format(&self, text: &str) -> String {
        match self.try_format(text) {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!("Falling back to plain formatting: {}", e);
                escape_html(text.trim()).replace("\r\n", "\n").replace('\n', "<br>")
            }
        }
    }

    /// @ai:intent Structured formatting; headings are classified before inline bold
    /// @ai:post formatting its own output returns it unchanged; any other markup is escaped
    /// @ai:effects pure
    pub fn try_format(&self, text: &str) -> Result<String, FormatError> {
        let normalized = text.replace("\r\n", "\n");
        let mut blocks: Vec<String> = Vec::new();
        let mut paragraph: Vec<String> = Vec::new();
        let mut list: Vec<String> = Vec::new();

        for raw in normalized.lines() {
            match Self::classify(raw) {
                Line::Blank => Self::flush(&mut paragraph, &mut list, &mut blocks),
                Line::Item(item) => {
                    Self::flush_paragraph(&mut paragraph, &mut blocks);
                    list.push(format!("<li style=\"{LI_STYLE}\">{item}</li>"));
                }
                Line::Text(text) => {
                    Self::flush_list(&mut list, &mut blocks);
                    paragraph.push(text);
                }
                Line::Formatted(html) => {
                    Self::flush(&mut paragraph, &mut list, &mut blocks);
                    blocks.push(html.to_string());
                }
                Line::H1(t) => {
                    Self::flush(&mut paragraph, &mut list, &mut blocks);
                    blocks.push(format!("<h1 style=\"{H1_STYLE}\">{t}</h1>"));
                }
                Line::H2(t) => {
                    Self::flush(&mut paragraph, &mut list, &mut blocks);
                    blocks.push(format!("<h2 style=\"{H2_STYLE}\">{t}</h2>"));
                }
                Line::H3(t) => {
                    Self::flush(&mut paragraph, &mut list, &mut blocks);
                    blocks.push(format!("<h3 style=\"{H3_STYLE}\">{t}</h3>"));
                }
            }
        }
        Self::flush(&mut paragraph, &mut list, &mut blocks);

        let joined = blocks.join("\n");
        let collapsed = WHITESPACE.replace_all(joined.trim(), " ");
        let mut html = BETWEEN_TAGS.replace_all(&collapsed, "><").into_owned();
        if !html.is_empty() && !html.starts_with('<') {
            html = format!("<p style=\"{P_STYLE}\">{html}</p>");
        }

        Self::check_balanced(&html)?;
        Ok(html)
    }

    fn classify(raw: &str) -> Line<'_> {
        let line = raw.trim();
        if line.is_empty() || line.chars().all(|c| c == '#') {
            return Line::Blank;
        }
        if Self::is_own_markup(line) {
            return Line::Formatted(line);
        }
        if let Some(caps) = FINAL_RECOMMENDATION.captures(line) {
            let rest = Self::inline(&caps[1]);
            let text = if rest.is_empty() {
                "Final Recommendation".to_string()
            } else {
                format!("Final Recommendation: {rest}")
            };
            return Line::H1(text);
        }
        if let Some(caps) = NUMBERED_HEADING.captures(line) {
            return Line::H1(Self::inline(&caps[1]));
        }
        if let Some((id, heading)) = recognize_heading(line) {
            return Line::H1(Self::inline(&format!("{}. {}", id.number(), heading)));
        }
        if let Some(caps) = HASH_HEADING.captures(line) {
            return Line::H2(Self::inline(&caps[1]));
        }
        if let Some(caps) = BULLET.captures(line) {
            return Line::Item(Self::inline(&caps[1]));
        }
        if let Some(caps) = LABEL_HEADING.captures(line) {
            return Line::H3(escape_html(&caps[1]));
        }
        if KEYWORD_HEADING.is_match(line)
            && line.split_whitespace().count() <= MAX_KEYWORD_HEADING_WORDS
        {
            return Line::H2(Self::inline(line));
        }
        Line::Text(Self::inline(line))
    }

    /// @ai:intent Level-one heading for a report section
    /// @ai:effects pure
    pub fn section_heading(&self, text: &str) -> String {
        format!("<h1 style=\"{H1_STYLE}\">{}</h1>", escape_html(text))
    }

    /// @ai:effects pure
    pub fn subheading(&self, text: &str) -> String {
        format!("<h2 style=\"{H2_STYLE}\">{}</h2>", escape_html(text))
    }

    /// A line built only from tags this formatter emits
    fn is_own_markup(line: &str) -> bool {
        line.starts_with('<')
            && TAG
                .find_iter(line)
                .all(|tag| OWN_TAGS.iter().any(|own| own == tag.as_str()))
            && !TAG.replace_all(line, "").contains(['<', '>'])
    }

    /// Escape, then apply bold
    fn inline(text: &str) -> String {
        let escaped = escape_html(text.trim());
        BOLD.replace_all(&escaped, format!("<strong style=\"{STRONG_STYLE}\">${{1}}</strong>"))
            .into_owned()
    }

    fn flush(paragraph: &mut Vec<String>, list: &mut Vec<String>, blocks: &mut Vec<String>) {
        Self::flush_paragraph(paragraph, blocks);
        Self::flush_list(list, blocks);
    }

    fn flush_paragraph(paragraph: &mut Vec<String>, blocks: &mut Vec<String>) {
        if !paragraph.is_empty() {
            blocks.push(format!("<p style=\"{P_STYLE}\">{}</p>", paragraph.join("<br>")));
            paragraph.clear();
        }
    }

    fn flush_list(list: &mut Vec<String>, blocks: &mut Vec<String>) {
        if !list.is_empty() {
            blocks.push(format!("<ul style=\"{UL_STYLE}\">{}</ul>", list.concat()));
            list.clear();
        }
    }

    fn check_balanced(html: &str) -> Result<(), FormatError> {
        for tag in CHECKED_TAGS {
            let opened =
                html.matches(&format!("<{tag} ")).count() + html.matches(&format!("<{tag}>")).count();
            let closed = html.matches(&format!("</{tag}>")).count();
            if opened != closed {
                return Err(FormatError::Unbalanced(tag));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::sample_narrative;
    use pretty_assertions::assert_eq;

    fn format(text: &str) -> String {
        MarkdownFormatter::new().try_format(text).unwrap()
    }

    #[test]
    fn test_numbered_heading_becomes_h1() {
        let html = format("# 3. Market Analysis");
        assert_eq!(html, format!("<h1 style=\"{H1_STYLE}\">3. Market Analysis</h1>"));
    }

    #[test]
    fn test_plain_section_heading_becomes_h1() {
        let html = format("**4. Financial Analysis**");
        assert!(html.starts_with("<h1"));
        assert!(html.contains(">4. Financial Analysis</h1>"));
        assert!(!html.contains("<strong"));
    }

    #[test]
    fn test_keyword_subheading_becomes_h2() {
        assert!(format("Market Overview").starts_with("<h2"));
        assert!(format("## Revenue Projection").starts_with("<h2"));
        assert!(format("Competitive Analysis of the sector is still early.").starts_with("<p"));
    }

    #[test]
    fn test_final_recommendation_and_labels() {
        let html = format("Final Recommendation: Proceed\nKey obstacles:");
        assert!(html.contains(">Final Recommendation: Proceed</h1>"));
        assert!(html.contains(&format!("<h3 style=\"{H3_STYLE}\">Key obstacles:</h3>")));
    }

    #[test]
    fn test_bullets_grouped_into_one_list() {
        let html = format("- one\n* two\n- **three**\n\nafter");
        assert_eq!(html.matches("<ul").count(), 1);
        assert_eq!(html.matches("<li").count(), 3);
        assert!(html.contains("<strong style=\"color: #2C3E50;\">three</strong>"));
        assert!(html.ends_with(&format!("<p style=\"{P_STYLE}\">after</p>")));
    }

    #[test]
    fn test_paragraph_lines_joined_with_breaks() {
        let html = format("first line\nsecond line\n\n\n\nnext block");
        assert_eq!(
            html,
            format!(
                "<p style=\"{P_STYLE}\">first line<br>second line</p><p style=\"{P_STYLE}\">next block</p>"
            )
        );
    }

    #[test]
    fn test_text_is_escaped() {
        let html = format("Fees < 5% & \"no\" lock-in");
        assert!(html.contains("Fees &lt; 5% &amp; &quot;no&quot; lock-in"));
    }

    #[test]
    fn test_stray_hash_lines_dropped() {
        assert_eq!(format("#\n##\nbody"), format("body"));
    }

    #[test]
    fn test_format_is_idempotent() {
        let formatter = MarkdownFormatter::new();
        let once = formatter.format(&sample_narrative());
        let twice = formatter.format(&once);
        assert_eq!(once, twice);
        assert!(once.starts_with('<'));
    }

    #[test]
    fn test_model_markup_is_escaped() {
        let html = format("<p>Regulatory risk is moderate.");
        assert_eq!(
            html,
            format!("<p style=\"{P_STYLE}\">&lt;p&gt;Regulatory risk is moderate.</p>")
        );

        let div = r#"<div style="margin: 20px 0;"><img src="x" alt="y"></div>"#;
        let html = format(div);
        assert!(!html.contains("<img"));
        assert!(html.contains("&lt;img src=&quot;x&quot;"));
    }

    #[test]
    fn test_section_label_with_recap_keeps_text() {
        let html = format("Summary so far.\n**Market Analysis:** 8/10 strong regional demand");
        assert!(!html.contains("<h1"));
        assert!(html.contains("8/10 strong regional demand"));
        assert!(html.contains("<strong style=\"color: #2C3E50;\">Market Analysis:</strong>"));
    }

    #[test]
    fn test_section_heading_with_note_keeps_note() {
        let html = format("**8. Overall Score (1-10)**");
        assert!(html.contains(">8. Overall Score (1-10)</h1>"));
    }

    #[test]
    fn test_unbalanced_markup_falls_back_to_escaped_text() {
        let formatter = MarkdownFormatter::new();
        let open = format!("<p style=\"{P_STYLE}\">never closed");
        assert_eq!(formatter.try_format(&open), Err(FormatError::Unbalanced("p")));
        assert_eq!(
            formatter.format(&format!("{open}\nline two")),
            format!("&lt;p style=&quot;{P_STYLE}&quot;&gt;never closed<br>line two")
        );
    }

    #[test]
    fn test_section_and_subheadings_are_escaped() {
        let formatter = MarkdownFormatter::new();
        assert_eq!(
            formatter.section_heading("3. Market & Sales"),
            format!("<h1 style=\"{H1_STYLE}\">3. Market &amp; Sales</h1>")
        );
        assert!(formatter.subheading("Revenue Projection").starts_with("<h2 style="));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(format("  \n\n"), "");
    }
}
