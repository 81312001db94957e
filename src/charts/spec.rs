//! @ai:module:intent Map a MetricsReport onto the four fixed chart specifications
//! @ai:module:layer domain
//! @ai:module:public_api ChartKind, ChartSlot, ChartSpec, RenderOptions, ChartSpecBuilder, humanize_label
//! @ai:module:stateless true

use crate::config::ChartConfig;
use crate::metrics::{MetricMap, MetricsReport};
use crate::prompt::SectionId;
use serde::Serialize;

/// @ai:intent Visual form of a chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Radar,
    Bar,
    Doughnut,
    Line,
}

impl ChartKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Radar => "radar",
            ChartKind::Bar => "bar",
            ChartKind::Doughnut => "doughnut",
            ChartKind::Line => "line",
        }
    }
}

impl std::fmt::Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// @ai:intent One of the four fixed chart positions in a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartSlot {
    CategoryScores,
    MarketAnalysis,
    ImplementationTimeline,
    RevenueProjection,
}

impl ChartSlot {
    pub const ALL: [ChartSlot; 4] = [
        ChartSlot::CategoryScores,
        ChartSlot::MarketAnalysis,
        ChartSlot::ImplementationTimeline,
        ChartSlot::RevenueProjection,
    ];

    pub fn kind(&self) -> ChartKind {
        match self {
            ChartSlot::CategoryScores => ChartKind::Radar,
            ChartSlot::MarketAnalysis => ChartKind::Bar,
            ChartSlot::ImplementationTimeline => ChartKind::Doughnut,
            ChartSlot::RevenueProjection => ChartKind::Line,
        }
    }

    /// Narrative section the chart is placed under
    pub fn anchor(&self) -> SectionId {
        match self {
            ChartSlot::CategoryScores => SectionId::ProjectOverview,
            ChartSlot::MarketAnalysis => SectionId::MarketAnalysis,
            ChartSlot::ImplementationTimeline => SectionId::ImplementationChallenges,
            ChartSlot::RevenueProjection => SectionId::FinancialAnalysis,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ChartSlot::CategoryScores => "Category Performance Analysis",
            ChartSlot::MarketAnalysis => "Market Analysis Overview",
            ChartSlot::ImplementationTimeline => "Implementation Timeline",
            ChartSlot::RevenueProjection => "5-Year Revenue Projection",
        }
    }

    pub fn dataset_label(&self) -> &'static str {
        match self {
            ChartSlot::CategoryScores => "Category Scores",
            ChartSlot::MarketAnalysis => "Market Analysis",
            ChartSlot::ImplementationTimeline => "Implementation Timeline",
            ChartSlot::RevenueProjection => "Projected Revenue",
        }
    }

    /// Sub-heading shown above the chart in the report
    pub fn heading(&self) -> &'static str {
        match self {
            ChartSlot::CategoryScores => "Category Performance Overview",
            ChartSlot::MarketAnalysis => "Market Overview",
            ChartSlot::ImplementationTimeline => "Implementation Timeline",
            ChartSlot::RevenueProjection => "Revenue Projection",
        }
    }

    pub fn alt_text(&self) -> &'static str {
        match self {
            ChartSlot::CategoryScores => "Category Scores",
            ChartSlot::MarketAnalysis => "Market Analysis",
            ChartSlot::ImplementationTimeline => "Implementation Timeline",
            ChartSlot::RevenueProjection => "Revenue Projection",
        }
    }

    pub fn caption(&self) -> &'static str {
        match self {
            ChartSlot::CategoryScores => {
                "Radar chart showing performance across different evaluation categories"
            }
            ChartSlot::MarketAnalysis => {
                "Bar chart comparing current market size, projected growth, and competition level"
            }
            ChartSlot::ImplementationTimeline => {
                "Breakdown of the implementation phases and their relative durations"
            }
            ChartSlot::RevenueProjection => "5-year revenue projection trend",
        }
    }

    /// Upper bound of the value axis, when the metric has one
    pub fn scale_max(&self) -> Option<f64> {
        match self {
            ChartSlot::CategoryScores => Some(10.0),
            ChartSlot::MarketAnalysis => Some(100.0),
            ChartSlot::ImplementationTimeline | ChartSlot::RevenueProjection => None,
        }
    }

    fn source<'a>(&self, report: &'a MetricsReport) -> &'a MetricMap {
        match self {
            ChartSlot::CategoryScores => &report.category_scores,
            ChartSlot::MarketAnalysis => &report.market_analysis,
            ChartSlot::ImplementationTimeline => &report.implementation_timeline,
            ChartSlot::RevenueProjection => &report.revenue_projection,
        }
    }
}

/// @ai:intent Output dimensions and background for the renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    pub background: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 400,
            height: 300,
            background: "white".to_string(),
        }
    }
}

impl From<&ChartConfig> for RenderOptions {
    fn from(config: &ChartConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            background: config.background.clone(),
        }
    }
}

/// @ai:intent Renderer-neutral description of one chart
/// @ai:invariant labels.len() == series.len()
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub slot: ChartSlot,
    pub kind: ChartKind,
    pub title: String,
    pub labels: Vec<String>,
    pub series: Vec<f64>,
    pub options: RenderOptions,
}

/// @ai:intent Builds chart specs deterministically from metrics
#[derive(Debug, Clone, Default)]
pub struct ChartSpecBuilder {
    options: RenderOptions,
}

impl ChartSpecBuilder {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// @ai:intent Build the spec for one slot
    /// @ai:post labels follow the source mapping's key order
    /// @ai:effects pure
    pub fn build_slot(&self, slot: ChartSlot, report: &MetricsReport) -> ChartSpec {
        let source = slot.source(report);
        ChartSpec {
            slot,
            kind: slot.kind(),
            title: slot.title().to_string(),
            labels: source.keys().map(|k| humanize_label(k)).collect(),
            series: source.values().copied().collect(),
            options: self.options.clone(),
        }
    }

    /// @ai:intent Build all four specs in slot order
    /// @ai:effects pure
    pub fn build(&self, report: &MetricsReport) -> Vec<ChartSpec> {
        ChartSlot::ALL
            .iter()
            .map(|slot| self.build_slot(*slot, report))
            .collect()
    }
}

/// @ai:intent Turn a metric key into a display label (`marketPotential` -> `Market Potential`, `year1` -> `Year 1`)
/// @ai:effects pure
pub fn humanize_label(key: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev: Option<char> = None;

    for ch in key.chars() {
        if ch == '_' || ch == '-' || ch.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev = None;
            continue;
        }

        let boundary = match prev {
            Some(p) => {
                (ch.is_uppercase() && (p.is_lowercase() || p.is_ascii_digit()))
                    || (ch.is_ascii_digit() && p.is_alphabetic())
            }
            None => false,
        };
        if boundary && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.push(ch);
        prev = Some(ch);
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
        .iter()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
