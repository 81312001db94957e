//! @ai:module:intent Fixed-shape numeric summary of an idea evaluation
//! @ai:module:layer domain
//! @ai:module:public_api MetricsReport, MetricMap
//! @ai:module:stateless true

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Named values in provider order
pub type MetricMap = IndexMap<String, f64>;

/// @ai:intent Numeric summary driving the report charts
/// @ai:invariant every top-level key is present; absent keys reject the whole record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsReport {
    /// 0-10
    pub overall_score: f64,
    pub category_scores: MetricMap,
    /// Percentages
    pub market_analysis: MetricMap,
    /// Phase weights, summing loosely to 100
    pub implementation_timeline: MetricMap,
    /// Percentages
    pub cost_breakdown: MetricMap,
    /// Year label to currency amount
    pub revenue_projection: MetricMap,
}

fn metric_map(entries: &[(&str, f64)]) -> MetricMap {
    entries
        .iter()
        .map(|(name, value)| (name.to_string(), *value))
        .collect()
}

impl MetricsReport {
    /// @ai:intent Deterministic stand-in used whenever provider metrics are unusable
    /// @ai:effects pure
    pub fn fallback() -> Self {
        Self {
            overall_score: 7.0,
            category_scores: metric_map(&[
                ("innovation", 7.0),
                ("marketPotential", 7.0),
                ("feasibility", 6.0),
                ("scalability", 7.0),
                ("profitability", 6.0),
            ]),
            market_analysis: metric_map(&[
                ("currentMarketSize", 60.0),
                ("projectedGrowth", 75.0),
                ("competitionLevel", 65.0),
            ]),
            implementation_timeline: metric_map(&[
                ("planning", 20.0),
                ("development", 40.0),
                ("testing", 20.0),
                ("launch", 20.0),
            ]),
            cost_breakdown: metric_map(&[
                ("development", 40.0),
                ("marketing", 25.0),
                ("operations", 25.0),
                ("other", 10.0),
            ]),
            revenue_projection: metric_map(&[
                ("year1", 50_000.0),
                ("year2", 120_000.0),
                ("year3", 250_000.0),
                ("year4", 400_000.0),
                ("year5", 600_000.0),
            ]),
        }
    }

    /// Mappings paired with their wire names, in declaration order
    pub fn sections(&self) -> [(&'static str, &MetricMap); 5] {
        [
            ("categoryScores", &self.category_scores),
            ("marketAnalysis", &self.market_analysis),
            ("implementationTimeline", &self.implementation_timeline),
            ("costBreakdown", &self.cost_breakdown),
            ("revenueProjection", &self.revenue_projection),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_serializes_with_wire_names() {
        let json = serde_json::to_value(MetricsReport::fallback()).unwrap();
        assert_eq!(json["overallScore"], 7.0);
        assert_eq!(json["categoryScores"]["marketPotential"], 7.0);
        assert_eq!(json["revenueProjection"]["year5"], 600_000.0);
    }

    #[test]
    fn test_fallback_timeline_sums_to_hundred() {
        let total: f64 = MetricsReport::fallback().implementation_timeline.values().sum();
        assert!((total - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_key_order_preserved_on_deserialize() {
        let json = r#"{
            "overallScore": 5,
            "categoryScores": {"zeta": 1, "alpha": 2},
            "marketAnalysis": {"b": 1},
            "implementationTimeline": {"a": 1},
            "costBreakdown": {"c": 1},
            "revenueProjection": {"year2": 1, "year1": 2}
        }"#;
        let report: MetricsReport = serde_json::from_str(json).unwrap();
        let keys: Vec<_> = report.category_scores.keys().cloned().collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }
}
