//! @ai:module:intent Render chart specs as remote chart-image URLs
//! @ai:module:layer infrastructure
//! @ai:module:public_api QuickChartRenderer
//! @ai:module:stateless true

use crate::charts::spec::{ChartKind, ChartSpec};
use crate::charts::{ChartRenderer, RenderError};
use serde_json::{json, Value};
use url::Url;

const TEAL: &str = "rgba(26, 188, 156, 1)";
const TEAL_FILL: &str = "rgba(26, 188, 156, 0.2)";
const TEAL_BAR: &str = "rgba(26, 188, 156, 0.6)";
const TEAL_AREA: &str = "rgba(26, 188, 156, 0.1)";
const PALETTE: [&str; 4] = [
    "rgba(26, 188, 156, 0.8)",
    "rgba(46, 204, 113, 0.8)",
    "rgba(52, 152, 219, 0.8)",
    "rgba(155, 89, 182, 0.8)",
];

/// @ai:intent Builds Chart.js configurations and encodes them into image URLs
#[derive(Debug, Clone)]
pub struct QuickChartRenderer {
    base_url: String,
}

impl QuickChartRenderer {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// @ai:intent Chart.js configuration for a spec
    /// @ai:effects pure
    pub fn chart_config(spec: &ChartSpec) -> Value {
        let title = json!({ "title": { "display": true, "text": spec.title } });
        let label = spec.slot.dataset_label();

        match spec.kind {
            ChartKind::Radar => json!({
                "type": "radar",
                "data": {
                    "labels": spec.labels,
                    "datasets": [{
                        "label": label,
                        "data": spec.series,
                        "backgroundColor": TEAL_FILL,
                        "borderColor": TEAL,
                        "pointBackgroundColor": TEAL
                    }]
                },
                "options": {
                    "scale": { "ticks": { "beginAtZero": true, "max": spec.slot.scale_max() } },
                    "plugins": title
                }
            }),
            ChartKind::Bar => json!({
                "type": "bar",
                "data": {
                    "labels": spec.labels,
                    "datasets": [{
                        "label": label,
                        "data": spec.series,
                        "backgroundColor": TEAL_BAR
                    }]
                },
                "options": {
                    "scales": { "y": { "beginAtZero": true, "max": spec.slot.scale_max() } },
                    "plugins": title
                }
            }),
            ChartKind::Doughnut => {
                let colors: Vec<&str> = (0..spec.series.len())
                    .map(|i| PALETTE[i % PALETTE.len()])
                    .collect();
                json!({
                    "type": "doughnut",
                    "data": {
                        "labels": spec.labels,
                        "datasets": [{
                            "data": spec.series,
                            "backgroundColor": colors
                        }]
                    },
                    "options": { "plugins": title }
                })
            }
            ChartKind::Line => json!({
                "type": "line",
                "data": {
                    "labels": spec.labels,
                    "datasets": [{
                        "label": label,
                        "data": spec.series,
                        "borderColor": TEAL,
                        "backgroundColor": TEAL_AREA,
                        "fill": true
                    }]
                },
                "options": {
                    "scales": { "y": { "beginAtZero": true } },
                    "plugins": title
                }
            }),
        }
    }
}

impl ChartRenderer for QuickChartRenderer {
    /// @ai:intent Encode the chart configuration into a stable, reconstructible URL
    /// @ai:effects pure
    fn render(&self, spec: &ChartSpec) -> Result<String, RenderError> {
        if spec.series.is_empty() {
            return Err(RenderError::EmptySeries(spec.slot.title()));
        }

        let config = serde_json::to_string(&Self::chart_config(spec))?;
        let url = Url::parse_with_params(
            &self.base_url,
            &[
                ("c", config),
                ("w", spec.options.width.to_string()),
                ("h", spec.options.height.to_string()),
                ("bkg", spec.options.background.clone()),
            ],
        )?;
        Ok(url.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::spec::{ChartSlot, ChartSpecBuilder};
    use crate::metrics::MetricsReport;

    fn radar_spec() -> ChartSpec {
        ChartSpecBuilder::default().build_slot(ChartSlot::CategoryScores, &MetricsReport::fallback())
    }

    #[test]
    fn test_url_carries_config_and_options() {
        let renderer = QuickChartRenderer::new("https://quickchart.io/chart");
        let url = renderer.render(&radar_spec()).unwrap();
        assert!(url.starts_with("https://quickchart.io/chart?c="));
        assert!(url.contains("&w=400&h=300&bkg=white"));

        let parsed = Url::parse(&url).unwrap();
        let config = parsed
            .query_pairs()
            .find(|(k, _)| k == "c")
            .map(|(_, v)| v.into_owned())
            .unwrap();
        let value: Value = serde_json::from_str(&config).unwrap();
        assert_eq!(value["type"], "radar");
        assert_eq!(value["data"]["labels"][1], "Market Potential");
        assert_eq!(value["options"]["scale"]["ticks"]["max"], 10.0);
    }

    #[test]
    fn test_render_is_deterministic() {
        let renderer = QuickChartRenderer::new("https://quickchart.io/chart");
        let spec = radar_spec();
        assert_eq!(renderer.render(&spec).unwrap(), renderer.render(&spec).unwrap());
    }

    #[test]
    fn test_doughnut_gets_palette_per_slice() {
        let spec = ChartSpecBuilder::default()
            .build_slot(ChartSlot::ImplementationTimeline, &MetricsReport::fallback());
        let config = QuickChartRenderer::chart_config(&spec);
        let colors = config["data"]["datasets"][0]["backgroundColor"].as_array().unwrap();
        assert_eq!(colors.len(), spec.series.len());
    }

    #[test]
    fn test_bad_base_url_is_error() {
        let renderer = QuickChartRenderer::new("not a url");
        assert!(matches!(
            renderer.render(&radar_spec()),
            Err(RenderError::Url(_))
        ));
    }

    #[test]
    fn test_empty_series_is_error() {
        let mut spec = radar_spec();
        spec.labels.clear();
        spec.series.clear();
        let renderer = QuickChartRenderer::new("https://quickchart.io/chart");
        assert!(matches!(renderer.render(&spec), Err(RenderError::EmptySeries(_))));
    }
}
