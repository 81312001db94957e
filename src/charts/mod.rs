//! @ai:module:intent Chart specifications and the renderers that turn them into image references
//! @ai:module:layer infrastructure
//! @ai:module:public_api ChartRenderer, RenderedChart, RenderError, QuickChartRenderer, SvgRenderer, renderer_from_config
//! @ai:module:stateless true

pub mod quickchart;
pub mod spec;
pub mod svg;

pub use quickchart::QuickChartRenderer;
pub use spec::{humanize_label, ChartKind, ChartSlot, ChartSpec, ChartSpecBuilder, RenderOptions};
pub use svg::SvgRenderer;

use crate::config::{ChartConfig, RendererKind};
use std::sync::Arc;
use thiserror::Error;

/// @ai:intent Errors raised while turning a chart spec into an image reference
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Invalid chart service URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Failed to encode chart config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Chart '{0}' has no values")]
    EmptySeries(&'static str),

    #[error("Failed to draw chart: {0}")]
    Drawing(String),

    #[error("No image was rendered for '{0}'")]
    NotRendered(&'static str),
}

/// @ai:intent Image reference for one chart slot
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedChart {
    pub slot: ChartSlot,
    /// Value placed in the `src` attribute of the report image
    pub src: String,
}

/// @ai:intent Trait for chart renderers
pub trait ChartRenderer: Send + Sync {
    /// @ai:intent Produce an image reference for one chart
    /// @ai:post equal specs yield equal references
    fn render(&self, spec: &ChartSpec) -> Result<String, RenderError>;

    /// @ai:intent Render every spec, stopping at the first failure
    fn render_all(&self, specs: &[ChartSpec]) -> Result<Vec<RenderedChart>, RenderError> {
        specs
            .iter()
            .map(|spec| {
                Ok(RenderedChart {
                    slot: spec.slot,
                    src: self.render(spec)?,
                })
            })
            .collect()
    }
}

/// @ai:intent Select the renderer named in configuration
/// @ai:effects pure
pub fn renderer_from_config(config: &ChartConfig) -> Arc<dyn ChartRenderer> {
    match config.renderer {
        RendererKind::Quickchart => Arc::new(QuickChartRenderer::new(config.base_url.clone())),
        RendererKind::Svg => Arc::new(SvgRenderer::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MetricsReport;

    #[test]
    fn test_render_all_keeps_slot_order() {
        let specs = ChartSpecBuilder::default().build(&MetricsReport::fallback());
        let renderer = renderer_from_config(&ChartConfig::default());
        let rendered = renderer.render_all(&specs).unwrap();
        let slots: Vec<_> = rendered.iter().map(|c| c.slot).collect();
        assert_eq!(slots, ChartSlot::ALL.to_vec());
    }

    #[test]
    fn test_renderer_from_config_svg() {
        let config = ChartConfig {
            renderer: RendererKind::Svg,
            ..ChartConfig::default()
        };
        let spec = ChartSpecBuilder::default()
            .build_slot(ChartSlot::MarketAnalysis, &MetricsReport::fallback());
        let src = renderer_from_config(&config).render(&spec).unwrap();
        assert!(src.starts_with("data:image/svg+xml;base64,"));
    }
}
