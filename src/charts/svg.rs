//! @ai:module:intent Self-hosted chart rendering to inline SVG data URIs
//! @ai:module:layer infrastructure
//! @ai:module:public_api SvgRenderer
//! @ai:module:stateless true

use crate::charts::spec::{ChartKind, ChartSpec};
use crate::charts::{ChartRenderer, RenderError};
use anyhow::{bail, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::f64::consts::PI;

const TEAL: RGBColor = RGBColor(26, 188, 156);
const PALETTE: [RGBColor; 4] = [
    RGBColor(26, 188, 156),
    RGBColor(46, 204, 113),
    RGBColor(52, 152, 219),
    RGBColor(155, 89, 182),
];
const INK: RGBColor = RGBColor(44, 62, 80);
const GRID: RGBColor = RGBColor(236, 240, 241);

const TITLE_BAND: i32 = 30;
const LABEL_BAND: i32 = 24;
const MARGIN: i32 = 16;

/// @ai:intent Draws charts locally with plotters, no network involved
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgRenderer;

impl SvgRenderer {
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Render a spec to raw SVG markup
    /// @ai:effects pure
    pub fn render_svg(&self, spec: &ChartSpec) -> Result<String> {
        if spec.series.is_empty() {
            bail!("{} has no values", spec.slot.title());
        }

        let (width, height) = (spec.options.width, spec.options.height);
        let mut buffer = String::new();
        {
            let root = SVGBackend::with_string(&mut buffer, (width, height)).into_drawing_area();
            if let Some(color) = background_color(&spec.options.background) {
                root.fill(&color)?;
            }

            root.draw(&Text::new(
                spec.title.clone(),
                (width as i32 / 2, TITLE_BAND / 2),
                text_style(16).pos(Pos::new(HPos::Center, VPos::Center)),
            ))?;

            let frame = Frame {
                left: MARGIN,
                top: TITLE_BAND,
                right: width as i32 - MARGIN,
                bottom: height as i32 - LABEL_BAND,
            };

            match spec.kind {
                ChartKind::Bar => draw_bars(&root, spec, &frame)?,
                ChartKind::Line => draw_line(&root, spec, &frame)?,
                ChartKind::Radar => draw_radar(&root, spec, &frame)?,
                ChartKind::Doughnut => draw_doughnut(&root, spec, &frame)?,
            }

            root.present()?;
        }
        Ok(buffer)
    }
}

impl ChartRenderer for SvgRenderer {
    fn render(&self, spec: &ChartSpec) -> Result<String, RenderError> {
        let svg = self
            .render_svg(spec)
            .map_err(|e| RenderError::Drawing(e.to_string()))?;
        Ok(format!("data:image/svg+xml;base64,{}", STANDARD.encode(svg)))
    }
}

/// Pixel box the plot is drawn into
struct Frame {
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
}

impl Frame {
    fn width(&self) -> i32 {
        self.right - self.left
    }

    fn height(&self) -> i32 {
        self.bottom - self.top
    }

    fn center(&self) -> (i32, i32) {
        ((self.left + self.right) / 2, (self.top + self.bottom) / 2)
    }
}

type Area<'a> = DrawingArea<SVGBackend<'a>, plotters::coord::Shift>;

fn text_style(size: u32) -> TextStyle<'static> {
    ("sans-serif", f64::from(size)).into_font().color(&INK)
}

fn background_color(name: &str) -> Option<RGBColor> {
    match name.trim().to_ascii_lowercase().as_str() {
        "transparent" | "none" => None,
        hex if hex.len() == 7 && hex.is_ascii() && hex.starts_with('#') => {
            let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
            match (channel(1..3), channel(3..5), channel(5..7)) {
                (Some(r), Some(g), Some(b)) => Some(RGBColor(r, g, b)),
                _ => Some(WHITE),
            }
        }
        _ => Some(WHITE),
    }
}

fn value_ceiling(spec: &ChartSpec) -> f64 {
    let observed = spec.series.iter().copied().fold(0.0_f64, f64::max);
    match spec.slot.scale_max() {
        Some(max) if max >= observed => max,
        _ if observed > 0.0 => observed,
        _ => 1.0,
    }
}

fn scale(value: f64, ceiling: f64, span: i32) -> i32 {
    ((value.max(0.0) / ceiling) * span as f64).round() as i32
}

fn draw_bars(root: &Area, spec: &ChartSpec, frame: &Frame) -> Result<()> {
    let ceiling = value_ceiling(spec);
    let slot_width = frame.width() / spec.series.len() as i32;
    let bar_width = (slot_width * 3) / 5;

    root.draw(&PathElement::new(
        vec![(frame.left, frame.bottom), (frame.right, frame.bottom)],
        INK.stroke_width(1),
    ))?;

    for (i, (label, value)) in spec.labels.iter().zip(&spec.series).enumerate() {
        let x0 = frame.left + slot_width * i as i32 + (slot_width - bar_width) / 2;
        let top = frame.bottom - scale(*value, ceiling, frame.height());
        root.draw(&Rectangle::new(
            [(x0, top), (x0 + bar_width, frame.bottom)],
            TEAL.mix(0.6).filled(),
        ))?;
        root.draw(&Text::new(
            label.clone(),
            (x0 + bar_width / 2, frame.bottom + LABEL_BAND / 2),
            text_style(11).pos(Pos::new(HPos::Center, VPos::Center)),
        ))?;
    }
    Ok(())
}

fn draw_line(root: &Area, spec: &ChartSpec, frame: &Frame) -> Result<()> {
    let ceiling = value_ceiling(spec);
    let steps = (spec.series.len() as i32 - 1).max(1);
    let points: Vec<(i32, i32)> = spec
        .series
        .iter()
        .enumerate()
        .map(|(i, value)| {
            (
                frame.left + frame.width() * i as i32 / steps,
                frame.bottom - scale(*value, ceiling, frame.height()),
            )
        })
        .collect();

    let mut area = points.clone();
    if let (Some(first), Some(last)) = (points.first(), points.last()) {
        area.push((last.0, frame.bottom));
        area.push((first.0, frame.bottom));
    }
    root.draw(&Polygon::new(area, TEAL.mix(0.1).filled()))?;
    root.draw(&PathElement::new(points.clone(), TEAL.stroke_width(2)))?;

    for (point, label) in points.iter().zip(&spec.labels) {
        root.draw(&Circle::new(*point, 3, TEAL.filled()))?;
        root.draw(&Text::new(
            label.clone(),
            (point.0, frame.bottom + LABEL_BAND / 2),
            text_style(11).pos(Pos::new(HPos::Center, VPos::Center)),
        ))?;
    }
    Ok(())
}

fn polar(center: (i32, i32), radius: f64, angle: f64) -> (i32, i32) {
    (
        center.0 + (radius * angle.cos()).round() as i32,
        center.1 + (radius * angle.sin()).round() as i32,
    )
}

fn draw_radar(root: &Area, spec: &ChartSpec, frame: &Frame) -> Result<()> {
    let ceiling = value_ceiling(spec);
    let center = frame.center();
    let radius = (frame.width().min(frame.height()) as f64 / 2.0) - 12.0;
    let n = spec.series.len();
    let angle = |i: usize| -PI / 2.0 + 2.0 * PI * i as f64 / n as f64;

    for ring in [0.5, 1.0] {
        let mut outline: Vec<_> = (0..n).map(|i| polar(center, radius * ring, angle(i))).collect();
        if let Some(first) = outline.first().copied() {
            outline.push(first);
        }
        root.draw(&PathElement::new(outline, GRID.stroke_width(1)))?;
    }

    let mut shape: Vec<_> = spec
        .series
        .iter()
        .enumerate()
        .map(|(i, value)| polar(center, radius * value.max(0.0) / ceiling, angle(i)))
        .collect();
    root.draw(&Polygon::new(shape.clone(), TEAL.mix(0.2).filled()))?;
    if let Some(first) = shape.first().copied() {
        shape.push(first);
    }
    root.draw(&PathElement::new(shape, TEAL.stroke_width(2)))?;

    for (i, label) in spec.labels.iter().enumerate() {
        root.draw(&Text::new(
            label.clone(),
            polar(center, radius + 8.0, angle(i)),
            text_style(11).pos(Pos::new(HPos::Center, VPos::Center)),
        ))?;
    }
    Ok(())
}

fn draw_doughnut(root: &Area, spec: &ChartSpec, frame: &Frame) -> Result<()> {
    let total: f64 = spec.series.iter().map(|v| v.max(0.0)).sum();
    if total <= 0.0 {
        bail!("{} has no positive values", spec.slot.title());
    }

    let center = frame.center();
    let radius = (frame.width().min(frame.height()) as f64 / 2.0) - 4.0;
    let mut start = -PI / 2.0;

    for (i, value) in spec.series.iter().enumerate() {
        let sweep = 2.0 * PI * value.max(0.0) / total;
        if sweep <= 0.0 {
            continue;
        }
        let segments = ((sweep / (PI / 60.0)).ceil() as usize).max(2);
        let mut slice = vec![center];
        slice.extend(
            (0..=segments).map(|s| polar(center, radius, start + sweep * s as f64 / segments as f64)),
        );
        root.draw(&Polygon::new(slice, PALETTE[i % PALETTE.len()].filled()))?;
        start += sweep;
    }

    root.draw(&Circle::new(center, (radius * 0.5) as i32, WHITE.filled()))?;

    let legend_y = frame.bottom + LABEL_BAND / 2;
    let slot_width = frame.width() / spec.labels.len() as i32;
    for (i, label) in spec.labels.iter().enumerate() {
        let x = frame.left + slot_width * i as i32;
        root.draw(&Rectangle::new(
            [(x, legend_y - 4), (x + 8, legend_y + 4)],
            PALETTE[i % PALETTE.len()].filled(),
        ))?;
        root.draw(&Text::new(
            label.clone(),
            (x + 12, legend_y),
            text_style(11).pos(Pos::new(HPos::Left, VPos::Center)),
        ))?;
    }
    Ok(())
}
