use crate::format::Trend;
use plotters::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;

pub const DATASET_LABEL: &str = "Portfolio Value";

#[derive(Debug, thiserror::Error)]
#[error("failed to render chart: {0}")]
pub struct ChartError(String);

impl From<tokio::task::JoinError> for ChartError {
    fn from(err: tokio::task::JoinError) -> Self {
        ChartError(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ChartId(u64);

/// What to draw; derived from one range snapshot.
#[derive(Debug)]
pub struct LineChartSpec {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub trend: Trend,
    pub fill: bool,
}

/// A live chart instance bound to a canvas element.
#[derive(Debug, Clone, Serialize)]
pub struct LineChart {
    pub id: ChartId,
    pub canvas: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub border_color: &'static str,
    pub svg: String,
}

/// A rendered chart that has not been attached to the host yet.
#[derive(Debug)]
pub struct PreparedChart {
    canvas: String,
    spec: LineChartSpec,
    svg: String,
}

impl PreparedChart {
    /// Draws `spec` without registering anything. CPU-bound.
    pub fn render(
        canvas: impl Into<String>,
        spec: LineChartSpec,
        width: u32,
        height: u32,
    ) -> Result<Self, ChartError> {
        let svg = render_svg(&spec, width, height)?;
        Ok(Self {
            canvas: canvas.into(),
            spec,
            svg,
        })
    }
}

/// Owns every chart instance that has been created and not yet destroyed.
pub struct ChartHost {
    width: u32,
    height: u32,
    next_id: u64,
    live: BTreeMap<ChartId, LineChart>,
}

impl ChartHost {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            next_id: 0,
            live: BTreeMap::new(),
        }
    }

    pub fn mount(&mut self, prepared: PreparedChart) -> ChartId {
        self.next_id += 1;
        let id = ChartId(self.next_id);
        let PreparedChart { canvas, spec, svg } = prepared;
        self.live.insert(
            id,
            LineChart {
                id,
                canvas,
                labels: spec.labels,
                values: spec.values,
                border_color: spec.trend.css_color(),
                svg,
            },
        );
        id
    }

    pub fn create(&mut self, canvas: &str, spec: LineChartSpec) -> Result<ChartId, ChartError> {
        let prepared = PreparedChart::render(canvas, spec, self.width, self.height)?;
        Ok(self.mount(prepared))
    }

    pub fn destroy(&mut self, id: ChartId) -> Option<LineChart> {
        self.live.remove(&id)
    }

    pub fn get(&self, id: ChartId) -> Option<&LineChart> {
        self.live.get(&id)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

// Widest y span the axis tick search can step through; beyond it the
// tick scale overflows to infinity and never converges.
const MAX_Y_SPAN: f64 = f64::MAX / 1e3;

fn y_bounds(values: &[f64]) -> Result<(f64, f64), ChartError> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return Ok((0.0, 1.0));
    }
    if min == max {
        return Ok((min - 1.0, max + 1.0));
    }
    let span = max - min;
    let (low, high) = (min - span * 0.1, max + span * 0.1);
    if !span.is_finite() || span > MAX_Y_SPAN || !low.is_finite() || !high.is_finite() {
        return Err(ChartError(format!(
            "values between {min:e} and {max:e} are too far apart to plot"
        )));
    }
    Ok((low, high))
}

fn render_svg(spec: &LineChartSpec, width: u32, height: u32) -> Result<String, ChartError> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(|e| ChartError(e.to_string()))?;

        let last = spec.values.len().saturating_sub(1).max(1);
        let (y_min, y_max) = y_bounds(&spec.values)?;
        let labels = &spec.labels;

        let mut chart = ChartBuilder::on(&root)
            .margin(12)
            .x_label_area_size(30)
            .y_label_area_size(60)
            .build_cartesian_2d(0usize..last, y_min..y_max)
            .map_err(|e| ChartError(e.to_string()))?;

        chart
            .configure_mesh()
            .x_labels(labels.len().clamp(2, 8))
            .x_label_formatter(&|index: &usize| labels.get(*index).cloned().unwrap_or_default())
            .y_label_formatter(&|value: &f64| format!("{value:.2}"))
            .draw()
            .map_err(|e| ChartError(e.to_string()))?;

        let border = spec.trend.border_color();
        let points = spec.values.iter().copied().enumerate();
        if spec.fill {
            chart
                .draw_series(
                    AreaSeries::new(points, y_min, spec.trend.fill_color().mix(0.1))
                        .border_style(border.stroke_width(2)),
                )
                .map_err(|e| ChartError(e.to_string()))?
                .label(DATASET_LABEL);
        } else {
            chart
                .draw_series(LineSeries::new(points, border.stroke_width(2)))
                .map_err(|e| ChartError(e.to_string()))?
                .label(DATASET_LABEL);
        }

        root.present().map_err(|e| ChartError(e.to_string()))?;
    }
    Ok(svg)
}
