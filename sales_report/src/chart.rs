//! Chart of actual sales, moving averages and forecasts
//!
//! [`chart_lines`] turns a [`RenderModel`] into labelled line data and
//! [`render_svg`] draws those lines with plotters.

use crate::error::{ReportError, Result};
use crate::render::RenderModel;
use chrono::NaiveDate;
use plotters::coord::Shift;
use plotters::prelude::*;

const CHART_SIZE: (u32, u32) = (1000, 540);
const TITLE: &str = "Sales with moving average and ARIMA forecast";
const EMPTY_NOTICE: &str = "No data for the current filter";

const PALETTE: [RGBColor; 8] = [
    RGBColor(0x1f, 0x77, 0xb4),
    RGBColor(0xff, 0x7f, 0x0e),
    RGBColor(0x2c, 0xa0, 0x2c),
    RGBColor(0xd6, 0x27, 0x28),
    RGBColor(0x94, 0x67, 0xbd),
    RGBColor(0x8c, 0x56, 0x4b),
    RGBColor(0xe3, 0x77, 0xc2),
    RGBColor(0x17, 0xbe, 0xcf),
];

/// Which of the three per-product lines a [`ChartLine`] is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Actual,
    MovingAverage,
    Forecast,
}

impl LineKind {
    pub fn label_suffix(&self) -> &'static str {
        match self {
            LineKind::Actual => "actual",
            LineKind::MovingAverage => "moving average",
            LineKind::Forecast => "ARIMA forecast",
        }
    }

    fn style(&self, color: RGBColor) -> ShapeStyle {
        match self {
            LineKind::Actual => color.mix(0.55).stroke_width(2),
            LineKind::MovingAverage | LineKind::Forecast => color.stroke_width(2),
        }
    }
}

/// One labelled line; gaps split it into separate segments
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLine {
    pub label: String,
    pub kind: LineKind,
    pub color: RGBColor,
    pub segments: Vec<Vec<(NaiveDate, f64)>>,
}

/// Lines to draw for `model`, grouped by product in report order
pub fn chart_lines(model: &RenderModel) -> Vec<ChartLine> {
    let mut lines = Vec::new();

    for (index, report) in model.products.iter().enumerate() {
        let color = PALETTE[index % PALETTE.len()];
        let line = |kind: LineKind, segments: Vec<Vec<(NaiveDate, f64)>>| ChartLine {
            label: format!("{} ({})", report.product, kind.label_suffix()),
            kind,
            color,
            segments,
        };

        let actual: Vec<(NaiveDate, f64)> = report
            .actual
            .points()
            .iter()
            .map(|p| (p.date, p.quantity))
            .collect();
        lines.push(line(LineKind::Actual, vec![actual]));

        let mut segments = Vec::new();
        let mut current = Vec::new();
        for point in report.moving_average.points() {
            match point.value {
                Some(value) => current.push((point.date, value)),
                None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
                None => {}
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }
        lines.push(line(LineKind::MovingAverage, segments));

        if let Some(forecast) = report.forecast.series() {
            let points = forecast.points().iter().map(|p| (p.date, p.value)).collect();
            lines.push(line(LineKind::Forecast, vec![points]));
        }
    }

    lines
}

/// Render the chart as a standalone SVG document
pub fn render_svg(model: &RenderModel) -> Result<String> {
    let lines = chart_lines(model);
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(chart_error)?;
        draw_lines(&root, &lines)?;
        root.present().map_err(chart_error)?;
    }
    Ok(svg)
}

fn draw_lines(root: &DrawingArea<SVGBackend<'_>, Shift>, lines: &[ChartLine]) -> Result<()> {
    let points = || lines.iter().flat_map(|l| l.segments.iter().flatten());
    let (Some(first), Some(last)) = (
        points().map(|(d, _)| *d).min(),
        points().map(|(d, _)| *d).max(),
    ) else {
        root.draw(&Text::new(TITLE, (20, 20), ("sans-serif", 22).into_font()))
            .map_err(chart_error)?;
        root.draw(&Text::new(EMPTY_NOTICE, (20, 60), ("sans-serif", 16).into_font()))
            .map_err(chart_error)?;
        return Ok(());
    };
    // A single day still needs a non-empty axis
    let last = if last > first {
        last
    } else {
        first.succ_opt().unwrap_or(first)
    };

    let y_min = points().map(|(_, v)| *v).fold(0.0, f64::min);
    let y_max = points().map(|(_, v)| *v).fold(0.0, f64::max);
    let y_max = if y_max > y_min { y_max * 1.1 } else { y_min + 1.0 };

    let mut chart = ChartBuilder::on(root)
        .caption(TITLE, ("sans-serif", 22).into_font())
        .margin(16)
        .x_label_area_size(40)
        .y_label_area_size(56)
        .build_cartesian_2d(first..last, y_min..y_max)
        .map_err(chart_error)?;

    chart
        .configure_mesh()
        .x_labels(8)
        .x_label_formatter(&|d: &NaiveDate| d.format("%Y-%m-%d").to_string())
        .x_desc("tanggal")
        .y_desc("jumlah")
        .draw()
        .map_err(chart_error)?;

    for line in lines {
        let style = line.kind.style(line.color);
        let mut segments = line.segments.iter();

        let anno = match (line.kind, segments.next()) {
            (_, None) => chart.draw_series(std::iter::empty::<PathElement<(NaiveDate, f64)>>()),
            (LineKind::Forecast, Some(segment)) => {
                chart.draw_series(DashedLineSeries::new(segment.iter().copied(), 6, 4, style))
            }
            (_, Some(segment)) => chart.draw_series(LineSeries::new(segment.iter().copied(), style)),
        }
        .map_err(chart_error)?;
        anno.label(line.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));

        for segment in segments {
            chart
                .draw_series(LineSeries::new(segment.iter().copied(), style))
                .map_err(chart_error)?;
        }
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK)
        .draw()
        .map_err(chart_error)?;

    Ok(())
}

fn chart_error<E: std::error::Error + Send + Sync>(err: DrawingAreaErrorKind<E>) -> ReportError {
    ReportError::Chart(err.to_string())
}
