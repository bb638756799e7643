//! Per-section comparison of surveys, as CSV or SVG.

use anyhow::{bail, Result};
use plotters::{coord::Shift, prelude::*};
use serde::Serialize;
use std::path::Path;

/// Charts per row in an SVG.
const COLS: usize = 2;

/// Pixel size of a single chart.
const PANEL: (u32, u32) = (700, 500);

/// One survey's profile across a section.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// Survey label, e.g. the year.
    pub label: String,

    /// (distance, elevation) pairs, ordered by distance.
    pub points: Vec<(f64, f64)>,
}

/// Every survey's profile across one section.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionChart {
    pub section_id: String,
    pub series: Vec<Series>,
}

impl SectionChart {
    fn bounds(&self) -> Option<((f64, f64), (f64, f64))> {
        let mut points = self.series.iter().flat_map(|s| s.points.iter());
        let &(x, y) = points.next()?;
        let init = ((x, x), (y, y));
        Some(points.fold(init, |((x0, x1), (y0, y1)), &(x, y)| {
            ((x0.min(x), x1.max(x)), (y0.min(y), y1.max(y)))
        }))
    }
}

/// Prints `sectionId,Year,distance,elevation` rows to stdout.
pub fn print_csv(charts: &[SectionChart]) -> Result<()> {
    #[derive(Serialize)]
    struct Row<'a> {
        #[serde(rename = "sectionId")]
        section_id: &'a str,
        #[serde(rename = "Year")]
        year: &'a str,
        distance: f64,
        elevation: f64,
    }

    let mut wtr = csv::Writer::from_writer(std::io::stdout().lock());
    for chart in charts {
        for series in &chart.series {
            for &(distance, elevation) in &series.points {
                wtr.serialize(Row {
                    section_id: &chart.section_id,
                    year: &series.label,
                    distance,
                    elevation,
                })?;
            }
        }
    }
    wtr.flush()?;
    Ok(())
}

/// Draws one chart per section, `COLS` to a row, into an SVG at `out`.
pub fn write_svg(out: &Path, charts: &[SectionChart]) -> Result<()> {
    let charts: Vec<&SectionChart> = charts.iter().filter(|c| c.bounds().is_some()).collect();
    if charts.is_empty() {
        bail!("nothing to plot");
    }
    let rows = (charts.len() + COLS - 1) / COLS;

    #[allow(clippy::cast_possible_truncation)]
    let size = (PANEL.0 * COLS as u32, PANEL.1 * rows as u32);
    let root = SVGBackend::new(out, size).into_drawing_area();
    root.fill(&WHITE)?;
    for (chart, area) in charts.iter().zip(root.split_evenly((rows, COLS)).iter()) {
        draw(chart, area)?;
    }
    root.present()?;
    Ok(())
}

fn draw(chart: &SectionChart, area: &DrawingArea<SVGBackend<'_>, Shift>) -> Result<()> {
    let Some(((x0, x1), (y0, y1))) = chart.bounds() else {
        return Ok(());
    };
    // Keep flat or single-point profiles drawable.
    let (y0, y1) = if y1 - y0 < 1.0 { (y0 - 0.5, y1 + 0.5) } else { (y0, y1) };
    let (x0, x1) = if x1 - x0 < 1.0 { (x0 - 0.5, x1 + 0.5) } else { (x0, x1) };

    let mut ctx = ChartBuilder::on(area)
        .caption(
            format!("Change in section at {}", chart.section_id),
            ("sans-serif", 20),
        )
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(50)
        .build_cartesian_2d(x0..x1, y0..y1)?;

    ctx.configure_mesh()
        .x_desc("Distance (m)")
        .y_desc("Elevation (m)")
        .draw()?;

    for (idx, series) in chart.series.iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        ctx.draw_series(LineSeries::new(series.points.iter().copied(), &color))?
            .label(series.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
    }

    ctx.configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    Ok(())
}
