//! plot/heatmap.rs — KDE heatmap rendering with custom log-axis ticks.
//!
//! Plotters' mesh only supports auto-placed labels, so tick marks and labels
//! are drawn manually in backend coordinates below/left of the plotting
//! area.

use std::path::Path;

use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::core::kde::Heatmap;
use crate::core::ticks::AxisTicks;
use crate::error::Result;
use crate::plot::colormap::viridis;

const WIDTH: u32 = 1000;
const HEIGHT: u32 = 900;

pub fn render_heatmap(
    path: &Path,
    caption: &str,
    heatmap: &Heatmap,
    x_ticks: &AxisTicks,
    y_ticks: &AxisTicks,
    x_desc: &str,
    y_desc: &str,
) -> Result<()> {
    let res = heatmap.resolution;
    let root = SVGBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 22))
        .margin(12)
        .x_label_area_size(46)
        .y_label_area_size(64)
        .build_cartesian_2d(0.0f64..res as f64, 0.0f64..res as f64)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(0)
        .y_labels(0)
        .x_desc(x_desc)
        .y_desc(y_desc)
        .draw()?;

    chart.draw_series((0..res * res).map(|idx| {
        let li = idx / res;
        let si = idx % res;
        let x = li as f64;
        let y = si as f64;
        Rectangle::new(
            [(x, y), (x + 1.0, y + 1.0)],
            viridis(heatmap.at(li, si)).filled(),
        )
    }))?;

    draw_x_ticks(&root, &chart, x_ticks)?;
    draw_y_ticks(&root, &chart, y_ticks)?;

    root.present()?;
    Ok(())
}

type HeatmapChart<'a, 'b> =
    ChartContext<'a, SVGBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

fn draw_x_ticks(
    root: &DrawingArea<SVGBackend, Shift>,
    chart: &HeatmapChart,
    ticks: &AxisTicks,
) -> Result<()> {
    for (&pos, label) in ticks.positions.iter().zip(&ticks.labels) {
        let (px, py) = chart.backend_coord(&(pos, 0.0));
        let len = if label.is_empty() { 3 } else { 6 };
        root.draw(&PathElement::new(
            vec![(px, py), (px, py + len)],
            BLACK.stroke_width(1),
        ))?;
        if !label.is_empty() {
            let shift = (label.len() as i32 * 7) / 2;
            root.draw(&Text::new(
                label.clone(),
                (px - shift, py + len + 4),
                ("sans-serif", 15),
            ))?;
        }
    }
    Ok(())
}

fn draw_y_ticks(
    root: &DrawingArea<SVGBackend, Shift>,
    chart: &HeatmapChart,
    ticks: &AxisTicks,
) -> Result<()> {
    for (&pos, label) in ticks.positions.iter().zip(&ticks.labels) {
        let (px, py) = chart.backend_coord(&(0.0, pos));
        let len = if label.is_empty() { 3 } else { 6 };
        root.draw(&PathElement::new(
            vec![(px - len, py), (px, py)],
            BLACK.stroke_width(1),
        ))?;
        if !label.is_empty() {
            let shift = label.len() as i32 * 8 + 8;
            root.draw(&Text::new(
                label.clone(),
                (px - len - shift, py - 7),
                ("sans-serif", 15),
            ))?;
        }
    }
    Ok(())
}
