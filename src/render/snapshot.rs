use std::io::Cursor;
use std::path::{Path, PathBuf};
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use log::{info, warn};
use plotters::prelude::*;
use crate::channel::TimeSeriesTable;
use crate::config::DrawConfig;
use crate::error::ScopeError;
use crate::viewport::{auto_y_range, padded, AxisRange, GridLayout};
use super::{RenderStyle, TIME_AXIS_LABEL};
/// Draw every column group of `draw` into one PNG, laid out like the viewer grid.
pub fn render_grid_png(
    table: &TimeSeriesTable,
    draw: &DrawConfig,
    style: &RenderStyle,
) -> Result<Vec<u8>, ScopeError> {
    let span = table
        .time_span()
        .ok_or_else(|| ScopeError::Plot("table has no rows".into()))?;
    if draw.column_groups.is_empty() {
        return Err(ScopeError::Plot("no column groups to draw".into()));
    }
    table.validate_plot_columns(&draw.column_groups)?;
    let layout = GridLayout::new(draw.column_groups.len(), draw.cols_per_row);
    let width = style.cell_width * layout.cols as u32;
    let height = style.cell_height * layout.rows as u32;
    // Single-row tables still need a drawable x extent.
    let x = if span.span() > 0.0 {
        span
    } else {
        AxisRange::new(span.start - 0.5, span.end + 0.5)
    };
    let ticks = draw.xaxis_interval.intervals_for(x.span());
    let x_labels = ((x.span() / ticks.major).round() as usize + 1).clamp(2, 40);
    let font = ("sans-serif", f64::from(style.font_size)).into_font();
    // Hosts without a resolvable system font still get lines and grid.
    let labelled = match font.box_size(TIME_AXIS_LABEL) {
        Ok(_) => true,
        Err(err) => {
            warn!("snapshot drawn without text, no usable font: {err:?}");
            false
        }
    };
    let text = font.color(&style.foreground);
    let mut buffer = vec![0u8; (width * height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&style.background)?;
        let areas = root.split_evenly((layout.rows, layout.cols));
        for cell in layout.cells() {
            let group = &draw.column_groups[cell.index];
            let area = &areas[cell.row * layout.cols + cell.col];
            let y = match group.yaxis {
                Some([lo, hi]) => AxisRange::new(lo, hi),
                None => auto_y_range(table, &group.columns, x).unwrap_or_else(|| padded(0.0, 0.0)),
            };
            let mut chart = ChartBuilder::on(area)
                .margin(8)
                .set_label_area_size(LabelAreaPosition::Left, 55)
                .set_label_area_size(LabelAreaPosition::Bottom, if cell.x_label { 40 } else { 20 })
                .build_cartesian_2d(x.start..x.end, y.start..y.end)?;
            let mut mesh = chart.configure_mesh();
            mesh.axis_style(style.foreground)
                .label_style(text.clone())
                .light_line_style(style.foreground.mix(0.1))
                .bold_line_style(style.foreground.mix(0.25));
            if labelled {
                mesh.x_labels(x_labels).y_desc(group.title());
                if cell.x_label {
                    mesh.x_desc(TIME_AXIS_LABEL);
                }
            } else {
                mesh.x_labels(0).y_labels(0);
            }
            mesh.draw()?;
            for (idx, column) in group.columns.iter().enumerate() {
                let Some(points) = table.points_in_range(column, x) else {
                    continue;
                };
                let color = style.series_color(idx);
                chart
                    .draw_series(LineSeries::new(points.into_iter().map(|[t, v]| (t, v)), &color))?
                    .label(column.as_str())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
            }
            if labelled && group.columns.len() > 1 {
                chart
                    .configure_series_labels()
                    .label_font(text.clone())
                    .border_style(style.foreground.mix(0.2))
                    .background_style(style.background)
                    .draw()?;
            }
        }
        for (row, col) in layout.unused_cells() {
            areas[row * layout.cols + col].fill(&style.background)?;
        }
        root.present()?;
    }
    encode_png(&buffer, width, height)
}
/// Render the grid and write it to `<dir>/<stem>.png`.
pub fn save_snapshot(
    table: &TimeSeriesTable,
    draw: &DrawConfig,
    style: &RenderStyle,
    dir: impl AsRef<Path>,
    stem: &str,
) -> Result<PathBuf, ScopeError> {
    let png = render_grid_png(table, draw, style)?;
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("{stem}.png"));
    std::fs::write(&path, png)?;
    info!("saved snapshot to {}", path.display());
    Ok(path)
}
fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>, ScopeError> {
    let image = ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, buffer.to_vec())
        .ok_or_else(|| ScopeError::Plot("failed to allocate image buffer".into()))?;
    let mut output = Vec::new();
    let dynamic = DynamicImage::ImageRgb8(image);
    dynamic.write_to(&mut Cursor::new(&mut output), ImageFormat::Png)?;
    Ok(output)
}
