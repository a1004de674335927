use std::f64::consts::PI;
use std::ops::Range;

use anyhow::{Context, Result};
use image::ImageEncoder;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::format::NumberFormat;
use crate::palette::ColorPalette;
use crate::projection::{ChartKind, ChartSeries, SeriesEntry};

pub struct GraphConfig {
    pub title: Option<String>,
    pub x_label: String,
    pub y_label: String,
    pub width: u32,
    pub height: u32,
}

/// Render a chart series to PNG bytes.
///
/// Pie charts use only the leading slice of the series; bar and line charts
/// use all of it.
pub fn render_chart(
    series: &ChartSeries<'_>,
    kind: ChartKind,
    config: &GraphConfig,
    format: &NumberFormat,
) -> Result<Vec<u8>> {
    let entries = series.entries_for(kind);
    if entries.is_empty() {
        anyhow::bail!(
            "Column '{}' has no numeric values to chart",
            series.y_column
        );
    }

    let mut buffer = vec![0u8; (config.width * config.height * 3) as usize];

    {
        let root = BitMapBackend::with_buffer(&mut buffer, (config.width, config.height))
            .into_drawing_area();

        root.fill(&WHITE).context("Failed to fill background")?;

        match kind {
            ChartKind::Bar => draw_bar(&root, entries, config, format)?,
            ChartKind::Line => draw_line(&root, entries, config, format)?,
            ChartKind::Pie => draw_pie(&root, entries, config, format)?,
        }

        root.present().context("Failed to present drawing")?;
    }

    let mut png_bytes = Vec::new();
    {
        let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
        encoder
            .write_image(
                &buffer,
                config.width,
                config.height,
                image::ColorType::Rgb8,
            )
            .context("Failed to encode PNG")?;
    }

    Ok(png_bytes)
}

/// Category label for a position on the categorical X axis.
fn category_label(entries: &[SeriesEntry<'_>], position: f64, format: &NumberFormat) -> String {
    let idx = position.round();
    if (position - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    entries
        .get(idx as usize)
        .map(|e| format.format_value(e.x))
        .unwrap_or_default()
}

/// Y range that always includes zero, padded by 5%.
fn value_range(entries: &[SeriesEntry<'_>]) -> Range<f64> {
    let y_min = entries.iter().map(|e| e.y).fold(0.0, f64::min);
    let y_max = entries.iter().map(|e| e.y).fold(0.0, f64::max);

    if y_min == y_max {
        (y_min - 1.0)..(y_max + 1.0)
    } else {
        let padding = (y_max - y_min) * 0.05;
        (y_min - if y_min < 0.0 { padding } else { 0.0 })..(y_max + padding)
    }
}

fn draw_bar(
    root: &DrawingArea<BitMapBackend<'_>, Shift>,
    entries: &[SeriesEntry<'_>],
    config: &GraphConfig,
    format: &NumberFormat,
) -> Result<()> {
    let count = entries.len();
    let x_range = -0.5..(count as f64 - 0.5);

    let mut chart = ChartBuilder::on(root)
        .margin(10)
        .caption(config.title.as_deref().unwrap_or(""), ("sans-serif", 20))
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, value_range(entries))
        .context("Failed to build chart")?;

    let x_formatter = |x: &f64| category_label(entries, *x, format);
    let y_formatter = |y: &f64| format.format_number(*y);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(count.min(12))
        .x_label_formatter(&x_formatter)
        .y_label_formatter(&y_formatter)
        .x_desc(&config.x_label)
        .y_desc(&config.y_label)
        .draw()
        .context("Failed to draw mesh")?;

    let color = ColorPalette::default().rgb(0);
    chart
        .draw_series(entries.iter().enumerate().map(|(i, entry)| {
            let x = i as f64;
            Rectangle::new([(x - 0.4, 0.0), (x + 0.4, entry.y)], color.filled())
        }))
        .context("Failed to draw bars")?;

    Ok(())
}

fn draw_line(
    root: &DrawingArea<BitMapBackend<'_>, Shift>,
    entries: &[SeriesEntry<'_>],
    config: &GraphConfig,
    format: &NumberFormat,
) -> Result<()> {
    let count = entries.len();
    let x_range = if count == 1 { -1.0..1.0 } else { -0.25..(count as f64 - 0.75) };

    let mut chart = ChartBuilder::on(root)
        .margin(10)
        .caption(config.title.as_deref().unwrap_or(""), ("sans-serif", 20))
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, value_range(entries))
        .context("Failed to build chart")?;

    let x_formatter = |x: &f64| category_label(entries, *x, format);
    let y_formatter = |y: &f64| format.format_number(*y);
    chart
        .configure_mesh()
        .x_labels(count.min(12))
        .x_label_formatter(&x_formatter)
        .y_label_formatter(&y_formatter)
        .x_desc(&config.x_label)
        .y_desc(&config.y_label)
        .draw()
        .context("Failed to draw mesh")?;

    let color = ColorPalette::default().rgb(0);
    let points: Vec<(f64, f64)> = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| (i as f64, entry.y))
        .collect();

    chart
        .draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))
        .context("Failed to draw line series")?;
    chart
        .draw_series(points.into_iter().map(|p| Circle::new(p, 3, color.filled())))
        .context("Failed to draw points")?;

    Ok(())
}

fn draw_pie(
    root: &DrawingArea<BitMapBackend<'_>, Shift>,
    entries: &[SeriesEntry<'_>],
    config: &GraphConfig,
    format: &NumberFormat,
) -> Result<()> {
    // negative values cannot be drawn as slices
    let total: f64 = entries.iter().map(|e| e.y.max(0.0)).sum();
    if total <= 0.0 {
        anyhow::bail!("Pie chart needs at least one positive value");
    }

    let area = match config.title.as_deref() {
        Some(title) => root
            .titled(title, ("sans-serif", 20))
            .context("Failed to draw title")?,
        None => root.clone(),
    };

    let (width, height) = area.dim_in_pixel();
    let center = (width as f64 / 2.0, height as f64 / 2.0);
    let radius = width.min(height) as f64 * 0.35;
    let palette = ColorPalette::default();

    let mut start = -PI / 2.0;
    for (i, entry) in entries.iter().enumerate() {
        let sweep = entry.y.max(0.0) / total * 2.0 * PI;
        if sweep <= 0.0 {
            continue;
        }
        let end = start + sweep;

        let steps = ((sweep / (2.0 * PI)) * 180.0).ceil().max(2.0) as usize;
        let mut points = vec![(center.0 as i32, center.1 as i32)];
        points.extend((0..=steps).map(|s| {
            let angle = start + sweep * s as f64 / steps as f64;
            (
                (center.0 + radius * angle.cos()) as i32,
                (center.1 + radius * angle.sin()) as i32,
            )
        }));
        area.draw(&Polygon::new(points, palette.rgb(i).filled()))
            .context("Failed to draw pie slice")?;

        let mid = start + sweep / 2.0;
        let label = format!(
            "{}: {}",
            format.format_value(entry.x),
            format.format_number(entry.y)
        );
        let anchor = (
            (center.0 + radius * 1.1 * mid.cos()) as i32,
            (center.1 + radius * 1.1 * mid.sin()) as i32,
        );
        let pos = Pos::new(
            if mid.cos() >= 0.0 { HPos::Left } else { HPos::Right },
            VPos::Center,
        );
        area.draw(&Text::new(
            label,
            anchor,
            ("sans-serif", 14).into_font().color(&BLACK).pos(pos),
        ))
        .context("Failed to draw pie label")?;

        start = end;
    }

    Ok(())
}
