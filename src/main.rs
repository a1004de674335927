use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use sheetplot::format::NumberFormat;
use sheetplot::graph::{self, GraphConfig};
use sheetplot::projection::{ChartKind, ChartSeries};
use sheetplot::session::Session;
use sheetplot::stats::SummaryStatistics;

#[derive(Parser, Debug)]
#[command(name = "sheetplot")]
#[command(about = "Chart two columns of a CSV or Excel file", long_about = None)]
struct Args {
    #[arg(help = "Input file (.csv, .xlsx or .xls)")]
    file: PathBuf,

    #[arg(short = 'x', long = "x", help = "X-axis column (defaults to the first column)")]
    x_column: Option<String>,

    #[arg(short = 'y', long = "y", help = "Y-axis column (defaults to the best numeric column)")]
    y_column: Option<String>,

    #[arg(short = 'c', long = "chart", value_enum, default_value = "bar", help = "Chart kind")]
    chart: ChartArg,

    #[arg(long = "output", value_enum, default_value = "png", help = "What to write to stdout")]
    output: OutputArg,

    #[arg(long = "width", default_value = "800", help = "Output width in pixels")]
    width: u32,

    #[arg(long = "height", default_value = "600", help = "Output height in pixels")]
    height: u32,

    #[arg(short = 't', long = "title", help = "Chart title")]
    title: Option<String>,

    #[arg(long = "locale", default_value = "en", help = "Locale for number grouping (en, de, fr, ...)")]
    locale: String,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ChartArg {
    Bar,
    Line,
    Pie,
}

impl From<ChartArg> for ChartKind {
    fn from(arg: ChartArg) -> Self {
        match arg {
            ChartArg::Bar => ChartKind::Bar,
            ChartArg::Line => ChartKind::Line,
            ChartArg::Pie => ChartKind::Pie,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputArg {
    /// Rendered chart as PNG
    Png,
    /// Columns, axes and statistics as text
    Summary,
    /// Bounded chart series as CSV
    Table,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let mut session = Session::new();
    if session.upload(&args.file).await.is_err() {
        // the session already holds the user-facing message
        anyhow::bail!(session.error().unwrap_or("Error processing file").to_string());
    }

    if args.x_column.is_some() {
        session.set_x_column(args.x_column.clone());
    }
    if args.y_column.is_some() {
        session.set_y_column(args.y_column.clone());
    }
    session.set_chart_kind(args.chart.into());

    let format = NumberFormat::from_tag(&args.locale);
    let output = match args.output {
        OutputArg::Png => render_png(&session, &args, &format)?,
        OutputArg::Summary => render_summary(&session, &format),
        OutputArg::Table => render_table(&session, &format)?,
    };

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(&output)
        .context("Failed to write output to stdout")?;
    handle.flush().context("Failed to flush stdout")?;

    Ok(())
}

fn selected_series<'a>(session: &'a Session) -> Result<ChartSeries<'a>> {
    session
        .chart_series()
        .context("No Y-axis column selected; the file has no numeric columns (use --y)")
}

fn render_png(session: &Session, args: &Args, format: &NumberFormat) -> Result<Vec<u8>> {
    let series = selected_series(session)?;
    let config = GraphConfig {
        title: args.title.clone(),
        x_label: series.x_column.clone(),
        y_label: series.y_column.clone(),
        width: args.width,
        height: args.height,
    };
    graph::render_chart(&series, session.chart_kind(), &config, format)
        .context("Failed to generate chart")
}

fn render_summary(session: &Session, format: &NumberFormat) -> Vec<u8> {
    let axes = session.axes();
    let mut out = String::new();
    out.push_str(&format!("Columns: {}\n", session.columns().join(", ")));
    out.push_str(&format!("X axis: {}\n", axes.x.as_deref().unwrap_or("")));
    out.push_str(&format!("Y axis: {}\n", axes.y.as_deref().unwrap_or("")));
    if let Some(series) = session.chart_series() {
        out.push_str(&format!("Chart points: {}\n", series.len()));
    }
    if let Some(stats) = session.statistics() {
        out.push_str(&format_statistics(&stats, format));
    }
    out.into_bytes()
}

fn format_statistics(stats: &SummaryStatistics, format: &NumberFormat) -> String {
    let show = |v: Option<f64>| v.map(|n| format.format_number(n)).unwrap_or_else(|| "-".to_string());
    format!(
        "Count: {}\nMin: {}\nMax: {}\nMean: {}\n",
        stats.count,
        show(stats.min),
        show(stats.max),
        show(stats.mean)
    )
}

fn render_table(session: &Session, format: &NumberFormat) -> Result<Vec<u8>> {
    let series = selected_series(session)?;
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record([series.x_column.as_str(), series.y_column.as_str()])
        .context("Failed to write CSV header")?;
    for entry in series.entries_for(session.chart_kind()) {
        writer
            .write_record([format.format_value(entry.x), entry.y.to_string()])
            .context("Failed to write CSV record")?;
    }
    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to finish CSV output: {}", e.error()))
}
