//! CLI entry point for the sales dashboard.
//!
//! Loads a sales CSV from a file or URL, runs the bar, scatter and heatmap
//! pipelines independently, and writes one chart document per chart.

use anyhow::Result;
use clap::{Parser, Subcommand};
use sales_charts::chart::{Chart, ChartData, ChartKind};
use sales_charts::config::{ChartConfig, DashboardConfig};
use sales_charts::loader::{CsvLoader, Loader};
use sales_charts::render::{JsonRenderer, Renderer, S3Renderer};
use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;
use tracing::Instrument;
use tracing::{error, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "sales_charts")]
#[command(about = "Renders sales dashboard charts from a CSV export", long_about = None)]
struct Cli {
    /// JSON file with per-chart layout overrides
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Maximum number of scatter points
    #[arg(long, global = true)]
    sample_cap: Option<usize>,

    /// Only run the given chart(s)
    #[arg(long, value_enum, global = true)]
    only: Vec<ChartKind>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render chart documents from a CSV file or URL
    Render {
        /// Path to file or URL to fetch
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// Directory to write chart documents to
        #[arg(short, long, default_value = "charts")]
        output_dir: String,

        /// Gzip compress chart documents
        #[arg(long, default_value_t = false)]
        gzip: bool,

        /// Optional: S3 bucket to upload chart documents to instead of writing files
        #[arg(long)]
        s3_bucket: Option<String>,
    },
    /// Log per-chart aggregates without rendering
    Summarize {
        /// Path to file or URL to fetch
        #[arg(value_name = "FILE_OR_URL")]
        source: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/sales_charts.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("sales_charts.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let mut dashboard = match &cli.config {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    };
    if let Some(cap) = cli.sample_cap {
        dashboard.scatter.sample_cap = cap;
    }
    let kinds = if cli.only.is_empty() {
        ChartKind::ALL.to_vec()
    } else {
        cli.only.clone()
    };

    match cli.command {
        Commands::Render {
            source,
            output_dir,
            gzip,
            s3_bucket,
        } => {
            let renderer: Arc<dyn Renderer> = match s3_bucket {
                Some(bucket) => {
                    info!(bucket = %bucket, gzip, "S3 upload enabled");
                    Arc::new(S3Renderer::from_env(bucket).await.gzip(gzip))
                }
                None => Arc::new(JsonRenderer::new(&output_dir).gzip(gzip)),
            };
            render_all(&dashboard, &kinds, &source, renderer).await;
        }
        Commands::Summarize { source } => {
            summarize(&dashboard, &kinds, &source).await?;
        }
    }

    Ok(())
}

fn config_for<'a>(dashboard: &'a DashboardConfig, kind: ChartKind) -> &'a ChartConfig {
    match kind {
        ChartKind::Bar => &dashboard.bar,
        ChartKind::Scatter => &dashboard.scatter,
        ChartKind::Heatmap => &dashboard.heatmap,
    }
}

/// Runs each chart's pipeline on its own task. A failing chart is logged
/// and does not stop the others.
#[tracing::instrument(skip(dashboard, renderer), fields(source = %source))]
async fn render_all(
    dashboard: &DashboardConfig,
    kinds: &[ChartKind],
    source: &str,
    renderer: Arc<dyn Renderer>,
) {
    let loader = Arc::new(CsvLoader::new());
    let mut tasks = vec![];

    let mut containers = std::collections::HashSet::new();
    for &kind in kinds {
        let container = &config_for(dashboard, kind).container;
        if !containers.insert(container) {
            warn!(chart = %kind, container = %container, "Container shared with another chart; output will be overwritten");
        }
    }

    for &kind in kinds {
        let chart = Chart::new(kind, config_for(dashboard, kind).clone());
        let loader = loader.clone();
        let renderer = renderer.clone();
        let source = source.to_string();
        let span = tracing::info_span!("chart_pipeline", chart = %kind);

        let task = tokio::spawn(
            async move {
                match chart.refresh(loader.as_ref(), &source, renderer.as_ref()).await {
                    Ok(()) => info!("Chart pipeline finished"),
                    Err(e) => error!(error = %e, "Chart pipeline failed"),
                }
            }
            .instrument(span),
        );
        tasks.push(task);
    }

    for task in tasks {
        if let Err(e) = task.await {
            error!(error = %e, "Chart task panicked");
        }
    }
}

/// Logs what each chart would draw from `source`.
#[tracing::instrument(skip(dashboard), fields(source = %source))]
async fn summarize(dashboard: &DashboardConfig, kinds: &[ChartKind], source: &str) -> Result<()> {
    let rows = CsvLoader::new().load(source).await?;
    info!(rows = rows.len(), "Rows loaded");

    for &kind in kinds {
        let data = match kind.aggregate(&rows, config_for(dashboard, kind)) {
            Ok(data) => data,
            Err(e) => {
                warn!(chart = %kind, error = %e, "Skipping chart");
                continue;
            }
        };
        match &data {
            ChartData::Bar(summary) => {
                for (category, total) in summary.iter() {
                    info!(chart = %kind, category = %category, profit = total, "Category total");
                }
            }
            ChartData::Scatter(sample) => {
                info!(chart = %kind, points = sample.len(), cap = sample.cap(), "Scatter sample");
            }
            ChartData::Heatmap(summary) => {
                for (key, total) in summary.iter() {
                    info!(chart = %kind, category = %key.category, year = key.year, quantity = total, "Cell total");
                }
            }
        }
    }
    Ok(())
}
