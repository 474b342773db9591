use anyhow::Context;
use clap::Parser;
use eframe::CreationContext;
use std::path::PathBuf;
use topic_dashboard::config::{load_settings, Overrides};
use topic_dashboard::{ModelingClient, ThreadedBackend, TopicDashboard};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "topic_dashboard",
    version,
    about = "Upload CSV/Excel files for topic modeling and browse the results"
)]
struct Args {
    /// Modeling service endpoint the file is posted to.
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,

    /// Upload request timeout in seconds (0 disables it).
    #[arg(long, value_name = "SECS")]
    timeout_secs: Option<u64>,

    /// Settings file to use instead of the per-user config.toml.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let settings = load_settings(&Overrides {
        config_path: args.config,
        endpoint: args.endpoint,
        timeout_secs: args.timeout_secs,
    })
    .context("failed to load settings")?;

    let client = ModelingClient::new(&settings).context("failed to build HTTP client")?;
    let backend = ThreadedBackend::new(client);

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_title("Topic Modeling and Clustering Dashboard")
            .with_inner_size([720.0, 760.0])
            .with_min_inner_size([480.0, 520.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Topic Modeling and Clustering Dashboard",
        options,
        Box::new(move |cc: &CreationContext| Box::new(TopicDashboard::new(cc, backend))),
    )
    .map_err(|e| anyhow::anyhow!("failed to run the dashboard window: {e}"))
}
