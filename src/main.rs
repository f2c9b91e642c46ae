use anyhow::{anyhow, Context};
use clap::Parser;
use eframe::egui;
use std::path::PathBuf;

use focus_surgery::app::FocusApp;
use focus_surgery::config::Config;
use focus_surgery::logging;
use focus_surgery::store::AppStore;

#[derive(Parser, Debug)]
#[command(name = "focus-surgery", about = "Inspect media nodes and paint repair masks")]
struct Args {
    /// Images or videos to load as nodes.
    media: Vec<PathBuf>,

    /// JSON settings file.
    #[arg(long, default_value = "focus-surgery.json")]
    config: PathBuf,

    /// Verbose logging; honours RUST_LOG.
    #[arg(long)]
    debug: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    logging::init(args.debug || config.debug);

    let mut store = AppStore::new();
    for path in &args.media {
        if !path.exists() {
            tracing::warn!(path = %path.display(), "file not found, skipping");
            continue;
        }
        store.add_path(path);
    }
    if let Some(first) = store.nodes().first().map(|n| n.id.clone()) {
        store.set_active_node(Some(first.as_str()));
    }
    tracing::info!(nodes = store.nodes().len(), "starting");

    let title = "focus-surgery";
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_title(title),
        ..Default::default()
    };

    eframe::run_native(
        title,
        options,
        Box::new(move |_cc| Ok(Box::new(FocusApp::new(&config, store)))),
    )
    .map_err(|err| anyhow!("failed to run eframe: {err}"))
}
