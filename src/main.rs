mod api;
mod app;
mod color;
mod config;
mod data;
mod error;
mod state;
mod ui;

use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use app::PrecipHarmonicsApp;
use clap::Parser;
use eframe::egui;

use api::HttpAnalysisClient;
use config::Cli;
use state::AppState;

fn main() -> Result<()> {
    // A missing .env is fine; flags and the real environment still apply.
    let _ = dotenvy::dotenv();
    env_logger::init();

    let cli = Cli::parse();
    let api_config = cli.api_config()?;
    log::info!("Analysis endpoint: {}", api_config.endpoint());

    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;
    let client = Arc::new(HttpAnalysisClient::new(api_config));
    let mut state = AppState::new(client, runtime.handle().clone(), cli.stale_policy());
    if let Some(path) = &cli.file {
        state.select_file(path);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Precipitation Harmonics",
        options,
        Box::new(|cc| Ok(Box::new(PrecipHarmonicsApp::new(cc, state)))),
    )
    .map_err(|e| anyhow!("{e}"))?;

    drop(runtime);
    Ok(())
}
