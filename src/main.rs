use anyhow::Context;
use dados_import::app::DataImportApp;
use dados_import::config::AppConfig;
use dados_import::data_source::{LocalDataSource, SampleDataset};
use dados_import::logging;
use eframe::egui;
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    if let Err(err) = logging::init() {
        eprintln!("{err}");
    }

    let config = AppConfig::load();
    let sample = config.sample_dataset().unwrap_or_else(|err| {
        tracing::warn!("{err}; using built-in sample");
        SampleDataset::builtin()
    });
    let source = Arc::new(LocalDataSource::new(sample).context("Failed to load sample dataset")?);
    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height])
            .with_min_inner_size([420.0, 320.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Dados",
        options,
        Box::new(move |cc| Box::new(DataImportApp::new(cc, source, runtime))),
    )
    .map_err(|err| anyhow::anyhow!("{err}"))
}
