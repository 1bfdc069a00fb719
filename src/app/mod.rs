mod state;
mod ui;

use crate::data_source::{DataSource, LocalDataSource};
use crate::import::{ImportController, StagedFile, ACCEPTED_EXTENSIONS};
use eframe::{egui, App};
use rfd::FileDialog;
use state::PanelState;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;

const BUSY_REPAINT: Duration = Duration::from_millis(100);

pub struct DataImportApp {
    controller: ImportController,
    source: Arc<LocalDataSource>,
    runtime: Runtime,
    state: PanelState,
}

impl DataImportApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        source: Arc<LocalDataSource>,
        runtime: Runtime,
    ) -> Self {
        let shared: Arc<dyn DataSource> = source.clone();
        Self {
            controller: ImportController::new(shared),
            source,
            runtime,
            state: PanelState::default(),
        }
    }

    fn choose_file(&mut self) {
        let picked = FileDialog::new()
            .add_filter("Dados (txt, json, csv)", &ACCEPTED_EXTENSIONS)
            .pick_file();
        self.controller
            .stage_file(picked.as_deref().and_then(StagedFile::from_path));
    }

    fn start_import(&mut self, ctx: &egui::Context) {
        let Some(pending) = self.controller.begin_import() else {
            tracing::debug!("Import trigger ignored");
            return;
        };
        let name = pending.file().name().to_string();
        tracing::info!("Importing {}", name);

        let ctx = ctx.clone();
        self.runtime.spawn(async move {
            if let Err(err) = pending.run().await {
                tracing::warn!("Import of {} failed: {}", name, err);
            }
            ctx.request_repaint();
        });
    }

    fn start_reset(&mut self, ctx: &egui::Context) {
        let Some(pending) = self.controller.begin_reset() else {
            tracing::debug!("Reset trigger ignored");
            return;
        };
        tracing::info!("Resetting to sample dataset");

        let ctx = ctx.clone();
        self.runtime.spawn(async move {
            if let Err(err) = pending.run().await {
                tracing::warn!("Reset to sample failed: {}", err);
            }
            ctx.request_repaint();
        });
    }
}

impl App for DataImportApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let view = self.controller.view();
        if view.importing || self.controller.descriptor().loading {
            ctx.request_repaint_after(BUSY_REPAINT);
        }
        self.render(ctx, &view);
    }
}
