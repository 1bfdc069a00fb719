use super::state::{import_button_label, HELP_TEXT, PREVIEW_ROWS};
use super::DataImportApp;
use crate::import::PanelView;
use crate::utils::format_size;
use eframe::egui::{self, Color32, RichText, Stroke};

const ERROR_TEXT: Color32 = Color32::from_rgb(220, 50, 50);
const ERROR_FILL: Color32 = Color32::from_rgb(60, 20, 20);

impl DataImportApp {
    pub fn render(&mut self, ctx: &egui::Context, view: &PanelView) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(12.0);
            ui.group(|ui| {
                ui.heading("Dados");
                ui.label(
                    RichText::new(&view.subtitle)
                        .color(ui.visuals().text_color().gamma_multiply(0.7)),
                );

                ui.add_space(8.0);
                ui.horizontal_wrapped(|ui| {
                    if ui.button("📁 Escolher ficheiro").clicked() {
                        self.choose_file();
                    }

                    let import = egui::Button::new(import_button_label(view.importing));
                    if ui.add_enabled(!view.import_disabled, import).clicked() {
                        self.start_import(ui.ctx());
                    }

                    if ui.button("Ajuda").clicked() {
                        self.controller.open_help();
                    }

                    let reset = egui::Button::new("Grupo Riba");
                    if ui.add_enabled(!view.reset_disabled, reset).clicked() {
                        self.start_reset(ui.ctx());
                    }
                });

                if let Some(name) = &view.staged_name {
                    ui.add_space(6.0);
                    ui.horizontal(|ui| {
                        ui.label("Selecionado:");
                        ui.label(RichText::new(name).strong());
                        if let Some(size) = view.staged_size {
                            ui.label(format!("({})", format_size(size)));
                        }
                    });
                }

                if let Some(error) = &view.error {
                    ui.add_space(6.0);
                    egui::Frame::none()
                        .fill(ERROR_FILL)
                        .stroke(Stroke::new(1.0, ERROR_TEXT))
                        .rounding(4.0)
                        .inner_margin(8.0)
                        .show(ui, |ui| {
                            ui.colored_label(ERROR_TEXT, error.as_str());
                        });
                }
            });

            ui.add_space(12.0);
            self.render_preview(ui);
        });

        self.render_help(ctx, view);
    }

    fn render_preview(&mut self, ui: &mut egui::Ui) {
        if ui.button(self.state.preview_toggle_label()).clicked() {
            self.state.show_preview = !self.state.show_preview;
        }
        if !self.state.show_preview {
            return;
        }

        let preview = self.source.dataset_preview(PREVIEW_ROWS);
        let total = self.source.record_count();
        ui.label(format!(
            "A mostrar {} de {} registos",
            preview.records.len(),
            total
        ));

        egui::ScrollArea::both().max_height(240.0).show(ui, |ui| {
            egui::Grid::new("dataset_preview")
                .striped(true)
                .show(ui, |ui| {
                    for column in &preview.columns {
                        ui.label(RichText::new(column).strong());
                    }
                    ui.end_row();

                    for record in &preview.records {
                        for cell in record {
                            ui.label(cell.as_str());
                        }
                        ui.end_row();
                    }
                });
        });
    }

    fn render_help(&mut self, ctx: &egui::Context, view: &PanelView) {
        if !view.help_open {
            return;
        }

        let mut open = true;
        let mut close_clicked = false;
        egui::Window::new("Ajuda")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(HELP_TEXT);
                ui.add_space(8.0);
                if ui.button("Fechar").clicked() {
                    close_clicked = true;
                }
            });

        if !open || close_clicked {
            self.controller.close_help();
        }
    }
}
