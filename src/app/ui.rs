use super::AddressUploader;
use super::LogKind;
use crate::progress::ConnectionStatus;
use crate::upload::XLSX_EXTENSION;
use egui::{Color32, RichText};
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageLevel};

const ACCENT: Color32 = Color32::from_rgb(161, 89, 225);
const ERROR_RED: Color32 = Color32::from_rgb(220, 50, 50);
const SUCCESS_GREEN: Color32 = Color32::from_rgb(0, 180, 0);
const MUTED: Color32 = Color32::from_rgb(150, 150, 150);

/// Blocking native alert.
pub fn show_alert(message: &str) {
    let _ = MessageDialog::new()
        .set_level(MessageLevel::Warning)
        .set_title("Address Geocoder")
        .set_description(message)
        .set_buttons(MessageButtons::Ok)
        .show();
}

impl AddressUploader {
    pub fn render(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_space(20.0);
                ui.vertical_centered(|ui| {
                    ui.heading("Address Geocoder");
                    ui.add_space(5.0);
                    ui.label(
                        RichText::new("Upload a spreadsheet with a \"Full Address\" column to add map coordinates")
                            .color(ui.visuals().text_color().gamma_multiply(0.7)),
                    );
                });

                ui.add_space(20.0);
                self.render_upload_form(ui);

                ui.add_space(20.0);
                self.render_progress_log(ui);

                if self.controller.is_download_visible() {
                    ui.add_space(20.0);
                    self.render_download_section(ui);
                }

                ui.add_space(20.0);
                self.render_connection(ui);
            });
        });
    }

    fn render_upload_form(&mut self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.horizontal(|ui| {
                if ui.button("📄 Select Spreadsheet").clicked() {
                    if let Some(path) = FileDialog::new()
                        .add_filter("Excel workbook", &[XLSX_EXTENSION.trim_start_matches('.')])
                        .add_filter("All files", &["*"])
                        .pick_file()
                    {
                        self.select_file(path);
                    }
                }
                match &self.selected {
                    Some(file) => {
                        ui.label(format!("Selected: {} ({})", file.name, file.size_label()));
                    }
                    None => {
                        ui.label(RichText::new("No file selected").color(MUTED));
                    }
                }
            });
        });

        ui.add_space(20.0);

        ui.vertical_centered(|ui| {
            let button = egui::Button::new(self.controller.submit_label())
                .min_size(egui::vec2(200.0, 40.0));
            if ui
                .add_enabled(self.controller.is_submit_enabled(), button)
                .clicked()
            {
                self.submit();
            }
        });
    }

    fn render_progress_log(&self, ui: &mut egui::Ui) {
        ui.label("Progress");
        egui::Frame::none()
            .fill(ui.style().visuals.extreme_bg_color)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::ScrollArea::vertical()
                    .max_height(240.0)
                    .auto_shrink([false, true])
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        for entry in self.controller.log().entries() {
                            match entry.kind {
                                LogKind::Info => {
                                    ui.label(&entry.text);
                                }
                                LogKind::Notice => {
                                    ui.colored_label(SUCCESS_GREEN, &entry.text);
                                }
                                LogKind::Error => {
                                    ui.colored_label(ERROR_RED, &entry.text);
                                }
                            }
                        }
                    });
            });
    }

    fn render_download_section(&mut self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.vertical_centered(|ui| {
                let button = egui::Button::new("⬇ Download Processed File")
                    .fill(ACCENT)
                    .min_size(egui::vec2(200.0, 32.0));
                if ui.add(button).clicked() {
                    if let Some(file) = self.controller.processed_file() {
                        if let Some(target) = FileDialog::new()
                            .set_file_name(file.name)
                            .add_filter("Excel workbook", &["xlsx"])
                            .save_file()
                        {
                            self.download(target);
                        }
                    }
                }

                if let Some(path) = self.saved_to.clone() {
                    ui.add_space(5.0);
                    ui.horizontal(|ui| {
                        ui.label(format!("Saved to {}", path.display()));
                        if ui.small_button("Open").clicked() {
                            if let Err(e) = open::that(&path) {
                                tracing::warn!("could not open {}: {}", path.display(), e);
                            }
                        }
                    });
                }
            });
        });
    }

    fn render_connection(&self, ui: &mut egui::Ui) {
        let color = match self.connection {
            ConnectionStatus::Connected => SUCCESS_GREEN,
            ConnectionStatus::Connecting => MUTED,
            ConnectionStatus::Disconnected(_) => ERROR_RED,
        };
        ui.vertical_centered(|ui| {
            ui.colored_label(color, self.connection.label());
            ui.label(
                RichText::new(format!("Server: {}", self.config.server_url))
                    .small()
                    .color(MUTED),
            );
        });
    }
}
