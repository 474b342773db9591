use super::{DownloadState, RenderItem, Severity, TopicDashboard};
use crate::upload::{ArtifactKind, ResultLinks};
use crate::utils::file_size::human_size;
use eframe::egui::{self, Align2, Color32, RichText};

const ACCENT: Color32 = Color32::from_rgb(43, 108, 176);
const SUCCESS: Color32 = Color32::from_rgb(0, 180, 0);
const ERROR: Color32 = Color32::from_rgb(220, 50, 50);

/// Clicks collected while drawing, applied once the frame's borrows are released.
enum UiAction {
    PickFile,
    Submit,
    ToggleVisuals,
    DownloadReport(String),
    OpenLink(String),
    Reset,
    DismissAlert,
}

impl TopicDashboard {
    pub fn render(&mut self, ctx: &egui::Context) {
        let mut actions = Vec::new();

        let enabled = self.accepts_input();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_enabled_ui(enabled, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.add_space(20.0);
                    ui.vertical_centered(|ui| {
                        ui.heading(RichText::new("Topic Modeling and Clustering Dashboard").color(ACCENT));
                        ui.add_space(5.0);
                        ui.label(
                            RichText::new("📁 Upload CSV or Excel for Topic Modeling")
                                .color(ui.visuals().text_color().gamma_multiply(0.7)),
                        );
                    });

                    ui.add_space(20.0);
                    self.render_file_picker(ui, &mut actions);

                    ui.add_space(15.0);
                    self.render_submit(ui, &mut actions);

                    if let Some(status) = self.controller.status() {
                        ui.add_space(10.0);
                        let color = match status.severity {
                            Severity::Info => ui.visuals().text_color().gamma_multiply(0.7),
                            Severity::Success => SUCCESS,
                            Severity::Error => ERROR,
                        };
                        ui.vertical_centered(|ui| {
                            ui.label(RichText::new(&status.text).italics().color(color));
                        });
                    }

                    if self.controller.result_links().is_some() {
                        ui.add_space(20.0);
                        self.render_results(ui, &mut actions);
                    }

                    ui.add_space(20.0);
                });
            });
        });

        if let Some(message) = self.controller.alert() {
            egui::Window::new("Upload failed")
                .collapsible(false)
                .resizable(false)
                .anchor(Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
                .show(ctx, |ui| {
                    ui.label(message);
                    ui.add_space(8.0);
                    ui.vertical_centered(|ui| {
                        if ui.button("OK").clicked() {
                            actions.push(UiAction::DismissAlert);
                        }
                    });
                });
        }

        for action in actions {
            self.apply(action);
        }
    }

    fn render_file_picker(&self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        ui.group(|ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(8.0);
                let label = match self.controller.selected_file() {
                    Some(file) => format!("{} ({})", file.name, human_size(file.size())),
                    None => "Click to choose a file, or drop one here".to_string(),
                };
                ui.label(RichText::new(label).strong());
                ui.add_space(6.0);
                if ui.button("📂 Choose File").clicked() {
                    actions.push(UiAction::PickFile);
                }
                ui.label(
                    RichText::new("Accepted: .csv, .xlsx")
                        .small()
                        .color(ui.visuals().text_color().gamma_multiply(0.6)),
                );
                ui.add_space(8.0);
            });
        });
    }

    fn render_submit(&self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        ui.vertical_centered(|ui| {
            if self.controller.session().is_submitting() {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Processing...");
                });
                return;
            }

            let button = egui::Button::new(RichText::new("📤 Upload & Process").color(Color32::WHITE))
                .fill(ACCENT)
                .min_size(egui::vec2(200.0, 40.0));
            if ui.add_enabled(self.controller.can_submit(), button).clicked() {
                actions.push(UiAction::Submit);
            }

            if self.controller.selected_file().is_some() || self.controller.alert().is_some() {
                ui.add_space(5.0);
                if ui.button("🗑 Clear").clicked() {
                    actions.push(UiAction::Reset);
                }
            }
        });
    }

    fn render_results(&self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        ui.group(|ui| {
            ui.label(RichText::new("✅ Output Files").strong());
            ui.add_space(8.0);

            if self.controller.result_links().is_some_and(ResultLinks::is_empty) {
                ui.label(
                    RichText::new("The service returned no output files.")
                        .italics()
                        .color(ui.visuals().text_color().gamma_multiply(0.7)),
                );
                return;
            }

            let mut frames = Vec::new();
            for item in self.controller.render_items() {
                match item {
                    RenderItem::Download { url } => {
                        ui.horizontal(|ui| {
                            let busy = self.download == DownloadState::InProgress;
                            if ui
                                .add_enabled(!busy, egui::Button::new("📄 Download CSV Report"))
                                .clicked()
                            {
                                actions.push(UiAction::DownloadReport(url.to_string()));
                            }
                            self.render_download_state(ui);
                        });
                    }
                    RenderItem::Frame { kind, url } => frames.push((kind, url)),
                }
            }

            if self.controller.has_visuals() {
                ui.add_space(4.0);
                let label = if self.controller.visuals_visible() {
                    "🌳 Hide Visualizations"
                } else {
                    "🌳 View Visualizations"
                };
                if ui.button(label).clicked() {
                    actions.push(UiAction::ToggleVisuals);
                }
            }

            for (kind, url) in frames {
                ui.add_space(8.0);
                render_visualization(ui, kind, url, actions);
            }
        });
    }

    fn render_download_state(&self, ui: &mut egui::Ui) {
        match &self.download {
            DownloadState::Idle => {}
            DownloadState::InProgress => {
                ui.spinner();
            }
            DownloadState::Saved(path) => {
                ui.colored_label(SUCCESS, format!("Saved to {}", path.display()));
            }
            DownloadState::Failed(reason) => {
                ui.colored_label(ERROR, format!("Download failed: {reason}"));
            }
        }
    }

    fn apply(&mut self, action: UiAction) {
        if !self.accepts_input() && !matches!(action, UiAction::DismissAlert) {
            return;
        }
        match action {
            UiAction::PickFile => self.pick_file(),
            UiAction::Submit => self.submit(),
            UiAction::ToggleVisuals => self.controller.toggle_visuals(),
            UiAction::DownloadReport(url) => self.prompt_report_download(&url),
            UiAction::OpenLink(url) => {
                if let Err(e) = open::that(&url) {
                    tracing::error!(%url, error = %e, "failed to open link");
                }
            }
            UiAction::Reset => self.reset(),
            UiAction::DismissAlert => self.controller.dismiss_alert(),
        }
    }
}

fn render_visualization(
    ui: &mut egui::Ui,
    kind: ArtifactKind,
    url: &str,
    actions: &mut Vec<UiAction>,
) {
    egui::Frame::none()
        .fill(ui.style().visuals.extreme_bg_color)
        .rounding(8.0)
        .inner_margin(10.0)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(RichText::new(kind.title()).strong());
            ui.add_space(4.0);
            ui.hyperlink_to(RichText::new(url).monospace().small(), url);
            ui.add_space(4.0);
            if ui.button("🌐 Open in browser").clicked() {
                actions.push(UiAction::OpenLink(url.to_string()));
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Phase;
    use crate::config::Settings;
    use crate::upload::{ModelingClient, SelectedFile, ThreadedBackend};

    fn dashboard_with_alert() -> TopicDashboard {
        let client = ModelingClient::new(&Settings::default()).expect("client");
        let mut app = TopicDashboard::with_backend(ThreadedBackend::new(client));
        app.select(SelectedFile::new("data.csv", b"a,b\n".to_vec()));
        app.controller.raise_alert("Upload failed: boom");
        app
    }

    #[test]
    fn alert_blocks_panel_actions_until_dismissed() {
        let mut app = dashboard_with_alert();
        assert!(!app.accepts_input());

        app.apply(UiAction::Submit);
        app.apply(UiAction::Reset);
        assert_eq!(app.controller().phase(), Phase::Idle);
        assert!(app.controller().selected_file().is_some());
        assert!(app.controller().alert().is_some());

        app.apply(UiAction::DismissAlert);
        assert!(app.accepts_input());
        assert!(app.controller().alert().is_none());

        app.apply(UiAction::Reset);
        assert!(app.controller().selected_file().is_none());
    }

    #[test]
    fn frame_with_alert_renders_and_keeps_state() {
        let mut app = dashboard_with_alert();
        let ctx = egui::Context::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| app.render(ctx));

        assert!(!app.accepts_input());
        assert_eq!(app.controller().phase(), Phase::Idle);
    }
}
