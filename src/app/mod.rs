mod controller;
mod state;
mod ui;

use crate::error::UploadError;
use crate::upload::{DownloadReply, SelectedFile, ThreadedBackend};
use crate::utils::link_name::report_file_name;
use eframe::{egui, App};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Duration;

pub use controller::{RenderItem, UploadController};
pub use state::{Phase, Severity, StatusMessage, UploadSession};

const BUSY_REPAINT_INTERVAL: Duration = Duration::from_millis(100);

/// Progress of saving the report to disk. Independent of the upload session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadState {
    Idle,
    InProgress,
    Saved(PathBuf),
    Failed(String),
}

impl Default for DownloadState {
    fn default() -> Self {
        Self::Idle
    }
}

pub struct TopicDashboard {
    controller: UploadController,
    backend: ThreadedBackend,
    download: DownloadState,
    download_receiver: Option<Receiver<DownloadReply>>,
}

impl TopicDashboard {
    pub fn new(_cc: &eframe::CreationContext<'_>, backend: ThreadedBackend) -> Self {
        tracing::info!(endpoint = backend.client().endpoint(), "initializing dashboard");
        Self::with_backend(backend)
    }

    pub fn with_backend(backend: ThreadedBackend) -> Self {
        Self {
            controller: UploadController::new(),
            backend,
            download: DownloadState::default(),
            download_receiver: None,
        }
    }

    pub fn controller(&self) -> &UploadController {
        &self.controller
    }

    pub fn download_state(&self) -> &DownloadState {
        &self.download
    }

    /// False while an alert is waiting to be dismissed.
    pub fn accepts_input(&self) -> bool {
        self.controller.alert().is_none()
    }

    /// Reads `path` and makes it the selected file, or raises an alert if it cannot be read.
    pub fn choose_file(&mut self, path: &Path) {
        match SelectedFile::from_path(path) {
            Ok(file) => self.select(file),
            Err(err) => {
                tracing::error!(error = %err, "could not read selected file");
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| path.display().to_string());
                let reason = match err {
                    UploadError::Io { source, .. } => source.to_string(),
                    other => other.to_string(),
                };
                self.controller
                    .raise_alert(format!("Could not read {name}: {reason}"));
            }
        }
    }

    pub fn accept_dropped(&mut self, dropped: egui::DroppedFile) {
        if let Some(path) = dropped.path.as_deref() {
            self.choose_file(path);
        } else if let Some(bytes) = dropped.bytes {
            self.select(SelectedFile::new(dropped.name, bytes.to_vec()));
        } else {
            tracing::warn!(name = %dropped.name, "dropped file carried neither path nor bytes");
        }
    }

    fn select(&mut self, file: SelectedFile) {
        self.controller.select_file(file);
        if self.download != DownloadState::InProgress {
            self.download = DownloadState::Idle;
        }
    }

    pub fn submit(&mut self) {
        self.controller.submit(&self.backend);
    }

    pub fn reset(&mut self) {
        self.controller.reset();
        if self.download != DownloadState::InProgress {
            self.download = DownloadState::Idle;
        }
    }

    pub fn start_report_download(&mut self, url: &str, dest: PathBuf) {
        if self.download == DownloadState::InProgress {
            return;
        }
        tracing::info!(%url, dest = %dest.display(), "saving report");
        self.download_receiver = Some(self.backend.start_download(url.to_string(), dest));
        self.download = DownloadState::InProgress;
    }

    fn prompt_report_download(&mut self, url: &str) {
        let suggested = report_file_name(url);
        if let Some(dest) = rfd::FileDialog::new()
            .set_file_name(&suggested)
            .save_file()
        {
            self.start_report_download(url, dest);
        }
    }

    fn pick_file(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Spreadsheets", &["csv", "xlsx", "xls"])
            .pick_file()
        {
            self.choose_file(&path);
        }
    }

    pub fn update_state(&mut self, ctx: &egui::Context) {
        if self.accepts_input() {
            let dropped = ctx.input(|i| i.raw.dropped_files.clone());
            for file in dropped.into_iter().take(1) {
                self.accept_dropped(file);
            }
        }

        let mut changed = self.controller.poll();

        if let Some(receiver) = &self.download_receiver {
            let finished = match receiver.try_recv() {
                Ok(Ok(path)) => Some(DownloadState::Saved(path)),
                Ok(Err(err)) => {
                    tracing::error!(error = %err, "report download failed");
                    Some(DownloadState::Failed(err.to_string()))
                }
                Err(TryRecvError::Empty) => None,
                Err(TryRecvError::Disconnected) => {
                    Some(DownloadState::Failed("download worker stopped".to_string()))
                }
            };
            if let Some(state) = finished {
                self.download = state;
                self.download_receiver = None;
                changed = true;
            }
        }

        if changed {
            ctx.request_repaint();
        }
        if self.controller.session().is_submitting() || self.download_receiver.is_some() {
            ctx.request_repaint_after(BUSY_REPAINT_INTERVAL);
        }
    }
}

impl App for TopicDashboard {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_state(ctx);
        self.render(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::upload::ModelingClient;

    fn dashboard() -> TopicDashboard {
        let client = ModelingClient::new(&Settings::default()).expect("client");
        TopicDashboard::with_backend(ThreadedBackend::new(client))
    }

    #[test]
    fn unreadable_file_raises_alert_and_keeps_session() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut app = dashboard();

        app.choose_file(&dir.path().join("gone.csv"));

        assert!(app.controller().selected_file().is_none());
        assert_eq!(app.controller().phase(), Phase::Idle);
        let alert = app.controller().alert().expect("alert");
        assert!(alert.starts_with("Could not read gone.csv: "), "{alert}");
    }

    #[test]
    fn readable_file_becomes_selection() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("data.csv");
        std::fs::write(&path, "a,b\n").expect("write");
        let mut app = dashboard();

        app.choose_file(&path);

        let file = app.controller().selected_file().expect("selected");
        assert_eq!(file.name, "data.csv");
        assert_eq!(file.bytes, b"a,b\n");
        assert!(app.controller().can_submit());
    }

    #[test]
    fn dropped_bytes_are_accepted_without_a_path() {
        let mut app = dashboard();
        app.accept_dropped(egui::DroppedFile {
            name: "pasted.xlsx".to_string(),
            bytes: Some(vec![1_u8, 2, 3].into()),
            ..Default::default()
        });

        let file = app.controller().selected_file().expect("selected");
        assert_eq!(file.name, "pasted.xlsx");
        assert_eq!(file.size(), 3);
    }

    #[test]
    fn drops_are_ignored_while_an_alert_is_up() {
        let mut app = dashboard();
        app.controller.raise_alert("Upload failed: boom");
        let ctx = egui::Context::default();
        let input = egui::RawInput {
            dropped_files: vec![egui::DroppedFile {
                name: "late.csv".to_string(),
                bytes: Some(vec![1_u8].into()),
                ..Default::default()
            }],
            ..Default::default()
        };

        let _ = ctx.run(input, |ctx| app.update_state(ctx));

        assert!(app.controller().selected_file().is_none());
        assert!(!app.accepts_input());
    }

    #[test]
    fn idle_frame_changes_nothing() {
        let mut app = dashboard();
        app.update_state(&egui::Context::default());
        assert_eq!(app.controller().session(), &UploadSession::default());
        assert_eq!(app.download_state(), &DownloadState::Idle);
    }
}
