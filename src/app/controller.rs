use super::state::{
    Phase, StatusMessage, UploadSession, MSG_PARSE_FAILED, MSG_PROCESSED, MSG_SENDING,
    MSG_UPLOAD_FAILED,
};
use crate::error::UploadError;
use crate::upload::{ArtifactKind, ResultLinks, SelectedFile, UploadBackend, UploadReply};
use derivative::Derivative;
use std::sync::mpsc::{Receiver, TryRecvError};

/// One element of the results area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderItem<'a> {
    Download { url: &'a str },
    Frame { kind: ArtifactKind, url: &'a str },
}

/// Drives the select → submit → result cycle for a single session.
#[derive(Derivative, Default)]
#[derivative(Debug)]
pub struct UploadController {
    session: UploadSession,
    alert: Option<String>,
    #[derivative(Debug = "ignore")]
    reply_receiver: Option<Receiver<UploadReply>>,
}

impl UploadController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> &UploadSession {
        &self.session
    }

    pub fn phase(&self) -> Phase {
        self.session.phase
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.session.status.as_ref()
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.session.selected_file.as_ref()
    }

    pub fn result_links(&self) -> Option<&ResultLinks> {
        self.session.result_links.as_ref()
    }

    pub fn visuals_visible(&self) -> bool {
        self.session.visuals_visible
    }

    pub fn can_submit(&self) -> bool {
        self.session.selected_file.is_some() && !self.session.is_submitting()
    }

    /// Replaces the chosen file and wipes everything derived from the previous one.
    pub fn select_file(&mut self, file: SelectedFile) {
        tracing::info!(file = %file.name, bytes = file.size(), "file selected");
        self.session.selected_file = Some(file);
        self.session.status = None;
        self.session.clear_results();

        match self.session.phase {
            Phase::Succeeded | Phase::Failed => self.session.phase = Phase::Idle,
            // An in-flight request still completes and reports into this session.
            Phase::Idle | Phase::Submitting => {}
        }
    }

    /// Hands the selected file to `backend`. Returns whether a request was issued.
    pub fn submit(&mut self, backend: &impl UploadBackend) -> bool {
        if !self.can_submit() {
            tracing::debug!(phase = ?self.session.phase, "submit ignored");
            return false;
        }
        let Some(file) = self.session.selected_file.clone() else {
            return false;
        };

        self.session.phase = Phase::Submitting;
        self.session.status = Some(StatusMessage::info(MSG_SENDING));
        self.session.clear_results();

        self.reply_receiver = Some(backend.start_upload(file));
        true
    }

    /// Picks up the upload reply if it has arrived. Returns whether state changed.
    pub fn poll(&mut self) -> bool {
        let Some(receiver) = &self.reply_receiver else {
            return false;
        };

        match receiver.try_recv() {
            Ok(reply) => {
                self.reply_receiver = None;
                self.apply_reply(reply);
                true
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => {
                self.reply_receiver = None;
                self.apply_reply(Err(UploadError::Worker(
                    "worker exited without a reply".to_string(),
                )));
                true
            }
        }
    }

    pub fn apply_reply(&mut self, reply: UploadReply) {
        if !self.session.is_submitting() {
            tracing::warn!(phase = ?self.session.phase, "dropping upload reply outside of submission");
            return;
        }

        match reply {
            Ok(raw) => match raw.into_links() {
                Ok(links) => {
                    tracing::info!(artifacts = links.present().len(), "file processed");
                    self.session.result_links = Some(links);
                    self.session.phase = Phase::Succeeded;
                    self.session.status = Some(StatusMessage::success(MSG_PROCESSED));
                }
                Err(err) => {
                    tracing::warn!(error = ?err, "rejected modeling service response");
                    self.session.phase = Phase::Failed;
                    self.session.status = Some(StatusMessage::error(MSG_PARSE_FAILED));
                    self.alert = Some(format!("Upload failed: {err}"));
                }
            },
            Err(err) => {
                tracing::error!(error = %err, "upload failed");
                self.session.phase = Phase::Failed;
                self.session.status = Some(StatusMessage::error(MSG_UPLOAD_FAILED));
            }
        }
    }

    pub fn toggle_visuals(&mut self) {
        if self.session.result_links.is_some() {
            self.session.visuals_visible = !self.session.visuals_visible;
        }
    }

    pub fn available_artifacts(&self) -> Vec<(ArtifactKind, &str)> {
        self.session
            .result_links
            .as_ref()
            .map(ResultLinks::present)
            .unwrap_or_default()
    }

    pub fn has_visuals(&self) -> bool {
        self.available_artifacts()
            .iter()
            .any(|(kind, _)| kind.is_visualization())
    }

    /// The report download is always listed; frames only while visuals are shown.
    pub fn render_items(&self) -> Vec<RenderItem<'_>> {
        let visible = self.session.visuals_visible;
        self.available_artifacts()
            .into_iter()
            .filter_map(|(kind, url)| match kind {
                ArtifactKind::Report => Some(RenderItem::Download { url }),
                _ if visible => Some(RenderItem::Frame { kind, url }),
                _ => None,
            })
            .collect()
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn raise_alert(&mut self, message: impl Into<String>) {
        self.alert = Some(message.into());
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    /// Starts over with an empty session. Ignored while a request is in flight.
    pub fn reset(&mut self) {
        if self.session.is_submitting() {
            return;
        }
        tracing::info!("resetting session");
        self.session.clear();
        self.alert = None;
    }
}
