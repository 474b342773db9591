use crate::upload::{ResultLinks, SelectedFile};

pub const MSG_SENDING: &str = "Sending file to server...";
pub const MSG_PROCESSED: &str = "File processed successfully!";
pub const MSG_PARSE_FAILED: &str = "Failed to parse response.";
pub const MSG_UPLOAD_FAILED: &str = "Upload failed.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

impl Default for Phase {
    fn default() -> Self {
        Self::Idle
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub severity: Severity,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            severity: Severity::Info,
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            severity: Severity::Success,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            severity: Severity::Error,
        }
    }
}

/// State of one file's upload/result cycle. Lives only in memory.
///
/// `result_links` is `Some` exactly when `phase` is `Succeeded`; the controller
/// keeps that true across every transition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadSession {
    pub selected_file: Option<SelectedFile>,
    pub phase: Phase,
    pub result_links: Option<ResultLinks>,
    pub status: Option<StatusMessage>,
    pub visuals_visible: bool,
}

impl UploadSession {
    pub fn clear(&mut self) {
        *self = UploadSession::default();
    }

    pub(crate) fn clear_results(&mut self) {
        self.result_links = None;
        self.visuals_visible = false;
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == Phase::Submitting
    }

    pub fn links_consistent_with_phase(&self) -> bool {
        self.result_links.is_some() == (self.phase == Phase::Succeeded)
    }
}
