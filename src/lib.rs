//! Desktop client for a remote topic modeling and clustering service.
//!
//! The user picks a CSV/Excel file, it is posted to the configured endpoint and the
//! returned artifact links are shown as a report download plus visualization pages.

pub mod app;
pub mod config;
pub mod error;
pub mod upload;
pub mod utils;

pub use app::{Phase, RenderItem, Severity, StatusMessage, TopicDashboard, UploadController};
pub use config::Settings;
pub use error::{ConfigError, ResponseError, UploadError};
pub use upload::{
    ArtifactKind, ModelingClient, RawResponse, ResultLinks, SelectedFile, ThreadedBackend,
    UploadBackend,
};
