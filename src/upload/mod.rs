mod client;
mod types;
mod worker;

pub use client::ModelingClient;
pub use types::{ArtifactKind, RawResponse, ResultLinks, SelectedFile};
pub use worker::{DownloadReply, ThreadedBackend, UploadBackend, UploadReply};
