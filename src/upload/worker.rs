use crate::error::UploadError;
use crate::upload::client::ModelingClient;
use crate::upload::types::{RawResponse, SelectedFile};
use std::future::Future;
use std::path::PathBuf;
use std::sync::mpsc::{self as std_mpsc, Receiver};

pub type UploadReply = Result<RawResponse, UploadError>;
pub type DownloadReply = Result<PathBuf, UploadError>;

/// Runs uploads away from the UI thread.
///
/// Each call starts exactly one request. The reply arrives once on the returned
/// channel; a channel that disconnects without a reply means the worker died.
pub trait UploadBackend {
    fn start_upload(&self, file: SelectedFile) -> Receiver<UploadReply>;
}

/// Spawns one OS thread with its own tokio runtime per job.
#[derive(Clone, Debug)]
pub struct ThreadedBackend {
    client: ModelingClient,
}

impl ThreadedBackend {
    pub fn new(client: ModelingClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ModelingClient {
        &self.client
    }

    /// Fetches `url` and writes it to `dest`.
    pub fn start_download(&self, url: String, dest: PathBuf) -> Receiver<DownloadReply> {
        let client = self.client.clone();
        spawn_job("report-download", move || download_to(client, url, dest))
    }
}

async fn download_to(client: ModelingClient, url: String, dest: PathBuf) -> DownloadReply {
    let bytes = client.download(&url).await?;
    tokio::fs::write(&dest, &bytes)
        .await
        .map_err(|source| UploadError::Io {
            path: dest.clone(),
            source,
        })?;
    tracing::info!(path = %dest.display(), bytes = bytes.len(), "report saved");
    Ok(dest)
}

impl UploadBackend for ThreadedBackend {
    fn start_upload(&self, file: SelectedFile) -> Receiver<UploadReply> {
        let client = self.client.clone();
        spawn_job("upload", move || async move { client.send(&file).await })
    }
}

fn spawn_job<T, F, Fut>(name: &str, job: F) -> Receiver<Result<T, UploadError>>
where
    T: Send + 'static,
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, UploadError>>,
{
    let (sender, receiver) = std_mpsc::channel();

    let spawned = std::thread::Builder::new()
        .name(name.to_string())
        .spawn(move || {
            let result = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt.block_on(job()),
                Err(e) => Err(UploadError::Worker(format!(
                    "failed to build async runtime: {e}"
                ))),
            };
            // The UI may have gone away; nothing left to notify.
            let _ = sender.send(result);
        });

    if let Err(e) = spawned {
        // The sender was dropped with the closure, so the receiver reports a disconnect.
        tracing::error!(job = name, error = %e, "failed to spawn worker thread");
    }

    receiver
}
