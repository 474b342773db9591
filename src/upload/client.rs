use crate::config::Settings;
use crate::error::UploadError;
use crate::upload::types::{RawResponse, SelectedFile};
use reqwest::multipart::{Form, Part};

/// HTTP access to the topic modeling service.
#[derive(Clone, Debug)]
pub struct ModelingClient {
    http: reqwest::Client,
    endpoint: String,
}

impl ModelingClient {
    pub fn new(settings: &Settings) -> Result<Self, UploadError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            endpoint: settings.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Posts the file as a single multipart part named `file`.
    ///
    /// Any HTTP response is returned as-is, whatever its status; only failures
    /// before the body text is read become errors.
    pub async fn send(&self, file: &SelectedFile) -> Result<RawResponse, UploadError> {
        tracing::info!(
            file = %file.name,
            bytes = file.size(),
            endpoint = %self.endpoint,
            "posting file to modeling service"
        );

        let part = Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(file.mime_type())?;
        let form = Form::new().part("file", part);

        let response = self
            .http
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        tracing::info!(%status, body_len = body.len(), "modeling service responded");

        Ok(RawResponse { status, body })
    }

    /// Fetches an artifact, failing on any non-success status.
    pub async fn download(&self, url: &str) -> Result<Vec<u8>, UploadError> {
        tracing::info!(%url, "downloading artifact");
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%url, %status, "artifact download rejected");
            return Err(UploadError::Status(status));
        }
        Ok(response.bytes().await?.to_vec())
    }
}
