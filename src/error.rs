use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

/// Failures while talking to the modeling service or reading local files.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server answered with status {0}")]
    Status(StatusCode),
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("upload worker stopped: {0}")]
    Worker(String),
}

/// Why a received response body was not accepted as a result.
///
/// The `Display` text is what the alert dialog shows after "Upload failed: ".
#[derive(Debug, Error)]
pub enum ResponseError {
    #[error("{0}")]
    Parse(#[from] serde_json::Error),
    #[error("expected a JSON object in the response body")]
    NotAnObject,
    #[error("Modeling service call failed.")]
    Unsuccessful(StatusCode),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
}
