use crate::error::ConfigError;
use reqwest::Url;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:7071/api/topic-clustered-model-HTTP-trigger";
pub const ENDPOINT_ENV: &str = "TOPIC_DASHBOARD_ENDPOINT";
pub const TIMEOUT_ENV: &str = "TOPIC_DASHBOARD_TIMEOUT_SECS";

const CONFIG_DIR_NAME: &str = "topic-dashboard";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Where the selected file is posted.
    pub endpoint: String,
    /// Transport timeout for the upload request. `None` or zero waits indefinitely.
    pub request_timeout_secs: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout_secs: None,
        }
    }
}

impl Settings {
    pub fn timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    fn merge_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: FileSettings = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(path = %path.display(), "loaded settings file");
        if let Some(endpoint) = file.endpoint {
            self.endpoint = endpoint;
        }
        if let Some(secs) = file.request_timeout_secs {
            self.request_timeout_secs = Some(secs);
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidEndpoint {
            endpoint: self.endpoint.clone(),
            reason,
        };

        let url = Url::parse(self.endpoint.trim()).map_err(|e| invalid(e.to_string()))?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(invalid(format!("unsupported scheme '{other}'"))),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileSettings {
    endpoint: Option<String>,
    request_timeout_secs: Option<u64>,
}

/// Values given on the command line. They win over every other source.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config_path: Option<PathBuf>,
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Layers defaults, the config file, the environment and the command line.
///
/// An explicit `--config` file must exist; the per-user default file is optional.
pub fn load_settings(overrides: &Overrides) -> Result<Settings, ConfigError> {
    let file = match &overrides.config_path {
        Some(path) => Some(path.clone()),
        None => default_config_path().filter(|path| path.exists()),
    };
    load_settings_from(file.as_deref(), overrides, |key| std::env::var(key).ok())
}

pub(crate) fn load_settings_from(
    file: Option<&Path>,
    overrides: &Overrides,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Settings, ConfigError> {
    let mut settings = Settings::default();

    if let Some(path) = file {
        settings.merge_file(path)?;
    }

    if let Some(endpoint) = env(ENDPOINT_ENV).filter(|v| !v.trim().is_empty()) {
        settings.endpoint = endpoint;
    }
    if let Some(raw) = env(TIMEOUT_ENV) {
        match raw.trim().parse::<u64>() {
            Ok(secs) => settings.request_timeout_secs = Some(secs),
            Err(_) => tracing::warn!(value = %raw, "ignoring non-numeric {}", TIMEOUT_ENV),
        }
    }

    if let Some(endpoint) = &overrides.endpoint {
        settings.endpoint = endpoint.clone();
    }
    if let Some(secs) = overrides.timeout_secs {
        settings.request_timeout_secs = Some(secs);
    }

    settings.endpoint = settings.endpoint.trim().to_string();
    settings.validate()?;
    Ok(settings)
}
