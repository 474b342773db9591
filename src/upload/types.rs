use crate::error::{ResponseError, UploadError};
use derivative::Derivative;
use reqwest::StatusCode;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// A file chosen by the user, held fully in memory until it is posted.
#[derive(Derivative, Clone, PartialEq, Eq)]
#[derivative(Debug)]
pub struct SelectedFile {
    pub name: String,
    #[derivative(Debug(format_with = "fmt_byte_len"))]
    pub bytes: Vec<u8>,
}

fn fmt_byte_len(bytes: &Vec<u8>, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "<{} bytes>", bytes.len())
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, UploadError> {
        let bytes = fs::read(path).map_err(|source| UploadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, bytes })
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn mime_type(&self) -> &'static str {
        let ext = Path::new(&self.name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("csv") => "text/csv",
            Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Some("xls") => "application/vnd.ms-excel",
            _ => "application/octet-stream",
        }
    }
}

/// One named output of the modeling service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Report,
    Hierarchy,
    Barchart,
    Distribution,
    Heatmap,
}

impl ArtifactKind {
    /// Display order; also the full set of keys the service may return.
    pub const ALL: [ArtifactKind; 5] = [
        ArtifactKind::Report,
        ArtifactKind::Hierarchy,
        ArtifactKind::Barchart,
        ArtifactKind::Distribution,
        ArtifactKind::Heatmap,
    ];

    pub fn key(self) -> &'static str {
        match self {
            ArtifactKind::Report => "report",
            ArtifactKind::Hierarchy => "hierarchy",
            ArtifactKind::Barchart => "barchart",
            ArtifactKind::Distribution => "distribution",
            ArtifactKind::Heatmap => "heatmap",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ArtifactKind::Report => "CSV Report",
            ArtifactKind::Hierarchy => "Topic Hierarchy",
            ArtifactKind::Barchart => "Topic Bar Chart",
            ArtifactKind::Distribution => "Topic Distribution",
            ArtifactKind::Heatmap => "Topic Similarity Heatmap",
        }
    }

    pub fn is_visualization(self) -> bool {
        self != ArtifactKind::Report
    }
}

/// Artifact URLs returned by a successful run. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultLinks {
    pub report: Option<String>,
    pub hierarchy: Option<String>,
    pub barchart: Option<String>,
    pub distribution: Option<String>,
    pub heatmap: Option<String>,
}

impl ResultLinks {
    /// Decodes a response body leniently.
    ///
    /// The body must be a JSON object. Unknown keys are ignored; values that are
    /// not strings, or are empty, count as absent.
    pub fn parse(body: &str) -> Result<Self, ResponseError> {
        let value: Value = serde_json::from_str(body)?;
        let Value::Object(map) = value else {
            return Err(ResponseError::NotAnObject);
        };
        Ok(Self::from_map(&map))
    }

    fn from_map(map: &Map<String, Value>) -> Self {
        let mut links = ResultLinks::default();
        for kind in ArtifactKind::ALL {
            let url = match map.get(kind.key()) {
                Some(Value::String(s)) if s.is_empty() => None,
                Some(Value::String(s)) => Some(s.clone()),
                Some(Value::Null) | None => None,
                Some(other) => {
                    tracing::warn!(key = kind.key(), value = %other, "ignoring non-string artifact link");
                    None
                }
            };
            *links.slot_mut(kind) = url;
        }
        links
    }

    pub fn get(&self, kind: ArtifactKind) -> Option<&str> {
        match kind {
            ArtifactKind::Report => self.report.as_deref(),
            ArtifactKind::Hierarchy => self.hierarchy.as_deref(),
            ArtifactKind::Barchart => self.barchart.as_deref(),
            ArtifactKind::Distribution => self.distribution.as_deref(),
            ArtifactKind::Heatmap => self.heatmap.as_deref(),
        }
    }

    fn slot_mut(&mut self, kind: ArtifactKind) -> &mut Option<String> {
        match kind {
            ArtifactKind::Report => &mut self.report,
            ArtifactKind::Hierarchy => &mut self.hierarchy,
            ArtifactKind::Barchart => &mut self.barchart,
            ArtifactKind::Distribution => &mut self.distribution,
            ArtifactKind::Heatmap => &mut self.heatmap,
        }
    }

    /// Present artifacts in display order.
    pub fn present(&self) -> Vec<(ArtifactKind, &str)> {
        ArtifactKind::ALL
            .into_iter()
            .filter_map(|kind| self.get(kind).map(|url| (kind, url)))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.present().is_empty()
    }
}

/// What came back over the wire, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

impl RawResponse {
    /// Parses the body first, then checks the status, so a body that fails to
    /// parse is always reported with the parse detail.
    pub fn into_links(self) -> Result<ResultLinks, ResponseError> {
        let links = ResultLinks::parse(&self.body)?;
        if !self.status.is_success() {
            return Err(ResponseError::Unsuccessful(self.status));
        }
        Ok(links)
    }
}
