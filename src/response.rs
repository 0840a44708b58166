use serde::Deserialize;

/// Payload shared by every success status.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Resolved {
    pub url: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

/// Response of the conversion API, discriminated by `status`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DownloadResponse {
    Stream(Resolved),
    Static(Resolved),
    Tunnel(Resolved),
    Redirect(Resolved),
    /// `error` is usually `{ "code": ..., "context": ... }`; any shape parses.
    Error {
        #[serde(default)]
        error: Option<serde_json::Value>,
    },
    #[serde(other)]
    Unknown,
}

impl DownloadResponse {
    /// The ready-to-fetch result, whichever success status carried it.
    pub fn resolved(&self) -> Option<&Resolved> {
        match self {
            Self::Stream(r) | Self::Static(r) | Self::Tunnel(r) | Self::Redirect(r) => Some(r),
            Self::Error { .. } | Self::Unknown => None,
        }
    }

    pub fn error_code(&self) -> Option<&str> {
        match self {
            Self::Error { error: Some(body) } => body.get("code")?.as_str(),
            _ => None,
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            Self::Stream(_) => "stream",
            Self::Static(_) => "static",
            Self::Tunnel(_) => "tunnel",
            Self::Redirect(_) => "redirect",
            Self::Error { .. } => "error",
            Self::Unknown => "unknown",
        }
    }
}
