//! User-facing text for everything that can go wrong.

use crate::client::TransportError;
use crate::executor::DownloadError;
use crate::response::DownloadResponse;

pub const GENERIC_FAILURE: &str = "Download failed. Please try again.";
pub const LINK_EXPIRED: &str = "Download link expired or unavailable. Please try again.";
pub const UNEXPECTED_RESPONSE: &str = "Unexpected response from server";

const API_ERRORS: &[(&str, &str)] = &[
    ("error.api.link.missing", "Please provide a YouTube URL"),
    ("error.api.link.invalid", "Invalid YouTube URL"),
    ("error.api.link.unsupported", "This service is not supported"),
    ("error.api.invalid_body", "Invalid request parameters"),
    ("error.api.content.too_long", "Video is too long (max duration exceeded)"),
    ("error.api.fetch.critical", "Failed to fetch video information"),
    ("error.api.fetch.critical.core", "Critical server error"),
];

/// Map an API error code to its message, or `Error: <code>` when unknown.
pub fn api_error_message(code: &str) -> String {
    API_ERRORS
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, text)| (*text).to_string())
        .unwrap_or_else(|| format!("Error: {code}"))
}

/// Message for a response that did not resolve to a download.
pub fn response_message(resp: &DownloadResponse) -> String {
    match (resp, resp.error_code()) {
        (DownloadResponse::Error { .. }, Some(code)) => api_error_message(code),
        (DownloadResponse::Unknown, _) => UNEXPECTED_RESPONSE.to_string(),
        _ => GENERIC_FAILURE.to_string(),
    }
}

pub fn transport_message(_err: &TransportError) -> String {
    GENERIC_FAILURE.to_string()
}

pub fn download_message(err: &DownloadError) -> String {
    match err {
        DownloadError::LinkExpired => LINK_EXPIRED.to_string(),
        _ => GENERIC_FAILURE.to_string(),
    }
}
