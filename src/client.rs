use reqwest::blocking::{Client, Request};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use url::Url;

use crate::request::DownloadRequest;
use crate::response::DownloadResponse;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP {0}")]
    Status(u16),
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),
    #[error("invalid response body: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Talks to the conversion API. One POST per request, no retries.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    endpoint: Url,
    api_key: Option<String>,
}

impl ApiClient {
    /// An empty key means no `Authorization` header at all.
    pub fn new(http: Client, endpoint: Url, api_key: &str) -> Self {
        let api_key = Some(api_key.to_string()).filter(|k| !k.is_empty());
        Self {
            http,
            endpoint,
            api_key,
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Build the outgoing request without sending it.
    pub fn prepare(&self, req: &DownloadRequest) -> Result<Request, TransportError> {
        let mut builder = self
            .http
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(req);

        if let Some(key) = &self.api_key {
            builder = builder.header(AUTHORIZATION, format!("Api-Key {key}"));
        }

        builder.build().map_err(TransportError::Network)
    }

    /// Send the request and hand back whatever JSON the API returned,
    /// `status: error` included. Only HTTP-level failures are errors here.
    pub fn submit(&self, req: &DownloadRequest) -> Result<DownloadResponse, TransportError> {
        match serde_json::to_string(req) {
            Ok(body) => log::debug!("api request: {body}"),
            Err(e) => log::debug!("api request for {} (unprintable: {e})", req.url),
        }

        let request = self.prepare(req)?;
        let resp = self.http.execute(request).map_err(|e| {
            log::warn!("request to {} failed: {e}", self.endpoint);
            TransportError::Network(e)
        })?;

        if !resp.status().is_success() {
            let status = resp.status();
            log::warn!("api answered HTTP {status}");
            return Err(TransportError::Status(status.as_u16()));
        }

        let parsed: DownloadResponse = resp.json().map_err(TransportError::Decode)?;
        log::debug!("api response: status={}", parsed.status());
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Mode;
    use crate::request::{Selection, build_request};

    fn client(key: &str) -> ApiClient {
        ApiClient::new(
            Client::new(),
            Url::parse("http://localhost:9000/").unwrap(),
            key,
        )
    }

    fn request() -> DownloadRequest {
        build_request("https://youtu.be/abc", &Selection::default_for(Mode::Audio))
    }

    #[test]
    fn empty_key_sends_no_authorization_header() {
        let req = client("").prepare(&request()).unwrap();
        assert!(req.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn key_is_sent_as_api_key_scheme() {
        let req = client("s3cret").prepare(&request()).unwrap();
        assert_eq!(
            req.headers().get(AUTHORIZATION).unwrap(),
            "Api-Key s3cret"
        );
    }

    #[test]
    fn request_is_json_post_to_endpoint() {
        let req = client("").prepare(&request()).unwrap();
        assert_eq!(req.method(), reqwest::Method::POST);
        assert_eq!(req.url().as_str(), "http://localhost:9000/");
        assert_eq!(req.headers().get(CONTENT_TYPE).unwrap(), "application/json");
        assert_eq!(req.headers().get(ACCEPT).unwrap(), "application/json");

        let body = req.body().and_then(|b| b.as_bytes()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(body).unwrap();
        assert_eq!(value["url"], "https://youtu.be/abc");
        assert_eq!(value["downloadMode"], "audio");
    }
}
