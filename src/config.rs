use std::path::PathBuf;
use std::time::Duration;

use reqwest::blocking::Client;
use url::Url;

use crate::state::{Flavor, Timing};

pub const DEFAULT_API_URL: &str = "http://test.y2mp3.co:9000/";
pub const DEFAULT_OUTPUT_DIR: &str = "downloads";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid API URL {url:?}: {source}")]
    ApiUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("API URL must use http or https: {0}")]
    Scheme(String),
    #[error("could not build http client: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: Url,
    /// Empty means no key is sent.
    pub api_key: String,
    pub timeout: Duration,
    pub output_dir: PathBuf,
    pub flavor: Flavor,
    pub open_links: bool,
    /// Hold error/ready displays for the flavor's delay.
    pub wait: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: Url::parse(DEFAULT_API_URL).expect("default API URL"),
            api_key: String::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            flavor: Flavor::default(),
            open_links: false,
            wait: true,
        }
    }
}

impl Config {
    pub fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
        let url = Url::parse(raw.trim()).map_err(|source| ConfigError::ApiUrl {
            url: raw.to_string(),
            source,
        })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            _ => Err(ConfigError::Scheme(raw.to_string())),
        }
    }

    pub fn timing(&self) -> Timing {
        if self.wait {
            self.flavor.timing()
        } else {
            Timing::IMMEDIATE
        }
    }

    pub fn http_client(&self) -> Result<Client, ConfigError> {
        let client = Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("y2mp3/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_endpoints() {
        let url = Config::parse_api_url(" https://api.example.com/ ").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/");
        assert!(Config::parse_api_url(DEFAULT_API_URL).is_ok());
    }

    #[test]
    fn rejects_garbage_and_other_schemes() {
        assert!(matches!(
            Config::parse_api_url("not a url"),
            Err(ConfigError::ApiUrl { .. })
        ));
        assert!(matches!(
            Config::parse_api_url("ftp://example.com/"),
            Err(ConfigError::Scheme(_))
        ));
    }

    #[test]
    fn no_wait_zeroes_delays() {
        let config = Config {
            flavor: Flavor::StatusLine,
            wait: false,
            ..Config::default()
        };
        assert_eq!(config.timing(), Timing::IMMEDIATE);
        assert_eq!(
            Config {
                wait: true,
                ..config
            }
            .timing(),
            Flavor::StatusLine.timing()
        );
    }
}
