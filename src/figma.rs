//! Document source: where raw design files come from.
//!
//! With the `remote` feature this includes a client for the Figma REST API.

#[cfg(feature = "remote")]
use reqwest::blocking::Client;
#[cfg(feature = "remote")]
use std::time::Duration;
#[cfg(feature = "remote")]
use url::Url;

#[cfg(feature = "remote")]
use crate::retry::RetryPolicy;
#[cfg(feature = "remote")]
use crate::{ConverterConfig, Error};
use crate::Result;

/// Supplies the raw design document for a design URL
pub trait DocumentSource: Send {
    fn fetch(&self, design_url: &str) -> Result<serde_json::Value>;
}

#[cfg(feature = "remote")]
/// Pull the file key out of a share URL such as
/// `https://www.figma.com/design/AbC123/My-File?node-id=0-1`.
///
/// Links pasted without a scheme (`www.figma.com/file/...`) are read as https.
pub fn extract_file_key(design_url: &str) -> Result<String> {
    let url = match Url::parse(design_url) {
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(&format!("https://{}", design_url)),
        parsed => parsed,
    }
    .map_err(|e| Error::InvalidUrl(format!("{}: {}", design_url, e)))?;
    let segments: Vec<&str> = url.path_segments().map(|s| s.collect()).unwrap_or_default();

    segments
        .windows(2)
        .find(|w| matches!(w[0], "file" | "design" | "make"))
        .map(|w| {
            w[1].chars()
                .take_while(|c| c.is_ascii_alphanumeric())
                .collect::<String>()
        })
        .filter(|key| !key.is_empty())
        .ok_or_else(|| Error::InvalidUrl(design_url.to_string()))
}

/// Blocking Figma files API client
#[cfg(feature = "remote")]
pub struct FigmaClient {
    client: Client,
    token: String,
    api_base: String,
    retry: RetryPolicy,
}

#[cfg(feature = "remote")]
impl FigmaClient {
    /// Build a client from config. Fails when no access token is configured.
    pub fn new(config: &ConverterConfig) -> Result<Self> {
        let token = config
            .figma_token
            .clone()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::ConfigError("FIGMA_TOKEN not set".into()))?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| Error::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            token,
            api_base: config.figma_api_base.trim_end_matches('/').to_string(),
            retry: config.retry,
        })
    }

    fn get_file(&self, key: &str) -> Result<serde_json::Value> {
        let url = format!("{}/v1/files/{}", self.api_base, key);
        let res = self
            .client
            .get(&url)
            .header("X-Figma-Token", &self.token)
            .send()
            .map_err(|e| Error::NetworkError(format!("GET {} failed: {}", url, e)))?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().unwrap_or_default();
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let text = res
            .text()
            .map_err(|e| Error::NetworkError(format!("Failed to read response body: {}", e)))?;
        crate::json::from_str(&text)
    }
}

#[cfg(feature = "remote")]
impl DocumentSource for FigmaClient {
    fn fetch(&self, design_url: &str) -> Result<serde_json::Value> {
        let key = extract_file_key(design_url)?;
        log::debug!("fetching design file {}", key);
        self.retry.run("design fetch", || self.get_file(&key))
    }
}
