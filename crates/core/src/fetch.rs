//! Page retrieval from URLs, files, and stdin.
//!
//! Pages are fetched as served; no JavaScript runs, so catalog templates that
//! render client-side should be saved from a browser and passed in as files.

use std::fs;
use std::path::PathBuf;
#[cfg(feature = "fetch")]
use std::time::Duration;

#[cfg(feature = "fetch")]
use reqwest::Client;
#[cfg(feature = "fetch")]
use url::Url;

use crate::{DatacatError, Result};

/// HTTP client configuration for fetching dataset pages.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// Custom User-Agent string.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: 30,
            user_agent: format!("Mozilla/5.0 (compatible; datacat/{})", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Fetches a page over HTTP(S).
///
/// Follows redirects and sends browser-like `Accept` headers. A timeout is
/// reported as [`DatacatError::Timeout`] rather than a generic HTTP error.
#[cfg(feature = "fetch")]
pub async fn fetch_url(url: &str, config: &FetchConfig) -> Result<String> {
    let parsed_url = Url::parse(url).map_err(|e| DatacatError::InvalidUrl(e.to_string()))?;

    if !matches!(parsed_url.scheme(), "http" | "https") {
        return Err(DatacatError::InvalidUrl(format!(
            "unsupported scheme `{}`, expected http or https",
            parsed_url.scheme()
        )));
    }

    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout))
        .build()
        .map_err(DatacatError::HttpError)?;

    tracing::debug!(url = %parsed_url, timeout = config.timeout, "fetching page");

    let response = client
        .get(parsed_url)
        .header("User-Agent", &config.user_agent)
        .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
        .header("Accept-Language", "en-US,en;q=0.9")
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() { DatacatError::Timeout { timeout: config.timeout } } else { DatacatError::HttpError(e) }
        })?
        .error_for_status()?;

    let content = response.text().await?;

    Ok(content)
}

/// Reads a saved page from a local file.
pub fn fetch_file(path: &str) -> Result<String> {
    let path_buf = PathBuf::from(path);

    if !path_buf.exists() {
        Err(DatacatError::FileNotFound(path_buf))
    } else {
        fs::read_to_string(&path_buf).map_err(DatacatError::from)
    }
}

/// Reads a page from standard input until EOF.
pub fn fetch_stdin() -> Result<String> {
    use std::io::{self, Read};

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(DatacatError::from)?;

    Ok(buffer)
}
