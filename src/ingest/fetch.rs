use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Retrieves the raw bytes of a question source. The ingestor walks a short
/// list of location variants through this seam, so deployments with differing
/// base paths still resolve.
pub trait Fetcher {
    fn fetch(&self, location: &str) -> Result<Vec<u8>>;
}

/// Location variants tried in order: bare, explicitly relative, absolute.
/// Locations that already carry a scheme or a leading slash are not rewritten.
pub fn candidate_locations(locator: &str) -> Vec<String> {
    if locator.contains("://") || locator.starts_with('/') || locator.starts_with("./") {
        return vec![locator.to_owned()];
    }
    vec![
        locator.to_owned(),
        format!("./{}", locator),
        format!("/{}", locator),
    ]
}

/// Fetches over HTTP, resolving non-absolute locations against a base URL.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpFetcher {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("could not build HTTP client")?;
        Ok(HttpFetcher {
            client,
            base_url: base_url.into(),
        })
    }

    fn resolve(&self, location: &str) -> String {
        if location.contains("://") {
            return location.to_owned();
        }
        let trimmed = location.trim_start_matches("./");
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            trimmed.trim_start_matches('/')
        )
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, location: &str) -> Result<Vec<u8>> {
        let url = self.resolve(location);
        let response = self
            .client
            .get(&url)
            .send()
            .with_context(|| format!("request to {} failed", url))?;
        let status = response.status();
        if !status.is_success() {
            return Err(anyhow::anyhow!("{} returned {}", url, status));
        }
        let body = response
            .bytes()
            .with_context(|| format!("could not read body from {}", url))?;
        Ok(body.to_vec())
    }
}

/// Reads the question source from disk, resolving non-absolute locations
/// against a base directory.
pub struct FileFetcher {
    base_dir: PathBuf,
}

impl FileFetcher {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        FileFetcher {
            base_dir: base_dir.into(),
        }
    }
}

impl Fetcher for FileFetcher {
    fn fetch(&self, location: &str) -> Result<Vec<u8>> {
        let path = if location.starts_with('/') {
            PathBuf::from(location)
        } else {
            self.base_dir.join(location.trim_start_matches("./"))
        };
        fs::read(&path).with_context(|| format!("could not read {}", path.display()))
    }
}
