//! Document sources: where `<identifier>.json` is read from

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::{PoiMapError, Result};

/// Something that can hand out the raw bytes of a named map document
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Fetch `<identifier>.json`. Called at most once per load.
    async fn fetch(&self, identifier: &str) -> Result<Vec<u8>>;

    /// Human-readable origin, used in logs
    fn describe(&self) -> String;
}

/// Reads documents from a local directory, the same one served under `/configs`
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl DocumentSource for DirectorySource {
    async fn fetch(&self, identifier: &str) -> Result<Vec<u8>> {
        let path = self.dir.join(format!("{identifier}.json"));
        debug!("Reading map document from {}", path.display());

        tokio::fs::read(&path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => PoiMapError::NotFound {
                identifier: identifier.to_string(),
            },
            _ => PoiMapError::fetch(identifier, e.to_string()),
        })
    }

    fn describe(&self) -> String {
        format!("directory {}", self.dir.display())
    }
}

/// Fetches documents over HTTP from `<base_url>/<identifier>.json`
pub struct HttpSource {
    client: Client,
    base_url: String,
}

impl HttpSource {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| PoiMapError::settings(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn document_url(&self, identifier: &str) -> String {
        format!("{}/{}.json", self.base_url, identifier)
    }
}

#[async_trait]
impl DocumentSource for HttpSource {
    async fn fetch(&self, identifier: &str) -> Result<Vec<u8>> {
        let url = self.document_url(identifier);
        debug!("Fetching map document from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| PoiMapError::fetch(identifier, e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                return Err(PoiMapError::NotFound {
                    identifier: identifier.to_string(),
                });
            }
            status if !status.is_success() => {
                return Err(PoiMapError::fetch(identifier, format!("HTTP {status}")));
            }
            _ => {}
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| PoiMapError::fetch(identifier, e.to_string()))?;
        Ok(body.to_vec())
    }

    fn describe(&self) -> String {
        format!("remote {}", self.base_url)
    }
}
