//! Config Loader
//!
//! Resolves the document name from the `config` query parameter, fetches
//! `<name>.json` exactly once from a [`DocumentSource`] and validates it into
//! an immutable [`MapConfig`].

pub mod source;

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::models::MapConfig;
use crate::validation::validate_document;
use crate::{PoiMapError, Result};

pub use source::{DirectorySource, DocumentSource, HttpSource};

/// Query parameter naming the document to load
pub const CONFIG_PARAM: &str = "config";

/// Turn the raw `config` query value into a document identifier.
///
/// The identifier becomes a file name or URL segment, so only
/// `[A-Za-z0-9_-]` is accepted.
pub fn resolve_identifier(param: Option<&str>) -> Result<String> {
    let raw = param
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(PoiMapError::MissingParameter {
            param: CONFIG_PARAM,
        })?;

    let is_safe = raw
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !is_safe {
        return Err(PoiMapError::InvalidParameter {
            param: CONFIG_PARAM,
            value: raw.to_string(),
        });
    }

    Ok(raw.to_string())
}

/// Loads map documents from one source
#[derive(Clone)]
pub struct ConfigLoader {
    source: Arc<dyn DocumentSource>,
}

impl ConfigLoader {
    pub fn new(source: Arc<dyn DocumentSource>) -> Self {
        Self { source }
    }

    /// Resolve, fetch and validate. A missing parameter fails before any fetch.
    #[tracing::instrument(name = "load_map_document", skip(self))]
    pub async fn load(&self, param: Option<&str>) -> Result<Arc<MapConfig>> {
        let identifier = resolve_identifier(param).inspect_err(|e| {
            warn!("Refusing to load map document: {}", e);
        })?;
        self.load_identifier(&identifier).await
    }

    /// Fetch and validate an already-resolved identifier
    pub async fn load_identifier(&self, identifier: &str) -> Result<Arc<MapConfig>> {
        debug!(
            "Loading map document `{}` from {}",
            identifier,
            self.source.describe()
        );

        let bytes = self.source.fetch(identifier).await?;
        let config = validate_document(&bytes).inspect_err(|e| {
            warn!("Map document `{}` rejected: {}", identifier, e);
        })?;

        info!(
            "Loaded map document `{}` with {} locations",
            identifier,
            config.locations.len()
        );
        Ok(Arc::new(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rstest::rstest;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Serves one fixed body and counts fetches
    struct CountingSource {
        body: Vec<u8>,
        fetches: AtomicUsize,
    }

    impl CountingSource {
        fn new(body: &str) -> Arc<Self> {
            Arc::new(Self {
                body: body.as_bytes().to_vec(),
                fetches: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl DocumentSource for CountingSource {
        async fn fetch(&self, _identifier: &str) -> Result<Vec<u8>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(self.body.clone())
        }

        fn describe(&self) -> String {
            "counting".to_string()
        }
    }

    const DOCUMENT: &str = r#"{
        "center": {"lat": 48.8566, "lng": 2.3522},
        "locations": [
            {"pos": {"lat": 48.8584, "lng": 2.2945}, "name": "Eiffel Tower",
             "url": "https://www.toureiffel.paris/", "description": "Iron lattice.",
             "type": "architecture"}
        ]
    }"#;

    #[rstest]
    #[case(Some("kyoto"), "kyoto")]
    #[case(Some(" kyoto "), "kyoto")]
    #[case(Some("tokyo-2024_v2"), "tokyo-2024_v2")]
    fn test_resolve_identifier_accepts(#[case] param: Option<&str>, #[case] expected: &str) {
        assert_eq!(resolve_identifier(param).unwrap(), expected);
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("   "))]
    fn test_resolve_identifier_missing(#[case] param: Option<&str>) {
        assert!(matches!(
            resolve_identifier(param),
            Err(PoiMapError::MissingParameter { param: "config" })
        ));
    }

    #[rstest]
    #[case("../secrets")]
    #[case("a/b")]
    #[case("kyoto.json")]
    fn test_resolve_identifier_rejects_unsafe(#[case] param: &str) {
        assert!(matches!(
            resolve_identifier(Some(param)),
            Err(PoiMapError::InvalidParameter { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_parameter_issues_no_fetch() {
        let source = CountingSource::new(DOCUMENT);
        let loader = ConfigLoader::new(source.clone());

        let err = loader.load(None).await.unwrap_err();
        assert!(matches!(err, PoiMapError::MissingParameter { .. }));
        assert_eq!(source.fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_load_fetches_exactly_once() {
        let source = CountingSource::new(DOCUMENT);
        let loader = ConfigLoader::new(source.clone());

        let config = loader.load(Some("paris")).await.unwrap();
        assert_eq!(config.locations.len(), 1);
        assert_eq!(config.locations[0].name, "Eiffel Tower");
        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalid_document_yields_no_config() {
        let source = CountingSource::new(r#"{"center": {"lat": 0, "lng": 0}, "locations": [{}]}"#);
        let loader = ConfigLoader::new(source);

        let err = loader.load(Some("broken")).await.unwrap_err();
        assert!(matches!(err, PoiMapError::Parse { .. }));
    }

    #[tokio::test]
    async fn test_directory_loader_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("paris.json"), DOCUMENT).unwrap();
        let loader = ConfigLoader::new(Arc::new(DirectorySource::new(dir.path())));

        let config = loader.load(Some("paris")).await.unwrap();
        assert_eq!(config.center.lat, 48.8566);

        let err = loader.load(Some("london")).await.unwrap_err();
        assert!(matches!(err, PoiMapError::NotFound { .. }));
    }
}
