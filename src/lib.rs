//! `poimap` - Points-of-interest map viewer
//!
//! Loads a statically hosted JSON document describing named places,
//! validates it, and renders the places as markers on a map with a detail
//! panel for the selected one.

pub mod config;
pub mod error;
pub mod loader;
pub mod logging;
pub mod models;
pub mod presenter;
pub mod validation;
pub mod web;

// Re-export core types for public API
pub use config::PoiMapSettings;
pub use error::{FieldViolation, PoiMapError};
pub use loader::{ConfigLoader, DocumentSource};
pub use models::{Location, LocationType, MapConfig, Position};
pub use presenter::{MapPresenter, Selection};
pub use validation::validate_document;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, PoiMapError>;
