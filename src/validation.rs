//! Schema validation for map documents
//!
//! Decoding is two-phase. serde rejects anything structurally wrong (bad
//! JSON, missing fields, wrong types), then [`check_config`] walks the typed
//! value and collects every semantic violation with the path of the field
//! that broke it. Nothing is coerced and no location is dropped.

use std::collections::HashMap;

use reqwest::Url;
use tracing::debug;

use crate::error::{FieldViolation, PoiMapError};
use crate::models::{Location, MapConfig, Position};
use crate::Result;

/// Inclusive upper bound of the rating scale
pub const MAX_RATING: f64 = 10.0;

/// Parse and validate a raw JSON map document.
pub fn validate_document(bytes: &[u8]) -> Result<MapConfig> {
    let config: MapConfig =
        serde_json::from_slice(bytes).map_err(|e| PoiMapError::parse(e.to_string()))?;

    let violations = check_config(&config);
    if !violations.is_empty() {
        return Err(PoiMapError::Validation { violations });
    }

    debug!(locations = config.locations.len(), "map document validated");
    Ok(config)
}

/// Collect every semantic violation of an already-decoded document.
#[must_use]
pub fn check_config(config: &MapConfig) -> Vec<FieldViolation> {
    let mut violations = Vec::new();
    check_position("center", &config.center, &mut violations);

    let mut first_seen: HashMap<&str, usize> = HashMap::new();
    for (index, location) in config.locations.iter().enumerate() {
        let prefix = format!("locations[{index}]");
        check_location(&prefix, location, &mut violations);

        if let Some(previous) = first_seen.insert(location.name.as_str(), index) {
            violations.push(FieldViolation::new(
                format!("{prefix}.name"),
                format!(
                    "duplicate name {:?}, already used by locations[{previous}]",
                    location.name
                ),
            ));
        }
    }

    violations
}

fn check_location(prefix: &str, location: &Location, violations: &mut Vec<FieldViolation>) {
    check_position(&format!("{prefix}.pos"), &location.pos, violations);
    check_url(&format!("{prefix}.url"), &location.url, violations);

    if let Some(image_url) = &location.image_url {
        check_url(&format!("{prefix}.imageUrl"), image_url, violations);
    }

    if let Some(rating) = location.rating {
        if !rating.is_finite() || !(0.0..=MAX_RATING).contains(&rating) {
            violations.push(FieldViolation::new(
                format!("{prefix}.rating"),
                format!("must be between 0 and {MAX_RATING}, got {rating}"),
            ));
        }
    }
}

fn check_position(path: &str, pos: &Position, violations: &mut Vec<FieldViolation>) {
    if pos.is_valid() {
        return;
    }
    if !pos.lat_is_valid() {
        violations.push(FieldViolation::new(
            format!("{path}.lat"),
            format!("must be a latitude between -90 and 90, got {}", pos.lat),
        ));
    }
    if !pos.lng_is_valid() {
        violations.push(FieldViolation::new(
            format!("{path}.lng"),
            format!("must be a longitude between -180 and 180, got {}", pos.lng),
        ));
    }
}

fn check_url(path: &str, raw: &str, violations: &mut Vec<FieldViolation>) {
    if let Err(e) = Url::parse(raw) {
        violations.push(FieldViolation::new(
            path,
            format!("invalid URL {raw:?}: {e}"),
        ));
    }
}
