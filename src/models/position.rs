//! Geographic position shared by the map center and every location

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Latitude/longitude pair, encoded as `{"lat": .., "lng": ..}`
#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
pub struct Position {
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lng: f64,
}

impl Position {
    /// Create a new position
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Format position as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.lat, self.lng)
    }

    /// Both components are finite and inside the WGS84 ranges
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lat_is_valid() && self.lng_is_valid()
    }

    #[must_use]
    pub fn lat_is_valid(&self) -> bool {
        self.lat.is_finite() && (-90.0..=90.0).contains(&self.lat)
    }

    #[must_use]
    pub fn lng_is_valid(&self) -> bool {
        self.lng.is_finite() && (-180.0..=180.0).contains(&self.lng)
    }

    /// Whether two positions agree within `tolerance` degrees on both axes
    #[must_use]
    pub fn approx_eq(&self, other: &Position, tolerance: f64) -> bool {
        (self.lat - other.lat).abs() <= tolerance && (self.lng - other.lng).abs() <= tolerance
    }
}

// Only the object form is accepted; a derived impl would also take `[lat, lng]`.
impl<'de> Deserialize<'de> for Position {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Repr {
            lat: f64,
            lng: f64,
        }

        let object = Map::<String, Value>::deserialize(deserializer)?;
        let repr = Repr::deserialize(Value::Object(object)).map_err(D::Error::custom)?;
        Ok(Position::new(repr.lat, repr.lng))
    }
}
