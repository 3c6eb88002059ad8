//! Point-of-interest model and its marker category

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::Position;

/// Category of a location, used only to pick its marker icon.
///
/// Unknown strings and non-string values decode to [`LocationType::Other`]
/// instead of failing, so a typo in `type` never rejects a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationType {
    Restaurant,
    Tea,
    FoodShop,
    Architecture,
    Other,
}

impl LocationType {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationType::Restaurant => "restaurant",
            LocationType::Tea => "tea",
            LocationType::FoodShop => "food-shop",
            LocationType::Architecture => "architecture",
            LocationType::Other => "other",
        }
    }

    fn from_value(value: &Value) -> Self {
        match value.as_str() {
            Some("restaurant") => LocationType::Restaurant,
            Some("tea") => LocationType::Tea,
            Some("food-shop") => LocationType::FoodShop,
            Some("architecture") => LocationType::Architecture,
            _ => LocationType::Other,
        }
    }
}

impl Serialize for LocationType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LocationType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(LocationType::from_value(&value))
    }
}

/// Glyph and colour a marker is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerIcon {
    pub glyph: &'static str,
    pub color: &'static str,
}

pub const DEFAULT_ICON: MarkerIcon = MarkerIcon {
    glyph: "📍",
    color: "#ea4335",
};

impl MarkerIcon {
    /// Icon for an optional category; absent and unknown categories share the default
    #[must_use]
    pub fn for_type(kind: Option<LocationType>) -> Self {
        match kind {
            Some(LocationType::Restaurant) => MarkerIcon {
                glyph: "🍽️",
                color: "#f29900",
            },
            Some(LocationType::Tea) => MarkerIcon {
                glyph: "🍵",
                color: "#188038",
            },
            Some(LocationType::FoodShop) => MarkerIcon {
                glyph: "🛒",
                color: "#1a73e8",
            },
            Some(LocationType::Architecture) => MarkerIcon {
                glyph: "🏛️",
                color: "#9334e6",
            },
            Some(LocationType::Other) | None => DEFAULT_ICON,
        }
    }
}

/// A named point of interest
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Where the marker is placed
    pub pos: Position,
    /// Display name, unique within a document
    pub name: String,
    /// Canonical external page for the place
    pub url: String,
    /// Thumbnail image that represents the location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Markdown description
    pub description: String,
    /// Rating out of 10
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    /// Postal address, line breaks are kept when displayed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<LocationType>,
}

impl Location {
    /// Create a location with only the required fields set
    #[must_use]
    pub fn new(pos: Position, name: String, url: String, description: String) -> Self {
        Self {
            pos,
            name,
            url,
            image_url: None,
            description,
            rating: None,
            address: None,
            kind: None,
        }
    }

    #[must_use]
    pub fn icon(&self) -> MarkerIcon {
        MarkerIcon::for_type(self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(r#""restaurant""#, LocationType::Restaurant)]
    #[case(r#""tea""#, LocationType::Tea)]
    #[case(r#""food-shop""#, LocationType::FoodShop)]
    #[case(r#""architecture""#, LocationType::Architecture)]
    #[case(r#""museum""#, LocationType::Other)]
    #[case("42", LocationType::Other)]
    #[case("null", LocationType::Other)]
    fn test_location_type_never_fails(#[case] raw: &str, #[case] expected: LocationType) {
        let kind: LocationType = serde_json::from_str(raw).unwrap();
        assert_eq!(kind, expected);
    }

    #[test]
    fn test_unknown_and_absent_types_share_default_icon() {
        assert_eq!(MarkerIcon::for_type(None), DEFAULT_ICON);
        assert_eq!(MarkerIcon::for_type(Some(LocationType::Other)), DEFAULT_ICON);
        assert_ne!(MarkerIcon::for_type(Some(LocationType::Tea)), DEFAULT_ICON);
    }

    #[test]
    fn test_optional_fields_are_omitted_when_serialized() {
        let location = Location::new(
            Position::new(35.0, 135.0),
            "Ippodo".to_string(),
            "https://ippodo-tea.co.jp".to_string(),
            "Tea shop".to_string(),
        );
        let json = serde_json::to_value(&location).unwrap();
        let object = json.as_object().unwrap();
        assert!(!object.contains_key("imageUrl"));
        assert!(!object.contains_key("rating"));
        assert!(!object.contains_key("type"));
        assert_eq!(json["pos"]["lng"], 135.0);
    }

    #[test]
    fn test_camel_case_fields_are_read() {
        let raw = r#"{
            "pos": {"lat": 1.0, "lng": 2.0},
            "name": "A",
            "url": "https://a.example",
            "imageUrl": "https://a.example/a.jpg",
            "description": "d",
            "type": "tea"
        }"#;
        let location: Location = serde_json::from_str(raw).unwrap();
        assert_eq!(location.image_url.as_deref(), Some("https://a.example/a.jpg"));
        assert_eq!(location.kind, Some(LocationType::Tea));
        assert_eq!(location.icon().glyph, "🍵");
    }
}
