//! The map document: a center and an ordered list of locations

use serde::{Deserialize, Serialize};

use super::{Location, Position};

/// A validated map document. Held behind an `Arc` once loaded and never mutated.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MapConfig {
    /// Initial viewport center
    pub center: Position,
    /// Locations in document order
    pub locations: Vec<Location>,
}

impl MapConfig {
    #[must_use]
    pub fn new(center: Position, locations: Vec<Location>) -> Self {
        Self { center, locations }
    }

    /// Look a location up by its unique name
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Location> {
        self.locations.iter().find(|loc| loc.name == name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_by_name() {
        let config = MapConfig::new(
            Position::new(0.0, 0.0),
            vec![
                Location::new(
                    Position::new(1.0, 1.0),
                    "A".to_string(),
                    "https://a.example".to_string(),
                    String::new(),
                ),
                Location::new(
                    Position::new(2.0, 2.0),
                    "B".to_string(),
                    "https://b.example".to_string(),
                    String::new(),
                ),
            ],
        );
        assert_eq!(config.find("B").map(|loc| loc.pos.lat), Some(2.0));
        assert!(!config.contains("C"));
    }
}
