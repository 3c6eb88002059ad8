//! Data models for map documents
//!
//! - Position: latitude/longitude pair
//! - Location: a named point of interest and its marker category
//! - MapConfig: the whole document, a center plus its locations

pub mod location;
pub mod map_config;
pub mod position;

pub use location::{Location, LocationType, MarkerIcon};
pub use map_config::MapConfig;
pub use position::Position;
