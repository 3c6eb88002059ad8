//! Map Presenter
//!
//! Owns the loaded document for one page and the single-selection state
//! machine. Produces a [`MapView`] that [`page`] turns into HTML.
//!
//! Selection policy is toggle-on-reselect:
//!
//! ```text
//! Unselected  --click(N)-->  Selected(N)
//! Selected(N) --click(N)-->  Unselected
//! Selected(N) --click(M)-->  Selected(M)
//! Selected(_) --close---->   Unselected
//! Selected(_) --new doc-->   Unselected
//! ```
//!
//! The server applies the initial selection from the page URL. After that
//! the page script runs the same transitions in the browser, so clicks never
//! refetch the document or rebuild the map.

pub mod assets;
pub mod favicon;
pub mod markdown;
pub mod page;

use std::sync::Arc;

use tracing::debug;

use crate::Result;
use crate::config::MapsSettings;
use crate::models::{Location, MapConfig, MarkerIcon, Position};

pub use favicon::favicon_url;
pub use markdown::render_markdown;
pub use page::{render_notice, render_page};

/// Which location, if any, has its details open
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Unselected,
    Selected(String),
}

impl Selection {
    /// State after clicking the marker called `name`
    #[must_use]
    pub fn after_click(&self, name: &str) -> Selection {
        match self {
            Selection::Selected(current) if current == name => Selection::Unselected,
            _ => Selection::Selected(name.to_string()),
        }
    }

    #[must_use]
    pub fn selected_name(&self) -> Option<&str> {
        match self {
            Selection::Selected(name) => Some(name),
            Selection::Unselected => None,
        }
    }
}

/// Fixed presentation parameters
#[derive(Debug, Clone)]
pub struct PresenterOptions {
    pub default_zoom: u8,
    pub favicon_service: String,
}

impl From<&MapsSettings> for PresenterOptions {
    fn from(maps: &MapsSettings) -> Self {
        Self {
            default_zoom: maps.default_zoom,
            favicon_service: maps.favicon_service.clone(),
        }
    }
}

/// Everything the detail panel shows for one location
#[derive(Debug, Clone, PartialEq)]
pub struct LocationDetails {
    pub name: String,
    pub url: String,
    pub favicon_url: Option<String>,
    /// `Rating: N/10`, only when the location has a rating
    pub rating_line: Option<String>,
    pub address: Option<String>,
    pub image_url: Option<String>,
    /// Sanitised HTML rendered from the markdown description
    pub description_html: String,
}

/// One marker as the widget should draw it, with the panel it opens
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerView {
    pub name: String,
    pub position: Position,
    pub icon: MarkerIcon,
    pub selected: bool,
    pub details: LocationDetails,
}

/// Render-ready state of a page that has a document
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    /// Initial viewport only, the user may pan and zoom freely afterwards
    pub center: Position,
    pub zoom: u8,
    pub markers: Vec<MarkerView>,
}

impl MapView {
    /// Details of the selected marker; `None` means the instructions show
    #[must_use]
    pub fn open_details(&self) -> Option<&LocationDetails> {
        self.markers
            .iter()
            .find(|marker| marker.selected)
            .map(|marker| &marker.details)
    }
}

pub struct MapPresenter {
    options: PresenterOptions,
    config: Option<Arc<MapConfig>>,
    selection: Selection,
}

impl MapPresenter {
    #[must_use]
    pub fn new(options: PresenterOptions) -> Self {
        Self {
            options,
            config: None,
            selection: Selection::Unselected,
        }
    }

    /// Apply the outcome of a load.
    ///
    /// Any outcome resets the selection. A failed load clears the document
    /// and hands the error back.
    pub fn load(&mut self, outcome: Result<Arc<MapConfig>>) -> Result<()> {
        self.selection = Selection::Unselected;
        match outcome {
            Ok(config) => {
                debug!("Presenting {} location(s)", config.locations.len());
                self.config = Some(config);
                Ok(())
            }
            Err(e) => {
                self.config = None;
                Err(e)
            }
        }
    }

    #[must_use]
    pub fn config(&self) -> Option<&Arc<MapConfig>> {
        self.config.as_ref()
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Marker click. Names not in the current document are ignored.
    pub fn click(&mut self, name: &str) {
        let Some(config) = &self.config else {
            return;
        };
        if !config.contains(name) {
            debug!("Ignoring click on unknown location {:?}", name);
            return;
        }
        self.selection = self.selection.after_click(name);
    }

    /// `None` until a document is loaded: no map is rendered without one.
    #[must_use]
    pub fn view(&self) -> Option<MapView> {
        let config = self.config.as_ref()?;

        let markers = config
            .locations
            .iter()
            .map(|loc| MarkerView {
                name: loc.name.clone(),
                position: loc.pos,
                icon: loc.icon(),
                selected: self.selection.selected_name() == Some(loc.name.as_str()),
                details: self.details(loc),
            })
            .collect();

        Some(MapView {
            center: config.center,
            zoom: self.options.default_zoom,
            markers,
        })
    }

    fn details(&self, location: &Location) -> LocationDetails {
        LocationDetails {
            name: location.name.clone(),
            url: location.url.clone(),
            favicon_url: favicon_url(&self.options.favicon_service, &location.url),
            rating_line: location.rating.map(rating_line),
            address: location.address.clone(),
            image_url: location.image_url.clone(),
            description_html: render_markdown(&location.description),
        }
    }
}

fn rating_line(rating: f64) -> String {
    // -0 passes the range check but must not print a sign
    let rating = if rating == 0.0 { 0.0 } else { rating };
    format!("Rating: {rating}/10")
}
