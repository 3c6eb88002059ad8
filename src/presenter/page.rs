//! HTML rendering of the map page and of blocking notices

use serde::Serialize;

use super::assets::{INSTRUCTIONS_HTML, MAP_BOOTSTRAP_JS, PAGE_CSS};
use super::markdown::is_unsafe_url;
use super::{LocationDetails, MapView, Selection};
use crate::PoiMapError;
use crate::loader::CONFIG_PARAM;
use crate::models::Position;

/// Query parameter carrying the selected location name
pub const SELECTED_PARAM: &str = "selected";

const MAPS_SCRIPT_URL: &str = "https://maps.googleapis.com/maps/api/js";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WidgetData<'a> {
    center: Position,
    zoom: u8,
    map_id: &'a str,
    selected_param: &'static str,
    markers: Vec<WidgetMarker<'a>>,
}

#[derive(Serialize)]
struct WidgetMarker<'a> {
    name: &'a str,
    position: Position,
    glyph: &'a str,
    color: &'a str,
    selected: bool,
}

/// Map widget parameters that come from settings rather than the document
#[derive(Debug, Clone, Copy)]
pub struct WidgetParams<'a> {
    pub api_key: &'a str,
    pub map_id: &'a str,
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Page URL for `config_id` in the given selection state
#[must_use]
pub fn state_href(config_id: &str, selection: &Selection) -> String {
    let mut href = format!("/?{CONFIG_PARAM}={}", urlencoding::encode(config_id));
    if let Some(name) = selection.selected_name() {
        href.push_str(&format!("&{SELECTED_PARAM}={}", urlencoding::encode(name)));
    }
    href
}

fn hidden_attr(hidden: bool) -> &'static str {
    if hidden { " hidden" } else { "" }
}

/// Render the full map page.
///
/// Every location's panel is rendered up front and all but the selected one
/// are hidden. The page script switches panels on marker clicks.
pub fn render_page(view: &MapView, config_id: &str, widget: WidgetParams<'_>) -> String {
    let data = WidgetData {
        center: view.center,
        zoom: view.zoom,
        map_id: widget.map_id,
        selected_param: SELECTED_PARAM,
        markers: view
            .markers
            .iter()
            .map(|marker| WidgetMarker {
                name: &marker.name,
                position: marker.position,
                glyph: marker.icon.glyph,
                color: marker.icon.color,
                selected: marker.selected,
            })
            .collect(),
    };
    // serde_json cannot fail on these plain structs; `<` is escaped so the
    // blob can never close its script tag
    let data_json = serde_json::to_string(&data)
        .unwrap_or_else(|_| "{}".to_string())
        .replace('<', "\\u003c");

    let mut panels = format!(
        r#"<div class="location-info" data-panel="instructions"{}>{INSTRUCTIONS_HTML}</div>"#,
        hidden_attr(view.open_details().is_some())
    );
    for (index, marker) in view.markers.iter().enumerate() {
        panels.push_str(&render_details(
            &marker.details,
            config_id,
            index,
            !marker.selected,
        ));
    }

    let script_src = format!(
        "{MAPS_SCRIPT_URL}?key={}&v=weekly&loading=async&libraries=marker&callback=initMap",
        urlencoding::encode(widget.api_key)
    );

    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} · poimap</title>
<style>{PAGE_CSS}</style>
</head>
<body>
<div class="page">
<div class="map-container">
<div id="map" class="map"></div>
{panels}
</div>
</div>
<script type="application/json" id="map-data">{data_json}</script>
<script>{MAP_BOOTSTRAP_JS}</script>
<script async src="{script_src}"></script>
</body>
</html>
"#,
        title = escape_html(config_id),
        script_src = escape_html(&script_src),
    )
}

fn render_details(details: &LocationDetails, config_id: &str, index: usize, hidden: bool) -> String {
    let mut col1 = String::new();

    // the href only matters when scripts are off
    col1.push_str(&format!(
        r#"<a class="close" href="{}" title="Close" data-close>&times;</a>"#,
        escape_html(&state_href(config_id, &Selection::Unselected))
    ));

    let href = if is_unsafe_url(&details.url) {
        "#".to_string()
    } else {
        escape_html(&details.url)
    };
    let favicon = details
        .favicon_url
        .as_deref()
        .map(|src| format!(r#"<img class="favicon" src="{}" alt="">"#, escape_html(src)))
        .unwrap_or_default();
    col1.push_str(&format!(
        r#"<div class="title"><a href="{href}" target="_blank" rel="noopener noreferrer">{favicon}<div>{}</div></a></div>"#,
        escape_html(&details.name)
    ));

    if let Some(rating) = &details.rating_line {
        col1.push_str(&format!(r#"<div class="rating">{}</div>"#, escape_html(rating)));
    }
    if let Some(address) = &details.address {
        col1.push_str(&format!(
            r#"<div class="address"><pre>{}</pre></div>"#,
            escape_html(address)
        ));
    }
    col1.push_str(&format!(
        r#"<div class="description">{}</div>"#,
        details.description_html
    ));

    let col2 = details
        .image_url
        .as_deref()
        .filter(|src| !is_unsafe_url(src))
        .map(|src| {
            format!(
                r#"<img class="thumbnail" src="{}" alt="{}">"#,
                escape_html(src),
                escape_html(&details.name)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<div class="location-info details" data-panel="{index}"{}><div class="body"><div class="col1">{col1}</div><div class="col2">{col2}</div></div></div>"#,
        hidden_attr(hidden)
    )
}

fn notice_title(err: &PoiMapError) -> &'static str {
    match err {
        PoiMapError::MissingParameter { .. }
        | PoiMapError::InvalidParameter { .. }
        | PoiMapError::MalformedQuery { .. } => "No map selected",
        PoiMapError::NotFound { .. } => "Map not found",
        PoiMapError::Fetch { .. } => "Map could not be loaded",
        PoiMapError::Parse { .. } | PoiMapError::Validation { .. } => "Map document is invalid",
        PoiMapError::MissingCredential { .. } | PoiMapError::Settings { .. } => "Setup required",
        PoiMapError::Io { .. } => "Something went wrong",
    }
}

/// Render a blocking notice page for a failed load. No map is included.
#[must_use]
pub fn render_notice(err: &PoiMapError) -> String {
    let details = match err {
        PoiMapError::Validation { violations } => {
            let items: String = violations
                .iter()
                .map(|v| {
                    format!(
                        "<li><code>{}</code>: {}</li>",
                        escape_html(&v.path),
                        escape_html(&v.message)
                    )
                })
                .collect();
            format!("<ul>{items}</ul>")
        }
        _ => String::new(),
    };

    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} · poimap</title>
<style>{PAGE_CSS}</style>
</head>
<body>
<div class="notice" role="alert">
<h1>{title}</h1>
<p>{message}</p>
{details}
</div>
</body>
</html>
"#,
        title = notice_title(err),
        message = escape_html(&err.user_message()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FieldViolation;
    use crate::models::MarkerIcon;
    use crate::presenter::MarkerView;

    const WIDGET: WidgetParams<'static> = WidgetParams {
        api_key: "test-key",
        map_id: "DEMO_MAP_ID",
    };

    fn details() -> LocationDetails {
        LocationDetails {
            name: "Ippodo <Tea>".to_string(),
            url: "https://global.ippodo-tea.co.jp/".to_string(),
            favicon_url: Some(
                "https://www.google.com/s2/favicons?domain=global.ippodo-tea.co.jp&sz=32"
                    .to_string(),
            ),
            rating_line: Some("Rating: 7/10".to_string()),
            address: Some("Teramachi-dori\nNakagyo-ku".to_string()),
            image_url: None,
            description_html: "<p>Matcha</p>".to_string(),
        }
    }

    fn view_with(details: LocationDetails, selected: bool) -> MapView {
        MapView {
            center: Position::new(35.0, 135.0),
            zoom: 12,
            markers: vec![MarkerView {
                name: details.name.clone(),
                position: Position::new(35.01, 135.76),
                icon: MarkerIcon::for_type(None),
                selected,
                details,
            }],
        }
    }

    fn view(selected: bool) -> MapView {
        view_with(details(), selected)
    }

    #[test]
    fn test_state_href_encodes_names() {
        assert_eq!(state_href("kyoto", &Selection::Unselected), "/?config=kyoto");
        assert_eq!(
            state_href("kyoto", &Selection::Selected("Café & Bar".to_string())),
            "/?config=kyoto&selected=Caf%C3%A9%20%26%20Bar"
        );
    }

    #[test]
    fn test_rating_rendered_exactly_once() {
        let html = render_page(&view(true), "kyoto", WIDGET);
        assert_eq!(html.matches("7/10").count(), 1);
    }

    #[test]
    fn test_no_rating_line_without_rating() {
        let mut unrated = details();
        unrated.rating_line = None;
        let html = render_page(&view_with(unrated, true), "kyoto", WIDGET);
        assert!(!html.contains("Rating:"));
        assert!(!html.contains(r#"class="rating""#));
    }

    #[test]
    fn test_address_keeps_line_breaks() {
        let html = render_page(&view(true), "kyoto", WIDGET);
        assert!(html.contains("<pre>Teramachi-dori\nNakagyo-ku</pre>"));
    }

    #[test]
    fn test_names_are_escaped_everywhere() {
        let html = render_page(&view(true), "kyoto", WIDGET);
        assert!(!html.contains("Ippodo <Tea>"));
        assert!(html.contains("Ippodo &lt;Tea&gt;"));
        assert!(html.contains(r#""name":"Ippodo \u003cTea>""#));
    }

    #[test]
    fn test_selected_panel_is_visible() {
        let html = render_page(&view(true), "kyoto", WIDGET);
        assert!(html.contains(r#"data-panel="instructions" hidden>"#));
        assert!(html.contains(r#"data-panel="0">"#));
    }

    #[test]
    fn test_unselected_panels_are_rendered_hidden() {
        let html = render_page(&view(false), "kyoto", WIDGET);
        assert!(html.contains(r#"data-panel="instructions">"#));
        assert!(html.contains("Click a marker"));
        assert!(html.contains(r#"data-panel="0" hidden>"#));
        assert!(html.contains(r#"class="close""#));
    }

    #[test]
    fn test_close_falls_back_to_unselected_url() {
        let html = render_page(&view(true), "kyoto", WIDGET);
        assert!(html.contains(r#"<a class="close" href="/?config=kyoto" title="Close" data-close>"#));
    }

    #[test]
    fn test_widget_bootstrap_carries_key_and_markers() {
        let html = render_page(&view(false), "kyoto", WIDGET);
        assert!(html.contains("key=test-key"));
        assert!(html.contains(r#""zoom":12"#));
        assert!(html.contains(r#""selectedParam":"selected""#));
        assert!(html.contains(r#""mapId":"DEMO_MAP_ID""#));
        assert!(!html.contains(r#""href""#));
    }

    #[test]
    fn test_bootstrap_switches_selection_in_place() {
        assert!(MAP_BOOTSTRAP_JS.contains("history.replaceState"));
        assert!(!MAP_BOOTSTRAP_JS.contains("location.href ="));
        assert!(!MAP_BOOTSTRAP_JS.contains("location.assign"));
        assert!(!MAP_BOOTSTRAP_JS.contains("setCenter"));
    }

    #[test]
    fn test_script_url_is_not_linked() {
        let mut hostile = details();
        hostile.url = "javascript:alert(1)".to_string();
        hostile.favicon_url = None;
        let html = render_page(&view_with(hostile, true), "kyoto", WIDGET);
        assert!(!html.contains("javascript:alert"));
        assert!(html.contains(r##"href="#""##));
    }

    #[test]
    fn test_missing_parameter_notice_rendered_once() {
        let html = render_notice(&PoiMapError::MissingParameter { param: "config" });
        assert_eq!(html.matches(r#"class="notice""#).count(), 1);
        assert!(html.contains("No map selected"));
        assert!(!html.contains(r#"id="map""#));
    }

    #[test]
    fn test_validation_notice_lists_fields() {
        let html = render_notice(&PoiMapError::Validation {
            violations: vec![FieldViolation::new("locations[3].url", "invalid URL \"x\"")],
        });
        assert!(html.contains("<code>locations[3].url</code>"));
        assert!(html.contains("invalid URL &quot;x&quot;"));
    }
}
