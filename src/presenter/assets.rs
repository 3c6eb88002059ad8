//! Static page assets, bundled into the binary as `&'static str`.

/// Stylesheet for the map page and notices
pub const PAGE_CSS: &str = r#"
html, body { margin: 0; height: 100%; font-family: system-ui, sans-serif; }
[hidden] { display: none !important; }
.page { display: flex; flex-direction: column; height: 100%; }
.map-container { position: relative; flex: 1; display: flex; flex-direction: column; }
.map { flex: 1; min-height: 60vh; }
.location-info { max-height: 40vh; overflow-y: auto; padding: 12px 16px; border-top: 1px solid #ddd; }
.location-info .body { display: flex; gap: 16px; }
.location-info .col1 { flex: 1; }
.location-info .title a { display: flex; align-items: center; gap: 8px; font-size: 1.2em; font-weight: 600; }
.location-info .close { float: right; text-decoration: none; font-size: 1.4em; color: inherit; }
.location-info .address pre { font-family: inherit; margin: 4px 0; }
.location-info .thumbnail { max-width: 200px; max-height: 200px; border-radius: 6px; }
.marker { border-radius: 50%; width: 32px; height: 32px; display: flex; align-items: center;
  justify-content: center; font-size: 18px; border: 2px solid #fff; box-shadow: 0 1px 4px rgba(0,0,0,.4); }
.marker.selected { transform: scale(1.35); border-color: #202124; }
.notice { margin: 20vh auto; max-width: 560px; padding: 24px; border: 2px solid #d93025; border-radius: 8px; }
.notice ul { padding-left: 20px; }
@media (prefers-color-scheme: dark) {
  body { background: #202124; color: #e8eaed; }
  .location-info { border-color: #3c4043; }
  a { color: #8ab4f8; }
}
"#;

/// Builds the map widget from the `#map-data` JSON blob and runs the
/// selection state machine in the page. A click swaps the visible panel and
/// rewrites `?selected=` in place; the map and its viewport are never rebuilt.
pub const MAP_BOOTSTRAP_JS: &str = r#"
const mapData = JSON.parse(document.getElementById("map-data").textContent);
const markerElements = [];
let selectedIndex = mapData.markers.findIndex((marker) => marker.selected);

function showSelection() {
  const open = selectedIndex < 0 ? "instructions" : String(selectedIndex);
  for (const panel of document.querySelectorAll("[data-panel]")) {
    panel.hidden = panel.dataset.panel !== open;
  }
  markerElements.forEach((element, index) => {
    const chosen = index === selectedIndex;
    element.content.classList.toggle("selected", chosen);
    element.zIndex = chosen ? 1000 : null;
  });

  const url = new URL(window.location.href);
  if (selectedIndex < 0) {
    url.searchParams.delete(mapData.selectedParam);
  } else {
    url.searchParams.set(mapData.selectedParam, mapData.markers[selectedIndex].name);
  }
  history.replaceState(null, "", url);
}

// toggle-on-reselect, same as the server's Selection::after_click
function clickMarker(index) {
  selectedIndex = selectedIndex === index ? -1 : index;
  showSelection();
}

function closeDetails() {
  selectedIndex = -1;
  showSelection();
}

for (const link of document.querySelectorAll("[data-close]")) {
  link.addEventListener("click", (event) => {
    event.preventDefault();
    closeDetails();
  });
}

async function initMap() {
  const { Map } = await google.maps.importLibrary("maps");
  const { AdvancedMarkerElement } = await google.maps.importLibrary("marker");

  const map = new Map(document.getElementById("map"), {
    center: mapData.center,
    zoom: mapData.zoom,
    mapId: mapData.mapId,
    gestureHandling: "greedy",
    disableDefaultUI: true,
    colorScheme: "FOLLOW_SYSTEM",
  });

  mapData.markers.forEach((marker, index) => {
    const content = document.createElement("div");
    content.className = marker.selected ? "marker selected" : "marker";
    content.style.background = marker.color;
    content.textContent = marker.glyph;

    const element = new AdvancedMarkerElement({
      map,
      position: marker.position,
      title: marker.name,
      content,
      zIndex: marker.selected ? 1000 : null,
    });
    element.addListener("click", () => clickMarker(index));
    markerElements.push(element);
  });
}
window.initMap = initMap;
"#;

/// Panel content while nothing is selected
pub const INSTRUCTIONS_HTML: &str = r#"<div class="instructions">
<p>Click a marker to see details about that place.</p>
<p>Click the same marker again, or the &times; button, to close the details.</p>
</div>"#;
