use std::path::{Component, Path, PathBuf};

use crate::foundation::error::{FamapError, FamapResult};
use crate::map::builder::FamilyMap;
use crate::pin::PIN_SIZE;

const LEAFLET_VERSION: &str = "1.9.4";
const TILE_URL: &str = "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}{r}.png";
const TILE_ATTRIBUTION: &str = "&copy; <a href=\"https://carto.com/attributions\">CARTO</a>";
const INITIAL_CENTER: [f64; 2] = [20.0, 0.0];
const INITIAL_ZOOM: u8 = 2;
const POPUP_MAX_WIDTH: u32 = 200;

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Family map</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@@LEAFLET@/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@@LEAFLET@/dist/leaflet.js"></script>
<style>html, body, #map { height: 100%; margin: 0; }</style>
</head>
<body>
<div id="map"></div>
<script>
const famap = @DATA@;
const map = L.map("map").setView(famap.center, famap.zoom);
L.tileLayer(famap.tiles.url, {
  attribution: famap.tiles.attribution,
  subdomains: "abcd",
  maxZoom: 20
}).addTo(map);
const overlays = {};
for (const layer of famap.layers) {
  const group = L.featureGroup();
  const icon = L.icon({ iconUrl: layer.icon, iconSize: [famap.iconSize, famap.iconSize] });
  for (const m of layer.markers) {
    L.marker([m.lat, m.lon], { icon: icon })
      .bindPopup(m.popup, { maxWidth: famap.popupMaxWidth })
      .addTo(group);
  }
  group.addTo(map);
  overlays[layer.label] = group;
}
L.control.layers(null, overlays, { collapsed: false }).addTo(map);
</script>
</body>
</html>
"#;

/// Escape text for HTML element content and double-quoted attributes.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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

/// Path of `target` as seen from a page in `page_dir`, with `/` separators.
///
/// Falls back to `target` itself when the two do not share a root.
pub fn relative_url(page_dir: &Path, target: &Path) -> String {
    let (Ok(from), Ok(to)) = (std::path::absolute(page_dir), std::path::absolute(target)) else {
        return to_url_path(target);
    };
    let from = normalize(&from);
    let to = normalize(&to);

    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();
    if common == 0 {
        return to_url_path(target);
    }

    let mut parts: Vec<String> = std::iter::repeat_n("..".to_string(), from.len() - common).collect();
    parts.extend(to[common..].iter().cloned());
    parts.join("/")
}

fn normalize(p: &Path) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for c in p.components() {
        match c {
            Component::Prefix(prefix) => out.push(prefix.as_os_str().to_string_lossy().into_owned()),
            Component::RootDir => out.push(String::new()),
            Component::CurDir => {}
            Component::ParentDir => {
                if out.len() > 1 {
                    out.pop();
                }
            }
            Component::Normal(s) => out.push(s.to_string_lossy().into_owned()),
        }
    }
    out
}

fn to_url_path(p: &Path) -> String {
    p.to_string_lossy().replace('\\', "/")
}

fn popup_html(entity: &str, place: &str, icon_url: &str, link: Option<&str>) -> String {
    let body = format!(
        r#"<img src="{}" width="{PIN_SIZE}" height="{PIN_SIZE}"><br>{} in {}"#,
        escape_html(icon_url),
        escape_html(entity),
        escape_html(place)
    );
    match link {
        Some(url) => format!(
            r#"<a href="{}" target="_blank" rel="noopener">{body}</a>"#,
            escape_html(url)
        ),
        None => body,
    }
}

/// Render the complete page for `map`, resolving pin URLs relative to `page_dir`.
pub fn render_html(map: &FamilyMap, page_dir: &Path) -> FamapResult<String> {
    let layers: Vec<serde_json::Value> = map
        .layers
        .iter()
        .map(|layer| {
            let icon = relative_url(page_dir, &layer.pin);
            let markers: Vec<serde_json::Value> = layer
                .markers
                .iter()
                .map(|m| {
                    serde_json::json!({
                        "lat": m.coordinates.lat,
                        "lon": m.coordinates.lon,
                        "popup": popup_html(&layer.name, &m.place, &icon, m.url.as_deref()),
                    })
                })
                .collect();
            serde_json::json!({
                "label": escape_html(&layer.name),
                "icon": icon,
                "markers": markers,
            })
        })
        .collect();

    let data = serde_json::json!({
        "center": INITIAL_CENTER,
        "zoom": INITIAL_ZOOM,
        "iconSize": PIN_SIZE,
        "popupMaxWidth": POPUP_MAX_WIDTH,
        "tiles": { "url": TILE_URL, "attribution": TILE_ATTRIBUTION },
        "layers": layers,
    });
    let data = serde_json::to_string(&data)
        .map_err(|e| FamapError::serde(format!("serialize map data: {e}")))?
        .replace("</", "<\\/");

    Ok(PAGE_TEMPLATE
        .replace("@LEAFLET@", LEAFLET_VERSION)
        .replace("@DATA@", &data))
}

/// Render `map` and write it to `out`, creating the parent directory.
pub fn write_html(map: &FamilyMap, out: &Path) -> FamapResult<PathBuf> {
    let page_dir = out
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(page_dir).map_err(|e| FamapError::io(page_dir, e))?;

    let html = render_html(map, page_dir)?;
    std::fs::write(out, html).map_err(|e| FamapError::io(out, e))?;
    tracing::info!(out = %out.display(), markers = map.marker_count(), "wrote map");
    Ok(out.to_path_buf())
}

#[cfg(test)]
#[path = "../../tests/unit/map/html.rs"]
mod tests;
