use crate::utils::escape_html;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const LEAFLET_VERSION: &str = "1.9.4";
const HTML_TEMPLATE: &str = include_str!("map.html");

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapStyle {
    pub tile_url: String,
    pub attribution: String,
    pub zoom_start: u8,
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            tile_url: "https://tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            attribution: "&copy; OpenStreetMap contributors".to_string(),
            zoom_start: 10,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MarkerIcon {
    pub color: String,
    pub glyph: Option<String>,
}

impl MarkerIcon {
    pub fn colored(color: &str) -> Self {
        Self {
            color: color.to_string(),
            glyph: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Popup {
    Text {
        text: String,
    },
    /// HTML shown inside a fixed-size frame
    Frame {
        html: String,
        width: u32,
        height: u32,
        max_width: u32,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MapLayer {
    Polyline {
        points: Vec<[f64; 2]>,
        color: String,
        weight: f64,
        opacity: f64,
    },
    Marker {
        location: [f64; 2],
        icon: MarkerIcon,
        popup: Option<Popup>,
    },
}

#[derive(Serialize)]
struct Payload<'a> {
    center: [f64; 2],
    zoom: u8,
    tile_url: &'a str,
    attribution: &'a str,
    layers: &'a [MapLayer],
}

/// Everything drawn for one job, in drawing order.
#[derive(Clone, Debug)]
pub struct MapArtifact {
    title: String,
    center: (f64, f64),
    style: MapStyle,
    layers: Vec<MapLayer>,
}

impl MapArtifact {
    pub fn new(center: (f64, f64), style: MapStyle) -> Self {
        Self {
            title: "trailmap".to_string(),
            center,
            style,
            layers: Vec::new(),
        }
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    pub fn center(&self) -> (f64, f64) {
        self.center
    }

    pub fn layers(&self) -> &[MapLayer] {
        &self.layers
    }

    pub fn add_polyline(
        &mut self,
        points: Vec<(f64, f64)>,
        color: &str,
        weight: f64,
        opacity: f64,
    ) {
        self.layers.push(MapLayer::Polyline {
            points: points.into_iter().map(|(lat, lng)| [lat, lng]).collect(),
            color: color.to_string(),
            weight,
            opacity,
        });
    }

    pub fn add_marker(&mut self, location: (f64, f64), icon: MarkerIcon, popup: Option<Popup>) {
        self.layers.push(MapLayer::Marker {
            location: [location.0, location.1],
            icon,
            popup,
        });
    }

    pub fn polylines(&self) -> impl Iterator<Item = &MapLayer> {
        self.layers
            .iter()
            .filter(|layer| matches!(layer, MapLayer::Polyline { .. }))
    }

    pub fn markers(&self) -> impl Iterator<Item = &MapLayer> {
        self.layers
            .iter()
            .filter(|layer| matches!(layer, MapLayer::Marker { .. }))
    }

    pub fn to_html(&self) -> Result<String> {
        let payload = Payload {
            center: [self.center.0, self.center.1],
            zoom: self.style.zoom_start,
            tile_url: &self.style.tile_url,
            attribution: &self.style.attribution,
            layers: &self.layers,
        };
        // `<` only occurs inside JSON strings, so escaping it keeps the
        // payload from terminating the enclosing script element.
        let payload = serde_json::to_string(&payload)?.replace('<', "\\u003c");
        Ok(HTML_TEMPLATE
            .replace("{{LEAFLET_VERSION}}", LEAFLET_VERSION)
            .replace("{{TITLE}}", &escape_html(&self.title))
            .replace("{{PAYLOAD}}", &payload))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_html()?)?;
        info!("map written to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_cannot_close_script() {
        let mut map = MapArtifact::new((46.85, -121.76), MapStyle::default());
        map.add_marker(
            (46.85, -121.76),
            MarkerIcon::colored("green"),
            Some(Popup::Text {
                text: "</script><script>alert(1)</script>".to_string(),
            }),
        );
        let html = map.to_html().unwrap();
        assert!(!html.contains("</script><script>alert(1)"));
        assert!(html.contains("\\u003c/script>"));
    }

    #[test]
    fn title_is_escaped() {
        let mut map = MapArtifact::new((0., 0.), MapStyle::default());
        map.set_title("<b>Copper Ridge</b>");
        let html = map.to_html().unwrap();
        assert!(html.contains("<title>&lt;b&gt;Copper Ridge&lt;/b&gt;</title>"));
    }

    #[test]
    fn layers_are_embedded_in_order() {
        let mut map = MapArtifact::new((1., 2.), MapStyle::default());
        map.add_polyline(vec![(1., 2.), (3., 4.)], "green", 2.5, 1.);
        map.add_marker((1., 2.), MarkerIcon::colored("red"), None);
        assert_eq!(map.polylines().count(), 1);
        assert_eq!(map.markers().count(), 1);

        let html = map.to_html().unwrap();
        let polyline = html.find(r#""kind":"polyline""#).unwrap();
        let marker = html.find(r#""kind":"marker""#).unwrap();
        assert!(polyline < marker);
        assert!(html.contains(r#""points":[[1.0,2.0],[3.0,4.0]]"#));
        assert!(html.contains("https://tile.openstreetmap.org/{z}/{x}/{y}.png"));
    }

    #[test]
    fn template_placeholders_are_filled() {
        let html = MapArtifact::new((0., 0.), MapStyle::default())
            .to_html()
            .unwrap();
        assert!(!html.contains("{{"));
        assert!(html.contains("leaflet@1.9.4/dist/leaflet.js"));
        assert!(html.contains(r#"<script type="application/json" id="trailmap-data">{"#));
    }
}
