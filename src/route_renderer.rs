use crate::elevation_bands::{BandColor, ElevationBands};
use crate::geo_sample::{Position, PositionSequence};
use crate::map_artifact::{MapArtifact, MapStyle, MarkerIcon, Popup};
use crate::sample_aggregator::TrackSummary;
use itertools::Itertools;

pub const ROUTE_WEIGHT: f64 = 2.5;
pub const ROUTE_OPACITY: f64 = 1.0;
pub const START_MARKER_COLOR: &str = "green";
pub const PEAK_MARKER_COLOR: &str = "red";

#[derive(Clone, Debug, PartialEq)]
pub struct BandSegment {
    pub band: usize,
    pub color: BandColor,
    /// index of the first position of this polyline in the sequence
    pub start_index: usize,
    pub points: Vec<(f64, f64)>,
}

impl BandSegment {
    /// Indices `j` of the consecutive pairs `(j, j + 1)` this polyline draws.
    pub fn pair_indices(&self) -> std::ops::Range<usize> {
        self.start_index..self.start_index + self.points.len() - 1
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Segmentation {
    /// grouped by band, lowest band first, walk order within a band
    pub segments: Vec<BandSegment>,
    /// pairs `(j, j + 1)` whose endpoints lie in different bands
    pub dropped_pairs: Vec<usize>,
}

/// Bands spanning the elevation range already measured by the aggregator.
pub fn bands_for(summary: &TrackSummary) -> ElevationBands {
    ElevationBands::for_range(summary.min_elevation, summary.max_elevation)
}

/// Splits the route into single-band polylines. A pair joins a polyline only
/// when both of its endpoints lie in that polyline's band; a pair crossing a
/// band boundary ends the current polyline and is not drawn at all.
pub fn band_segments(positions: &[Position], bands: &ElevationBands) -> Segmentation {
    let mut segmentation = Segmentation::default();
    let mut current: Option<BandSegment> = None;

    for (j, (a, b)) in positions.iter().tuple_windows().enumerate() {
        let band = match (bands.band_of(a.elevation), bands.band_of(b.elevation)) {
            (Some(x), Some(y)) if x == y => Some(x),
            _ => None,
        };
        match band {
            Some(band) => match current.as_mut() {
                Some(segment) if segment.band == band => segment.points.push(b.lat_lng()),
                _ => {
                    let finished = current.replace(BandSegment {
                        band,
                        color: bands.bands()[band].color,
                        start_index: j,
                        points: vec![a.lat_lng(), b.lat_lng()],
                    });
                    segmentation.segments.extend(finished);
                }
            },
            None => {
                segmentation.segments.extend(current.take());
                segmentation.dropped_pairs.push(j);
            }
        }
    }
    segmentation.segments.extend(current);
    segmentation.segments.sort_by_key(|segment| segment.band);
    segmentation
}

pub fn draw_route(
    map: &mut MapArtifact,
    positions: &PositionSequence,
    bands: &ElevationBands,
) -> Segmentation {
    let segmentation = band_segments(positions.as_slice(), bands);
    for segment in &segmentation.segments {
        map.add_polyline(
            segment.points.clone(),
            &segment.color.to_string(),
            ROUTE_WEIGHT,
            ROUTE_OPACITY,
        );
    }
    debug!(
        "drew {} polylines, dropped {} band transitions",
        segmentation.segments.len(),
        segmentation.dropped_pairs.len()
    );
    segmentation
}

/// "Start" at the first position and the elevation at the peak. Both are
/// always added, even when they coincide.
pub fn add_route_markers(map: &mut MapArtifact, summary: &TrackSummary) {
    map.add_marker(
        summary.positions.first().lat_lng(),
        MarkerIcon::colored(START_MARKER_COLOR),
        Some(Popup::Text {
            text: "Start".to_string(),
        }),
    );
    let peak = summary.peak();
    map.add_marker(
        peak.lat_lng(),
        MarkerIcon::colored(PEAK_MARKER_COLOR),
        Some(Popup::Text {
            text: format!("Max Elevation: {:.1}", peak.elevation),
        }),
    );
}

/// A map centered on the track centroid holding the banded route and its
/// two markers.
pub fn render_route(summary: &TrackSummary, style: &MapStyle) -> (MapArtifact, Segmentation) {
    let mut map = MapArtifact::new(summary.centroid, style.clone());
    let segmentation = draw_route(&mut map, &summary.positions, &bands_for(summary));
    add_route_markers(&mut map, summary);
    (map, segmentation)
}
