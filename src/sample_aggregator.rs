use crate::geo_sample::{GeoSample, Position, PositionSequence, TimeWindow};
use chrono::{DateTime, Utc};

#[derive(Clone, Debug, PartialEq)]
pub struct TrackSummary {
    pub positions: PositionSequence,
    /// (mean latitude, mean longitude)
    pub centroid: (f64, f64),
    pub min_elevation: f64,
    pub max_elevation: f64,
    /// first occurrence on ties
    pub max_elevation_index: usize,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl TrackSummary {
    pub fn peak(&self) -> &Position {
        &self.positions.as_slice()[self.max_elevation_index]
    }
}

/// Builds the chronological position sequence for `window`. Returns `None`
/// when no sample falls inside the window, since there is nothing to center a
/// map on.
pub fn aggregate(samples: Vec<GeoSample>, window: &TimeWindow) -> Option<TrackSummary> {
    let mut samples: Vec<GeoSample> = samples
        .into_iter()
        .filter(|sample| window.contains(&sample.timestamp))
        .collect();
    // stable, so samples sharing a timestamp keep their file order
    samples.sort_by_key(|sample| sample.timestamp);

    let start_time = samples.first()?.timestamp;
    let end_time = samples.last()?.timestamp;

    let count = samples.len() as f64;
    let mut lat_sum = 0.;
    let mut lng_sum = 0.;
    let mut min_elevation = f64::INFINITY;
    let mut max_elevation = f64::NEG_INFINITY;
    let mut max_elevation_index = 0;
    for (i, sample) in samples.iter().enumerate() {
        lat_sum += sample.latitude;
        lng_sum += sample.longitude;
        min_elevation = min_elevation.min(sample.elevation);
        if sample.elevation > max_elevation {
            max_elevation = sample.elevation;
            max_elevation_index = i;
        }
    }

    let positions = PositionSequence::new(samples.iter().map(GeoSample::position).collect())?;
    Some(TrackSummary {
        positions,
        centroid: (lat_sum / count, lng_sum / count),
        min_elevation,
        max_elevation,
        max_elevation_index,
        start_time,
        end_time,
    })
}
