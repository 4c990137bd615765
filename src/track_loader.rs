use crate::geo_sample::{GeoSample, TimeWindow};
use crate::gpx_file_utils;
use crate::utils;
use chrono::{DateTime, Utc};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackFileError {
    #[error("not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),
    #[error("could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed track data in {}: {reason}", .path.display())]
    Malformed { path: PathBuf, reason: String },
}

impl TrackFileError {
    fn from_io(path: &Path, source: io::Error) -> Self {
        let path = path.to_path_buf();
        match source.kind() {
            io::ErrorKind::NotFound => TrackFileError::NotFound(path),
            io::ErrorKind::PermissionDenied => TrackFileError::PermissionDenied(path),
            _ => TrackFileError::Io { path, source },
        }
    }

    fn malformed(path: &Path, reason: impl ToString) -> Self {
        TrackFileError::Malformed {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Default)]
pub struct LoadedTrack {
    pub samples: Vec<GeoSample>,
    /// points without a usable timestamp or elevation
    pub skipped_points: usize,
}

#[derive(Debug, Default)]
pub struct TrackScan {
    pub samples: Vec<GeoSample>,
    pub files_read: usize,
    pub skipped_points: usize,
    pub failures: Vec<TrackFileError>,
}

pub fn load_gpx(file_path: &Path) -> Result<LoadedTrack, TrackFileError> {
    let xml = fs::read_to_string(file_path).map_err(|e| TrackFileError::from_io(file_path, e))?;
    let xml = gpx_file_utils::normalize_gpx_time(&xml)
        .map_err(|e| TrackFileError::malformed(file_path, e))?;
    let gpx_data =
        gpx::read(xml.as_bytes()).map_err(|e| TrackFileError::malformed(file_path, e))?;

    let mut loaded = LoadedTrack::default();
    let points = gpx_data
        .tracks
        .iter()
        .flat_map(|track| track.segments.iter())
        .flat_map(|segment| segment.points.iter());
    for point in points {
        let timestamp = point
            .time
            .as_ref()
            .and_then(|time| time.format().ok())
            .and_then(|time| DateTime::parse_from_rfc3339(&time).ok())
            .map(|time| time.with_timezone(&Utc));
        let (latitude, longitude) = (point.point().y(), point.point().x());
        match (timestamp, point.elevation) {
            (Some(timestamp), Some(elevation))
                if elevation.is_finite() && latitude.is_finite() && longitude.is_finite() =>
            {
                loaded.samples.push(GeoSample {
                    latitude,
                    longitude,
                    elevation,
                    timestamp,
                })
            }
            _ => loaded.skipped_points += 1,
        }
    }
    if loaded.skipped_points > 0 {
        debug!(
            "{}: skipped {} points without a usable time, elevation or position",
            file_path.display(),
            loaded.skipped_points
        );
    }
    Ok(loaded)
}

/// Collects every sample inside `window` from the track files in `dir`.
/// Files that cannot be read or parsed are logged and reported in
/// `TrackScan::failures`; only a missing or unreadable directory is an error.
pub fn load_samples_in_window(
    dir: &Path,
    extension: &str,
    window: &TimeWindow,
) -> Result<TrackScan, TrackFileError> {
    let mut scan = TrackScan::default();
    let files = utils::list_files_with_extensions(dir, &[extension.to_owned()])
        .map_err(|e| TrackFileError::from_io(dir, e))?;
    for file_path in files {
        match load_gpx(&file_path) {
            Ok(loaded) => {
                scan.files_read += 1;
                scan.skipped_points += loaded.skipped_points;
                scan.samples.extend(
                    loaded
                        .samples
                        .into_iter()
                        .filter(|sample| window.contains(&sample.timestamp)),
                );
            }
            Err(e) => {
                warn!("skipping track file: {e}");
                scan.failures.push(e);
            }
        }
    }
    info!(
        "{}: {} samples in [{}, {}) from {} files ({} failed)",
        dir.display(),
        scan.samples.len(),
        window.start,
        window.end,
        scan.files_read,
        scan.failures.len()
    );
    Ok(scan)
}
