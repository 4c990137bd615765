use crate::config::{Config, JobConfig};
use crate::geo_sample::TimeWindow;
use crate::photo_annotator::{self, PhotoReport};
use crate::route_renderer;
use crate::sample_aggregator;
use crate::track_loader::{self, TrackFileError};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JobError {
    #[error("invalid job: {0}")]
    InvalidJob(String),
    #[error("track directory unusable: {0}")]
    Tracks(#[from] TrackFileError),
    #[error("no track data in [{}, {})", .0.start, .0.end)]
    NoDataInRange(TimeWindow),
    #[error("photo annotation failed: {0}")]
    Photos(anyhow::Error),
    #[error("could not write map: {0}")]
    Output(anyhow::Error),
}

#[derive(Debug)]
pub struct JobReport {
    pub output: PathBuf,
    pub positions: usize,
    pub polylines: usize,
    pub dropped_transitions: usize,
    pub max_elevation: f64,
    pub track_failures: Vec<TrackFileError>,
    pub photos: PhotoReport,
}

/// Loads, renders and writes one job's map. Nothing is written when the
/// window holds no track data.
pub fn run_job(config: &Config, job: &JobConfig) -> Result<JobReport, JobError> {
    let window = job
        .window()
        .map_err(|e| JobError::InvalidJob(e.to_string()))?;

    let scan = track_loader::load_samples_in_window(
        config.track_dir_for(job),
        &config.track_extension,
        &window,
    )?;
    let summary = sample_aggregator::aggregate(scan.samples, &window)
        .ok_or(JobError::NoDataInRange(window))?;

    let (mut map, segmentation) = route_renderer::render_route(&summary, &config.map);
    map.set_title(&job.name);

    let photos =
        photo_annotator::annotate_photos(&mut map, &job.photo_dir, &config.photo_options())
            .map_err(JobError::Photos)?;

    map.save(&job.output).map_err(JobError::Output)?;

    Ok(JobReport {
        output: job.output.clone(),
        positions: summary.positions.len(),
        polylines: segmentation.segments.len(),
        dropped_transitions: segmentation.dropped_pairs.len(),
        max_elevation: summary.max_elevation,
        track_failures: scan.failures,
        photos,
    })
}

/// Runs every job in order. A failing job is logged and does not stop the
/// ones after it.
pub fn run_all(config: &Config) -> Vec<(String, Result<JobReport, JobError>)> {
    config
        .jobs
        .iter()
        .map(|job| {
            info!("running job \"{}\"", job.name);
            let result = run_job(config, job);
            match &result {
                Ok(report) => info!(
                    "job \"{}\" done: {} positions, {} photos -> {}",
                    job.name,
                    report.positions,
                    report.photos.placed.len(),
                    report.output.display()
                ),
                Err(e) => error!("job \"{}\" failed: {e}", job.name),
            }
            (job.name.clone(), result)
        })
        .collect()
}
