use crate::geo_sample::TimeWindow;
use crate::map_artifact::MapStyle;
use crate::photo_annotator::{PhotoOptions, DEFAULT_THUMBNAIL_SIZE};
use anyhow::Result;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JobConfig {
    pub name: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub photo_dir: PathBuf,
    pub output: PathBuf,
    /// overrides `Config::track_dir` for this job
    #[serde(default)]
    pub track_dir: Option<PathBuf>,
}

impl JobConfig {
    pub fn window(&self) -> Result<TimeWindow> {
        TimeWindow::new(self.start, self.end)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub track_dir: PathBuf,
    pub track_extension: String,
    pub photo_extensions: Vec<String>,
    pub thumbnail_size: u32,
    pub map: MapStyle,
    pub jobs: Vec<JobConfig>,
}

fn utc_midnight(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            track_dir: PathBuf::from("workout-routes"),
            track_extension: "gpx".to_string(),
            photo_extensions: PhotoOptions::default().extensions,
            thumbnail_size: DEFAULT_THUMBNAIL_SIZE,
            map: MapStyle::default(),
            jobs: vec![
                JobConfig {
                    name: "Mt Rainier".to_string(),
                    start: utc_midnight(2022, 8, 1),
                    end: utc_midnight(2022, 8, 5),
                    photo_dir: PathBuf::from("Mt Rainer Photos"),
                    output: PathBuf::from("mt_rainer_map.html"),
                    track_dir: None,
                },
                JobConfig {
                    name: "Copper Ridge".to_string(),
                    start: utc_midnight(2022, 8, 8),
                    end: utc_midnight(2022, 8, 12),
                    photo_dir: PathBuf::from("Copper Ridge"),
                    output: PathBuf::from("copper_ridge_map.html"),
                    track_dir: None,
                },
            ],
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.thumbnail_size == 0 {
            bail!("thumbnail_size must be positive");
        }
        for job in &self.jobs {
            job.window()
                .map_err(|e| anyhow!("job \"{}\": {e}", job.name))?;
        }
        Ok(())
    }

    pub fn track_dir_for<'a>(&'a self, job: &'a JobConfig) -> &'a Path {
        job.track_dir.as_deref().unwrap_or(&self.track_dir)
    }

    pub fn photo_options(&self) -> PhotoOptions {
        PhotoOptions {
            extensions: self.photo_extensions.clone(),
            thumbnail_size: self.thumbnail_size,
        }
    }
}
