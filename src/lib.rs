#[macro_use]
extern crate log;
#[macro_use]
extern crate anyhow;

pub mod config;
pub mod elevation_bands;
pub mod geo_sample;
pub mod gpx_file_utils;
pub mod logs;
pub mod map_artifact;
pub mod photo_annotator;
pub mod pipeline;
pub mod route_renderer;
pub mod sample_aggregator;
pub mod track_loader;
pub mod utils;
