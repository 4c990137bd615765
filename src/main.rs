use simplelog::LevelFilter;
use std::env;
use std::path::Path;
use std::process::ExitCode;
use trailmap_core::config::Config;
use trailmap_core::{logs, pipeline};

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    if let Err(e) = logs::init(Path::new("logs"), LevelFilter::Info) {
        eprintln!("failed to initialize logging: {e:?}");
    }

    let config = match args.get(1) {
        Some(config_path) => match Config::load(Path::new(config_path)) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("failed to load config {config_path}: {e:?}");
                return ExitCode::FAILURE;
            }
        },
        None => Config::default(),
    };

    let outcomes = pipeline::run_all(&config);
    let failed = outcomes.iter().filter(|(_, result)| result.is_err()).count();
    if failed > 0 {
        eprintln!("{failed} of {} jobs failed", outcomes.len());
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
