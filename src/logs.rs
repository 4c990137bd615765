use std::{fs, path::Path};

use anyhow::Result;
use file_rotate::{
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
    {ContentLimit, FileRotate},
};
use log::Log;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

/// Writes every record to a rotating log file and mirrors it on stderr so a
/// run can be followed from the terminal.
pub struct MainLogger {
    write_logger: Box<WriteLogger<FileRotate<AppendTimestamp>>>,
    level: LevelFilter,
}

impl MainLogger {
    fn new(
        write_logger: Box<WriteLogger<FileRotate<AppendTimestamp>>>,
        level: LevelFilter,
    ) -> Self {
        Self {
            write_logger,
            level,
        }
    }
}

impl Log for MainLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        self.write_logger.log(record);
        eprintln!("{}:{} -- {}", record.level(), record.target(), record.args());
    }

    fn flush(&self) {
        self.write_logger.flush();
    }
}

pub fn init(log_dir: &Path, level: LevelFilter) -> Result<()> {
    fs::create_dir_all(log_dir)?;
    let path = log_dir.join("trailmap.log");
    let log = FileRotate::new(
        path,
        AppendTimestamp::default(FileLimit::MaxFiles(3)),
        ContentLimit::Lines(1000),
        Compression::None,
        #[cfg(unix)]
        None,
    );
    let config = ConfigBuilder::new().set_time_format_rfc3339().build();
    let write_logger = WriteLogger::new(level, config, log);
    log::set_boxed_logger(Box::new(MainLogger::new(write_logger, level)))?;
    log::set_max_level(level);
    Ok(())
}
