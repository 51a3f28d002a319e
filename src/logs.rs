use std::path::Path;

use anyhow::Result;
use file_rotate::{
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
    {ContentLimit, FileRotate},
};
use log::Log;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

pub const LOG_FILE: &str = "logs/motomap.log";

/// Echoes every record to stderr, and to a rotating log file when there is
/// a log directory.
pub struct MainLogger {
    level: LevelFilter,
    write_logger: Option<Box<WriteLogger<FileRotate<AppendTimestamp>>>>,
}

impl MainLogger {
    fn new(
        level: LevelFilter,
        write_logger: Option<Box<WriteLogger<FileRotate<AppendTimestamp>>>>,
    ) -> Self {
        Self {
            level,
            write_logger,
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
        if let Some(write_logger) = &self.write_logger {
            write_logger.log(record);
        }
        eprintln!("[{:5}] {}", record.level(), record.args());
    }

    fn flush(&self) {
        if let Some(write_logger) = &self.write_logger {
            write_logger.flush();
        }
    }
}

pub fn init(log_dir: Option<&Path>, level: LevelFilter) -> Result<()> {
    let write_logger = log_dir.map(|log_dir| {
        let log = FileRotate::new(
            log_dir.join(LOG_FILE),
            AppendTimestamp::default(FileLimit::MaxFiles(3)),
            ContentLimit::Lines(1000),
            Compression::None,
            #[cfg(unix)]
            None,
        );
        let config = ConfigBuilder::new().set_time_format_rfc3339().build();
        WriteLogger::new(level, config, log)
    });
    let main_logger = MainLogger::new(level, write_logger);
    log::set_boxed_logger(Box::new(main_logger))?;
    log::set_max_level(level);
    Ok(())
}
