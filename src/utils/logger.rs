//! Logger utility for application-wide logging
//!
//! This module provides a custom logger implementation that works alongside
//! the standard log crate, but adds file output capabilities. Without a log
//! file the console logger from `env_logger` is used instead.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;
use log::{Log, Record, Metadata, LevelFilter};

/// Custom logger implementation
pub struct Logger {
    /// File handle for log output, `None` when file logging is off
    file: Mutex<Option<File>>,
    /// Most verbose level written
    level: LevelFilter,
}

impl Logger {
    /// Creates a new logger instance
    ///
    /// # Arguments
    ///
    /// * `log_file` - Path to the log file
    ///
    /// # Returns
    ///
    /// A new Logger instance or an error if the file cannot be created
    pub fn new(log_file: &str) -> io::Result<Self> {
        let file = File::create(Path::new(log_file))?;
        Ok(Logger {
            file: Mutex::new(Some(file)),
            level: LevelFilter::Debug,
        })
    }

    /// Creates a logger that discards operation records
    pub fn disabled() -> Self {
        Logger {
            file: Mutex::new(None),
            level: LevelFilter::Off,
        }
    }

    /// Sets the most verbose level this logger writes
    pub fn with_level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// Logs a message to the log file
    ///
    /// # Arguments
    ///
    /// * `message` - The message to log
    pub fn log(&self, message: &str) -> io::Result<()> {
        let mut guard = match self.file.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(file) = guard.as_mut() {
            writeln!(file, "{}", message)?;
            file.flush()?;
        }
        Ok(())
    }

    /// Logs the outcome of a mask run in a formatted way
    ///
    /// # Arguments
    ///
    /// * `product` - Product name the mask was decoded for
    /// * `good` - Number of pixels that passed every rule
    /// * `total` - Number of pixels in the mask
    pub fn log_mask_summary(&self, product: &str, good: usize, total: usize) -> io::Result<()> {
        let share = if total == 0 { 0.0 } else { good as f64 * 100.0 / total as f64 };
        self.log(&format!(
            "Mask summary ({}): {} of {} pixels good ({:.1}%)",
            product, good, total, share
        ))
    }

    /// Static method to initialize the global logger
    ///
    /// The returned logger is the one installed for the log crate, so
    /// operation records and log records share one file.
    pub fn init_global_logger(log_file: &str, level: LevelFilter) -> io::Result<&'static Logger> {
        let global_logger: &'static Logger = Box::leak(Box::new(Logger::new(log_file)?.with_level(level)));

        if log::set_logger(global_logger).is_err() {
            eprintln!("Warning: Global logger was already initialized");
        }

        log::set_max_level(level);
        Ok(global_logger)
    }

    /// Installs the `env_logger` console logger
    ///
    /// `RUST_LOG` overrides `level` when set.
    pub fn init_console_logger(level: LevelFilter) {
        let _ = env_logger::Builder::new()
            .filter_level(level)
            .parse_default_env()
            .format_timestamp(None)
            .try_init();
    }
}

// Implement the Log trait to make our Logger work with the log crate
impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let message = format!("[{}] {}", record.level(), record.args());
            let _ = self.log(&message);

            // Also print to console
            println!("{}", message);
        }
    }

    fn flush(&self) {
        // Already flushing in the log method
    }
}
