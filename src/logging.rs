//! Structured logging for the survey analyses.
//!
//! Provides context-rich logging with dataset and transect identifiers,
//! timestamps, and severity levels. Supports both console output and
//! file-based logging for unattended batch runs.

use chrono::Utc;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Mutex;

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset tags
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    Transects,
    BedThickness,
    FractureSpacing,
    Orientation,
    Strength,
    System,
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dataset::Transects => write!(f, "XSECT"),
            Dataset::BedThickness => write!(f, "BEDS"),
            Dataset::FractureSpacing => write!(f, "FRACS"),
            Dataset::Orientation => write!(f, "ORIENT"),
            Dataset::Strength => write!(f, "STRENGTH"),
            Dataset::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger Configuration
// ---------------------------------------------------------------------------

/// Global logger instance
static LOGGER: Mutex<Option<Logger>> = Mutex::new(None);

pub struct Logger {
    /// Minimum log level to display
    min_level: LogLevel,
    /// Optional file path for logging
    log_file: Option<String>,
}

impl Logger {
    /// Initialize the global logger
    pub fn init(min_level: LogLevel, log_file: Option<String>) {
        let logger = Logger { min_level, log_file };
        *LOGGER.lock().unwrap() = Some(logger);
    }

    fn log(&self, level: LogLevel, dataset: Dataset, id: Option<&str>, message: &str) {
        if level < self.min_level {
            return;
        }

        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
        let id_part = id.map(|s| format!(" [{}]", s)).unwrap_or_default();
        let log_entry = format!("{} {} {}{}: {}", timestamp, level, dataset, id_part, message);

        match level {
            LogLevel::Error => eprintln!("{}", log_entry),
            LogLevel::Warning => eprintln!("  {}", log_entry),
            LogLevel::Info => println!("  {}", message),
            LogLevel::Debug => println!("  [DEBUG] {}", message),
        }

        if let Some(ref path) = self.log_file {
            if let Err(e) = Self::append_to_file(path, &log_entry) {
                eprintln!("Failed to write to log file {}: {}", path, e);
            }
        }
    }

    fn append_to_file(path: &str, entry: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", entry)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Initialize the global logger
pub fn init_logger(min_level: LogLevel, log_file: Option<&str>) {
    Logger::init(min_level, log_file.map(String::from));
}

/// Log a general informational message
pub fn info(dataset: Dataset, id: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Info, dataset, id, message);
    }
}

/// Log a warning message
pub fn warn(dataset: Dataset, id: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Warning, dataset, id, message);
    }
}

/// Log an error message
pub fn error(dataset: Dataset, id: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Error, dataset, id, message);
    }
}

/// Log a debug message
pub fn debug(dataset: Dataset, id: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Debug, dataset, id, message);
    }
}

// ---------------------------------------------------------------------------
// Skipped-input reporting
// ---------------------------------------------------------------------------

/// Report an input that failed to load and will be excluded from the
/// aggregate statistics. Every skip is reported by identifier; a survey
/// that disappears without a log line would quietly bias the group
/// comparisons toward the cases that happened to parse.
pub fn log_skipped_input(dataset: Dataset, id: &str, err: &dyn std::error::Error) {
    warn(dataset, Some(id), &format!("skipped: {}", err));
}

/// Log a summary of a batch load.
pub fn log_corpus_summary(dataset: Dataset, total: usize, loaded: usize, skipped: usize) {
    let message = format!(
        "Load complete: {}/{} loaded, {} skipped",
        loaded, total, skipped
    );

    if skipped == 0 {
        info(dataset, None, &message);
    } else if loaded == 0 {
        error(dataset, None, &message);
    } else {
        warn(dataset, None, &message);
    }
}
