/// Error types for vertical profile data
use std::path::PathBuf;
use thiserror::Error;

/// Failure to load the profile dataset. Fatal at startup.
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// The source file could not be opened or read
    #[error("Failed to read data source {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source is not valid delimited text
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// One or more required columns are absent from the header row
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

/// Failure to read the TOML configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The CSV reader only accepts single-byte delimiters
    #[error("Delimiter must be a single ASCII character, got {0:?}")]
    InvalidDelimiter(char),
}

/// Unrecognised names coming from a selector or the command line
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    #[error("Unknown water period: {0} (expected LW, RW, HW or FW)")]
    UnknownWaterPeriod(String),

    #[error("Unknown day period: {0} (expected AM or PM)")]
    UnknownDayPeriod(String),
}
