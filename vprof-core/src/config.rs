//! Application configuration.
//!
//! Read from a TOML file; every key is optional.
//!
//! ```toml
//! data-path = "VerticalProfiles_with_thermocline_chloro.csv"
//! station-column = "StationNewName"
//! delimiter = ","
//! excluded-stations = ["2.75", "21.25", "21.75"]
//! position-policy = "mean"        # or "first-seen"
//! sheet-policy = "first-row"      # or "min-sheet-id", "max-sample-count"
//! ```

use crate::error::ConfigError;
use crate::loader::LoadOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_PATH: &str = "VerticalProfiles_with_thermocline_chloro.csv";
pub const DEFAULT_STATION_COLUMN: &str = "StationNewName";
pub const DEFAULT_EXCLUDED_STATIONS: [&str; 3] = ["2.75", "21.25", "21.75"];

/// How a station's map position is derived from its rows.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PositionPolicy {
    /// Coordinates of the station's first row
    FirstSeen,
    /// Arithmetic mean of all the station's rows
    #[default]
    Mean,
}

/// Which sheet is kept when a station/period has several.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SheetPolicy {
    /// The sheet that appears first in source row order
    #[default]
    FirstRow,
    /// The smallest sheet id (numeric when possible)
    MinSheetId,
    /// The sheet with the most rows; ties go to row order
    MaxSampleCount,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct AppConfig {
    pub data_path: PathBuf,
    pub station_column: String,
    pub delimiter: char,
    /// Station ids dropped at load time (exact match on the raw or canonical id)
    pub excluded_stations: Vec<String>,
    pub position_policy: PositionPolicy,
    pub sheet_policy: SheetPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            station_column: DEFAULT_STATION_COLUMN.to_string(),
            delimiter: ',',
            excluded_stations: DEFAULT_EXCLUDED_STATIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            position_policy: PositionPolicy::default(),
            sheet_policy: SheetPolicy::default(),
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(contents)?;
        if !config.delimiter.is_ascii() {
            return Err(ConfigError::InvalidDelimiter(config.delimiter));
        }
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&contents)?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Loader settings derived from this configuration
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            station_column: self.station_column.clone(),
            // Non-ASCII delimiters are rejected when the config is parsed
            delimiter: self.delimiter as u8,
            excluded_stations: self.excluded_stations.clone(),
        }
    }
}
