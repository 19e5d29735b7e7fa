//! Core types and dataset loading for vertical profile measurements.
//!
//! A dataset is a spreadsheet export where every row is one depth sample
//! taken at a station during a (water period, day period) campaign. This
//! crate owns the row model ([`sample::Sample`]), the loaded table
//! ([`dataset::Dataset`]), the loader that sanitises the raw export
//! ([`loader`]) and the application configuration ([`config`]).

pub mod config;
pub mod dataset;
pub mod error;
pub mod loader;
pub mod parameter;
pub mod sample;

pub use config::{AppConfig, PositionPolicy, SheetPolicy};
pub use dataset::{Dataset, Schema};
pub use error::{ConfigError, DataLoadError, ParseError};
pub use loader::LoadOptions;
pub use parameter::{AnnotationKey, Parameter};
pub use sample::{DayPeriod, Sample, SheetId, WaterPeriod};
