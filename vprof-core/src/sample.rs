use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Tidal phase at sampling time.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WaterPeriod {
    #[serde(rename = "LW")]
    LowWater,
    #[serde(rename = "RW")]
    RisingWater,
    #[serde(rename = "HW")]
    HighWater,
    #[serde(rename = "FW")]
    FallingWater,
}

impl WaterPeriod {
    /// Every water period, in campaign order.
    pub const ALL: [WaterPeriod; 4] = [
        WaterPeriod::LowWater,
        WaterPeriod::RisingWater,
        WaterPeriod::HighWater,
        WaterPeriod::FallingWater,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            WaterPeriod::LowWater => "LW",
            WaterPeriod::RisingWater => "RW",
            WaterPeriod::HighWater => "HW",
            WaterPeriod::FallingWater => "FW",
        }
    }
}

impl fmt::Display for WaterPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for WaterPeriod {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "LW" => Ok(WaterPeriod::LowWater),
            "RW" => Ok(WaterPeriod::RisingWater),
            "HW" => Ok(WaterPeriod::HighWater),
            "FW" => Ok(WaterPeriod::FallingWater),
            _ => Err(ParseError::UnknownWaterPeriod(s.to_string())),
        }
    }
}

/// Morning or afternoon sampling session.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DayPeriod {
    Am,
    Pm,
}

impl DayPeriod {
    pub const ALL: [DayPeriod; 2] = [DayPeriod::Am, DayPeriod::Pm];

    pub fn code(&self) -> &'static str {
        match self {
            DayPeriod::Am => "AM",
            DayPeriod::Pm => "PM",
        }
    }
}

impl fmt::Display for DayPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for DayPeriod {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "AM" => Ok(DayPeriod::Am),
            "PM" => Ok(DayPeriod::Pm),
            _ => Err(ParseError::UnknownDayPeriod(s.to_string())),
        }
    }
}

/// Identifier of one sampling run (a "sheet") within a station/period.
///
/// Stored in canonical form, so `1` and `1.0` name the same sheet.
#[derive(Debug, PartialEq, Eq, Clone, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SheetId(String);

impl SheetId {
    /// Build a sheet id from a raw cell; `None` for null cells.
    pub fn parse(cell: &str) -> Option<SheetId> {
        vprof_utils::ids::canonical_id(cell).map(SheetId)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value of the id, when it is numeric.
    pub fn as_number(&self) -> Option<f64> {
        self.0.parse::<f64>().ok()
    }
}

impl fmt::Display for SheetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SheetId {
    fn from(value: &str) -> Self {
        SheetId::parse(value).unwrap_or_else(|| SheetId(value.to_string()))
    }
}

/// One measurement row of the profile dataset.
///
/// Measure values are stored positionally; use the dataset
/// [`Schema`](crate::dataset::Schema) to map a column name to its index.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Position of the row among the data rows of the source (0-based)
    pub row: usize,
    pub station_id: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// `None` when the cell holds an unrecognised code
    pub water_period: Option<WaterPeriod>,
    pub day_period: Option<DayPeriod>,
    pub sheet_id: Option<SheetId>,
    /// Depth in metres, positive downward
    pub depth: Option<f64>,
    pub full_cycle: Option<bool>,
    pub measures: Vec<Option<f64>>,
}

impl Sample {
    /// Value of the measure column at `index`, `None` when null.
    pub fn measure(&self, index: usize) -> Option<f64> {
        self.measures.get(index).copied().flatten()
    }

    /// Whether this sample was taken during the given campaign.
    pub fn is_in_period(&self, water: WaterPeriod, day: DayPeriod) -> bool {
        self.water_period == Some(water) && self.day_period == Some(day)
    }
}
