//! Dataset loader for delimited spreadsheet exports.
//!
//! The source is the spreadsheet exported as delimited text (CSV by
//! default). Paths ending in `.gz` are decompressed on the fly.
//!
//! # Required columns
//!
//! `Latitude`, `Longitude`, the station column (default `StationNewName`),
//! `WaterPeriod`, `DayPeriod`, `SheetID`, `Profondeur`.
//!
//! `FullCycle` is optional. Every other column is kept as a nullable
//! numeric measure.
//!
//! # Example CSV
//! ```text
//! StationNewName,Latitude,Longitude,WaterPeriod,DayPeriod,SheetID,Profondeur,Temp,Thermocline,FullCycle
//! A12,48.39,-4.49,LW,AM,1,0.5,12.3,5.2,1
//! ```

use crate::config::{DEFAULT_EXCLUDED_STATIONS, DEFAULT_STATION_COLUMN};
use crate::dataset::{Dataset, Schema};
use crate::error::DataLoadError;
use crate::sample::{Sample, SheetId};
use csv::{ReaderBuilder, StringRecord, Trim};
use flate2::read::GzDecoder;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use vprof_utils::{cells, ids};

pub const LATITUDE: &str = "Latitude";
pub const LONGITUDE: &str = "Longitude";
pub const WATER_PERIOD: &str = "WaterPeriod";
pub const DAY_PERIOD: &str = "DayPeriod";
pub const SHEET_ID: &str = "SheetID";
pub const DEPTH: &str = "Profondeur";
pub const FULL_CYCLE: &str = "FullCycle";

/// Settings for one load.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOptions {
    /// Header of the station identifier column
    pub station_column: String,
    pub delimiter: u8,
    pub excluded_stations: Vec<String>,
}

impl LoadOptions {
    /// Whether a station is on the deny-list.
    ///
    /// `raw` is the trimmed cell text and `id` its canonical form. An entry
    /// matches either exactly or once both sides are canonicalized.
    pub fn is_excluded(&self, raw: &str, id: &str) -> bool {
        self.excluded_stations.iter().any(|entry| {
            let entry = entry.trim();
            entry == raw || ids::canonical_id(entry).is_some_and(|c| c == id)
        })
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            station_column: DEFAULT_STATION_COLUMN.to_string(),
            delimiter: b',',
            excluded_stations: DEFAULT_EXCLUDED_STATIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Column positions resolved from the header row.
struct Columns {
    latitude: usize,
    longitude: usize,
    station: usize,
    water_period: usize,
    day_period: usize,
    sheet_id: usize,
    depth: usize,
    full_cycle: Option<usize>,
    /// (position in record, measure name)
    measures: Vec<(usize, String)>,
}

impl Columns {
    fn resolve(headers: &StringRecord, station_column: &str) -> Result<Columns, DataLoadError> {
        // First occurrence wins for duplicated headers
        let mut positions: HashMap<&str, usize> = HashMap::new();
        for (i, name) in headers.iter().enumerate() {
            positions.entry(name.trim()).or_insert(i);
        }

        let required = [
            LATITUDE,
            LONGITUDE,
            station_column,
            WATER_PERIOD,
            DAY_PERIOD,
            SHEET_ID,
            DEPTH,
        ];
        let missing: Vec<String> = required
            .iter()
            .filter(|name| !positions.contains_key(*name))
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(DataLoadError::MissingColumns(missing));
        }

        let measures = headers
            .iter()
            .enumerate()
            .map(|(i, name)| (i, name.trim()))
            .filter(|(i, name)| {
                !name.is_empty()
                    && positions.get(name) == Some(i)
                    && !required.contains(name)
                    && *name != FULL_CYCLE
            })
            .map(|(i, name)| (i, name.to_string()))
            .collect();

        Ok(Columns {
            latitude: positions[LATITUDE],
            longitude: positions[LONGITUDE],
            station: positions[station_column],
            water_period: positions[WATER_PERIOD],
            day_period: positions[DAY_PERIOD],
            sheet_id: positions[SHEET_ID],
            depth: positions[DEPTH],
            full_cycle: positions.get(FULL_CYCLE).copied(),
            measures,
        })
    }
}

/// Load a dataset from a file path.
pub fn load(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Dataset, DataLoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("loader: Reading profiles from {}", path.display());
    let is_gzip = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"));
    if is_gzip {
        load_reader(GzDecoder::new(BufReader::new(file)), options)
    } else {
        load_reader(BufReader::new(file), options)
    }
}

/// Load a dataset from CSV text already in memory.
pub fn load_str(csv_data: &str, options: &LoadOptions) -> Result<Dataset, DataLoadError> {
    load_reader(csv_data.as_bytes(), options)
}

/// Load a dataset from any reader of delimited text.
///
/// Rows lacking a latitude, longitude or station id are dropped, as are
/// rows whose station id is on the deny-list.
pub fn load_reader<R: Read>(reader: R, options: &LoadOptions) -> Result<Dataset, DataLoadError> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let columns = Columns::resolve(&headers, &options.station_column)?;

    let mut samples = Vec::new();
    let mut dropped_missing = 0u32;
    let mut dropped_excluded = 0u32;
    for (row, result) in rdr.records().enumerate() {
        let r = result?;
        let cell = |i: usize| r.get(i).unwrap_or("");

        let latitude = cells::parse_f64(cell(columns.latitude));
        let longitude = cells::parse_f64(cell(columns.longitude));
        let raw_station = cell(columns.station).trim();
        let station_id = ids::canonical_id(raw_station);
        let (latitude, longitude, station_id) = match (latitude, longitude, station_id) {
            (Some(lat), Some(lon), Some(id)) => (lat, lon, id),
            _ => {
                dropped_missing += 1;
                continue;
            }
        };

        if options.is_excluded(raw_station, &station_id) {
            dropped_excluded += 1;
            continue;
        }

        samples.push(Sample {
            row,
            station_id,
            latitude,
            longitude,
            water_period: cell(columns.water_period).parse().ok(),
            day_period: cell(columns.day_period).parse().ok(),
            sheet_id: SheetId::parse(cell(columns.sheet_id)),
            depth: cells::parse_f64(cell(columns.depth)),
            full_cycle: columns
                .full_cycle
                .and_then(|i| cells::parse_flag(cell(i))),
            measures: columns
                .measures
                .iter()
                .map(|(i, _)| cells::parse_f64(cell(*i)))
                .collect(),
        });
    }

    log::info!(
        "loader: Loaded {} samples, dropped {} missing position/station, {} excluded",
        samples.len(),
        dropped_missing,
        dropped_excluded
    );

    let schema = Schema::new(columns.measures.into_iter().map(|(_, name)| name).collect());
    Ok(Dataset::new(schema, samples))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::{DayPeriod, WaterPeriod};
    use flate2::{write::GzEncoder, Compression};
    use std::io::Write;

    const HEADER: &str =
        "StationNewName,Latitude,Longitude,WaterPeriod,DayPeriod,SheetID,Profondeur,Temp,Thermocline,FullCycle";

    fn csv(rows: &[&str]) -> String {
        let mut out = String::from(HEADER);
        for row in rows {
            out.push('\n');
            out.push_str(row);
        }
        out.push('\n');
        out
    }

    #[test]
    fn load_parses_rows() {
        let data = csv(&["A12,48.39,-4.49,LW,AM,1,0.5,12.3,5.2,1"]);
        let dataset = load_str(&data, &LoadOptions::default()).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.schema().measures(), ["Temp", "Thermocline"]);

        let sample = &dataset.samples()[0];
        assert_eq!(sample.station_id, "A12");
        assert_eq!(sample.water_period, Some(WaterPeriod::LowWater));
        assert_eq!(sample.day_period, Some(DayPeriod::Am));
        assert_eq!(sample.sheet_id, SheetId::parse("1"));
        assert_eq!(sample.depth, Some(0.5));
        assert_eq!(sample.full_cycle, Some(true));
        let temp = dataset.schema().measure_index("Temp").unwrap();
        assert_eq!(sample.measure(temp), Some(12.3));
    }

    #[test]
    fn load_drops_exactly_rows_missing_latitude() {
        let data = csv(&[
            "A12,48.39,-4.49,LW,AM,1,0.5,12.3,,0",
            "A12,,-4.49,LW,AM,1,1.0,12.1,,0",
            "B01,48.40,-4.50,HW,PM,2,0.5,11.0,,0",
            "B01,NaN,-4.50,HW,PM,2,1.0,10.9,,0",
            "C07,48.41,-4.51,FW,AM,3,0.5,,,",
        ]);
        let dataset = load_str(&data, &LoadOptions::default()).unwrap();
        let rows: Vec<usize> = dataset.samples().iter().map(|s| s.row).collect();
        assert_eq!(rows, vec![0, 2, 4]);
    }

    #[test]
    fn load_drops_rows_missing_station_or_longitude() {
        let data = csv(&[
            ",48.39,-4.49,LW,AM,1,0.5,12.3,,0",
            "A12,48.39,,LW,AM,1,1.0,12.1,,0",
            "A12,48.39,-4.49,LW,AM,1,1.5,12.0,,0",
        ]);
        let dataset = load_str(&data, &LoadOptions::default()).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.samples()[0].row, 2);
    }

    #[test]
    fn load_canonicalizes_numeric_station_ids() {
        let data = csv(&[
            "3.50,48.39,-4.49,LW,AM,1,0.5,12.3,,0",
            "12.0,48.39,-4.49,LW,AM,1.0,0.5,12.3,,0",
        ]);
        let dataset = load_str(&data, &LoadOptions::default()).unwrap();
        assert_eq!(dataset.samples()[0].station_id, "3.5");
        assert_eq!(dataset.samples()[1].station_id, "12");
        assert_eq!(dataset.samples()[1].sheet_id, SheetId::parse("1"));
    }

    #[test]
    fn load_applies_deny_list() {
        let data = csv(&[
            "2.75,48.39,-4.49,LW,AM,1,0.5,12.3,,0",
            "21.250,48.39,-4.49,LW,AM,1,0.5,12.3,,0",
            "2.7,48.39,-4.49,LW,AM,1,0.5,12.3,,0",
        ]);
        let dataset = load_str(&data, &LoadOptions::default()).unwrap();
        let ids: Vec<&str> = dataset.samples().iter().map(|s| s.station_id.as_str()).collect();
        assert_eq!(ids, vec!["2.7"]);
    }

    #[test]
    fn load_deny_list_matches_raw_station_text() {
        let data = csv(&[
            "007,48.39,-4.49,LW,AM,1,0.5,12.3,,0",
            "21.250,48.39,-4.49,LW,AM,1,0.5,12.3,,0",
            "7,48.39,-4.49,LW,AM,1,0.5,12.3,,0",
            "21.25,48.39,-4.49,LW,AM,1,0.5,12.3,,0",
            "B01,48.39,-4.49,LW,AM,1,0.5,12.3,,0",
        ]);
        let options = LoadOptions {
            excluded_stations: vec!["007".to_string(), "21.250".to_string()],
            ..LoadOptions::default()
        };
        let dataset = load_str(&data, &options).unwrap();
        let ids: Vec<&str> = dataset.samples().iter().map(|s| s.station_id.as_str()).collect();
        assert_eq!(ids, vec!["7", "B01"]);
    }

    #[test]
    fn load_keeps_leading_zero_station_ids_distinct() {
        let data = csv(&[
            "01,48.39,-4.49,LW,AM,1,0.5,12.3,,0",
            "1,48.40,-4.50,LW,AM,1,0.5,12.3,,0",
            "1.0,48.40,-4.50,LW,AM,1,1.0,12.1,,0",
        ]);
        let options = LoadOptions {
            excluded_stations: Vec::new(),
            ..LoadOptions::default()
        };
        let dataset = load_str(&data, &options).unwrap();
        let ids: Vec<&str> = dataset.samples().iter().map(|s| s.station_id.as_str()).collect();
        assert_eq!(ids, vec!["01", "1", "1"]);
    }

    #[test]
    fn load_reports_every_missing_column() {
        let data = "StationNewName,Latitude,Longitude,WaterPeriod,Temp\nA12,48.39,-4.49,LW,12.3\n";
        match load_str(data, &LoadOptions::default()) {
            Err(DataLoadError::MissingColumns(missing)) => {
                assert_eq!(missing, vec!["DayPeriod", "SheetID", "Profondeur"]);
            }
            other => panic!("expected MissingColumns, got {:?}", other),
        }
    }

    #[test]
    fn load_uses_configured_station_column_and_delimiter() {
        let data = "Station;Latitude;Longitude;WaterPeriod;DayPeriod;SheetID;Profondeur;pH\n\
                    A12;48.39;-4.49;RW;PM;4;2.0;8.1\n";
        let options = LoadOptions {
            station_column: "Station".to_string(),
            delimiter: b';',
            excluded_stations: Vec::new(),
        };
        let dataset = load_str(data, &options).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.samples()[0].full_cycle, None);
        assert!(dataset.schema().has_column("pH"));
    }

    #[test]
    fn load_keeps_unknown_period_codes_as_none() {
        let data = csv(&["A12,48.39,-4.49,XX,noon,1,0.5,12.3,,0"]);
        let dataset = load_str(&data, &LoadOptions::default()).unwrap();
        assert_eq!(dataset.samples()[0].water_period, None);
        assert_eq!(dataset.samples()[0].day_period, None);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let result = load("/nonexistent/profiles.csv", &LoadOptions::default());
        assert!(matches!(result, Err(DataLoadError::Io { .. })));
    }

    #[test]
    fn load_gzip_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profiles.csv.gz");
        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        encoder
            .write_all(csv(&["A12,48.39,-4.49,LW,AM,1,0.5,12.3,5.2,1"]).as_bytes())
            .unwrap();
        encoder.finish().unwrap();

        let dataset = load(&path, &LoadOptions::default()).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.samples()[0].station_id, "A12");
    }
}
