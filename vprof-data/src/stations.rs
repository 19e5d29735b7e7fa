use serde::Serialize;
use std::collections::HashMap;
use vprof_core::{Dataset, PositionPolicy};

/// A sampling station as shown on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Station {
    pub station_id: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Sampled across a complete tidal cycle
    pub full_cycle: bool,
}

#[derive(Default)]
struct Accumulator {
    first: (f64, f64),
    sum: (f64, f64),
    count: usize,
    any_full_cycle: bool,
    any_partial: bool,
}

/// Derive one [`Station`] per distinct station id, in first-seen order.
///
/// The full-cycle flag is true when any row of the station says so, and
/// false when every row is false or null.
pub fn aggregate(dataset: &Dataset, policy: PositionPolicy) -> Vec<Station> {
    let mut order: Vec<&str> = Vec::new();
    let mut acc: HashMap<&str, Accumulator> = HashMap::new();

    for sample in dataset.samples() {
        let entry = acc.entry(sample.station_id.as_str()).or_insert_with(|| {
            order.push(sample.station_id.as_str());
            Accumulator {
                first: (sample.latitude, sample.longitude),
                ..Default::default()
            }
        });
        entry.sum.0 += sample.latitude;
        entry.sum.1 += sample.longitude;
        entry.count += 1;
        match sample.full_cycle {
            Some(true) => entry.any_full_cycle = true,
            Some(false) => entry.any_partial = true,
            None => {}
        }
    }

    let stations: Vec<Station> = order
        .into_iter()
        .map(|id| {
            let a = &acc[id];
            if a.any_full_cycle && a.any_partial {
                log::warn!("stations: inconsistent FullCycle values for station {}", id);
            }
            let (latitude, longitude) = match policy {
                PositionPolicy::FirstSeen => a.first,
                PositionPolicy::Mean => (a.sum.0 / a.count as f64, a.sum.1 / a.count as f64),
            };
            Station {
                station_id: id.to_string(),
                latitude,
                longitude,
                full_cycle: a.any_full_cycle,
            }
        })
        .collect();
    log::debug!("stations: aggregated {} stations", stations.len());
    stations
}

/// Distinct station ids in first-seen order, for selection lists.
pub fn station_ids(dataset: &Dataset) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    dataset
        .samples()
        .iter()
        .filter(|s| seen.insert(s.station_id.as_str()))
        .map(|s| s.station_id.clone())
        .collect()
}

/// How a layer's markers are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MarkerStyle {
    /// Marker radius in metres
    pub radius: u32,
    /// RGBA fill
    pub fill: [u8; 4],
    pub pickable: bool,
}

pub const NORMAL_MARKER: MarkerStyle = MarkerStyle {
    radius: 1000,
    fill: [0, 0, 200, 160],
    pickable: true,
};

pub const FULL_CYCLE_MARKER: MarkerStyle = MarkerStyle {
    radius: 1000,
    fill: [0, 255, 0, 160],
    pickable: true,
};

pub const SELECTED_MARKER: MarkerStyle = MarkerStyle {
    radius: 1500,
    fill: [255, 0, 0, 200],
    pickable: false,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapLayer {
    pub style: MarkerStyle,
    pub stations: Vec<Station>,
}

/// Stations split into the map layers: normal, full-cycle and the
/// highlighted selection drawn on top.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationLayers {
    pub normal: MapLayer,
    pub full_cycle: MapLayer,
    /// `None` when nothing is selected or the id is unknown
    pub selected: Option<MapLayer>,
}

impl StationLayers {
    pub fn split(stations: &[Station], selected: Option<&str>) -> Self {
        let (full_cycle, normal): (Vec<Station>, Vec<Station>) =
            stations.iter().cloned().partition(|s| s.full_cycle);
        let selected = selected
            .and_then(|id| stations.iter().find(|s| s.station_id == id))
            .map(|s| MapLayer {
                style: SELECTED_MARKER,
                stations: vec![s.clone()],
            });
        Self {
            normal: MapLayer {
                style: NORMAL_MARKER,
                stations: normal,
            },
            full_cycle: MapLayer {
                style: FULL_CYCLE_MARKER,
                stations: full_cycle,
            },
            selected,
        }
    }
}
