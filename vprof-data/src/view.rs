//! Selection pipeline: one user selection in, one chart (or "no data") out.

use crate::curve::{self, Curve};
use crate::resolve::{self, Group, PeriodFilter, SheetStrategy};
use crate::stations::{self, Station, StationLayers};
use serde::Serialize;
use std::sync::Arc;
use vprof_core::{
    AnnotationKey, AppConfig, Dataset, DayPeriod, Parameter, PositionPolicy, WaterPeriod,
};

pub const NO_DATA_MESSAGE: &str = "No data for this Water Period / Day Period combination.";
pub const DEPTH_AXIS_TITLE: &str = "Depth (m)";

/// What the user picked in the selectors.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileRequest {
    pub station_id: String,
    pub parameter: Parameter,
    pub water: PeriodFilter<WaterPeriod>,
    pub day: PeriodFilter<DayPeriod>,
    pub annotations: Vec<AnnotationKey>,
}

impl ProfileRequest {
    /// All periods, temperature, no annotations.
    pub fn new(station_id: impl Into<String>) -> Self {
        Self {
            station_id: station_id.into(),
            parameter: Parameter::default(),
            water: PeriodFilter::All,
            day: PeriodFilter::All,
            annotations: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub title: String,
    /// Values grow downward (depth axes)
    pub reversed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileChart {
    pub title: String,
    pub station_id: String,
    pub parameter: Parameter,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub curves: Vec<Curve>,
}

/// Result of a selection. `Empty` is the normal "no data" outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProfileOutcome {
    Chart(ProfileChart),
    Empty { message: String },
}

impl ProfileOutcome {
    pub fn is_empty(&self) -> bool {
        matches!(self, ProfileOutcome::Empty { .. })
    }

    pub fn curves(&self) -> &[Curve] {
        match self {
            ProfileOutcome::Chart(chart) => &chart.curves,
            ProfileOutcome::Empty { .. } => &[],
        }
    }
}

/// Read-only view over a loaded dataset with the configured policies.
///
/// Cheap to clone; the dataset is shared.
#[derive(Clone)]
pub struct Explorer {
    dataset: Arc<Dataset>,
    position_policy: PositionPolicy,
    sheet_strategy: Arc<dyn SheetStrategy>,
}

impl Explorer {
    pub fn new(dataset: Arc<Dataset>, config: &AppConfig) -> Self {
        Self::with_strategy(dataset, config.position_policy, Arc::new(config.sheet_policy))
    }

    pub fn with_strategy(
        dataset: Arc<Dataset>,
        position_policy: PositionPolicy,
        sheet_strategy: Arc<dyn SheetStrategy>,
    ) -> Self {
        Self {
            dataset,
            position_policy,
            sheet_strategy,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn stations(&self) -> Vec<Station> {
        stations::aggregate(&self.dataset, self.position_policy)
    }

    pub fn station_ids(&self) -> Vec<String> {
        stations::station_ids(&self.dataset)
    }

    pub fn station_layers(&self, selected: Option<&str>) -> StationLayers {
        StationLayers::split(&self.stations(), selected)
    }

    /// Resolved groups for a selection, sorted by period codes.
    pub fn groups(&self, request: &ProfileRequest) -> Vec<Group<'_>> {
        let samples = self.dataset.station_samples(&request.station_id);
        resolve::resolve_all(
            &samples,
            request.water,
            request.day,
            self.sheet_strategy.as_ref(),
        )
    }

    pub fn profile(&self, request: &ProfileRequest) -> ProfileOutcome {
        let groups = self.groups(request);
        let mut curves = curve::build(
            &groups,
            self.dataset.schema(),
            request.parameter,
            &request.annotations,
        );
        // Sheets whose rows all lack a depth have nothing to draw
        curves.retain(|c| {
            if c.points.is_empty() {
                log::debug!("view: dropping {} without depth values", c.label);
            }
            !c.points.is_empty()
        });
        if curves.is_empty() {
            log::info!(
                "view: no data for station {} water {} day {}",
                request.station_id,
                request.water,
                request.day
            );
            return ProfileOutcome::Empty {
                message: NO_DATA_MESSAGE.to_string(),
            };
        }

        ProfileOutcome::Chart(ProfileChart {
            title: format!("{} | Parameter: {}", request.station_id, request.parameter),
            station_id: request.station_id.clone(),
            parameter: request.parameter,
            x_axis: Axis {
                title: request.parameter.column().to_string(),
                reversed: false,
            },
            y_axis: Axis {
                title: DEPTH_AXIS_TITLE.to_string(),
                reversed: true,
            },
            curves,
        })
    }
}
