//! Sheet resolution.
//!
//! A station/period pair may carry several sampling sheets. Only one of
//! them is authoritative for a view; which one is decided by a
//! [`SheetStrategy`]. The configured [`SheetPolicy`] covers the usual
//! choices and custom strategies can be plugged in through the trait.

use serde::Serialize;
use std::collections::HashMap;
use std::{fmt, str::FromStr};
use vprof_core::{DayPeriod, Sample, SheetId, SheetPolicy, WaterPeriod};

/// A period selector: one concrete period, or all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeriodFilter<T> {
    All,
    Only(T),
}

impl<T> Default for PeriodFilter<T> {
    fn default() -> Self {
        PeriodFilter::All
    }
}

impl<T: PartialEq> PeriodFilter<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            PeriodFilter::All => true,
            PeriodFilter::Only(wanted) => wanted == value,
        }
    }
}

impl<T: fmt::Display> fmt::Display for PeriodFilter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodFilter::All => f.write_str("All"),
            PeriodFilter::Only(value) => value.fmt(f),
        }
    }
}

impl<T: FromStr> FromStr for PeriodFilter<T> {
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(PeriodFilter::All)
        } else {
            s.parse().map(PeriodFilter::Only)
        }
    }
}

/// Picks the authoritative sheet for one station/period.
pub trait SheetStrategy: Send + Sync {
    /// `rows` are the station's rows for a single (water period, day
    /// period), in source row order. Rows without a sheet id are never
    /// passed in.
    fn choose(&self, rows: &[&Sample]) -> Option<SheetId>;
}

/// Distinct sheets in first-occurrence order, with their row counts.
fn sheet_counts<'a>(rows: &[&'a Sample]) -> Vec<(&'a SheetId, usize)> {
    let mut counts: Vec<(&SheetId, usize)> = Vec::new();
    let mut index: HashMap<&SheetId, usize> = HashMap::new();
    for sheet in rows.iter().copied().filter_map(|r| r.sheet_id.as_ref()) {
        match index.get(sheet) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(sheet, counts.len());
                counts.push((sheet, 1));
            }
        }
    }
    counts
}

/// Numeric order when both ids are numbers, otherwise lexical.
fn compare_sheet_ids(a: &SheetId, b: &SheetId) -> std::cmp::Ordering {
    match (a.as_number(), b.as_number()) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        _ => a.as_str().cmp(b.as_str()),
    }
}

impl SheetStrategy for SheetPolicy {
    fn choose(&self, rows: &[&Sample]) -> Option<SheetId> {
        let counts = sheet_counts(rows);
        let chosen = match self {
            SheetPolicy::FirstRow => counts.first().map(|(sheet, _)| *sheet),
            SheetPolicy::MinSheetId => counts
                .iter()
                .map(|(sheet, _)| *sheet)
                .min_by(|a, b| compare_sheet_ids(a, b)),
            SheetPolicy::MaxSampleCount => counts
                .iter()
                .fold(None::<(&SheetId, usize)>, |best, &(sheet, n)| match best {
                    Some((_, m)) if m >= n => best,
                    _ => Some((sheet, n)),
                })
                .map(|(sheet, _)| sheet),
        };
        chosen.cloned()
    }
}

/// The rows of one station drawn as a single curve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group<'a> {
    pub station_id: String,
    pub water_period: WaterPeriod,
    pub day_period: DayPeriod,
    pub sheet_id: SheetId,
    /// Rows of the chosen sheet, in source row order
    #[serde(skip)]
    pub rows: Vec<&'a Sample>,
    /// Other sheets found for the same station/period and ignored
    pub discarded_sheets: Vec<SheetId>,
}

/// Resolve one (water period, day period) of a station to a single sheet.
///
/// `samples` are the station's rows in source row order. Returns `None`
/// when no row matches the period pair.
pub fn resolve<'a>(
    samples: &[&'a Sample],
    water: WaterPeriod,
    day: DayPeriod,
    strategy: &dyn SheetStrategy,
) -> Option<Group<'a>> {
    let matching: Vec<&'a Sample> = samples
        .iter()
        .copied()
        .filter(|s| s.is_in_period(water, day) && s.sheet_id.is_some())
        .collect();
    if matching.is_empty() {
        return None;
    }

    let sheet_id = strategy.choose(&matching)?;
    let discarded_sheets: Vec<SheetId> = sheet_counts(&matching)
        .into_iter()
        .map(|(sheet, _)| sheet)
        .filter(|sheet| **sheet != sheet_id)
        .cloned()
        .collect();
    let station_id = matching[0].station_id.clone();
    if !discarded_sheets.is_empty() {
        log::info!(
            "resolve: station {} {} {} has {} sheets, keeping SheetID {}",
            station_id,
            water,
            day,
            discarded_sheets.len() + 1,
            sheet_id
        );
    }

    let rows = matching
        .into_iter()
        .filter(|s| s.sheet_id.as_ref() == Some(&sheet_id))
        .collect();
    Some(Group {
        station_id,
        water_period: water,
        day_period: day,
        sheet_id,
        rows,
        discarded_sheets,
    })
}

/// Resolve every concrete period pair selected by the filters.
///
/// `All` expands to the fixed set {LW, RW, HW, FW} x {AM, PM}. Groups come
/// back sorted by (water period code, day period code, sheet id), so `All`
/// yields FW, HW, LW, RW with AM before PM.
pub fn resolve_all<'a>(
    samples: &[&'a Sample],
    water: PeriodFilter<WaterPeriod>,
    day: PeriodFilter<DayPeriod>,
    strategy: &dyn SheetStrategy,
) -> Vec<Group<'a>> {
    let mut groups = Vec::new();
    for wp in WaterPeriod::ALL.into_iter().filter(|wp| water.matches(wp)) {
        for dp in DayPeriod::ALL.into_iter().filter(|dp| day.matches(dp)) {
            if let Some(group) = resolve(samples, wp, dp, strategy) {
                groups.push(group);
            }
        }
    }
    groups.sort_by(|a, b| {
        (a.water_period.code(), a.day_period.code())
            .cmp(&(b.water_period.code(), b.day_period.code()))
            .then_with(|| compare_sheet_ids(&a.sheet_id, &b.sheet_id))
    });
    groups
}
