//! Curve assembly: depth-ordered series and annotation lines per group.

use crate::resolve::Group;
use serde::Serialize;
use std::cmp::Ordering;
use vprof_core::{AnnotationKey, DayPeriod, Parameter, Sample, Schema, SheetId, WaterPeriod};

/// One (value, depth) sample of a curve. `value` is `None` for a gap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub value: Option<f64>,
    /// Depth in metres, positive downward
    pub depth: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dash {
    Dash,
    Dot,
    DashDot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineStyle {
    pub color: &'static str,
    pub dash: Dash,
}

impl LineStyle {
    pub fn for_annotation(key: &AnnotationKey) -> Self {
        match key {
            AnnotationKey::Thermocline => LineStyle {
                color: "red",
                dash: Dash::Dash,
            },
            AnnotationKey::MaxChloro => LineStyle {
                color: "green",
                dash: Dash::Dot,
            },
            AnnotationKey::Other(_) => LineStyle {
                color: "gray",
                dash: Dash::DashDot,
            },
        }
    }
}

/// Horizontal reference line at an annotation depth.
///
/// Spans the observed value range of the curve's parameter, so `start` and
/// `end` coincide when the group has a single distinct value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotationLine {
    pub key: AnnotationKey,
    pub label: String,
    pub depth: f64,
    /// (value, depth) at the minimum observed value
    pub start: (f64, f64),
    /// (value, depth) at the maximum observed value
    pub end: (f64, f64),
    pub style: LineStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Curve {
    pub label: String,
    pub water_period: WaterPeriod,
    pub day_period: DayPeriod,
    pub sheet_id: SheetId,
    /// Sorted ascending by depth
    pub points: Vec<Point>,
    pub annotations: Vec<AnnotationLine>,
}

/// Trace label, e.g. `LW AM (SheetID 1)`.
pub fn curve_label(water: WaterPeriod, day: DayPeriod, sheet_id: &SheetId) -> String {
    format!("{} {} (SheetID {})", water, day, sheet_id)
}

fn annotation_label(key: &AnnotationKey, sheet_id: &SheetId) -> String {
    format!("{} (SheetID {})", key, sheet_id)
}

/// Null depths sort after every real depth.
fn by_depth(a: &&Sample, b: &&Sample) -> Ordering {
    match (a.depth, b.depth) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Min and max of the non-null values, `None` when all are null.
fn value_range(values: impl Iterator<Item = Option<f64>>) -> Option<(f64, f64)> {
    values.flatten().fold(None, |range, v| match range {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

fn build_curve(
    group: &Group<'_>,
    schema: &Schema,
    parameter: Parameter,
    annotation_keys: &[AnnotationKey],
) -> Curve {
    let value_index = schema.measure_index(parameter.column());
    let value_of = |s: &Sample| value_index.and_then(|i| s.measure(i));

    // Stable sort keeps source order among equal depths
    let mut ordered = group.rows.clone();
    ordered.sort_by(by_depth);

    let points: Vec<Point> = ordered
        .iter()
        .filter_map(|s| {
            s.depth.map(|depth| Point {
                value: value_of(*s),
                depth,
            })
        })
        .collect();
    let skipped = ordered.len() - points.len();
    if skipped > 0 {
        log::debug!(
            "curve: {} rows without depth skipped for station {} SheetID {}",
            skipped,
            group.station_id,
            group.sheet_id
        );
    }

    let range = value_range(ordered.iter().map(|s| value_of(*s)));
    let annotations = annotation_keys
        .iter()
        .filter_map(|key| {
            let index = schema.measure_index(key.column())?;
            let depth = ordered.iter().find_map(|s| s.measure(index))?;
            let (lo, hi) = range?;
            Some(AnnotationLine {
                key: key.clone(),
                label: annotation_label(key, &group.sheet_id),
                depth,
                start: (lo, depth),
                end: (hi, depth),
                style: LineStyle::for_annotation(key),
            })
        })
        .collect();

    Curve {
        label: curve_label(group.water_period, group.day_period, &group.sheet_id),
        water_period: group.water_period,
        day_period: group.day_period,
        sheet_id: group.sheet_id.clone(),
        points,
        annotations,
    }
}

/// Build one curve per resolved group, in group order.
///
/// Annotation keys missing from the schema, or null throughout a group,
/// produce no line for that group.
pub fn build(
    groups: &[Group<'_>],
    schema: &Schema,
    parameter: Parameter,
    annotation_keys: &[AnnotationKey],
) -> Vec<Curve> {
    if !groups.is_empty() && !schema.has_column(parameter.column()) {
        log::warn!(
            "curve: parameter column {} not present, curves will be empty",
            parameter.column()
        );
    }
    groups
        .iter()
        .map(|group| build_curve(group, schema, parameter, annotation_keys))
        .collect()
}
