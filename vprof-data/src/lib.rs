//! Selection and curve assembly for vertical profile data.
//!
//! This crate turns a loaded [`Dataset`](vprof_core::Dataset) into the
//! views the presentation layer draws:
//!
//! - [`stations`]: one map record per station, split into map layers
//! - [`resolve`]: one authoritative sheet per station/period
//! - [`curve`]: depth-sorted series and annotation lines per sheet
//! - [`view`]: the request/response pipeline tying them together
//!
//! Everything here is a pure, synchronous computation over the in-memory
//! table.

pub mod curve;
pub mod resolve;
pub mod stations;
pub mod view;

pub use curve::{AnnotationLine, Curve, Point};
pub use resolve::{Group, PeriodFilter, SheetStrategy};
pub use stations::{Station, StationLayers};
pub use view::{Explorer, ProfileChart, ProfileOutcome, ProfileRequest};
