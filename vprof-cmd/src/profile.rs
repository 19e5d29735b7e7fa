//! Profile curves and sheet resolution reports.

use crate::{output::write_json, session, DataArgs};
use log::{info, warn};
use vprof_data::{ProfileOutcome, ProfileRequest};

/// Build the profile chart for a selection and write it as JSON.
///
/// A selection with no data is not an error: the JSON carries
/// `"status": "empty"` and a warning is logged.
pub fn run_profile(args: &DataArgs, request: &ProfileRequest) -> anyhow::Result<()> {
    let explorer = session::open(args)?;
    let outcome = explorer.profile(request);
    match &outcome {
        ProfileOutcome::Chart(chart) => info!("{}: {} curve(s)", chart.title, chart.curves.len()),
        ProfileOutcome::Empty { message } => warn!("{}", message),
    }
    write_json(&outcome, args.output.as_deref())
}

/// Write the resolved sheet of every period of `station`, with the sheets
/// that were discarded.
pub fn run_sheets(args: &DataArgs, station: &str) -> anyhow::Result<()> {
    let explorer = session::open(args)?;
    let groups = explorer.groups(&ProfileRequest::new(station));
    let ambiguous = groups
        .iter()
        .filter(|g| !g.discarded_sheets.is_empty())
        .count();
    info!(
        "Station {}: {} period(s), {} with several sheets",
        station,
        groups.len(),
        ambiguous
    );
    write_json(&groups, args.output.as_deref())
}
