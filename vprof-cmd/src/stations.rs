//! Station listing for the map.

use crate::{output::write_json, session, DataArgs};
use log::info;

/// Print the station map layers, optionally highlighting `selected`.
pub fn run_stations(args: &DataArgs, selected: Option<&str>) -> anyhow::Result<()> {
    let explorer = session::open(args)?;
    let layers = explorer.station_layers(selected);
    info!(
        "{} full-cycle and {} other stations",
        layers.full_cycle.stations.len(),
        layers.normal.stations.len()
    );
    if let (Some(id), None) = (selected, &layers.selected) {
        log::warn!("Selected station {} not found", id);
    }
    write_json(&layers, args.output.as_deref())
}
