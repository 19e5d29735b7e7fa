//! vprof - explore vertical profile measurements by station and period.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "vprof",
    version,
    about = "Vertical profile explorer: station maps and depth-profile curves as JSON"
)]
struct Cli {
    #[command(subcommand)]
    command: vprof_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("vprof {}", env!("CARGO_PKG_VERSION"));
    vprof_cmd::run(cli.command)
}
