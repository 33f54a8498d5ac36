use anyhow::Result;
use clap::Parser;

use seatflow::cli::{Cli, Commands};
use seatflow::config::SeatflowConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    SeatflowConfig::load_env_file()?;
    let config = SeatflowConfig::load()?;
    seatflow::telemetry::init_telemetry(&config.observability)?;

    let runtime = tokio::runtime::Runtime::new()?;
    match cli.command {
        Commands::Provision { rows } => {
            let selection = seatflow::cli::parse_row_selection(rows.as_deref())?;
            runtime.block_on(seatflow::cli::commands::provision::run(&config, selection))
        }
        Commands::Transition { rows } => {
            let selection = seatflow::cli::parse_row_selection(rows.as_deref())?;
            runtime.block_on(seatflow::cli::commands::transition::run(&config, selection))
        }
        Commands::SendMail { rows } => {
            let selection = seatflow::cli::parse_row_selection(Some(rows.as_str()))?;
            runtime.block_on(seatflow::cli::commands::mail::run(&config, selection))
        }
    }
}
