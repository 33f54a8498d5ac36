use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

pub mod commands;

use crate::provisioning::batch::RowSelection;

#[derive(Parser)]
#[command(name = "seatflow")]
#[command(about = "Reseller tenant provisioning driven by a workbook")]
#[command(
    long_about = "Seatflow provisions workspace tenants from workbook rows: it ensures \
                  customers exist, creates trial/flexible subscriptions idempotently, and \
                  later commits them to annual plans. Results are written back to each row."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the provisioning pass (customer, subscription, admin user) over workbook rows
    Provision {
        /// Row or inclusive row range to process, e.g. "3" or "2-5" (default: all rows)
        #[arg(long, help = "Restrict the pass to a row or inclusive row range, e.g. 3 or 2-5")]
        rows: Option<String>,
    },
    /// Run the plan-transition pass, committing rows to their annual target plans
    Transition {
        /// Row or inclusive row range to process (default: all rows)
        #[arg(long, help = "Restrict the pass to a row or inclusive row range, e.g. 3 or 2-5")]
        rows: Option<String>,
    },
    /// Send the setup mail for the selected rows
    SendMail {
        /// Row or inclusive row range to mail, e.g. "3" or "2-5"
        #[arg(long, help = "Row or inclusive row range to mail, e.g. 3 or 2-5")]
        rows: String,
    },
}

/// Parse a 1-based row selection: a single row ("3") or an inclusive
/// range ("2-5"). Row 1 is the header and never matches a data row.
pub fn parse_row_selection(raw: Option<&str>) -> Result<RowSelection> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    let parse_index = |part: &str| -> Result<usize> {
        match part.trim().parse::<usize>() {
            Ok(n) if n >= 1 => Ok(n),
            _ => bail!("invalid row number '{part}' in selection '{raw}'"),
        }
    };

    match raw.split_once('-') {
        Some((start, end)) => {
            let start = parse_index(start)?;
            let end = parse_index(end)?;
            if start > end {
                bail!("row range '{raw}' is reversed");
            }
            Ok(Some((start, end)))
        }
        None => {
            let row = parse_index(raw)?;
            Ok(Some((row, row)))
        }
    }
}
