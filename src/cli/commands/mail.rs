use anyhow::Result;
use tracing::error;

use crate::config::SeatflowConfig;
use crate::notify::SetupNotifier;
use crate::provisioning::batch::RowSelection;
use crate::sheet::SheetStore;

pub async fn run(config: &SeatflowConfig, selection: RowSelection) -> Result<()> {
    let notifier = SetupNotifier::from_config(&config.mail)?;
    let store = SheetStore::open(&config.sheet.workbook_path)?;

    let mut sent = 0usize;
    let mut skipped = 0usize;
    let mut failed = 0usize;

    for row in store.rows() {
        let in_selection = match selection {
            Some((start, end)) => row.index >= start && row.index <= end,
            None => true,
        };
        if !in_selection {
            continue;
        }

        match notifier.send_for_row(&row).await {
            Ok(true) => sent += 1,
            Ok(false) => skipped += 1,
            Err(e) => {
                failed += 1;
                error!(row = row.index, domain = row.get("customerDomain"), error = %e,
                    "setup mail failed");
            }
        }
    }

    println!("Setup mail finished: {sent} sent, {skipped} skipped, {failed} failed");
    Ok(())
}
