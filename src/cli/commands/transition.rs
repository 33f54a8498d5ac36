use anyhow::Result;

use crate::config::SeatflowConfig;
use crate::provisioning::batch::{run_transitions, RowSelection};
use crate::reseller::{CustomerHandler, SubscriptionHandler};
use crate::sheet::SheetStore;

pub async fn run(config: &SeatflowConfig, selection: RowSelection) -> Result<()> {
    let client = super::reseller_client(config)?;
    let customers = CustomerHandler::new(
        client.clone(),
        config.reseller.base_url.clone(),
        config.reseller.directory_base_url.clone(),
    );
    let subscriptions = SubscriptionHandler::new(client, config.reseller.base_url.clone());

    let mut store = SheetStore::open(&config.sheet.workbook_path)?;

    let summary = run_transitions(&mut store, &customers, &subscriptions, selection).await?;

    println!(
        "Transition pass finished: {} processed, {} succeeded, {} skipped, {} failed",
        summary.processed, summary.succeeded, summary.skipped, summary.failed
    );
    Ok(())
}
