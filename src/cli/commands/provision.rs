use anyhow::Result;

use crate::config::SeatflowConfig;
use crate::provisioning::batch::{run_provisioning, RowSelection};
use crate::provisioning::ProvisioningOrchestrator;
use crate::reseller::{CustomerHandler, SubscriptionHandler, UserHandler};
use crate::sheet::{SheetStore, SkuMapStore};
use crate::verification::VerificationClient;

pub async fn run(config: &SeatflowConfig, selection: RowSelection) -> Result<()> {
    let client = super::reseller_client(config)?;
    let customers = CustomerHandler::new(
        client.clone(),
        config.reseller.base_url.clone(),
        config.reseller.directory_base_url.clone(),
    );
    let subscriptions =
        SubscriptionHandler::new(client.clone(), config.reseller.base_url.clone());
    let users = UserHandler::new(client, config.reseller.directory_base_url.clone());
    let verification = VerificationClient::from_config(&config.verification);

    let sku_map = SkuMapStore::load(&config.sheet.sku_map_path)?;
    let mut store = SheetStore::open(&config.sheet.workbook_path)?;

    let orchestrator = ProvisioningOrchestrator::new(
        customers,
        subscriptions,
        users,
        verification,
        config.provisioning.clone(),
    );

    let summary = run_provisioning(
        &mut store,
        &sku_map,
        &orchestrator,
        &config.provisioning,
        selection,
    )
    .await?;

    println!(
        "Provisioning pass finished: {} processed, {} succeeded, {} failed",
        summary.processed, summary.succeeded, summary.failed
    );
    Ok(())
}
