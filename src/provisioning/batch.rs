//! Batch drivers: strictly sequential row loops with per-row failure
//! isolation. A row's outcome (success or recorded failure) is final
//! before the next row starts; nothing a single tenant does can abort
//! the batch.

use tracing::{error, info, Instrument};

use crate::config::ProvisioningDefaults;
use crate::reseller::types::Subscription;
use crate::reseller::{CustomerDirectory, Subscriptions, UserDirectory};
use crate::sheet::{SheetStore, SkuMap, StoreError, RESULT_COLUMNS};
use crate::telemetry;
use crate::verification::Verification;

use super::orchestrator::ProvisioningOrchestrator;
use super::tenant::{build_tenant_config, parse_seats};
use super::transition::{find_ids_by_domain, PlanTransitioner};
use super::{PlanName, TenantContext};

/// Row range selection: `None` means every data row.
pub type RowSelection = Option<(usize, usize)>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
}

fn selected(selection: RowSelection, index: usize) -> bool {
    match selection {
        Some((start, end)) => index >= start && index <= end,
        None => true,
    }
}

/// Provisioning pass: one orchestrator run per selected row, result cells
/// written back immediately so a crash mid-batch loses nothing.
pub async fn run_provisioning<C, S, U, V>(
    store: &mut SheetStore,
    sku_map: &SkuMap,
    orchestrator: &ProvisioningOrchestrator<C, S, U, V>,
    defaults: &ProvisioningDefaults,
    selection: RowSelection,
) -> Result<BatchSummary, StoreError>
where
    C: CustomerDirectory,
    S: Subscriptions,
    U: UserDirectory,
    V: Verification,
{
    store.ensure_columns(&RESULT_COLUMNS);
    store.save()?;

    let mut summary = BatchSummary::default();
    for row in store.rows() {
        if !selected(selection, row.index) {
            continue;
        }
        summary.processed += 1;

        let ctx = TenantContext::new(row.index, row.get("customerDomain"));
        let span = telemetry::tenant_span("provision", &ctx);

        let cfg = match build_tenant_config(&row, sku_map, defaults) {
            Ok(cfg) => cfg,
            Err(error) => {
                summary.failed += 1;
                error!(row = ctx.row, domain = %ctx.domain, %error, "row validation failed");
                continue;
            }
        };

        info!(row = ctx.row, domain = %ctx.domain, sku_id = %cfg.sku_id,
            plan = %cfg.plan_name, seats = cfg.seats, language = %cfg.language_code,
            "provisioning run started");

        match orchestrator.run(&ctx, &cfg).instrument(span).await {
            Ok(outcome) => {
                write_provisioning_result(
                    store,
                    ctx.row,
                    &outcome.customer_id,
                    outcome.subscription.as_ref(),
                )?;
                summary.succeeded += 1;
                info!(row = ctx.row, domain = %ctx.domain, "provisioning run complete");
            }
            Err(error) => {
                summary.failed += 1;
                error!(row = ctx.row, domain = %ctx.domain, %error, "provisioning run failed");
            }
        }
    }
    Ok(summary)
}

/// Plan-transition pass: rows targeting an annual plan are transitioned;
/// rows with no target (or TRIAL) are skipped; rows missing recorded ids
/// are backfilled by domain first.
pub async fn run_transitions<C, S>(
    store: &mut SheetStore,
    customers: &C,
    subscriptions: &S,
    selection: RowSelection,
) -> Result<BatchSummary, StoreError>
where
    C: CustomerDirectory,
    S: Subscriptions,
{
    store.ensure_columns(&RESULT_COLUMNS);
    store.save()?;

    let transitioner = PlanTransitioner::new(subscriptions);
    let mut summary = BatchSummary::default();

    for row in store.rows() {
        if !selected(selection, row.index) {
            continue;
        }
        summary.processed += 1;

        let ctx = TenantContext::new(row.index, row.get("customerDomain"));

        let target_raw = row.get("planName").to_string();
        if target_raw.is_empty() || target_raw.eq_ignore_ascii_case(PlanName::Trial.as_str()) {
            summary.skipped += 1;
            info!(row = ctx.row, domain = %ctx.domain, "not a transition target, skipping");
            continue;
        }

        let seats = match parse_seats(row.get("seats")) {
            Ok(seats) => seats,
            Err(error) => {
                summary.failed += 1;
                error!(row = ctx.row, domain = %ctx.domain, %error, "row validation failed");
                continue;
            }
        };
        let renewal_raw = {
            let raw = row.get("renewalType");
            (!raw.is_empty()).then(|| raw.to_string())
        };

        let mut customer_id = row.get("customerId").to_string();
        let mut subscription_id = row.get("subscriptionId").to_string();

        if customer_id.is_empty() || subscription_id.is_empty() {
            info!(row = ctx.row, domain = %ctx.domain, "recorded ids missing, resolving by domain");
            let sku_filter = {
                let sku = row.get("skuId");
                (!sku.is_empty()).then_some(sku)
            };
            match find_ids_by_domain(customers, subscriptions, &ctx.domain, sku_filter).await {
                Ok((found_customer, found_subscription)) => {
                    customer_id = found_customer;
                    if let Some(subscription) = &found_subscription {
                        subscription_id = subscription.subscription_id.clone();
                    }
                    write_provisioning_result(
                        store,
                        ctx.row,
                        &customer_id,
                        found_subscription.as_ref(),
                    )?;
                }
                Err(error) => {
                    summary.failed += 1;
                    error!(row = ctx.row, domain = %ctx.domain, %error,
                        "id resolution by domain failed");
                    continue;
                }
            }
        }

        if customer_id.is_empty() || subscription_id.is_empty() {
            summary.skipped += 1;
            error!(row = ctx.row, domain = %ctx.domain,
                "customerId/subscriptionId still missing, skipping");
            continue;
        }

        let span = telemetry::tenant_span("transition", &ctx);
        let result = transitioner
            .transition(
                &ctx,
                &customer_id,
                &subscription_id,
                &target_raw,
                seats,
                renewal_raw.as_deref(),
            )
            .instrument(span)
            .await;

        match result {
            Ok(refreshed) => {
                write_provisioning_result(store, ctx.row, &customer_id, Some(&refreshed))?;
                summary.succeeded += 1;
                info!(row = ctx.row, domain = %ctx.domain, "transition complete");
            }
            Err(error) => {
                summary.failed += 1;
                error!(row = ctx.row, domain = %ctx.domain, %error, "transition failed");
            }
        }
    }
    Ok(summary)
}

/// Persist the result tuple onto its row. Absent values clear the cell so
/// stale ids from earlier runs cannot linger.
fn write_provisioning_result(
    store: &mut SheetStore,
    index: usize,
    customer_id: &str,
    subscription: Option<&Subscription>,
) -> Result<(), StoreError> {
    let patch = [
        ("customerId", customer_id.to_string()),
        (
            "subscriptionId",
            subscription
                .map(|s| s.subscription_id.clone())
                .unwrap_or_default(),
        ),
        (
            "currentPlan",
            subscription
                .map(|s| s.plan_name().to_string())
                .unwrap_or_default(),
        ),
        (
            "currentStatus",
            subscription
                .and_then(|s| s.status.clone())
                .unwrap_or_default(),
        ),
        (
            "trialEndTime",
            subscription
                .and_then(|s| s.trial_end_time().map(str::to_string))
                .unwrap_or_default(),
        ),
    ];
    store.write_row(index, &patch)?;
    store.save()
}
