//! Moving an existing subscription onto a committed annual plan.

use tracing::info;

use crate::reseller::types::{ChangePlanRequest, RenewalSettings, Seats, Subscription};
use crate::reseller::{ApiError, CustomerDirectory, Subscriptions};

use super::{PlanName, ProvisionError, TenantContext};

const DEFAULT_RENEWAL_TYPE: &str = "AUTO_RENEW";

/// Sequences the three plan-transition sub-operations against one
/// subscription. Every failure past validation is fatal for the tenant.
pub struct PlanTransitioner<'a, S: Subscriptions + ?Sized> {
    subscriptions: &'a S,
}

impl<'a, S: Subscriptions + ?Sized> PlanTransitioner<'a, S> {
    pub fn new(subscriptions: &'a S) -> Self {
        Self { subscriptions }
    }

    /// Assign a committed annual plan. Rejects every non-ANNUAL_* target
    /// (including TRIAL and FLEXIBLE) before any network call. The request
    /// carries only the plan name and seat commitment; renewal settings
    /// travel separately because the API forbids mixing the two shapes.
    pub async fn set_plan(
        &self,
        ctx: &TenantContext,
        customer_id: &str,
        subscription_id: &str,
        target_raw: &str,
        seats: u32,
    ) -> Result<(), ProvisionError> {
        let target = PlanName::normalize(target_raw)?;
        if !target.is_annual_commitment() {
            return Err(ProvisionError::TransitionNotAllowed {
                raw: target_raw.trim().to_string(),
                normalized: target.as_str().to_string(),
            });
        }
        if seats < 1 {
            return Err(ProvisionError::InvalidSeats(seats.to_string()));
        }

        let request = ChangePlanRequest {
            plan_name: target.as_str().to_string(),
            seats: Seats::committed(seats),
        };
        self.subscriptions
            .change_plan(customer_id, subscription_id, &request)
            .await?;
        info!(row = ctx.row, domain = %ctx.domain, subscription_id,
            target = %target, seats, "plan changed");
        Ok(())
    }

    /// Convert a trial out of its trial window immediately. Only called
    /// when the pre-transition plan was TRIAL.
    pub async fn start_paid_service(
        &self,
        ctx: &TenantContext,
        customer_id: &str,
        subscription_id: &str,
    ) -> Result<(), ProvisionError> {
        self.subscriptions
            .start_paid_service(customer_id, subscription_id)
            .await?;
        info!(row = ctx.row, domain = %ctx.domain, subscription_id, "paid service started");
        Ok(())
    }

    /// Apply the renewal policy, defaulting to AUTO_RENEW.
    pub async fn set_renewal_type(
        &self,
        ctx: &TenantContext,
        customer_id: &str,
        subscription_id: &str,
        renewal_raw: Option<&str>,
    ) -> Result<(), ProvisionError> {
        let renewal_type = renewal_raw
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(DEFAULT_RENEWAL_TYPE)
            .to_uppercase();
        let request = RenewalSettings {
            renewal_type: renewal_type.clone(),
        };
        self.subscriptions
            .change_renewal_settings(customer_id, subscription_id, &request)
            .await?;
        info!(row = ctx.row, domain = %ctx.domain, subscription_id,
            renewal_type = %renewal_type, "renewal settings applied");
        Ok(())
    }

    /// Full transition: read the current plan, assign the annual plan,
    /// start paid service when the subscription was still a trial, always
    /// apply the renewal policy, then re-read for the caller to persist.
    pub async fn transition(
        &self,
        ctx: &TenantContext,
        customer_id: &str,
        subscription_id: &str,
        target_raw: &str,
        seats: u32,
        renewal_raw: Option<&str>,
    ) -> Result<Subscription, ProvisionError> {
        let before = self.subscriptions.get(customer_id, subscription_id).await?;
        let was_trial = before.plan_name().eq_ignore_ascii_case(PlanName::Trial.as_str());

        self.set_plan(ctx, customer_id, subscription_id, target_raw, seats)
            .await?;
        if was_trial {
            self.start_paid_service(ctx, customer_id, subscription_id)
                .await?;
        }
        self.set_renewal_type(ctx, customer_id, subscription_id, renewal_raw)
            .await?;

        Ok(self.subscriptions.get(customer_id, subscription_id).await?)
    }
}

/// Recover (customer_id, subscription) for a domain whose row lost its
/// recorded ids. The customer must exist; among its subscriptions a SKU
/// match wins, otherwise the first listed one is canonical.
pub async fn find_ids_by_domain<C, S>(
    customers: &C,
    subscriptions: &S,
    domain: &str,
    sku_id: Option<&str>,
) -> Result<(String, Option<Subscription>), ApiError>
where
    C: CustomerDirectory + ?Sized,
    S: Subscriptions + ?Sized,
{
    let customer = customers.get(domain).await?;
    let mut listed = subscriptions.list(&customer.customer_id).await?;

    let chosen = if listed.is_empty() {
        None
    } else {
        let pick = sku_id
            .and_then(|sku| listed.iter().position(|s| s.sku_id == sku))
            .unwrap_or(0);
        Some(listed.remove(pick))
    };

    Ok((customer.customer_id, chosen))
}
