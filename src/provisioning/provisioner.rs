//! Subscription creation under the tiered fallback policy.

use tracing::{info, warn};

use crate::reseller::types::{CreateSubscriptionRequest, PlanInfo, Seats, Subscription};
use crate::reseller::{ApiError, Subscriptions};

use super::{PlanName, ProvisionError, TenantConfig, TenantContext};

/// Create a subscription for the customer, or recover the existing one.
///
/// Order matters: a TRIAL entitlement with an explicit seat cap is
/// preferred; SKUs or tenants without trial support fall back to FLEXIBLE,
/// which must not carry a seats field at all. A Conflict on either tier
/// means the tenant already holds a subscription, so the first listed one
/// is reused instead of erroring. Returns `None` only when the API
/// reports a conflict but lists nothing.
pub async fn create_if_absent<S: Subscriptions + ?Sized>(
    subscriptions: &S,
    ctx: &TenantContext,
    customer_id: &str,
    cfg: &TenantConfig,
) -> Result<Option<Subscription>, ProvisionError> {
    if cfg.seats < 1 {
        return Err(ProvisionError::InvalidSeats(cfg.seats.to_string()));
    }

    let trial = CreateSubscriptionRequest {
        customer_id: customer_id.to_string(),
        sku_id: cfg.sku_id.clone(),
        plan: PlanInfo {
            plan_name: PlanName::Trial.as_str().to_string(),
        },
        seats: Some(Seats::cap(cfg.seats)),
    };

    match subscriptions.insert(customer_id, &trial).await {
        Ok(created) => {
            info!(row = ctx.row, domain = %ctx.domain,
                subscription_id = %created.subscription_id, "trial subscription created");
            return Ok(Some(created));
        }
        Err(ApiError::Conflict) => {
            return recover_existing(subscriptions, ctx, customer_id).await;
        }
        Err(error) => {
            warn!(row = ctx.row, domain = %ctx.domain, %error,
                "trial creation unavailable, falling back to flexible");
        }
    }

    // Flexible fallback; the API rejects a seats field on this plan.
    let flexible = CreateSubscriptionRequest {
        customer_id: customer_id.to_string(),
        sku_id: cfg.sku_id.clone(),
        plan: PlanInfo {
            plan_name: PlanName::Flexible.as_str().to_string(),
        },
        seats: None,
    };

    match subscriptions.insert(customer_id, &flexible).await {
        Ok(created) => {
            info!(row = ctx.row, domain = %ctx.domain,
                subscription_id = %created.subscription_id, "flexible subscription created");
            Ok(Some(created))
        }
        Err(ApiError::Conflict) => recover_existing(subscriptions, ctx, customer_id).await,
        Err(error) => Err(error.into()),
    }
}

/// Conflict recovery: the subscription already exists, so reuse the first
/// one the API lists for the customer.
async fn recover_existing<S: Subscriptions + ?Sized>(
    subscriptions: &S,
    ctx: &TenantContext,
    customer_id: &str,
) -> Result<Option<Subscription>, ProvisionError> {
    let existing = subscriptions.list(customer_id).await?;
    match existing.into_iter().next() {
        Some(subscription) => {
            info!(row = ctx.row, domain = %ctx.domain,
                subscription_id = %subscription.subscription_id,
                "reusing existing subscription");
            Ok(Some(subscription))
        }
        None => {
            warn!(row = ctx.row, domain = %ctx.domain,
                "creation conflicted but listing returned nothing");
            Ok(None)
        }
    }
}
