//! Idempotent customer get-or-create.

use tracing::info;

use crate::config::ProvisioningDefaults;
use crate::reseller::types::{CreateCustomerRequest, Customer, PostalAddress};
use crate::reseller::{ApiError, CustomerDirectory};

use super::{ProvisionError, TenantConfig, TenantContext};

/// Ensure a customer exists for the tenant's domain.
///
/// Lookup by domain; only a NotFound answer triggers creation, with the
/// configured postal template and the delegated admin as alternate
/// contact. Any other lookup failure propagates unchanged. An existing
/// customer is returned as-is; this path never updates attributes.
pub async fn ensure_customer<C: CustomerDirectory + ?Sized>(
    directory: &C,
    ctx: &TenantContext,
    cfg: &TenantConfig,
    defaults: &ProvisioningDefaults,
) -> Result<Customer, ProvisionError> {
    match directory.get(&cfg.customer_domain).await {
        Ok(existing) => {
            info!(row = ctx.row, domain = %ctx.domain, customer_id = %existing.customer_id,
                "customer already exists");
            Ok(existing)
        }
        Err(ApiError::NotFound) => {
            let request = CreateCustomerRequest {
                customer_domain: cfg.customer_domain.clone(),
                alternate_email: cfg.delegated_admin.clone(),
                postal_address: PostalAddress {
                    contact_name: cfg.customer_domain.clone(),
                    organization_name: cfg.customer_domain.clone(),
                    region: defaults.postal.region.clone(),
                    postal_code: defaults.postal.postal_code.clone(),
                    country_code: defaults.postal.country_code.clone(),
                    address_line1: defaults.postal.address_line1.clone(),
                },
            };
            let created = directory.insert(&request).await?;
            info!(row = ctx.row, domain = %ctx.domain, customer_id = %created.customer_id,
                "customer created");
            Ok(created)
        }
        Err(other) => Err(other.into()),
    }
}
