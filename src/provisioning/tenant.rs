//! Row-to-config validation. Pure: no side effects, no API calls.

use crate::config::ProvisioningDefaults;
use crate::sheet::{Row, SkuMap};
use crate::verification::VerificationMethod;

use super::ProvisionError;

/// Canonical provisioning configuration for one tenant, derived from a
/// workbook row. Immutable for the duration of a run.
#[derive(Debug, Clone)]
pub struct TenantConfig {
    pub customer_domain: String,
    pub sku_id: String,
    /// Upper-cased raw plan name, defaulted to TRIAL. Deliberately not
    /// validated against the canonical set here; only a plan transition
    /// normalizes it.
    pub plan_name: String,
    pub seats: u32,
    pub delegated_admin: String,
    pub language_code: String,
    pub verification_method: VerificationMethod,
    pub manage_customer_users: bool,
    pub admin: AdminSeed,
}

/// Optional admin-user fields from the row. All four must be present for
/// user management to activate.
#[derive(Debug, Clone, Default)]
pub struct AdminSeed {
    pub primary_email: String,
    pub given_name: String,
    pub family_name: String,
    pub password: String,
}

impl AdminSeed {
    fn is_complete(&self) -> bool {
        !self.primary_email.is_empty()
            && !self.given_name.is_empty()
            && !self.family_name.is_empty()
            && !self.password.is_empty()
    }
}

/// Parse a seat count cell: blank defaults to 1, anything else must be a
/// positive integer.
pub(crate) fn parse_seats(raw: &str) -> Result<u32, ProvisionError> {
    if raw.is_empty() {
        return Ok(1);
    }
    match raw.parse::<u32>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(ProvisionError::InvalidSeats(raw.to_string())),
    }
}

/// Validate and normalize one row into a `TenantConfig`.
pub fn build_tenant_config(
    row: &Row,
    sku_map: &SkuMap,
    defaults: &ProvisioningDefaults,
) -> Result<TenantConfig, ProvisionError> {
    let customer_domain = row.get("customerDomain").to_string();
    if customer_domain.is_empty() {
        return Err(ProvisionError::MissingField("customerDomain"));
    }

    let mut sku_id = row.get("skuId").to_string();
    if sku_id.is_empty() {
        let sku_name = row.get("skuName");
        if sku_name.is_empty() {
            return Err(ProvisionError::MissingField("skuId"));
        }
        sku_id = sku_map
            .resolve(sku_name)
            .ok_or_else(|| ProvisionError::UnmappedSku(sku_name.to_string()))?
            .to_string();
    }

    let seats = parse_seats(row.get("seats"))?;

    let plan_raw = row.get("planName");
    let plan_name = if plan_raw.is_empty() {
        "TRIAL".to_string()
    } else {
        plan_raw.to_uppercase()
    };

    let admin = AdminSeed {
        primary_email: row.get("primaryEmail").to_string(),
        given_name: row.get("givenName").to_string(),
        family_name: row.get("familyName").to_string(),
        password: row.get("password").to_string(),
    };
    let manage_customer_users = admin.is_complete();

    let language_raw = row.get("language");
    let language_code = if language_raw.is_empty() {
        defaults.default_language.clone()
    } else {
        language_raw.to_string()
    };

    Ok(TenantConfig {
        customer_domain,
        sku_id,
        plan_name,
        seats,
        delegated_admin: defaults.alternate_email.clone(),
        language_code,
        verification_method: VerificationMethod::parse(&defaults.verification_method),
        manage_customer_users,
        admin,
    })
}
