pub mod batch;
pub mod orchestrator;
pub mod plan;
pub mod provisioner;
pub mod resolver;
pub mod tenant;
pub mod transition;

pub use batch::{run_provisioning, run_transitions, BatchSummary};
pub use orchestrator::{ProvisioningOrchestrator, ProvisioningOutcome};
pub use plan::PlanName;
pub use provisioner::create_if_absent;
pub use resolver::ensure_customer;
pub use tenant::{build_tenant_config, AdminSeed, TenantConfig};
pub use transition::{find_ids_by_domain, PlanTransitioner};

use thiserror::Error;

use crate::reseller::ApiError;

/// Per-tenant failure taxonomy. Validation variants are produced before
/// any API call; `Api` wraps whatever the collaborator layer classified.
/// The batch driver catches all of these at the row boundary.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("required field '{0}' is missing or empty")]
    MissingField(&'static str),

    #[error("no SKU mapping for '{0}'")]
    UnmappedSku(String),

    #[error("seats must be a positive integer, got '{0}'")]
    InvalidSeats(String),

    #[error("unknown planName \"{0}\" (accepted: TRIAL | FLEXIBLE | ANNUAL_MONTHLY_PAY | ANNUAL_YEARLY_PAY)")]
    UnknownPlanName(String),

    #[error("plan change is reserved for annual commitments; \"{raw}\" normalizes to {normalized}")]
    TransitionNotAllowed { raw: String, normalized: String },

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Explicit per-tenant context carried into every component and log line
/// instead of ambient "current row" state.
#[derive(Debug, Clone)]
pub struct TenantContext {
    pub row: usize,
    pub domain: String,
}

impl TenantContext {
    pub fn new(row: usize, domain: impl Into<String>) -> Self {
        Self {
            row,
            domain: domain.into(),
        }
    }
}

impl std::fmt::Display for TenantContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[row {} | {}]", self.row, self.domain)
    }
}
