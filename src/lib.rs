// Seatflow Library - Reseller Tenant Provisioning
// This exposes the core components for testing and integration

pub mod cli;
pub mod config;
pub mod notify;
pub mod provisioning;
pub mod reseller;
pub mod sheet;
pub mod telemetry;
pub mod verification;

// Re-export key types for easy access
pub use config::SeatflowConfig;
pub use provisioning::{
    build_tenant_config, create_if_absent, ensure_customer, BatchSummary, PlanName,
    PlanTransitioner, ProvisionError, ProvisioningOrchestrator, ProvisioningOutcome, TenantConfig,
    TenantContext,
};
pub use reseller::{
    ApiError, CustomerDirectory, CustomerHandler, ResellerClient, SubscriptionHandler,
    Subscriptions, UserDirectory, UserHandler,
};
pub use sheet::{Row, SheetStore, SkuMap, SkuMapStore, StoreError};
pub use telemetry::init_telemetry;
pub use verification::{Verification, VerificationClient, VerificationMethod, VerificationToken};
