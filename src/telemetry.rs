use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ObservabilityConfig;
use crate::provisioning::TenantContext;

/// Initialize structured logging.
/// JSON output so batch runs can be post-processed; RUST_LOG overrides the
/// configured level.
pub fn init_telemetry(config: &ObservabilityConfig) -> Result<()> {
    if !config.tracing_enabled {
        return Ok(());
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(true),
        )
        .with(filter)
        .init();

    tracing::info!("Seatflow telemetry initialized with structured logging");
    Ok(())
}

/// Create a span carrying the per-tenant context so every phase of a run
/// logs with the row index and domain attached.
pub fn tenant_span(operation: &str, ctx: &TenantContext) -> tracing::Span {
    tracing::info_span!(
        "tenant_run",
        operation = operation,
        row = ctx.row,
        domain = %ctx.domain,
    )
}
