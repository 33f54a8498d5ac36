pub mod mail;
pub mod provision;
pub mod transition;

use anyhow::{anyhow, Result};

use crate::config::SeatflowConfig;
use crate::reseller::{ResellerClient, RetryPolicy};

/// Build the shared API client, failing with operator guidance when no
/// credential is configured.
pub(crate) fn reseller_client(config: &SeatflowConfig) -> Result<ResellerClient> {
    let token = config.reseller.token.clone().ok_or_else(|| {
        anyhow!(
            "no reseller API token configured. Set SEATFLOW_RESELLER_TOKEN \
             or reseller.token in seatflow.toml"
        )
    })?;
    Ok(ResellerClient::new(
        token,
        &config.reseller.rate_limit,
        RetryPolicy::from(&config.reseller.retry),
    ))
}
