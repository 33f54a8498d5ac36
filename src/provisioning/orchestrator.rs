//! End-to-end provisioning run for one tenant.

use tracing::{info, warn};
use uuid::Uuid;

use crate::config::ProvisioningDefaults;
use crate::reseller::types::{CreateUserRequest, Subscription, UserLanguage, UserName};
use crate::reseller::{CustomerDirectory, Subscriptions, UserDirectory};
use crate::verification::Verification;

use super::provisioner::create_if_absent;
use super::resolver::ensure_customer;
use super::{ProvisionError, TenantConfig, TenantContext};

/// Everything the caller needs to persist after a run.
#[derive(Debug, Clone)]
pub struct ProvisioningOutcome {
    pub customer_id: String,
    pub subscription: Option<Subscription>,
}

/// Sequences one tenant run: verification token (best-effort), customer
/// get-or-create, customer language (best-effort), subscription creation,
/// optional admin user. Failures in the non-best-effort steps are fatal
/// for the tenant; the batch driver keeps them from aborting the batch.
pub struct ProvisioningOrchestrator<C, S, U, V> {
    pub customers: C,
    pub subscriptions: S,
    pub users: U,
    pub verification: V,
    defaults: ProvisioningDefaults,
}

impl<C, S, U, V> ProvisioningOrchestrator<C, S, U, V>
where
    C: CustomerDirectory,
    S: Subscriptions,
    U: UserDirectory,
    V: Verification,
{
    pub fn new(
        customers: C,
        subscriptions: S,
        users: U,
        verification: V,
        defaults: ProvisioningDefaults,
    ) -> Self {
        Self {
            customers,
            subscriptions,
            users,
            verification,
            defaults,
        }
    }

    pub async fn run(
        &self,
        ctx: &TenantContext,
        cfg: &TenantConfig,
    ) -> Result<ProvisioningOutcome, ProvisionError> {
        self.issue_verification_token(ctx, cfg).await;

        let customer = ensure_customer(&self.customers, ctx, cfg, &self.defaults).await?;

        if !cfg.language_code.is_empty() {
            self.apply_customer_language(ctx, &customer.customer_id, &cfg.language_code)
                .await;
        }

        let subscription =
            create_if_absent(&self.subscriptions, ctx, &customer.customer_id, cfg).await?;

        if cfg.manage_customer_users {
            self.create_admin_user(ctx, cfg).await?;
        } else {
            info!(row = ctx.row, domain = %ctx.domain, "admin user creation skipped");
        }

        Ok(ProvisioningOutcome {
            customer_id: customer.customer_id,
            subscription,
        })
    }

    /// Best-effort: a missing grant or an API failure must never block
    /// provisioning. The token (or the consent URL) only shows up in logs.
    async fn issue_verification_token(&self, ctx: &TenantContext, cfg: &TenantConfig) {
        match self
            .verification
            .request_token(&cfg.customer_domain, cfg.verification_method)
            .await
        {
            Ok(issued) => {
                info!(row = ctx.row, domain = %ctx.domain, token = %issued.token,
                    method = %cfg.verification_method,
                    "verification token issued; place this record");
            }
            Err(error) => {
                warn!(row = ctx.row, domain = %ctx.domain, %error,
                    "verification token issuance skipped");
            }
        }
    }

    /// Best-effort: the tenant works without its default language set.
    async fn apply_customer_language(&self, ctx: &TenantContext, customer_id: &str, language: &str) {
        match self.customers.update_language(customer_id, language).await {
            Ok(()) => {
                info!(row = ctx.row, domain = %ctx.domain, language, "customer language set");
            }
            Err(error) => {
                warn!(row = ctx.row, domain = %ctx.domain, language, %error,
                    "customer language update failed");
            }
        }
    }

    /// The admin account is the primary deliverable when requested, so any
    /// failure here is fatal for the tenant.
    async fn create_admin_user(
        &self,
        ctx: &TenantContext,
        cfg: &TenantConfig,
    ) -> Result<(), ProvisionError> {
        let seed = &cfg.admin;
        let primary_email = if seed.primary_email.is_empty() {
            format!("admin@{}", cfg.customer_domain)
        } else {
            seed.primary_email.clone()
        };
        let password = if seed.password.is_empty() {
            generated_password()
        } else {
            seed.password.clone()
        };

        let languages = (!cfg.language_code.is_empty()).then(|| {
            vec![UserLanguage {
                language_code: cfg.language_code.clone(),
                preference: "preferred".to_string(),
            }]
        });

        let request = CreateUserRequest {
            primary_email,
            name: UserName {
                given_name: or_default(&seed.given_name, "First"),
                family_name: or_default(&seed.family_name, "Admin"),
            },
            password,
            languages,
        };

        let user = self.users.insert(&request).await?;
        info!(row = ctx.row, domain = %ctx.domain, email = %user.primary_email, "user created");

        self.users.make_admin(&user.primary_email).await?;
        info!(row = ctx.row, domain = %ctx.domain, email = %user.primary_email,
            "administrator privileges granted");
        Ok(())
    }
}

fn or_default(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

/// Temporary password handed to the new admin account; rotated by the
/// customer on first login.
fn generated_password() -> String {
    let seed = Uuid::new_v4().simple().to_string();
    format!("{}Aa!", &seed[..10])
}
