use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for Seatflow
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SeatflowConfig {
    /// Reseller / directory API settings
    pub reseller: ResellerConfig,
    /// Site-verification API settings
    pub verification: VerificationConfig,
    /// Workbook (tabular store) settings
    pub sheet: SheetConfig,
    /// Per-tenant provisioning defaults
    pub provisioning: ProvisioningDefaults,
    /// Outbound setup-mail settings
    pub mail: MailConfig,
    /// Observability settings
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResellerConfig {
    /// OAuth bearer token for the reseller and directory APIs (can be set via env var)
    pub token: Option<String>,
    /// Reseller API base URL (customers, subscriptions)
    pub base_url: String,
    /// Admin directory API base URL (users, customer settings)
    pub directory_base_url: String,
    /// Client-side rate limiting settings
    pub rate_limit: RateLimitConfig,
    /// Retry settings for transient upstream failures
    pub retry: RetryConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Sustained requests per second
    pub requests_per_second: u32,
    /// Burst capacity
    pub burst_capacity: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetryConfig {
    /// Maximum retry attempts after the initial call
    pub max_attempts: u32,
    /// Base delay for exponential backoff, in milliseconds
    pub base_delay_ms: u64,
    /// Backoff ceiling, in milliseconds
    pub max_delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VerificationConfig {
    /// Site-verification API base URL
    pub base_url: String,
    /// Access token for the verification scope (absent until the operator authorizes)
    pub access_token: Option<String>,
    /// Consent URL shown when no access token is configured
    pub auth_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SheetConfig {
    /// Path to the provisioning workbook file
    pub workbook_path: String,
    /// Path to the SKU map file (auto-seeded when missing)
    pub sku_map_path: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProvisioningDefaults {
    /// Operator contact recorded as the customer's alternate email
    pub alternate_email: String,
    /// Default customer/user language when the row has none
    pub default_language: String,
    /// Domain-verification method requested during provisioning
    pub verification_method: String,
    /// Postal address template for newly created customers
    pub postal: PostalDefaults,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PostalDefaults {
    pub region: String,
    pub postal_code: String,
    pub country_code: String,
    pub address_line1: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MailConfig {
    /// SMTP relay host
    pub smtp_relay: String,
    /// SMTP username (can be set via env var)
    pub smtp_username: Option<String>,
    /// SMTP password (can be set via env var)
    pub smtp_password: Option<String>,
    /// From address for setup mails
    pub from_address: String,
    /// Display name on outbound mail
    pub sender_name: String,
    /// Optional CC address (support desk)
    pub cc_address: Option<String>,
    /// Admin console URL referenced in the setup mail
    pub console_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Enable tracing subscriber installation
    pub tracing_enabled: bool,
    /// Log level used when RUST_LOG is not set
    pub log_level: String,
}

impl Default for SeatflowConfig {
    fn default() -> Self {
        Self {
            reseller: ResellerConfig {
                token: None, // Read from env var when absent
                base_url: "https://reseller.googleapis.com/apps/reseller/v1".to_string(),
                directory_base_url: "https://admin.googleapis.com/admin/directory/v1".to_string(),
                rate_limit: RateLimitConfig {
                    requests_per_second: 1,
                    burst_capacity: 10,
                },
                retry: RetryConfig {
                    max_attempts: 3,
                    base_delay_ms: 50,
                    max_delay_ms: 10_000,
                },
            },
            verification: VerificationConfig {
                base_url: "https://www.googleapis.com/siteVerification/v1".to_string(),
                access_token: None,
                auth_url: "https://accounts.google.com/o/oauth2/auth?scope=https://www.googleapis.com/auth/siteverification".to_string(),
            },
            sheet: SheetConfig {
                workbook_path: "provisioning.json".to_string(),
                sku_map_path: "sku_map.json".to_string(),
            },
            provisioning: ProvisioningDefaults {
                alternate_email: "ops@example.com".to_string(),
                default_language: "ko".to_string(),
                verification_method: "DNS_CNAME".to_string(),
                postal: PostalDefaults {
                    region: "KR".to_string(),
                    postal_code: "06182".to_string(),
                    country_code: "KR".to_string(),
                    address_line1: "417 Yeongdong-daero".to_string(),
                },
            },
            mail: MailConfig {
                smtp_relay: "smtp.gmail.com".to_string(),
                smtp_username: None,
                smtp_password: None,
                from_address: "support@example.com".to_string(),
                sender_name: "Customer Support".to_string(),
                cc_address: None,
                console_url: "https://admin.google.com/".to_string(),
            },
            observability: ObservabilityConfig {
                tracing_enabled: true,
                log_level: "info".to_string(),
            },
        }
    }
}

impl SeatflowConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration files (seatflow.toml, .seatflow-rc)
    /// 3. Environment variables (prefixed with SEATFLOW_)
    pub fn load() -> Result<Self> {
        let defaults = Config::try_from(&SeatflowConfig::default())?;
        let mut builder = Config::builder().add_source(defaults);

        if Path::new("seatflow.toml").exists() {
            builder = builder.add_source(File::with_name("seatflow"));
        }

        if Path::new(".seatflow-rc").exists() {
            builder = builder.add_source(File::with_name(".seatflow-rc"));
        }

        builder = builder.add_source(
            Environment::with_prefix("SEATFLOW")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        let mut seatflow_config: SeatflowConfig = config.try_deserialize()?;

        // Special handling for API credentials - check plain env vars too
        if seatflow_config.reseller.token.is_none() {
            if let Ok(token) = std::env::var("SEATFLOW_RESELLER_TOKEN") {
                seatflow_config.reseller.token = Some(token);
            }
        }
        if seatflow_config.verification.access_token.is_none() {
            if let Ok(token) = std::env::var("SEATFLOW_VERIFICATION_TOKEN") {
                seatflow_config.verification.access_token = Some(token);
            }
        }

        Ok(seatflow_config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_round_trip_through_toml() {
        let cfg = SeatflowConfig::default();
        let text = toml::to_string_pretty(&cfg).unwrap();
        let back: SeatflowConfig = toml::from_str(&text).unwrap();
        assert_eq!(back.sheet.workbook_path, "provisioning.json");
        assert_eq!(back.provisioning.default_language, "ko");
        assert_eq!(back.reseller.rate_limit.burst_capacity, 10);
    }
}
