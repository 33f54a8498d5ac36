//! Domain-verification token issuance.
//!
//! This is the one collaborator that needs a user-granted OAuth scope
//! instead of the operator credential: when no grant exists the error
//! carries the consent URL so the operator can authorize once and re-run.
//! Callers treat every failure here as best-effort.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::VerificationConfig;
use crate::reseller::ApiError;

/// Supported verification record methods. Unknown input falls back to
/// DNS_TXT rather than failing, since the token request is best-effort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationMethod {
    DnsTxt,
    DnsCname,
    Meta,
    File,
}

impl VerificationMethod {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "DNS_CNAME" => VerificationMethod::DnsCname,
            "META" => VerificationMethod::Meta,
            "FILE" => VerificationMethod::File,
            _ => VerificationMethod::DnsTxt,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationMethod::DnsTxt => "DNS_TXT",
            VerificationMethod::DnsCname => "DNS_CNAME",
            VerificationMethod::Meta => "META",
            VerificationMethod::File => "FILE",
        }
    }
}

impl std::fmt::Display for VerificationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationToken {
    pub token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait Verification: Send + Sync {
    async fn request_token(
        &self,
        domain: &str,
        method: VerificationMethod,
    ) -> Result<VerificationToken, ApiError>;
}

/// HTTP client for the site-verification API.
#[derive(Debug, Clone)]
pub struct VerificationClient {
    http: reqwest::Client,
    base_url: String,
    access_token: Option<String>,
    auth_url: String,
}

impl VerificationClient {
    pub fn from_config(config: &VerificationConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
            auth_url: config.auth_url.clone(),
        }
    }
}

#[async_trait]
impl Verification for VerificationClient {
    async fn request_token(
        &self,
        domain: &str,
        method: VerificationMethod,
    ) -> Result<VerificationToken, ApiError> {
        let Some(access_token) = self.access_token.as_deref() else {
            return Err(ApiError::Unauthorized {
                auth_url: self.auth_url.clone(),
            });
        };

        let body = json!({
            "site": { "type": "INET_DOMAIN", "identifier": domain },
            "verificationMethod": method.as_str(),
        });

        let response = self
            .http
            .post(format!("{}/token", self.base_url))
            .bearer_auth(access_token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::Upstream {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json::<VerificationToken>().await?)
    }
}
