use governor::{DefaultDirectRateLimiter, Jitter, Quota, RateLimiter};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::errors::ApiError;
use super::retry::RetryPolicy;
use crate::config::RateLimitConfig;

/// Rate-limited JSON client shared by every reseller/directory handler.
///
/// All classification of HTTP outcomes into `ApiError` happens here: 404
/// becomes `NotFound`, 409 becomes `Conflict`, everything else non-2xx is
/// `Upstream`. Handlers and the provisioning core never look at status
/// codes or response text.
#[derive(Debug, Clone)]
pub struct ResellerClient {
    http: reqwest::Client,
    token: String,
    limiter: Arc<DefaultDirectRateLimiter>,
    retry: RetryPolicy,
}

impl ResellerClient {
    pub fn new(token: String, rate_limit: &RateLimitConfig, retry: RetryPolicy) -> Self {
        let per_second =
            NonZeroU32::new(rate_limit.requests_per_second).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(rate_limit.burst_capacity).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::per_second(per_second).allow_burst(burst);

        Self {
            http: reqwest::Client::new(),
            token,
            limiter: Arc::new(RateLimiter::direct(quota)),
            retry,
        }
    }

    /// Execute a request and deserialize the JSON response.
    pub(crate) async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<T, ApiError> {
        let value = self.execute_raw(method, url, body).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Execute a request where the response body does not matter
    /// (admin grants, settings updates).
    pub(crate) async fn execute_unit(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<(), ApiError> {
        self.limiter
            .until_ready_with_jitter(Jitter::up_to(Duration::from_millis(100)))
            .await;
        self.retry
            .run(url, || async {
                let response = self.send(method.clone(), url, body).await?;
                Self::classify_status(response).await?;
                Ok(())
            })
            .await
    }

    async fn execute_raw(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        self.limiter
            .until_ready_with_jitter(Jitter::up_to(Duration::from_millis(100)))
            .await;
        self.retry
            .run(url, || async {
                let response = self.send(method.clone(), url, body).await?;
                let response = Self::classify_status(response).await?;
                debug!(url, "reseller API call succeeded");
                Ok(response.json::<Value>().await?)
            })
            .await
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<reqwest::Response, ApiError> {
        let mut request = self.http.request(method, url).bearer_auth(&self.token);
        if let Some(body) = body {
            request = request.json(body);
        }
        Ok(request.send().await?)
    }

    async fn classify_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        match status.as_u16() {
            404 => Err(ApiError::NotFound),
            409 => Err(ApiError::Conflict),
            code => {
                let message = Self::error_message(response).await;
                Err(ApiError::Upstream {
                    status: code,
                    message,
                })
            }
        }
    }

    /// Pull a human-readable message out of the error body, falling back to
    /// the raw text when it is not the usual `{"error": {"message": ...}}`.
    async fn error_message(response: reqwest::Response) -> String {
        let text = response.text().await.unwrap_or_default();
        serde_json::from_str::<Value>(&text)
            .ok()
            .and_then(|v| {
                v.pointer("/error/message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .unwrap_or(text)
    }
}
