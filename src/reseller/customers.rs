use async_trait::async_trait;
use reqwest::Method;
use serde_json::json;

use super::api::CustomerDirectory;
use super::client::ResellerClient;
use super::errors::ApiError;
use super::types::{CreateCustomerRequest, Customer};

/// Handler for reseller customer operations.
///
/// Lookup and creation go through the reseller endpoint; account settings
/// (default language) live on the admin directory endpoint.
#[derive(Debug, Clone)]
pub struct CustomerHandler {
    client: ResellerClient,
    reseller_base: String,
    directory_base: String,
}

impl CustomerHandler {
    pub fn new(client: ResellerClient, reseller_base: String, directory_base: String) -> Self {
        Self {
            client,
            reseller_base: reseller_base.trim_end_matches('/').to_string(),
            directory_base: directory_base.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl CustomerDirectory for CustomerHandler {
    async fn get(&self, domain: &str) -> Result<Customer, ApiError> {
        let url = format!("{}/customers/{}", self.reseller_base, domain);
        self.client.execute(Method::GET, &url, None).await
    }

    async fn insert(&self, request: &CreateCustomerRequest) -> Result<Customer, ApiError> {
        let url = format!("{}/customers", self.reseller_base);
        let body = serde_json::to_value(request)?;
        self.client.execute(Method::POST, &url, Some(&body)).await
    }

    async fn update_language(&self, customer_id: &str, language: &str) -> Result<(), ApiError> {
        let url = format!("{}/customers/{}", self.directory_base, customer_id);
        let body = json!({ "language": language });
        self.client.execute_unit(Method::PUT, &url, Some(&body)).await
    }
}
