use async_trait::async_trait;
use reqwest::Method;

use super::api::UserDirectory;
use super::client::ResellerClient;
use super::errors::ApiError;
use super::types::{CreateUserRequest, MakeAdminRequest, User};

/// Handler for admin directory user operations.
#[derive(Debug, Clone)]
pub struct UserHandler {
    client: ResellerClient,
    base: String,
}

impl UserHandler {
    pub fn new(client: ResellerClient, base: String) -> Self {
        Self {
            client,
            base: base.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl UserDirectory for UserHandler {
    async fn insert(&self, request: &CreateUserRequest) -> Result<User, ApiError> {
        let url = format!("{}/users", self.base);
        let body = serde_json::to_value(request)?;
        self.client.execute(Method::POST, &url, Some(&body)).await
    }

    async fn make_admin(&self, email: &str) -> Result<(), ApiError> {
        let url = format!("{}/users/{}/makeAdmin", self.base, email);
        let body = serde_json::to_value(&MakeAdminRequest { status: true })?;
        self.client.execute_unit(Method::POST, &url, Some(&body)).await
    }
}
