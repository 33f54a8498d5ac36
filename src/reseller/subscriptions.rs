use async_trait::async_trait;
use reqwest::Method;

use super::api::Subscriptions;
use super::client::ResellerClient;
use super::errors::ApiError;
use super::types::{
    ChangePlanRequest, CreateSubscriptionRequest, RenewalSettings, Subscription, SubscriptionList,
};

/// Handler for reseller subscription operations.
#[derive(Debug, Clone)]
pub struct SubscriptionHandler {
    client: ResellerClient,
    base: String,
}

impl SubscriptionHandler {
    pub fn new(client: ResellerClient, base: String) -> Self {
        Self {
            client,
            base: base.trim_end_matches('/').to_string(),
        }
    }

    fn collection_url(&self, customer_id: &str) -> String {
        format!("{}/customers/{}/subscriptions", self.base, customer_id)
    }

    fn item_url(&self, customer_id: &str, subscription_id: &str) -> String {
        format!(
            "{}/customers/{}/subscriptions/{}",
            self.base, customer_id, subscription_id
        )
    }
}

#[async_trait]
impl Subscriptions for SubscriptionHandler {
    async fn insert(
        &self,
        customer_id: &str,
        request: &CreateSubscriptionRequest,
    ) -> Result<Subscription, ApiError> {
        let body = serde_json::to_value(request)?;
        self.client
            .execute(Method::POST, &self.collection_url(customer_id), Some(&body))
            .await
    }

    async fn list(&self, customer_id: &str) -> Result<Vec<Subscription>, ApiError> {
        let listing: SubscriptionList = self
            .client
            .execute(Method::GET, &self.collection_url(customer_id), None)
            .await?;
        Ok(listing.subscriptions.unwrap_or_default())
    }

    async fn get(
        &self,
        customer_id: &str,
        subscription_id: &str,
    ) -> Result<Subscription, ApiError> {
        self.client
            .execute(Method::GET, &self.item_url(customer_id, subscription_id), None)
            .await
    }

    async fn change_plan(
        &self,
        customer_id: &str,
        subscription_id: &str,
        request: &ChangePlanRequest,
    ) -> Result<(), ApiError> {
        let url = format!("{}/changePlan", self.item_url(customer_id, subscription_id));
        let body = serde_json::to_value(request)?;
        self.client.execute_unit(Method::POST, &url, Some(&body)).await
    }

    async fn start_paid_service(
        &self,
        customer_id: &str,
        subscription_id: &str,
    ) -> Result<(), ApiError> {
        let url = format!(
            "{}/startPaidService",
            self.item_url(customer_id, subscription_id)
        );
        self.client.execute_unit(Method::POST, &url, None).await
    }

    async fn change_renewal_settings(
        &self,
        customer_id: &str,
        subscription_id: &str,
        request: &RenewalSettings,
    ) -> Result<(), ApiError> {
        let url = format!(
            "{}/changeRenewalSettings",
            self.item_url(customer_id, subscription_id)
        );
        let body = serde_json::to_value(request)?;
        self.client.execute_unit(Method::POST, &url, Some(&body)).await
    }
}
