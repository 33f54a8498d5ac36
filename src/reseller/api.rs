// Collaborator contracts the provisioning core depends on. The HTTP
// handlers implement these; tests substitute fakes.

use async_trait::async_trait;

use super::errors::ApiError;
use super::types::{
    ChangePlanRequest, CreateCustomerRequest, CreateSubscriptionRequest, CreateUserRequest,
    Customer, RenewalSettings, Subscription, User,
};

/// Customer directory: lookup by domain, creation, settings updates.
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    async fn get(&self, domain: &str) -> Result<Customer, ApiError>;
    async fn insert(&self, request: &CreateCustomerRequest) -> Result<Customer, ApiError>;
    async fn update_language(&self, customer_id: &str, language: &str) -> Result<(), ApiError>;
}

/// Subscription lifecycle operations for one customer.
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait Subscriptions: Send + Sync {
    async fn insert(
        &self,
        customer_id: &str,
        request: &CreateSubscriptionRequest,
    ) -> Result<Subscription, ApiError>;
    async fn list(&self, customer_id: &str) -> Result<Vec<Subscription>, ApiError>;
    async fn get(&self, customer_id: &str, subscription_id: &str)
        -> Result<Subscription, ApiError>;
    async fn change_plan(
        &self,
        customer_id: &str,
        subscription_id: &str,
        request: &ChangePlanRequest,
    ) -> Result<(), ApiError>;
    async fn start_paid_service(
        &self,
        customer_id: &str,
        subscription_id: &str,
    ) -> Result<(), ApiError>;
    async fn change_renewal_settings(
        &self,
        customer_id: &str,
        subscription_id: &str,
        request: &RenewalSettings,
    ) -> Result<(), ApiError>;
}

/// User directory: admin account creation and privilege grants.
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn insert(&self, request: &CreateUserRequest) -> Result<User, ApiError>;
    async fn make_admin(&self, email: &str) -> Result<(), ApiError>;
}
