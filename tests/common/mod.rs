//! Hand-rolled collaborator fakes with call recording, shared by the
//! integration tests. Results are scripted per call in FIFO order; when a
//! script runs dry the fake answers with a sensible success.

// Each integration test binary compiles its own copy; not every binary
// uses every fake.
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use seatflow::reseller::types::{
    ChangePlanRequest, CreateCustomerRequest, CreateSubscriptionRequest, CreateUserRequest,
    Customer, PlanInfo, RenewalSettings, Subscription, User,
};
use seatflow::reseller::{ApiError, CustomerDirectory, Subscriptions, UserDirectory};
use seatflow::verification::{Verification, VerificationMethod, VerificationToken};

pub fn subscription(id: &str, sku: &str, plan: &str) -> Subscription {
    Subscription {
        subscription_id: id.to_string(),
        customer_id: None,
        sku_id: sku.to_string(),
        plan: PlanInfo {
            plan_name: plan.to_string(),
        },
        seats: None,
        status: Some("ACTIVE".to_string()),
        trial_settings: None,
    }
}

pub fn tenant_config(domain: &str, sku_id: &str, seats: u32) -> seatflow::TenantConfig {
    seatflow::TenantConfig {
        customer_domain: domain.to_string(),
        sku_id: sku_id.to_string(),
        plan_name: "TRIAL".to_string(),
        seats,
        delegated_admin: "ops@example.com".to_string(),
        language_code: "ko".to_string(),
        verification_method: VerificationMethod::DnsCname,
        manage_customer_users: false,
        admin: seatflow::provisioning::AdminSeed::default(),
    }
}

pub fn customer(id: &str, domain: &str) -> Customer {
    Customer {
        customer_id: id.to_string(),
        customer_domain: domain.to_string(),
        alternate_email: None,
        postal_address: None,
        language: None,
    }
}

#[derive(Default)]
pub struct FakeCustomers {
    pub existing: Mutex<Option<Customer>>,
    pub get_errors: Mutex<VecDeque<ApiError>>,
    pub insert_requests: Mutex<Vec<CreateCustomerRequest>>,
    pub language_updates: Mutex<Vec<(String, String)>>,
    pub fail_language_update: bool,
    pub calls: Mutex<Vec<&'static str>>,
}

impl FakeCustomers {
    pub fn with_existing(customer: Customer) -> Self {
        Self {
            existing: Mutex::new(Some(customer)),
            ..Default::default()
        }
    }

    pub fn empty_directory() -> Self {
        let fake = Self::default();
        fake.get_errors.lock().unwrap().push_back(ApiError::NotFound);
        fake
    }
}

#[async_trait]
impl CustomerDirectory for FakeCustomers {
    async fn get(&self, _domain: &str) -> Result<Customer, ApiError> {
        self.calls.lock().unwrap().push("get");
        if let Some(error) = self.get_errors.lock().unwrap().pop_front() {
            return Err(error);
        }
        self.existing
            .lock()
            .unwrap()
            .clone()
            .ok_or(ApiError::NotFound)
    }

    async fn insert(&self, request: &CreateCustomerRequest) -> Result<Customer, ApiError> {
        self.calls.lock().unwrap().push("insert");
        self.insert_requests.lock().unwrap().push(request.clone());
        let created = Customer {
            customer_id: "C-created".to_string(),
            customer_domain: request.customer_domain.clone(),
            alternate_email: Some(request.alternate_email.clone()),
            postal_address: Some(request.postal_address.clone()),
            language: None,
        };
        *self.existing.lock().unwrap() = Some(created.clone());
        Ok(created)
    }

    async fn update_language(&self, customer_id: &str, language: &str) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push("updateLanguage");
        if self.fail_language_update {
            return Err(ApiError::Upstream {
                status: 500,
                message: "language service down".into(),
            });
        }
        self.language_updates
            .lock()
            .unwrap()
            .push((customer_id.to_string(), language.to_string()));
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeSubscriptions {
    pub insert_results: Mutex<VecDeque<Result<Subscription, ApiError>>>,
    pub insert_requests: Mutex<Vec<CreateSubscriptionRequest>>,
    pub listed: Mutex<Vec<Subscription>>,
    pub current: Mutex<Option<Subscription>>,
    pub change_plan_requests: Mutex<Vec<ChangePlanRequest>>,
    pub renewal_requests: Mutex<Vec<RenewalSettings>>,
    pub fail_start_paid: bool,
    pub calls: Mutex<Vec<&'static str>>,
}

impl FakeSubscriptions {
    pub fn scripted(results: Vec<Result<Subscription, ApiError>>) -> Self {
        Self {
            insert_results: Mutex::new(results.into()),
            ..Default::default()
        }
    }

    pub fn call_log(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Subscriptions for FakeSubscriptions {
    async fn insert(
        &self,
        customer_id: &str,
        request: &CreateSubscriptionRequest,
    ) -> Result<Subscription, ApiError> {
        self.calls.lock().unwrap().push("insert");
        self.insert_requests.lock().unwrap().push(request.clone());
        match self.insert_results.lock().unwrap().pop_front() {
            Some(result) => result,
            None => Ok(Subscription {
                subscription_id: format!("sub-{customer_id}"),
                customer_id: Some(customer_id.to_string()),
                sku_id: request.sku_id.clone(),
                plan: request.plan.clone(),
                seats: request.seats.clone(),
                status: Some("ACTIVE".to_string()),
                trial_settings: None,
            }),
        }
    }

    async fn list(&self, _customer_id: &str) -> Result<Vec<Subscription>, ApiError> {
        self.calls.lock().unwrap().push("list");
        Ok(self.listed.lock().unwrap().clone())
    }

    async fn get(
        &self,
        _customer_id: &str,
        _subscription_id: &str,
    ) -> Result<Subscription, ApiError> {
        self.calls.lock().unwrap().push("get");
        self.current.lock().unwrap().clone().ok_or(ApiError::NotFound)
    }

    async fn change_plan(
        &self,
        _customer_id: &str,
        _subscription_id: &str,
        request: &ChangePlanRequest,
    ) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push("changePlan");
        self.change_plan_requests.lock().unwrap().push(request.clone());
        // Mirror the change so a later get() sees the new plan.
        if let Some(current) = self.current.lock().unwrap().as_mut() {
            current.plan = PlanInfo {
                plan_name: request.plan_name.clone(),
            };
        }
        Ok(())
    }

    async fn start_paid_service(
        &self,
        _customer_id: &str,
        _subscription_id: &str,
    ) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push("startPaidService");
        if self.fail_start_paid {
            return Err(ApiError::Upstream {
                status: 500,
                message: "cannot start paid service".into(),
            });
        }
        Ok(())
    }

    async fn change_renewal_settings(
        &self,
        _customer_id: &str,
        _subscription_id: &str,
        request: &RenewalSettings,
    ) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push("changeRenewalSettings");
        self.renewal_requests.lock().unwrap().push(request.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeUsers {
    pub inserted: Mutex<Vec<CreateUserRequest>>,
    pub admins: Mutex<Vec<String>>,
    pub fail_insert: bool,
    pub calls: Mutex<Vec<&'static str>>,
}

#[async_trait]
impl UserDirectory for FakeUsers {
    async fn insert(&self, request: &CreateUserRequest) -> Result<User, ApiError> {
        self.calls.lock().unwrap().push("insert");
        if self.fail_insert {
            return Err(ApiError::Upstream {
                status: 400,
                message: "invalid user".into(),
            });
        }
        self.inserted.lock().unwrap().push(request.clone());
        Ok(User {
            primary_email: request.primary_email.clone(),
            name: request.name.clone(),
            languages: request.languages.clone(),
        })
    }

    async fn make_admin(&self, email: &str) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push("makeAdmin");
        self.admins.lock().unwrap().push(email.to_string());
        Ok(())
    }
}

pub enum VerificationMode {
    Issue(String),
    Unauthorized(String),
    Broken,
}

pub struct FakeVerification {
    pub mode: VerificationMode,
    pub requests: Mutex<Vec<(String, VerificationMethod)>>,
}

impl FakeVerification {
    pub fn issuing(token: &str) -> Self {
        Self {
            mode: VerificationMode::Issue(token.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn unauthorized(auth_url: &str) -> Self {
        Self {
            mode: VerificationMode::Unauthorized(auth_url.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn broken() -> Self {
        Self {
            mode: VerificationMode::Broken,
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Verification for FakeVerification {
    async fn request_token(
        &self,
        domain: &str,
        method: VerificationMethod,
    ) -> Result<VerificationToken, ApiError> {
        self.requests
            .lock()
            .unwrap()
            .push((domain.to_string(), method));
        match &self.mode {
            VerificationMode::Issue(token) => Ok(VerificationToken {
                token: token.clone(),
                method: Some(method.as_str().to_string()),
            }),
            VerificationMode::Unauthorized(auth_url) => Err(ApiError::Unauthorized {
                auth_url: auth_url.clone(),
            }),
            VerificationMode::Broken => Err(ApiError::Upstream {
                status: 500,
                message: "verification service down".into(),
            }),
        }
    }
}
