//! End-to-end tenant runs: best-effort vs fatal step classification.

mod common;

use common::{
    customer, tenant_config, FakeCustomers, FakeSubscriptions, FakeUsers, FakeVerification,
};
use seatflow::config::SeatflowConfig;
use seatflow::provisioning::{
    AdminSeed, ProvisionError, ProvisioningOrchestrator, TenantContext,
};

fn ctx() -> TenantContext {
    TenantContext::new(2, "acme.test")
}

fn orchestrator(
    customers: FakeCustomers,
    subscriptions: FakeSubscriptions,
    users: FakeUsers,
    verification: FakeVerification,
) -> ProvisioningOrchestrator<FakeCustomers, FakeSubscriptions, FakeUsers, FakeVerification> {
    ProvisioningOrchestrator::new(
        customers,
        subscriptions,
        users,
        verification,
        SeatflowConfig::default().provisioning,
    )
}

#[tokio::test]
async fn verification_failure_never_blocks_provisioning() {
    for verification in [
        FakeVerification::unauthorized("https://accounts.example/consent"),
        FakeVerification::broken(),
    ] {
        let orch = orchestrator(
            FakeCustomers::empty_directory(),
            FakeSubscriptions::default(),
            FakeUsers::default(),
            verification,
        );
        let outcome = orch.run(&ctx(), &tenant_config("acme.test", "1010020027", 2)).await;
        assert!(outcome.is_ok());
    }
}

#[tokio::test]
async fn new_customer_is_created_with_the_postal_template() {
    let orch = orchestrator(
        FakeCustomers::empty_directory(),
        FakeSubscriptions::default(),
        FakeUsers::default(),
        FakeVerification::issuing("token-abc"),
    );

    let outcome = orch
        .run(&ctx(), &tenant_config("acme.test", "1010020027", 2))
        .await
        .unwrap();

    assert_eq!(outcome.customer_id, "C-created");
    assert!(outcome.subscription.is_some());
}

#[tokio::test]
async fn existing_customer_is_reused_without_modification() {
    let customers = FakeCustomers::with_existing(customer("C77", "acme.test"));
    let orch = orchestrator(
        customers,
        FakeSubscriptions::default(),
        FakeUsers::default(),
        FakeVerification::issuing("token-abc"),
    );

    let outcome = orch
        .run(&ctx(), &tenant_config("acme.test", "1010020027", 2))
        .await
        .unwrap();

    assert_eq!(outcome.customer_id, "C77");
    assert!(orch.customers.insert_requests.lock().unwrap().is_empty());
    assert_eq!(
        orch.customers.language_updates.lock().unwrap()[0],
        ("C77".to_string(), "ko".to_string())
    );
}

#[tokio::test]
async fn language_update_failure_is_tolerated() {
    let customers = FakeCustomers {
        fail_language_update: true,
        ..FakeCustomers::with_existing(customer("C77", "acme.test"))
    };
    let orch = orchestrator(
        customers,
        FakeSubscriptions::default(),
        FakeUsers::default(),
        FakeVerification::issuing("token-abc"),
    );

    let outcome = orch
        .run(&ctx(), &tenant_config("acme.test", "1010020027", 2))
        .await;
    assert!(outcome.is_ok());
}

#[tokio::test]
async fn admin_user_is_created_and_promoted_when_requested() {
    let orch = orchestrator(
        FakeCustomers::empty_directory(),
        FakeSubscriptions::default(),
        FakeUsers::default(),
        FakeVerification::issuing("token-abc"),
    );

    let mut cfg = tenant_config("acme.test", "1010020027", 2);
    cfg.manage_customer_users = true;
    cfg.admin = AdminSeed {
        primary_email: "boss@acme.test".to_string(),
        given_name: "Jo".to_string(),
        family_name: "Kim".to_string(),
        password: "hunter2!".to_string(),
    };

    orch.run(&ctx(), &cfg).await.unwrap();

    let inserted = orch.users.inserted.lock().unwrap();
    assert_eq!(inserted[0].primary_email, "boss@acme.test");
    assert_eq!(inserted[0].password, "hunter2!");
    let languages = inserted[0].languages.as_ref().unwrap();
    assert_eq!(languages[0].language_code, "ko");
    assert_eq!(languages[0].preference, "preferred");
    assert_eq!(
        orch.users.admins.lock().unwrap().as_slice(),
        ["boss@acme.test".to_string()]
    );
}

#[tokio::test]
async fn admin_user_defaults_are_filled_in() {
    let orch = orchestrator(
        FakeCustomers::empty_directory(),
        FakeSubscriptions::default(),
        FakeUsers::default(),
        FakeVerification::issuing("token-abc"),
    );

    let mut cfg = tenant_config("acme.test", "1010020027", 2);
    cfg.manage_customer_users = true;
    cfg.admin = AdminSeed::default();

    orch.run(&ctx(), &cfg).await.unwrap();

    let inserted = orch.users.inserted.lock().unwrap();
    assert_eq!(inserted[0].primary_email, "admin@acme.test");
    assert_eq!(inserted[0].name.given_name, "First");
    assert_eq!(inserted[0].name.family_name, "Admin");
    assert!(!inserted[0].password.is_empty());
}

#[tokio::test]
async fn no_user_calls_when_management_is_off() {
    let orch = orchestrator(
        FakeCustomers::empty_directory(),
        FakeSubscriptions::default(),
        FakeUsers::default(),
        FakeVerification::issuing("token-abc"),
    );

    orch.run(&ctx(), &tenant_config("acme.test", "1010020027", 2))
        .await
        .unwrap();

    assert!(orch.users.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn user_creation_failure_is_fatal_for_the_tenant() {
    let users = FakeUsers {
        fail_insert: true,
        ..Default::default()
    };
    let orch = ProvisioningOrchestrator::new(
        FakeCustomers::empty_directory(),
        FakeSubscriptions::default(),
        users,
        FakeVerification::issuing("token-abc"),
        SeatflowConfig::default().provisioning,
    );

    let mut cfg = tenant_config("acme.test", "1010020027", 2);
    cfg.manage_customer_users = true;
    cfg.admin = AdminSeed {
        primary_email: "boss@acme.test".to_string(),
        given_name: "Jo".to_string(),
        family_name: "Kim".to_string(),
        password: "hunter2!".to_string(),
    };

    let error = orch.run(&ctx(), &cfg).await.unwrap_err();
    assert!(matches!(error, ProvisionError::Api(_)));
}
