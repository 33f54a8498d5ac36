//! Tiered fallback behavior of subscription creation.

mod common;

use common::{subscription, tenant_config, FakeSubscriptions};
use seatflow::provisioning::{create_if_absent, ProvisionError, TenantContext};
use seatflow::reseller::ApiError;

fn ctx() -> TenantContext {
    TenantContext::new(2, "acme.test")
}

#[tokio::test]
async fn trial_creation_succeeds_first() {
    let subs = FakeSubscriptions::default();
    let cfg = tenant_config("acme.test", "1010020027", 5);

    let created = create_if_absent(&subs, &ctx(), "C1", &cfg)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(created.plan_name(), "TRIAL");
    assert_eq!(subs.call_log(), vec!["insert"]);

    let requests = subs.insert_requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let seats = requests[0].seats.as_ref().expect("trial carries a seat cap");
    assert_eq!(seats.maximum_number_of_seats, Some(5));
    assert_eq!(seats.number_of_seats, None);
}

#[tokio::test]
async fn trial_conflict_recovers_first_existing_subscription() {
    let subs = FakeSubscriptions::scripted(vec![Err(ApiError::Conflict)]);
    subs.listed.lock().unwrap().extend([
        subscription("sub-1", "1010020027", "TRIAL"),
        subscription("sub-2", "1010020027", "FLEXIBLE"),
    ]);
    let cfg = tenant_config("acme.test", "1010020027", 5);

    let recovered = create_if_absent(&subs, &ctx(), "C1", &cfg)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(recovered.subscription_id, "sub-1");
    // Exactly one creation attempt; conflict is recovery, not retry fuel.
    assert_eq!(subs.call_log(), vec!["insert", "list"]);
}

#[tokio::test]
async fn second_run_reuses_the_subscription_created_by_the_first() {
    let cfg = tenant_config("acme.test", "1010020027", 5);

    let first_run = FakeSubscriptions::default();
    let created = create_if_absent(&first_run, &ctx(), "C1", &cfg)
        .await
        .unwrap()
        .unwrap();

    let second_run = FakeSubscriptions::scripted(vec![Err(ApiError::Conflict)]);
    second_run.listed.lock().unwrap().push(created.clone());
    let reused = create_if_absent(&second_run, &ctx(), "C1", &cfg)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(reused.subscription_id, created.subscription_id);
}

#[tokio::test]
async fn trial_failure_falls_back_to_flexible_without_seats() {
    let subs = FakeSubscriptions::scripted(vec![
        Err(ApiError::Upstream {
            status: 400,
            message: "sku does not support trial".into(),
        }),
        Ok(subscription("sub-flex", "1010020027", "FLEXIBLE")),
    ]);
    let cfg = tenant_config("acme.test", "1010020027", 5);

    let created = create_if_absent(&subs, &ctx(), "C1", &cfg)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(created.subscription_id, "sub-flex");
    assert_eq!(subs.call_log(), vec!["insert", "insert"]);

    let requests = subs.insert_requests.lock().unwrap();
    assert_eq!(requests[0].plan.plan_name, "TRIAL");
    assert!(requests[0].seats.is_some());
    assert_eq!(requests[1].plan.plan_name, "FLEXIBLE");
    assert!(
        requests[1].seats.is_none(),
        "flexible requests must not carry seats"
    );
}

#[tokio::test]
async fn flexible_conflict_recovers_like_trial_conflict() {
    let subs = FakeSubscriptions::scripted(vec![
        Err(ApiError::Upstream {
            status: 400,
            message: "no trial".into(),
        }),
        Err(ApiError::Conflict),
    ]);
    subs.listed
        .lock()
        .unwrap()
        .push(subscription("sub-existing", "1010020027", "FLEXIBLE"));
    let cfg = tenant_config("acme.test", "1010020027", 3);

    let recovered = create_if_absent(&subs, &ctx(), "C1", &cfg)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(recovered.subscription_id, "sub-existing");
    assert_eq!(subs.call_log(), vec!["insert", "insert", "list"]);
}

#[tokio::test]
async fn flexible_failure_is_fatal_for_the_tenant() {
    let subs = FakeSubscriptions::scripted(vec![
        Err(ApiError::Upstream {
            status: 400,
            message: "no trial".into(),
        }),
        Err(ApiError::Upstream {
            status: 400,
            message: "sku not resellable".into(),
        }),
    ]);
    let cfg = tenant_config("acme.test", "1010020027", 3);

    let error = create_if_absent(&subs, &ctx(), "C1", &cfg)
        .await
        .unwrap_err();
    assert!(matches!(
        error,
        ProvisionError::Api(ApiError::Upstream { status: 400, .. })
    ));
}

#[tokio::test]
async fn conflict_with_empty_listing_yields_none() {
    let subs = FakeSubscriptions::scripted(vec![Err(ApiError::Conflict)]);
    let cfg = tenant_config("acme.test", "1010020027", 1);

    let outcome = create_if_absent(&subs, &ctx(), "C1", &cfg).await.unwrap();
    assert!(outcome.is_none());
}
