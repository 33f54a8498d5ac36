use serde::{Deserialize, Serialize};

/// Customer record as the reseller API returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub customer_id: String,
    pub customer_domain: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternate_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_address: Option<PostalAddress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostalAddress {
    pub contact_name: String,
    pub organization_name: String,
    pub region: String,
    pub postal_code: String,
    pub country_code: String,
    pub address_line1: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerRequest {
    pub customer_domain: String,
    pub alternate_email: String,
    pub postal_address: PostalAddress,
}

/// Subscription record. `seats` and `trial_settings` are absent on some
/// plans, so both stay optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub subscription_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    pub sku_id: String,
    pub plan: PlanInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seats: Option<Seats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trial_settings: Option<TrialSettings>,
}

impl Subscription {
    pub fn plan_name(&self) -> &str {
        &self.plan.plan_name
    }

    pub fn trial_end_time(&self) -> Option<&str> {
        self.trial_settings
            .as_ref()
            .and_then(|t| t.trial_end_time.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanInfo {
    pub plan_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_in_trial: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trial_end_time: Option<String>,
}

/// Seat counts. Creation caps with `maximum_number_of_seats`; plan changes
/// commit with `number_of_seats`. Only the relevant field is serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_number_of_seats: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_seats: Option<u32>,
}

impl Seats {
    /// Seat cap used when creating a trial subscription.
    pub fn cap(maximum: u32) -> Self {
        Self {
            maximum_number_of_seats: Some(maximum),
            number_of_seats: None,
        }
    }

    /// Committed seat count used when changing to an annual plan.
    pub fn committed(count: u32) -> Self {
        Self {
            maximum_number_of_seats: None,
            number_of_seats: Some(count),
        }
    }
}

/// Subscription creation. `seats` must be absent for FLEXIBLE requests,
/// which `Option` + `skip_serializing_if` guarantees on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubscriptionRequest {
    pub customer_id: String,
    pub sku_id: String,
    pub plan: PlanInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seats: Option<Seats>,
}

/// Plan change carries only the target plan and seat commitment. Renewal
/// settings travel in their own request; the API rejects mixed shapes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePlanRequest {
    pub plan_name: String,
    pub seats: Seats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenewalSettings {
    pub renewal_type: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionList {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscriptions: Option<Vec<Subscription>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub primary_email: String,
    pub name: UserName,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<UserLanguage>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserName {
    pub given_name: String,
    pub family_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLanguage {
    pub language_code: String,
    pub preference: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub primary_email: String,
    pub name: UserName,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<UserLanguage>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MakeAdminRequest {
    pub status: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flexible_request_serializes_without_seats() {
        let req = CreateSubscriptionRequest {
            customer_id: "C123".into(),
            sku_id: "1010020027".into(),
            plan: PlanInfo {
                plan_name: "FLEXIBLE".into(),
            },
            seats: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("seats").is_none());
    }

    #[test]
    fn trial_request_serializes_seat_cap_only() {
        let req = CreateSubscriptionRequest {
            customer_id: "C123".into(),
            sku_id: "1010020027".into(),
            plan: PlanInfo {
                plan_name: "TRIAL".into(),
            },
            seats: Some(Seats::cap(5)),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["seats"]["maximumNumberOfSeats"], 5);
        assert!(json["seats"].get("numberOfSeats").is_none());
    }

    #[test]
    fn change_plan_request_cannot_express_renewal_fields() {
        let req = ChangePlanRequest {
            plan_name: "ANNUAL_MONTHLY_PAY".into(),
            seats: Seats::committed(10),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["seats"]["numberOfSeats"], 10);
        assert!(json.get("renewalType").is_none());
    }
}
