//! Canonical plan names and alias normalization.

use super::ProvisionError;

/// The four plan identifiers the subscription API accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanName {
    Trial,
    Flexible,
    AnnualMonthlyPay,
    AnnualYearlyPay,
}

impl PlanName {
    /// Map a user-supplied plan string to a canonical identifier.
    /// Canonical values pass through unchanged; widely used aliases are
    /// accepted; everything else is rejected with the accepted set in the
    /// message. Trimmed and case-insensitive.
    pub fn normalize(raw: &str) -> Result<Self, ProvisionError> {
        match raw.trim().to_uppercase().as_str() {
            "TRIAL" => Ok(PlanName::Trial),
            "FLEXIBLE" | "FLEX" => Ok(PlanName::Flexible),
            "ANNUAL_MONTHLY_PAY" | "ANNUAL" | "ANNUAL_MONTHLY" | "ANNUAL-MONTHLY" => {
                Ok(PlanName::AnnualMonthlyPay)
            }
            "ANNUAL_YEARLY_PAY" | "ANNUAL_YEARLY" | "ANNUAL-YEARLY" => Ok(PlanName::AnnualYearlyPay),
            _ => Err(ProvisionError::UnknownPlanName(raw.trim().to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanName::Trial => "TRIAL",
            PlanName::Flexible => "FLEXIBLE",
            PlanName::AnnualMonthlyPay => "ANNUAL_MONTHLY_PAY",
            PlanName::AnnualYearlyPay => "ANNUAL_YEARLY_PAY",
        }
    }

    /// Plan changes are reserved for committing to an annual term.
    pub fn is_annual_commitment(&self) -> bool {
        matches!(self, PlanName::AnnualMonthlyPay | PlanName::AnnualYearlyPay)
    }
}

impl std::fmt::Display for PlanName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
