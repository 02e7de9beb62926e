//! Overtime policy records and update DTOs.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::reference::Reference;
use crate::error::FieldErrors;

/// What happens when an employee's overtime crosses the allocated limit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LimitAction {
    #[default]
    Restrict,
    Allow,
}

impl LimitAction {
    pub const ALL: [LimitAction; 2] = [LimitAction::Restrict, LimitAction::Allow];

    pub fn name(&self) -> &'static str {
        match self {
            LimitAction::Restrict => "Restrict",
            LimitAction::Allow => "Allow",
        }
    }

    /// Parse a select value, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.name().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for LimitAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Policy lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyStatus {
    #[default]
    Active,
    Inactive,
}

impl PolicyStatus {
    pub const ALL: [PolicyStatus; 2] = [PolicyStatus::Active, PolicyStatus::Inactive];

    pub fn name(&self) -> &'static str {
        match self {
            PolicyStatus::Active => "active",
            PolicyStatus::Inactive => "inactive",
        }
    }

    /// Parse a select value, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|st| st.name().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for PolicyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One `(from, to, roundOffTo)` rounding band.
///
/// Fields are private: a rule is fixed once added and can only be removed as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundingRule {
    from: f64,
    to: f64,
    round_off_to: f64,
}

impl RoundingRule {
    /// Build a rule, requiring every value to be a finite number greater than zero.
    ///
    /// Returns one error per offending field (`from`, `to`, `roundOffTo`).
    pub fn try_new(from: f64, to: f64, round_off_to: f64) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::default();
        for (field, label, value) in [
            ("from", "From", from),
            ("to", "To", to),
            ("roundOffTo", "Round off to", round_off_to),
        ] {
            if !(value.is_finite() && value > 0.0) {
                errors.insert(field, format!("{label} must be a positive number"));
            }
        }

        if errors.is_empty() {
            Ok(Self { from, to, round_off_to })
        } else {
            Err(errors)
        }
    }

    pub fn from(&self) -> f64 {
        self.from
    }

    pub fn to(&self) -> f64 {
        self.to
    }

    pub fn round_off_to(&self) -> f64 {
        self.round_off_to
    }
}

/// Flat overtime policy body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OtPolicy {
    pub ot_policy_code: String,
    pub ot_policy_name: String,

    // Pay multipliers
    pub working_day_multiplier: f64,
    pub national_holiday_multiplier: f64,
    pub holiday_multiplier: f64,
    pub weekly_off_multiplier: f64,

    // Hour ceilings
    pub max_ot_hours_per_day: f64,
    pub max_ot_hours_per_week: f64,
    pub max_ot_hours_per_month: f64,
    pub max_ot_hours_per_quarter: f64,
    pub max_ot_hours_per_year: f64,
    pub max_holiday_ot_hours: f64,
    pub max_weekend_ot_hours: f64,
    pub max_weekday_ot_hours: f64,

    // Admission thresholds, in minutes
    pub min_extra_minutes: f64,
    pub min_fixed_minutes: f64,

    pub rounding_enabled: bool,
    pub before_rounding_off: bool,
    pub after_rounding_off: bool,
    pub(crate) rounding: Vec<RoundingRule>,

    pub do_this_when_crossed_allocated_limit: LimitAction,

    pub applicable_on_holiday: bool,
    pub applicable_on_national_holiday: bool,
    pub applicable_on_weekly_off: bool,
    pub applicable_on_working_day: bool,
    pub applicable_before_shift: bool,
    pub applicable_after_shift: bool,

    pub approval_required: bool,
    pub status: PolicyStatus,
    pub remark: String,
}

impl OtPolicy {
    /// Rounding rules in insertion order.
    pub fn rounding(&self) -> &[RoundingRule] {
        &self.rounding
    }
}

/// An overtime policy scoped to a tenant, subsidiary, location and employee categories.
///
/// `id` is `None` until the record has been persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OvertimePolicyApplication {
    pub id: Option<i32>,
    pub organization_code: String,
    pub tenant_code: String,
    pub subsidiary: Option<Reference>,
    pub location: Option<Reference>,
    pub employee_category: BTreeSet<String>,
    pub ot_policy: OtPolicy,
}

impl OvertimePolicyApplication {
    /// Blank record scoped to a tenant.
    pub fn for_tenant(organization_code: impl Into<String>, tenant_code: impl Into<String>) -> Self {
        Self {
            organization_code: organization_code.into(),
            tenant_code: tenant_code.into(),
            ..Default::default()
        }
    }

    /// Whether the record has been persisted.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

/// DTO for updating a stored policy. Only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateOvertimePolicy {
    pub organization_code: Option<String>,
    pub tenant_code: Option<String>,
    pub subsidiary: Option<Option<Reference>>,
    pub location: Option<Option<Reference>>,
    pub employee_category: Option<BTreeSet<String>>,
    pub ot_policy: Option<OtPolicy>,
}

impl UpdateOvertimePolicy {
    /// Merge the changes into an existing record. The id is never touched.
    pub fn apply_to(self, record: &mut OvertimePolicyApplication) {
        if let Some(organization_code) = self.organization_code {
            record.organization_code = organization_code;
        }
        if let Some(tenant_code) = self.tenant_code {
            record.tenant_code = tenant_code;
        }
        if let Some(subsidiary) = self.subsidiary {
            record.subsidiary = subsidiary;
        }
        if let Some(location) = self.location {
            record.location = location;
        }
        if let Some(employee_category) = self.employee_category {
            record.employee_category = employee_category;
        }
        if let Some(ot_policy) = self.ot_policy {
            record.ot_policy = ot_policy;
        }
    }
}

impl From<OvertimePolicyApplication> for UpdateOvertimePolicy {
    /// Every field of the record becomes a change; the identifier is stripped.
    fn from(record: OvertimePolicyApplication) -> Self {
        Self {
            organization_code: Some(record.organization_code),
            tenant_code: Some(record.tenant_code),
            subsidiary: Some(record.subsidiary),
            location: Some(record.location),
            employee_category: Some(record.employee_category),
            ot_policy: Some(record.ot_policy),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let policy = OtPolicy::default();
        assert_eq!(policy.status, PolicyStatus::Active);
        assert_eq!(policy.do_this_when_crossed_allocated_limit, LimitAction::Restrict);
        assert_eq!(policy.working_day_multiplier, 0.0);
        assert!(policy.rounding().is_empty());
        assert!(!policy.approval_required);
    }

    #[test]
    fn test_parse_select_values() {
        assert_eq!(LimitAction::parse("allow"), Some(LimitAction::Allow));
        assert_eq!(PolicyStatus::parse("Inactive"), Some(PolicyStatus::Inactive));
        assert_eq!(PolicyStatus::parse("archived"), None);
    }

    #[test]
    fn test_rounding_rule_requires_positive_values() {
        let errors = RoundingRule::try_new(0.0, 30.0, -1.0).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.contains("from"));
        assert!(errors.contains("roundOffTo"));
        assert!(!errors.contains("to"));

        let rule = RoundingRule::try_new(1.0, 30.0, 15.0).unwrap();
        assert_eq!((rule.from(), rule.to(), rule.round_off_to()), (1.0, 30.0, 15.0));
    }

    #[test]
    fn test_rounding_rule_rejects_nan() {
        let errors = RoundingRule::try_new(f64::NAN, 1.0, 1.0).unwrap_err();
        assert!(errors.contains("from"));
    }

    #[test]
    fn test_serde_wire_names() {
        let mut record = OvertimePolicyApplication::for_tenant("ORG1", "TEN1");
        record.ot_policy.ot_policy_code = "OT1".to_string();
        record.ot_policy.rounding.push(RoundingRule::try_new(1.0, 30.0, 30.0).unwrap());

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["organizationCode"], "ORG1");
        assert_eq!(json["otPolicy"]["otPolicyCode"], "OT1");
        assert_eq!(json["otPolicy"]["status"], "active");
        assert_eq!(json["otPolicy"]["doThisWhenCrossedAllocatedLimit"], "Restrict");
        assert_eq!(json["otPolicy"]["rounding"][0]["roundOffTo"], 30.0);
    }

    #[test]
    fn test_deserialize_partial_record_fills_defaults() {
        let json = r#"{"tenantCode":"T","otPolicy":{"otPolicyName":"Night"}}"#;
        let record: OvertimePolicyApplication = serde_json::from_str(json).unwrap();
        assert_eq!(record.tenant_code, "T");
        assert_eq!(record.ot_policy.ot_policy_name, "Night");
        assert_eq!(record.ot_policy.status, PolicyStatus::Active);
        assert!(record.id.is_none());
    }

    #[test]
    fn test_update_strips_id_and_merges() {
        let mut stored = OvertimePolicyApplication::for_tenant("ORG1", "TEN1");
        stored.id = Some(7);

        let mut edited = stored.clone();
        edited.id = Some(99);
        edited.ot_policy.ot_policy_name = "Edited".to_string();

        UpdateOvertimePolicy::from(edited).apply_to(&mut stored);
        assert_eq!(stored.id, Some(7));
        assert_eq!(stored.ot_policy.ot_policy_name, "Edited");
    }

    #[test]
    fn test_partial_update_leaves_other_fields() {
        let mut stored = OvertimePolicyApplication::for_tenant("ORG1", "TEN1");
        stored.employee_category.insert("WKM".to_string());

        let changes = UpdateOvertimePolicy {
            tenant_code: Some("TEN2".to_string()),
            ..Default::default()
        };
        changes.apply_to(&mut stored);

        assert_eq!(stored.tenant_code, "TEN2");
        assert_eq!(stored.organization_code, "ORG1");
        assert!(stored.employee_category.contains("WKM"));
    }
}
