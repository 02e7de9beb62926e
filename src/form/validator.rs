//! Submit-time validation of a policy form.

use crate::error::FieldErrors;
use crate::models::OvertimePolicyApplication;

/// Check the fields a policy cannot be saved without.
///
/// Only scope (subsidiary, location, at least one employee category) and identity
/// (policy code and name) are checked. Multipliers, hour caps, thresholds and flags
/// are accepted as entered, including zero and negative values.
pub fn validate(form: &OvertimePolicyApplication) -> FieldErrors {
    let mut errors = FieldErrors::default();

    if form.subsidiary.is_none() {
        errors.insert("subsidiary", "Subsidiary is required");
    }
    if form.location.is_none() {
        errors.insert("location", "Location is required");
    }
    if form.employee_category.is_empty() {
        errors.insert("employeeCategory", "Select at least one employee category");
    }
    if form.ot_policy.ot_policy_code.trim().is_empty() {
        errors.insert("otPolicyCode", "OT policy code is required");
    }
    if form.ot_policy.ot_policy_name.trim().is_empty() {
        errors.insert("otPolicyName", "OT policy name is required");
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OtPolicy, Reference};

    fn complete() -> OvertimePolicyApplication {
        let mut form = OvertimePolicyApplication::for_tenant("ORG1", "TEN1");
        form.subsidiary = Some(Reference::new("SUB001", "Subsidiary One"));
        form.location = Some(Reference::new("LOC001", "Bangalore"));
        form.employee_category.insert("WKM".to_string());
        form.ot_policy.ot_policy_code = "OT1".to_string();
        form.ot_policy.ot_policy_name = "Standard OT".to_string();
        form
    }

    #[test]
    fn test_complete_form_passes() {
        assert!(validate(&complete()).is_empty());
    }

    #[test]
    fn test_empty_form_reports_all_five_fields() {
        let errors = validate(&OvertimePolicyApplication::default());
        assert_eq!(errors.len(), 5);
        for field in ["subsidiary", "location", "employeeCategory", "otPolicyCode", "otPolicyName"] {
            assert!(errors.contains(field), "missing error for {field}");
        }
    }

    #[test]
    fn test_each_required_field_alone() {
        let cases: [(&str, fn(&mut OvertimePolicyApplication)); 5] = [
            ("subsidiary", |f| f.subsidiary = None),
            ("location", |f| f.location = None),
            ("employeeCategory", |f| f.employee_category.clear()),
            ("otPolicyCode", |f| f.ot_policy.ot_policy_code.clear()),
            ("otPolicyName", |f| f.ot_policy.ot_policy_name = "   ".to_string()),
        ];

        for (field, break_it) in cases {
            let mut form = complete();
            break_it(&mut form);
            let errors = validate(&form);
            assert_eq!(errors.len(), 1, "{field}");
            assert!(errors.contains(field));
        }
    }

    #[test]
    fn test_other_fields_are_not_checked() {
        let mut form = complete();
        form.ot_policy = OtPolicy {
            ot_policy_code: "OT1".to_string(),
            ot_policy_name: "Standard OT".to_string(),
            working_day_multiplier: 0.0,
            holiday_multiplier: -2.0,
            max_ot_hours_per_day: -8.0,
            max_ot_hours_per_year: -1.0,
            min_extra_minutes: -15.0,
            ..Default::default()
        };

        assert!(validate(&form).is_empty());
    }
}
