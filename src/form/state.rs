//! Policy form controller.

use std::sync::Arc;

use tracing::debug;

use super::field::{FieldPath, FieldValue, FormError, RootField};
use crate::error::FieldErrors;
use crate::models::{OvertimePolicyApplication, RoundingRule};

/// Input buffer for the next rounding rule.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RoundingInput {
    pub from: f64,
    pub to: f64,
    pub round_off_to: f64,
}

/// Form state for creating or editing one overtime policy.
///
/// The record sits behind an `Arc` and every change installs a new one, so a
/// caller holding a [`snapshot`](Self::snapshot) can tell whether anything changed
/// with `Arc::ptr_eq`.
#[derive(Debug, Clone)]
pub struct PolicyForm {
    record: Arc<OvertimePolicyApplication>,
    rounding_input: RoundingInput,
    errors: FieldErrors,
}

impl PolicyForm {
    /// Blank form for a new policy.
    pub fn new(defaults: OvertimePolicyApplication) -> Self {
        Self {
            record: Arc::new(defaults),
            rounding_input: RoundingInput::default(),
            errors: FieldErrors::default(),
        }
    }

    /// Form pre-filled for editing a stored policy.
    ///
    /// The stored values win; tenant scoping falls back to `defaults` when the stored
    /// record has none.
    pub fn edit(defaults: OvertimePolicyApplication, initial_values: OvertimePolicyApplication) -> Self {
        let mut record = initial_values;
        if record.organization_code.is_empty() {
            record.organization_code = defaults.organization_code;
        }
        if record.tenant_code.is_empty() {
            record.tenant_code = defaults.tenant_code;
        }
        Self::new(record)
    }

    /// Current record.
    pub fn record(&self) -> &OvertimePolicyApplication {
        &self.record
    }

    /// Shared handle to the current record.
    pub fn snapshot(&self) -> Arc<OvertimePolicyApplication> {
        Arc::clone(&self.record)
    }

    /// Whether this form edits an already stored policy.
    pub fn is_editing(&self) -> bool {
        self.record.is_persisted()
    }

    /// Employee categories and policy fields are enabled once subsidiary and location are chosen.
    pub fn policy_fields_enabled(&self) -> bool {
        self.record.subsidiary.is_some() && self.record.location.is_some()
    }

    /// Field errors currently shown on the form.
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn set_errors(&mut self, errors: FieldErrors) {
        self.errors = errors;
    }

    /// Apply an input change to a dotted field path such as `otPolicy.otPolicyName`.
    ///
    /// On success the field's error, if any, is cleared.
    pub fn set_field(&mut self, path: &str, value: FieldValue) -> Result<(), FormError> {
        let parsed = FieldPath::parse(path)?;
        self.set(parsed, value)
    }

    /// Typed variant of [`set_field`](Self::set_field).
    pub fn set(&mut self, path: FieldPath, value: FieldValue) -> Result<(), FormError> {
        let error_key = match path {
            FieldPath::Root(field) => field.name(),
            FieldPath::Policy(field) => field.name(),
        };

        self.replace(|record| match path {
            FieldPath::Root(field) => field.apply(record, value),
            FieldPath::Policy(field) => field.apply(&mut record.ot_policy, value),
        })?;

        self.errors.remove(error_key);
        Ok(())
    }

    /// Add or remove one employee category code.
    pub fn toggle_employee_category(&mut self, code: &str) {
        let mut codes = self.record.employee_category.clone();
        if !codes.remove(code) {
            codes.insert(code.to_string());
        }
        // Codes always match the employee category field
        let _ = self.set(FieldPath::Root(RootField::EmployeeCategory), FieldValue::Codes(codes));
    }

    pub fn rounding_input(&self) -> RoundingInput {
        self.rounding_input
    }

    pub fn set_rounding_input(&mut self, input: RoundingInput) {
        self.rounding_input = input;
    }

    /// Append a rounding rule built from the input buffer.
    ///
    /// Every value must be greater than zero. On failure nothing changes and the
    /// per-field errors are returned and shown on the form; on success the buffer
    /// is reset to zeros.
    pub fn add_rounding_rule(&mut self) -> Result<(), FieldErrors> {
        let input = self.rounding_input;
        for key in ["from", "to", "roundOffTo"] {
            self.errors.remove(key);
        }

        let rule = match RoundingRule::try_new(input.from, input.to, input.round_off_to) {
            Ok(rule) => rule,
            Err(errors) => {
                self.errors.extend(errors.clone());
                return Err(errors);
            }
        };

        let _ = self.replace(|record| {
            record.ot_policy.rounding.push(rule);
            Ok(())
        });
        self.rounding_input = RoundingInput::default();
        debug!("Added rounding rule {:?}", rule);
        Ok(())
    }

    /// Remove the rounding rule at `index`. Out-of-range indexes change nothing.
    pub fn remove_rounding_rule(&mut self, index: usize) {
        let _ = self.replace(|record| {
            record.ot_policy.rounding = record
                .ot_policy
                .rounding
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != index)
                .map(|(_, rule)| *rule)
                .collect();
            Ok(())
        });
    }

    fn replace(
        &mut self,
        change: impl FnOnce(&mut OvertimePolicyApplication) -> Result<(), FormError>,
    ) -> Result<(), FormError> {
        let mut next = (*self.record).clone();
        change(&mut next)?;
        self.record = Arc::new(next);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PolicyStatus, Reference};

    fn defaults() -> OvertimePolicyApplication {
        OvertimePolicyApplication::for_tenant("ORG1", "TEN1")
    }

    fn rule(from: f64, to: f64, round_off_to: f64) -> RoundingRule {
        RoundingRule::try_new(from, to, round_off_to).unwrap()
    }

    fn form_with_rules(rules: &[(f64, f64, f64)]) -> PolicyForm {
        let mut form = PolicyForm::new(defaults());
        for &(from, to, round_off_to) in rules {
            form.set_rounding_input(RoundingInput { from, to, round_off_to });
            form.add_rounding_rule().unwrap();
        }
        form
    }

    #[test]
    fn test_set_nested_field() {
        let mut form = PolicyForm::new(defaults());
        form.set_field("otPolicy.otPolicyName", FieldValue::Text("Standard OT".to_string()))
            .unwrap();
        assert_eq!(form.record().ot_policy.ot_policy_name, "Standard OT");
    }

    #[test]
    fn test_each_change_installs_new_record() {
        let mut form = PolicyForm::new(defaults());
        let before = form.snapshot();

        form.set_field("otPolicy.remark", FieldValue::Text("x".to_string())).unwrap();
        let after = form.snapshot();

        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(before.ot_policy.remark, "");
        assert_eq!(after.ot_policy.remark, "x");
    }

    #[test]
    fn test_failed_change_keeps_record() {
        let mut form = PolicyForm::new(defaults());
        let before = form.snapshot();

        let err = form
            .set_field("otPolicy.holidayMultiplier", FieldValue::Text("two".to_string()))
            .unwrap_err();
        assert!(matches!(err, FormError::InvalidNumber { .. }));
        assert!(Arc::ptr_eq(&before, &form.snapshot()));
    }

    #[test]
    fn test_policy_fields_enabled_after_scope_selected() {
        let mut form = PolicyForm::new(defaults());
        assert!(!form.policy_fields_enabled());

        form.set_field(
            "subsidiary",
            FieldValue::Reference(Some(Reference::new("SUB001", "Subsidiary One"))),
        )
        .unwrap();
        assert!(!form.policy_fields_enabled());

        form.set_field("location", FieldValue::Reference(Some(Reference::new("LOC001", "Bangalore"))))
            .unwrap();
        assert!(form.policy_fields_enabled());
    }

    #[test]
    fn test_toggle_employee_category() {
        let mut form = PolicyForm::new(defaults());
        form.toggle_employee_category("WKM");
        form.toggle_employee_category("STF");
        form.toggle_employee_category("WKM");

        let codes: Vec<_> = form.record().employee_category.iter().cloned().collect();
        assert_eq!(codes, vec!["STF".to_string()]);
    }

    #[test]
    fn test_change_clears_field_error() {
        let mut form = PolicyForm::new(defaults());
        let mut errors = FieldErrors::default();
        errors.insert("otPolicyCode", "OT policy code is required");
        errors.insert("location", "Location is required");
        form.set_errors(errors);

        form.set_field("otPolicy.otPolicyCode", FieldValue::Text("OT1".to_string()))
            .unwrap();
        assert!(!form.errors().contains("otPolicyCode"));
        assert!(form.errors().contains("location"));
    }

    #[test]
    fn test_add_rule_appends_and_clears_buffer() {
        let mut form = form_with_rules(&[(1.0, 30.0, 30.0)]);
        form.set_rounding_input(RoundingInput {
            from: 31.0,
            to: 60.0,
            round_off_to: 60.0,
        });
        form.add_rounding_rule().unwrap();

        assert_eq!(
            form.record().ot_policy.rounding(),
            &[rule(1.0, 30.0, 30.0), rule(31.0, 60.0, 60.0)]
        );
        assert_eq!(form.rounding_input(), RoundingInput::default());
    }

    #[test]
    fn test_add_rule_with_zero_is_rejected() {
        for (input, field) in [
            (RoundingInput { from: 0.0, to: 30.0, round_off_to: 15.0 }, "from"),
            (RoundingInput { from: 1.0, to: 0.0, round_off_to: 15.0 }, "to"),
            (RoundingInput { from: 1.0, to: 30.0, round_off_to: 0.0 }, "roundOffTo"),
        ] {
            let mut form = form_with_rules(&[(1.0, 10.0, 10.0)]);
            let before = form.record().ot_policy.rounding().to_vec();

            form.set_rounding_input(input);
            let errors = form.add_rounding_rule().unwrap_err();

            assert_eq!(errors.len(), 1);
            assert!(errors.contains(field));
            assert!(form.errors().contains(field));
            assert_eq!(form.record().ot_policy.rounding(), before.as_slice());
            assert_eq!(form.rounding_input(), input);
        }
    }

    #[test]
    fn test_successful_add_clears_previous_rule_errors() {
        let mut form = PolicyForm::new(defaults());
        form.set_rounding_input(RoundingInput::default());
        assert_eq!(form.add_rounding_rule().unwrap_err().len(), 3);

        form.set_rounding_input(RoundingInput {
            from: 1.0,
            to: 2.0,
            round_off_to: 3.0,
        });
        form.add_rounding_rule().unwrap();
        assert!(form.errors().is_empty());
    }

    #[test]
    fn test_remove_rule_keeps_order() {
        let mut form = form_with_rules(&[(1.0, 10.0, 10.0), (11.0, 20.0, 20.0), (21.0, 30.0, 30.0)]);
        form.remove_rounding_rule(1);

        assert_eq!(
            form.record().ot_policy.rounding(),
            &[rule(1.0, 10.0, 10.0), rule(21.0, 30.0, 30.0)]
        );
    }

    #[test]
    fn test_remove_rule_out_of_range_is_noop() {
        let mut form = form_with_rules(&[(1.0, 10.0, 10.0)]);
        form.remove_rounding_rule(5);
        assert_eq!(form.record().ot_policy.rounding().len(), 1);
    }

    #[test]
    fn test_edit_keeps_id_and_falls_back_to_default_scope() {
        let mut stored = OvertimePolicyApplication::default();
        stored.id = Some(3);
        stored.ot_policy.status = PolicyStatus::Inactive;

        let form = PolicyForm::edit(defaults(), stored);
        assert!(form.is_editing());
        assert_eq!(form.record().organization_code, "ORG1");
        assert_eq!(form.record().tenant_code, "TEN1");
        assert_eq!(form.record().ot_policy.status, PolicyStatus::Inactive);
    }
}
