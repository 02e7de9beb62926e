use super::*;
use crate::form::{FieldValue, RoundingInput};
use crate::models::{LimitAction, PolicyStatus, Reference};
use crate::store::LocalStore;

fn store() -> PolicyStore {
    PolicyStore::Local(LocalStore::in_memory())
}

fn defaults() -> OvertimePolicyApplication {
    OvertimePolicyApplication::for_tenant("ORG1", "TEN1")
}

/// Form filled with the five required fields and nothing else.
fn filled_form() -> PolicyForm {
    let mut form = PolicyForm::new(defaults());
    form.set_field(
        "subsidiary",
        FieldValue::Reference(Some(Reference::new("SUB001", "Subsidiary One"))),
    )
    .unwrap();
    form.set_field("location", FieldValue::Reference(Some(Reference::new("LOC001", "Bangalore"))))
        .unwrap();
    form.toggle_employee_category("WKM");
    form.set_field("otPolicy.otPolicyCode", FieldValue::Text("OT1".to_string()))
        .unwrap();
    form.set_field("otPolicy.otPolicyName", FieldValue::Text("Standard OT".to_string()))
        .unwrap();
    form
}

#[tokio::test]
async fn test_standard_policy_scenario() {
    let store = store();
    let mut form = filled_form();

    let records = match submit(&store, &mut form).await.unwrap() {
        Submission::Saved(records) => records,
        Submission::Rejected(errors) => panic!("unexpected errors: {errors}"),
    };

    assert!(form.errors().is_empty());
    assert_eq!(records.len(), 1);

    let saved = &records[0];
    assert_eq!(saved.subsidiary, Some(Reference::new("SUB001", "Subsidiary One")));
    assert_eq!(saved.location, Some(Reference::new("LOC001", "Bangalore")));
    assert!(saved.employee_category.contains("WKM"));
    assert_eq!(saved.ot_policy.ot_policy_code, "OT1");
    assert_eq!(saved.ot_policy.ot_policy_name, "Standard OT");
    assert_eq!(saved.ot_policy.status, PolicyStatus::Active);
    assert_eq!(saved.ot_policy.do_this_when_crossed_allocated_limit, LimitAction::Restrict);
    assert_eq!(saved.ot_policy.working_day_multiplier, 0.0);
}

#[tokio::test]
async fn test_saved_record_matches_form_apart_from_id() {
    let store = store();
    let mut form = filled_form();
    form.set_field("otPolicy.holidayMultiplier", FieldValue::Number(2.0)).unwrap();
    form.set_field("otPolicy.maxOtHoursPerWeek", FieldValue::Text("-4".to_string()))
        .unwrap();
    form.set_field("otPolicy.approvalRequired", FieldValue::Checked(true)).unwrap();
    form.set_rounding_input(RoundingInput {
        from: 1.0,
        to: 30.0,
        round_off_to: 30.0,
    });
    form.add_rounding_rule().unwrap();

    let submitted = form.record().clone();
    let Submission::Saved(records) = submit(&store, &mut form).await.unwrap() else {
        panic!("form should be accepted");
    };

    let mut saved = records[0].clone();
    assert!(saved.id.is_some());
    saved.id = None;
    assert_eq!(saved, submitted);
}

#[tokio::test]
async fn test_rejected_form_never_reaches_store() {
    let store = store();
    let mut form = filled_form();
    form.set_field("location", FieldValue::Reference(None)).unwrap();
    form.set_field("otPolicy.otPolicyName", FieldValue::Text("  ".to_string()))
        .unwrap();

    let Submission::Rejected(errors) = submit(&store, &mut form).await.unwrap() else {
        panic!("form should be rejected");
    };

    assert_eq!(errors.len(), 2);
    assert!(errors.contains("location"));
    assert!(errors.contains("otPolicyName"));
    assert_eq!(form.errors(), &errors);
    assert!(store.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_blank_form_reports_every_required_field() {
    let store = store();
    let mut form = PolicyForm::new(defaults());

    let Submission::Rejected(errors) = submit(&store, &mut form).await.unwrap() else {
        panic!("form should be rejected");
    };
    assert_eq!(errors.len(), 5);
    assert!(store.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_edit_keeps_count_and_updates_values() {
    let store = store();
    submit(&store, &mut filled_form()).await.unwrap();

    let stored = store.list_all().await.unwrap().remove(0);
    let mut form = PolicyForm::edit(defaults(), stored);
    form.set_field("otPolicy.status", FieldValue::Text("inactive".to_string()))
        .unwrap();
    form.set_field("otPolicy.otPolicyName", FieldValue::Text("Night OT".to_string()))
        .unwrap();

    let Submission::Saved(records) = submit(&store, &mut form).await.unwrap() else {
        panic!("form should be accepted");
    };

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, Some(1));
    assert_eq!(records[0].ot_policy.ot_policy_name, "Night OT");
    assert_eq!(records[0].ot_policy.status, PolicyStatus::Inactive);
}

#[tokio::test]
async fn test_remove_deletes_exactly_one() {
    let store = store();
    for code in ["OT1", "OT2", "OT3"] {
        let mut form = filled_form();
        form.set_field("otPolicy.otPolicyCode", FieldValue::Text(code.to_string()))
            .unwrap();
        submit(&store, &mut form).await.unwrap();
    }

    let records = remove(&store, 2).await.unwrap();
    let codes: Vec<_> = records.iter().map(|r| r.ot_policy.ot_policy_code.as_str()).collect();
    assert_eq!(codes, vec!["OT1", "OT3"]);

    let records = remove(&store, 2).await.unwrap();
    assert_eq!(records.len(), 2);
}

#[test]
fn test_prepare_clears_stale_errors() {
    let mut form = PolicyForm::new(defaults());
    assert!(prepare(&mut form).is_err());
    assert_eq!(form.errors().len(), 5);

    let mut form = filled_form();
    let mut stale = FieldErrors::default();
    stale.insert("from", "From must be a positive number");
    form.set_errors(stale);

    let record = prepare(&mut form).unwrap();
    assert!(form.errors().is_empty());
    assert_eq!(record.ot_policy.ot_policy_code, "OT1");
}
