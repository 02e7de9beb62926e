//! Overtime policy repository with CRUD operations.

use std::collections::BTreeSet;

use chrono::Utc;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::*;

use crate::entities::{ot_policy_applications, prelude::*};
use crate::error::Result;
use crate::models::{OtPolicy, OvertimePolicyApplication, Reference, UpdateOvertimePolicy};

/// List all policies in insertion order.
pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<OvertimePolicyApplication>> {
    let models = OtPolicyApplications::find()
        .order_by_asc(ot_policy_applications::Column::Id)
        .all(db)
        .await?;

    models.into_iter().map(to_record).collect()
}

/// Get policy by ID.
pub async fn get_by_id(db: &DatabaseConnection, id: i32) -> Result<Option<OvertimePolicyApplication>> {
    OtPolicyApplications::find_by_id(id)
        .one(db)
        .await?
        .map(to_record)
        .transpose()
}

/// Insert a new policy. Any id on the record is ignored; the database assigns one.
pub async fn create(db: &DatabaseConnection, record: OvertimePolicyApplication) -> Result<OvertimePolicyApplication> {
    let now: DateTimeWithTimeZone = Utc::now().into();
    let (subsidiary_code, subsidiary_name) = split_reference(record.subsidiary);
    let (location_code, location_name) = split_reference(record.location);

    let model = ot_policy_applications::ActiveModel {
        organization_code: Set(record.organization_code),
        tenant_code: Set(record.tenant_code),
        subsidiary_code: Set(subsidiary_code),
        subsidiary_name: Set(subsidiary_name),
        location_code: Set(location_code),
        location_name: Set(location_name),
        employee_category: Set(serde_json::to_value(&record.employee_category)?),
        ot_policy: Set(serde_json::to_value(&record.ot_policy)?),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let inserted = model.insert(db).await?;
    to_record(inserted)
}

/// Update an existing policy, writing only the fields present in `data`.
pub async fn update(
    db: &DatabaseConnection,
    id: i32,
    data: UpdateOvertimePolicy,
) -> Result<Option<OvertimePolicyApplication>> {
    let existing = OtPolicyApplications::find_by_id(id).one(db).await?;

    match existing {
        Some(model) => {
            let mut active: ot_policy_applications::ActiveModel = model.into();

            if let Some(organization_code) = data.organization_code {
                active.organization_code = Set(organization_code);
            }
            if let Some(tenant_code) = data.tenant_code {
                active.tenant_code = Set(tenant_code);
            }
            if let Some(subsidiary) = data.subsidiary {
                let (code, name) = split_reference(subsidiary);
                active.subsidiary_code = Set(code);
                active.subsidiary_name = Set(name);
            }
            if let Some(location) = data.location {
                let (code, name) = split_reference(location);
                active.location_code = Set(code);
                active.location_name = Set(name);
            }
            if let Some(employee_category) = data.employee_category {
                active.employee_category = Set(serde_json::to_value(&employee_category)?);
            }
            if let Some(ot_policy) = data.ot_policy {
                active.ot_policy = Set(serde_json::to_value(&ot_policy)?);
            }
            active.updated_at = Set(Utc::now().into());

            let updated = active.update(db).await?;
            Ok(Some(to_record(updated)?))
        }
        None => Ok(None),
    }
}

/// Delete a policy by ID.
pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<bool> {
    let result = OtPolicyApplications::delete_by_id(id).exec(db).await?;
    Ok(result.rows_affected > 0)
}

/// Convert a row into the domain record.
pub fn to_record(model: ot_policy_applications::Model) -> Result<OvertimePolicyApplication> {
    let employee_category: BTreeSet<String> = serde_json::from_value(model.employee_category)?;
    let ot_policy: OtPolicy = serde_json::from_value(model.ot_policy)?;

    Ok(OvertimePolicyApplication {
        id: Some(model.id),
        organization_code: model.organization_code,
        tenant_code: model.tenant_code,
        subsidiary: join_reference(model.subsidiary_code, model.subsidiary_name),
        location: join_reference(model.location_code, model.location_name),
        employee_category,
        ot_policy,
    })
}

fn split_reference(reference: Option<Reference>) -> (Option<String>, Option<String>) {
    match reference {
        Some(r) => (Some(r.code), Some(r.name)),
        None => (None, None),
    }
}

fn join_reference(code: Option<String>, name: Option<String>) -> Option<Reference> {
    code.map(|code| Reference {
        code,
        name: name.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LimitAction, PolicyStatus};
    use serde_json::json;

    fn row(ot_policy: serde_json::Value) -> ot_policy_applications::Model {
        let now: DateTimeWithTimeZone = Utc::now().into();
        ot_policy_applications::Model {
            id: 12,
            organization_code: "ORG1".to_string(),
            tenant_code: "TEN1".to_string(),
            subsidiary_code: Some("SUB001".to_string()),
            subsidiary_name: Some("Subsidiary One".to_string()),
            location_code: Some("LOC001".to_string()),
            location_name: None,
            employee_category: json!(["WKM", "STF"]),
            ot_policy,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_to_record() {
        let record = to_record(row(json!({
            "otPolicyCode": "OT1",
            "otPolicyName": "Standard OT",
            "holidayMultiplier": 2.0,
            "rounding": [{"from": 1.0, "to": 30.0, "roundOffTo": 30.0}],
            "doThisWhenCrossedAllocatedLimit": "Allow"
        })))
        .unwrap();

        assert_eq!(record.id, Some(12));
        assert_eq!(record.subsidiary, Some(Reference::new("SUB001", "Subsidiary One")));
        assert_eq!(record.location, Some(Reference::new("LOC001", "")));
        assert_eq!(record.employee_category.len(), 2);
        assert_eq!(record.ot_policy.holiday_multiplier, 2.0);
        assert_eq!(record.ot_policy.rounding().len(), 1);
        assert_eq!(record.ot_policy.do_this_when_crossed_allocated_limit, LimitAction::Allow);
        assert_eq!(record.ot_policy.status, PolicyStatus::Active);
    }

    #[test]
    fn test_to_record_rejects_malformed_policy() {
        let result = to_record(row(json!({"status": "archived"})));
        assert!(result.is_err());
    }

    #[test]
    fn test_split_and_join_reference() {
        let (code, name) = split_reference(Some(Reference::new("LOC001", "Bangalore")));
        assert_eq!(join_reference(code, name), Some(Reference::new("LOC001", "Bangalore")));
        assert_eq!(split_reference(None), (None, None));
        assert_eq!(join_reference(None, Some("orphan".to_string())), None);
    }
}
