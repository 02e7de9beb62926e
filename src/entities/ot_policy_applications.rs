//! `ot_policy_applications` table.
//!
//! Scope columns are flat; the category set and the policy body are stored as JSONB
//! in their wire (camelCase) form.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ot_policy_applications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub organization_code: String,
    pub tenant_code: String,
    pub subsidiary_code: Option<String>,
    pub subsidiary_name: Option<String>,
    pub location_code: Option<String>,
    pub location_name: Option<String>,
    /// Array of employee category codes.
    #[sea_orm(column_type = "JsonBinary")]
    pub employee_category: Json,
    /// `OtPolicy` object.
    #[sea_orm(column_type = "JsonBinary")]
    pub ot_policy: Json,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
