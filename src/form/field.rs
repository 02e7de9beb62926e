//! Field paths and input values accepted by the policy form.
//!
//! Paths use the record's wire names: root fields such as `subsidiary`, or one
//! level of nesting under `otPolicy` such as `otPolicy.otPolicyName`.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::models::{LimitAction, OtPolicy, OvertimePolicyApplication, PolicyStatus, Reference};

/// Errors from applying an input to the form.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormError {
    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Field {0} cannot be set directly")]
    ReadOnly(String),

    #[error("Field {field} expects {expected}")]
    TypeMismatch { field: String, expected: &'static str },

    #[error("Field {field}: '{input}' is not a number")]
    InvalidNumber { field: String, input: String },

    #[error("Field {field}: '{input}' is not a valid option")]
    InvalidOption { field: String, input: String },
}

/// Raw value coming from an input widget.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Text box, select or number input content.
    Text(String),
    Number(f64),
    /// Checkbox state.
    Checked(bool),
    /// Single-select reference list; `None` clears the selection.
    Reference(Option<Reference>),
    /// Multi-select codes.
    Codes(BTreeSet<String>),
}

/// Top-level fields of [`OvertimePolicyApplication`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootField {
    OrganizationCode,
    TenantCode,
    Subsidiary,
    Location,
    EmployeeCategory,
}

impl RootField {
    pub const ALL: [RootField; 5] = [
        RootField::OrganizationCode,
        RootField::TenantCode,
        RootField::Subsidiary,
        RootField::Location,
        RootField::EmployeeCategory,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RootField::OrganizationCode => "organizationCode",
            RootField::TenantCode => "tenantCode",
            RootField::Subsidiary => "subsidiary",
            RootField::Location => "location",
            RootField::EmployeeCategory => "employeeCategory",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    pub(crate) fn apply(self, record: &mut OvertimePolicyApplication, value: FieldValue) -> Result<(), FormError> {
        match (self, value) {
            (RootField::OrganizationCode, FieldValue::Text(s)) => record.organization_code = s,
            (RootField::TenantCode, FieldValue::Text(s)) => record.tenant_code = s,
            (RootField::Subsidiary, FieldValue::Reference(r)) => record.subsidiary = r,
            (RootField::Location, FieldValue::Reference(r)) => record.location = r,
            (RootField::EmployeeCategory, FieldValue::Codes(codes)) => record.employee_category = codes,
            (field, _) => {
                let expected = match field {
                    RootField::OrganizationCode | RootField::TenantCode => "text",
                    RootField::Subsidiary | RootField::Location => "a reference selection",
                    RootField::EmployeeCategory => "a set of category codes",
                };
                return Err(FormError::TypeMismatch {
                    field: field.name().to_string(),
                    expected,
                });
            }
        }
        Ok(())
    }
}

/// Kind of input a policy field takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Flag,
    Limit,
    Status,
}

/// Fields of [`OtPolicy`] settable through the form. `rounding` is edited through
/// the rounding operations instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyField {
    OtPolicyCode,
    OtPolicyName,
    WorkingDayMultiplier,
    NationalHolidayMultiplier,
    HolidayMultiplier,
    WeeklyOffMultiplier,
    MaxOtHoursPerDay,
    MaxOtHoursPerWeek,
    MaxOtHoursPerMonth,
    MaxOtHoursPerQuarter,
    MaxOtHoursPerYear,
    MaxHolidayOtHours,
    MaxWeekendOtHours,
    MaxWeekdayOtHours,
    MinExtraMinutes,
    MinFixedMinutes,
    RoundingEnabled,
    BeforeRoundingOff,
    AfterRoundingOff,
    DoThisWhenCrossedAllocatedLimit,
    ApplicableOnHoliday,
    ApplicableOnNationalHoliday,
    ApplicableOnWeeklyOff,
    ApplicableOnWorkingDay,
    ApplicableBeforeShift,
    ApplicableAfterShift,
    ApprovalRequired,
    Status,
    Remark,
}

enum Slot<'a> {
    Text(&'a mut String),
    Number(&'a mut f64),
    Flag(&'a mut bool),
    Limit(&'a mut LimitAction),
    Status(&'a mut PolicyStatus),
}

impl PolicyField {
    pub const ALL: [PolicyField; 29] = [
        PolicyField::OtPolicyCode,
        PolicyField::OtPolicyName,
        PolicyField::WorkingDayMultiplier,
        PolicyField::NationalHolidayMultiplier,
        PolicyField::HolidayMultiplier,
        PolicyField::WeeklyOffMultiplier,
        PolicyField::MaxOtHoursPerDay,
        PolicyField::MaxOtHoursPerWeek,
        PolicyField::MaxOtHoursPerMonth,
        PolicyField::MaxOtHoursPerQuarter,
        PolicyField::MaxOtHoursPerYear,
        PolicyField::MaxHolidayOtHours,
        PolicyField::MaxWeekendOtHours,
        PolicyField::MaxWeekdayOtHours,
        PolicyField::MinExtraMinutes,
        PolicyField::MinFixedMinutes,
        PolicyField::RoundingEnabled,
        PolicyField::BeforeRoundingOff,
        PolicyField::AfterRoundingOff,
        PolicyField::DoThisWhenCrossedAllocatedLimit,
        PolicyField::ApplicableOnHoliday,
        PolicyField::ApplicableOnNationalHoliday,
        PolicyField::ApplicableOnWeeklyOff,
        PolicyField::ApplicableOnWorkingDay,
        PolicyField::ApplicableBeforeShift,
        PolicyField::ApplicableAfterShift,
        PolicyField::ApprovalRequired,
        PolicyField::Status,
        PolicyField::Remark,
    ];

    /// Wire name, as used after `otPolicy.` in a path.
    pub fn name(&self) -> &'static str {
        match self {
            PolicyField::OtPolicyCode => "otPolicyCode",
            PolicyField::OtPolicyName => "otPolicyName",
            PolicyField::WorkingDayMultiplier => "workingDayMultiplier",
            PolicyField::NationalHolidayMultiplier => "nationalHolidayMultiplier",
            PolicyField::HolidayMultiplier => "holidayMultiplier",
            PolicyField::WeeklyOffMultiplier => "weeklyOffMultiplier",
            PolicyField::MaxOtHoursPerDay => "maxOtHoursPerDay",
            PolicyField::MaxOtHoursPerWeek => "maxOtHoursPerWeek",
            PolicyField::MaxOtHoursPerMonth => "maxOtHoursPerMonth",
            PolicyField::MaxOtHoursPerQuarter => "maxOtHoursPerQuarter",
            PolicyField::MaxOtHoursPerYear => "maxOtHoursPerYear",
            PolicyField::MaxHolidayOtHours => "maxHolidayOtHours",
            PolicyField::MaxWeekendOtHours => "maxWeekendOtHours",
            PolicyField::MaxWeekdayOtHours => "maxWeekdayOtHours",
            PolicyField::MinExtraMinutes => "minExtraMinutes",
            PolicyField::MinFixedMinutes => "minFixedMinutes",
            PolicyField::RoundingEnabled => "roundingEnabled",
            PolicyField::BeforeRoundingOff => "beforeRoundingOff",
            PolicyField::AfterRoundingOff => "afterRoundingOff",
            PolicyField::DoThisWhenCrossedAllocatedLimit => "doThisWhenCrossedAllocatedLimit",
            PolicyField::ApplicableOnHoliday => "applicableOnHoliday",
            PolicyField::ApplicableOnNationalHoliday => "applicableOnNationalHoliday",
            PolicyField::ApplicableOnWeeklyOff => "applicableOnWeeklyOff",
            PolicyField::ApplicableOnWorkingDay => "applicableOnWorkingDay",
            PolicyField::ApplicableBeforeShift => "applicableBeforeShift",
            PolicyField::ApplicableAfterShift => "applicableAfterShift",
            PolicyField::ApprovalRequired => "approvalRequired",
            PolicyField::Status => "status",
            PolicyField::Remark => "remark",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Human-readable label for forms and the detail view.
    pub fn label(&self) -> &'static str {
        match self {
            PolicyField::OtPolicyCode => "OT Policy Code",
            PolicyField::OtPolicyName => "OT Policy Name",
            PolicyField::WorkingDayMultiplier => "Working Day Multiplier",
            PolicyField::NationalHolidayMultiplier => "National Holiday Multiplier",
            PolicyField::HolidayMultiplier => "Holiday Multiplier",
            PolicyField::WeeklyOffMultiplier => "Weekly Off Multiplier",
            PolicyField::MaxOtHoursPerDay => "Max OT Hours / Day",
            PolicyField::MaxOtHoursPerWeek => "Max OT Hours / Week",
            PolicyField::MaxOtHoursPerMonth => "Max OT Hours / Month",
            PolicyField::MaxOtHoursPerQuarter => "Max OT Hours / Quarter",
            PolicyField::MaxOtHoursPerYear => "Max OT Hours / Year",
            PolicyField::MaxHolidayOtHours => "Max Holiday OT Hours",
            PolicyField::MaxWeekendOtHours => "Max Weekend OT Hours",
            PolicyField::MaxWeekdayOtHours => "Max Weekday OT Hours",
            PolicyField::MinExtraMinutes => "Min Extra Minutes",
            PolicyField::MinFixedMinutes => "Min Fixed Minutes",
            PolicyField::RoundingEnabled => "Rounding Enabled",
            PolicyField::BeforeRoundingOff => "Before Rounding Off",
            PolicyField::AfterRoundingOff => "After Rounding Off",
            PolicyField::DoThisWhenCrossedAllocatedLimit => "When Limit Crossed",
            PolicyField::ApplicableOnHoliday => "Holiday",
            PolicyField::ApplicableOnNationalHoliday => "National Holiday",
            PolicyField::ApplicableOnWeeklyOff => "Weekly Off",
            PolicyField::ApplicableOnWorkingDay => "Working Day",
            PolicyField::ApplicableBeforeShift => "Before Shift",
            PolicyField::ApplicableAfterShift => "After Shift",
            PolicyField::ApprovalRequired => "Approval Required",
            PolicyField::Status => "Status",
            PolicyField::Remark => "Remark",
        }
    }

    /// Full dotted path, e.g. `otPolicy.remark`.
    pub fn path(&self) -> String {
        format!("otPolicy.{}", self.name())
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            PolicyField::OtPolicyCode | PolicyField::OtPolicyName | PolicyField::Remark => FieldKind::Text,
            PolicyField::RoundingEnabled
            | PolicyField::BeforeRoundingOff
            | PolicyField::AfterRoundingOff
            | PolicyField::ApplicableOnHoliday
            | PolicyField::ApplicableOnNationalHoliday
            | PolicyField::ApplicableOnWeeklyOff
            | PolicyField::ApplicableOnWorkingDay
            | PolicyField::ApplicableBeforeShift
            | PolicyField::ApplicableAfterShift
            | PolicyField::ApprovalRequired => FieldKind::Flag,
            PolicyField::DoThisWhenCrossedAllocatedLimit => FieldKind::Limit,
            PolicyField::Status => FieldKind::Status,
            _ => FieldKind::Number,
        }
    }

    fn slot(self, p: &mut OtPolicy) -> Slot<'_> {
        match self {
            PolicyField::OtPolicyCode => Slot::Text(&mut p.ot_policy_code),
            PolicyField::OtPolicyName => Slot::Text(&mut p.ot_policy_name),
            PolicyField::WorkingDayMultiplier => Slot::Number(&mut p.working_day_multiplier),
            PolicyField::NationalHolidayMultiplier => Slot::Number(&mut p.national_holiday_multiplier),
            PolicyField::HolidayMultiplier => Slot::Number(&mut p.holiday_multiplier),
            PolicyField::WeeklyOffMultiplier => Slot::Number(&mut p.weekly_off_multiplier),
            PolicyField::MaxOtHoursPerDay => Slot::Number(&mut p.max_ot_hours_per_day),
            PolicyField::MaxOtHoursPerWeek => Slot::Number(&mut p.max_ot_hours_per_week),
            PolicyField::MaxOtHoursPerMonth => Slot::Number(&mut p.max_ot_hours_per_month),
            PolicyField::MaxOtHoursPerQuarter => Slot::Number(&mut p.max_ot_hours_per_quarter),
            PolicyField::MaxOtHoursPerYear => Slot::Number(&mut p.max_ot_hours_per_year),
            PolicyField::MaxHolidayOtHours => Slot::Number(&mut p.max_holiday_ot_hours),
            PolicyField::MaxWeekendOtHours => Slot::Number(&mut p.max_weekend_ot_hours),
            PolicyField::MaxWeekdayOtHours => Slot::Number(&mut p.max_weekday_ot_hours),
            PolicyField::MinExtraMinutes => Slot::Number(&mut p.min_extra_minutes),
            PolicyField::MinFixedMinutes => Slot::Number(&mut p.min_fixed_minutes),
            PolicyField::RoundingEnabled => Slot::Flag(&mut p.rounding_enabled),
            PolicyField::BeforeRoundingOff => Slot::Flag(&mut p.before_rounding_off),
            PolicyField::AfterRoundingOff => Slot::Flag(&mut p.after_rounding_off),
            PolicyField::DoThisWhenCrossedAllocatedLimit => Slot::Limit(&mut p.do_this_when_crossed_allocated_limit),
            PolicyField::ApplicableOnHoliday => Slot::Flag(&mut p.applicable_on_holiday),
            PolicyField::ApplicableOnNationalHoliday => Slot::Flag(&mut p.applicable_on_national_holiday),
            PolicyField::ApplicableOnWeeklyOff => Slot::Flag(&mut p.applicable_on_weekly_off),
            PolicyField::ApplicableOnWorkingDay => Slot::Flag(&mut p.applicable_on_working_day),
            PolicyField::ApplicableBeforeShift => Slot::Flag(&mut p.applicable_before_shift),
            PolicyField::ApplicableAfterShift => Slot::Flag(&mut p.applicable_after_shift),
            PolicyField::ApprovalRequired => Slot::Flag(&mut p.approval_required),
            PolicyField::Status => Slot::Status(&mut p.status),
            PolicyField::Remark => Slot::Text(&mut p.remark),
        }
    }

    /// Read the current value in input form.
    pub fn get(self, p: &OtPolicy) -> FieldValue {
        match self {
            PolicyField::OtPolicyCode => FieldValue::Text(p.ot_policy_code.clone()),
            PolicyField::OtPolicyName => FieldValue::Text(p.ot_policy_name.clone()),
            PolicyField::Remark => FieldValue::Text(p.remark.clone()),
            PolicyField::WorkingDayMultiplier => FieldValue::Number(p.working_day_multiplier),
            PolicyField::NationalHolidayMultiplier => FieldValue::Number(p.national_holiday_multiplier),
            PolicyField::HolidayMultiplier => FieldValue::Number(p.holiday_multiplier),
            PolicyField::WeeklyOffMultiplier => FieldValue::Number(p.weekly_off_multiplier),
            PolicyField::MaxOtHoursPerDay => FieldValue::Number(p.max_ot_hours_per_day),
            PolicyField::MaxOtHoursPerWeek => FieldValue::Number(p.max_ot_hours_per_week),
            PolicyField::MaxOtHoursPerMonth => FieldValue::Number(p.max_ot_hours_per_month),
            PolicyField::MaxOtHoursPerQuarter => FieldValue::Number(p.max_ot_hours_per_quarter),
            PolicyField::MaxOtHoursPerYear => FieldValue::Number(p.max_ot_hours_per_year),
            PolicyField::MaxHolidayOtHours => FieldValue::Number(p.max_holiday_ot_hours),
            PolicyField::MaxWeekendOtHours => FieldValue::Number(p.max_weekend_ot_hours),
            PolicyField::MaxWeekdayOtHours => FieldValue::Number(p.max_weekday_ot_hours),
            PolicyField::MinExtraMinutes => FieldValue::Number(p.min_extra_minutes),
            PolicyField::MinFixedMinutes => FieldValue::Number(p.min_fixed_minutes),
            PolicyField::RoundingEnabled => FieldValue::Checked(p.rounding_enabled),
            PolicyField::BeforeRoundingOff => FieldValue::Checked(p.before_rounding_off),
            PolicyField::AfterRoundingOff => FieldValue::Checked(p.after_rounding_off),
            PolicyField::ApplicableOnHoliday => FieldValue::Checked(p.applicable_on_holiday),
            PolicyField::ApplicableOnNationalHoliday => FieldValue::Checked(p.applicable_on_national_holiday),
            PolicyField::ApplicableOnWeeklyOff => FieldValue::Checked(p.applicable_on_weekly_off),
            PolicyField::ApplicableOnWorkingDay => FieldValue::Checked(p.applicable_on_working_day),
            PolicyField::ApplicableBeforeShift => FieldValue::Checked(p.applicable_before_shift),
            PolicyField::ApplicableAfterShift => FieldValue::Checked(p.applicable_after_shift),
            PolicyField::ApprovalRequired => FieldValue::Checked(p.approval_required),
            PolicyField::DoThisWhenCrossedAllocatedLimit => {
                FieldValue::Text(p.do_this_when_crossed_allocated_limit.name().to_string())
            }
            PolicyField::Status => FieldValue::Text(p.status.name().to_string()),
        }
    }

    /// Apply an input value, coercing checkbox state to bool and number-input text to f64.
    pub(crate) fn apply(self, policy: &mut OtPolicy, value: FieldValue) -> Result<(), FormError> {
        let field = self.path();
        match (self.slot(policy), value) {
            (Slot::Text(slot), FieldValue::Text(s)) => *slot = s,
            (Slot::Text(slot), FieldValue::Number(n)) => *slot = n.to_string(),
            (Slot::Number(slot), FieldValue::Number(n)) => *slot = finite(&field, n, n.to_string())?,
            (Slot::Number(slot), FieldValue::Text(s)) => *slot = parse_number(&field, &s)?,
            (Slot::Flag(slot), FieldValue::Checked(b)) => *slot = b,
            (Slot::Limit(slot), FieldValue::Text(s)) => {
                *slot = LimitAction::parse(&s).ok_or(FormError::InvalidOption { field, input: s })?;
            }
            (Slot::Status(slot), FieldValue::Text(s)) => {
                *slot = PolicyStatus::parse(&s).ok_or(FormError::InvalidOption { field, input: s })?;
            }
            (slot, _) => {
                let expected = match slot {
                    Slot::Text(_) => "text",
                    Slot::Number(_) => "a number",
                    Slot::Flag(_) => "a checkbox state",
                    Slot::Limit(_) => "Restrict or Allow",
                    Slot::Status(_) => "active or inactive",
                };
                return Err(FormError::TypeMismatch { field, expected });
            }
        }
        Ok(())
    }
}

/// Number inputs hand over their text: blank clears to zero, anything else must parse
/// to a finite value.
fn parse_number(field: &str, input: &str) -> Result<f64, FormError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    let invalid = || FormError::InvalidNumber {
        field: field.to_string(),
        input: input.to_string(),
    };
    let value = trimmed.parse::<f64>().map_err(|_| invalid())?;
    finite(field, value, input.to_string())
}

/// NaN and infinities cannot be written to JSON and are rejected.
fn finite(field: &str, value: f64, input: String) -> Result<f64, FormError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(FormError::InvalidNumber {
            field: field.to_string(),
            input,
        })
    }
}

/// A parsed field path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldPath {
    Root(RootField),
    Policy(PolicyField),
}

impl FieldPath {
    /// Parse `name` or `otPolicy.name`. Deeper nesting is rejected.
    pub fn parse(path: &str) -> Result<Self, FormError> {
        match path.split_once('.') {
            None => {
                if path == "id" || path == "otPolicy" {
                    return Err(FormError::ReadOnly(path.to_string()));
                }
                RootField::from_name(path)
                    .map(FieldPath::Root)
                    .ok_or_else(|| FormError::UnknownField(path.to_string()))
            }
            Some(("otPolicy", "rounding")) => Err(FormError::ReadOnly(path.to_string())),
            Some(("otPolicy", name)) => PolicyField::from_name(name)
                .map(FieldPath::Policy)
                .ok_or_else(|| FormError::UnknownField(path.to_string())),
            Some(_) => Err(FormError::UnknownField(path.to_string())),
        }
    }
}
