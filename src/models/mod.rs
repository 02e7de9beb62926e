//! Data models for overtime policies and their reference data.

pub mod ot_policy;
pub mod reference;

pub use ot_policy::{LimitAction, OtPolicy, OvertimePolicyApplication, PolicyStatus, RoundingRule, UpdateOvertimePolicy};
pub use reference::{Reference, ReferenceData};
