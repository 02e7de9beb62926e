//! SeaORM entities.

pub mod prelude;

pub mod ot_policy_applications;
