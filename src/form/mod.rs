//! Overtime policy form: field paths, state controller and validation.

pub mod field;
pub mod state;
pub mod validator;

pub use field::{FieldKind, FieldPath, FieldValue, FormError, PolicyField, RootField};
pub use state::{PolicyForm, RoundingInput};
pub use validator::validate;
