//! Database connection pool and operations.

pub mod connection;
pub mod ot_policy;

pub use connection::{connect, count_policies, ensure_schema, get_version, test_connection};
