//! GUI panels and application state.

pub mod app;
pub mod components;
pub mod policy_detail;
pub mod policy_form;
pub mod policy_panel;

pub use app::App;
