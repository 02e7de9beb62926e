pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod export;
pub mod form;
pub mod models;
pub mod service;
pub mod store;
pub mod ui;

pub use error::{AppError, Result};
