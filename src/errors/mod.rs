//! Error types returned by HTTP handlers

pub mod app_error;

pub use app_error::{AppError, AppResult};
