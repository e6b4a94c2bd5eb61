//! Common utilities shared by every WhereToGo client crate.
//!
//! This crate provides:
//! - Unified client-side error handling
//! - Configuration loaded from the environment

pub mod config;
pub mod error;

pub use config::*;
pub use error::{AppError, AppResult, OptionExt};
