//! # Conclave Common Library
//!
//! Shared code for the Conclave conference-management backend:
//! - Database initialization, models and transaction helper
//! - Error type
//! - Configuration loading and root folder resolution
//! - Opaque entity key tokens

pub mod config;
pub mod db;
pub mod error;
pub mod token;

pub use error::{Error, Result};
