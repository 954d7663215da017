//! # Varnex Common Library
//!
//! Shared code for the Varnex variant annotation services:
//! - Common error type
//! - Configuration file loading (TOML)

pub mod config;
pub mod error;

pub use error::{Error, Result};
