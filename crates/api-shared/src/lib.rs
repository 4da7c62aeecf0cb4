//! # API Shared
//!
//! Shared utilities and definitions for CardioDx APIs.
//!
//! Contains:
//! - Request/response message types (`messages` module)
//! - Shared services like `HealthService`
//!
//! Used by `api-rest` and the main server binary for common functionality.

pub mod health;
pub mod messages;

pub use health::HealthService;
pub use messages::*;
