//! CampusHub event management backend
//!
//! A campus event management backend: organizer-owned events with a capacity
//! counter and waitlist, FIFO promotion on cancellation, attendance check-in,
//! an organizer whitelist approval workflow, and scheduled status/reminder
//! sweeps with best-effort email notifications.

#![allow(non_snake_case)]

pub mod config;
pub mod database;
pub mod models;
pub mod services;
pub mod store;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{CampusHubError, Result};

// Re-export main components for easy access
pub use services::ServiceFactory;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
