//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod attendance;
pub mod event;
pub mod registration;
pub mod user;
pub mod whitelist;

// Re-export commonly used models
pub use attendance::Attendance;
pub use event::{CreateEventRequest, Event, EventCategory, EventStatus, EventType, UpdateEventRequest};
pub use registration::{Registration, RegistrationStatus};
pub use user::{User, UserRole};
pub use whitelist::{WhitelistRequest, WhitelistStatus};
