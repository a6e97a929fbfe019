//! Error handling for CampusHub
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;
use uuid::Uuid;

/// Main error type for the CampusHub application
#[derive(Error, Debug)]
pub enum CampusHubError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("SMTP transport error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("Invalid email address: {0}")]
    EmailAddress(#[from] lettre::address::AddressError),

    #[error("Email build error: {0}")]
    EmailBuild(#[from] lettre::error::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("User not found: {user_id}")]
    UserNotFound { user_id: Uuid },

    #[error("Event not found: {event_id}")]
    EventNotFound { event_id: Uuid },

    #[error("Registration not found: {registration_id}")]
    RegistrationNotFound { registration_id: Uuid },

    #[error("Whitelist request not found: {request_id}")]
    WhitelistRequestNotFound { request_id: Uuid },

    #[error("registration is closed for this event")]
    RegistrationClosed,

    #[error("this event is only open to UII civitas")]
    UiiCivitasOnly,

    #[error("you are already registered for this event")]
    AlreadyRegistered,

    #[error("you are already on the waitlist for this event")]
    AlreadyWaitlisted,

    #[error("cannot cancel this registration")]
    NotCancellable,

    #[error("cannot mark attendance before the event starts")]
    EventNotStarted,

    #[error("user is not actively registered for this event")]
    NotRegistered,

    #[error("attendance already marked for this user")]
    AttendanceAlreadyMarked,

    #[error("no valid attendances to mark")]
    EmptyAttendanceBatch,

    #[error("request has already been reviewed")]
    AlreadyReviewed,
}

/// Result type alias for CampusHub operations
pub type Result<T> = std::result::Result<T, CampusHubError>;
