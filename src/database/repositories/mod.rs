//! Database repositories module
//!
//! This module contains the Postgres implementations of the store traits.

pub mod attendance;
pub mod event;
pub mod registration;
pub mod user;
pub mod whitelist;

// Re-export repositories
pub use attendance::AttendanceRepository;
pub use event::EventRepository;
pub use registration::RegistrationRepository;
pub use user::UserRepository;
pub use whitelist::WhitelistRepository;
