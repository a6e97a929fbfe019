//! Registration model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Registration statuses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "registration_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    Registered,
    Waitlist,
    Cancelled,
    Attended,
}

impl std::fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistrationStatus::Registered => write!(f, "registered"),
            RegistrationStatus::Waitlist => write!(f, "waitlist"),
            RegistrationStatus::Cancelled => write!(f, "cancelled"),
            RegistrationStatus::Attended => write!(f, "attended"),
        }
    }
}

/// A user's registration attempt for an event.
///
/// Rows are never deleted; cancellation is a status transition. A user may
/// accumulate several rows for one event over time, but at most one of them
/// is ever non-cancelled.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Registration {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub status: RegistrationStatus,
    pub registered_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub reminder_sent: bool,
}

impl Registration {
    pub fn new(event_id: Uuid, user_id: Uuid, status: RegistrationStatus) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_id,
            user_id,
            status,
            registered_at: Utc::now(),
            cancelled_at: None,
            reminder_sent: false,
        }
    }

    pub fn is_registered(&self) -> bool {
        self.status == RegistrationStatus::Registered
    }

    pub fn is_waitlist(&self) -> bool {
        self.status == RegistrationStatus::Waitlist
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == RegistrationStatus::Cancelled
    }

    pub fn is_attended(&self) -> bool {
        self.status == RegistrationStatus::Attended
    }

    /// Only registered or waitlisted rows can be cancelled
    pub fn can_cancel(&self) -> bool {
        matches!(
            self.status,
            RegistrationStatus::Registered | RegistrationStatus::Waitlist
        )
    }
}
