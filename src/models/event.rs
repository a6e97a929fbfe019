//! Event model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Event categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "event_category", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Seminar,
    Workshop,
    Lomba,
    Konser,
}

/// Event delivery types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "event_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Online,
    Offline,
}

/// Event lifecycle statuses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "event_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Draft,
    Published,
    Ongoing,
    Completed,
    Cancelled,
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventStatus::Draft => write!(f, "draft"),
            EventStatus::Published => write!(f, "published"),
            EventStatus::Ongoing => write!(f, "ongoing"),
            EventStatus::Completed => write!(f, "completed"),
            EventStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// An event in the system.
///
/// `current_participants` counts only registrations in `registered` or
/// `attended` status; waitlisted and cancelled rows never count toward it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub organizer_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: EventCategory,
    pub event_type: EventType,
    pub location: Option<String>,
    pub join_link: Option<String>,
    pub poster_path: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub registration_deadline: DateTime<Utc>,
    pub max_participants: i32,
    pub current_participants: i32,
    pub is_uii_only: bool,
    pub status: EventStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Check if event is at capacity
    pub fn is_full(&self) -> bool {
        self.current_participants >= self.max_participants
    }

    /// Check if event has available seats
    pub fn has_capacity(&self) -> bool {
        self.current_participants < self.max_participants
    }

    /// Check if registration is still open
    pub fn can_register(&self) -> bool {
        let now = Utc::now();
        self.status == EventStatus::Published
            && now < self.registration_deadline
            && now < self.start_date
    }

    pub fn is_online(&self) -> bool {
        self.event_type == EventType::Online
    }

    /// Check if event has started
    pub fn has_started(&self) -> bool {
        Utc::now() >= self.start_date
    }

    /// Check if event has ended
    pub fn has_ended(&self) -> bool {
        Utc::now() > self.end_date
    }

    /// Number of remaining seats
    pub fn available_slots(&self) -> i32 {
        self.max_participants - self.current_participants
    }
}

/// Payload for creating a new event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: String,
    pub category: EventCategory,
    pub event_type: EventType,
    pub location: Option<String>,
    pub join_link: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub registration_deadline: DateTime<Utc>,
    pub max_participants: i32,
    pub is_uii_only: bool,
}

/// Payload for updating an existing event
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<EventCategory>,
    pub event_type: Option<EventType>,
    pub location: Option<String>,
    pub join_link: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub max_participants: Option<i32>,
    pub is_uii_only: Option<bool>,
}
