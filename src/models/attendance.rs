//! Attendance model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Attendance record for an event, tied 1:1 to a registration.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Attendance {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub registration_id: Uuid,
    pub marked_at: DateTime<Utc>,
    pub marked_by: Uuid,
    pub notes: Option<String>,
}

impl Attendance {
    pub fn new(
        event_id: Uuid,
        user_id: Uuid,
        registration_id: Uuid,
        marked_by: Uuid,
        notes: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_id,
            user_id,
            registration_id,
            marked_at: Utc::now(),
            marked_by,
            notes,
        }
    }
}
