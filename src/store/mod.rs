//! Storage contracts
//!
//! The registration engine and the schedulers talk to storage through these
//! traits. The Postgres repositories in `database::repositories` implement
//! them for production; `memory` provides in-process implementations used by
//! the test suite.

pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{
    Attendance, Event, EventCategory, EventStatus, Registration, RegistrationStatus, User,
    UserRole, WhitelistRequest, WhitelistStatus,
};
use crate::utils::errors::Result;

/// Filter for event listings
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub status: Option<EventStatus>,
    pub category: Option<EventCategory>,
}

/// Event storage, including the atomic seat counter.
#[async_trait]
pub trait EventStore: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<Event>>;
    async fn create(&self, event: &Event) -> Result<()>;
    async fn update(&self, event: &Event) -> Result<()>;
    async fn delete(&self, id: Uuid) -> Result<()>;
    async fn list(&self, filter: EventFilter) -> Result<Vec<Event>>;
    async fn list_by_organizer(&self, organizer_id: Uuid) -> Result<Vec<Event>>;
    async fn update_status(&self, id: Uuid, status: EventStatus) -> Result<()>;

    /// Atomically claim one seat: increment `current_participants` iff the
    /// result stays within `max_participants`. Returns whether a seat was
    /// claimed. This is a single storage operation, so two concurrent callers
    /// can never both claim the last seat.
    async fn try_reserve_seat(&self, id: Uuid) -> Result<bool>;

    /// Release one seat, flooring the counter at zero.
    async fn release_seat(&self, id: Uuid) -> Result<()>;
}

/// Registration storage. Rows are append-then-mutate; nothing is deleted.
#[async_trait]
pub trait RegistrationStore: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<Registration>>;
    async fn create(&self, registration: &Registration) -> Result<()>;
    async fn update(&self, registration: &Registration) -> Result<()>;

    /// Flip a row to `cancelled` and stamp the cancellation time.
    async fn cancel(&self, id: Uuid, at: DateTime<Utc>) -> Result<()>;

    /// Most recent registration row for a (user, event) pair, by
    /// `registered_at` descending. The engine infers "active" from this.
    async fn latest_by_user_and_event(
        &self,
        user_id: Uuid,
        event_id: Uuid,
    ) -> Result<Option<Registration>>;

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Registration>>;
    async fn list_by_event(
        &self,
        event_id: Uuid,
        status: Option<RegistrationStatus>,
    ) -> Result<Vec<Registration>>;

    /// Waitlisted rows for an event, ordered `registered_at` ascending.
    /// Promotion picks the head of this list.
    async fn list_waitlist(&self, event_id: Uuid) -> Result<Vec<Registration>>;

    async fn count_by_event_and_status(
        &self,
        event_id: Uuid,
        status: RegistrationStatus,
    ) -> Result<i64>;
}

/// Attendance storage.
#[async_trait]
pub trait AttendanceStore: Send + Sync {
    async fn create(&self, attendance: &Attendance) -> Result<()>;
    async fn bulk_create(&self, attendances: &[Attendance]) -> Result<()>;
    async fn get_by_event_and_user(
        &self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Attendance>>;
    async fn list_by_event(&self, event_id: Uuid) -> Result<Vec<Attendance>>;
}

/// User lookup and role updates.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<User>>;
    async fn update_role(&self, id: Uuid, role: UserRole) -> Result<()>;
}

/// Whitelist request storage.
#[async_trait]
pub trait WhitelistStore: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<WhitelistRequest>>;
    async fn create(&self, request: &WhitelistRequest) -> Result<()>;
    async fn update(&self, request: &WhitelistRequest) -> Result<()>;
    async fn latest_by_user(&self, user_id: Uuid) -> Result<Option<WhitelistRequest>>;
    async fn list(&self, status: Option<WhitelistStatus>) -> Result<Vec<WhitelistRequest>>;
}
