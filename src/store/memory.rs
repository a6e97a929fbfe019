//! In-memory store implementations
//!
//! Backed by a `tokio::sync::Mutex` over a `HashMap`, so every operation on a
//! store is atomic with respect to the others. `try_reserve_seat` performs the
//! capacity check and the increment under one lock acquisition, matching the
//! conditional-update semantics of the Postgres repositories.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::models::{
    Attendance, Event, EventStatus, Registration, RegistrationStatus, User, UserRole,
    WhitelistRequest, WhitelistStatus,
};
use crate::store::{
    AttendanceStore, EventFilter, EventStore, RegistrationStore, UserStore, WhitelistStore,
};
use crate::utils::errors::{CampusHubError, Result};

/// In-memory event store
#[derive(Default)]
pub struct MemoryEventStore {
    events: Mutex<HashMap<Uuid, Event>>,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn get(&self, id: Uuid) -> Result<Option<Event>> {
        Ok(self.events.lock().await.get(&id).cloned())
    }

    async fn create(&self, event: &Event) -> Result<()> {
        self.events.lock().await.insert(event.id, event.clone());
        Ok(())
    }

    async fn update(&self, event: &Event) -> Result<()> {
        let mut events = self.events.lock().await;
        match events.get_mut(&event.id) {
            Some(existing) => {
                *existing = event.clone();
                Ok(())
            }
            None => Err(CampusHubError::EventNotFound { event_id: event.id }),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.events.lock().await.remove(&id);
        Ok(())
    }

    async fn list(&self, filter: EventFilter) -> Result<Vec<Event>> {
        let events = self.events.lock().await;
        let mut result: Vec<Event> = events
            .values()
            .filter(|e| filter.status.map_or(true, |s| e.status == s))
            .filter(|e| filter.category.map_or(true, |c| e.category == c))
            .cloned()
            .collect();
        result.sort_by_key(|e| e.start_date);
        Ok(result)
    }

    async fn list_by_organizer(&self, organizer_id: Uuid) -> Result<Vec<Event>> {
        let events = self.events.lock().await;
        let mut result: Vec<Event> = events
            .values()
            .filter(|e| e.organizer_id == organizer_id)
            .cloned()
            .collect();
        result.sort_by_key(|e| e.start_date);
        Ok(result)
    }

    async fn update_status(&self, id: Uuid, status: EventStatus) -> Result<()> {
        let mut events = self.events.lock().await;
        match events.get_mut(&id) {
            Some(event) => {
                event.status = status;
                event.updated_at = Utc::now();
                Ok(())
            }
            None => Err(CampusHubError::EventNotFound { event_id: id }),
        }
    }

    async fn try_reserve_seat(&self, id: Uuid) -> Result<bool> {
        let mut events = self.events.lock().await;
        let event = events
            .get_mut(&id)
            .ok_or(CampusHubError::EventNotFound { event_id: id })?;
        if event.current_participants < event.max_participants {
            event.current_participants += 1;
            event.updated_at = Utc::now();
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn release_seat(&self, id: Uuid) -> Result<()> {
        let mut events = self.events.lock().await;
        let event = events
            .get_mut(&id)
            .ok_or(CampusHubError::EventNotFound { event_id: id })?;
        if event.current_participants > 0 {
            event.current_participants -= 1;
        }
        event.updated_at = Utc::now();
        Ok(())
    }
}

/// In-memory registration store
#[derive(Default)]
pub struct MemoryRegistrationStore {
    registrations: Mutex<HashMap<Uuid, Registration>>,
}

impl MemoryRegistrationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RegistrationStore for MemoryRegistrationStore {
    async fn get(&self, id: Uuid) -> Result<Option<Registration>> {
        Ok(self.registrations.lock().await.get(&id).cloned())
    }

    async fn create(&self, registration: &Registration) -> Result<()> {
        self.registrations
            .lock()
            .await
            .insert(registration.id, registration.clone());
        Ok(())
    }

    async fn update(&self, registration: &Registration) -> Result<()> {
        let mut registrations = self.registrations.lock().await;
        match registrations.get_mut(&registration.id) {
            Some(existing) => {
                *existing = registration.clone();
                Ok(())
            }
            None => Err(CampusHubError::RegistrationNotFound {
                registration_id: registration.id,
            }),
        }
    }

    async fn cancel(&self, id: Uuid, at: DateTime<Utc>) -> Result<()> {
        let mut registrations = self.registrations.lock().await;
        match registrations.get_mut(&id) {
            Some(registration) => {
                if !registration.can_cancel() {
                    return Err(CampusHubError::NotCancellable);
                }
                registration.status = RegistrationStatus::Cancelled;
                registration.cancelled_at = Some(at);
                Ok(())
            }
            None => Err(CampusHubError::RegistrationNotFound { registration_id: id }),
        }
    }

    async fn latest_by_user_and_event(
        &self,
        user_id: Uuid,
        event_id: Uuid,
    ) -> Result<Option<Registration>> {
        let registrations = self.registrations.lock().await;
        Ok(registrations
            .values()
            .filter(|r| r.user_id == user_id && r.event_id == event_id)
            .max_by_key(|r| r.registered_at)
            .cloned())
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Registration>> {
        let registrations = self.registrations.lock().await;
        let mut result: Vec<Registration> = registrations
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.registered_at.cmp(&a.registered_at));
        Ok(result)
    }

    async fn list_by_event(
        &self,
        event_id: Uuid,
        status: Option<RegistrationStatus>,
    ) -> Result<Vec<Registration>> {
        let registrations = self.registrations.lock().await;
        let mut result: Vec<Registration> = registrations
            .values()
            .filter(|r| r.event_id == event_id)
            .filter(|r| status.map_or(true, |s| r.status == s))
            .cloned()
            .collect();
        result.sort_by_key(|r| r.registered_at);
        Ok(result)
    }

    async fn list_waitlist(&self, event_id: Uuid) -> Result<Vec<Registration>> {
        self.list_by_event(event_id, Some(RegistrationStatus::Waitlist))
            .await
    }

    async fn count_by_event_and_status(
        &self,
        event_id: Uuid,
        status: RegistrationStatus,
    ) -> Result<i64> {
        let registrations = self.registrations.lock().await;
        Ok(registrations
            .values()
            .filter(|r| r.event_id == event_id && r.status == status)
            .count() as i64)
    }
}

/// In-memory attendance store
#[derive(Default)]
pub struct MemoryAttendanceStore {
    attendances: Mutex<HashMap<Uuid, Attendance>>,
}

impl MemoryAttendanceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

// Rejects a second record for the same (event, user) pair, matching the
// schema's unique constraint.
fn check_unique(map: &HashMap<Uuid, Attendance>, attendance: &Attendance) -> Result<()> {
    if map
        .values()
        .any(|a| a.event_id == attendance.event_id && a.user_id == attendance.user_id)
    {
        return Err(CampusHubError::AttendanceAlreadyMarked);
    }
    Ok(())
}

#[async_trait]
impl AttendanceStore for MemoryAttendanceStore {
    async fn create(&self, attendance: &Attendance) -> Result<()> {
        let mut map = self.attendances.lock().await;
        check_unique(&map, attendance)?;
        map.insert(attendance.id, attendance.clone());
        Ok(())
    }

    async fn bulk_create(&self, attendances: &[Attendance]) -> Result<()> {
        let mut map = self.attendances.lock().await;
        for attendance in attendances {
            check_unique(&map, attendance)?;
        }
        for attendance in attendances {
            map.insert(attendance.id, attendance.clone());
        }
        Ok(())
    }

    async fn get_by_event_and_user(
        &self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Attendance>> {
        let attendances = self.attendances.lock().await;
        Ok(attendances
            .values()
            .find(|a| a.event_id == event_id && a.user_id == user_id)
            .cloned())
    }

    async fn list_by_event(&self, event_id: Uuid) -> Result<Vec<Attendance>> {
        let attendances = self.attendances.lock().await;
        let mut result: Vec<Attendance> = attendances
            .values()
            .filter(|a| a.event_id == event_id)
            .cloned()
            .collect();
        result.sort_by_key(|a| a.marked_at);
        Ok(result)
    }
}

/// In-memory user store
#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<HashMap<Uuid, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user, for test setup
    pub async fn insert(&self, user: User) {
        self.users.lock().await.insert(user.id, user);
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn get(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.lock().await.get(&id).cloned())
    }

    async fn update_role(&self, id: Uuid, role: UserRole) -> Result<()> {
        let mut users = self.users.lock().await;
        match users.get_mut(&id) {
            Some(user) => {
                user.role = role;
                user.updated_at = Utc::now();
                Ok(())
            }
            None => Err(CampusHubError::UserNotFound { user_id: id }),
        }
    }
}

/// In-memory whitelist request store
#[derive(Default)]
pub struct MemoryWhitelistStore {
    requests: Mutex<HashMap<Uuid, WhitelistRequest>>,
}

impl MemoryWhitelistStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WhitelistStore for MemoryWhitelistStore {
    async fn get(&self, id: Uuid) -> Result<Option<WhitelistRequest>> {
        Ok(self.requests.lock().await.get(&id).cloned())
    }

    async fn create(&self, request: &WhitelistRequest) -> Result<()> {
        self.requests.lock().await.insert(request.id, request.clone());
        Ok(())
    }

    async fn update(&self, request: &WhitelistRequest) -> Result<()> {
        let mut requests = self.requests.lock().await;
        match requests.get_mut(&request.id) {
            Some(existing) => {
                *existing = request.clone();
                Ok(())
            }
            None => Err(CampusHubError::WhitelistRequestNotFound {
                request_id: request.id,
            }),
        }
    }

    async fn latest_by_user(&self, user_id: Uuid) -> Result<Option<WhitelistRequest>> {
        let requests = self.requests.lock().await;
        Ok(requests
            .values()
            .filter(|r| r.user_id == user_id)
            .max_by_key(|r| r.created_at)
            .cloned())
    }

    async fn list(&self, status: Option<WhitelistStatus>) -> Result<Vec<WhitelistRequest>> {
        let requests = self.requests.lock().await;
        let mut result: Vec<WhitelistRequest> = requests
            .values()
            .filter(|r| status.map_or(true, |s| r.status == s))
            .cloned()
            .collect();
        result.sort_by_key(|r| r.created_at);
        Ok(result)
    }
}
