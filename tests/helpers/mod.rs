//! Shared test infrastructure
//!
//! In-memory stores wired into the real services, a recording notifier to
//! assert on notification side effects, and fixture builders.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use CampusHub::models::{
    Event, EventCategory, EventStatus, EventType, Registration, User, UserRole,
};
use CampusHub::services::{
    AttendanceService, EventLocks, EventService, Notifier, Reconciler, RegistrationService,
    WhitelistService,
};
use CampusHub::store::memory::{
    MemoryAttendanceStore, MemoryEventStore, MemoryRegistrationStore, MemoryUserStore,
    MemoryWhitelistStore,
};
use CampusHub::store::{EventStore, RegistrationStore};
use CampusHub::utils::errors::{CampusHubError, Result};

/// One recorded outbound notification
#[derive(Debug, Clone, PartialEq)]
pub enum SentEmail {
    Confirmation { to: String, event_title: String },
    WaitlistNotice { to: String, position: i64 },
    Promotion { to: String, event_title: String },
    Cancellation { to: String, event_title: String },
    Reminder { to: String, join_link: Option<String> },
    WhitelistApproved { to: String },
    WhitelistRejected { to: String, reason: String },
}

/// Notifier that records every send instead of talking to SMTP. Can be
/// switched into failure mode to exercise the best-effort paths.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<SentEmail>>,
    failing: AtomicBool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().await.clone()
    }

    async fn record(&self, email: SentEmail) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(CampusHubError::InvalidInput(
                "simulated notifier failure".to_string(),
            ));
        }
        self.sent.lock().await.push(email);
        Ok(())
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn registration_confirmation(
        &self,
        to: &str,
        _name: &str,
        event_title: &str,
        _event_date: DateTime<Utc>,
        _registration_id: Uuid,
    ) -> Result<()> {
        self.record(SentEmail::Confirmation {
            to: to.to_string(),
            event_title: event_title.to_string(),
        })
        .await
    }

    async fn waitlist_notice(
        &self,
        to: &str,
        _name: &str,
        _event_title: &str,
        position: i64,
    ) -> Result<()> {
        self.record(SentEmail::WaitlistNotice {
            to: to.to_string(),
            position,
        })
        .await
    }

    async fn waitlist_promotion(
        &self,
        to: &str,
        _name: &str,
        event_title: &str,
        _event_date: DateTime<Utc>,
        _registration_id: Uuid,
    ) -> Result<()> {
        self.record(SentEmail::Promotion {
            to: to.to_string(),
            event_title: event_title.to_string(),
        })
        .await
    }

    async fn cancellation_confirmation(
        &self,
        to: &str,
        _name: &str,
        event_title: &str,
    ) -> Result<()> {
        self.record(SentEmail::Cancellation {
            to: to.to_string(),
            event_title: event_title.to_string(),
        })
        .await
    }

    async fn event_reminder(
        &self,
        to: &str,
        _name: &str,
        _event_title: &str,
        _event_date: DateTime<Utc>,
        _location: Option<&str>,
        join_link: Option<&str>,
        _registration_id: Uuid,
    ) -> Result<()> {
        self.record(SentEmail::Reminder {
            to: to.to_string(),
            join_link: join_link.map(|s| s.to_string()),
        })
        .await
    }

    async fn whitelist_approved(&self, to: &str, _name: &str, _organization: &str) -> Result<()> {
        self.record(SentEmail::WhitelistApproved { to: to.to_string() })
            .await
    }

    async fn whitelist_rejected(&self, to: &str, _name: &str, reason: &str) -> Result<()> {
        self.record(SentEmail::WhitelistRejected {
            to: to.to_string(),
            reason: reason.to_string(),
        })
        .await
    }
}

/// All services wired against in-memory stores
pub struct TestBackend {
    pub events: Arc<MemoryEventStore>,
    pub registrations: Arc<MemoryRegistrationStore>,
    pub attendances: Arc<MemoryAttendanceStore>,
    pub users: Arc<MemoryUserStore>,
    pub whitelist: Arc<MemoryWhitelistStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub registration_service: RegistrationService,
    pub attendance_service: AttendanceService,
    pub event_service: EventService,
    pub whitelist_service: WhitelistService,
    pub reconciler: Reconciler,
}

impl TestBackend {
    pub fn new() -> Self {
        let events = Arc::new(MemoryEventStore::new());
        let registrations = Arc::new(MemoryRegistrationStore::new());
        let attendances = Arc::new(MemoryAttendanceStore::new());
        let users = Arc::new(MemoryUserStore::new());
        let whitelist = Arc::new(MemoryWhitelistStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let locks = EventLocks::new();

        let registration_service = RegistrationService::new(
            events.clone(),
            registrations.clone(),
            users.clone(),
            notifier.clone(),
            locks.clone(),
        );
        let attendance_service = AttendanceService::new(
            attendances.clone(),
            events.clone(),
            registrations.clone(),
            locks,
        );
        let event_service = EventService::new(events.clone());
        let whitelist_service =
            WhitelistService::new(whitelist.clone(), users.clone(), notifier.clone());
        let reconciler = Reconciler::new(
            events.clone(),
            registrations.clone(),
            users.clone(),
            notifier.clone(),
        );

        Self {
            events,
            registrations,
            attendances,
            users,
            whitelist,
            notifier,
            registration_service,
            attendance_service,
            event_service,
            whitelist_service,
            reconciler,
        }
    }

    pub async fn seed_user(&self, name: &str) -> User {
        let user = make_user(name, UserRole::Mahasiswa, false);
        self.users.insert(user.clone()).await;
        user
    }

    pub async fn seed_uii_user(&self, name: &str) -> User {
        let user = make_user(name, UserRole::Mahasiswa, true);
        self.users.insert(user.clone()).await;
        user
    }

    pub async fn seed_organizer(&self, name: &str) -> User {
        let user = make_user(name, UserRole::Organisasi, false);
        self.users.insert(user.clone()).await;
        user
    }

    pub async fn seed_admin(&self, name: &str) -> User {
        let user = make_user(name, UserRole::Admin, false);
        self.users.insert(user.clone()).await;
        user
    }

    pub async fn seed_event(&self, event: &Event) {
        self.events.create(event).await.expect("seed event");
    }

    /// Move an event's start into the past so attendance can be marked.
    pub async fn start_event(&self, event_id: Uuid) {
        let mut event = self.events.get(event_id).await.unwrap().unwrap();
        event.start_date = Utc::now() - Duration::hours(1);
        event.status = EventStatus::Ongoing;
        self.events.update(&event).await.unwrap();
    }
}

pub fn make_user(name: &str, role: UserRole, is_uii_civitas: bool) -> User {
    let now = Utc::now();
    User {
        id: Uuid::new_v4(),
        email: format!("{}@campus.test", name),
        full_name: name.to_string(),
        phone_number: "+628123456789".to_string(),
        role,
        is_uii_civitas,
        is_approved: true,
        created_at: now,
        updated_at: now,
    }
}

/// A published offline event open for registration, starting in a week
pub fn published_event(organizer_id: Uuid, max_participants: i32) -> Event {
    let now = Utc::now();
    Event {
        id: Uuid::new_v4(),
        organizer_id,
        title: "Seminar Nasional".to_string(),
        description: "A campus seminar".to_string(),
        category: EventCategory::Seminar,
        event_type: EventType::Offline,
        location: Some("Auditorium".to_string()),
        join_link: None,
        poster_path: Some("/posters/seminar.png".to_string()),
        start_date: now + Duration::days(7),
        end_date: now + Duration::days(7) + Duration::hours(3),
        registration_deadline: now + Duration::days(6),
        max_participants,
        current_participants: 0,
        is_uii_only: false,
        status: EventStatus::Published,
        created_at: now,
        updated_at: now,
    }
}

/// Stable registration timestamps so FIFO ordering is unambiguous
pub fn backdate(registration: &mut Registration, minutes: i64) {
    registration.registered_at = Utc::now() - Duration::minutes(minutes);
}

/// Counter must equal the number of registered+attended rows and stay within
/// capacity, as observed through the stores.
pub async fn assert_capacity_invariant(backend: &TestBackend, event_id: Uuid) {
    let event = backend
        .events
        .get(event_id)
        .await
        .unwrap()
        .expect("event exists");
    let registrations = backend
        .registrations
        .list_by_event(event_id, None)
        .await
        .unwrap();
    let active = registrations
        .iter()
        .filter(|r| r.is_registered() || r.is_attended())
        .count() as i32;

    assert_eq!(
        event.current_participants, active,
        "current_participants must match active registrations"
    );
    assert!(
        event.current_participants <= event.max_participants,
        "current_participants must never exceed max_participants"
    );
}
