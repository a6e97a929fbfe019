//! Services module
//!
//! This module contains business logic services

pub mod attendance;
pub mod event;
pub mod notification;
pub mod reconciler;
pub mod registration;
pub mod whitelist;

// Re-export commonly used services
pub use attendance::AttendanceService;
pub use event::EventService;
pub use notification::{Notifier, SmtpNotifier};
pub use reconciler::Reconciler;
pub use registration::{EventLocks, RegistrationService};
pub use whitelist::WhitelistService;

use std::sync::Arc;

use crate::config::Settings;
use crate::database::repositories::{
    AttendanceRepository, EventRepository, RegistrationRepository, UserRepository,
    WhitelistRepository,
};
use crate::database::DatabasePool;
use crate::store::{AttendanceStore, EventStore, RegistrationStore, UserStore, WhitelistStore};
use crate::utils::errors::Result;

/// Service factory wiring the Postgres repositories and the SMTP notifier
/// into the application services
#[derive(Clone)]
pub struct ServiceFactory {
    pub registration_service: RegistrationService,
    pub attendance_service: AttendanceService,
    pub event_service: EventService,
    pub whitelist_service: WhitelistService,
    pub reconciler: Reconciler,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(pool: DatabasePool, settings: &Settings) -> Result<Self> {
        let events: Arc<dyn EventStore> = Arc::new(EventRepository::new(pool.clone()));
        let registrations: Arc<dyn RegistrationStore> =
            Arc::new(RegistrationRepository::new(pool.clone()));
        let attendances: Arc<dyn AttendanceStore> =
            Arc::new(AttendanceRepository::new(pool.clone()));
        let users: Arc<dyn UserStore> = Arc::new(UserRepository::new(pool.clone()));
        let whitelist: Arc<dyn WhitelistStore> = Arc::new(WhitelistRepository::new(pool));
        let notifier: Arc<dyn Notifier> = Arc::new(SmtpNotifier::new(&settings.smtp)?);

        // One lock registry across services: attendance marking and
        // cancellation on the same event must serialize against each other.
        let locks = EventLocks::new();

        let registration_service = RegistrationService::new(
            events.clone(),
            registrations.clone(),
            users.clone(),
            notifier.clone(),
            locks.clone(),
        );
        let attendance_service =
            AttendanceService::new(attendances, events.clone(), registrations.clone(), locks);
        let event_service = EventService::new(events.clone());
        let whitelist_service =
            WhitelistService::new(whitelist, users.clone(), notifier.clone());
        let reconciler = Reconciler::new(events, registrations, users, notifier);

        Ok(Self {
            registration_service,
            attendance_service,
            event_service,
            whitelist_service,
            reconciler,
        })
    }
}
