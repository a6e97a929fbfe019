//! Registration engine
//!
//! Orchestrates registration creation, cancellation, and FIFO waitlist
//! promotion against the event and registration stores. All counter and
//! status mutation for one event is serialized through a per-event async
//! lock, and seat accounting itself goes through the store's atomic
//! conditional increment, so two callers racing for the last seat resolve to
//! exactly one `registered` and one `waitlist` outcome.
//!
//! Notifications are dispatched after the event lock is released and are
//! best-effort: a failed email is logged, never surfaced to the caller.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};

use chrono::Utc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{Event, Registration, RegistrationStatus, User};
use crate::services::notification::Notifier;
use crate::store::{EventStore, RegistrationStore, UserStore};
use crate::utils::errors::{CampusHubError, Result};

/// Per-event lock registry.
///
/// The serialization unit is the event id; operations on different events
/// never contend. Locks are created lazily and kept for the process lifetime
/// (the registry is bounded by the number of distinct events touched).
/// One registry instance is shared by every service that mutates
/// registration state, so a cancellation and an attendance mark on the same
/// event cannot interleave.
#[derive(Clone, Default)]
pub struct EventLocks {
    locks: Arc<StdMutex<HashMap<Uuid, Arc<Mutex<()>>>>>,
}

impl EventLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, event_id: Uuid) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().expect("event lock registry poisoned");
            locks
                .entry(event_id)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}

/// Registration engine service
#[derive(Clone)]
pub struct RegistrationService {
    events: Arc<dyn EventStore>,
    registrations: Arc<dyn RegistrationStore>,
    users: Arc<dyn UserStore>,
    notifier: Arc<dyn Notifier>,
    locks: EventLocks,
}

impl RegistrationService {
    pub fn new(
        events: Arc<dyn EventStore>,
        registrations: Arc<dyn RegistrationStore>,
        users: Arc<dyn UserStore>,
        notifier: Arc<dyn Notifier>,
        locks: EventLocks,
    ) -> Self {
        Self {
            events,
            registrations,
            users,
            notifier,
            locks,
        }
    }

    /// Register a user for an event.
    ///
    /// If the event has a free seat the registration is created as
    /// `registered` and the seat counter is bumped atomically; otherwise the
    /// row is created as `waitlist` and the counter is untouched.
    pub async fn register_for_event(&self, user_id: Uuid, event_id: Uuid) -> Result<Registration> {
        let event = self
            .events
            .get(event_id)
            .await?
            .ok_or(CampusHubError::EventNotFound { event_id })?;

        if !event.can_register() {
            return Err(CampusHubError::RegistrationClosed);
        }

        let user = self
            .users
            .get(user_id)
            .await?
            .ok_or(CampusHubError::UserNotFound { user_id })?;

        if event.is_uii_only && !user.is_uii_civitas {
            return Err(CampusHubError::UiiCivitasOnly);
        }

        let guard = self.locks.acquire(event_id).await;

        // Duplicate detection goes by the most recent row for the pair; a
        // cancelled latest row means re-registration is allowed.
        if let Some(existing) = self
            .registrations
            .latest_by_user_and_event(user_id, event_id)
            .await?
        {
            if !existing.is_cancelled() {
                return Err(if existing.is_waitlist() {
                    CampusHubError::AlreadyWaitlisted
                } else {
                    CampusHubError::AlreadyRegistered
                });
            }
        }

        // Claim the seat before writing the row: the conditional increment is
        // the authoritative capacity check.
        let seated = self.events.try_reserve_seat(event_id).await?;
        let status = if seated {
            RegistrationStatus::Registered
        } else {
            RegistrationStatus::Waitlist
        };

        let registration = Registration::new(event_id, user_id, status);
        if let Err(err) = self.registrations.create(&registration).await {
            if seated {
                // Compensate so the counter never counts a row that was
                // never written.
                if let Err(release_err) = self.events.release_seat(event_id).await {
                    warn!(
                        event_id = %event_id,
                        error = %release_err,
                        "Failed to release seat after registration write failure"
                    );
                }
            }
            return Err(err);
        }

        let waitlist_position = if seated {
            None
        } else {
            // Position includes the row just created.
            match self
                .registrations
                .count_by_event_and_status(event_id, RegistrationStatus::Waitlist)
                .await
            {
                Ok(count) => Some(count),
                Err(err) => {
                    warn!(event_id = %event_id, error = %err, "Failed to count waitlist");
                    None
                }
            }
        };

        drop(guard);

        info!(
            user_id = %user_id,
            event_id = %event_id,
            registration_id = %registration.id,
            status = %registration.status,
            "Registration created"
        );

        match waitlist_position {
            None => {
                if let Err(err) = self
                    .notifier
                    .registration_confirmation(
                        &user.email,
                        &user.full_name,
                        &event.title,
                        event.start_date,
                        registration.id,
                    )
                    .await
                {
                    warn!(user_id = %user_id, error = %err, "Failed to send confirmation email");
                }
            }
            Some(position) => {
                if let Err(err) = self
                    .notifier
                    .waitlist_notice(&user.email, &user.full_name, &event.title, position)
                    .await
                {
                    warn!(user_id = %user_id, error = %err, "Failed to send waitlist notice");
                }
            }
        }

        Ok(registration)
    }

    /// Cancel a registration owned by the caller.
    ///
    /// Once the row is marked cancelled the operation is committed; seat
    /// release and waitlist promotion are best-effort bookkeeping whose
    /// failures are logged, not surfaced.
    pub async fn cancel_registration(&self, user_id: Uuid, registration_id: Uuid) -> Result<()> {
        let registration = self
            .registrations
            .get(registration_id)
            .await?
            .ok_or(CampusHubError::RegistrationNotFound { registration_id })?;

        if registration.user_id != user_id {
            return Err(CampusHubError::PermissionDenied(
                "you don't have permission to cancel this registration".to_string(),
            ));
        }

        let event = self
            .events
            .get(registration.event_id)
            .await?
            .ok_or(CampusHubError::EventNotFound {
                event_id: registration.event_id,
            })?;

        let user = self
            .users
            .get(user_id)
            .await?
            .ok_or(CampusHubError::UserNotFound { user_id })?;

        let guard = self.locks.acquire(event.id).await;

        // Re-read under the lock so two concurrent cancels of the same row
        // cannot both pass the state check.
        let registration = self
            .registrations
            .get(registration_id)
            .await?
            .ok_or(CampusHubError::RegistrationNotFound { registration_id })?;

        if !registration.can_cancel() {
            return Err(CampusHubError::NotCancellable);
        }

        let held_seat = registration.is_registered();

        // Commit point: cancellation is final from here on.
        self.registrations.cancel(registration_id, Utc::now()).await?;

        let mut promoted: Option<Registration> = None;
        if held_seat {
            match self.events.release_seat(event.id).await {
                Ok(()) => promoted = self.promote_next(event.id).await,
                Err(err) => {
                    warn!(
                        event_id = %event.id,
                        error = %err,
                        "Failed to release seat after cancellation"
                    );
                }
            }
        }

        drop(guard);

        info!(
            user_id = %user_id,
            registration_id = %registration_id,
            event_id = %event.id,
            promoted = promoted.is_some(),
            "Registration cancelled"
        );

        if let Some(promoted) = promoted {
            self.notify_promotion(&event, &promoted).await;
        }

        if let Err(err) = self
            .notifier
            .cancellation_confirmation(&user.email, &user.full_name, &event.title)
            .await
        {
            warn!(user_id = %user_id, error = %err, "Failed to send cancellation email");
        }

        Ok(())
    }

    /// Promote the oldest waitlisted registration, if any. Must be called
    /// with the event lock held. Returns the promoted row on success.
    async fn promote_next(&self, event_id: Uuid) -> Option<Registration> {
        let waitlist = match self.registrations.list_waitlist(event_id).await {
            Ok(waitlist) => waitlist,
            Err(err) => {
                warn!(event_id = %event_id, error = %err, "Failed to read waitlist for promotion");
                return None;
            }
        };

        let mut next = waitlist.into_iter().next()?;

        match self.events.try_reserve_seat(event_id).await {
            Ok(true) => {}
            Ok(false) => {
                warn!(event_id = %event_id, "No free seat for waitlist promotion");
                return None;
            }
            Err(err) => {
                warn!(event_id = %event_id, error = %err, "Failed to reserve seat for promotion");
                return None;
            }
        }

        next.status = RegistrationStatus::Registered;
        match self.registrations.update(&next).await {
            Ok(()) => {
                info!(
                    event_id = %event_id,
                    registration_id = %next.id,
                    user_id = %next.user_id,
                    "Promoted registration from waitlist"
                );
                Some(next)
            }
            Err(err) => {
                warn!(
                    event_id = %event_id,
                    registration_id = %next.id,
                    error = %err,
                    "Failed to persist waitlist promotion"
                );
                // Give the seat back so the counter keeps matching the rows.
                if let Err(release_err) = self.events.release_seat(event_id).await {
                    warn!(event_id = %event_id, error = %release_err, "Failed to release seat after promotion failure");
                }
                None
            }
        }
    }

    async fn notify_promotion(&self, event: &Event, promoted: &Registration) {
        let promoted_user: Option<User> = match self.users.get(promoted.user_id).await {
            Ok(user) => user,
            Err(err) => {
                warn!(user_id = %promoted.user_id, error = %err, "Failed to load promoted user");
                None
            }
        };

        if let Some(promoted_user) = promoted_user {
            if let Err(err) = self
                .notifier
                .waitlist_promotion(
                    &promoted_user.email,
                    &promoted_user.full_name,
                    &event.title,
                    event.start_date,
                    promoted.id,
                )
                .await
            {
                warn!(user_id = %promoted.user_id, error = %err, "Failed to send promotion email");
            }
        }
    }

    /// Get all registrations of a user, newest first
    pub async fn get_my_registrations(&self, user_id: Uuid) -> Result<Vec<Registration>> {
        self.registrations.list_by_user(user_id).await
    }

    /// Get all registrations of an event; organizer only
    pub async fn get_event_registrations(
        &self,
        organizer_id: Uuid,
        event_id: Uuid,
    ) -> Result<Vec<Registration>> {
        let event = self
            .events
            .get(event_id)
            .await?
            .ok_or(CampusHubError::EventNotFound { event_id })?;

        if event.organizer_id != organizer_id {
            return Err(CampusHubError::PermissionDenied(
                "you don't have permission to view registrations for this event".to_string(),
            ));
        }

        self.registrations.list_by_event(event_id, None).await
    }
}
