//! Attendance service implementation
//!
//! Check-in handling for organizers: single and bulk attendance marking.
//! The attendance record is the primary write; flipping the registration to
//! `attended` afterwards is best-effort, mirroring the cancellation path.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{Attendance, Registration, RegistrationStatus};
use crate::services::registration::EventLocks;
use crate::store::{AttendanceStore, EventStore, RegistrationStore};
use crate::utils::errors::{CampusHubError, Result};

/// Attendance service for event check-in
#[derive(Clone)]
pub struct AttendanceService {
    attendances: Arc<dyn AttendanceStore>,
    events: Arc<dyn EventStore>,
    registrations: Arc<dyn RegistrationStore>,
    locks: EventLocks,
}

impl AttendanceService {
    /// `locks` must be the same registry the registration engine uses, so
    /// attendance marking serializes against cancellation on the same event.
    pub fn new(
        attendances: Arc<dyn AttendanceStore>,
        events: Arc<dyn EventStore>,
        registrations: Arc<dyn RegistrationStore>,
        locks: EventLocks,
    ) -> Self {
        Self {
            attendances,
            events,
            registrations,
            locks,
        }
    }

    /// Mark a single attendee as present.
    pub async fn mark_attendance(
        &self,
        organizer_id: Uuid,
        event_id: Uuid,
        user_id: Uuid,
        notes: Option<String>,
    ) -> Result<Attendance> {
        let event = self
            .events
            .get(event_id)
            .await?
            .ok_or(CampusHubError::EventNotFound { event_id })?;

        if event.organizer_id != organizer_id {
            return Err(CampusHubError::PermissionDenied(
                "you don't have permission to mark attendance for this event".to_string(),
            ));
        }

        if !event.has_started() {
            return Err(CampusHubError::EventNotStarted);
        }

        let _guard = self.locks.acquire(event_id).await;

        let registration = self
            .registrations
            .latest_by_user_and_event(user_id, event_id)
            .await?
            .filter(|r| r.is_registered())
            .ok_or(CampusHubError::NotRegistered)?;

        if self
            .attendances
            .get_by_event_and_user(event_id, user_id)
            .await?
            .is_some()
        {
            return Err(CampusHubError::AttendanceAlreadyMarked);
        }

        let attendance = Attendance::new(event_id, user_id, registration.id, organizer_id, notes);
        self.attendances.create(&attendance).await?;

        // Attendance is recorded; the status flip is best-effort.
        let mut registration = registration;
        registration.status = RegistrationStatus::Attended;
        if let Err(err) = self.registrations.update(&registration).await {
            warn!(
                registration_id = %registration.id,
                error = %err,
                "Failed to flip registration to attended"
            );
        }

        info!(
            event_id = %event_id,
            user_id = %user_id,
            marked_by = %organizer_id,
            "Attendance marked"
        );

        Ok(attendance)
    }

    /// Mark a batch of attendees. Users without an active `registered` row or
    /// already marked are silently skipped; the call fails only when nothing
    /// remains to mark.
    pub async fn bulk_mark_attendance(
        &self,
        organizer_id: Uuid,
        event_id: Uuid,
        user_ids: &[Uuid],
    ) -> Result<Vec<Attendance>> {
        let event = self
            .events
            .get(event_id)
            .await?
            .ok_or(CampusHubError::EventNotFound { event_id })?;

        if event.organizer_id != organizer_id {
            return Err(CampusHubError::PermissionDenied(
                "you don't have permission to mark attendance for this event".to_string(),
            ));
        }

        if !event.has_started() {
            return Err(CampusHubError::EventNotStarted);
        }

        let _guard = self.locks.acquire(event_id).await;

        let mut attendances = Vec::new();
        let mut to_flip: Vec<Registration> = Vec::new();
        let mut seen: HashSet<Uuid> = HashSet::new();

        for &user_id in user_ids {
            // Repeated ids in one batch count once
            if !seen.insert(user_id) {
                continue;
            }

            let registration = match self
                .registrations
                .latest_by_user_and_event(user_id, event_id)
                .await
            {
                Ok(Some(r)) if r.is_registered() => r,
                Ok(_) => continue,
                Err(err) => {
                    warn!(user_id = %user_id, error = %err, "Skipping user in bulk attendance");
                    continue;
                }
            };

            match self.attendances.get_by_event_and_user(event_id, user_id).await {
                Ok(None) => {}
                Ok(Some(_)) => continue,
                Err(err) => {
                    warn!(user_id = %user_id, error = %err, "Skipping user in bulk attendance");
                    continue;
                }
            }

            attendances.push(Attendance::new(
                event_id,
                user_id,
                registration.id,
                organizer_id,
                None,
            ));
            let mut registration = registration;
            registration.status = RegistrationStatus::Attended;
            to_flip.push(registration);
        }

        if attendances.is_empty() {
            return Err(CampusHubError::EmptyAttendanceBatch);
        }

        self.attendances.bulk_create(&attendances).await?;

        // Status flips are best-effort, issued concurrently.
        let results = join_all(
            to_flip
                .iter()
                .map(|registration| self.registrations.update(registration)),
        )
        .await;
        for (registration, result) in to_flip.iter().zip(results) {
            if let Err(err) = result {
                warn!(
                    registration_id = %registration.id,
                    user_id = %registration.user_id,
                    error = %err,
                    "Failed to flip registration to attended"
                );
            }
        }

        info!(
            event_id = %event_id,
            marked = attendances.len(),
            requested = user_ids.len(),
            "Bulk attendance marked"
        );

        Ok(attendances)
    }

    /// Get attendance records for an event; organizer only
    pub async fn get_event_attendance(
        &self,
        organizer_id: Uuid,
        event_id: Uuid,
    ) -> Result<Vec<Attendance>> {
        let event = self
            .events
            .get(event_id)
            .await?
            .ok_or(CampusHubError::EventNotFound { event_id })?;

        if event.organizer_id != organizer_id {
            return Err(CampusHubError::PermissionDenied(
                "you don't have permission to view attendance for this event".to_string(),
            ));
        }

        self.attendances.list_by_event(event_id).await
    }
}
