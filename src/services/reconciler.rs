//! Status reconciler
//!
//! Two periodic sweeps, each driven by a timer loop in `main`:
//! - advance event statuses along the time axis
//!   (published -> ongoing -> completed)
//! - send H-1 reminder emails to registered attendees of events starting
//!   tomorrow, revealing the online join link at this stage only
//!
//! Per-item failures are logged and never abort a sweep, so one broken event
//! cannot starve the rest.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::models::{EventStatus, RegistrationStatus};
use crate::services::notification::Notifier;
use crate::store::{EventFilter, EventStore, RegistrationStore, UserStore};
use crate::utils::errors::Result;

/// Periodic status and reminder sweeps
#[derive(Clone)]
pub struct Reconciler {
    events: Arc<dyn EventStore>,
    registrations: Arc<dyn RegistrationStore>,
    users: Arc<dyn UserStore>,
    notifier: Arc<dyn Notifier>,
}

impl Reconciler {
    pub fn new(
        events: Arc<dyn EventStore>,
        registrations: Arc<dyn RegistrationStore>,
        users: Arc<dyn UserStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            events,
            registrations,
            users,
            notifier,
        }
    }

    /// Advance event statuses based on the current time. Returns the number
    /// of events whose status changed.
    pub async fn advance_event_statuses(&self) -> Result<u32> {
        let events = self.events.list(EventFilter::default()).await?;
        let mut updated = 0;

        for event in events {
            let new_status = match event.status {
                EventStatus::Published if event.has_started() && !event.has_ended() => {
                    EventStatus::Ongoing
                }
                EventStatus::Published if event.has_ended() => EventStatus::Completed,
                EventStatus::Ongoing if event.has_ended() => EventStatus::Completed,
                _ => continue,
            };

            match self.events.update_status(event.id, new_status).await {
                Ok(()) => {
                    info!(
                        event_id = %event.id,
                        from = %event.status,
                        to = %new_status,
                        "Event status advanced"
                    );
                    updated += 1;
                }
                Err(err) => {
                    warn!(event_id = %event.id, error = %err, "Failed to advance event status");
                }
            }
        }

        info!(updated = updated, "Event status sweep finished");
        Ok(updated)
    }

    /// Send H-1 reminders for published events starting within 24..48 hours.
    /// Returns the number of reminders sent.
    pub async fn send_h1_reminders(&self) -> Result<u32> {
        let events = self
            .events
            .list(EventFilter {
                status: Some(EventStatus::Published),
                category: None,
            })
            .await?;

        let mut sent = 0;
        let now = Utc::now();

        for event in events {
            let hours_until_start = (event.start_date - now).num_hours();
            if !(24..48).contains(&hours_until_start) {
                continue;
            }

            let registrations = match self
                .registrations
                .list_by_event(event.id, Some(RegistrationStatus::Registered))
                .await
            {
                Ok(registrations) => registrations,
                Err(err) => {
                    warn!(event_id = %event.id, error = %err, "Failed to list registrations for reminders");
                    continue;
                }
            };

            for mut registration in registrations {
                if registration.reminder_sent {
                    continue;
                }

                let user = match self.users.get(registration.user_id).await {
                    Ok(Some(user)) => user,
                    Ok(None) => continue,
                    Err(err) => {
                        warn!(user_id = %registration.user_id, error = %err, "Failed to load user for reminder");
                        continue;
                    }
                };

                // The join link is revealed only now, and only for online
                // events
                let join_link = if event.is_online() {
                    event.join_link.as_deref()
                } else {
                    None
                };

                if let Err(err) = self
                    .notifier
                    .event_reminder(
                        &user.email,
                        &user.full_name,
                        &event.title,
                        event.start_date,
                        event.location.as_deref(),
                        join_link,
                        registration.id,
                    )
                    .await
                {
                    warn!(user_id = %user.id, error = %err, "Failed to send reminder");
                    continue;
                }

                registration.reminder_sent = true;
                if let Err(err) = self.registrations.update(&registration).await {
                    warn!(
                        registration_id = %registration.id,
                        error = %err,
                        "Failed to persist reminder flag"
                    );
                }

                sent += 1;
            }
        }

        info!(sent = sent, "H-1 reminder sweep finished");
        Ok(sent)
    }
}
