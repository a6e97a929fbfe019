//! Event service implementation
//!
//! Organizer-facing event lifecycle: creation, updates, publishing, and
//! deletion. Draft events are hard-deleted; anything past draft is cancelled
//! instead so registrations keep a valid parent.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::models::{CreateEventRequest, Event, EventStatus, EventType, UpdateEventRequest};
use crate::store::{EventFilter, EventStore};
use crate::utils::errors::{CampusHubError, Result};

/// Event service for organizer operations
#[derive(Clone)]
pub struct EventService {
    events: Arc<dyn EventStore>,
}

impl EventService {
    pub fn new(events: Arc<dyn EventStore>) -> Self {
        Self { events }
    }

    /// Create a new draft event
    pub async fn create_event(
        &self,
        organizer_id: Uuid,
        request: CreateEventRequest,
        poster_path: Option<String>,
    ) -> Result<Event> {
        let now = Utc::now();

        if request.start_date <= now {
            return Err(CampusHubError::InvalidInput(
                "start date must be in the future".to_string(),
            ));
        }
        if request.end_date <= request.start_date {
            return Err(CampusHubError::InvalidInput(
                "end date must be after start date".to_string(),
            ));
        }
        if request.registration_deadline >= request.start_date {
            return Err(CampusHubError::InvalidInput(
                "registration deadline must be before start date".to_string(),
            ));
        }
        if request.max_participants <= 0 {
            return Err(CampusHubError::InvalidInput(
                "max participants must be greater than 0".to_string(),
            ));
        }
        if request.event_type == EventType::Offline
            && request.location.as_deref().unwrap_or("").is_empty()
        {
            return Err(CampusHubError::InvalidInput(
                "location is required for offline events".to_string(),
            ));
        }
        if request.event_type == EventType::Online
            && request.join_link.as_deref().unwrap_or("").is_empty()
        {
            return Err(CampusHubError::InvalidInput(
                "join link is required for online events".to_string(),
            ));
        }

        let event = Event {
            id: Uuid::new_v4(),
            organizer_id,
            title: request.title,
            description: request.description,
            category: request.category,
            event_type: request.event_type,
            location: request.location,
            join_link: request.join_link,
            poster_path,
            start_date: request.start_date,
            end_date: request.end_date,
            registration_deadline: request.registration_deadline,
            max_participants: request.max_participants,
            current_participants: 0,
            is_uii_only: request.is_uii_only,
            status: EventStatus::Draft,
            created_at: now,
            updated_at: now,
        };

        self.events.create(&event).await?;
        info!(event_id = %event.id, organizer_id = %organizer_id, "Event created");

        Ok(event)
    }

    /// Get a single event
    pub async fn get_event(&self, event_id: Uuid) -> Result<Event> {
        self.events
            .get(event_id)
            .await?
            .ok_or(CampusHubError::EventNotFound { event_id })
    }

    /// List events; defaults to published ones when no status filter is given
    pub async fn list_events(&self, mut filter: EventFilter) -> Result<Vec<Event>> {
        if filter.status.is_none() {
            filter.status = Some(EventStatus::Published);
        }
        self.events.list(filter).await
    }

    /// List events owned by an organizer
    pub async fn my_events(&self, organizer_id: Uuid) -> Result<Vec<Event>> {
        self.events.list_by_organizer(organizer_id).await
    }

    /// Update an event owned by the organizer
    pub async fn update_event(
        &self,
        organizer_id: Uuid,
        event_id: Uuid,
        request: UpdateEventRequest,
        poster_path: Option<String>,
    ) -> Result<Event> {
        let mut event = self.owned_event(organizer_id, event_id).await?;

        if matches!(event.status, EventStatus::Completed | EventStatus::Cancelled) {
            return Err(CampusHubError::InvalidInput(
                "cannot update completed or cancelled events".to_string(),
            ));
        }

        if let Some(start_date) = request.start_date {
            if start_date <= Utc::now() && event.status == EventStatus::Draft {
                return Err(CampusHubError::InvalidInput(
                    "start date must be in the future".to_string(),
                ));
            }
            event.start_date = start_date;
        }
        if let Some(end_date) = request.end_date {
            if end_date <= event.start_date {
                return Err(CampusHubError::InvalidInput(
                    "end date must be after start date".to_string(),
                ));
            }
            event.end_date = end_date;
        }
        if let Some(deadline) = request.registration_deadline {
            if deadline >= event.start_date {
                return Err(CampusHubError::InvalidInput(
                    "registration deadline must be before start date".to_string(),
                ));
            }
            event.registration_deadline = deadline;
        }
        if let Some(max_participants) = request.max_participants {
            if max_participants < event.current_participants {
                return Err(CampusHubError::InvalidInput(
                    "cannot reduce max participants below current participants count".to_string(),
                ));
            }
            event.max_participants = max_participants;
        }

        if let Some(title) = request.title {
            event.title = title;
        }
        if let Some(description) = request.description {
            event.description = description;
        }
        if let Some(category) = request.category {
            event.category = category;
        }
        if let Some(event_type) = request.event_type {
            event.event_type = event_type;
        }
        if request.location.is_some() {
            event.location = request.location;
        }
        if request.join_link.is_some() {
            event.join_link = request.join_link;
        }
        if poster_path.is_some() {
            event.poster_path = poster_path;
        }
        if let Some(is_uii_only) = request.is_uii_only {
            event.is_uii_only = is_uii_only;
        }

        event.updated_at = Utc::now();
        self.events.update(&event).await?;
        info!(event_id = %event_id, "Event updated");

        Ok(event)
    }

    /// Delete a draft event, or cancel a non-draft one
    pub async fn delete_event(&self, organizer_id: Uuid, event_id: Uuid) -> Result<()> {
        let event = self.owned_event(organizer_id, event_id).await?;

        if event.status != EventStatus::Draft {
            self.events
                .update_status(event_id, EventStatus::Cancelled)
                .await?;
            info!(event_id = %event_id, "Event cancelled");
            return Ok(());
        }

        self.events.delete(event_id).await?;
        info!(event_id = %event_id, "Draft event deleted");
        Ok(())
    }

    /// Publish a draft event; requires a poster
    pub async fn publish_event(&self, organizer_id: Uuid, event_id: Uuid) -> Result<()> {
        let event = self.owned_event(organizer_id, event_id).await?;

        if event.status != EventStatus::Draft {
            return Err(CampusHubError::InvalidInput(
                "event is not in draft status".to_string(),
            ));
        }

        if event.poster_path.as_deref().unwrap_or("").is_empty() {
            return Err(CampusHubError::InvalidInput(
                "event must have a poster before publishing".to_string(),
            ));
        }

        self.events
            .update_status(event_id, EventStatus::Published)
            .await?;
        info!(event_id = %event_id, "Event published");
        Ok(())
    }

    async fn owned_event(&self, organizer_id: Uuid, event_id: Uuid) -> Result<Event> {
        let event = self
            .events
            .get(event_id)
            .await?
            .ok_or(CampusHubError::EventNotFound { event_id })?;

        if event.organizer_id != organizer_id {
            return Err(CampusHubError::PermissionDenied(
                "you don't have permission to manage this event".to_string(),
            ));
        }

        Ok(event)
    }
}
