//! Event repository implementation

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::event::{Event, EventStatus};
use crate::store::{EventFilter, EventStore};
use crate::utils::errors::Result;

const EVENT_COLUMNS: &str = "id, organizer_id, title, description, category, event_type, location, join_link, poster_path, start_date, end_date, registration_deadline, max_participants, current_participants, is_uii_only, status, created_at, updated_at";

#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventStore for EventRepository {
    /// Find event by ID
    async fn get(&self, id: Uuid) -> Result<Option<Event>> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// Create a new event
    async fn create(&self, event: &Event) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO events (id, organizer_id, title, description, category, event_type, location, join_link, poster_path, start_date, end_date, registration_deadline, max_participants, current_participants, is_uii_only, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            "#,
        )
        .bind(event.id)
        .bind(event.organizer_id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.category)
        .bind(event.event_type)
        .bind(&event.location)
        .bind(&event.join_link)
        .bind(&event.poster_path)
        .bind(event.start_date)
        .bind(event.end_date)
        .bind(event.registration_deadline)
        .bind(event.max_participants)
        .bind(event.current_participants)
        .bind(event.is_uii_only)
        .bind(event.status)
        .bind(event.created_at)
        .bind(event.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Update event fields except the participant counter, which only the
    /// seat operations touch
    async fn update(&self, event: &Event) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE events
            SET title = $2,
                description = $3,
                category = $4,
                event_type = $5,
                location = $6,
                join_link = $7,
                poster_path = $8,
                start_date = $9,
                end_date = $10,
                registration_deadline = $11,
                max_participants = $12,
                is_uii_only = $13,
                status = $14,
                updated_at = $15
            WHERE id = $1
            "#,
        )
        .bind(event.id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.category)
        .bind(event.event_type)
        .bind(&event.location)
        .bind(&event.join_link)
        .bind(&event.poster_path)
        .bind(event.start_date)
        .bind(event.end_date)
        .bind(event.registration_deadline)
        .bind(event.max_participants)
        .bind(event.is_uii_only)
        .bind(event.status)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Delete event (draft events only at the service layer)
    async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// List events matching the filter, soonest first
    async fn list(&self, filter: EventFilter) -> Result<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>(&format!(
            r#"
            SELECT {EVENT_COLUMNS} FROM events
            WHERE ($1::event_status IS NULL OR status = $1)
              AND ($2::event_category IS NULL OR category = $2)
            ORDER BY start_date ASC
            "#
        ))
        .bind(filter.status)
        .bind(filter.category)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Get events owned by an organizer
    async fn list_by_organizer(&self, organizer_id: Uuid) -> Result<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE organizer_id = $1 ORDER BY start_date ASC"
        ))
        .bind(organizer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Update event lifecycle status
    async fn update_status(&self, id: Uuid, status: EventStatus) -> Result<()> {
        sqlx::query("UPDATE events SET status = $2, updated_at = $3 WHERE id = $1")
            .bind(id)
            .bind(status)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Conditional increment: one statement, so the capacity check and the
    /// counter bump cannot be interleaved by a concurrent caller
    async fn try_reserve_seat(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE events
            SET current_participants = current_participants + 1, updated_at = $2
            WHERE id = $1 AND current_participants < max_participants
            "#,
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Decrement the participant counter, floored at zero
    async fn release_seat(&self, id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE events
            SET current_participants = GREATEST(current_participants - 1, 0), updated_at = $2
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
