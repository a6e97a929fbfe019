//! Registration repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::registration::{Registration, RegistrationStatus};
use crate::store::RegistrationStore;
use crate::utils::errors::{CampusHubError, Result};

const REGISTRATION_COLUMNS: &str =
    "id, event_id, user_id, status, registered_at, cancelled_at, reminder_sent";

#[derive(Clone)]
pub struct RegistrationRepository {
    pool: PgPool,
}

impl RegistrationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RegistrationStore for RegistrationRepository {
    /// Find registration by ID
    async fn get(&self, id: Uuid) -> Result<Option<Registration>> {
        let registration = sqlx::query_as::<_, Registration>(&format!(
            "SELECT {REGISTRATION_COLUMNS} FROM registrations WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(registration)
    }

    /// Create a new registration row
    async fn create(&self, registration: &Registration) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO registrations (id, event_id, user_id, status, registered_at, cancelled_at, reminder_sent)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(registration.id)
        .bind(registration.event_id)
        .bind(registration.user_id)
        .bind(registration.status)
        .bind(registration.registered_at)
        .bind(registration.cancelled_at)
        .bind(registration.reminder_sent)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Update registration status and reminder flag
    async fn update(&self, registration: &Registration) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE registrations
            SET status = $2, cancelled_at = $3, reminder_sent = $4
            WHERE id = $1
            "#,
        )
        .bind(registration.id)
        .bind(registration.status)
        .bind(registration.cancelled_at)
        .bind(registration.reminder_sent)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Mark a registration cancelled with the cancellation timestamp. Only
    /// registered or waitlisted rows qualify; the guard lives in the statement
    /// so a row that changed since the caller read it cannot slip through.
    async fn cancel(&self, id: Uuid, at: DateTime<Utc>) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE registrations
            SET status = 'cancelled', cancelled_at = $2
            WHERE id = $1 AND status IN ('registered', 'waitlist')
            "#,
        )
        .bind(id)
        .bind(at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CampusHubError::NotCancellable);
        }

        Ok(())
    }

    /// Most recent registration row for a (user, event) pair
    async fn latest_by_user_and_event(
        &self,
        user_id: Uuid,
        event_id: Uuid,
    ) -> Result<Option<Registration>> {
        let registration = sqlx::query_as::<_, Registration>(&format!(
            r#"
            SELECT {REGISTRATION_COLUMNS} FROM registrations
            WHERE user_id = $1 AND event_id = $2
            ORDER BY registered_at DESC
            LIMIT 1
            "#
        ))
        .bind(user_id)
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(registration)
    }

    /// Get a user's registrations, newest first
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Registration>> {
        let registrations = sqlx::query_as::<_, Registration>(&format!(
            "SELECT {REGISTRATION_COLUMNS} FROM registrations WHERE user_id = $1 ORDER BY registered_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(registrations)
    }

    /// Get registrations for an event, optionally filtered by status
    async fn list_by_event(
        &self,
        event_id: Uuid,
        status: Option<RegistrationStatus>,
    ) -> Result<Vec<Registration>> {
        let registrations = sqlx::query_as::<_, Registration>(&format!(
            r#"
            SELECT {REGISTRATION_COLUMNS} FROM registrations
            WHERE event_id = $1
              AND ($2::registration_status IS NULL OR status = $2)
            ORDER BY registered_at ASC
            "#
        ))
        .bind(event_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(registrations)
    }

    /// Waitlisted registrations in promotion order
    async fn list_waitlist(&self, event_id: Uuid) -> Result<Vec<Registration>> {
        self.list_by_event(event_id, Some(RegistrationStatus::Waitlist))
            .await
    }

    /// Count registrations for an event in a given status
    async fn count_by_event_and_status(
        &self,
        event_id: Uuid,
        status: RegistrationStatus,
    ) -> Result<i64> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM registrations WHERE event_id = $1 AND status = $2",
        )
        .bind(event_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }
}
