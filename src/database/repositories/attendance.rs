//! Attendance repository implementation

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::attendance::Attendance;
use crate::store::AttendanceStore;
use crate::utils::errors::Result;

const ATTENDANCE_COLUMNS: &str =
    "id, event_id, user_id, registration_id, marked_at, marked_by, notes";

#[derive(Clone)]
pub struct AttendanceRepository {
    pool: PgPool,
}

impl AttendanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttendanceStore for AttendanceRepository {
    /// Create a new attendance record
    async fn create(&self, attendance: &Attendance) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO attendances (id, event_id, user_id, registration_id, marked_at, marked_by, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(attendance.id)
        .bind(attendance.event_id)
        .bind(attendance.user_id)
        .bind(attendance.registration_id)
        .bind(attendance.marked_at)
        .bind(attendance.marked_by)
        .bind(&attendance.notes)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Batch-insert attendance records in one transaction
    async fn bulk_create(&self, attendances: &[Attendance]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        for attendance in attendances {
            sqlx::query(
                r#"
                INSERT INTO attendances (id, event_id, user_id, registration_id, marked_at, marked_by, notes)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(attendance.id)
            .bind(attendance.event_id)
            .bind(attendance.user_id)
            .bind(attendance.registration_id)
            .bind(attendance.marked_at)
            .bind(attendance.marked_by)
            .bind(&attendance.notes)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Find attendance for an (event, user) pair
    async fn get_by_event_and_user(
        &self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Attendance>> {
        let attendance = sqlx::query_as::<_, Attendance>(&format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendances WHERE event_id = $1 AND user_id = $2"
        ))
        .bind(event_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(attendance)
    }

    /// Get all attendance records for an event
    async fn list_by_event(&self, event_id: Uuid) -> Result<Vec<Attendance>> {
        let attendances = sqlx::query_as::<_, Attendance>(&format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendances WHERE event_id = $1 ORDER BY marked_at ASC"
        ))
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(attendances)
    }
}
