//! Whitelist request repository implementation

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::whitelist::{WhitelistRequest, WhitelistStatus};
use crate::store::WhitelistStore;
use crate::utils::errors::Result;

const WHITELIST_COLUMNS: &str = "id, user_id, organization_name, document_path, status, rejection_reason, reviewed_by, reviewed_at, created_at, updated_at";

#[derive(Clone)]
pub struct WhitelistRepository {
    pool: PgPool,
}

impl WhitelistRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WhitelistStore for WhitelistRepository {
    /// Find request by ID
    async fn get(&self, id: Uuid) -> Result<Option<WhitelistRequest>> {
        let request = sqlx::query_as::<_, WhitelistRequest>(&format!(
            "SELECT {WHITELIST_COLUMNS} FROM whitelist_requests WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    /// Create a new whitelist request
    async fn create(&self, request: &WhitelistRequest) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO whitelist_requests (id, user_id, organization_name, document_path, status, rejection_reason, reviewed_by, reviewed_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(request.id)
        .bind(request.user_id)
        .bind(&request.organization_name)
        .bind(&request.document_path)
        .bind(request.status)
        .bind(&request.rejection_reason)
        .bind(request.reviewed_by)
        .bind(request.reviewed_at)
        .bind(request.created_at)
        .bind(request.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Update review outcome
    async fn update(&self, request: &WhitelistRequest) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE whitelist_requests
            SET status = $2, rejection_reason = $3, reviewed_by = $4, reviewed_at = $5, updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(request.id)
        .bind(request.status)
        .bind(&request.rejection_reason)
        .bind(request.reviewed_by)
        .bind(request.reviewed_at)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Most recent request submitted by a user
    async fn latest_by_user(&self, user_id: Uuid) -> Result<Option<WhitelistRequest>> {
        let request = sqlx::query_as::<_, WhitelistRequest>(&format!(
            r#"
            SELECT {WHITELIST_COLUMNS} FROM whitelist_requests
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT 1
            "#
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    /// List requests, optionally filtered by status, oldest first
    async fn list(&self, status: Option<WhitelistStatus>) -> Result<Vec<WhitelistRequest>> {
        let requests = sqlx::query_as::<_, WhitelistRequest>(&format!(
            r#"
            SELECT {WHITELIST_COLUMNS} FROM whitelist_requests
            WHERE ($1::whitelist_status IS NULL OR status = $1)
            ORDER BY created_at ASC
            "#
        ))
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }
}
