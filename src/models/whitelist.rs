//! Whitelist request model
//!
//! Mahasiswa submit a whitelist request to become an approved organizer
//! (organisasi); an admin reviews and approves or rejects it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Whitelist request statuses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "whitelist_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum WhitelistStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WhitelistRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub organization_name: String,
    pub document_path: String,
    pub status: WhitelistStatus,
    pub rejection_reason: Option<String>,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WhitelistRequest {
    pub fn new(user_id: Uuid, organization_name: String, document_path: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            organization_name,
            document_path,
            status: WhitelistStatus::Pending,
            rejection_reason: None,
            reviewed_by: None,
            reviewed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == WhitelistStatus::Pending
    }
}
