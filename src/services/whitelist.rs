//! Whitelist service implementation
//!
//! The organizer approval workflow: mahasiswa submit an organization request
//! with a supporting document; an admin reviews it. Approval promotes the
//! user to the organisasi role. Review outcome emails are best-effort.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{UserRole, WhitelistRequest, WhitelistStatus};
use crate::services::notification::Notifier;
use crate::store::{UserStore, WhitelistStore};
use crate::utils::errors::{CampusHubError, Result};

/// Whitelist approval service
#[derive(Clone)]
pub struct WhitelistService {
    requests: Arc<dyn WhitelistStore>,
    users: Arc<dyn UserStore>,
    notifier: Arc<dyn Notifier>,
}

impl WhitelistService {
    pub fn new(
        requests: Arc<dyn WhitelistStore>,
        users: Arc<dyn UserStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            requests,
            users,
            notifier,
        }
    }

    /// Submit a new whitelist request
    pub async fn submit_request(
        &self,
        user_id: Uuid,
        organization_name: String,
        document_path: String,
    ) -> Result<WhitelistRequest> {
        let user = self
            .users
            .get(user_id)
            .await?
            .ok_or(CampusHubError::UserNotFound { user_id })?;

        if !user.is_mahasiswa() {
            return Err(CampusHubError::PermissionDenied(
                "only mahasiswa can submit a whitelist request".to_string(),
            ));
        }

        if let Some(existing) = self.requests.latest_by_user(user_id).await? {
            if existing.is_pending() {
                return Err(CampusHubError::InvalidInput(
                    "you already have a pending request".to_string(),
                ));
            }
        }

        let request = WhitelistRequest::new(user_id, organization_name, document_path);
        self.requests.create(&request).await?;
        info!(user_id = %user_id, request_id = %request.id, "Whitelist request submitted");

        Ok(request)
    }

    /// Get the caller's most recent request
    pub async fn my_request(&self, user_id: Uuid) -> Result<Option<WhitelistRequest>> {
        self.requests.latest_by_user(user_id).await
    }

    /// List requests, optionally by status
    pub async fn list_requests(
        &self,
        status: Option<WhitelistStatus>,
    ) -> Result<Vec<WhitelistRequest>> {
        self.requests.list(status).await
    }

    /// Review a pending request: approve (promotes the user to organisasi) or
    /// reject with a reason.
    pub async fn review_request(
        &self,
        reviewer_id: Uuid,
        request_id: Uuid,
        approve: bool,
        rejection_reason: Option<String>,
    ) -> Result<WhitelistRequest> {
        let mut request = self
            .requests
            .get(request_id)
            .await?
            .ok_or(CampusHubError::WhitelistRequestNotFound { request_id })?;

        if !request.is_pending() {
            return Err(CampusHubError::AlreadyReviewed);
        }

        let user = self
            .users
            .get(request.user_id)
            .await?
            .ok_or(CampusHubError::UserNotFound {
                user_id: request.user_id,
            })?;

        request.status = if approve {
            WhitelistStatus::Approved
        } else {
            WhitelistStatus::Rejected
        };
        request.rejection_reason = if approve { None } else { rejection_reason };
        request.reviewed_by = Some(reviewer_id);
        request.reviewed_at = Some(Utc::now());

        self.requests.update(&request).await?;

        if approve {
            self.users
                .update_role(request.user_id, UserRole::Organisasi)
                .await?;
        }

        info!(
            request_id = %request_id,
            reviewer_id = %reviewer_id,
            approved = approve,
            "Whitelist request reviewed"
        );

        if approve {
            if let Err(err) = self
                .notifier
                .whitelist_approved(&user.email, &user.full_name, &request.organization_name)
                .await
            {
                warn!(user_id = %user.id, error = %err, "Failed to send approval email");
            }
        } else {
            let reason = request
                .rejection_reason
                .as_deref()
                .unwrap_or("no reason given");
            if let Err(err) = self
                .notifier
                .whitelist_rejected(&user.email, &user.full_name, reason)
                .await
            {
                warn!(user_id = %user.id, error = %err, "Failed to send rejection email");
            }
        }

        Ok(request)
    }
}
