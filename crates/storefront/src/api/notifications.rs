//! `/notifications/*` endpoints.

use chrono::{DateTime, Utc};
use marchenet_core::NotificationId;
use reqwest::Method;
use serde::Deserialize;
use tracing::instrument;

use super::{ApiClient, ApiError};

/// Sender shown for admin notifications and for any without a vendor.
pub const ADMIN_SENDER: &str = "L’équipe MarchéNet Afrique";

/// Vendor that sent a notification, as embedded by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NotificationSender {
    #[serde(default)]
    pub vendor_name: Option<String>,
}

/// A notification addressed to the current user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, rename = "vendors")]
    pub sender: Option<NotificationSender>,
}

impl Notification {
    #[must_use]
    pub fn sender_name(&self) -> &str {
        if self.is_admin {
            return ADMIN_SENDER;
        }
        self.sender
            .as_ref()
            .and_then(|sender| sender.vendor_name.as_deref())
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(ADMIN_SENDER)
    }
}

impl ApiClient {
    #[instrument(skip(self))]
    pub async fn notifications(&self) -> Result<Vec<Notification>, ApiError> {
        let notifications: Option<Vec<Notification>> = self.get("/notifications").await?;
        Ok(notifications.unwrap_or_default())
    }

    /// Mark one notification read. Already-read ones are not sent again.
    #[instrument(skip(self, notification), fields(notification_id = %notification.id))]
    pub async fn mark_notification_read(
        &self,
        notification: &mut Notification,
    ) -> Result<(), ApiError> {
        if notification.is_read {
            return Ok(());
        }
        let builder = self
            .request(Method::PUT, &format!("/notifications/{}/read", notification.id))?
            .json(&serde_json::json!({}));
        self.send(builder).await?;
        notification.is_read = true;
        Ok(())
    }
}
