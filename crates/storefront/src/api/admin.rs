//! Moderation endpoints used by the admin dashboard.
//!
//! The backend enforces the admin role; these wrappers only shape requests.

use chrono::{DateTime, Utc};
use marchenet_core::{MessageId, ProductId, UserId};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::{ApiClient, ApiError, Product, ProductStatus};

/// Response header carrying the unpaged message count.
const TOTAL_COUNT_HEADER: &str = "x-total-count";

/// Category picked on the contact form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Question,
    /// Anything that is not a question is shown as a complaint.
    #[default]
    #[serde(other)]
    Complaint,
}

/// A message left through the contact form.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContactMessage {
    pub id: MessageId,
    #[serde(default, rename = "type")]
    pub kind: MessageKind,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Page selection for `GET /messages`. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageFilter {
    pub page: u32,
    pub per_page: u32,
    /// `None` lists every kind.
    pub kind: Option<MessageKind>,
}

impl Default for MessageFilter {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 10,
            kind: None,
        }
    }
}

/// Inclusive row range the backend expects.
#[derive(Debug, PartialEq, Eq, Serialize)]
struct MessageQuery {
    from: u64,
    to: u64,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    kind: Option<MessageKind>,
}

impl MessageFilter {
    fn query(&self) -> MessageQuery {
        let per_page = u64::from(self.per_page.max(1));
        let from = u64::from(self.page.max(1) - 1) * per_page;
        MessageQuery {
            from,
            to: from + per_page - 1,
            kind: self.kind,
        }
    }
}

/// One page of contact messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessagePage {
    pub messages: Vec<ContactMessage>,
    /// Count across all pages, from the `x-total-count` header.
    pub total: u64,
}

impl MessagePage {
    #[must_use]
    pub fn page_count(&self, per_page: u32) -> u64 {
        self.total.div_ceil(u64::from(per_page.max(1)))
    }
}

/// Body of `POST /notifications`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewNotification {
    pub sender_id: UserId,
    /// `None` broadcasts to every user.
    pub receiver_id: Option<UserId>,
    pub message: String,
    /// `"all"` or the receiver's id.
    pub target: String,
}

impl NewNotification {
    #[must_use]
    pub fn broadcast(sender_id: UserId, message: impl Into<String>) -> Self {
        Self {
            sender_id,
            receiver_id: None,
            message: message.into(),
            target: "all".to_owned(),
        }
    }

    #[must_use]
    pub fn to_user(sender_id: UserId, receiver_id: UserId, message: impl Into<String>) -> Self {
        Self {
            sender_id,
            target: receiver_id.to_string(),
            receiver_id: Some(receiver_id),
            message: message.into(),
        }
    }
}

#[derive(Serialize)]
struct StatusBody {
    status: ProductStatus,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ProductList {
    List(Vec<Product>),
    Page { data: Vec<Product> },
}

impl ApiClient {
    /// Every listing regardless of moderation state.
    #[instrument(skip(self))]
    pub async fn all_products(&self) -> Result<Vec<Product>, ApiError> {
        let products: Option<ProductList> = self.get("/products").await?;
        Ok(match products {
            Some(ProductList::List(products) | ProductList::Page { data: products }) => products,
            None => Vec::new(),
        })
    }

    /// Approve or reject a listing.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn set_product_status(
        &self,
        id: &ProductId,
        status: ProductStatus,
    ) -> Result<(), ApiError> {
        self.patch(&format!("/products/{id}/status"), &StatusBody { status })
            .await
    }

    #[instrument(skip(self))]
    pub async fn contact_messages(&self, filter: &MessageFilter) -> Result<MessagePage, ApiError> {
        let builder = self
            .request(Method::GET, "/messages")?
            .query(&filter.query());
        let response = self.send(builder).await?;

        let total = response
            .headers()
            .get(TOTAL_COUNT_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(0);

        let text = response.text().await?;
        let messages: Option<Vec<ContactMessage>> = if text.trim().is_empty() {
            None
        } else {
            serde_json::from_str(&text)?
        };
        let messages = messages.unwrap_or_default();
        debug!(count = messages.len(), total, "Loaded contact messages");
        Ok(MessagePage { messages, total })
    }

    #[instrument(skip(self, notification), fields(target = %notification.target))]
    pub async fn send_notification(&self, notification: &NewNotification) -> Result<(), ApiError> {
        let builder = self
            .request(Method::POST, "/notifications")?
            .json(notification);
        self.send(builder).await?;
        Ok(())
    }
}
