use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A persisted page record. Exactly one row exists per
/// `(url, content_hash, created_by)` triple; after insertion the row is
/// immutable except for `updated_at` on metadata refresh.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct StoredPage {
    pub id: Uuid,
    pub url: String,
    pub title: String,
    pub extracted_markdown: String,
    pub content_hash: String,
    pub created_by: Uuid,
    pub metadata: Option<serde_json::Value>,
    pub scraped_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
