use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::entities::StoredPage;
use crate::extractor::ExtractionStrategy;
use crate::processor::ProcessedContent;

const PAGE_COLUMNS: &str =
    "id, url, title, extracted_markdown, content_hash, created_by, metadata, scraped_at, updated_at";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage failure: {0}")]
    Database(#[from] sqlx::Error),

    /// The unique index reported a conflict but the winning row could not be
    /// read back. Only possible if it was deleted in between.
    #[error("row vanished after unique-constraint conflict")]
    MissingAfterConflict,
}

/// Find-or-create persistence contract for processed pages. The lookup key is
/// `(url, content_hash)` within an owner scope; the transition absent ->
/// present happens at most once per key, even under concurrent callers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageRepositoryTrait {
    /// Return the existing row for this exact content, or insert one. The
    /// boolean is true iff this call created the row. On a lookup hit the
    /// freshly computed content is discarded; the stored row is the source of
    /// truth for identical content.
    async fn find_or_create(
        &self,
        url: &str,
        owner: Uuid,
        content: &ProcessedContent,
    ) -> Result<(StoredPage, bool), StorageError>;

    async fn find_by_id(&self, id: Uuid, owner: Uuid) -> Result<Option<StoredPage>, StorageError>;

    async fn find_by_url(&self, url: &str) -> Result<Option<StoredPage>, StorageError>;

    async fn find_by_content_hash(
        &self,
        content_hash: &str,
    ) -> Result<Vec<StoredPage>, StorageError>;

    /// Rewrite the metadata block and bump `updated_at`. The only permitted
    /// mutation of a stored page.
    async fn refresh_metadata(
        &self,
        id: Uuid,
        metadata: serde_json::Value,
    ) -> Result<StoredPage, StorageError>;
}

/// Postgres implementation backed by the unique index on
/// `(url, content_hash, created_by)`.
#[derive(Clone)]
pub struct PageRepository {
    pool: PgPool,
}

impl PageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_exact(
        &self,
        url: &str,
        content_hash: &str,
        owner: Uuid,
    ) -> Result<Option<StoredPage>, StorageError> {
        let page = sqlx::query_as::<_, StoredPage>(&format!(
            "SELECT {PAGE_COLUMNS} FROM pages WHERE url = $1 AND content_hash = $2 AND created_by = $3"
        ))
        .bind(url)
        .bind(content_hash)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        Ok(page)
    }
}

/// The persisted metadata block mirrors the caller-visible metadata minus the
/// hash, which lives in its own column. Pages extracted by a structural probe
/// also record the probe's content-type label.
fn metadata_json(content: &ProcessedContent) -> serde_json::Value {
    let content_type = match content.strategy {
        ExtractionStrategy::DomainSpecific(kind) => Some(kind.as_str()),
        ExtractionStrategy::Generic => None,
    };
    json!({
        "author": content.metadata.author,
        "publishedDate": content.metadata.published_date,
        "description": content.metadata.description,
        "wordCount": content.metadata.word_count,
        "readingTime": content.metadata.reading_time_minutes,
        "contentType": content_type,
    })
}

#[async_trait]
impl PageRepositoryTrait for PageRepository {
    async fn find_or_create(
        &self,
        url: &str,
        owner: Uuid,
        content: &ProcessedContent,
    ) -> Result<(StoredPage, bool), StorageError> {
        let content_hash = &content.metadata.content_hash;

        if let Some(existing) = self.find_exact(url, content_hash, owner).await? {
            return Ok((existing, false));
        }

        // Two concurrent calls can both miss the lookup; the unique index
        // decides the winner and the loser reads the winner's row back.
        let inserted = sqlx::query_as::<_, StoredPage>(&format!(
            r#"
            INSERT INTO pages (url, title, extracted_markdown, content_hash, created_by, metadata)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (url, content_hash, created_by) DO NOTHING
            RETURNING {PAGE_COLUMNS}
            "#
        ))
        .bind(url)
        .bind(&content.title)
        .bind(&content.markdown)
        .bind(content_hash)
        .bind(owner)
        .bind(metadata_json(content))
        .fetch_optional(&self.pool)
        .await?;

        match inserted {
            Some(page) => Ok((page, true)),
            None => {
                let existing = self
                    .find_exact(url, content_hash, owner)
                    .await?
                    .ok_or(StorageError::MissingAfterConflict)?;
                Ok((existing, false))
            }
        }
    }

    async fn find_by_id(&self, id: Uuid, owner: Uuid) -> Result<Option<StoredPage>, StorageError> {
        let page = sqlx::query_as::<_, StoredPage>(&format!(
            "SELECT {PAGE_COLUMNS} FROM pages WHERE id = $1 AND created_by = $2"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        Ok(page)
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<StoredPage>, StorageError> {
        let page = sqlx::query_as::<_, StoredPage>(&format!(
            "SELECT {PAGE_COLUMNS} FROM pages WHERE url = $1 ORDER BY scraped_at DESC LIMIT 1"
        ))
        .bind(url)
        .fetch_optional(&self.pool)
        .await?;

        Ok(page)
    }

    async fn find_by_content_hash(
        &self,
        content_hash: &str,
    ) -> Result<Vec<StoredPage>, StorageError> {
        let pages = sqlx::query_as::<_, StoredPage>(&format!(
            "SELECT {PAGE_COLUMNS} FROM pages WHERE content_hash = $1 ORDER BY scraped_at"
        ))
        .bind(content_hash)
        .fetch_all(&self.pool)
        .await?;

        Ok(pages)
    }

    async fn refresh_metadata(
        &self,
        id: Uuid,
        metadata: serde_json::Value,
    ) -> Result<StoredPage, StorageError> {
        let page = sqlx::query_as::<_, StoredPage>(&format!(
            "UPDATE pages SET metadata = $1, updated_at = now() WHERE id = $2 RETURNING {PAGE_COLUMNS}"
        ))
        .bind(metadata)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(page)
    }
}
