use std::sync::Arc;

use thiserror::Error;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::config::Config;
use crate::entities::StoredPage;
use crate::extractor::ExtractionError;
use crate::extractor::domain::ProbeSet;
use crate::fetcher::FetchError;
use crate::processor::{ContentProcessor, ProcessError, ProcessedContent};
use crate::repositories::{PageRepositoryTrait, StorageError};

/// Outcome of one `analyze` call: the persisted row, whether this call
/// created it, and the freshly processed content for downstream features.
#[derive(Debug)]
pub struct Analysis {
    pub page: StoredPage,
    pub is_new: bool,
    pub content: ProcessedContent,
}

#[derive(Error, Debug)]
pub enum AnalyzeError {
    /// Network/transport failure; the caller may retry.
    #[error(transparent)]
    Fetch(#[from] FetchError),
    /// Fatal for this input; retrying needs different input.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    /// Persistence failure; the caller should retry the whole call.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<ProcessError> for AnalyzeError {
    fn from(err: ProcessError) -> Self {
        match err {
            ProcessError::Fetch(e) => Self::Fetch(e),
            ProcessError::Extraction(e) => Self::Extraction(e),
        }
    }
}

/// Library entry point tying the processing pipeline to the deduplicating
/// repository. One instance serves many concurrent invocations; the only
/// shared state is the persisted store behind the repository.
pub struct PageAnalyzer {
    processor: ContentProcessor,
    pages: Arc<dyn PageRepositoryTrait + Send + Sync>,
}

impl PageAnalyzer {
    pub fn new(
        config: &Config,
        probes: ProbeSet,
        pages: Arc<dyn PageRepositoryTrait + Send + Sync>,
    ) -> Self {
        Self {
            processor: ContentProcessor::new(config, probes),
            pages,
        }
    }

    /// Process a page and find-or-create its persisted record. When `html`
    /// is supplied the fetch step is skipped and the caller's rendered markup
    /// is used as-is.
    #[instrument(skip(self, html), fields(url = %url, owner = %owner))]
    pub async fn analyze(
        &self,
        url: &str,
        owner: Uuid,
        html: Option<String>,
    ) -> Result<Analysis, AnalyzeError> {
        let content = match html {
            Some(html) => self.processor.process_client_html(url, html)?,
            None => self.processor.process_url(url).await?,
        };

        // Nothing is persisted before hashing completes; an abandoned request
        // leaves no partial rows behind.
        let (page, is_new) = self.pages.find_or_create(url, owner, &content).await?;

        info!(
            is_new,
            content_hash = %content.metadata.content_hash,
            strategy = ?content.strategy,
            "page analyzed"
        );

        Ok(Analysis {
            page,
            is_new,
            content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MockPageRepositoryTrait;
    use chrono::Utc;

    fn article(text_seed: &str) -> String {
        let prose = format!("{text_seed} with plenty of surrounding prose text. ").repeat(4);
        format!(
            "<html><head><title>Analyzer Test</title></head><body><article><p>{prose}</p></article></body></html>"
        )
    }

    fn page_for(url: &str, owner: Uuid, content: &ProcessedContent) -> StoredPage {
        let now = Utc::now();
        StoredPage {
            id: Uuid::new_v4(),
            url: url.to_string(),
            title: content.title.clone(),
            extracted_markdown: content.markdown.clone(),
            content_hash: content.metadata.content_hash.clone(),
            created_by: owner,
            metadata: None,
            scraped_at: now,
            updated_at: now,
        }
    }

    fn analyzer(repo: MockPageRepositoryTrait) -> PageAnalyzer {
        PageAnalyzer::new(&Config::default(), ProbeSet::canvas(), Arc::new(repo))
    }

    #[tokio::test]
    async fn new_content_reports_is_new() {
        let mut repo = MockPageRepositoryTrait::new();
        repo.expect_find_or_create()
            .withf(|url, _, content| {
                url == "https://example.com/post" && !content.metadata.content_hash.is_empty()
            })
            .returning(|url, owner, content| Ok((page_for(url, owner, content), true)));

        let result = analyzer(repo)
            .analyze(
                "https://example.com/post",
                Uuid::new_v4(),
                Some(article("fresh content")),
            )
            .await
            .unwrap();

        assert!(result.is_new);
        assert_eq!(result.page.content_hash, result.content.metadata.content_hash);
    }

    #[tokio::test]
    async fn known_content_reports_lookup_hit() {
        let mut repo = MockPageRepositoryTrait::new();
        repo.expect_find_or_create()
            .returning(|url, owner, content| Ok((page_for(url, owner, content), false)));

        let result = analyzer(repo)
            .analyze(
                "https://example.com/post",
                Uuid::new_v4(),
                Some(article("previously seen content")),
            )
            .await
            .unwrap();

        assert!(!result.is_new);
    }

    #[tokio::test]
    async fn unreadable_input_never_touches_the_store() {
        // No expectation is set: a find_or_create call would panic the mock.
        let repo = MockPageRepositoryTrait::new();

        let err = analyzer(repo)
            .analyze(
                "https://example.com/shell",
                Uuid::new_v4(),
                Some("<html><body><nav>menu</nav></body></html>".to_string()),
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AnalyzeError::Extraction(ExtractionError::NoReadableContent)
        ));
    }

    #[tokio::test]
    async fn storage_failures_surface_typed() {
        let mut repo = MockPageRepositoryTrait::new();
        repo.expect_find_or_create()
            .returning(|_, _, _| Err(StorageError::MissingAfterConflict));

        let err = analyzer(repo)
            .analyze(
                "https://example.com/post",
                Uuid::new_v4(),
                Some(article("content headed for a storage failure")),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AnalyzeError::Storage(_)));
    }
}
