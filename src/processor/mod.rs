use scraper::Html;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::config::Config;
use crate::extractor::domain::ProbeSet;
use crate::extractor::{self, ExtractionError, ExtractionStrategy, cleaner};
use crate::fetcher::{FetchError, Fetcher, RawDocument};
use crate::markdown;
use crate::metadata::{self, PageMetadata};

/// The normalized content record produced by one pipeline pass. Ephemeral:
/// returned to the caller and used to build the persisted row, never stored
/// itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedContent {
    pub title: String,
    pub sanitized_html: String,
    pub markdown: String,
    pub text_content: String,
    pub strategy: ExtractionStrategy,
    pub metadata: PageMetadata,
}

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}

/// Runs extraction, sanitization, markdown conversion, metadata derivation
/// and hashing over one document. Stateless between invocations; everything
/// it needs arrives through the constructor.
pub struct ContentProcessor {
    fetcher: Fetcher,
    probes: ProbeSet,
}

impl ContentProcessor {
    pub fn new(config: &Config, probes: ProbeSet) -> Self {
        Self {
            fetcher: Fetcher::new(config),
            probes,
        }
    }

    /// Fetch a URL and process the response.
    pub async fn process_url(&self, url: &str) -> Result<ProcessedContent, ProcessError> {
        let doc = self.fetcher.fetch(url).await?;
        Ok(self.process_document(&doc)?)
    }

    /// Process markup the caller already rendered (e.g. a client-captured
    /// single-page-app view a server-side fetch could not reproduce).
    pub fn process_client_html(
        &self,
        url: &str,
        html: impl Into<String>,
    ) -> Result<ProcessedContent, ProcessError> {
        let url = Url::parse(url).map_err(FetchError::from)?;
        let doc = RawDocument::from_client_html(url, html);
        Ok(self.process_document(&doc)?)
    }

    /// The CPU-bound pipeline core; no suspension points.
    pub fn process_document(&self, doc: &RawDocument) -> Result<ProcessedContent, ExtractionError> {
        let extraction = extractor::extract(doc, &self.probes)?;

        let sanitized_html = cleaner::sanitize(&extraction.content_html);

        // Plain text is re-derived from the sanitized fragment so hashing and
        // word counts never see boilerplate the sanitizer dropped.
        let text_content = fragment_text(&sanitized_html);
        if text_content.is_empty() {
            return Err(ExtractionError::NoReadableContent);
        }

        let markdown = markdown::to_markdown(&sanitized_html);

        // Meta tags are read from the original document; sanitization has
        // already removed them from the fragment.
        let metadata = metadata::build(&doc.html, &text_content, extraction.domain_meta.as_ref());

        Ok(ProcessedContent {
            title: extraction.title,
            sanitized_html,
            markdown,
            text_content,
            strategy: extraction.strategy,
            metadata,
        })
    }
}

fn fragment_text(html: &str) -> String {
    Html::parse_fragment(html)
        .root_element()
        .text()
        .collect::<String>()
        .trim()
        .to_string()
}
