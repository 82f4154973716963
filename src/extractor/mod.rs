pub mod cleaner;
pub mod domain;
pub mod errors;
pub mod generic;
pub mod model;

#[cfg(test)]
mod tests;

pub use errors::ExtractionError;
pub use model::{ContentKind, ExtractionResult, ExtractionStrategy};

use crate::fetcher::types::RawDocument;
use domain::ProbeSet;

/// Strategy selector: documents from a structured platform get the probe
/// table first; everything else, and every probe miss, goes through the
/// generic boilerplate-removal heuristic.
pub fn extract(doc: &RawDocument, probes: &ProbeSet) -> Result<ExtractionResult, ExtractionError> {
    if probes.matches_url(&doc.url)
        && let Some(hit) = domain::extract(&doc.html, probes)
    {
        let title =
            generic::document_title(&doc.html).unwrap_or_else(|| "Untitled".to_string());
        return Ok(ExtractionResult {
            title,
            content_html: hit.html,
            text: hit.text,
            strategy: ExtractionStrategy::DomainSpecific(hit.kind),
            domain_meta: Some(domain::extract_metadata(&doc.html)),
        });
    }

    let article =
        generic::extract(&doc.html, &doc.url).ok_or(ExtractionError::NoReadableContent)?;

    Ok(ExtractionResult {
        title: article
            .title
            .unwrap_or_else(|| "Untitled".to_string()),
        content_html: article.html,
        text: article.text,
        strategy: ExtractionStrategy::Generic,
        domain_meta: None,
    })
}
