use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

use crate::extractor::domain::DomainMetadata;
use crate::hash;

/// Average adult reading speed used for the reading-time estimate.
const WORDS_PER_MINUTE: u32 = 200;

/// Derived metadata for a processed page. `word_count`,
/// `reading_time_minutes` and `content_hash` are always present and depend
/// only on the plain text, never on the extraction strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub author: Option<String>,
    pub published_date: Option<String>,
    pub description: Option<String>,
    pub word_count: u32,
    pub reading_time_minutes: u32,
    pub content_hash: String,
}

/// Build the metadata block: meta tags come from the *original* document so
/// values the sanitizer strips are not lost; domain-specific values win over
/// them; the computed fields come from the extracted plain text.
pub fn build(original_html: &str, text: &str, domain_meta: Option<&DomainMetadata>) -> PageMetadata {
    let document = Html::parse_document(original_html);

    let mut author = meta_content(&document, "author")
        .or_else(|| meta_content(&document, "article:author"));
    let published_date = meta_content(&document, "article:published_time")
        .or_else(|| meta_content(&document, "date"));
    let mut description = meta_content(&document, "description")
        .or_else(|| meta_content(&document, "og:description"));

    // Structured-platform signals are higher fidelity than generic meta tags
    if let Some(domain) = domain_meta {
        if domain.course_title.is_some() {
            author = domain.course_title.clone();
        }
        if let Some(trail) = domain.description() {
            description = Some(trail);
        }
    }

    let word_count = word_count(text);

    PageMetadata {
        author,
        published_date,
        description,
        word_count,
        reading_time_minutes: reading_time_minutes(word_count),
        content_hash: hash::content_hash(text),
    }
}

/// Non-empty whitespace-delimited tokens in the text.
pub fn word_count(text: &str) -> u32 {
    text.split_whitespace().count() as u32
}

/// `max(1, ceil(words / 200))`; even an empty page reads as one minute.
pub fn reading_time_minutes(word_count: u32) -> u32 {
    word_count.div_ceil(WORDS_PER_MINUTE).max(1)
}

fn meta_content(document: &Html, key: &str) -> Option<String> {
    let selector =
        Selector::parse(&format!("meta[name=\"{key}\"], meta[property=\"{key}\"]")).ok()?;
    document
        .select(&selector)
        .find_map(|el| el.value().attr("content"))
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
}
