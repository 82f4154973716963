use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// A web document ready for extraction: either fetched by [`Fetcher`] or
/// handed in by a client that already rendered the page (e.g. a browser
/// extension capturing a single-page-app view).
///
/// [`Fetcher`]: crate::fetcher::Fetcher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDocument {
    /// Final URL after redirects, or the caller-supplied URL.
    pub url: Url,
    /// Document markup, decoded to UTF-8.
    pub html: String,
    /// Name of the encoding the body was decoded from.
    pub charset: String,
    /// True when the markup came from the caller instead of a server fetch.
    pub via_client_html: bool,
    pub fetched_at: DateTime<Utc>,
}

impl RawDocument {
    /// Wrap markup the caller captured itself. Client captures arrive as
    /// UTF-8 strings, so no decoding step applies.
    pub fn from_client_html(url: Url, html: impl Into<String>) -> Self {
        Self {
            url,
            html: html.into(),
            charset: "UTF-8".to_string(),
            via_client_html: true,
            fetched_at: Utc::now(),
        }
    }
}
