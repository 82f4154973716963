use crate::config::Config;
use crate::fetcher::{decode::decode_body, errors::FetchError, types::RawDocument};
use chrono::Utc;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use tracing::instrument;

const MAX_REDIRECTS: usize = 10;

/// HTTP retrieval with a bounded timeout and a fixed identifying client
/// signature. One instance is shared across pipeline invocations; it holds a
/// connection pool but no per-request state.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    max_body_bytes: u64,
}

impl Fetcher {
    pub fn new(config: &Config) -> Self {
        let client = ClientBuilder::new()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs()))
            .timeout(Duration::from_secs(config.fetch_timeout_secs()))
            .user_agent(config.user_agent())
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    reqwest::header::ACCEPT,
                    "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"
                        .parse()
                        .unwrap(),
                );
                headers
            })
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            max_body_bytes: config.max_body_bytes(),
        }
    }

    #[instrument(skip_all, fields(url = %url))]
    pub async fn fetch(&self, url: &str) -> Result<RawDocument, FetchError> {
        let parsed_url = url::Url::parse(url)?;

        let response = self
            .client
            .get(parsed_url)
            .send()
            .await
            .map_err(FetchError::from_reqwest_error)?;

        // Check content length before downloading
        if let Some(content_length) = response.content_length()
            && content_length > self.max_body_bytes
        {
            return Err(FetchError::BodyTooLarge(content_length));
        }

        let final_url = response.url().clone();
        let status = response.status();

        if !status.is_success() {
            return Err(FetchError::Http {
                status,
                retriable: status.is_server_error(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|ct| ct.to_str().ok())
            .unwrap_or("text/html")
            .to_string();

        // Only HTML documents flow into extraction
        if !content_type.contains("text/html") && !content_type.contains("application/xhtml") {
            return Err(FetchError::UnsupportedContentType(content_type));
        }

        let body_bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        // Re-check after download in case Content-Length was missing
        if body_bytes.len() as u64 > self.max_body_bytes {
            return Err(FetchError::BodyTooLarge(body_bytes.len() as u64));
        }

        let (html, charset) = decode_body(&content_type, &body_bytes)?;

        Ok(RawDocument {
            url: final_url,
            html,
            charset,
            via_client_html: false,
            fetched_at: Utc::now(),
        })
    }
}
