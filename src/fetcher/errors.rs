use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("{} timeout", if *connect { "connect" } else { "request" })]
    Timeout { connect: bool },

    #[error("too many redirects")]
    RedirectLoop,

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("http error {status}")]
    Http {
        status: reqwest::StatusCode,
        retriable: bool,
    },

    #[error("body too large ({0} bytes)")]
    BodyTooLarge(u64),

    #[error("unsupported content-type: {0}")]
    UnsupportedContentType(String),

    #[error("charset error: {0}")]
    Charset(String),
}

impl FetchError {
    /// Whether the caller may reasonably retry the fetch. The pipeline itself
    /// never retries.
    pub fn should_retry(&self) -> bool {
        match self {
            // Fatal for this input - don't retry
            Self::InvalidUrl(_) => false,
            Self::BodyTooLarge(_) => false,
            Self::UnsupportedContentType(_) => false,
            Self::Charset(_) => false,
            Self::Http { retriable, .. } => *retriable,

            // Temporary - retry
            Self::Timeout { .. } => true,
            Self::RedirectLoop => true,
            Self::Transport(_) => true,
        }
    }

    pub fn from_reqwest_error(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                connect: err.is_connect(),
            }
        } else if err.is_redirect() {
            Self::RedirectLoop
        } else if let Some(status) = err.status() {
            Self::Http {
                status,
                retriable: status.is_server_error(),
            }
        } else {
            // DNS, TLS, connection resets and friends
            Self::Transport(err.to_string())
        }
    }
}
