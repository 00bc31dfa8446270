use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("Failed to parse URL: {0}")]
    UrlParseError(#[from] url::ParseError),

    #[error("Unsupported URL: {0}")]
    UnsupportedUrl(String),

    #[error("Failed to fetch content: {0}")]
    FetchError(String),

    #[error("Request timeout: {0}")]
    TimeoutError(String),

    #[error("Non-200 status code: {status} {message}")]
    HttpStatus { status: u16, message: String },

    #[error("Response body exceeds {limit} bytes")]
    ContentTooLarge { limit: usize },

    #[error("Failed to decode reddit json: {0}")]
    DecodeError(#[from] serde_json::Error),

    #[error("reddit json: post not found")]
    PostNotFound,

    #[error("Concurrency limit reached")]
    ConcurrencyLimitError,
}

impl SummaryError {
    pub fn log(&self) {
        match self {
            SummaryError::UrlParseError(e) => {
                warn!(error = %e, "URL parsing failed");
            }
            SummaryError::UnsupportedUrl(url) => {
                warn!(url = %url, "No provider accepts this URL");
            }
            SummaryError::FetchError(e) => {
                error!(error = %e, "Content fetch failed");
            }
            SummaryError::TimeoutError(e) => {
                warn!(error = %e, "Request timed out");
            }
            SummaryError::HttpStatus { status, message } => {
                error!(status = *status, message = %message, "Upstream returned non-200 status");
            }
            SummaryError::ContentTooLarge { limit } => {
                warn!(limit = *limit, "Response body too large");
            }
            SummaryError::DecodeError(e) => {
                error!(error = %e, "Response decoding failed");
            }
            SummaryError::PostNotFound => {
                warn!("Listing decoded but contains no post");
            }
            SummaryError::ConcurrencyLimitError => {
                error!("Concurrency semaphore closed");
            }
        }
    }

    /// `true` when the upstream answered but the body was not the expected JSON.
    pub fn is_decode_error(&self) -> bool {
        matches!(self, SummaryError::DecodeError(_))
    }
}

impl From<reqwest::Error> for SummaryError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SummaryError::TimeoutError(e.to_string())
        } else {
            SummaryError::FetchError(e.to_string())
        }
    }
}
