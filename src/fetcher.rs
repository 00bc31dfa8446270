use crate::SummaryError;
use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use reqwest::{
    header::{HeaderMap, USER_AGENT},
    Client,
};
use std::time::Duration;
use tracing::{debug, error, instrument, warn};
use url::Url;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; UrlSummary/0.1;)";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_MAX_CONTENT_SIZE: usize = 10 * 1024 * 1024;

/// Response body as a stream of chunks. Dropping it releases the connection.
pub type BodyStream = BoxStream<'static, Result<Vec<u8>, SummaryError>>;

pub struct FetchResponse {
    pub status: u16,
    pub reason: String,
    body: BodyStream,
}

impl FetchResponse {
    pub fn new(status: u16, reason: impl Into<String>, body: BodyStream) -> Self {
        Self {
            status,
            reason: reason.into(),
            body,
        }
    }

    /// Builds a response around an in-memory body.
    pub fn from_bytes(status: u16, body: impl Into<Vec<u8>>) -> Self {
        let body = body.into();
        Self::new(
            status,
            reason_phrase(status),
            stream::once(async move { Ok::<_, SummaryError>(body) }).boxed(),
        )
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    pub async fn into_bytes(self) -> Result<Vec<u8>, SummaryError> {
        self.body
            .try_fold(Vec::new(), |mut acc, chunk| async move {
                acc.extend_from_slice(&chunk);
                Ok(acc)
            })
            .await
    }
}

impl std::fmt::Debug for FetchResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchResponse")
            .field("status", &self.status)
            .field("reason", &self.reason)
            .finish_non_exhaustive()
    }
}

/// HTTP GET with a caller-chosen User-Agent.
///
/// Implementations own timeout and body-size enforcement.
#[async_trait]
pub trait HttpFetch: Send + Sync {
    async fn get(&self, url: &Url, user_agent: &str) -> Result<FetchResponse, SummaryError>;
}

#[derive(Clone)]
pub struct Fetcher {
    client: Client,
    max_content_size: usize,
}

/// Configuration for the reqwest-backed [`Fetcher`].
///
/// # Examples
/// ```ignore
/// let fetcher = Fetcher::new_with_config(FetcherConfig {
///     user_agent: "my-custom-agent/1.0".to_string(),
///     timeout: Duration::from_secs(5),
///     ..Default::default()
/// });
/// ```
pub struct FetcherConfig {
    pub user_agent: String,
    pub timeout: Duration,
    pub max_content_size: usize,
    pub headers: Option<HeaderMap>,
    pub redirect_policy: Option<reqwest::redirect::Policy>,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            max_content_size: DEFAULT_MAX_CONTENT_SIZE,
            headers: None,
            redirect_policy: None,
        }
    }
}

impl Fetcher {
    pub fn new() -> Result<Self, SummaryError> {
        debug!("Fetcher initialized with default configuration");
        Self::new_with_config(FetcherConfig::default())
    }

    pub fn new_with_config(config: FetcherConfig) -> Result<Self, SummaryError> {
        let mut client_builder = Client::builder()
            .user_agent(config.user_agent)
            .timeout(config.timeout)
            .pool_max_idle_per_host(10);

        if let Some(headers) = config.headers {
            client_builder = client_builder.default_headers(headers);
        }

        if let Some(redirect_policy) = config.redirect_policy {
            client_builder = client_builder.redirect(redirect_policy);
        }

        let client = client_builder.build().map_err(|e| {
            error!(error = %e, "Failed to create HTTP client");
            SummaryError::FetchError(format!("Failed to initialize HTTP client: {e}"))
        })?;

        Ok(Self {
            client,
            max_content_size: config.max_content_size,
        })
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            max_content_size: DEFAULT_MAX_CONTENT_SIZE,
        }
    }

    pub fn max_content_size(&self) -> usize {
        self.max_content_size
    }
}

#[async_trait]
impl HttpFetch for Fetcher {
    #[instrument(level = "debug", skip(self, user_agent), err)]
    async fn get(&self, url: &Url, user_agent: &str) -> Result<FetchResponse, SummaryError> {
        debug!("Starting fetch request");

        let response = self
            .client
            .get(url.clone())
            .header(USER_AGENT, user_agent)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, url = %url, "Failed to send request");
                SummaryError::from(e)
            })?;

        let status = response.status();
        let limit = self.max_content_size;

        if status.is_success() {
            if let Some(length) = response.content_length() {
                if length > limit as u64 {
                    warn!(content_length = length, limit, "Declared body exceeds limit");
                    return Err(SummaryError::ContentTooLarge { limit });
                }
            }
        }

        let body = stream::try_unfold(
            (response, 0usize),
            move |(mut response, received)| async move {
                match response.chunk().await {
                    Ok(Some(chunk)) => {
                        let received = received + chunk.len();
                        if received > limit {
                            warn!(received, limit, "Body exceeded limit while streaming");
                            Err(SummaryError::ContentTooLarge { limit })
                        } else {
                            Ok(Some((chunk.to_vec(), (response, received))))
                        }
                    }
                    Ok(None) => Ok(None),
                    Err(e) => {
                        error!(error = %e, "Failed to read response body");
                        Err(SummaryError::from(e))
                    }
                }
            },
        )
        .boxed();

        debug!(status = status.as_u16(), "Received response");
        Ok(FetchResponse::new(
            status.as_u16(),
            status.canonical_reason().unwrap_or_default(),
            body,
        ))
    }
}

fn reason_phrase(status: u16) -> &'static str {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or_default()
}
