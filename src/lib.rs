use async_trait::async_trait;
use url::Url;

#[cfg(feature = "cache")]
mod cache;
mod error;
mod fetcher;
mod iframe;
#[cfg(feature = "logging")]
mod logging;
mod oembed;
mod reddit;
mod reddit_types;
mod summary_service;
mod utils;

#[cfg(feature = "cache")]
pub use cache::Cache;
pub use error::SummaryError;
pub use fetcher::{BodyStream, FetchResponse, Fetcher, FetcherConfig, HttpFetch};
pub use iframe::{
    extract_iframe_permissions, filter_safe_iframe_permissions, PermissionPolicy,
    SAFE_IFRAME_PERMISSIONS,
};
#[cfg(feature = "logging")]
pub use logging::{log_error_card, log_summary_card, setup_logging, LogConfig, LogLevelGuard};
pub use oembed::OEmbed;
pub use reddit::{
    is_reddit_host, reddit_icon_url, reddit_json_url, reddit_player, reddit_thumbnail,
    summarize_reddit_from_json, summary_from_post, RedditProvider, REDDIT_SITE_NAME,
};
pub use reddit_types::{
    decode_listings, decode_listings_from_reader, find_post, RedditChild, RedditImage,
    RedditImageSource, RedditListing, RedditListingData, RedditMedia, RedditPost, RedditPreview,
    RedditVideo,
};
pub use summary_service::{
    CacheStrategy, SummaryService, SummaryServiceConfig, MAX_CONCURRENT_REQUESTS,
};

/// Canonical, provider-agnostic link preview.
///
/// Absent values are empty strings rather than `Option`s so every provider
/// produces the same shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Summary {
    pub url: String,
    pub title: String,
    pub description: String,
    pub site_name: String,
    pub thumbnail: String,
    pub icon: String,
    pub sensitive: bool,
    pub player: Player,
}

/// Embeddable video descriptor. An empty `url` means there is no player.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Player {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

impl Player {
    /// `true` when no playable media was found.
    pub fn is_empty(&self) -> bool {
        self.url.is_empty()
    }
}

/// A source of summaries for one family of URLs.
///
/// Providers are registered on a [`SummaryService`], which hands each URL to
/// the first provider whose `can_handle` accepts it.
#[async_trait]
pub trait SummaryProvider: Send + Sync {
    fn name(&self) -> &'static str;

    fn can_handle(&self, url: &Url) -> bool;

    async fn summarize(&self, url: &Url) -> Result<Summary, SummaryError>;
}
