use crate::fetcher::{Fetcher, HttpFetch, DEFAULT_USER_AGENT};
use crate::reddit_types::{decode_listings, find_post, RedditMedia, RedditPost, RedditVideo};
use crate::utils::favicon_url;
use crate::{Player, Summary, SummaryError, SummaryProvider};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, instrument, warn};
use url::Url;

pub const REDDIT_SITE_NAME: &str = "Reddit";
const REDDIT_DEFAULT_HOST: &str = "www.reddit.com";
const REDDIT_IMAGE_PREFIX: &str = "https://i.redd.it/";

pub fn is_reddit_host(host: &str) -> bool {
    let normalized = host.to_ascii_lowercase();
    normalized == "reddit.com" || normalized.ends_with(".reddit.com")
}

/// Rewrites a Reddit post URL to its `.json` listing endpoint.
///
/// Returns `None` for non-Reddit hosts and for paths without `/comments/`.
/// Query and fragment are carried over untouched.
pub fn reddit_json_url(url: &Url) -> Option<Url> {
    if !url.host_str().is_some_and(is_reddit_host) {
        return None;
    }
    if !url.path().contains("/comments/") {
        return None;
    }

    let mut json_url = url.clone();
    if url.path().ends_with(".json") {
        return Some(json_url);
    }

    let path = if url.path().ends_with('/') {
        format!("{}.json", url.path())
    } else {
        format!("{}/.json", url.path())
    };
    json_url.set_path(&path);

    Some(json_url)
}

/// Decodes a listing body and builds the summary for `url`.
pub fn summarize_reddit_from_json(url: &Url, body: &[u8]) -> Result<Summary, SummaryError> {
    let listings = decode_listings(body)?;
    let post = find_post(&listings)?;
    Ok(summary_from_post(url, post))
}

/// Builds the canonical summary for `post`. Never fails; missing fields stay empty.
pub fn summary_from_post(url: &Url, post: &RedditPost) -> Summary {
    let site_name = if post.subreddit_name_prefixed.is_empty() {
        REDDIT_SITE_NAME.to_string()
    } else {
        post.subreddit_name_prefixed.clone()
    };

    Summary {
        url: url.to_string(),
        title: post.title.clone(),
        description: post.selftext.clone(),
        site_name,
        thumbnail: reddit_thumbnail(post),
        icon: reddit_icon_url(url),
        sensitive: post.over_18,
        player: reddit_player(post),
    }
}

/// Picks the first usable image: preview source, then an image destination,
/// then the thumbnail field when it holds a real URL.
pub fn reddit_thumbnail(post: &RedditPost) -> String {
    if let Some(source) = post
        .preview
        .as_ref()
        .and_then(|preview| preview.images.first())
        .map(|image| image.source.url.trim())
    {
        // preview URLs arrive HTML-escaped (`&amp;` in the query)
        let unescaped = html_escape::decode_html_entities(source);
        if !unescaped.is_empty() {
            return unescaped.into_owned();
        }
    }

    let destination = &post.url_overridden_by_dest;
    if !destination.is_empty()
        && (post.post_hint == "image" || destination.starts_with(REDDIT_IMAGE_PREFIX))
    {
        return destination.clone();
    }

    // "self", "default", "nsfw" and friends are placeholders, not URLs
    if post.thumbnail.starts_with("http://") || post.thumbnail.starts_with("https://") {
        return post.thumbnail.clone();
    }

    String::new()
}

/// `<scheme>://<host>/favicon.ico` for the post URL, defaulting to `www.reddit.com`.
pub fn reddit_icon_url(url: &Url) -> String {
    favicon_url(url, REDDIT_DEFAULT_HOST)
}

/// The post's video as a [`Player`], or `Player::default()` when it has none.
pub fn reddit_player(post: &RedditPost) -> Player {
    match pick_reddit_video(post) {
        Some(video) => Player {
            url: video.fallback_url.clone(),
            width: video.width,
            height: video.height,
        },
        None => Player::default(),
    }
}

// A descriptor without a fallback URL is unplayable; keep looking.
fn pick_reddit_video(post: &RedditPost) -> Option<&RedditVideo> {
    fn playable(media: &Option<RedditMedia>) -> Option<&RedditVideo> {
        media
            .as_ref()
            .and_then(|media| media.reddit_video.as_ref())
            .filter(|video| !video.fallback_url.is_empty())
    }
    playable(&post.secure_media).or_else(|| playable(&post.media))
}

/// Summarizes Reddit posts through the public `.json` endpoints.
#[derive(Clone)]
pub struct RedditProvider {
    fetcher: Arc<dyn HttpFetch>,
    user_agent: String,
}

impl RedditProvider {
    pub fn new() -> Result<Self, SummaryError> {
        Ok(Self::with_fetcher(Arc::new(Fetcher::new()?)))
    }

    pub fn with_fetcher(fetcher: Arc<dyn HttpFetch>) -> Self {
        Self {
            fetcher,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    #[instrument(level = "debug", skip(self), err)]
    pub async fn summarize_reddit(&self, url: &Url) -> Result<Summary, SummaryError> {
        let json_url =
            reddit_json_url(url).ok_or_else(|| SummaryError::UnsupportedUrl(url.to_string()))?;
        debug!(json_url = %json_url, "Fetching reddit listing");

        let response = self.fetcher.get(&json_url, &self.user_agent).await?;
        if !response.is_ok() {
            warn!(status = response.status, "Reddit returned non-200 status");
            return Err(SummaryError::HttpStatus {
                status: response.status,
                message: response.reason.clone(),
            });
        }

        let body = response.into_bytes().await?;
        debug!(body_len = body.len(), "Fetched reddit listing");

        summarize_reddit_from_json(url, &body)
    }
}

#[async_trait]
impl SummaryProvider for RedditProvider {
    fn name(&self) -> &'static str {
        "reddit"
    }

    fn can_handle(&self, url: &Url) -> bool {
        reddit_json_url(url).is_some()
    }

    async fn summarize(&self, url: &Url) -> Result<Summary, SummaryError> {
        self.summarize_reddit(url).await
    }
}
