#![allow(dead_code)]

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use url::Url;
use url_summary::{FetchResponse, HttpFetch, SummaryError};

pub const REDDIT_JSON_SAMPLE: &str = r#"[
  {
    "kind": "Listing",
    "data": {
      "children": [
        {
          "kind": "t3",
          "data": {
            "title": "Example title",
            "selftext": "Example body",
            "subreddit_name_prefixed": "r/test",
            "thumbnail": "https://example.com/thumb.jpg",
            "over_18": true,
            "post_hint": "image",
            "url_overridden_by_dest": "https://i.redd.it/example.png",
            "preview": {
              "images": [
                {
                  "source": {
                    "url": "https://preview.redd.it/example.png?width=640&amp;auto=webp",
                    "width": 640,
                    "height": 480
                  }
                }
              ]
            }
          }
        }
      ]
    }
  }
]"#;

pub const REDDIT_VIDEO_SAMPLE: &str = r#"[
  {"kind": "Listing", "data": {"children": [{"kind": "t3", "data": {
    "title": "Clip",
    "selftext": "",
    "subreddit_name_prefixed": "",
    "thumbnail": "nsfw",
    "over_18": false,
    "post_hint": "hosted:video",
    "secure_media": {"reddit_video": {"fallback_url": "https://v.redd.it/abc/DASH_720.mp4?source=fallback", "width": 1280, "height": 720}},
    "media": {"reddit_video": {"fallback_url": "https://v.redd.it/abc/DASH_360.mp4", "width": 640, "height": 360}}
  }}]}},
  {"kind": "Listing", "data": {"children": [{"kind": "t1", "data": {"body": "comment"}}]}}
]"#;

/// In-memory fetcher recording every request it receives.
pub struct StubFetch {
    status: u16,
    body: Vec<u8>,
    requests: Mutex<Vec<(String, String)>>,
    body_reads: Arc<AtomicUsize>,
}

impl StubFetch {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Arc<Self> {
        Arc::new(Self {
            status,
            body: body.into(),
            requests: Mutex::new(Vec::new()),
            body_reads: Arc::new(AtomicUsize::new(0)),
        })
    }

    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn body_reads(&self) -> usize {
        self.body_reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpFetch for StubFetch {
    async fn get(&self, url: &Url, user_agent: &str) -> Result<FetchResponse, SummaryError> {
        self.requests
            .lock()
            .unwrap()
            .push((url.to_string(), user_agent.to_string()));

        let body = self.body.clone();
        let reads = Arc::clone(&self.body_reads);
        let stream = stream::once(async move {
            reads.fetch_add(1, Ordering::SeqCst);
            Ok::<_, SummaryError>(body)
        })
        .boxed();

        Ok(FetchResponse::new(self.status, "stub", stream))
    }
}

/// Fetcher whose transport always fails.
pub struct FailingFetch;

#[async_trait]
impl HttpFetch for FailingFetch {
    async fn get(&self, _url: &Url, _user_agent: &str) -> Result<FetchResponse, SummaryError> {
        Err(SummaryError::FetchError("connection refused".to_string()))
    }
}
