//! Platform client abstraction and HTTP implementation
//!
//! Every outward action the agent takes goes through the
//! [`PlatformClient`] trait, so the orchestrator and jobs never touch
//! HTTP directly and tests can substitute a recording double. The
//! production implementation speaks the platform's v2 JSON API with a
//! bearer token, rate-limits write calls with governor, and caches the
//! authenticated identity after the first lookup.

use std::num::NonZeroU32;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use reqwest::{header, Client, Response, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

// ============================================================================
// Error type
// ============================================================================

/// Failures surfaced by platform calls.
///
/// Every variant is recoverable from the scheduler's point of view: a
/// failed call aborts the current job run, never the agent.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("Authentication rejected: {0}")]
    Auth(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Duplicate content rejected by platform")]
    DuplicateContent,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected response: {0}")]
    InvalidResponse(String),

    #[error("Media upload failed: {0}")]
    Media(String),
}

impl PlatformError {
    /// Whether a later cycle may succeed where this call failed.
    ///
    /// Auth failures are the exception: a rejected token will keep
    /// being rejected until the operator rotates it.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, PlatformError::Auth(_))
    }
}

// ============================================================================
// Wire types
// ============================================================================

/// A platform user.
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
}

/// A mention of the bot, as fetched from the mention timeline.
#[derive(Debug, Clone, Deserialize)]
pub struct Mention {
    pub id: String,
    pub author_id: String,
    pub text: String,
}

/// A search result eligible for amplification.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    pub id: String,
    pub text: String,
}

/// Reference to a post created by the agent.
#[derive(Debug, Clone, Deserialize)]
pub struct PostRef {
    pub id: String,
}

/// An outbound post before publication.
#[derive(Debug, Clone)]
pub struct Draft {
    pub text: String,
    pub media_ids: Vec<String>,
    pub in_reply_to: Option<String>,
}

impl Draft {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            media_ids: Vec::new(),
            in_reply_to: None,
        }
    }

    #[must_use]
    pub fn with_media(mut self, media_id: impl Into<String>) -> Self {
        self.media_ids.push(media_id.into());
        self
    }

    #[must_use]
    pub fn in_reply_to(mut self, post_id: impl Into<String>) -> Self {
        self.in_reply_to = Some(post_id.into());
        self
    }
}

// ============================================================================
// Client trait
// ============================================================================

/// All platform operations the agent performs.
#[async_trait]
pub trait PlatformClient: Send + Sync {
    /// The authenticated bot identity.
    async fn me(&self) -> Result<UserProfile, PlatformError>;

    /// Publish a draft, returning a reference to the created post.
    async fn publish(&self, draft: &Draft) -> Result<PostRef, PlatformError>;

    /// Fetch up to `limit` recent mentions of the given user.
    async fn mentions(&self, user_id: &str, limit: usize) -> Result<Vec<Mention>, PlatformError>;

    /// Look up a user profile by ID.
    async fn profile(&self, user_id: &str) -> Result<UserProfile, PlatformError>;

    /// Search recent posts.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, PlatformError>;

    /// Like a post.
    async fn like(&self, post_id: &str) -> Result<(), PlatformError>;

    /// Repost (amplify) a post.
    async fn amplify(&self, post_id: &str) -> Result<(), PlatformError>;

    /// Upload a media file, returning the platform media ID.
    async fn upload_media(&self, path: &Path) -> Result<String, PlatformError>;
}

// ============================================================================
// HTTP implementation
// ============================================================================

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct MediaUploadResponse {
    media_id_string: String,
}

/// Bearer-token HTTP client for the platform's JSON API.
pub struct HttpPlatformClient {
    client: Client,
    bearer_token: String,
    base_url: String,
    upload_url: String,

    /// Rate limiter guarding write calls (publish, like, amplify)
    write_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,

    /// Authenticated identity, resolved once
    identity: OnceCell<UserProfile>,
}

const DEFAULT_BASE_URL: &str = "https://api.twitter.com";
const DEFAULT_UPLOAD_URL: &str = "https://upload.twitter.com";

impl HttpPlatformClient {
    /// Create a client with default endpoints and one write per second.
    pub fn new(bearer_token: impl Into<String>) -> Result<Self, PlatformError> {
        Self::with_config(bearer_token, 1, Duration::from_secs(30))
    }

    /// Create a client with custom write rate and request timeout.
    pub fn with_config(
        bearer_token: impl Into<String>,
        writes_per_second: u32,
        timeout: Duration,
    ) -> Result<Self, PlatformError> {
        let client = Client::builder().timeout(timeout).gzip(true).build()?;

        let rate = NonZeroU32::new(writes_per_second)
            .unwrap_or_else(|| NonZeroU32::new(1).unwrap_or_else(|| unreachable!("1 is non-zero")));
        let write_limiter = RateLimiter::direct(Quota::per_second(rate));

        Ok(Self {
            client,
            bearer_token: bearer_token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            upload_url: DEFAULT_UPLOAD_URL.to_string(),
            write_limiter,
            identity: OnceCell::new(),
        })
    }

    /// Point all endpoints at a custom base URL, for mock servers.
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self.upload_url = self.base_url.clone();
        self
    }

    fn auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.header(header::AUTHORIZATION, format!("Bearer {}", self.bearer_token))
    }

    /// Map a non-success response to a typed error.
    async fn check(response: Response) -> Result<Response, PlatformError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(classify_failure(status, &body))
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, PlatformError> {
        let url = format!("{}{path}", self.base_url);
        let response = self.auth(self.client.get(&url).query(query)).send().await?;
        let response = Self::check(response).await?;
        Ok(response.json::<T>().await?)
    }

    async fn post_json<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<T, PlatformError> {
        self.write_limiter.until_ready().await;
        let url = format!("{}{path}", self.base_url);
        let response = self.auth(self.client.post(&url).json(&body)).send().await?;
        let response = Self::check(response).await?;
        Ok(response.json::<T>().await?)
    }
}

fn classify_failure(status: StatusCode, body: &str) -> PlatformError {
    match status {
        StatusCode::UNAUTHORIZED => PlatformError::Auth(body.to_string()),
        StatusCode::FORBIDDEN => {
            if body.to_lowercase().contains("duplicate") {
                PlatformError::DuplicateContent
            } else {
                PlatformError::Auth(body.to_string())
            }
        }
        StatusCode::TOO_MANY_REQUESTS => PlatformError::RateLimited(body.to_string()),
        StatusCode::NOT_FOUND => PlatformError::NotFound(body.to_string()),
        _ => PlatformError::InvalidResponse(format!("{status}: {body}")),
    }
}

#[async_trait]
impl PlatformClient for HttpPlatformClient {
    async fn me(&self) -> Result<UserProfile, PlatformError> {
        let profile = self
            .identity
            .get_or_try_init(|| async {
                let envelope: Envelope<UserProfile> =
                    self.get_json("/2/users/me", &[]).await?;
                envelope
                    .data
                    .ok_or_else(|| PlatformError::InvalidResponse("empty /2/users/me".into()))
            })
            .await?;
        Ok(profile.clone())
    }

    async fn publish(&self, draft: &Draft) -> Result<PostRef, PlatformError> {
        let mut body = serde_json::json!({ "text": draft.text });
        if !draft.media_ids.is_empty() {
            body["media"] = serde_json::json!({ "media_ids": draft.media_ids });
        }
        if let Some(reply_to) = &draft.in_reply_to {
            body["reply"] = serde_json::json!({ "in_reply_to_tweet_id": reply_to });
        }

        let envelope: Envelope<PostRef> = self.post_json("/2/tweets", body).await?;
        let post = envelope
            .data
            .ok_or_else(|| PlatformError::InvalidResponse("empty create response".into()))?;
        debug!(post_id = %post.id, "Published post");
        Ok(post)
    }

    async fn mentions(&self, user_id: &str, limit: usize) -> Result<Vec<Mention>, PlatformError> {
        let envelope: Envelope<Vec<Mention>> = self
            .get_json(
                &format!("/2/users/{user_id}/mentions"),
                &[
                    ("max_results", limit.to_string()),
                    ("tweet.fields", "author_id,text".to_string()),
                ],
            )
            .await?;
        Ok(envelope.data.unwrap_or_default())
    }

    async fn profile(&self, user_id: &str) -> Result<UserProfile, PlatformError> {
        let envelope: Envelope<UserProfile> =
            self.get_json(&format!("/2/users/{user_id}"), &[]).await?;
        envelope
            .data
            .ok_or_else(|| PlatformError::NotFound(format!("user {user_id}")))
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, PlatformError> {
        let envelope: Envelope<Vec<SearchHit>> = self
            .get_json(
                "/2/tweets/search/recent",
                &[
                    ("query", query.to_string()),
                    ("max_results", limit.to_string()),
                ],
            )
            .await?;
        Ok(envelope.data.unwrap_or_default())
    }

    async fn like(&self, post_id: &str) -> Result<(), PlatformError> {
        let me = self.me().await?;
        let _: serde_json::Value = self
            .post_json(
                &format!("/2/users/{}/likes", me.id),
                serde_json::json!({ "tweet_id": post_id }),
            )
            .await?;
        Ok(())
    }

    async fn amplify(&self, post_id: &str) -> Result<(), PlatformError> {
        let me = self.me().await?;
        let _: serde_json::Value = self
            .post_json(
                &format!("/2/users/{}/retweets", me.id),
                serde_json::json!({ "tweet_id": post_id }),
            )
            .await?;
        Ok(())
    }

    async fn upload_media(&self, path: &Path) -> Result<String, PlatformError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| PlatformError::Media(format!("{}: {e}", path.display())))?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "media".to_string());

        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name);
        let form = reqwest::multipart::Form::new().part("media", part);

        self.write_limiter.until_ready().await;
        let url = format!("{}/1.1/media/upload.json", self.upload_url);
        let response = self.auth(self.client.post(&url).multipart(form)).send().await?;
        let response = Self::check(response).await?;

        let upload: MediaUploadResponse = response
            .json()
            .await
            .map_err(|e| PlatformError::Media(e.to_string()))?;

        debug!(media_id = %upload.media_id_string, "Media uploaded");
        Ok(upload.media_id_string)
    }
}

impl std::fmt::Debug for HttpPlatformClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpPlatformClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Log-and-discard helper for calls whose failure must not abort the
/// surrounding job (likes, reposts).
pub async fn best_effort(action: &str, result: Result<(), PlatformError>) {
    if let Err(e) = result {
        warn!(action, error = %e, "Best-effort platform call failed");
    }
}
