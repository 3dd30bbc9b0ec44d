//! Shared test fixtures.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use herald::platform::{
    Draft, Mention, PlatformClient, PlatformError, PostRef, SearchHit, UserProfile,
};

/// In-memory platform double that records every write call.
#[derive(Default)]
pub struct RecordingPlatform {
    pub mentions: Vec<Mention>,
    pub hits: Vec<SearchHit>,
    pub published: Mutex<Vec<Draft>>,
    pub liked: Mutex<Vec<String>>,
    pub amplified: Mutex<Vec<String>>,
}

impl RecordingPlatform {
    pub fn published_texts(&self) -> Vec<String> {
        self.published
            .lock()
            .unwrap()
            .iter()
            .map(|d| d.text.clone())
            .collect()
    }
}

#[async_trait]
impl PlatformClient for RecordingPlatform {
    async fn me(&self) -> Result<UserProfile, PlatformError> {
        Ok(UserProfile {
            id: String::from("bot-id"),
            username: String::from("ninedttt"),
        })
    }

    async fn publish(&self, draft: &Draft) -> Result<PostRef, PlatformError> {
        let mut published = self.published.lock().unwrap();
        published.push(draft.clone());
        Ok(PostRef {
            id: format!("post-{}", published.len()),
        })
    }

    async fn mentions(&self, _: &str, limit: usize) -> Result<Vec<Mention>, PlatformError> {
        Ok(self.mentions.iter().take(limit).cloned().collect())
    }

    async fn profile(&self, user_id: &str) -> Result<UserProfile, PlatformError> {
        Ok(UserProfile {
            id: user_id.to_string(),
            username: format!("user_{user_id}"),
        })
    }

    async fn search(&self, _: &str, limit: usize) -> Result<Vec<SearchHit>, PlatformError> {
        Ok(self.hits.iter().take(limit).cloned().collect())
    }

    async fn like(&self, post_id: &str) -> Result<(), PlatformError> {
        self.liked.lock().unwrap().push(post_id.to_string());
        Ok(())
    }

    async fn amplify(&self, post_id: &str) -> Result<(), PlatformError> {
        self.amplified.lock().unwrap().push(post_id.to_string());
        Ok(())
    }

    async fn upload_media(&self, _: &Path) -> Result<String, PlatformError> {
        Err(PlatformError::Media(String::from("no media in tests")))
    }
}
