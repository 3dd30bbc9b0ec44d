//! Posting orchestration
//!
//! The [`Orchestrator`] ties the composer, the platform client, the
//! mention ledger, and the optional flavor generator together. It owns
//! the per-cycle logic of every scheduled job: broadcasts, mention
//! replies, the amplify hunt, the daily diagnostic, and the one-shot
//! activation announcement. All platform effects flow through the
//! injected [`PlatformClient`], so the whole module is testable against
//! a recording double.

pub mod jobs;

use std::sync::Arc;

use chrono::Timelike;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::config::PersonaConfig;
use crate::content::{BroadcastKind, Composer, MessageParts};
use crate::error::Result;
use crate::llm::FlavorClient;
use crate::media::MediaPicker;
use crate::platform::{best_effort, Draft, PlatformClient, PlatformError};
use crate::store::MentionLedger;

pub struct Orchestrator {
    platform: Arc<dyn PlatformClient>,
    composer: Composer,
    ledger: Arc<MentionLedger>,
    media: MediaPicker,
    flavor: Option<FlavorClient>,
}

impl Orchestrator {
    #[must_use]
    pub fn new(
        platform: Arc<dyn PlatformClient>,
        composer: Composer,
        ledger: Arc<MentionLedger>,
        media: MediaPicker,
        flavor: Option<FlavorClient>,
    ) -> Self {
        Self {
            platform,
            composer,
            ledger,
            media,
            flavor,
        }
    }

    fn persona(&self) -> &PersonaConfig {
        self.composer.persona()
    }

    /// Publish a decorated update around the given body. Used by the
    /// event dispatcher for game announcements.
    pub async fn publish_update(&self, body: &str) -> Result<()> {
        let text = {
            let mut rng = rand::thread_rng();
            let parts = MessageParts {
                body: body.to_string(),
                flair: self.composer.personality_line(&mut rng).to_string(),
            };
            self.composer.compose(&parts)
        };
        self.platform.publish(&Draft::new(text)).await?;
        info!(body, "Posted update");
        Ok(())
    }

    /// One broadcast cycle: pick an archetype, draft it, maybe attach
    /// media, publish.
    pub async fn broadcast(&self) -> Result<()> {
        let (kind, text, attach_media) = {
            let mut rng = rand::thread_rng();
            let kind = BroadcastKind::ALL[rng.gen_range(0..BroadcastKind::ALL.len())];
            let hour = chrono::Local::now().hour();
            let text = self.composer.draft_broadcast(kind, hour, &mut rng);
            let attach = rng.gen::<f64>() < self.persona().media_probability;
            (kind, text, attach)
        };

        let mut draft = Draft::new(text);
        if attach_media {
            if let Some(media_id) = self.upload_random_media().await {
                draft = draft.with_media(media_id);
            }
        }

        self.platform.publish(&draft).await?;
        info!(kind = kind.label(), media = !draft.media_ids.is_empty(), "Broadcast sent");
        Ok(())
    }

    /// Pick and upload a random media file; any failure along the way
    /// degrades to a text-only post.
    async fn upload_random_media(&self) -> Option<String> {
        let path = {
            let mut rng = rand::thread_rng();
            self.media.pick(&mut rng)?
        };
        match self.platform.upload_media(&path).await {
            Ok(media_id) => Some(media_id),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Media upload failed");
                None
            }
        }
    }

    /// One respond cycle: fetch recent mentions, reply to the unseen
    /// ones, record their IDs, flush the ledger once at the end.
    ///
    /// A mention's ID is recorded after its reply attempt whether or
    /// not the attempt succeeded; a mention that drew a failing reply
    /// is burned, not retried forever.
    pub async fn respond(&self) -> Result<()> {
        let me = self.platform.me().await?;
        let mentions = self
            .platform
            .mentions(&me.id, self.persona().mention_batch)
            .await?;

        if mentions.is_empty() {
            debug!("No mentions to process");
            return Ok(());
        }

        let mut replied = 0usize;
        for mention in &mentions {
            if self.ledger.contains(&mention.id).await {
                continue;
            }

            let handle = match self.platform.profile(&mention.author_id).await {
                Ok(profile) => profile.username,
                Err(e) => {
                    debug!(author_id = %mention.author_id, error = %e, "Profile lookup failed, using fallback handle");
                    String::from("player")
                }
            };

            let message = mention
                .text
                .replace(&format!("@{}", me.username), "")
                .trim()
                .to_lowercase();

            let reply = self.compose_mention_reply(&handle, &message).await;

            match self
                .platform
                .publish(&Draft::new(reply).in_reply_to(&mention.id))
                .await
            {
                Ok(_) => {
                    best_effort("like", self.platform.like(&mention.id).await).await;
                    replied += 1;
                    info!(mention_id = %mention.id, handle = %handle, "Replied to mention");
                }
                Err(e) => {
                    warn!(mention_id = %mention.id, error = %e, "Reply failed");
                }
            }
            self.ledger.record(mention.id.clone()).await;
        }

        self.ledger.flush_logged().await;
        debug!(fetched = mentions.len(), replied, "Respond cycle complete");
        Ok(())
    }

    /// Build the reply text for one mention: keyword cascade first,
    /// then optional generated flavor, then the default pool.
    async fn compose_mention_reply(&self, handle: &str, message: &str) -> String {
        let keyword_template = {
            let mut rng = rand::thread_rng();
            self.composer.keyword_template(message, &mut rng)
        };

        if let Some(template) = keyword_template {
            let mut rng = rand::thread_rng();
            return self.composer.compose_reply(handle, template, &mut rng);
        }

        if let Some(flavor) = &self.flavor {
            if let Some(line) = flavor.flavor_line(message).await {
                let template = format!("{line} {{link}}");
                let mut rng = rand::thread_rng();
                return self.composer.compose_reply(handle, &template, &mut rng);
            }
        }

        let mut rng = rand::thread_rng();
        let template = self.composer.default_template(&mut rng);
        self.composer.compose_reply(handle, template, &mut rng)
    }

    /// One amplify cycle: search for relevant posts and repost a random
    /// fraction of them. Per-item failures never abort the sweep.
    pub async fn amplify_hunt(&self) -> Result<()> {
        let hits = self
            .platform
            .search(&self.persona().search_query, 20)
            .await?;

        let mut amplified = 0usize;
        for hit in &hits {
            let selected = {
                let mut rng = rand::thread_rng();
                rng.gen::<f64>() < self.persona().amplify_probability
            };
            if !selected {
                continue;
            }
            match self.platform.amplify(&hit.id).await {
                Ok(()) => {
                    amplified += 1;
                    debug!(post_id = %hit.id, "Amplified post");
                }
                Err(e) => debug!(post_id = %hit.id, error = %e, "Amplify skipped"),
            }
        }

        info!(hits = hits.len(), amplified, "Amplify hunt complete");
        Ok(())
    }

    /// Post the daily diagnostic status.
    pub async fn diagnostic(&self) -> Result<()> {
        let text = {
            let mut rng = rand::thread_rng();
            self.composer.draft_diagnostic(&mut rng)
        };
        self.platform.publish(&Draft::new(text)).await?;
        info!("Diagnostic posted");
        Ok(())
    }

    /// Post the startup announcement. A duplicate-content rejection is
    /// expected on rapid restarts and is not an error.
    pub async fn announce_activation(&self) -> Result<()> {
        let text = {
            let mut rng = rand::thread_rng();
            self.composer.draft_activation(&mut rng)
        };
        match self.platform.publish(&Draft::new(text)).await {
            Ok(_) => {
                info!("Activation message posted");
                Ok(())
            }
            Err(PlatformError::DuplicateContent) => {
                warn!("Activation message rejected as duplicate");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{Mention, PostRef, SearchHit, UserProfile};
    use async_trait::async_trait;
    use std::path::Path;
    // Shadow the crate-wide alias: PlatformClient signatures use the
    // two-parameter form.
    use std::result::Result;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Recording double for the platform client.
    #[derive(Default)]
    struct FakePlatform {
        mentions: Vec<Mention>,
        hits: Vec<SearchHit>,
        published: Mutex<Vec<Draft>>,
        liked: Mutex<Vec<String>>,
        amplified: Mutex<Vec<String>>,
        fail_publish: bool,
    }

    #[async_trait]
    impl PlatformClient for FakePlatform {
        async fn me(&self) -> Result<UserProfile, PlatformError> {
            Ok(UserProfile {
                id: String::from("bot-1"),
                username: String::from("ninedttt"),
            })
        }

        async fn publish(&self, draft: &Draft) -> Result<PostRef, PlatformError> {
            if self.fail_publish {
                return Err(PlatformError::RateLimited(String::from("slow down")));
            }
            self.published.lock().unwrap().push(draft.clone());
            Ok(PostRef {
                id: String::from("post-1"),
            })
        }

        async fn mentions(&self, _: &str, _: usize) -> Result<Vec<Mention>, PlatformError> {
            Ok(self.mentions.clone())
        }

        async fn profile(&self, user_id: &str) -> Result<UserProfile, PlatformError> {
            Ok(UserProfile {
                id: user_id.to_string(),
                username: format!("user_{user_id}"),
            })
        }

        async fn search(&self, _: &str, _: usize) -> Result<Vec<SearchHit>, PlatformError> {
            Ok(self.hits.clone())
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
            Ok(String::from("media-1"))
        }
    }

    fn mention(id: &str, text: &str) -> Mention {
        Mention {
            id: id.to_string(),
            author_id: format!("author-{id}"),
            text: text.to_string(),
        }
    }

    fn orchestrator(platform: Arc<FakePlatform>, dir: &TempDir) -> Orchestrator {
        let ledger = Arc::new(MentionLedger::open(dir.path().join("ledger.json")));
        Orchestrator::new(
            platform,
            Composer::new(PersonaConfig::default()),
            ledger,
            MediaPicker::new(dir.path().join("no-media")),
            None,
        )
    }

    #[tokio::test]
    async fn test_publish_update_wraps_body() {
        let platform = Arc::new(FakePlatform::default());
        let dir = TempDir::new().unwrap();
        let orch = orchestrator(Arc::clone(&platform), &dir);

        orch.publish_update("VICTORY: Ada conquered 9 dimensions!")
            .await
            .unwrap();

        let published = platform.published.lock().unwrap();
        assert_eq!(published.len(), 1);
        assert!(published[0].text.contains("VICTORY: Ada"));
        assert!(published[0].text.contains("https://www.9dttt.com"));
        assert!(published[0].text.chars().count() <= 280);
    }

    #[tokio::test]
    async fn test_respond_replies_and_records() {
        let platform = Arc::new(FakePlatform {
            mentions: vec![mention("m1", "@ninedttt how do I play?")],
            ..Default::default()
        });
        let dir = TempDir::new().unwrap();
        let orch = orchestrator(Arc::clone(&platform), &dir);

        orch.respond().await.unwrap();

        let published = platform.published.lock().unwrap();
        assert_eq!(published.len(), 1);
        assert!(published[0].text.starts_with("@user_author-m1 "));
        assert_eq!(published[0].in_reply_to.as_deref(), Some("m1"));
        // The like lands on the mention itself, not the reply.
        assert_eq!(
            platform.liked.lock().unwrap().clone(),
            vec![String::from("m1")]
        );
        assert!(orch.ledger.contains("m1").await);
    }

    #[tokio::test]
    async fn test_respond_skips_recorded_mentions() {
        let platform = Arc::new(FakePlatform {
            mentions: vec![mention("m1", "@ninedttt hello"), mention("m2", "@ninedttt hi")],
            ..Default::default()
        });
        let dir = TempDir::new().unwrap();
        let orch = orchestrator(Arc::clone(&platform), &dir);
        orch.ledger.record("m1").await;

        orch.respond().await.unwrap();

        let published = platform.published.lock().unwrap();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].in_reply_to.as_deref(), Some("m2"));
    }

    #[tokio::test]
    async fn test_failed_reply_still_burns_mention() {
        let platform = Arc::new(FakePlatform {
            mentions: vec![mention("m1", "@ninedttt hi")],
            fail_publish: true,
            ..Default::default()
        });
        let dir = TempDir::new().unwrap();
        let orch = orchestrator(Arc::clone(&platform), &dir);

        orch.respond().await.unwrap();
        assert!(orch.ledger.contains("m1").await);

        // Second cycle does not retry the burned mention.
        let platform2 = Arc::new(FakePlatform {
            mentions: vec![mention("m1", "@ninedttt hi")],
            ..Default::default()
        });
        let orch2 = Orchestrator::new(
            Arc::clone(&platform2) as Arc<dyn PlatformClient>,
            Composer::new(PersonaConfig::default()),
            Arc::clone(&orch.ledger),
            MediaPicker::new(dir.path().join("no-media")),
            None,
        );
        orch2.respond().await.unwrap();
        assert!(platform2.published.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_respond_persists_ledger() {
        let platform = Arc::new(FakePlatform {
            mentions: vec![mention("m1", "@ninedttt hello")],
            ..Default::default()
        });
        let dir = TempDir::new().unwrap();
        let orch = orchestrator(Arc::clone(&platform), &dir);

        orch.respond().await.unwrap();

        let reloaded = MentionLedger::open(dir.path().join("ledger.json"));
        assert!(reloaded.contains("m1").await);
    }

    #[tokio::test]
    async fn test_amplify_hunt_is_probabilistic() {
        let hits: Vec<SearchHit> = (0..200)
            .map(|i| SearchHit {
                id: format!("hit-{i}"),
                text: String::from("strategy games are great"),
            })
            .collect();
        let platform = Arc::new(FakePlatform {
            hits,
            ..Default::default()
        });
        let dir = TempDir::new().unwrap();
        let orch = orchestrator(Arc::clone(&platform), &dir);

        orch.amplify_hunt().await.unwrap();

        // With p = 0.25 over 200 hits, the count lands well inside
        // (0, 200); exact value varies by seed.
        let amplified = platform.amplified.lock().unwrap().len();
        assert!(amplified > 0, "expected at least one amplification");
        assert!(amplified < 150, "amplified far too many: {amplified}");
    }

    #[tokio::test]
    async fn test_diagnostic_and_activation_publish() {
        let platform = Arc::new(FakePlatform::default());
        let dir = TempDir::new().unwrap();
        let orch = orchestrator(Arc::clone(&platform), &dir);

        orch.diagnostic().await.unwrap();
        orch.announce_activation().await.unwrap();

        let published = platform.published.lock().unwrap();
        assert_eq!(published.len(), 2);
        assert!(published[0].text.contains("DIAGNOSTIC"));
        for draft in published.iter() {
            assert!(draft.text.chars().count() <= 280);
        }
    }

    #[tokio::test]
    async fn test_activation_tolerates_duplicate() {
        struct DuplicatePlatform(FakePlatform);

        #[async_trait]
        impl PlatformClient for DuplicatePlatform {
            async fn me(&self) -> Result<UserProfile, PlatformError> {
                self.0.me().await
            }
            async fn publish(&self, _: &Draft) -> Result<PostRef, PlatformError> {
                Err(PlatformError::DuplicateContent)
            }
            async fn mentions(&self, u: &str, l: usize) -> Result<Vec<Mention>, PlatformError> {
                self.0.mentions(u, l).await
            }
            async fn profile(&self, u: &str) -> Result<UserProfile, PlatformError> {
                self.0.profile(u).await
            }
            async fn search(&self, q: &str, l: usize) -> Result<Vec<SearchHit>, PlatformError> {
                self.0.search(q, l).await
            }
            async fn like(&self, p: &str) -> Result<(), PlatformError> {
                self.0.like(p).await
            }
            async fn amplify(&self, p: &str) -> Result<(), PlatformError> {
                self.0.amplify(p).await
            }
            async fn upload_media(&self, p: &Path) -> Result<String, PlatformError> {
                self.0.upload_media(p).await
            }
        }

        let dir = TempDir::new().unwrap();
        let ledger = Arc::new(MentionLedger::open(dir.path().join("ledger.json")));
        let orch = Orchestrator::new(
            Arc::new(DuplicatePlatform(FakePlatform::default())),
            Composer::new(PersonaConfig::default()),
            ledger,
            MediaPicker::new(dir.path().join("no-media")),
            None,
        );

        assert!(orch.announce_activation().await.is_ok());
    }

    #[tokio::test]
    async fn test_broadcast_publishes_within_limit() {
        let platform = Arc::new(FakePlatform::default());
        let dir = TempDir::new().unwrap();
        let orch = orchestrator(Arc::clone(&platform), &dir);

        for _ in 0..10 {
            orch.broadcast().await.unwrap();
        }

        let published = platform.published.lock().unwrap();
        assert_eq!(published.len(), 10);
        for draft in published.iter() {
            assert!(draft.text.chars().count() <= 280);
            assert!(draft.text.contains("https://www.9dttt.com"));
        }
    }
}
