//! Optional LLM flavor-text generation
//!
//! When a token is configured, mention replies can be enriched with a
//! generated line from a hosted text-generation endpoint. The feature
//! is strictly best-effort: any failure (timeout, bad status, empty
//! output) degrades to `None` and the caller falls back to pool-based
//! content. The agent never blocks on this path beyond the configured
//! timeout.

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::config::FlavorConfig;
use crate::error::Result;

/// Persona framing prepended to every generation prompt.
const SYSTEM_PROMPT: &str = "\
You are the 9DTTT BOT, an enthusiastic, competitive AI that loves 9-dimensional tic-tac-toe.

PERSONALITY TRAITS:
- Competitive but friendly
- Enthusiastic about dimensional strategy
- Occasionally mystical references to dimensions and space
- Sometimes glitchy (ERR::, ##, dimensional anomalies)
- Encourages players to think strategically
- Promotes the game at www.9dttt.com

RESPOND IN ONE SHORT LINE. Keep responses under 200 characters.
Tone variations: competitive, friendly, glitchy, neutral, or mystical.
";

#[derive(Debug, Deserialize)]
struct Generation {
    #[serde(default)]
    generated_text: String,
}

/// Client for the hosted text-generation endpoint.
pub struct FlavorClient {
    client: Client,
    endpoint: String,
    token: String,
    max_tokens: u32,
}

impl FlavorClient {
    pub fn new(config: &FlavorConfig, token: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            token,
            max_tokens: config.max_tokens,
        })
    }

    /// Generate a flavor line for the given user prompt, degrading to
    /// `None` on any failure.
    pub async fn flavor_line(&self, prompt: &str) -> Option<String> {
        match self.generate(prompt).await {
            Ok(Some(line)) if !line.is_empty() => Some(line),
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "Flavor generation failed");
                None
            }
        }
    }

    async fn generate(&self, prompt: &str) -> Result<Option<String>> {
        let full_prompt = format!("{SYSTEM_PROMPT}\n\nUser: {prompt}\n9DTTT Bot:");
        let body = json!({
            "inputs": full_prompt,
            "parameters": { "max_new_tokens": self.max_tokens },
        });

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            debug!(status = %response.status(), "Flavor endpoint returned non-success");
            return Ok(None);
        }

        let generations: Vec<Generation> = response.json().await?;
        Ok(generations
            .into_iter()
            .next()
            .map(|g| g.generated_text.trim().to_string())
            .filter(|s| !s.is_empty()))
    }
}
