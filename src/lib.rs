//! herald - Social media automation agent
//!
//! A broadcast/reply bot engine: scheduled posts, mention replies with
//! deduplication, content amplification, and structured game-event relays.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management and credential validation
//! - [`content`] - Weighted tone selection, content pools, message assembly
//! - [`dispatch`] - Typed inbound game events and the dispatch table
//! - [`scheduler`] - Background jobs with fixed/jittered/daily triggers
//! - [`platform`] - Social platform client boundary (trait + HTTP impl)
//! - [`store`] - Persisted idempotency store for handled mention IDs
//! - [`orchestrator`] - Broadcast, respond, amplify and diagnostic cycles
//! - [`server`] - Webhook boundary receiving game events
//! - [`llm`] - Optional flavor-text generation (best effort)
//!
//! # Example
//!
//! ```no_run
//! use herald::config::Config;
//! use herald::content::Composer;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let composer = Composer::new(config.persona.clone());
//!     // composer drives every outbound message
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod content;
pub mod dispatch;
pub mod error;
pub mod llm;
pub mod media;
pub mod orchestrator;
pub mod platform;
pub mod scheduler;
pub mod server;
pub mod store;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, Credentials, PersonaConfig};
    pub use crate::content::{Composer, MessageParts, Tone, ToneWeights};
    pub use crate::dispatch::{EventDispatcher, GameEvent};
    pub use crate::error::{Error, ErrorCategory, Result};
    pub use crate::orchestrator::Orchestrator;
    pub use crate::platform::{Draft, PlatformClient, PlatformError};
    pub use crate::scheduler::{Job, JobScheduler, TriggerPolicy};
    pub use crate::store::MentionLedger;
}

// Direct re-exports for convenience
pub use config::Config;
pub use error::{Error, Result};
