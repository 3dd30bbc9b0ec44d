//! Scheduled job wrappers around the orchestrator's cycles.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::scheduler::Job;

use super::Orchestrator;

pub struct BroadcastJob(pub Arc<Orchestrator>);

#[async_trait]
impl Job for BroadcastJob {
    fn name(&self) -> &str {
        "broadcast"
    }

    async fn run(&self) -> Result<()> {
        self.0.broadcast().await
    }
}

pub struct RespondJob(pub Arc<Orchestrator>);

#[async_trait]
impl Job for RespondJob {
    fn name(&self) -> &str {
        "respond"
    }

    async fn run(&self) -> Result<()> {
        self.0.respond().await
    }
}

pub struct AmplifyJob(pub Arc<Orchestrator>);

#[async_trait]
impl Job for AmplifyJob {
    fn name(&self) -> &str {
        "amplify_hunt"
    }

    async fn run(&self) -> Result<()> {
        self.0.amplify_hunt().await
    }
}

pub struct DiagnosticJob(pub Arc<Orchestrator>);

#[async_trait]
impl Job for DiagnosticJob {
    fn name(&self) -> &str {
        "diagnostic"
    }

    async fn run(&self) -> Result<()> {
        self.0.diagnostic().await
    }
}
