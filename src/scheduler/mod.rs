//! Job scheduling
//!
//! Jobs are registered with a [`TriggerPolicy`]; at registration each
//! policy resolves into a concrete [`Cadence`]. Jittered policies draw
//! their random interval exactly once, so a job registered with a
//! 120-240 minute jitter fires at one fixed interval for the life of
//! the process, re-randomized only on restart.
//!
//! Each job runs on its own tokio task. A run that returns an error is
//! logged and the cadence continues; a run that panics is caught at the
//! join boundary and likewise does not take down the scheduler or any
//! sibling job.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Local, NaiveDateTime, TimeDelta, Timelike};
use rand::Rng;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::error::Result;

// ============================================================================
// Triggers
// ============================================================================

/// Declarative description of when a job should fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerPolicy {
    /// Fire every `interval`, forever.
    FixedInterval(Duration),

    /// Fire at a fixed interval drawn uniformly from `[min, max]` once
    /// at registration.
    JitteredIntervalOnce { min: Duration, max: Duration },

    /// Fire once per day at the given local hour.
    DailyAt { hour: u32 },
}

/// A resolved trigger: all randomness already applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    Every(Duration),
    Daily { hour: u32 },
}

impl TriggerPolicy {
    /// Resolve the policy into a concrete cadence, drawing jitter once.
    pub fn resolve(self, rng: &mut impl Rng) -> Cadence {
        match self {
            TriggerPolicy::FixedInterval(interval) => Cadence::Every(interval),
            TriggerPolicy::JitteredIntervalOnce { min, max } => {
                let (lo, hi) = (min.as_secs(), max.as_secs());
                let secs = if lo >= hi { lo } else { rng.gen_range(lo..=hi) };
                Cadence::Every(Duration::from_secs(secs))
            }
            TriggerPolicy::DailyAt { hour } => Cadence::Daily { hour: hour % 24 },
        }
    }
}

/// Time until the next occurrence of `hour:00:00` after `now`.
fn until_next_hour(now: NaiveDateTime, hour: u32) -> Duration {
    let today_target = now
        .with_hour(hour)
        .and_then(|t| t.with_minute(0))
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now);

    let target = if today_target > now {
        today_target
    } else {
        today_target + TimeDelta::days(1)
    };

    (target - now).to_std().unwrap_or(Duration::from_secs(60))
}

// ============================================================================
// Jobs
// ============================================================================

/// A unit of scheduled work.
#[async_trait]
pub trait Job: Send + Sync + 'static {
    /// Stable name used in logs.
    fn name(&self) -> &str;

    /// Execute one run. Errors abort this run only.
    async fn run(&self) -> Result<()>;
}

// ============================================================================
// Scheduler
// ============================================================================

struct Registration {
    job: Arc<dyn Job>,
    cadence: Cadence,
}

/// Runs registered jobs on their cadences until shutdown.
pub struct JobScheduler {
    registrations: Vec<Registration>,
    shutdown_tx: watch::Sender<bool>,
    handles: Vec<JoinHandle<()>>,
}

impl JobScheduler {
    #[must_use]
    pub fn new() -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            registrations: Vec::new(),
            shutdown_tx,
            handles: Vec::new(),
        }
    }

    /// Register a job, resolving its trigger policy immediately.
    pub fn register(&mut self, job: Arc<dyn Job>, policy: TriggerPolicy) {
        let cadence = policy.resolve(&mut rand::thread_rng());
        self.register_resolved(job, cadence);
    }

    /// Register a job with an already-resolved cadence. Used by tests
    /// that need deterministic timing.
    pub fn register_resolved(&mut self, job: Arc<dyn Job>, cadence: Cadence) {
        info!(job = job.name(), ?cadence, "Registered job");
        self.registrations.push(Registration { job, cadence });
    }

    /// Number of registered jobs.
    #[must_use]
    pub fn job_count(&self) -> usize {
        self.handles.len().max(self.registrations.len())
    }

    /// Spawn one task per registered job.
    pub fn start(&mut self) {
        for registration in self.registrations.drain(..) {
            let rx = self.shutdown_tx.subscribe();
            let handle = tokio::spawn(run_job_loop(registration.job, registration.cadence, rx));
            self.handles.push(handle);
        }
        info!(jobs = self.handles.len(), "Scheduler started");
    }

    /// Signal shutdown and wait for all job tasks to finish.
    pub async fn shutdown(&mut self) {
        let _ = self.shutdown_tx.send(true);
        for handle in self.handles.drain(..) {
            if let Err(e) = handle.await {
                error!(error = %e, "Job task failed to join");
            }
        }
        info!("Scheduler stopped");
    }
}

impl Default for JobScheduler {
    fn default() -> Self {
        Self::new()
    }
}

async fn run_job_loop(job: Arc<dyn Job>, cadence: Cadence, mut shutdown: watch::Receiver<bool>) {
    match cadence {
        Cadence::Every(interval) => {
            // First fire happens one interval after startup, matching
            // interval-style registration.
            let mut ticker =
                tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => execute(&job).await,
                    _ = shutdown.changed() => {
                        debug!(job = job.name(), "Job loop shutting down");
                        return;
                    }
                }
            }
        }
        Cadence::Daily { hour } => loop {
            let wait = until_next_hour(Local::now().naive_local(), hour);
            debug!(job = job.name(), wait_secs = wait.as_secs(), "Daily job sleeping");
            tokio::select! {
                _ = tokio::time::sleep(wait) => execute(&job).await,
                _ = shutdown.changed() => {
                    debug!(job = job.name(), "Job loop shutting down");
                    return;
                }
            }
        },
    }
}

/// Run one job iteration, isolating both errors and panics.
async fn execute(job: &Arc<dyn Job>) {
    let name = job.name().to_string();
    debug!(job = %name, "Job run starting");

    let inner = Arc::clone(job);
    let result = tokio::spawn(async move { inner.run().await }).await;

    match result {
        Ok(Ok(())) => debug!(job = %name, "Job run completed"),
        Ok(Err(e)) => warn!(job = %name, error = %e, category = ?e.category(), "Job run failed"),
        Err(join_err) if join_err.is_panic() => {
            error!(job = %name, "Job run panicked; cadence continues");
        }
        Err(join_err) => {
            error!(job = %name, error = %join_err, "Job task cancelled");
        }
    }
}
