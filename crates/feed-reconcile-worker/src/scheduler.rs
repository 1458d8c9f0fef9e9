//! Tier scheduling with per-tier single-flight guards.
//!
//! Each tier is a (lookback window, cadence) pair running on its own tokio
//! task. Ticks fire on cadence regardless of how long the previous run
//! takes; a tick that finds the tier's flight token still held is silently
//! dropped, never queued. Distinct tiers run concurrently against the
//! store, which is safe because every job is independently idempotent.

use crate::{run_tag_sync, run_window_sync, FeedSource};
use mirror_database::DatabasePool;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Cadence of the tag sync job.
pub const TAG_SYNC_INTERVAL: Duration = Duration::from_secs(15);

/// One scheduled reconciliation tier.
#[derive(Debug, Clone)]
pub struct Tier {
    /// Name used in logs and the flight guard.
    pub name: &'static str,
    /// How far back this tier looks.
    pub max_age: chrono::Duration,
    /// How often this tier ticks.
    pub every: Duration,
}

/// The production tier ladder: tight cadence for the recent past, coarse
/// cadence for deep history.
pub fn default_tiers() -> Vec<Tier> {
    vec![
        Tier {
            name: "6h",
            max_age: chrono::Duration::hours(6),
            every: Duration::from_secs(60),
        },
        Tier {
            name: "48h",
            max_age: chrono::Duration::hours(48),
            every: Duration::from_secs(15 * 60),
        },
        Tier {
            name: "7d",
            max_age: chrono::Duration::days(7),
            every: Duration::from_secs(60 * 60),
        },
        Tier {
            name: "30d",
            max_age: chrono::Duration::days(30),
            every: Duration::from_secs(24 * 60 * 60),
        },
    ]
}

/// Non-blocking mutual-exclusion token for one named tier.
///
/// `try_acquire` either takes the token and returns a guard that releases
/// it on drop (on every exit path, including panics in the guarded job),
/// or returns `None` when a run is still in flight.
#[derive(Clone, Default)]
pub struct SingleFlight {
    held: Arc<AtomicBool>,
}

impl SingleFlight {
    /// Create a released token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the token, or `None` if it is already held.
    pub fn try_acquire(&self) -> Option<FlightGuard> {
        if self
            .held
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            Some(FlightGuard {
                held: self.held.clone(),
            })
        } else {
            None
        }
    }
}

/// Releases the flight token when dropped.
pub struct FlightGuard {
    held: Arc<AtomicBool>,
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        self.held.store(false, Ordering::Release);
    }
}

/// Spawn every default window tier plus the tag sync tier.
///
/// Returns the scheduler task handles; the tasks run until the process
/// exits. No job outcome, success or failure, ever terminates a task.
pub fn spawn_all_tiers<S>(source: Arc<S>, pool: Arc<DatabasePool>) -> Vec<JoinHandle<()>>
where
    S: FeedSource + 'static,
{
    let mut handles: Vec<JoinHandle<()>> = default_tiers()
        .into_iter()
        .map(|tier| spawn_window_tier(tier, source.clone(), pool.clone()))
        .collect();
    handles.push(spawn_tag_tier(source, pool));
    handles
}

/// Spawn one window sync tier on its own task.
pub fn spawn_window_tier<S>(
    tier: Tier,
    source: Arc<S>,
    pool: Arc<DatabasePool>,
) -> JoinHandle<()>
where
    S: FeedSource + 'static,
{
    tokio::spawn(async move {
        let flight = SingleFlight::new();
        let mut ticker = interval(tier.every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            let Some(guard) = flight.try_acquire() else {
                debug!(tier = tier.name, "Previous run still in flight, dropping tick");
                continue;
            };

            let source = source.clone();
            let pool = pool.clone();
            let tier = tier.clone();
            tokio::spawn(async move {
                let _guard = guard;
                let start = Instant::now();
                match run_window_sync(source.as_ref(), pool.as_ref(), tier.max_age).await {
                    Ok(report) => info!(
                        tier = tier.name,
                        duration_ms = start.elapsed().as_millis() as u64,
                        upserted = report.items.effective(),
                        deleted = report.deleted,
                        truncated = report.truncated,
                        "Window sync tick finished"
                    ),
                    Err(e) => warn!(
                        tier = tier.name,
                        duration_ms = start.elapsed().as_millis() as u64,
                        error = %e,
                        "Window sync tick failed, retrying next tick"
                    ),
                }
            });
        }
    })
}

/// Spawn the tag sync tier on its own task.
pub fn spawn_tag_tier<S>(source: Arc<S>, pool: Arc<DatabasePool>) -> JoinHandle<()>
where
    S: FeedSource + 'static,
{
    tokio::spawn(async move {
        let flight = SingleFlight::new();
        let mut ticker = interval(TAG_SYNC_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            let Some(guard) = flight.try_acquire() else {
                debug!(tier = "tags", "Previous run still in flight, dropping tick");
                continue;
            };

            let source = source.clone();
            let pool = pool.clone();
            tokio::spawn(async move {
                let _guard = guard;
                let start = Instant::now();
                match run_tag_sync(source.as_ref(), pool.as_ref()).await {
                    Ok(report) => info!(
                        tier = "tags",
                        duration_ms = start.elapsed().as_millis() as u64,
                        fetched = report.fetched,
                        rejected = report.rejected,
                        upserted = report.tags.effective(),
                        "Tag sync tick finished"
                    ),
                    Err(e) => warn!(
                        tier = "tags",
                        duration_ms = start.elapsed().as_millis() as u64,
                        error = %e,
                        "Tag sync tick failed, retrying next tick"
                    ),
                }
            });
        }
    })
}
