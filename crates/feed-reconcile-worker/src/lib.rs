//! # Reconciliation engine for the feed mirror daemon.
//!
//! Turns the paginated, append/mutate/delete upstream feed into a correct
//! sequence of local upsert and delete operations.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────┐     ┌─────────────────────┐     ┌──────────────┐
//! │ Tier Scheduler │────▶│  Window / Tag jobs  │────▶│  FeedSource  │
//! │ (single-flight │     │  Backfill job       │     │  (upstream)  │
//! │  per tier)     │     └──────────┬──────────┘     └──────────────┘
//! └────────────────┘                │
//!                        ┌──────────▼──────────┐     ┌──────────────┐
//!                        │ Deletion Inferencer │────▶│ mirror store │
//!                        │ + batch writes      │     │   (SQLite)   │
//!                        └─────────────────────┘     └──────────────┘
//! ```
//!
//! ## Key properties
//!
//! - **Deletion inference**: the upstream API never announces removals.
//!   An id strictly between two consecutively observed ids of one ordered
//!   pull must have been removed upstream; the [`DeletionInferencer`]
//!   turns those gaps into delete batches.
//!
//! - **Idempotence**: every job can be re-run with overlapping input.
//!   Multiple tiers with overlapping windows converge the store to the
//!   same state regardless of execution order.
//!
//! - **Single-flight tiers**: a tick that arrives while the same tier is
//!   still running is dropped, not queued. Distinct tiers run
//!   concurrently.
//!
//! - **Degrade, never crash**: job failures end the current invocation
//!   early (partial batches are still committed where safe) and the next
//!   tick or the backfill retry loop recovers.

mod error;
mod inferencer;
mod jobs;
mod scheduler;
mod source;

pub use error::{WorkerError, WorkerResult};
pub use inferencer::DeletionInferencer;
pub use jobs::{
    run_backfill, run_tag_sync, run_window_sync, BackfillPacing, BackfillReport, TagSyncReport,
    WindowSyncReport,
};
pub use scheduler::{
    default_tiers, spawn_all_tiers, spawn_tag_tier, spawn_window_tier, FlightGuard, SingleFlight,
    Tier, TAG_SYNC_INTERVAL,
};
pub use source::FeedSource;
