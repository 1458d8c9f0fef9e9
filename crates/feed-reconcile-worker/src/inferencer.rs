//! Deletion inference from gaps in the observed id sequence.
//!
//! The upstream id space is issued densely and the feed serves what is left
//! of it in strictly descending order. When one ordered pull emits id `a`
//! directly after id `b` with `b > a + 1`, every id strictly between them
//! existed at some point and is no longer served: it was removed upstream.
//! Pagination cannot explain the gap because the traversal is exhaustive
//! within the pulled window.
//!
//! The chain of observed ids is scoped to a single traversal. A fresh
//! inferencer per job invocation keeps a window boundary from one run ever
//! being mistaken for a deletion boundary in another.

/// Accumulates implied-deleted ids over one descending-id traversal.
#[derive(Debug, Default)]
pub struct DeletionInferencer {
    last_seen: Option<u64>,
    deleted: Vec<u64>,
}

impl DeletionInferencer {
    /// Create an inferencer with no observation context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe the next id of the traversal.
    ///
    /// Must be called for every delivered item in traversal order,
    /// including items a caller-side age filter later rejects: skipping
    /// filtered items here would turn the filter boundary into a fake gap.
    pub fn observe(&mut self, id: u64) {
        if let Some(prev) = self.last_seen {
            // Open-open range: both observed endpoints are confirmed present.
            if prev.saturating_sub(1) > id {
                self.deleted.extend(id + 1..prev);
            }
        }
        self.last_seen = Some(id);
    }

    /// Ids determined absent upstream so far.
    pub fn deleted(&self) -> &[u64] {
        &self.deleted
    }

    /// Drain the implied-deleted ids accumulated so far, keeping the
    /// observation chain intact.
    ///
    /// Used by the backfill crawl to flush deletes page by page while the
    /// traversal (and its `last_seen` context) continues.
    pub fn take_deleted(&mut self) -> Vec<u64> {
        std::mem::take(&mut self.deleted)
    }

    /// Consume the inferencer, yielding the implied-deleted id set.
    pub fn into_deleted(self) -> Vec<u64> {
        self.deleted
    }
}
