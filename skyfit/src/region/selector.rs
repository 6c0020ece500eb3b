//! Click-driven region capture.
//!
//! Reduces a stream of pointer releases to regions: every two clicks close one
//! rectangle, and input is ignored once the target count is reached. The display
//! layer only has to forward click positions and stop when it sees
//! [`SelectionEvent::Complete`].

use super::{Corner, Region, RegionSet};

/// Outcome of a single click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEvent {
    /// First corner recorded, waiting for the opposite one.
    Pending(Corner),
    /// A region was closed and added; more are expected.
    Added(Region),
    /// The set holds its target count; further clicks are ignored.
    Complete,
}

#[derive(Debug, Clone)]
pub struct RegionSelector {
    pending: Option<Corner>,
    set: RegionSet,
}

impl RegionSelector {
    pub fn new(sample: usize) -> Self {
        Self {
            pending: None,
            set: RegionSet::new(sample),
        }
    }

    pub fn click(&mut self, point: Corner) -> SelectionEvent {
        if self.set.is_complete() {
            return SelectionEvent::Complete;
        }

        let Some(first) = self.pending.take() else {
            self.pending = Some(point);
            return SelectionEvent::Pending(point);
        };

        let region = self.set.add(first, point);
        tracing::debug!(
            "Selected region {} ({}/{})",
            region,
            self.set.len(),
            self.set.sample()
        );

        if self.set.is_complete() {
            SelectionEvent::Complete
        } else {
            SelectionEvent::Added(region)
        }
    }

    /// Corner waiting for its partner, if any.
    pub fn pending(&self) -> Option<Corner> {
        self.pending
    }

    pub fn is_complete(&self) -> bool {
        self.set.is_complete()
    }

    pub fn regions(&self) -> &RegionSet {
        &self.set
    }

    /// Finishes selection, dropping any unpaired corner.
    pub fn finish(self) -> RegionSet {
        self.set
    }
}
