use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

use crate::axis::{Axes, Axis};
use crate::domain::AxisKind;
use crate::state::DefaultSnapshot;

/// Axes changed by one committed batch.
pub type ChangeSet = BTreeSet<AxisKind>;

/// Collects axis change notifications and releases them once per batch.
///
/// Batches nest; only closing the outermost one hands out the changes.
#[derive(Debug, Default)]
pub struct Notifier {
    pending: ChangeSet,
    depth: usize,
}

impl Notifier {
    pub fn begin(&mut self) {
        self.depth += 1;
    }

    pub fn publish(&mut self, axis: AxisKind) {
        self.pending.insert(axis);
    }

    /// Closes a batch. Returns the collected changes when the outermost batch
    /// closes and at least one axis changed.
    pub fn commit(&mut self) -> Option<ChangeSet> {
        self.depth = self.depth.saturating_sub(1);
        if self.depth > 0 || self.pending.is_empty() {
            return None;
        }
        Some(std::mem::take(&mut self.pending))
    }
}

/// Owns the one transition that writes more than one axis.
#[derive(Debug)]
pub struct ResetController {
    snapshot: Arc<DefaultSnapshot>,
}

impl ResetController {
    pub fn new(snapshot: Arc<DefaultSnapshot>) -> Self {
        Self { snapshot }
    }

    /// Restores every axis from the snapshot inside a single batch.
    /// Returns `None` when the table was already at its defaults.
    pub fn reset(&self, axes: &mut Axes, notifier: &mut Notifier) -> Option<ChangeSet> {
        let defaults = self.snapshot.state();
        notifier.begin();
        if axes.columns.restore(defaults.columns.clone()) {
            notifier.publish(AxisKind::Columns);
        }
        if axes.filters.restore(defaults.filters.clone()) {
            notifier.publish(AxisKind::Filters);
        }
        if axes.search.restore(defaults.search.clone()) {
            notifier.publish(AxisKind::GlobalSearch);
        }
        if axes.sort.restore(defaults.sort.clone()) {
            notifier.publish(AxisKind::Sort);
        }
        if axes.pagination.restore(defaults.pagination) {
            notifier.publish(AxisKind::Pagination);
        }
        let changes = notifier.commit();
        debug!("Reset restored {changes:?}");
        changes
    }
}
