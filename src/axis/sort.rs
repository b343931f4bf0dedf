use std::sync::Arc;

use tracing::trace;

use super::{Axis, replace};
use crate::domain::{AxisKind, TableError};
use crate::state::{DefaultSnapshot, SortDirection, SortState};

#[derive(Debug)]
pub struct SortAxis {
    snapshot: Arc<DefaultSnapshot>,
    sortable: Vec<String>,
    sort: SortState,
}

impl SortAxis {
    pub fn new(snapshot: Arc<DefaultSnapshot>) -> Self {
        let state = snapshot.state();
        let sortable = state
            .columns
            .iter()
            .filter(|c| c.sortable)
            .map(|c| c.key.clone())
            .collect();
        let sort = state.sort.clone();
        Self {
            snapshot,
            sortable,
            sort,
        }
    }

    /// Sorting by the current column flips the direction, any other column
    /// starts ascending.
    pub fn set(&mut self, column: &str) -> Result<bool, TableError> {
        if !self.sortable.iter().any(|c| c == column) {
            return Err(TableError::invalid(
                AxisKind::Sort,
                format!("column '{column}' is not sortable"),
            ));
        }
        let next = match self.sort.column.as_deref() {
            Some(current) if current == column => SortState {
                column: self.sort.column.clone(),
                direction: self.sort.direction.toggle(),
            },
            _ => SortState::by(column, SortDirection::Asc),
        };
        trace!("Sort {:?} -> {:?}", self.sort, next);
        Ok(replace(&mut self.sort, next))
    }

    pub fn is_sortable(&self, column: &str) -> bool {
        self.sortable.iter().any(|c| c == column)
    }
}

impl Axis for SortAxis {
    type Value = SortState;

    const KIND: AxisKind = AxisKind::Sort;

    fn get(&self) -> &Self::Value {
        &self.sort
    }

    fn default_value(&self) -> &Self::Value {
        &self.snapshot.state().sort
    }

    fn restore(&mut self, value: Self::Value) -> bool {
        replace(&mut self.sort, value)
    }
}
