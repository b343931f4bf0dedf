use std::sync::Arc;

use tracing::trace;

use super::{Axis, replace};
use crate::domain::{AxisKind, TableError};
use crate::state::{DefaultSnapshot, PaginationState};

/// Current page and page size. There is no upper bound on the page here,
/// the row count is only known after querying.
#[derive(Debug)]
pub struct PaginationAxis {
    snapshot: Arc<DefaultSnapshot>,
    per_page_options: Vec<usize>,
    state: PaginationState,
}

impl PaginationAxis {
    pub fn new(snapshot: Arc<DefaultSnapshot>, per_page_options: Vec<usize>) -> Self {
        let state = snapshot.state().pagination;
        Self {
            snapshot,
            per_page_options,
            state,
        }
    }

    pub fn set_page(&mut self, page: usize) -> Result<bool, TableError> {
        if page < 1 {
            return Err(TableError::OutOfRange {
                axis: AxisKind::Pagination,
                value: page,
            });
        }
        let next = PaginationState { page, ..self.state };
        trace!("Page {} -> {}", self.state.page, page);
        Ok(replace(&mut self.state, next))
    }

    /// Changing the page size starts over on the first page.
    pub fn set_page_size(&mut self, page_size: usize) -> Result<bool, TableError> {
        if page_size == 0
            || (!self.per_page_options.is_empty() && !self.per_page_options.contains(&page_size))
        {
            return Err(TableError::OutOfRange {
                axis: AxisKind::Pagination,
                value: page_size,
            });
        }
        Ok(replace(&mut self.state, PaginationState::first(page_size)))
    }

    /// No-op on the last representable page.
    pub fn next_page(&mut self) -> bool {
        let next = PaginationState {
            page: self.state.page.saturating_add(1),
            ..self.state
        };
        replace(&mut self.state, next)
    }

    /// No-op on the first page.
    pub fn previous_page(&mut self) -> bool {
        if self.state.page > 1 {
            self.state.page -= 1;
            true
        } else {
            false
        }
    }

    pub fn per_page_options(&self) -> &[usize] {
        &self.per_page_options
    }

    /// Used when the current page turned out to lie beyond the last row.
    pub(crate) fn correct_to_first_page(&mut self) -> bool {
        let next = PaginationState {
            page: 1,
            ..self.state
        };
        replace(&mut self.state, next)
    }
}

impl Axis for PaginationAxis {
    type Value = PaginationState;

    const KIND: AxisKind = AxisKind::Pagination;

    fn get(&self) -> &Self::Value {
        &self.state
    }

    fn default_value(&self) -> &Self::Value {
        &self.snapshot.state().pagination
    }

    fn restore(&mut self, value: Self::Value) -> bool {
        replace(&mut self.state, value)
    }
}
