//! The five axis stores.
//!
//! Each store owns exactly one slice of the table state, validates its own
//! mutations and compares itself against the matching slice of the
//! [`DefaultSnapshot`]. Stores never look at each other; composing them is the
//! job of [`crate::state::aggregate`].

use std::fmt::Debug;
use std::sync::Arc;

use crate::config::FilterDef;
use crate::domain::AxisKind;
use crate::state::DefaultSnapshot;

mod columns;
mod filters;
mod pagination;
mod search;
mod sort;

pub use columns::ColumnsAxis;
pub use filters::FiltersAxis;
pub use pagination::PaginationAxis;
pub use search::SearchAxis;
pub use sort::SortAxis;

pub trait Axis {
    type Value: Clone + PartialEq + Debug;

    const KIND: AxisKind;

    fn get(&self) -> &Self::Value;

    /// The slice of the default snapshot this axis compares against.
    fn default_value(&self) -> &Self::Value;

    /// Overwrites the value without validation. Only the reset path uses this;
    /// the value always comes from the snapshot. Returns whether anything changed.
    fn restore(&mut self, value: Self::Value) -> bool;

    fn is_default(&self) -> bool {
        self.get() == self.default_value()
    }
}

pub(crate) fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

/// All axis stores of one table.
#[derive(Debug)]
pub struct Axes {
    pub columns: ColumnsAxis,
    pub filters: FiltersAxis,
    pub search: SearchAxis,
    pub sort: SortAxis,
    pub pagination: PaginationAxis,
}

impl Axes {
    pub(crate) fn new(
        snapshot: &Arc<DefaultSnapshot>,
        filter_defs: Vec<FilterDef>,
        per_page_options: Vec<usize>,
    ) -> Self {
        Self {
            columns: ColumnsAxis::new(Arc::clone(snapshot)),
            filters: FiltersAxis::new(Arc::clone(snapshot), filter_defs),
            search: SearchAxis::new(Arc::clone(snapshot)),
            sort: SortAxis::new(Arc::clone(snapshot)),
            pagination: PaginationAxis::new(Arc::clone(snapshot), per_page_options),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::sync::Arc;

    use crate::state::{
        ColumnDef, DefaultSnapshot, FilterSet, PaginationState, SortDirection, SortState,
        TableState,
    };

    /// id (hidden-able), name (searchable, sortable), email (searchable,
    /// sortable), language_code (select), sorted by name.
    pub fn snapshot() -> Arc<DefaultSnapshot> {
        Arc::new(DefaultSnapshot::capture(TableState {
            columns: vec![
                ColumnDef::new("id").with_hidable(false).with_sortable(true),
                ColumnDef::new("name")
                    .with_searchable(true)
                    .with_sortable(true),
                ColumnDef::new("email")
                    .with_searchable(true)
                    .with_sortable(true),
                ColumnDef::new("language_code"),
            ],
            filters: FilterSet::new(),
            search: String::new(),
            sort: SortState::by("name", SortDirection::Asc),
            pagination: PaginationState::first(10),
        }))
    }
}
