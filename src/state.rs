use std::collections::BTreeMap;
use std::fmt;

use derive_setters::Setters;

use crate::axis::{Axes, Axis};

/// One column of the table, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Setters)]
#[setters(prefix = "with_")]
pub struct ColumnDef {
    #[setters(skip)]
    pub key: String,
    #[setters(into)]
    pub label: String,
    pub visible: bool,
    pub searchable: bool,
    pub sortable: bool,
    pub hidable: bool,
}

impl ColumnDef {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            label: key.clone(),
            key,
            visible: true,
            searchable: false,
            sortable: false,
            hidable: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggle(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => f.write_str("asc"),
            SortDirection::Desc => f.write_str("desc"),
        }
    }
}

/// `column == None` leaves rows in the store's natural order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SortState {
    pub column: Option<String>,
    pub direction: SortDirection,
}

impl SortState {
    pub fn by(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: Some(column.into()),
            direction,
        }
    }

    pub fn unsorted() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    pub page: usize,
    pub page_size: usize,
}

impl PaginationState {
    pub fn first(page_size: usize) -> Self {
        Self { page: 1, page_size }
    }

    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// Free text, matched as a case-insensitive substring.
    Text,
    /// One of a fixed set of options, matched exactly.
    Select,
}

/// An active filter. Entries only exist for non-empty values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterEntry {
    pub column: String,
    pub kind: FilterKind,
    pub value: String,
}

/// Active filters keyed by column, at most one per column.
pub type FilterSet = BTreeMap<String, FilterEntry>;

/// Everything that determines what the table displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableState {
    pub columns: Vec<ColumnDef>,
    pub filters: FilterSet,
    pub search: String,
    pub sort: SortState,
    pub pagination: PaginationState,
}

impl TableState {
    pub fn visible_columns(&self) -> impl Iterator<Item = &ColumnDef> {
        self.columns.iter().filter(|c| c.visible)
    }

    pub fn column(&self, key: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.key == key)
    }
}

/// The state a table was built with. Never mutated; it is the reset target
/// and the reference every axis compares itself against.
#[derive(Debug, PartialEq, Eq)]
pub struct DefaultSnapshot(TableState);

impl DefaultSnapshot {
    pub(crate) fn capture(state: TableState) -> Self {
        Self(state)
    }

    pub fn state(&self) -> &TableState {
        &self.0
    }
}

/// Composes the current axis values into one `TableState`.
pub fn aggregate(axes: &Axes) -> TableState {
    TableState {
        columns: axes.columns.get().clone(),
        filters: axes.filters.get().clone(),
        search: axes.search.get().clone(),
        sort: axes.sort.get().clone(),
        pagination: *axes.pagination.get(),
    }
}

pub fn is_default(axes: &Axes) -> bool {
    axes.columns.is_default()
        && axes.filters.is_default()
        && axes.search.is_default()
        && axes.sort.is_default()
        && axes.pagination.is_default()
}
