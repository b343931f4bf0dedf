//! A table state engine.
//!
//! A [`Table`] holds five independent axes of presentation state (visible
//! columns, filters, global search, sort, pagination), recomputes what it
//! displays after every committed change and publishes it as a
//! [`TableView`]. [`Table::reset`] restores all axes to the snapshot taken at
//! construction in one step.

pub mod axis;
pub mod config;
pub mod domain;
pub mod planner;
pub mod projector;
pub mod reset;
pub mod state;
pub mod store;
pub mod table;

pub use config::{FilterDef, TableConfig};
pub use domain::{Action, AxisKind, StoreError, TableError};
pub use planner::{OrderBy, Predicate, QueryRequest, plan};
pub use projector::{TableView, Ticket, ViewEvent};
pub use state::{
    ColumnDef, DefaultSnapshot, FilterEntry, FilterKind, FilterSet, PaginationState,
    SortDirection, SortState, TableState,
};
pub use store::{DataStore, FrameStore, QueryResult, Row};
pub use table::Table;
