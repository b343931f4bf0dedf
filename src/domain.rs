use std::fmt;
use std::io;
use std::path::PathBuf;

use polars::error::PolarsError;
use thiserror::Error;
use tracing_error::SpanTrace;

/// Rows per page when the table definition does not say otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Rendered in place of a missing cell value.
pub const NULL_VALUE: &str = "∅";

/// The five independent dimensions of presentation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AxisKind {
    Columns,
    Filters,
    GlobalSearch,
    Sort,
    Pagination,
}

impl fmt::Display for AxisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AxisKind::Columns => "columns",
            AxisKind::Filters => "filters",
            AxisKind::GlobalSearch => "global search",
            AxisKind::Sort => "sort",
            AxisKind::Pagination => "pagination",
        };
        f.write_str(name)
    }
}

/// A single user interaction against a table.
///
/// Every variant except [`Action::Reset`] touches exactly one axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    ToggleColumn(String),
    SetFilter {
        column: String,
        value: Option<String>,
    },
    SetGlobalSearch(String),
    SetSort(String),
    SetPage(usize),
    SetPageSize(usize),
    NextPage,
    PreviousPage,
    Reset,
}

/// Errors surfaced by the table engine.
///
/// A rejected mutation leaves the table exactly as it was before the call.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("invalid {axis} value: {reason}")]
    InvalidAxisValue { axis: AxisKind, reason: String },

    #[error("{axis} value {value} is out of range")]
    OutOfRange { axis: AxisKind, value: usize },

    #[error("invalid table configuration: {0}")]
    InvalidConfig(String),

    #[error("query failed: {0}")]
    Query(#[from] StoreError),
}

impl TableError {
    pub(crate) fn invalid(axis: AxisKind, reason: impl Into<String>) -> Self {
        TableError::InvalidAxisValue {
            axis,
            reason: reason.into(),
        }
    }
}

/// Errors raised by a [`crate::store::DataStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    #[error("unknown file type: {}", .0.display())]
    UnknownFileType(PathBuf),

    #[error("failed to load {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: PolarsError,
        span_trace: SpanTrace,
    },

    #[error("columns have different lengths ('{column}' has {found} rows, expected {expected})")]
    RaggedColumns {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Polars(#[from] PolarsError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_name_the_axis() {
        let err = TableError::invalid(AxisKind::Sort, "column 'age' is not sortable");
        assert_eq!(
            err.to_string(),
            "invalid sort value: column 'age' is not sortable"
        );

        let err = TableError::OutOfRange {
            axis: AxisKind::Pagination,
            value: 0,
        };
        assert_eq!(err.to_string(), "pagination value 0 is out of range");
    }

    #[test]
    fn store_errors_convert_into_query_failures() {
        let err: TableError = StoreError::UnknownColumn("email".into()).into();
        assert!(matches!(err, TableError::Query(StoreError::UnknownColumn(_))));
    }
}
