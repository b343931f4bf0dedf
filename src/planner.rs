use tracing::trace;

use crate::state::{FilterKind, SortDirection, TableState};

/// A boolean filter over one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Case-insensitive substring match. `needle` is already lowercase.
    Contains { column: String, needle: String },
    Equals { column: String, value: String },
    /// True when empty.
    All(Vec<Predicate>),
    /// False when empty.
    Any(Vec<Predicate>),
}

impl Predicate {
    pub fn always() -> Self {
        Predicate::All(Vec::new())
    }

    /// Evaluates the predicate against one row. `cell` resolves a column
    /// name to the row's value; unknown columns never match.
    pub fn evaluate<'a, F>(&self, cell: &F) -> bool
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        match self {
            Predicate::Contains { column, needle } => {
                cell(column.as_str()).is_some_and(|v| v.to_lowercase().contains(needle.as_str()))
            }
            Predicate::Equals { column, value } => cell(column.as_str()).is_some_and(|v| v == value),
            Predicate::All(all) => all.iter().all(|p| p.evaluate(cell)),
            Predicate::Any(any) => any.iter().any(|p| p.evaluate(cell)),
        }
    }

    /// Every column the predicate reads.
    pub fn columns(&self) -> Vec<&str> {
        match self {
            Predicate::Contains { column, .. } | Predicate::Equals { column, .. } => {
                vec![column.as_str()]
            }
            Predicate::All(ps) | Predicate::Any(ps) => ps.iter().flat_map(|p| p.columns()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub direction: SortDirection,
}

/// What the data store is asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    /// Projection, in display order. Hidden columns are not requested.
    pub columns: Vec<String>,
    pub predicate: Predicate,
    /// `None` keeps the store's natural order.
    pub order_by: Option<OrderBy>,
    pub offset: usize,
    pub limit: usize,
}

/// Translates a table state into a single store query.
///
/// Filters are ANDed together. The global search is an OR over the visible
/// searchable columns, ANDed with the filters. Visibility only affects the
/// projection: hidden columns still filter and sort. The page is never
/// clamped here.
pub fn plan(state: &TableState) -> QueryRequest {
    let columns: Vec<String> = state.visible_columns().map(|c| c.key.clone()).collect();

    let mut predicates: Vec<Predicate> = state
        .filters
        .values()
        .map(|entry| match entry.kind {
            FilterKind::Text => Predicate::Contains {
                column: entry.column.clone(),
                needle: entry.value.to_lowercase(),
            },
            FilterKind::Select => Predicate::Equals {
                column: entry.column.clone(),
                value: entry.value.clone(),
            },
        })
        .collect();

    let term = state.search.trim();
    if !term.is_empty() {
        let needle = term.to_lowercase();
        predicates.push(Predicate::Any(
            state
                .visible_columns()
                .filter(|c| c.searchable)
                .map(|c| Predicate::Contains {
                    column: c.key.clone(),
                    needle: needle.clone(),
                })
                .collect(),
        ));
    }

    let order_by = state.sort.column.as_ref().map(|column| OrderBy {
        column: column.clone(),
        direction: state.sort.direction,
    });

    let request = QueryRequest {
        columns,
        predicate: Predicate::All(predicates),
        order_by,
        offset: state.pagination.offset(),
        limit: state.pagination.page_size,
    };
    trace!("Planned {request:?}");
    request
}
