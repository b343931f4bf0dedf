use std::collections::{BTreeMap, HashSet};

use derive_setters::Setters;
use tracing::debug;

use crate::domain::{DEFAULT_PAGE_SIZE, TableError};
use crate::state::{
    ColumnDef, FilterEntry, FilterKind, FilterSet, PaginationState, SortState, TableState,
};

/// Which filter a column offers, and for select filters, which values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterDef {
    pub column: String,
    pub kind: FilterKind,
    pub options: Vec<String>,
}

impl FilterDef {
    pub fn text(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            kind: FilterKind::Text,
            options: Vec::new(),
        }
    }

    pub fn select<I, S>(column: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            column: column.into(),
            kind: FilterKind::Select,
            options: options.into_iter().map(Into::into).collect(),
        }
    }

    /// Turns a raw input value into an entry. Blank input yields `None`.
    pub fn entry(&self, value: &str) -> Result<Option<FilterEntry>, String> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(None);
        }
        if self.kind == FilterKind::Select
            && !self.options.is_empty()
            && !self.options.iter().any(|o| o == value)
        {
            return Err(format!(
                "'{value}' is not an option of the '{}' filter",
                self.column
            ));
        }
        Ok(Some(FilterEntry {
            column: self.column.clone(),
            kind: self.kind,
            value: value.to_string(),
        }))
    }
}

/// Author-provided definition of a table and its defaults.
///
/// ```
/// use tablestate::{ColumnDef, SortDirection, SortState, TableConfig};
///
/// let config = TableConfig::default()
///     .column(ColumnDef::new("name").with_searchable(true).with_sortable(true))
///     .column(ColumnDef::new("email").with_searchable(true))
///     .column(ColumnDef::new("language_code"))
///     .select_filter("language_code", ["en", "nl"])
///     .with_default_sort(SortState::by("name", SortDirection::Asc));
/// assert_eq!(config.page_size, 10);
/// ```
#[derive(Debug, Clone, Setters)]
#[setters(prefix = "with_")]
pub struct TableConfig {
    pub columns: Vec<ColumnDef>,
    pub select_filters: Vec<FilterDef>,
    #[setters(strip_option)]
    pub default_sort: Option<SortState>,
    #[setters(into)]
    pub default_search: String,
    pub default_filters: BTreeMap<String, String>,
    pub page_size: usize,
    pub per_page_options: Vec<usize>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            select_filters: Vec::new(),
            default_sort: None,
            default_search: String::new(),
            default_filters: BTreeMap::new(),
            page_size: DEFAULT_PAGE_SIZE,
            per_page_options: Vec::new(),
        }
    }
}

impl TableConfig {
    pub fn column(mut self, column: ColumnDef) -> Self {
        self.columns.push(column);
        self
    }

    pub fn select_filter<I, S>(mut self, column: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select_filters.push(FilterDef::select(column, options));
        self
    }

    pub fn default_filter(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_filters.insert(column.into(), value.into());
        self
    }

    /// Every searchable column gets a text search input, plus the declared
    /// select filters.
    pub(crate) fn filter_defs(&self) -> Result<Vec<FilterDef>, TableError> {
        let mut defs: Vec<FilterDef> = self
            .columns
            .iter()
            .filter(|c| c.searchable)
            .map(|c| FilterDef::text(c.key.clone()))
            .collect();

        for select in self.select_filters.iter() {
            let Some(column) = self.columns.iter().find(|c| c.key == select.column) else {
                return Err(TableError::InvalidConfig(format!(
                    "select filter on unknown column '{}'",
                    select.column
                )));
            };
            if column.searchable {
                return Err(TableError::InvalidConfig(format!(
                    "column '{}' cannot have both a search input and a select filter",
                    select.column
                )));
            }
            defs.push(FilterDef {
                kind: FilterKind::Select,
                ..select.clone()
            });
        }
        Ok(defs)
    }

    /// Validates the definition and assembles the state it describes.
    pub(crate) fn initial_state(&self, defs: &[FilterDef]) -> Result<TableState, TableError> {
        if self.columns.is_empty() {
            return Err(TableError::InvalidConfig("a table needs at least one column".into()));
        }

        let mut seen = HashSet::new();
        for column in self.columns.iter() {
            if !seen.insert(column.key.as_str()) {
                return Err(TableError::InvalidConfig(format!(
                    "duplicate column key '{}'",
                    column.key
                )));
            }
        }

        if let Some(key) = self.default_sort.as_ref().and_then(|s| s.column.as_deref()) {
            match self.columns.iter().find(|c| c.key == key) {
                Some(column) if column.sortable => {}
                Some(_) => {
                    return Err(TableError::InvalidConfig(format!(
                        "default sort column '{key}' is not sortable"
                    )));
                }
                None => {
                    return Err(TableError::InvalidConfig(format!(
                        "default sort on unknown column '{key}'"
                    )));
                }
            }
        }

        if self.page_size == 0 {
            return Err(TableError::InvalidConfig("page size must be positive".into()));
        }
        if !self.per_page_options.is_empty() && !self.per_page_options.contains(&self.page_size) {
            return Err(TableError::InvalidConfig(format!(
                "page size {} is not one of the per-page options {:?}",
                self.page_size, self.per_page_options
            )));
        }

        let mut filters = FilterSet::new();
        for (column, value) in self.default_filters.iter() {
            let def = defs.iter().find(|d| &d.column == column).ok_or_else(|| {
                TableError::InvalidConfig(format!("default filter on unfiltered column '{column}'"))
            })?;
            if let Some(entry) = def.entry(value).map_err(TableError::InvalidConfig)? {
                filters.insert(column.clone(), entry);
            }
        }

        let state = TableState {
            columns: self.columns.clone(),
            filters,
            search: self.default_search.trim().to_string(),
            sort: self.default_sort.clone().unwrap_or_default(),
            pagination: PaginationState::first(self.page_size),
        };
        debug!("Initial table state: {state:?}");
        Ok(state)
    }
}
