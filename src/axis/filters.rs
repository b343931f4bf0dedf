use std::sync::Arc;

use tracing::trace;

use super::{Axis, replace};
use crate::config::FilterDef;
use crate::domain::{AxisKind, TableError};
use crate::state::{DefaultSnapshot, FilterSet};

/// Per-column search inputs and select filters.
#[derive(Debug)]
pub struct FiltersAxis {
    snapshot: Arc<DefaultSnapshot>,
    defs: Vec<FilterDef>,
    entries: FilterSet,
}

impl FiltersAxis {
    pub fn new(snapshot: Arc<DefaultSnapshot>, defs: Vec<FilterDef>) -> Self {
        let entries = snapshot.state().filters.clone();
        Self {
            snapshot,
            defs,
            entries,
        }
    }

    /// Replaces the filter value of one column. A blank or missing value
    /// removes the entry.
    pub fn set(&mut self, column: &str, value: Option<&str>) -> Result<bool, TableError> {
        let def = self.def(column).ok_or_else(|| {
            TableError::invalid(AxisKind::Filters, format!("column '{column}' has no filter"))
        })?;
        let entry = def
            .entry(value.unwrap_or_default())
            .map_err(|reason| TableError::invalid(AxisKind::Filters, reason))?;

        let changed = match entry {
            Some(entry) => {
                let previous = self.entries.insert(column.to_string(), entry.clone());
                previous.as_ref() != Some(&entry)
            }
            None => self.entries.remove(column).is_some(),
        };
        trace!("Filter on '{column}' set to {value:?}, changed: {changed}");
        Ok(changed)
    }

    pub fn value(&self, column: &str) -> Option<&str> {
        self.entries.get(column).map(|e| e.value.as_str())
    }

    pub fn def(&self, column: &str) -> Option<&FilterDef> {
        self.defs.iter().find(|d| d.column == column)
    }
}

impl Axis for FiltersAxis {
    type Value = FilterSet;

    const KIND: AxisKind = AxisKind::Filters;

    fn get(&self) -> &Self::Value {
        &self.entries
    }

    fn default_value(&self) -> &Self::Value {
        &self.snapshot.state().filters
    }

    fn restore(&mut self, value: Self::Value) -> bool {
        replace(&mut self.entries, value)
    }
}
