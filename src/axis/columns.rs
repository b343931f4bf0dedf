use std::sync::Arc;

use tracing::trace;

use super::{Axis, replace};
use crate::domain::{AxisKind, TableError};
use crate::state::{ColumnDef, DefaultSnapshot};

/// Column order and visibility.
#[derive(Debug)]
pub struct ColumnsAxis {
    snapshot: Arc<DefaultSnapshot>,
    columns: Vec<ColumnDef>,
}

impl ColumnsAxis {
    pub fn new(snapshot: Arc<DefaultSnapshot>) -> Self {
        let columns = snapshot.state().columns.clone();
        Self { snapshot, columns }
    }

    /// Flips the visibility of one column, leaving order and the other
    /// columns untouched.
    pub fn toggle(&mut self, key: &str) -> Result<bool, TableError> {
        let idx = self.position(key)?;
        let visible = self.columns[idx].visible;
        self.set_visible(key, !visible)
    }

    pub fn set_visible(&mut self, key: &str, visible: bool) -> Result<bool, TableError> {
        let idx = self.position(key)?;
        if !visible && !self.columns[idx].hidable {
            return Err(TableError::invalid(
                AxisKind::Columns,
                format!("column '{key}' cannot be hidden"),
            ));
        }
        let changed = replace(&mut self.columns[idx].visible, visible);
        trace!("Column '{key}' visible: {visible}, changed: {changed}");
        Ok(changed)
    }

    pub fn visible_keys(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .filter(|c| c.visible)
            .map(|c| c.key.as_str())
    }

    fn position(&self, key: &str) -> Result<usize, TableError> {
        self.columns
            .iter()
            .position(|c| c.key == key)
            .ok_or_else(|| TableError::invalid(AxisKind::Columns, format!("unknown column '{key}'")))
    }
}

impl Axis for ColumnsAxis {
    type Value = Vec<ColumnDef>;

    const KIND: AxisKind = AxisKind::Columns;

    fn get(&self) -> &Self::Value {
        &self.columns
    }

    fn default_value(&self) -> &Self::Value {
        &self.snapshot.state().columns
    }

    fn restore(&mut self, value: Self::Value) -> bool {
        replace(&mut self.columns, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::fixtures::snapshot;

    #[test]
    fn toggle_hides_only_that_column() {
        let mut axis = ColumnsAxis::new(snapshot());
        assert!(axis.toggle("email").unwrap());
        assert_eq!(
            axis.visible_keys().collect::<Vec<_>>(),
            vec!["id", "name", "language_code"]
        );
        // order is untouched
        let keys: Vec<_> = axis.get().iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["id", "name", "email", "language_code"]);
        assert!(!axis.is_default());

        assert!(axis.toggle("email").unwrap());
        assert!(axis.is_default());
    }

    #[test]
    fn unknown_column_is_rejected() {
        let mut axis = ColumnsAxis::new(snapshot());
        let err = axis.toggle("phone").unwrap_err();
        assert!(matches!(
            err,
            TableError::InvalidAxisValue {
                axis: AxisKind::Columns,
                ..
            }
        ));
        assert!(axis.is_default());
    }

    #[test]
    fn fixed_columns_cannot_be_hidden() {
        let mut axis = ColumnsAxis::new(snapshot());
        assert!(axis.toggle("id").is_err());
        assert!(axis.is_default());
        // showing an already visible fixed column is a no-op
        assert!(!axis.set_visible("id", true).unwrap());
    }
}
