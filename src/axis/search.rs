use std::sync::Arc;

use tracing::trace;

use super::{Axis, replace};
use crate::domain::AxisKind;
use crate::state::DefaultSnapshot;

/// The global search box. An empty string means inactive.
#[derive(Debug)]
pub struct SearchAxis {
    snapshot: Arc<DefaultSnapshot>,
    text: String,
}

impl SearchAxis {
    pub fn new(snapshot: Arc<DefaultSnapshot>) -> Self {
        let text = snapshot.state().search.clone();
        Self { snapshot, text }
    }

    /// Surrounding whitespace is dropped, so whitespace-only input clears it.
    pub fn set(&mut self, text: &str) -> bool {
        let text = text.trim();
        let changed = replace(&mut self.text, text.to_string());
        trace!("Global search set to {text:?}, changed: {changed}");
        changed
    }
}

impl Axis for SearchAxis {
    type Value = String;

    const KIND: AxisKind = AxisKind::GlobalSearch;

    fn get(&self) -> &Self::Value {
        &self.text
    }

    fn default_value(&self) -> &Self::Value {
        &self.snapshot.state().search
    }

    fn restore(&mut self, value: Self::Value) -> bool {
        replace(&mut self.text, value)
    }
}
