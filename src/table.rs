use std::sync::Arc;
use std::sync::mpsc::Receiver;

use tracing::{debug, info, instrument, trace};

use crate::axis::Axes;
use crate::config::{FilterDef, TableConfig};
use crate::domain::{Action, AxisKind, StoreError, TableError};
use crate::projector::{Delivery, Projector, Ticket, TableView, ViewEvent};
use crate::reset::{ChangeSet, Notifier, ResetController};
use crate::state::{DefaultSnapshot, TableState, aggregate, is_default};
use crate::store::{DataStore, QueryResult};

/// One interactive table: its axis stores, the snapshot they started from,
/// and the projector publishing what the table currently shows.
///
/// All mutations take `&mut self`, so a table has a single writer. Share it
/// across threads behind a `Mutex`.
#[derive(Debug)]
pub struct Table<S> {
    store: S,
    snapshot: Arc<DefaultSnapshot>,
    axes: Axes,
    notifier: Notifier,
    resetter: ResetController,
    projector: Projector,
}

impl<S: DataStore> Table<S> {
    /// Validates the definition and captures the default snapshot. No query
    /// runs until [`Table::refresh`] or the first mutation.
    pub fn new(config: TableConfig, store: S) -> Result<Self, TableError> {
        let defs = config.filter_defs()?;
        let state = config.initial_state(&defs)?;
        let snapshot = Arc::new(DefaultSnapshot::capture(state));
        let axes = Axes::new(&snapshot, defs, config.per_page_options.clone());
        info!(
            "Created table with {} columns, page size {}",
            config.columns.len(),
            config.page_size
        );

        Ok(Self {
            store,
            resetter: ResetController::new(Arc::clone(&snapshot)),
            snapshot,
            axes,
            notifier: Notifier::default(),
            projector: Projector::default(),
        })
    }

    pub fn subscribe(&mut self) -> Receiver<ViewEvent> {
        self.projector.subscribe()
    }

    pub fn state(&self) -> TableState {
        aggregate(&self.axes)
    }

    pub fn is_default(&self) -> bool {
        is_default(&self.axes)
    }

    pub fn snapshot(&self) -> &DefaultSnapshot {
        &self.snapshot
    }

    pub fn axes(&self) -> &Axes {
        &self.axes
    }

    pub fn filter_def(&self, column: &str) -> Option<&FilterDef> {
        self.axes.filters.def(column)
    }

    pub fn last_view(&self) -> Option<&TableView> {
        self.projector.last_view()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Queries and publishes the current state without changing it.
    pub fn refresh(&mut self) -> Result<(), TableError> {
        let ticket = self.issue();
        self.run(ticket)
    }

    pub fn toggle_column(&mut self, key: &str) -> Result<(), TableError> {
        self.apply(Action::ToggleColumn(key.to_string()))
    }

    pub fn set_filter(&mut self, column: &str, value: Option<&str>) -> Result<(), TableError> {
        self.apply(Action::SetFilter {
            column: column.to_string(),
            value: value.map(str::to_string),
        })
    }

    pub fn set_global_search(&mut self, text: &str) -> Result<(), TableError> {
        self.apply(Action::SetGlobalSearch(text.to_string()))
    }

    pub fn set_sort(&mut self, column: &str) -> Result<(), TableError> {
        self.apply(Action::SetSort(column.to_string()))
    }

    pub fn set_page(&mut self, page: usize) -> Result<(), TableError> {
        self.apply(Action::SetPage(page))
    }

    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), TableError> {
        self.apply(Action::SetPageSize(page_size))
    }

    pub fn next_page(&mut self) -> Result<(), TableError> {
        self.apply(Action::NextPage)
    }

    pub fn previous_page(&mut self) -> Result<(), TableError> {
        self.apply(Action::PreviousPage)
    }

    /// Restores every axis to the snapshot. Publishes at most one view, and
    /// nothing at all when the table is already at its defaults.
    pub fn reset(&mut self) -> Result<(), TableError> {
        self.apply(Action::Reset)
    }

    /// Applies an action and runs the resulting query against the store.
    pub fn apply(&mut self, action: Action) -> Result<(), TableError> {
        match self.stage(action)? {
            Some(ticket) => self.run(ticket),
            None => Ok(()),
        }
    }

    /// Applies an action and returns the query to run, without running it.
    /// `None` means nothing changed. Hand the outcome to [`Table::complete`].
    #[instrument(skip(self))]
    pub fn stage(&mut self, action: Action) -> Result<Option<Ticket>, TableError> {
        let changes = match action {
            Action::Reset => self.resetter.reset(&mut self.axes, &mut self.notifier),
            Action::ToggleColumn(key) => {
                let changed = self.axes.columns.toggle(&key)?;
                self.single(AxisKind::Columns, changed)
            }
            Action::SetFilter { column, value } => {
                let changed = self.axes.filters.set(&column, value.as_deref())?;
                self.single(AxisKind::Filters, changed)
            }
            Action::SetGlobalSearch(text) => {
                let changed = self.axes.search.set(&text);
                self.single(AxisKind::GlobalSearch, changed)
            }
            Action::SetSort(column) => {
                let changed = self.axes.sort.set(&column)?;
                self.single(AxisKind::Sort, changed)
            }
            Action::SetPage(page) => {
                let changed = self.axes.pagination.set_page(page)?;
                self.single(AxisKind::Pagination, changed)
            }
            Action::SetPageSize(page_size) => {
                let changed = self.axes.pagination.set_page_size(page_size)?;
                self.single(AxisKind::Pagination, changed)
            }
            Action::NextPage => {
                let changed = self.axes.pagination.next_page();
                self.single(AxisKind::Pagination, changed)
            }
            Action::PreviousPage => {
                let changed = self.axes.pagination.previous_page();
                self.single(AxisKind::Pagination, changed)
            }
        };

        Ok(changes.map(|changes| {
            debug!("Committed changes to {changes:?}");
            self.issue()
        }))
    }

    /// Hands a store outcome back to the table. Results for anything but the
    /// latest ticket are dropped. Returns the follow-up query when the page
    /// turned out to lie past the last row.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        outcome: Result<QueryResult, StoreError>,
    ) -> Result<Option<Ticket>, TableError> {
        match self.projector.deliver(ticket, outcome) {
            Delivery::Published | Delivery::Stale => Ok(None),
            Delivery::Failed(err) => Err(TableError::Query(err)),
            Delivery::Requery(generation) => {
                self.axes.pagination.correct_to_first_page();
                let state = aggregate(&self.axes);
                let is_default = is_default(&self.axes);
                Ok(Some(self.projector.reissue(generation, state, is_default)))
            }
        }
    }

    fn single(&mut self, axis: AxisKind, changed: bool) -> Option<ChangeSet> {
        self.notifier.begin();
        if changed {
            self.notifier.publish(axis);
        }
        self.notifier.commit()
    }

    fn issue(&mut self) -> Ticket {
        let state = aggregate(&self.axes);
        let is_default = is_default(&self.axes);
        self.projector.issue(state, is_default)
    }

    fn run(&mut self, ticket: Ticket) -> Result<(), TableError> {
        let mut next = Some(ticket);
        while let Some(ticket) = next {
            trace!("Running query #{}", ticket.generation());
            let outcome = self.store.query(ticket.request());
            next = self.complete(ticket, outcome)?;
        }
        Ok(())
    }
}
