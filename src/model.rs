use std::sync::mpsc::Receiver;
use std::time::Instant;

use tablestate::{
    Action, DataStore, FilterKind, Table, TableError, TableView, ViewEvent,
};
use tracing::{debug, trace, warn};

use crate::controller::Message;
use crate::inputter::{InputResult, Inputter, PromptTarget};

#[derive(Debug, PartialEq)]
pub enum Status {
    Ready,
    Quitting,
}

/// The viewer's state: the table engine plus what the terminal needs around it.
pub struct Model<S> {
    table: Table<S>,
    events: Receiver<ViewEvent>,
    pub status: Status,
    view: Option<TableView>,
    cursor_column: usize,
    input: Inputter,
    last_input: InputResult,
    status_message: String,
    last_status_message_update: Instant,
}

impl<S: DataStore> Model<S> {
    pub fn init(mut table: Table<S>) -> Result<Self, TableError> {
        let events = table.subscribe();
        table.refresh()?;
        let mut model = Self {
            table,
            events,
            status: Status::Ready,
            view: None,
            cursor_column: 0,
            input: Inputter::default(),
            last_input: InputResult::default(),
            status_message: "Started tablestate!".to_string(),
            last_status_message_update: Instant::now(),
        };
        model.drain_events();
        Ok(model)
    }

    pub fn view(&self) -> Option<&TableView> {
        self.view.as_ref()
    }

    pub fn cursor_column(&self) -> usize {
        self.cursor_column
    }

    pub fn prompt(&self) -> Option<(&PromptTarget, &InputResult)> {
        self.input.target().map(|t| (t, &self.last_input))
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn raw_keyevents(&self) -> bool {
        self.input.is_active()
    }

    pub fn update(&mut self, message: Message) {
        trace!("Update: {message:?}");
        match message {
            Message::Quit => self.status = Status::Quitting,
            Message::MoveLeft => self.cursor_column = self.cursor_column.saturating_sub(1),
            Message::MoveRight => {
                let ncolumns = self.view.as_ref().map(|v| v.columns.len()).unwrap_or(0);
                if self.cursor_column + 1 < ncolumns {
                    self.cursor_column += 1;
                }
            }
            Message::NextPage => self.next_page(),
            Message::PreviousPage => self.apply(Action::PreviousPage),
            Message::SortColumn => {
                if let Some(column) = self.current_column() {
                    self.apply(Action::SetSort(column));
                }
            }
            Message::HideColumn => {
                if let Some(column) = self.current_column() {
                    self.apply(Action::ToggleColumn(column));
                }
            }
            Message::ToggleColumn(idx) => {
                let key = self.table.state().columns.get(idx).map(|c| c.key.clone());
                match key {
                    Some(key) => self.apply(Action::ToggleColumn(key)),
                    None => self.set_status_message(format!("There is no column {}", idx + 1)),
                }
            }
            Message::SearchGlobal => {
                let current = self.table.state().search;
                self.open_prompt(PromptTarget::GlobalSearch, &current);
            }
            Message::SearchColumn => self.search_column(),
            Message::CycleFilter => self.cycle_filter(),
            Message::Reset => self.apply(Action::Reset),
            Message::RawKey(key) => self.raw_input(key),
        }
    }

    fn current_column(&self) -> Option<String> {
        self.view
            .as_ref()
            .and_then(|v| v.columns.get(self.cursor_column))
            .cloned()
    }

    fn next_page(&mut self) {
        let last_page = self
            .view
            .as_ref()
            .is_some_and(|v| v.page() >= v.page_count());
        if last_page {
            self.set_status_message("Already on the last page");
        } else {
            self.apply(Action::NextPage);
        }
    }

    fn search_column(&mut self) {
        let Some(column) = self.current_column() else {
            return;
        };
        match self.table.filter_def(&column).map(|d| d.kind) {
            Some(FilterKind::Text) => {
                let current = self
                    .table
                    .axes()
                    .filters
                    .value(&column)
                    .unwrap_or_default()
                    .to_string();
                self.open_prompt(PromptTarget::ColumnSearch(column), &current);
            }
            _ => self.set_status_message(format!("Column '{column}' is not searchable")),
        }
    }

    /// Steps the select filter of the cursor column through its options, then
    /// back to no filter.
    fn cycle_filter(&mut self) {
        let Some(column) = self.current_column() else {
            return;
        };
        let Some(def) = self.table.filter_def(&column).cloned() else {
            self.set_status_message(format!("Column '{column}' has no filter"));
            return;
        };
        if def.kind != FilterKind::Select {
            self.set_status_message(format!("Column '{column}' has no select filter"));
            return;
        }
        let current = self.table.axes().filters.value(&column);
        let next = match current {
            None => def.options.first(),
            Some(value) => def
                .options
                .iter()
                .position(|o| o == value)
                .and_then(|idx| def.options.get(idx + 1)),
        }
        .cloned();
        self.apply(Action::SetFilter {
            column,
            value: next,
        });
    }

    fn open_prompt(&mut self, target: PromptTarget, initial: &str) {
        self.input.open(target, initial);
        self.last_input = self.input.get(false, false);
    }

    fn raw_input(&mut self, key: ratatui::crossterm::event::KeyEvent) {
        let target = self.input.target().cloned();
        let result = self.input.read(key);
        self.last_input = result.clone();
        if !result.finished || result.canceled {
            return;
        }
        match target {
            Some(PromptTarget::GlobalSearch) => self.apply(Action::SetGlobalSearch(result.input)),
            Some(PromptTarget::ColumnSearch(column)) => self.apply(Action::SetFilter {
                column,
                value: Some(result.input),
            }),
            None => {}
        }
    }

    fn apply(&mut self, action: Action) {
        let start_time = Instant::now();
        if let Err(e) = self.table.apply(action) {
            warn!("{e}");
            self.set_status_message(e.to_string());
        }
        debug!("Applied in {}ms", start_time.elapsed().as_millis());
        self.drain_events();
    }

    fn drain_events(&mut self) {
        for event in self.events.try_iter().collect::<Vec<_>>() {
            match event {
                ViewEvent::View(view) => {
                    self.cursor_column = self
                        .cursor_column
                        .min(view.columns.len().saturating_sub(1));
                    self.view = Some(view);
                }
                ViewEvent::QueryFailed { message, .. } => {
                    self.set_status_message(format!("Query failed: {message}"));
                }
            }
        }
    }

    fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
        self.last_status_message_update = Instant::now();
    }

    pub fn last_status_message_update(&self) -> Instant {
        self.last_status_message_update
    }
}
