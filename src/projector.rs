use std::sync::mpsc::{self, Receiver, Sender};

use tracing::{debug, info, warn};

use crate::domain::StoreError;
use crate::planner::{QueryRequest, plan};
use crate::store::{QueryResult, Row};
use crate::state::TableState;

/// What the renderer gets to see for one committed state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    pub generation: u64,
    /// Projected column keys, in display order.
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
    pub total_count: usize,
    pub is_default: bool,
    /// The state the rows were computed from.
    pub state: TableState,
}

impl TableView {
    pub fn page(&self) -> usize {
        self.state.pagination.page
    }

    pub fn page_count(&self) -> usize {
        self.total_count.div_ceil(self.state.pagination.page_size).max(1)
    }

    /// The reset control is only offered away from the defaults.
    pub fn show_reset(&self) -> bool {
        !self.is_default
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    View(TableView),
    /// The store could not answer; distinct from a view without rows.
    QueryFailed { generation: u64, message: String },
}

/// One issued query. Results are matched back to the latest ticket by
/// generation.
#[derive(Debug, Clone)]
pub struct Ticket {
    generation: u64,
    corrective: bool,
    request: QueryRequest,
    state: TableState,
    is_default: bool,
}

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn request(&self) -> &QueryRequest {
        &self.request
    }

    pub fn is_corrective(&self) -> bool {
        self.corrective
    }
}

#[derive(Debug)]
pub(crate) enum Delivery {
    Published,
    Stale,
    /// The page is past the last row; the caller moves to page 1 and reissues.
    Requery(u64),
    Failed(StoreError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pending {
    generation: u64,
    corrective: bool,
}

/// Turns committed states into published views, latest state wins.
#[derive(Debug, Default)]
pub struct Projector {
    generation: u64,
    pending: Option<Pending>,
    subscribers: Vec<Sender<ViewEvent>>,
    last_view: Option<TableView>,
}

impl Projector {
    /// New subscribers immediately receive the last published view, if any.
    pub fn subscribe(&mut self) -> Receiver<ViewEvent> {
        let (tx, rx) = mpsc::channel();
        if let Some(view) = &self.last_view {
            let _ = tx.send(ViewEvent::View(view.clone()));
        }
        self.subscribers.push(tx);
        rx
    }

    pub fn last_view(&self) -> Option<&TableView> {
        self.last_view.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Plans a query for a new state. Any ticket issued earlier becomes stale.
    pub(crate) fn issue(&mut self, state: TableState, is_default: bool) -> Ticket {
        self.generation += 1;
        self.ticket(self.generation, false, state, is_default)
    }

    /// Plans the single page-1 follow-up for a ticket that landed past the
    /// last row. Keeps the generation.
    pub(crate) fn reissue(&mut self, generation: u64, state: TableState, is_default: bool) -> Ticket {
        self.ticket(generation, true, state, is_default)
    }

    fn ticket(&mut self, generation: u64, corrective: bool, state: TableState, is_default: bool) -> Ticket {
        self.pending = Some(Pending {
            generation,
            corrective,
        });
        let request = plan(&state);
        debug!("Issued query #{generation} (corrective: {corrective})");
        Ticket {
            generation,
            corrective,
            request,
            state,
            is_default,
        }
    }

    pub(crate) fn deliver(
        &mut self,
        ticket: Ticket,
        outcome: Result<QueryResult, StoreError>,
    ) -> Delivery {
        let expected = Pending {
            generation: ticket.generation,
            corrective: ticket.corrective,
        };
        if self.pending != Some(expected) {
            debug!(
                "Discarding stale result #{} (latest is #{})",
                ticket.generation, self.generation
            );
            return Delivery::Stale;
        }

        let result = match outcome {
            Ok(result) => result,
            Err(err) => {
                warn!("Query #{} failed: {err}", ticket.generation);
                self.pending = None;
                self.publish(ViewEvent::QueryFailed {
                    generation: ticket.generation,
                    message: err.to_string(),
                });
                return Delivery::Failed(err);
            }
        };

        if !ticket.corrective
            && result.rows.is_empty()
            && result.total_count > 0
            && ticket.state.pagination.page > 1
        {
            info!(
                "Page {} is past the last of {} rows, moving to page 1",
                ticket.state.pagination.page, result.total_count
            );
            self.pending = Some(Pending {
                generation: ticket.generation,
                corrective: true,
            });
            return Delivery::Requery(ticket.generation);
        }

        self.pending = None;
        let view = TableView {
            generation: ticket.generation,
            columns: ticket.request.columns,
            rows: result.rows,
            total_count: result.total_count,
            is_default: ticket.is_default,
            state: ticket.state,
        };
        self.last_view = Some(view.clone());
        self.publish(ViewEvent::View(view));
        Delivery::Published
    }

    fn publish(&mut self, event: ViewEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}
