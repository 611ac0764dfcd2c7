//! Single-slot project search with cancellation of the superseded run

use pide_core::prelude::*;
use pide_project::SearchRequest;
use tokio::sync::watch;

/// Handed out when a search is admitted. The id identifies the run in
/// result messages; the receiver observes cancellation.
#[derive(Debug)]
pub struct SearchTicket {
    pub id: u64,
    pub cancel_rx: watch::Receiver<bool>,
}

#[derive(Debug)]
struct ActiveSearch {
    id: u64,
    cancel_tx: watch::Sender<bool>,
}

/// At most one project search runs at a time. Submitting a new one
/// cancels the previous run synchronously; results carrying a stale id
/// are dropped by the caller via [`is_current`](Self::is_current).
#[derive(Debug, Default)]
pub struct SearchCoordinator {
    next_id: u64,
    current: Option<ActiveSearch>,
}

impl SearchCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit a search, cancelling any in-flight one first.
    pub fn submit(&mut self, request: &SearchRequest) -> Result<SearchTicket> {
        if request.query.trim().is_empty() {
            return Err(Error::invalid_request("search query is empty"));
        }
        if request.roots.is_empty() {
            return Err(Error::invalid_request("search has no root directories"));
        }

        self.cancel_current();

        self.next_id += 1;
        let (cancel_tx, cancel_rx) = watch::channel(false);
        self.current = Some(ActiveSearch {
            id: self.next_id,
            cancel_tx,
        });
        debug!(id = self.next_id, query = %request.query, "search admitted");
        Ok(SearchTicket {
            id: self.next_id,
            cancel_rx,
        })
    }

    /// Whether results tagged with `id` belong to the in-flight run
    pub fn is_current(&self, id: u64) -> bool {
        self.current.as_ref().is_some_and(|s| s.id == id)
    }

    pub fn in_flight(&self) -> bool {
        self.current.is_some()
    }

    /// Mark the run `id` finished. Stale ids are ignored.
    pub fn complete(&mut self, id: u64) {
        if self.is_current(id) {
            self.current = None;
        }
    }

    /// Signal cancellation to the in-flight run, if any, and forget it.
    pub fn cancel_current(&mut self) {
        if let Some(active) = self.current.take() {
            debug!(id = active.id, "search cancelled");
            let _ = active.cancel_tx.send(true);
        }
    }
}
