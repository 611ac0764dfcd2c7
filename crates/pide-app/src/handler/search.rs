//! Project-wide text search

use std::path::PathBuf;

use pide_core::prelude::*;
use pide_core::SearchMatch;
use pide_project::SearchRequest;

use crate::handler::{UpdateAction, UpdateResult};
use crate::state::ProjectContext;

pub fn find_in_project(state: &mut ProjectContext, request: SearchRequest) -> UpdateResult {
    match state.search.submit(&request) {
        Ok(ticket) => {
            state.search_results.clear();
            state.set_status(format!("Searching for \"{}\"", request.query));
            UpdateResult::action(UpdateAction::StartSearch {
                ticket_id: ticket.id,
                request,
                cancel: ticket.cancel_rx,
            })
        }
        Err(err) => {
            state.set_status(err.to_string());
            UpdateResult::none()
        }
    }
}

pub fn search_batch(
    state: &mut ProjectContext,
    search_id: u64,
    path: PathBuf,
    matches: Vec<SearchMatch>,
) -> UpdateResult {
    if !state.search.is_current(search_id) {
        return UpdateResult::none();
    }
    state
        .search_results
        .entry(path)
        .or_default()
        .extend(matches);
    UpdateResult::none()
}

pub fn search_finished(state: &mut ProjectContext, search_id: u64) -> UpdateResult {
    if !state.search.is_current(search_id) {
        return UpdateResult::none();
    }
    state.search.complete(search_id);
    let total: usize = state.search_results.values().map(Vec::len).sum();
    state.set_status(format!("Found {total} match(es)"));
    state.overlays.bottom_panel_expanded = true;
    UpdateResult::none()
}

pub fn search_failed(state: &mut ProjectContext, search_id: u64, message: String) -> UpdateResult {
    if !state.search.is_current(search_id) {
        return UpdateResult::none();
    }
    state.search.complete(search_id);
    warn!(search_id, %message, "search failed");
    state.set_status(format!("Search failed: {message}"));
    UpdateResult::none()
}
