//! Tab and save handling

use std::path::PathBuf;

use pide_core::prelude::*;
use pide_core::Range;
use pide_project::BuildTask;

use crate::handler::{UpdateAction, UpdateResult};
use crate::message::Message;
use crate::registry::DeselectOutcome;
use crate::state::ProjectContext;

fn deselect_result(state: &mut ProjectContext, outcome: DeselectOutcome) -> UpdateResult {
    if let Some(path) = outcome.failed {
        state.set_status(format!("Failed to save {}", path.display()));
        return UpdateResult::none();
    }
    if outcome.sync_needed {
        return UpdateResult::message(Message::SyncNeeded);
    }
    UpdateResult::none()
}

pub fn open_file(
    state: &mut ProjectContext,
    path: PathBuf,
    selection: Option<Range>,
) -> UpdateResult {
    let text = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "failed to read file");
            state.set_status(format!("Failed to open {}", path.display()));
            return UpdateResult::none();
        }
    };
    let persist = state.persistence.clone();
    let selection = selection.unwrap_or_else(Range::zero);
    let (_, outcome) = state.registry.open(path, selection, text, persist.as_ref());
    deselect_result(state, outcome)
}

pub fn select_tab(state: &mut ProjectContext, index: usize) -> UpdateResult {
    let persist = state.persistence.clone();
    match state.registry.select(index, persist.as_ref()) {
        Ok(outcome) => deselect_result(state, outcome),
        Err(err) => {
            warn!(index, error = %err, "tab selection rejected");
            UpdateResult::none()
        }
    }
}

pub fn close_tab(state: &mut ProjectContext, index: usize) -> UpdateResult {
    let persist = state.persistence.clone();
    if let Err(err) = state.registry.close_at(index, persist.as_ref()) {
        warn!(index, error = %err, "tab close rejected");
    }
    UpdateResult::none()
}

pub fn close_others(state: &mut ProjectContext) -> UpdateResult {
    let persist = state.persistence.clone();
    if let Some(keep) = state.registry.active_index() {
        if let Err(err) = state.registry.close_others(keep, persist.as_ref()) {
            warn!(keep, error = %err, "close others rejected");
        }
    }
    UpdateResult::none()
}

pub fn close_all(state: &mut ProjectContext) -> UpdateResult {
    let persist = state.persistence.clone();
    state.registry.close_all(persist.as_ref());
    UpdateResult::none()
}

/// Save every open buffer, then trigger the follow-ups the saved kinds
/// call for: a configuration re-sync when a build script was written,
/// and a resource-class regeneration build when markup was written,
/// the build is idle, and the caller allowed it.
pub fn save_all(
    state: &mut ProjectContext,
    notify: bool,
    can_process_resources: bool,
) -> UpdateResult {
    let persist = state.persistence.clone();
    let result = state.registry.save_all(persist.as_ref());

    if !result.all_ok() {
        state.set_status(format!("Failed to save {} file(s)", result.failures.len()));
    } else if notify && result.saved > 0 {
        state.set_status("All files saved");
    }

    let mut out = UpdateResult::none();

    if result.any_build_script_saved {
        out.message = Some(Message::SyncNeeded);
    }

    if result.any_markup_saved && can_process_resources {
        match state.build.request(BuildTask::UpdateResourceClasses) {
            Ok(ticket) => {
                out.action = Some(UpdateAction::StartBuild {
                    task: ticket.task,
                    epoch: ticket.epoch,
                });
            }
            Err(err) if err.is_affordance_only() => {
                debug!("resource regeneration skipped: {err}");
            }
            Err(err) => {
                warn!(error = %err, "resource regeneration rejected");
            }
        }
    }

    out
}
