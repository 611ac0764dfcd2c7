//! Top-level message dispatch

use crate::handler::{build, lifecycle, search, tabs, UpdateResult};
use crate::message::{EditorAction, Message};
use crate::state::ProjectContext;

/// Apply one message to the project state. Pure except for buffer
/// persistence, which goes through the context's [`Persistence`]
/// handle.
///
/// [`Persistence`]: pide_project::Persistence
pub fn update(state: &mut ProjectContext, message: Message) -> UpdateResult {
    match message {
        Message::Ui(action) => dispatch_action(state, action),

        Message::SyncNeeded => lifecycle::sync_needed(state),
        Message::ServiceInitialized { ok } => lifecycle::service_initialized(state, ok),
        Message::ConfigPushed { ok } => lifecycle::config_pushed(state, ok),
        Message::ConfirmCloseProject => lifecycle::begin_teardown(state),
        Message::CancelCloseProject => lifecycle::cancel_close(state),
        Message::ForceClose => lifecycle::begin_teardown(state),

        Message::BuildFinished {
            epoch,
            success,
            message,
        } => build::build_finished(state, epoch, success, message),
        Message::DaemonStatus { text } => build::daemon_status(state, text),

        Message::SearchBatch {
            search_id,
            path,
            matches,
        } => search::search_batch(state, search_id, path, matches),
        Message::SearchFinished { search_id } => search::search_finished(state, search_id),
        Message::SearchFailed { search_id, message } => {
            search::search_failed(state, search_id, message)
        }
    }
}

fn dispatch_action(state: &mut ProjectContext, action: EditorAction) -> UpdateResult {
    match action {
        EditorAction::OpenFile { path, selection } => tabs::open_file(state, path, selection),
        EditorAction::SelectTab { index } => tabs::select_tab(state, index),
        EditorAction::CloseTab { index } => tabs::close_tab(state, index),
        EditorAction::CloseOthers => tabs::close_others(state),
        EditorAction::CloseAll => tabs::close_all(state),
        EditorAction::SaveAll {
            notify,
            can_process_resources,
        } => tabs::save_all(state, notify, can_process_resources),

        EditorAction::RunBuild(task) => build::run_build(state, task),
        EditorAction::StopAllDaemons => build::stop_all_daemons(state),
        EditorAction::ShowDaemonStatus => build::show_daemon_status(state),

        EditorAction::FindInProject(request) => search::find_in_project(state, request),

        EditorAction::Back => lifecycle::back(state),
        EditorAction::CloseProject => lifecycle::begin_teardown(state),
    }
}
