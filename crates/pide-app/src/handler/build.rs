//! Build requests and completions

use pide_core::prelude::*;
use pide_project::BuildTask;

use crate::build::BuildPhase;
use crate::handler::{UpdateAction, UpdateResult};
use crate::state::ProjectContext;

pub fn run_build(state: &mut ProjectContext, task: BuildTask) -> UpdateResult {
    match state.build.request(task) {
        Ok(ticket) => {
            state.set_status(format!("Running {}", ticket.task.label()));
            UpdateResult::action(UpdateAction::StartBuild {
                task: ticket.task,
                epoch: ticket.epoch,
            })
        }
        Err(err) if err.is_affordance_only() => {
            state.set_status(err.to_string());
            UpdateResult::none()
        }
        Err(err) => {
            warn!(error = %err, "build request rejected");
            UpdateResult::none()
        }
    }
}

pub fn build_finished(
    state: &mut ProjectContext,
    epoch: u64,
    success: bool,
    message: String,
) -> UpdateResult {
    if !state.build.finish(epoch) {
        return UpdateResult::none();
    }
    if success {
        info!(epoch, "build finished");
        state.set_status(if message.is_empty() {
            "Build successful".to_string()
        } else {
            message
        });
    } else {
        warn!(epoch, %message, "build failed");
        state.set_status(if message.is_empty() {
            "Build failed".to_string()
        } else {
            format!("Build failed: {message}")
        });
    }
    UpdateResult::none()
}

pub fn stop_all_daemons(state: &mut ProjectContext) -> UpdateResult {
    if state.build.phase() == BuildPhase::NoRunner {
        state.set_status("No build runner available for this project");
        return UpdateResult::none();
    }
    state.set_status("Stopping build daemons");
    UpdateResult::action(UpdateAction::StopAllDaemons)
}

pub fn show_daemon_status(state: &mut ProjectContext) -> UpdateResult {
    state.overlays.status_sheet_open = true;
    if state.build.phase() == BuildPhase::NoRunner {
        state.status_sheet_text = "No build runner available for this project".to_string();
        return UpdateResult::none();
    }
    state.status_sheet_text = "Fetching daemon status".to_string();
    UpdateResult::action(UpdateAction::FetchDaemonStatus)
}

pub fn daemon_status(state: &mut ProjectContext, text: String) -> UpdateResult {
    state.status_sheet_text = text;
    UpdateResult::none()
}
