//! Language-service sync, back handling, and project teardown

use pide_core::prelude::*;

use crate::handler::{UpdateAction, UpdateResult};
use crate::state::{ProjectContext, ProjectPhase};

/// A build script was written. Re-push configuration if the language
/// service is up; a service that never started has nothing to sync.
pub fn sync_needed(state: &mut ProjectContext) -> UpdateResult {
    if !state.language.service_started() {
        debug!("configuration sync skipped, language service not started");
        return UpdateResult::none();
    }
    state.set_status("Build files changed, syncing project");
    UpdateResult::action(UpdateAction::PushConfiguration {
        class_paths: state.class_paths.clone(),
    })
}

pub fn service_initialized(state: &mut ProjectContext, ok: bool) -> UpdateResult {
    if !ok {
        state.language.mark_start_failed();
        warn!("language service failed to start");
        state.set_status("Language service failed to start");
        return UpdateResult::none();
    }
    state.language.mark_initialized();
    info!("language service initialized");
    // initial configuration push
    UpdateResult::action(UpdateAction::PushConfiguration {
        class_paths: state.class_paths.clone(),
    })
}

pub fn config_pushed(state: &mut ProjectContext, ok: bool) -> UpdateResult {
    if ok {
        debug!("configuration pushed");
    } else {
        warn!("configuration push failed");
        state.set_status("Failed to sync project configuration");
    }
    UpdateResult::none()
}

/// Back gesture: dismiss the topmost overlay first; with nothing open,
/// ask for close confirmation.
pub fn back(state: &mut ProjectContext) -> UpdateResult {
    if state.overlays.dismiss_topmost() {
        return UpdateResult::none();
    }
    state.request_close();
    UpdateResult::none()
}

pub fn cancel_close(state: &mut ProjectContext) -> UpdateResult {
    state.cancel_close();
    UpdateResult::none()
}

/// Commit to closing the project. Synchronous bookkeeping happens here;
/// the engine performs the async half of teardown once it observes the
/// `Closing` phase.
pub fn begin_teardown(state: &mut ProjectContext) -> UpdateResult {
    if state.phase == ProjectPhase::Closing {
        return UpdateResult::none();
    }
    info!(project = %state.project_path.display(), "closing project");
    state.phase = ProjectPhase::Closing;
    state.build.exit();
    state.search.cancel_current();
    state.pending_saves = state.registry.drain_modified();
    state.set_status("Closing project");
    UpdateResult::none()
}
