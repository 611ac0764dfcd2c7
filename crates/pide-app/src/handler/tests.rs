use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use pide_core::prelude::*;
use pide_core::Range;
use pide_project::{BuildTask, Persistence, SearchRequest};
use tempfile::TempDir;

use crate::build::BuildPhase;
use crate::handler::{update, UpdateAction};
use crate::message::{EditorAction, Message};
use crate::state::{ProjectContext, ProjectPhase};

/// Records every write; never touches the disk.
#[derive(Default)]
struct RecordingPersist {
    written: Mutex<Vec<PathBuf>>,
}

impl Persistence for RecordingPersist {
    fn save(&self, path: &Path, _text: &str) -> Result<()> {
        self.written.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }
}

fn context() -> (ProjectContext, Arc<RecordingPersist>) {
    let persist = Arc::new(RecordingPersist::default());
    let ctx = ProjectContext::new("/p", persist.clone());
    (ctx, persist)
}

fn open_session(ctx: &mut ProjectContext, path: &str) {
    let persist = ctx.persistence.clone();
    ctx.registry
        .open(path, Range::zero(), String::new(), persist.as_ref());
}

// ─────────────────────────────────────────────────────────────────────
// Tabs and saves
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_open_file_reads_from_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("Main.java");
    std::fs::write(&path, "class Main {}").unwrap();
    let (mut ctx, _) = context();

    let result = update(
        &mut ctx,
        Message::Ui(EditorAction::OpenFile {
            path: path.clone(),
            selection: None,
        }),
    );

    assert!(result.message.is_none());
    assert!(result.action.is_none());
    assert_eq!(ctx.registry.len(), 1);
    assert_eq!(ctx.registry.active_session().unwrap().text, "class Main {}");
}

#[test]
fn test_open_missing_file_reports_status() {
    let (mut ctx, _) = context();

    let result = update(
        &mut ctx,
        Message::Ui(EditorAction::OpenFile {
            path: PathBuf::from("/nope/Main.java"),
            selection: None,
        }),
    );

    assert!(result.message.is_none());
    assert!(ctx.registry.is_empty());
    assert!(ctx.status.contains("Failed to open"));
}

#[test]
fn test_deselect_modified_build_script_emits_sync() {
    let (mut ctx, _) = context();
    open_session(&mut ctx, "/p/build.gradle");
    open_session(&mut ctx, "/p/Main.java");
    ctx.registry.select(0, ctx.persistence.clone().as_ref()).unwrap();
    ctx.registry
        .active_session_mut()
        .unwrap()
        .replace_text("plugins {}");

    let result = update(&mut ctx, Message::Ui(EditorAction::SelectTab { index: 1 }));

    assert!(matches!(result.message, Some(Message::SyncNeeded)));
}

#[test]
fn test_deselect_clean_tab_emits_nothing() {
    let (mut ctx, _) = context();
    open_session(&mut ctx, "/p/build.gradle");
    open_session(&mut ctx, "/p/Main.java");
    ctx.registry.select(0, ctx.persistence.clone().as_ref()).unwrap();

    let result = update(&mut ctx, Message::Ui(EditorAction::SelectTab { index: 1 }));

    assert!(result.message.is_none());
    assert!(result.action.is_none());
}

#[test]
fn test_close_modified_build_script_saves_without_sync() {
    let (mut ctx, persist) = context();
    open_session(&mut ctx, "/p/build.gradle");
    ctx.registry
        .active_session_mut()
        .unwrap()
        .replace_text("plugins {}");

    let result = update(&mut ctx, Message::Ui(EditorAction::CloseTab { index: 0 }));

    assert!(result.message.is_none());
    assert!(result.action.is_none());
    assert_eq!(persist.written.lock().unwrap().len(), 1);
    assert!(ctx.registry.is_empty());
}

#[test]
fn test_save_all_build_script_emits_sync() {
    let (mut ctx, persist) = context();
    open_session(&mut ctx, "/p/build.gradle");
    ctx.registry
        .active_session_mut()
        .unwrap()
        .replace_text("plugins {}");

    let result = update(
        &mut ctx,
        Message::Ui(EditorAction::SaveAll {
            notify: true,
            can_process_resources: false,
        }),
    );

    assert!(matches!(result.message, Some(Message::SyncNeeded)));
    assert!(result.action.is_none());
    assert_eq!(persist.written.lock().unwrap().len(), 1);
    assert_eq!(ctx.status, "All files saved");
}

#[test]
fn test_save_all_markup_triggers_resource_build_when_idle() {
    let (mut ctx, _) = context();
    ctx.build.attach_runner();
    open_session(&mut ctx, "/p/main.xml");
    ctx.registry
        .active_session_mut()
        .unwrap()
        .replace_text("<LinearLayout/>");

    let result = update(
        &mut ctx,
        Message::Ui(EditorAction::SaveAll {
            notify: false,
            can_process_resources: true,
        }),
    );

    match result.action {
        Some(UpdateAction::StartBuild { task, .. }) => {
            assert!(matches!(task, BuildTask::UpdateResourceClasses));
        }
        other => panic!("expected StartBuild, got {other:?}"),
    }
    assert!(ctx.build.is_building());
}

#[test]
fn test_save_all_markup_skips_resource_build_while_building() {
    let (mut ctx, _) = context();
    ctx.build.attach_runner();
    ctx.build.request(BuildTask::Build).unwrap();
    open_session(&mut ctx, "/p/main.xml");
    ctx.registry
        .active_session_mut()
        .unwrap()
        .replace_text("<LinearLayout/>");

    let result = update(
        &mut ctx,
        Message::Ui(EditorAction::SaveAll {
            notify: false,
            can_process_resources: true,
        }),
    );

    assert!(result.action.is_none());
}

#[test]
fn test_save_all_markup_respects_caller_opt_out() {
    let (mut ctx, _) = context();
    ctx.build.attach_runner();
    open_session(&mut ctx, "/p/main.xml");
    ctx.registry
        .active_session_mut()
        .unwrap()
        .replace_text("<LinearLayout/>");

    let result = update(
        &mut ctx,
        Message::Ui(EditorAction::SaveAll {
            notify: false,
            can_process_resources: false,
        }),
    );

    assert!(result.action.is_none());
    assert!(!ctx.build.is_building());
}

// ─────────────────────────────────────────────────────────────────────
// Builds
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_run_build_without_runner_is_status_only() {
    let (mut ctx, _) = context();

    let result = update(&mut ctx, Message::Ui(EditorAction::RunBuild(BuildTask::Build)));

    assert!(result.action.is_none());
    assert!(!ctx.status.is_empty());
}

#[test]
fn test_run_build_while_building_is_refused() {
    let (mut ctx, _) = context();
    ctx.build.attach_runner();
    update(&mut ctx, Message::Ui(EditorAction::RunBuild(BuildTask::Build)));

    let result = update(
        &mut ctx,
        Message::Ui(EditorAction::RunBuild(BuildTask::Clean)),
    );

    assert!(result.action.is_none());
    assert!(ctx.build.is_building());
}

#[test]
fn test_build_finished_returns_controls() {
    let (mut ctx, _) = context();
    ctx.build.attach_runner();
    let result = update(&mut ctx, Message::Ui(EditorAction::RunBuild(BuildTask::Build)));
    let epoch = match result.action {
        Some(UpdateAction::StartBuild { epoch, .. }) => epoch,
        other => panic!("expected StartBuild, got {other:?}"),
    };

    update(
        &mut ctx,
        Message::BuildFinished {
            epoch,
            success: true,
            message: String::new(),
        },
    );

    assert!(!ctx.build.is_building());
    assert!(ctx.enablement().build_controls);
}

#[test]
fn test_stale_build_completion_ignored() {
    let (mut ctx, _) = context();
    ctx.build.attach_runner();
    update(&mut ctx, Message::Ui(EditorAction::RunBuild(BuildTask::Build)));

    update(
        &mut ctx,
        Message::BuildFinished {
            epoch: 99,
            success: true,
            message: String::new(),
        },
    );

    assert!(ctx.build.is_building());
}

#[test]
fn test_daemon_status_sheet_flow() {
    let (mut ctx, _) = context();
    ctx.build.attach_runner();

    let result = update(&mut ctx, Message::Ui(EditorAction::ShowDaemonStatus));

    assert!(ctx.overlays.status_sheet_open);
    assert!(matches!(result.action, Some(UpdateAction::FetchDaemonStatus)));

    update(
        &mut ctx,
        Message::DaemonStatus {
            text: "1 busy daemon".to_string(),
        },
    );
    assert_eq!(ctx.status_sheet_text, "1 busy daemon");
}

// ─────────────────────────────────────────────────────────────────────
// Search
// ─────────────────────────────────────────────────────────────────────

fn request(query: &str) -> SearchRequest {
    SearchRequest::new(query, vec![PathBuf::from("/p")])
}

fn matches_for(line: u32) -> Vec<pide_core::SearchMatch> {
    use pide_core::{Position, SearchMatch};
    vec![SearchMatch {
        path: PathBuf::from("/p/Main.java"),
        range: Range::new(Position::new(line, 0), Position::new(line, 3)),
        line_text: "foo".to_string(),
    }]
}

#[test]
fn test_search_supersedes_previous_run() {
    let (mut ctx, _) = context();

    let first = update(&mut ctx, Message::Ui(EditorAction::FindInProject(request("foo"))));
    let first_id = match first.action {
        Some(UpdateAction::StartSearch { ticket_id, .. }) => ticket_id,
        other => panic!("expected StartSearch, got {other:?}"),
    };
    let _second = update(&mut ctx, Message::Ui(EditorAction::FindInProject(request("bar"))));

    // batches from the superseded run are dropped
    update(
        &mut ctx,
        Message::SearchBatch {
            search_id: first_id,
            path: PathBuf::from("/p/Main.java"),
            matches: matches_for(1),
        },
    );

    assert!(ctx.search_results.is_empty());
}

#[test]
fn test_search_accumulates_current_batches() {
    let (mut ctx, _) = context();
    let result = update(&mut ctx, Message::Ui(EditorAction::FindInProject(request("foo"))));
    let id = match result.action {
        Some(UpdateAction::StartSearch { ticket_id, .. }) => ticket_id,
        other => panic!("expected StartSearch, got {other:?}"),
    };

    update(
        &mut ctx,
        Message::SearchBatch {
            search_id: id,
            path: PathBuf::from("/p/Main.java"),
            matches: matches_for(1),
        },
    );
    update(&mut ctx, Message::SearchFinished { search_id: id });

    assert_eq!(ctx.search_results.len(), 1);
    assert!(!ctx.search.in_flight());
    assert!(ctx.overlays.bottom_panel_expanded);
    assert_eq!(ctx.status, "Found 1 match(es)");
}

#[test]
fn test_blank_search_rejected_with_status() {
    let (mut ctx, _) = context();

    let result = update(&mut ctx, Message::Ui(EditorAction::FindInProject(request("  "))));

    assert!(result.action.is_none());
    assert!(!ctx.search.in_flight());
    assert!(!ctx.status.is_empty());
}

// ─────────────────────────────────────────────────────────────────────
// Language service
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_sync_before_service_started_is_dropped() {
    let (mut ctx, _) = context();

    let result = update(&mut ctx, Message::SyncNeeded);

    assert!(result.action.is_none());
}

#[test]
fn test_service_initialized_pushes_configuration() {
    let (mut ctx, _) = context();
    ctx.class_paths = vec!["/sdk/android.jar".to_string()];

    let result = update(&mut ctx, Message::ServiceInitialized { ok: true });

    assert!(ctx.language.service_started());
    match result.action {
        Some(UpdateAction::PushConfiguration { class_paths }) => {
            assert_eq!(class_paths, vec!["/sdk/android.jar".to_string()]);
        }
        other => panic!("expected PushConfiguration, got {other:?}"),
    }
}

#[test]
fn test_sync_after_service_started_pushes_configuration() {
    let (mut ctx, _) = context();
    update(&mut ctx, Message::ServiceInitialized { ok: true });

    let result = update(&mut ctx, Message::SyncNeeded);

    assert!(matches!(
        result.action,
        Some(UpdateAction::PushConfiguration { .. })
    ));
}

#[test]
fn test_failed_service_start_recorded() {
    let (mut ctx, _) = context();

    update(&mut ctx, Message::ServiceInitialized { ok: false });

    assert!(!ctx.language.service_started());
    assert!(ctx.status.contains("failed"));
}

// ─────────────────────────────────────────────────────────────────────
// Back and teardown
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_back_dismisses_overlay_before_close() {
    let (mut ctx, _) = context();
    ctx.overlays.bottom_panel_expanded = true;

    update(&mut ctx, Message::Ui(EditorAction::Back));
    assert!(!ctx.overlays.bottom_panel_expanded);
    assert_eq!(ctx.phase, ProjectPhase::Open);

    update(&mut ctx, Message::Ui(EditorAction::Back));
    assert_eq!(ctx.phase, ProjectPhase::ConfirmingClose);
}

#[test]
fn test_cancel_close_returns_to_open() {
    let (mut ctx, _) = context();
    update(&mut ctx, Message::Ui(EditorAction::Back));
    update(&mut ctx, Message::CancelCloseProject);
    assert_eq!(ctx.phase, ProjectPhase::Open);
}

#[test]
fn test_confirm_close_tears_down() {
    let (mut ctx, _) = context();
    ctx.build.attach_runner();
    let result = update(&mut ctx, Message::Ui(EditorAction::RunBuild(BuildTask::Build)));
    let epoch = match result.action {
        Some(UpdateAction::StartBuild { epoch, .. }) => epoch,
        other => panic!("expected StartBuild, got {other:?}"),
    };
    open_session(&mut ctx, "/p/Main.java");
    ctx.registry.active_session_mut().unwrap().replace_text("x");

    update(&mut ctx, Message::ConfirmCloseProject);

    assert!(ctx.should_close());
    assert_eq!(ctx.build.phase(), BuildPhase::NoRunner);
    assert_eq!(ctx.pending_saves.len(), 1);
    assert!(ctx.registry.is_empty());

    // the in-flight build's completion is stale now
    update(
        &mut ctx,
        Message::BuildFinished {
            epoch,
            success: true,
            message: String::new(),
        },
    );
    assert_eq!(ctx.build.phase(), BuildPhase::NoRunner);
}

#[test]
fn test_close_project_skips_confirmation() {
    let (mut ctx, _) = context();
    update(&mut ctx, Message::Ui(EditorAction::CloseProject));
    assert!(ctx.should_close());
}

#[test]
fn test_teardown_cancels_search() {
    let (mut ctx, _) = context();
    update(&mut ctx, Message::Ui(EditorAction::FindInProject(request("foo"))));
    assert!(ctx.search.in_flight());

    update(&mut ctx, Message::ForceClose);

    assert!(!ctx.search.in_flight());
}
