//! Per-project editor state owned by the update loop

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use pide_core::{FileKind, SearchMatch};
use pide_project::Persistence;

use crate::build::BuildCoordinator;
use crate::language_sync::LanguageSyncCoordinator;
use crate::registry::SessionRegistry;
use crate::search::SearchCoordinator;

// ─────────────────────────────────────────────────────────────────────
// Overlays
// ─────────────────────────────────────────────────────────────────────

/// Dismissable UI surfaces layered over the editor, in precedence order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverlayState {
    pub end_drawer_open: bool,
    pub start_drawer_open: bool,
    pub status_sheet_open: bool,
    pub options_sheet_open: bool,
    pub bottom_panel_expanded: bool,
}

impl OverlayState {
    /// Dismiss the topmost open overlay. Returns `false` when nothing
    /// was open, meaning the back gesture falls through to close flow.
    pub fn dismiss_topmost(&mut self) -> bool {
        if self.end_drawer_open {
            self.end_drawer_open = false;
        } else if self.start_drawer_open {
            self.start_drawer_open = false;
        } else if self.status_sheet_open {
            self.status_sheet_open = false;
        } else if self.options_sheet_open {
            self.options_sheet_open = false;
        } else if self.bottom_panel_expanded {
            self.bottom_panel_expanded = false;
        } else {
            return false;
        }
        true
    }

    pub fn any_open(&self) -> bool {
        self.end_drawer_open
            || self.start_drawer_open
            || self.status_sheet_open
            || self.options_sheet_open
            || self.bottom_panel_expanded
    }
}

// ─────────────────────────────────────────────────────────────────────
// Project lifecycle
// ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectPhase {
    /// Normal editing
    Open,
    /// Close-project prompt is showing
    ConfirmingClose,
    /// Teardown decided; the loop exits after the current message
    Closing,
}

// ─────────────────────────────────────────────────────────────────────
// Action enablement
// ─────────────────────────────────────────────────────────────────────

/// Which editor actions are currently usable, recomputed from state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionEnablement {
    pub undo: bool,
    pub redo: bool,
    pub save: bool,
    pub find_file: bool,
    pub goto_definition: bool,
    pub find_references: bool,
    pub layout_preview: bool,
    pub build_controls: bool,
}

// ─────────────────────────────────────────────────────────────────────
// Project context
// ─────────────────────────────────────────────────────────────────────

/// Everything one open project carries. A second project means a second
/// context; nothing here is global.
pub struct ProjectContext {
    pub project_path: PathBuf,
    pub registry: SessionRegistry,
    pub build: BuildCoordinator,
    pub search: SearchCoordinator,
    pub language: LanguageSyncCoordinator,
    /// Classpath entries pushed to the language service as configuration
    pub class_paths: Vec<String>,
    pub overlays: OverlayState,
    pub phase: ProjectPhase,
    /// Transient status line shown to the user
    pub status: String,
    /// Content of the daemon status sheet
    pub status_sheet_text: String,
    /// Accumulated matches of the in-flight (or last finished) search
    pub search_results: BTreeMap<PathBuf, Vec<SearchMatch>>,
    /// Modified buffers drained at teardown, persisted in the background
    pub pending_saves: Vec<(PathBuf, String)>,
    pub persistence: Arc<dyn Persistence>,
}

impl fmt::Debug for ProjectContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProjectContext")
            .field("project_path", &self.project_path)
            .field("registry", &self.registry)
            .field("build", &self.build)
            .field("search", &self.search)
            .field("language", &self.language)
            .field("phase", &self.phase)
            .field("overlays", &self.overlays)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

impl ProjectContext {
    pub fn new(project_path: impl Into<PathBuf>, persistence: Arc<dyn Persistence>) -> Self {
        Self {
            project_path: project_path.into(),
            registry: SessionRegistry::new(),
            build: BuildCoordinator::new(),
            search: SearchCoordinator::new(),
            language: LanguageSyncCoordinator::new(),
            class_paths: Vec::new(),
            overlays: OverlayState::default(),
            phase: ProjectPhase::Open,
            status: String::new(),
            status_sheet_text: String::new(),
            search_results: BTreeMap::new(),
            pending_saves: Vec::new(),
            persistence,
        }
    }

    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = text.into();
    }

    /// Recompute per-action enablement from the active session and the
    /// build phase.
    pub fn enablement(&self) -> ActionEnablement {
        let active = self.registry.active_session();
        let has_file = active.is_some();
        let kind = active.map(|s| s.kind);
        ActionEnablement {
            undo: has_file,
            redo: has_file,
            save: has_file,
            find_file: has_file,
            goto_definition: kind == Some(FileKind::Source),
            find_references: kind == Some(FileKind::Source),
            layout_preview: kind == Some(FileKind::Markup),
            build_controls: self.build.controls_enabled(),
        }
    }

    pub fn request_close(&mut self) {
        if self.phase == ProjectPhase::Open {
            self.phase = ProjectPhase::ConfirmingClose;
        }
    }

    pub fn cancel_close(&mut self) {
        if self.phase == ProjectPhase::ConfirmingClose {
            self.phase = ProjectPhase::Open;
        }
    }

    pub fn should_close(&self) -> bool {
        self.phase == ProjectPhase::Closing
    }
}
