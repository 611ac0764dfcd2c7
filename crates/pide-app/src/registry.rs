//! Ordered set of open file sessions plus the active tab

use std::path::{Path, PathBuf};

use pide_core::prelude::*;
use pide_core::Range;
use pide_project::Persistence;

use crate::session::FileSession;

/// Aggregate outcome of a save-all sweep.
#[derive(Debug, Clone, Default)]
pub struct SaveResult {
    /// Number of buffers that were actually written
    pub saved: usize,
    /// At least one build script was written
    pub any_build_script_saved: bool,
    /// At least one markup file was written
    pub any_markup_saved: bool,
    /// Paths whose write failed; the sweep continues past them
    pub failures: Vec<PathBuf>,
}

impl SaveResult {
    pub fn all_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

/// What happened when a tab lost focus.
#[derive(Debug, Clone, Default)]
pub struct DeselectOutcome {
    /// A modified build script was saved; configuration must be re-pushed
    pub sync_needed: bool,
    /// The deselect-save failed for this path
    pub failed: Option<PathBuf>,
}

/// Open sessions in tab order. At most one session per path, and the
/// active index is `Some` exactly when the registry is non-empty.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: Vec<FileSession>,
    active: Option<usize>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active_session(&self) -> Option<&FileSession> {
        self.active.and_then(|i| self.sessions.get(i))
    }

    pub fn active_session_mut(&mut self) -> Option<&mut FileSession> {
        match self.active {
            Some(i) => self.sessions.get_mut(i),
            None => None,
        }
    }

    pub fn get(&self, index: usize) -> Option<&FileSession> {
        self.sessions.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut FileSession> {
        self.sessions.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FileSession> {
        self.sessions.iter()
    }

    /// Index of the session for `path`, if one is open
    pub fn index_of(&self, path: &Path) -> Option<usize> {
        self.sessions.iter().position(|s| s.path == path)
    }

    /// Open `path`, or select its existing session.
    ///
    /// When the file is already open and active this is a pure selection
    /// update with no deselect side effect. Otherwise the previously
    /// active tab goes through the deselect-save path first.
    pub fn open(
        &mut self,
        path: impl Into<PathBuf>,
        selection: Range,
        text: String,
        persist: &dyn Persistence,
    ) -> (usize, DeselectOutcome) {
        let path = path.into();

        if let Some(index) = self.index_of(&path) {
            let mut outcome = DeselectOutcome::default();
            if self.active != Some(index) {
                outcome = self.deselect_active(persist);
                self.active = Some(index);
            }
            if let Some(session) = self.sessions.get_mut(index) {
                session.set_selection(selection);
            }
            return (index, outcome);
        }

        let outcome = self.deselect_active(persist);
        self.sessions.push(FileSession::open(path, selection, text));
        let index = self.sessions.len() - 1;
        self.active = Some(index);
        (index, outcome)
    }

    /// Make `index` the active tab, deselect-saving the current one.
    pub fn select(
        &mut self,
        index: usize,
        persist: &dyn Persistence,
    ) -> Result<DeselectOutcome> {
        if index >= self.sessions.len() {
            return Err(Error::out_of_range(index, self.sessions.len()));
        }
        if self.active == Some(index) {
            return Ok(DeselectOutcome::default());
        }
        let outcome = self.deselect_active(persist);
        self.active = Some(index);
        Ok(outcome)
    }

    /// Save the active session as it loses focus.
    ///
    /// A configuration re-sync is needed only when a *modified* build
    /// script was actually written; the flag is computed before the save
    /// so a clean build script never triggers it.
    fn deselect_active(&mut self, persist: &dyn Persistence) -> DeselectOutcome {
        let Some(session) = self.active_session_mut() else {
            return DeselectOutcome::default();
        };
        let was_modified_build_script = session.modified && session.is_build_script();
        match session.save(persist) {
            Ok(_) => DeselectOutcome {
                sync_needed: was_modified_build_script,
                failed: None,
            },
            Err(err) => {
                let path = session.path.clone();
                warn!(path = %path.display(), error = %err, "save on deselect failed");
                DeselectOutcome {
                    sync_needed: false,
                    failed: Some(path),
                }
            }
        }
    }

    /// Close the tab at `index` after saving it. Close never signals a
    /// configuration re-sync.
    pub fn close_at(&mut self, index: usize, persist: &dyn Persistence) -> Result<()> {
        if index >= self.sessions.len() {
            return Err(Error::out_of_range(index, self.sessions.len()));
        }
        if let Some(session) = self.sessions.get_mut(index) {
            if let Err(err) = session.save(persist) {
                warn!(path = %session.path.display(), error = %err, "save on close failed");
            }
        }
        self.sessions.remove(index);

        self.active = if self.sessions.is_empty() {
            None
        } else {
            match self.active {
                // keep pointing at the tab that slid into this slot,
                // or the new last tab when the closed one was last
                Some(a) if a == index => Some(index.min(self.sessions.len() - 1)),
                Some(a) if a > index => Some(a - 1),
                other => other,
            }
        };
        Ok(())
    }

    /// Close every tab except `keep`, which becomes (or stays) active.
    /// Calling this when only one tab remains is a no-op.
    pub fn close_others(&mut self, keep: usize, persist: &dyn Persistence) -> Result<()> {
        if keep >= self.sessions.len() {
            return Err(Error::out_of_range(keep, self.sessions.len()));
        }
        let mut index = 0;
        let mut kept = keep;
        while self.sessions.len() > 1 {
            if index == kept {
                index += 1;
                continue;
            }
            if let Some(session) = self.sessions.get_mut(index) {
                if let Err(err) = session.save(persist) {
                    warn!(path = %session.path.display(), error = %err, "save on close failed");
                }
            }
            self.sessions.remove(index);
            if index < kept {
                kept -= 1;
            }
        }
        self.active = Some(kept);
        Ok(())
    }

    /// Close every tab, saving each.
    pub fn close_all(&mut self, persist: &dyn Persistence) {
        for session in &mut self.sessions {
            if let Err(err) = session.save(persist) {
                warn!(path = %session.path.display(), error = %err, "save on close failed");
            }
        }
        self.sessions.clear();
        self.active = None;
    }

    /// Save every open buffer, continuing past individual failures.
    pub fn save_all(&mut self, persist: &dyn Persistence) -> SaveResult {
        let mut result = SaveResult::default();
        for session in &mut self.sessions {
            match session.save(persist) {
                Ok(true) => {
                    result.saved += 1;
                    if session.is_build_script() {
                        result.any_build_script_saved = true;
                    }
                    if session.is_markup() {
                        result.any_markup_saved = true;
                    }
                }
                Ok(false) => {}
                Err(err) => {
                    warn!(path = %session.path.display(), error = %err, "save failed");
                    result.failures.push(session.path.clone());
                }
            }
        }
        result
    }

    /// Take all sessions with unsaved edits out of the registry for
    /// teardown; the registry is left empty.
    pub fn drain_modified(&mut self) -> Vec<(PathBuf, String)> {
        let pending = self
            .sessions
            .drain(..)
            .filter(|s| s.modified)
            .map(|s| (s.path, s.text))
            .collect();
        self.active = None;
        pending
    }
}
