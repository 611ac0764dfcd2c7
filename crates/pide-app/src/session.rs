//! One open file plus its in-memory edit state

use std::path::PathBuf;

use pide_core::prelude::*;
use pide_core::{FileKind, Range};
use pide_project::Persistence;

/// An open editor tab: the file, its buffer, and its edit state.
///
/// Owned exclusively by the [`SessionRegistry`](crate::SessionRegistry);
/// at most one session exists per path.
#[derive(Debug, Clone)]
pub struct FileSession {
    /// Absolute path of the open file
    pub path: PathBuf,

    /// Kind derived from the extension; fixed for the session's lifetime
    pub kind: FileKind,

    /// Whether the buffer has unsaved edits
    pub modified: bool,

    /// Current cursor/selection
    pub selection: Range,

    /// Full buffer content
    pub text: String,
}

impl FileSession {
    /// Create a session for a freshly opened file
    pub fn open(path: impl Into<PathBuf>, selection: Range, text: String) -> Self {
        let path = path.into();
        let kind = FileKind::of(&path);
        Self {
            path,
            kind,
            modified: false,
            selection,
            text,
        }
    }

    /// Replace the buffer content (edit callback)
    pub fn replace_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.modified = true;
    }

    /// Update the cursor/selection (selection-change callback)
    pub fn set_selection(&mut self, selection: Range) {
        self.selection = selection;
    }

    pub fn is_build_script(&self) -> bool {
        self.kind == FileKind::BuildScript
    }

    pub fn is_markup(&self) -> bool {
        self.kind == FileKind::Markup
    }

    pub fn is_source(&self) -> bool {
        self.kind == FileKind::Source
    }

    /// Persist the buffer if it has unsaved edits.
    ///
    /// Returns `Ok(true)` when a write happened, `Ok(false)` when the
    /// buffer was already clean. The modified flag is only cleared on a
    /// successful write.
    pub fn save(&mut self, persist: &dyn Persistence) -> Result<bool> {
        if !self.modified {
            return Ok(false);
        }
        persist.save(&self.path, &self.text)?;
        self.modified = false;
        Ok(true)
    }

    /// Tab title: file name portion of the path
    pub fn title(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}
