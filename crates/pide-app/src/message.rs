//! Messages driving the editor update loop

use std::path::PathBuf;

use pide_core::{Range, SearchMatch};
use pide_project::{BuildTask, SearchRequest};

/// A user-initiated editor action, already resolved from whatever
/// surface produced it (menu entry, tab strip, back gesture).
#[derive(Debug, Clone)]
pub enum EditorAction {
    /// Open a file, or focus its tab if already open
    OpenFile {
        path: PathBuf,
        selection: Option<Range>,
    },
    /// Focus the tab at `index`
    SelectTab { index: usize },
    /// Close the tab at `index`
    CloseTab { index: usize },
    /// Close every tab except the active one
    CloseOthers,
    /// Close every tab
    CloseAll,
    /// Save every open buffer
    SaveAll {
        /// Surface a "saved" status line on success
        notify: bool,
        /// Allow a resource-class regeneration build to follow
        can_process_resources: bool,
    },
    /// Run a build task
    RunBuild(BuildTask),
    /// Stop all build daemons without tearing the project down
    StopAllDaemons,
    /// Fetch daemon status and show it in the status sheet
    ShowDaemonStatus,
    /// Start a project-wide text search
    FindInProject(SearchRequest),
    /// Back gesture: dismiss the topmost overlay, or begin project close
    Back,
    /// Close the project without the confirmation step
    CloseProject,
}

/// Everything the update loop reacts to: user actions plus completions
/// marshaled back from spawned tasks.
#[derive(Debug, Clone)]
pub enum Message {
    Ui(EditorAction),

    /// A build script was saved; project configuration must be re-pushed
    SyncNeeded,

    /// A build task finished; epoch ties it to the request that ran it
    BuildFinished {
        epoch: u64,
        success: bool,
        message: String,
    },

    /// Daemon status text arrived
    DaemonStatus { text: String },

    /// A batch of matches from one file of an in-flight search
    SearchBatch {
        search_id: u64,
        path: PathBuf,
        matches: Vec<SearchMatch>,
    },

    /// The search walked every root
    SearchFinished { search_id: u64 },

    /// The search aborted
    SearchFailed { search_id: u64, message: String },

    /// Language service start/init handshake finished
    ServiceInitialized { ok: bool },

    /// Configuration push to the language service finished
    ConfigPushed { ok: bool },

    /// User confirmed the close-project prompt
    ConfirmCloseProject,

    /// User dismissed the close-project prompt
    CancelCloseProject,

    /// Tear down immediately, skipping confirmation
    ForceClose,
}

impl From<EditorAction> for Message {
    fn from(action: EditorAction) -> Self {
        Message::Ui(action)
    }
}
