//! Pure update logic: state transitions plus requested side effects

mod build;
mod lifecycle;
mod search;
mod tabs;
mod update;

#[cfg(test)]
mod tests;

pub use update::update;

use pide_project::{BuildTask, SearchRequest};
use tokio::sync::watch;

use crate::message::Message;

/// A side effect the update step wants performed. Effects run in
/// spawned tasks and report back as [`Message`]s.
#[derive(Debug, Clone)]
pub enum UpdateAction {
    /// Run a build task; completions carry `epoch` back
    StartBuild { task: BuildTask, epoch: u64 },
    /// Ask the runner to stop every build daemon
    StopAllDaemons,
    /// Fetch daemon status for the status sheet
    FetchDaemonStatus,
    /// Kick off a project-wide search
    StartSearch {
        ticket_id: u64,
        request: SearchRequest,
        cancel: watch::Receiver<bool>,
    },
    /// Start and initialize the language service
    StartLanguageService,
    /// Push classpath configuration to the language service
    PushConfiguration { class_paths: Vec<String> },
}

/// Result of one update step: an optional follow-up message processed
/// before the next inbound one, and an optional side effect.
#[derive(Debug, Default)]
pub struct UpdateResult {
    pub message: Option<Message>,
    pub action: Option<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn message(message: Message) -> Self {
        Self {
            message: Some(message),
            action: None,
        }
    }

    pub fn action(action: UpdateAction) -> Self {
        Self {
            message: None,
            action: Some(action),
        }
    }
}
