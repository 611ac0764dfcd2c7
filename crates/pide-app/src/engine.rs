//! Engine: owns the state, the message channel, and teardown

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;

use pide_core::prelude::*;
use pide_project::{BuildRunner, DiskPersistence, LanguageService, Persistence, Preferences};

use crate::handler::UpdateAction;
use crate::message::{EditorAction, Message};
use crate::process::process_message;
use crate::state::ProjectContext;

const CHANNEL_CAPACITY: usize = 256;

/// Engine knobs, mostly for tests.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Kick off an automatic debug build right after opening
    pub auto_build: bool,
    /// Where opened-project preferences live; `None` means the platform
    /// config directory
    pub preferences_path: Option<PathBuf>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            auto_build: true,
            preferences_path: None,
        }
    }
}

/// Drives one open project: receives messages, applies the update step,
/// dispatches side effects, and tears everything down when the state
/// says the project is closing.
pub struct Engine<B, L> {
    state: ProjectContext,
    runner: Option<Arc<B>>,
    language: Arc<L>,
    msg_tx: mpsc::Sender<Message>,
    msg_rx: mpsc::Receiver<Message>,
    options: EngineOptions,
}

impl<B, L> Engine<B, L>
where
    B: BuildRunner + Sync + 'static,
    L: LanguageService + Sync + 'static,
{
    pub fn new(
        project_path: impl Into<PathBuf>,
        runner: Option<B>,
        language: L,
        class_paths: Vec<String>,
        options: EngineOptions,
    ) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let mut state = ProjectContext::new(project_path, Arc::new(DiskPersistence));
        state.class_paths = class_paths;
        if runner.is_some() {
            state.build.attach_runner();
        }
        Self {
            state,
            runner: runner.map(Arc::new),
            language: Arc::new(language),
            msg_tx,
            msg_rx,
            options,
        }
    }

    /// Sender for feeding user actions and task completions in
    pub fn handle(&self) -> mpsc::Sender<Message> {
        self.msg_tx.clone()
    }

    pub fn state(&self) -> &ProjectContext {
        &self.state
    }

    fn process(&mut self, message: Message) {
        let project_path = self.state.project_path.clone();
        process_message(
            &mut self.state,
            message,
            &self.msg_tx,
            self.runner.as_ref(),
            &self.language,
            &project_path,
        );
    }

    fn startup(&mut self) {
        info!(project = %self.state.project_path.display(), "opening project");

        if let Err(err) = self.save_opened_project() {
            warn!(error = %err, "failed to remember opened project");
        }

        if self.state.language.ensure_started() {
            crate::actions::handle_action(
                UpdateAction::StartLanguageService,
                self.msg_tx.clone(),
                self.runner.clone(),
                self.language.clone(),
                self.state.project_path.clone(),
            );
        }

        // goes through the update step so build gating applies
        if self.options.auto_build {
            self.process(Message::Ui(EditorAction::RunBuild(
                pide_project::BuildTask::AssembleDebug { auto: true },
            )));
        }
    }

    /// Receive and process messages until the project closes.
    pub async fn run(mut self) -> Result<()> {
        self.startup();

        while let Some(message) = self.msg_rx.recv().await {
            self.process(message);
            if self.state.should_close() {
                break;
            }
        }

        self.teardown().await
    }

    async fn teardown(mut self) -> Result<()> {
        info!("tearing down project");

        // handler already did these for a message-driven close; they are
        // repeated for the channel-dropped path
        self.state.build.exit();
        self.state.search.cancel_current();
        let mut pending = std::mem::take(&mut self.state.pending_saves);
        pending.extend(self.state.registry.drain_modified());

        if !pending.is_empty() {
            let persistence = self.state.persistence.clone();
            let failures =
                tokio::task::spawn_blocking(move || persist_pending(persistence.as_ref(), &pending))
                    .await
                    .unwrap_or_default();
            // the loop is gone, so failures are reported directly
            for path in &failures {
                eprintln!("Failed to save {} while closing", path.display());
            }
        }

        if let Some(runner) = &self.runner {
            if let Err(err) = runner.stop_all_daemons().await {
                warn!(error = %err, "failed to stop build daemons during close");
            }
            if let Err(err) = runner.exit().await {
                warn!(error = %err, "build runner exit failed");
            }
        }

        if let Err(err) = self.language.shutdown_all().await {
            warn!(error = %err, "language service shutdown failed");
        }

        if let Err(err) = self.clear_opened_project() {
            warn!(error = %err, "failed to clear opened project");
        }

        info!("project closed");
        Ok(())
    }

    fn preferences_path(&self) -> PathBuf {
        self.options
            .preferences_path
            .clone()
            .unwrap_or_else(Preferences::default_path)
    }

    fn save_opened_project(&self) -> Result<()> {
        let path = self.preferences_path();
        let mut prefs = Preferences::load_from(&path).unwrap_or_default();
        prefs.set_opened_project(&self.state.project_path);
        prefs
            .save_to(&path)
            .with_context(|| format!("Remembering opened project {}", path.display()))
    }

    fn clear_opened_project(&self) -> Result<()> {
        let path = self.preferences_path();
        let mut prefs = Preferences::load_from(&path).unwrap_or_default();
        prefs.clear_opened_project();
        prefs.save_to(&path)
    }
}

/// Best-effort persistence of buffers drained at close. Failures never
/// abort the batch; the paths that could not be written are returned so
/// the caller can surface them.
fn persist_pending(persistence: &dyn Persistence, pending: &[(PathBuf, String)]) -> Vec<PathBuf> {
    let mut failures = Vec::new();
    for (path, text) in pending {
        if let Err(err) = persistence.save(path, text) {
            warn!(path = %path.display(), error = %err, "failed to persist buffer during close");
            failures.push(path.clone());
        }
    }
    failures
}
