//! Side-effect execution for [`UpdateAction`]s
//!
//! Every action runs in a spawned task; outcomes come back as
//! [`Message`]s on the engine channel. Failures never propagate out of
//! the tasks, they are converted to messages (or logged) here at the
//! boundary.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;

use pide_core::prelude::*;
use pide_project::{
    configuration_payload, search_recursive, BuildRunner, LanguageService, SearchEvent,
};

use crate::handler::UpdateAction;
use crate::message::Message;

pub fn handle_action<B, L>(
    action: UpdateAction,
    msg_tx: mpsc::Sender<Message>,
    runner: Option<Arc<B>>,
    language: Arc<L>,
    project_path: PathBuf,
) where
    B: BuildRunner + Sync + 'static,
    L: LanguageService + Sync + 'static,
{
    match action {
        UpdateAction::StartBuild { task, epoch } => {
            let Some(runner) = runner else {
                // coordinator should never admit a build without a runner
                warn!(epoch, "build requested with no runner attached");
                return;
            };
            tokio::spawn(async move {
                let msg = match runner.run(task).await {
                    Ok(outcome) => Message::BuildFinished {
                        epoch,
                        success: outcome.success,
                        message: outcome.message.unwrap_or_default(),
                    },
                    Err(err) => Message::BuildFinished {
                        epoch,
                        success: false,
                        message: err.to_string(),
                    },
                };
                let _ = msg_tx.send(msg).await;
            });
        }

        UpdateAction::StopAllDaemons => {
            let Some(runner) = runner else { return };
            tokio::spawn(async move {
                if let Err(err) = runner.stop_all_daemons().await {
                    warn!(error = %err, "failed to stop build daemons");
                }
            });
        }

        UpdateAction::FetchDaemonStatus => {
            let Some(runner) = runner else { return };
            tokio::spawn(async move {
                let text = match runner.daemon_status().await {
                    Ok(text) => text,
                    Err(err) => format!("Failed to fetch daemon status: {err}"),
                };
                let _ = msg_tx.send(Message::DaemonStatus { text }).await;
            });
        }

        UpdateAction::StartSearch {
            ticket_id,
            request,
            cancel,
        } => {
            tokio::spawn(async move {
                let (event_tx, mut event_rx) = mpsc::channel::<SearchEvent>(64);
                tokio::spawn(search_recursive(request, cancel, event_tx));

                while let Some(event) = event_rx.recv().await {
                    let msg = match event {
                        SearchEvent::Batch { path, matches } => Message::SearchBatch {
                            search_id: ticket_id,
                            path,
                            matches,
                        },
                        SearchEvent::Failed { message } => Message::SearchFailed {
                            search_id: ticket_id,
                            message,
                        },
                        SearchEvent::Done => Message::SearchFinished {
                            search_id: ticket_id,
                        },
                    };
                    if msg_tx.send(msg).await.is_err() {
                        break;
                    }
                }
            });
        }

        UpdateAction::StartLanguageService => {
            tokio::spawn(async move {
                let outcome = start_language_service(language.as_ref(), &project_path).await;
                let ok = match outcome {
                    Ok(ok) => ok,
                    Err(err) => {
                        warn!(error = %err, "language service startup failed");
                        false
                    }
                };
                let _ = msg_tx.send(Message::ServiceInitialized { ok }).await;
            });
        }

        UpdateAction::PushConfiguration { class_paths } => {
            tokio::spawn(async move {
                let payload = configuration_payload(&class_paths);
                let ok = match language.push_config(&payload).await {
                    Ok(()) => true,
                    Err(err) => {
                        warn!(error = %err, "configuration push failed");
                        false
                    }
                };
                let _ = msg_tx.send(Message::ConfigPushed { ok }).await;
            });
        }
    }
}

/// Start, initialize, and acknowledge the language service. `Ok(false)`
/// means init produced no result and the service must not be treated as
/// started.
async fn start_language_service<L>(language: &L, project_path: &std::path::Path) -> Result<bool>
where
    L: LanguageService + Sync,
{
    language.start().await?;
    match language.init(project_path).await? {
        Some(init) => {
            if let Some(info) = init.server_info {
                info!(%info, "language service identified");
            }
            language.initialized().await?;
            Ok(true)
        }
        None => {
            warn!("language service init produced no result");
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pide_project::{BuildOutcome, BuildTask, InitResult, SearchRequest};
    use std::path::Path;
    use std::sync::Mutex;
    use tokio::sync::watch;

    struct FakeRunner {
        fail: bool,
    }

    impl BuildRunner for FakeRunner {
        async fn run(&self, _task: BuildTask) -> Result<BuildOutcome> {
            if self.fail {
                Err(Error::build_runner("boom"))
            } else {
                Ok(BuildOutcome::success())
            }
        }

        async fn stop_all_daemons(&self) -> Result<()> {
            Ok(())
        }

        async fn daemon_status(&self) -> Result<String> {
            Ok("2 idle daemons".to_string())
        }

        async fn exit(&self) -> Result<()> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeService {
        with_result: bool,
        pushed: Mutex<Option<serde_json::Value>>,
    }

    impl LanguageService for FakeService {
        async fn start(&self) -> Result<()> {
            Ok(())
        }

        async fn init(&self, _project_path: &Path) -> Result<Option<InitResult>> {
            Ok(self.with_result.then(InitResult::default))
        }

        async fn initialized(&self) -> Result<()> {
            Ok(())
        }

        async fn push_config(&self, config: &serde_json::Value) -> Result<()> {
            *self.pushed.lock().unwrap() = Some(config.clone());
            Ok(())
        }

        async fn shutdown_all(&self) -> Result<()> {
            Ok(())
        }
    }

    fn dispatch(
        action: UpdateAction,
        runner: Option<Arc<FakeRunner>>,
        language: Arc<FakeService>,
    ) -> mpsc::Receiver<Message> {
        let (tx, rx) = mpsc::channel(16);
        handle_action(action, tx, runner, language, PathBuf::from("/p"));
        rx
    }

    #[tokio::test]
    async fn test_build_success_reports_finished() {
        let mut rx = dispatch(
            UpdateAction::StartBuild {
                task: BuildTask::Build,
                epoch: 7,
            },
            Some(Arc::new(FakeRunner { fail: false })),
            Arc::new(FakeService::default()),
        );

        match rx.recv().await.unwrap() {
            Message::BuildFinished { epoch, success, .. } => {
                assert_eq!(epoch, 7);
                assert!(success);
            }
            other => panic!("unexpected message {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_runner_error_becomes_failed_build() {
        let mut rx = dispatch(
            UpdateAction::StartBuild {
                task: BuildTask::Build,
                epoch: 1,
            },
            Some(Arc::new(FakeRunner { fail: true })),
            Arc::new(FakeService::default()),
        );

        match rx.recv().await.unwrap() {
            Message::BuildFinished {
                success, message, ..
            } => {
                assert!(!success);
                assert!(message.contains("boom"));
            }
            other => panic!("unexpected message {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_daemon_status_reported() {
        let mut rx = dispatch(
            UpdateAction::FetchDaemonStatus,
            Some(Arc::new(FakeRunner { fail: false })),
            Arc::new(FakeService::default()),
        );

        match rx.recv().await.unwrap() {
            Message::DaemonStatus { text } => assert_eq!(text, "2 idle daemons"),
            other => panic!("unexpected message {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_service_with_init_result_reports_ok() {
        let mut rx = dispatch(
            UpdateAction::StartLanguageService,
            None,
            Arc::new(FakeService {
                with_result: true,
                ..Default::default()
            }),
        );

        assert!(matches!(
            rx.recv().await.unwrap(),
            Message::ServiceInitialized { ok: true }
        ));
    }

    #[tokio::test]
    async fn test_service_without_init_result_reports_not_ok() {
        let mut rx = dispatch(
            UpdateAction::StartLanguageService,
            None,
            Arc::new(FakeService::default()),
        );

        assert!(matches!(
            rx.recv().await.unwrap(),
            Message::ServiceInitialized { ok: false }
        ));
    }

    #[tokio::test]
    async fn test_push_configuration_reaches_service() {
        let service = Arc::new(FakeService {
            with_result: true,
            ..Default::default()
        });
        let mut rx = dispatch(
            UpdateAction::PushConfiguration {
                class_paths: vec!["/sdk/android.jar".to_string()],
            },
            None,
            service.clone(),
        );

        assert!(matches!(
            rx.recv().await.unwrap(),
            Message::ConfigPushed { ok: true }
        ));
        let pushed = service.pushed.lock().unwrap().clone().unwrap();
        assert_eq!(pushed["java"]["classPath"][0], "/sdk/android.jar");
    }

    #[tokio::test]
    async fn test_search_events_forwarded_with_ticket_id() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("A.java"), "foo bar\nfoo\n").unwrap();
        let (_cancel_tx, cancel_rx) = watch::channel(false);

        let mut rx = dispatch(
            UpdateAction::StartSearch {
                ticket_id: 3,
                request: SearchRequest::new("foo", vec![dir.path().to_path_buf()]),
                cancel: cancel_rx,
            },
            None,
            Arc::new(FakeService::default()),
        );

        let mut saw_batch = false;
        loop {
            match rx.recv().await.unwrap() {
                Message::SearchBatch {
                    search_id, matches, ..
                } => {
                    assert_eq!(search_id, 3);
                    assert_eq!(matches.len(), 2);
                    saw_batch = true;
                }
                Message::SearchFinished { search_id } => {
                    assert_eq!(search_id, 3);
                    break;
                }
                other => panic!("unexpected message {other:?}"),
            }
        }
        assert!(saw_batch);
    }
}
