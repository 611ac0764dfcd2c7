//! One turn of the update loop: message, follow-ups, side effects

use std::path::Path;
use std::sync::Arc;

use tokio::sync::mpsc;

use pide_project::{BuildRunner, LanguageService};

use crate::actions::handle_action;
use crate::handler::update;
use crate::message::Message;
use crate::state::ProjectContext;

/// Follow-up messages are applied before the next inbound one; a bound
/// catches accidental message cycles.
const MAX_FOLLOW_UPS: usize = 16;

pub fn process_message<B, L>(
    state: &mut ProjectContext,
    message: Message,
    msg_tx: &mpsc::Sender<Message>,
    runner: Option<&Arc<B>>,
    language: &Arc<L>,
    project_path: &Path,
) where
    B: BuildRunner + Sync + 'static,
    L: LanguageService + Sync + 'static,
{
    let mut next = Some(message);
    let mut depth = 0;

    while let Some(message) = next.take() {
        let result = update(state, message);

        if let Some(action) = result.action {
            handle_action(
                action,
                msg_tx.clone(),
                runner.cloned(),
                language.clone(),
                project_path.to_path_buf(),
            );
        }

        next = result.message;
        depth += 1;
        if depth >= MAX_FOLLOW_UPS {
            tracing::warn!(depth, "follow-up chain cut short");
            break;
        }
    }
}
