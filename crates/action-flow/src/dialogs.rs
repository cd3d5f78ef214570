//! Accepting portal dialogs and recording what they said.

use crate::types::{FailureKind, RunContext};
use action_gate::{classify, DialogKind, DialogVerdict};
use action_primitives::{ActionError, PageDriver};
use tracing::{info, warn};

/// Accept the open dialog, then classify `text` for `kind`.
///
/// Dialogs are accepted whatever they say. An unrecognized text becomes a
/// `DialogMismatch` warning on the run context.
pub async fn accept_and_classify(
    page: &dyn PageDriver,
    ctx: &mut RunContext,
    step: &str,
    kind: DialogKind,
    text: &str,
    order_id: Option<&str>,
) -> Result<DialogVerdict, ActionError> {
    page.accept_dialog().await?;

    let verdict =
        classify(kind, text, order_id).map_err(|err| ActionError::Internal(err.to_string()))?;
    if verdict.recognized {
        info!(
            step,
            dialog = %kind,
            token = verdict.token().unwrap_or(""),
            "accepted expected dialog"
        );
    } else {
        warn!(
            step,
            dialog = %kind,
            text,
            phrase_found = verdict.phrase_found,
            "accepted dialog with unexpected text"
        );
        ctx.warn(
            step,
            FailureKind::DialogMismatch,
            format!("unexpected {} dialog text: {}", kind, text.trim()),
        );
    }

    if kind == DialogKind::CommitSuccess {
        if let Some(token) = verdict.token() {
            ctx.commit_receipt = Some(token.to_string());
        }
    }
    ctx.dialogs.push(verdict.clone());
    Ok(verdict)
}
