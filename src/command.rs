//! Discrete user actions and the single place that applies them.
//!
//! The view turns key presses into [`Command`] values; [`dispatch`] runs them
//! against the store or the exporter and reports back with [`Feedback`] so the
//! footer can say what happened.

use std::path::PathBuf;

use tracing::debug;

use crate::error::ExportError;
use crate::export::Exporter;
use crate::models::{PlayerField, PlayerId, PlayerRecord};
use crate::store::{CommitOutcome, RecordStore};

/// One user action, detached from the key that triggered it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replace one draft field with a new value.
    SetField(PlayerField, String),
    /// Create or update, depending on the draft.
    Submit,
    /// Drop the draft and leave edit mode.
    CancelDraft,
    /// Load the record into the draft. Stale ids are ignored.
    Edit(PlayerId),
    /// Remove the record. Deleting an id that is already gone is a no-op.
    Delete(PlayerId),
    /// Save the record as a PDF. Never touches the store.
    Export(PlayerRecord),
    /// Hand the record to the system print flow. Never touches the store.
    Print(PlayerRecord),
}

/// What a dispatched command did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    /// Nothing worth reporting (typing, rejected create, stale ids).
    Quiet,
    /// A create or update went through.
    Committed(CommitOutcome),
    EditStarted(PlayerId),
    DraftCleared,
    Deleted(PlayerId),
    /// Path of the written PDF.
    Exported(PathBuf),
    /// Path of the print page handed to the system.
    Printed(PathBuf),
}

/// Apply `command`. Export and print errors come back as `Err` and never
/// reach the store.
pub fn dispatch(
    store: &mut RecordStore,
    exporter: &dyn Exporter,
    command: Command,
) -> Result<Feedback, ExportError> {
    debug!(?command, "dispatching");
    let feedback = match command {
        Command::SetField(field, value) => {
            store.set_field(field, value);
            Feedback::Quiet
        }
        Command::Submit => match store.submit() {
            CommitOutcome::Incomplete(_) | CommitOutcome::NotApplicable => Feedback::Quiet,
            outcome => Feedback::Committed(outcome),
        },
        Command::CancelDraft => {
            store.cancel_draft();
            Feedback::DraftCleared
        }
        Command::Edit(id) => {
            if store.begin_edit(id) {
                Feedback::EditStarted(id)
            } else {
                Feedback::Quiet
            }
        }
        Command::Delete(id) => {
            if store.delete_record(id) {
                Feedback::Deleted(id)
            } else {
                Feedback::Quiet
            }
        }
        Command::Export(record) => Feedback::Exported(exporter.download_pdf(&record)?),
        Command::Print(record) => Feedback::Printed(exporter.print(&record)?),
    };
    Ok(feedback)
}
