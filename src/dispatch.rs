//! Mapping a selection to the single action it asks for.

use crate::menu::{Menu, RowKind, Sentinel};
use crate::selector::{SelectionOutcome, SelectionSignal};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Cancelled, unrecognized, or not applicable to the chosen row.
    Nothing,
    /// Pick a cached issue and create a running tracker for it.
    AddNew,
    RefreshIssues,
    Submit,
    /// Pause whichever tracker is running.
    Pause,
    Start(String),
    Delete(String),
    EditDescription { key: String, current: String },
    Open(String),
}

/// Decide what a selection means. Pure: no I/O happens here.
pub fn dispatch(outcome: &SelectionOutcome, menu: &Menu) -> Action {
    use SelectionSignal as S;

    let Some(row) = outcome.index.and_then(|i| menu.row(i)) else {
        return Action::Nothing;
    };

    match (outcome.signal, &row.kind) {
        (S::Cancel | S::Unrecognized(_), _) => Action::Nothing,

        (S::DefaultAccept, RowKind::Sentinel(Sentinel::AddNew)) => Action::AddNew,
        (S::DefaultAccept, RowKind::Sentinel(Sentinel::RefreshIssues)) => Action::RefreshIssues,
        (S::DefaultAccept, RowKind::Sentinel(Sentinel::SubmitTrackers)) => Action::Submit,
        (S::Delete | S::EditDescription | S::Open, RowKind::Sentinel(_)) => Action::Nothing,

        (S::DefaultAccept, RowKind::Tracker { running: true, .. }) => Action::Pause,
        (S::DefaultAccept, RowKind::Tracker { key, .. }) => Action::Start(key.clone()),
        (S::Delete, RowKind::Tracker { key, .. }) => Action::Delete(key.clone()),
        (S::EditDescription, RowKind::Tracker { key, description, .. }) => {
            Action::EditDescription {
                key: key.clone(),
                current: description.clone().unwrap_or_default(),
            }
        }
        (S::Open, RowKind::Tracker { key, .. }) => Action::Open(key.clone()),
    }
}
