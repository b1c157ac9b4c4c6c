//! Launcher-agnostic selection contract.
//!
//! A [`Selector`] shows a list of rows and reports which row was chosen and *how*:
//! plain accept, cancel, or one of the bound secondary actions. Dispatch only ever sees
//! [`SelectionOutcome`], so the launcher behind it can be swapped freely.

mod rofi;
#[cfg(test)]
pub mod testing;

pub use rofi::RofiSelector;

use crate::config::Bindings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionSignal {
    DefaultAccept,
    Cancel,
    Delete,
    EditDescription,
    Open,
    /// The launcher reported something we never bound, carried as its raw status.
    Unrecognized(i32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionOutcome {
    /// Index into the presented rows, when a row was highlighted.
    pub index: Option<usize>,
    /// Text of the chosen row; empty on cancel.
    pub text: String,
    pub signal: SelectionSignal,
}

impl SelectionOutcome {
    pub fn cancelled() -> Self {
        Self {
            index: None,
            text: String::new(),
            signal: SelectionSignal::Cancel,
        }
    }
}

/// A secondary action and the key combination that fires it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomAction {
    pub signal: SelectionSignal,
    pub key: String,
}

/// The secondary actions of the tracker menu, in binding order.
pub fn tracker_actions(bindings: &Bindings) -> Vec<CustomAction> {
    vec![
        CustomAction {
            signal: SelectionSignal::Delete,
            key: bindings.delete.clone(),
        },
        CustomAction {
            signal: SelectionSignal::EditDescription,
            key: bindings.edit_description.clone(),
        },
        CustomAction {
            signal: SelectionSignal::Open,
            key: bindings.open.clone(),
        },
    ]
}

/// A restricted pick list: filtering is case-insensitive and only presented rows can be
/// chosen.
#[derive(Debug, Clone, Default)]
pub struct MenuRequest {
    pub title: String,
    pub lines: Vec<String>,
    pub selected: Option<usize>,
    pub actions: Vec<CustomAction>,
}

/// A free-text prompt pre-filled with `initial`.
#[derive(Debug, Clone)]
pub struct PromptRequest {
    pub title: String,
    pub initial: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SelectorError {
    #[error("failed to launch `{program}`: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed talking to `{program}`: {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{0}` was terminated by a signal")]
    Terminated(String),
}

pub trait Selector {
    fn select(&self, request: &MenuRequest) -> Result<SelectionOutcome, SelectorError>;

    /// Returns the confirmed text, or `None` when the prompt was dismissed.
    fn prompt(&self, request: &PromptRequest) -> Result<Option<String>, SelectorError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracker_actions_follow_bindings() {
        let bindings = Bindings {
            delete: "Control+Delete".to_string(),
            ..Bindings::default()
        };
        let actions = tracker_actions(&bindings);
        let signals: Vec<SelectionSignal> = actions.iter().map(|a| a.signal).collect();
        assert_eq!(
            signals,
            vec![
                SelectionSignal::Delete,
                SelectionSignal::EditDescription,
                SelectionSignal::Open
            ]
        );
        assert_eq!(actions[0].key, "Control+Delete");
        assert_eq!(actions[2].key, "Alt+o");
    }
}
