use std::cell::RefCell;
use std::collections::VecDeque;

use super::{MenuRequest, PromptRequest, SelectionOutcome, Selector, SelectorError};

/// Replays canned answers and records what it was asked to show.
#[derive(Default)]
pub struct ScriptedSelector {
    outcomes: RefCell<VecDeque<SelectionOutcome>>,
    replies: RefCell<VecDeque<Option<String>>>,
    pub menus: RefCell<Vec<MenuRequest>>,
    pub prompts: RefCell<Vec<PromptRequest>>,
}

impl ScriptedSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then_select(self, outcome: SelectionOutcome) -> Self {
        self.outcomes.borrow_mut().push_back(outcome);
        self
    }

    pub fn then_reply(self, reply: Option<&str>) -> Self {
        self.replies.borrow_mut().push_back(reply.map(str::to_string));
        self
    }
}

impl Selector for ScriptedSelector {
    fn select(&self, request: &MenuRequest) -> Result<SelectionOutcome, SelectorError> {
        self.menus.borrow_mut().push(request.clone());
        Ok(self
            .outcomes
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(SelectionOutcome::cancelled))
    }

    fn prompt(&self, request: &PromptRequest) -> Result<Option<String>, SelectorError> {
        self.prompts.borrow_mut().push(request.clone());
        Ok(self.replies.borrow_mut().pop_front().flatten())
    }
}
