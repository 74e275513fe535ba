use ahash::AHashMap;
use serde::Serialize;

use crate::workflow::{Answer, StepId};

/// An immutable snapshot of one workflow session.
///
/// Snapshots are only produced by a [`WorkflowEngine`](super::WorkflowEngine);
/// every operation returns a new one and leaves its input untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowState {
    pub(super) current_step_id: StepId,
    pub(super) answers: AHashMap<String, Answer>,
    pub(super) visited_step_ids: Vec<StepId>,
    pub(super) is_terminal: bool,
}

impl WorkflowState {
    pub(super) fn at(entry: &str, answers: AHashMap<String, Answer>) -> Self {
        Self {
            current_step_id: entry.to_string(),
            answers,
            visited_step_ids: vec![entry.to_string()],
            is_terminal: false,
        }
    }

    pub fn current_step_id(&self) -> &str {
        &self.current_step_id
    }

    pub fn answers(&self) -> &AHashMap<String, Answer> {
        &self.answers
    }

    pub fn answer(&self, field_name: &str) -> Option<&Answer> {
        self.answers.get(field_name)
    }

    /// Steps traversed this session, oldest first. Never empty.
    pub fn visited_step_ids(&self) -> &[StepId] {
        &self.visited_step_ids
    }

    pub fn has_visited(&self, step_id: &str) -> bool {
        self.visited_step_ids.iter().any(|id| id == step_id)
    }

    pub fn is_terminal(&self) -> bool {
        self.is_terminal
    }
}
