use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::error::{NavigationError, SubmissionError, ValidationError, WorkflowError};
use crate::submission::{self, SubmissionPayload};
use crate::workflow::{Answer, FieldType, StepDefinition, Target, WorkflowDefinition};

pub(crate) mod rules;
mod state;

pub use state::WorkflowState;

/// One user interaction, as replayed by [`WorkflowEngine::apply`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    Answer { field: String, value: Answer },
    Toggle { field: String, value: String },
    Clear { field: String },
    Advance,
    Retreat,
    JumpTo {
        #[serde(alias = "stepId")]
        step_id: String,
    },
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Answer { field, value } => write!(f, "answer {} = {}", field, value),
            Operation::Toggle { field, value } => write!(f, "toggle {} {}", field, value),
            Operation::Clear { field } => write!(f, "clear {}", field),
            Operation::Advance => write!(f, "advance"),
            Operation::Retreat => write!(f, "retreat"),
            Operation::JumpTo { step_id } => write!(f, "jump_to {}", step_id),
        }
    }
}

/// Drives a session through a loaded [`WorkflowDefinition`].
///
/// The engine holds no session data. Every operation takes a [`WorkflowState`]
/// and returns a new one, so one engine can serve any number of sessions,
/// including from several threads.
#[derive(Debug, Clone)]
pub struct WorkflowEngine {
    definition: Arc<WorkflowDefinition>,
}

impl WorkflowEngine {
    pub fn new(definition: WorkflowDefinition) -> Self {
        Self::from_shared(Arc::new(definition))
    }

    pub fn from_shared(definition: Arc<WorkflowDefinition>) -> Self {
        Self { definition }
    }

    pub fn definition(&self) -> &WorkflowDefinition {
        &self.definition
    }

    /// A fresh session at the entry step.
    ///
    /// Multi-choice fields start with their default options selected.
    pub fn start(&self) -> WorkflowState {
        let answers = self
            .definition
            .steps()
            .iter()
            .filter(|step| step.field_type == FieldType::MultiChoice)
            .filter_map(|step| {
                let defaults = step.default_selection();
                (!defaults.is_empty()).then(|| (step.field_name.clone(), Answer::List(defaults)))
            })
            .collect();

        WorkflowState::at(self.definition.entry_step_id(), answers)
    }

    /// Records (or replaces) the answer for `field_name`.
    ///
    /// On error the input state is left as it was.
    pub fn set_answer(
        &self,
        state: &WorkflowState,
        field_name: &str,
        value: impl Into<Answer>,
    ) -> Result<WorkflowState, ValidationError> {
        let step = self.step_for_field(field_name)?;
        let value = rules::check_answer(step, value.into())?;

        tracing::debug!(field = field_name, value = %value, "answer recorded");

        let mut next = state.clone();
        next.answers.insert(field_name.to_string(), value);
        Ok(next)
    }

    /// Adds `value` to a multi-choice answer, or removes it when already selected.
    pub fn toggle_selection(
        &self,
        state: &WorkflowState,
        field_name: &str,
        value: &str,
    ) -> Result<WorkflowState, ValidationError> {
        let step = self.step_for_field(field_name)?;
        if step.field_type != FieldType::MultiChoice {
            return Err(ValidationError::TypeMismatch {
                field: field_name.to_string(),
                expected: FieldType::MultiChoice.to_string(),
            });
        }
        rules::ensure_option(step, value)?;

        let mut selected = state
            .answer(field_name)
            .and_then(Answer::as_list)
            .map(<[String]>::to_vec)
            .unwrap_or_default();

        if let Some(pos) = selected.iter().position(|v| v == value) {
            selected.remove(pos);
        } else {
            if let Some(limit) = step.max_selections {
                if selected.len() >= limit {
                    return Err(ValidationError::SelectionLimitExceeded {
                        field: field_name.to_string(),
                        limit,
                    });
                }
            }
            selected.push(value.to_string());
        }

        self.set_answer(state, field_name, Answer::List(selected))
    }

    pub fn clear_answer(
        &self,
        state: &WorkflowState,
        field_name: &str,
    ) -> Result<WorkflowState, ValidationError> {
        self.step_for_field(field_name)?;
        tracing::debug!(field = field_name, "answer cleared");

        let mut next = state.clone();
        next.answers.remove(field_name);
        Ok(next)
    }

    /// Validates the current step and moves to the step its transition picks.
    ///
    /// A terminal state is returned unchanged.
    pub fn advance(&self, state: &WorkflowState) -> Result<WorkflowState, ValidationError> {
        if state.is_terminal {
            return Ok(state.clone());
        }

        let step = self.current(state)?;
        if let Some(err) = rules::first_error(step, &state.answers) {
            return Err(err);
        }

        let mut next = state.clone();
        match step.transition.resolve(state.answer(&step.field_name)) {
            Target::Terminal => {
                tracing::debug!(step = step.id.as_str(), "workflow reached its terminal state");
                next.is_terminal = true;
            }
            Target::Step(id) => {
                tracing::debug!(from = step.id.as_str(), to = id.as_str(), "advanced");
                next.visited_step_ids.push(id.clone());
                next.current_step_id = id;
            }
        }
        Ok(next)
    }

    /// Goes back to the previously visited step. At the first visited step this
    /// is a no-op.
    ///
    /// The terminal state is a flag on the last answered step, not a step of its
    /// own. Retreating from it clears the flag and also pops that step, so the
    /// session lands on the step before the last one.
    pub fn retreat(&self, state: &WorkflowState) -> WorkflowState {
        let mut next = state.clone();
        next.is_terminal = false;

        if next.visited_step_ids.len() > 1 {
            next.visited_step_ids.pop();
            if let Some(last) = next.visited_step_ids.last() {
                next.current_step_id = last.clone();
            }
        }

        tracing::debug!(
            from = state.current_step_id.as_str(),
            to = next.current_step_id.as_str(),
            "retreated"
        );
        next
    }

    /// Returns to an already visited step, dropping the history after it.
    pub fn jump_to(
        &self,
        state: &WorkflowState,
        step_id: &str,
    ) -> Result<WorkflowState, NavigationError> {
        if self.definition.step(step_id).is_none() {
            return Err(NavigationError::UnknownStep(step_id.to_string()));
        }
        let pos = state
            .visited_step_ids
            .iter()
            .rposition(|id| id == step_id)
            .ok_or_else(|| NavigationError::UnvisitedStep {
                step_id: step_id.to_string(),
            })?;

        tracing::debug!(
            from = state.current_step_id.as_str(),
            to = step_id,
            "jumped back"
        );

        let mut next = state.clone();
        next.visited_step_ids.truncate(pos + 1);
        next.current_step_id = step_id.to_string();
        next.is_terminal = false;
        Ok(next)
    }

    /// Applies a single [`Operation`].
    pub fn apply(
        &self,
        state: &WorkflowState,
        operation: &Operation,
    ) -> Result<WorkflowState, WorkflowError> {
        let next = match operation {
            Operation::Answer { field, value } => self.set_answer(state, field, value.clone())?,
            Operation::Toggle { field, value } => self.toggle_selection(state, field, value)?,
            Operation::Clear { field } => self.clear_answer(state, field)?,
            Operation::Advance => self.advance(state)?,
            Operation::Retreat => self.retreat(state),
            Operation::JumpTo { step_id } => self.jump_to(state, step_id)?,
        };
        Ok(next)
    }

    /// `(position of the current step in declared order + 1) / step count`.
    ///
    /// Steps on untaken branches still count, so a finished session may end
    /// below 1.0.
    pub fn progress(&self, state: &WorkflowState) -> f64 {
        let total = self.definition.step_count();
        match self.definition.position(&state.current_step_id) {
            Some(index) if total > 0 => (index + 1) as f64 / total as f64,
            _ => 0.0,
        }
    }

    pub fn step_count(&self) -> usize {
        self.definition.step_count()
    }

    pub fn current_step(&self, state: &WorkflowState) -> Option<&StepDefinition> {
        self.definition.step(&state.current_step_id)
    }

    /// Whether each step, in declared order, could be left with the current answers.
    pub fn step_completion<'a>(&'a self, state: &WorkflowState) -> Vec<(&'a str, bool)> {
        self.definition
            .steps()
            .iter()
            .map(|step| {
                let complete = rules::first_error(step, &state.answers).is_none();
                (step.id.as_str(), complete)
            })
            .collect()
    }

    pub fn is_step_complete(&self, state: &WorkflowState, step_id: &str) -> bool {
        self.definition
            .step(step_id)
            .is_some_and(|step| rules::first_error(step, &state.answers).is_none())
    }

    /// See [`submission::assemble`].
    pub fn assemble(&self, state: &WorkflowState) -> Result<SubmissionPayload, SubmissionError> {
        submission::assemble(&self.definition, state)
    }

    fn step_for_field(&self, field_name: &str) -> Result<&StepDefinition, ValidationError> {
        self.definition
            .step_for_field(field_name)
            .ok_or_else(|| ValidationError::UnknownField(field_name.to_string()))
    }

    fn current(&self, state: &WorkflowState) -> Result<&StepDefinition, ValidationError> {
        self.definition
            .step(&state.current_step_id)
            .ok_or_else(|| ValidationError::UnknownStep(state.current_step_id.clone()))
    }
}
