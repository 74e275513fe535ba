use itertools::Itertools;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::engine::{WorkflowState, rules};
use crate::error::SubmissionError;
use crate::workflow::{Answer, Target, WorkflowDefinition};

/// The validated answers of a finished session, ready to hand to whatever
/// creates the account or booking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionPayload {
    workflow: String,
    values: BTreeMap<String, Answer>,
}

impl SubmissionPayload {
    pub fn workflow(&self) -> &str {
        &self.workflow
    }

    pub fn get(&self, field_name: &str) -> Option<&Answer> {
        self.values.get(field_name)
    }

    pub fn values(&self) -> &BTreeMap<String, Answer> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.values)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.values)
    }
}

/// Re-validates the visited path of a terminal state and builds the payload.
///
/// Steps on untaken branches are ignored. All missing and invalid fields are
/// collected before failing. The recorded path must still be the one the
/// current answers resolve to, step by step, ending in the terminal state.
pub fn assemble(
    definition: &WorkflowDefinition,
    state: &WorkflowState,
) -> Result<SubmissionPayload, SubmissionError> {
    if !state.is_terminal() {
        return Err(SubmissionError::WorkflowIncomplete);
    }

    let path = state
        .visited_step_ids()
        .iter()
        .unique()
        .filter_map(|id| definition.step(id))
        .collect::<Vec<_>>();

    let mut missing_fields = Vec::new();
    let mut invalid_fields = Vec::new();
    for step in &path {
        missing_fields.extend(rules::missing_fields(step, state.answers()));
        if !rules::violated_rules(step, state.answers()).is_empty() {
            invalid_fields.push(step.field_name.clone());
        }
    }

    if !missing_fields.is_empty() || !invalid_fields.is_empty() {
        tracing::debug!(
            workflow = definition.name(),
            missing = missing_fields.len(),
            invalid = invalid_fields.len(),
            "submission rejected"
        );
        return Err(SubmissionError::ValidationFailed {
            missing_fields,
            invalid_fields,
        });
    }

    if let Some(step_id) = first_divergence(definition, state) {
        tracing::debug!(
            workflow = definition.name(),
            step = step_id.as_str(),
            "submission rejected, path no longer matches answers"
        );
        return Err(SubmissionError::StalePath { step_id });
    }

    let values = path
        .iter()
        .filter_map(|step| {
            state
                .answer(&step.field_name)
                .map(|answer| (step.field_name.clone(), rules::normalize(step, answer)))
        })
        .collect();

    Ok(SubmissionPayload {
        workflow: definition.name().to_string(),
        values,
    })
}

/// The first visited step whose transition, resolved against the current
/// answers, does not lead to the next recorded step (or to terminal for the last).
fn first_divergence(definition: &WorkflowDefinition, state: &WorkflowState) -> Option<String> {
    let visited = state.visited_step_ids();
    visited.iter().enumerate().find_map(|(i, id)| {
        let expected = match visited.get(i + 1) {
            Some(next) => Target::Step(next.clone()),
            None => Target::Terminal,
        };
        let leads_on = definition.step(id).is_some_and(|step| {
            step.transition.resolve(state.answer(&step.field_name)) == expected
        });
        (!leads_on).then(|| id.clone())
    })
}
