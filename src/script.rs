use serde::{Deserialize, Serialize};
use std::fs;

use crate::engine::{Operation, WorkflowEngine, WorkflowState};
use crate::error::ScriptError;

/// A recorded sequence of user interactions, matching the script JSON format:
/// `{ "operations": [ { "op": "answer", "field": "role", "value": "studio" }, { "op": "advance" } ] }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub operations: Vec<Operation>,
}

impl Script {
    pub fn new(operations: Vec<Operation>) -> Self {
        Self { operations }
    }

    pub fn from_json(json: &str) -> Result<Self, ScriptError> {
        serde_json::from_str(json).map_err(|e| ScriptError::Parse(e.to_string()))
    }

    /// Load a script from a JSON file.
    pub fn from_file(path: &str) -> Result<Self, ScriptError> {
        let content = fs::read_to_string(path)
            .map_err(|e| ScriptError::Parse(format!("Could not read '{}': {}", path, e)))?;
        Self::from_json(&content)
    }

    /// Replays every operation from a fresh session.
    ///
    /// Returns every snapshot, the starting one first. Stops at the first failing operation.
    pub fn replay(&self, engine: &WorkflowEngine) -> Result<Vec<WorkflowState>, ScriptError> {
        let mut snapshots = Vec::with_capacity(self.operations.len() + 1);
        let mut state = engine.start();

        for (index, operation) in self.operations.iter().enumerate() {
            let next = engine
                .apply(&state, operation)
                .map_err(|source| ScriptError::OperationFailed {
                    index,
                    operation: operation.to_string(),
                    source,
                })?;
            snapshots.push(std::mem::replace(&mut state, next));
        }

        snapshots.push(state);
        Ok(snapshots)
    }
}
