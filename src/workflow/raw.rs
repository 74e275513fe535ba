use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fs;

use super::ChoiceOption;
use crate::error::DefinitionError;

/// Declarative workflow as written in JSON, before structural validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawWorkflow {
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "entryStepId")]
    pub entry_step_id: Option<String>,
    pub steps: Vec<RawStep>,
}

/// One step entry of the JSON schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawStep {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub field: RawField,
    #[serde(alias = "nextStep")]
    pub next_step: RawNextStep,
}

/// `nextStep` is either a step id (or the terminal sentinel) or a map from
/// answer value to step id with a `"default"` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawNextStep {
    Fixed(String),
    Branching(AHashMap<String, String>),
}

/// Field descriptor of a step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub options: Option<Vec<ChoiceOption>>,
    #[serde(default, alias = "optionsFrom")]
    pub options_from: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, alias = "maxSelections")]
    pub max_selections: Option<usize>,
    #[serde(default, alias = "requiredKeys")]
    pub required_keys: Vec<String>,
    #[serde(default, skip_serializing_if = "RawConstraints::is_empty")]
    pub constraints: RawConstraints,
}

/// Optional value rules of a field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawConstraints {
    #[serde(default, alias = "minLength")]
    pub min_length: Option<usize>,
    #[serde(default, alias = "maxLength")]
    pub max_length: Option<usize>,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub matches: Option<String>,
}

impl RawConstraints {
    pub fn is_empty(&self) -> bool {
        self.min_length.is_none()
            && self.max_length.is_none()
            && self.pattern.is_none()
            && self.min.is_none()
            && self.max.is_none()
            && self.matches.is_none()
    }
}

impl RawWorkflow {
    pub fn from_json(json: &str) -> Result<Self, DefinitionError> {
        serde_json::from_str(json).map_err(|e| DefinitionError::JsonParse(e.to_string()))
    }

    /// Reads a definition file. Fetching is the caller's concern; this is a convenience for tools.
    pub fn from_file(path: &str) -> Result<Self, DefinitionError> {
        let content = fs::read_to_string(path).map_err(|e| {
            DefinitionError::JsonParse(format!("Could not read '{}': {}", path, e))
        })?;
        Self::from_json(&content)
    }
}
