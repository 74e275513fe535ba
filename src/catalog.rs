use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::error::DefinitionError;
use crate::workflow::ChoiceOption;

/// Read-only reference data (categories, localities, add-ons) that steps can
/// draw their options from with `optionsFrom`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    lists: AHashMap<String, Vec<ChoiceOption>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_list(mut self, name: &str, options: Vec<ChoiceOption>) -> Self {
        self.insert(name, options);
        self
    }

    /// Adds a list built from plain labels; values are slugs of the labels.
    pub fn with_labels(self, name: &str, labels: &[&str]) -> Self {
        let options = labels.iter().map(|l| ChoiceOption::from_label(l)).collect();
        self.with_list(name, options)
    }

    pub fn insert(&mut self, name: &str, options: Vec<ChoiceOption>) {
        self.lists.insert(name.to_string(), options);
    }

    pub fn get(&self, name: &str) -> Option<&[ChoiceOption]> {
        self.lists.get(name).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// Parses `{ "<list>": [ { "value", "label" }, ... ], ... }`.
    pub fn from_json(json: &str) -> Result<Self, DefinitionError> {
        serde_json::from_str(json).map_err(|e| DefinitionError::JsonParse(e.to_string()))
    }

    /// Merges another catalog into this one; lists from `other` win on name clashes.
    pub fn merge(mut self, other: Catalog) -> Self {
        self.lists.extend(other.lists);
        self
    }
}
