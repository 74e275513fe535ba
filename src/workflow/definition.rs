use ahash::AHashMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::Answer;

pub type StepId = String;

/// The kind of value a step collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldType {
    SingleChoice,
    MultiChoice,
    FreeText,
    Numeric,
    Boolean,
    NestedObject,
}

impl FieldType {
    pub fn is_choice(&self) -> bool {
        matches!(self, FieldType::SingleChoice | FieldType::MultiChoice)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::SingleChoice => "single-choice",
            FieldType::MultiChoice => "multi-choice",
            FieldType::FreeText => "free-text",
            FieldType::Numeric => "numeric",
            FieldType::Boolean => "boolean",
            FieldType::NestedObject => "nested-object",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One selectable option of a choice field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub value: String,
    pub label: String,
    /// Preselected when a session starts (multi-choice only).
    #[serde(default)]
    pub default: bool,
}

impl ChoiceOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            default: false,
        }
    }

    /// Builds an option whose value is a slug of the label, e.g.
    /// `"Salt Lake"` -> `"salt-lake"`.
    pub fn from_label(label: &str) -> Self {
        let mut slug = String::with_capacity(label.len());
        for c in label.chars() {
            if c.is_alphanumeric() {
                slug.extend(c.to_lowercase());
            } else if !slug.is_empty() && !slug.ends_with('-') {
                slug.push('-');
            }
        }
        while slug.ends_with('-') {
            slug.pop();
        }
        Self::new(slug, label)
    }
}

/// Where a branch or fallback leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Step(StepId),
    Terminal,
}

impl Target {
    pub fn step_id(&self) -> Option<&str> {
        match self {
            Target::Step(id) => Some(id),
            Target::Terminal => None,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Step(id) => f.write_str(id),
            Target::Terminal => f.write_str("<terminal>"),
        }
    }
}

/// The rule that picks the step following the current one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Fixed(StepId),
    Branching {
        branches: AHashMap<String, Target>,
        fallback: Target,
    },
    Terminal,
}

impl Transition {
    /// Resolves the next target from the answer recorded for the step.
    /// Unmapped or missing answers take the fallback.
    pub fn resolve(&self, answer: Option<&Answer>) -> Target {
        match self {
            Transition::Fixed(id) => Target::Step(id.clone()),
            Transition::Terminal => Target::Terminal,
            Transition::Branching { branches, fallback } => answer
                .and_then(Answer::branch_key)
                .and_then(|key| branches.get(key.as_ref()))
                .unwrap_or(fallback)
                .clone(),
        }
    }

    /// Every target this transition can produce, fallback included.
    pub fn targets(&self) -> Vec<Target> {
        match self {
            Transition::Fixed(id) => vec![Target::Step(id.clone())],
            Transition::Terminal => vec![Target::Terminal],
            Transition::Branching { branches, fallback } => {
                let mut targets: Vec<Target> = branches.values().cloned().collect();
                targets.push(fallback.clone());
                targets
            }
        }
    }
}

/// A value rule checked before a step may be left.
#[derive(Debug, Clone)]
pub enum FieldConstraint {
    MinLength(usize),
    MaxLength(usize),
    Pattern(Regex),
    Min(f64),
    Max(f64),
    /// The answer must equal the answer recorded for another field.
    Matches(String),
}

impl FieldConstraint {
    pub fn rule(&self) -> String {
        match self {
            FieldConstraint::MinLength(n) => format!("minLength({})", n),
            FieldConstraint::MaxLength(n) => format!("maxLength({})", n),
            FieldConstraint::Pattern(re) => format!("pattern({})", re.as_str()),
            FieldConstraint::Min(n) => format!("min({})", n),
            FieldConstraint::Max(n) => format!("max({})", n),
            FieldConstraint::Matches(other) => format!("matches({})", other),
        }
    }
}

/// A single, validated step of a workflow.
#[derive(Debug, Clone)]
pub struct StepDefinition {
    pub id: StepId,
    pub title: Option<String>,
    pub description: Option<String>,
    pub field_name: String,
    pub field_type: FieldType,
    pub label: Option<String>,
    pub options: Vec<ChoiceOption>,
    pub required: bool,
    pub max_selections: Option<usize>,
    /// Keys that must be filled in a nested-object answer.
    pub required_keys: Vec<String>,
    pub constraints: Vec<FieldConstraint>,
    pub transition: Transition,
}

impl StepDefinition {
    pub fn option(&self, value: &str) -> Option<&ChoiceOption> {
        self.options.iter().find(|o| o.value == value)
    }

    /// Position of an option in declaration order.
    pub fn option_index(&self, value: &str) -> Option<usize> {
        self.options.iter().position(|o| o.value == value)
    }

    /// Values of the options flagged as preselected.
    pub fn default_selection(&self) -> Vec<String> {
        self.options
            .iter()
            .filter(|o| o.default)
            .map(|o| o.value.clone())
            .collect()
    }
}

/// A structurally valid workflow. Only the [`Loader`](crate::loader::Loader) builds these.
#[derive(Debug, Clone)]
pub struct WorkflowDefinition {
    name: String,
    steps: Vec<StepDefinition>,
    entry_step_id: StepId,
    step_index: AHashMap<StepId, usize>,
    field_index: AHashMap<String, usize>,
}

impl WorkflowDefinition {
    /// Callers guarantee unique step ids and field names.
    pub(crate) fn new(name: String, steps: Vec<StepDefinition>, entry_step_id: StepId) -> Self {
        let step_index = steps
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id.clone(), i))
            .collect();
        let field_index = steps
            .iter()
            .enumerate()
            .map(|(i, s)| (s.field_name.clone(), i))
            .collect();
        Self {
            name,
            steps,
            entry_step_id,
            step_index,
            field_index,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entry_step_id(&self) -> &str {
        &self.entry_step_id
    }

    /// Steps in declared order.
    pub fn steps(&self) -> &[StepDefinition] {
        &self.steps
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn step(&self, id: &str) -> Option<&StepDefinition> {
        self.step_index.get(id).map(|&i| &self.steps[i])
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.step_index.get(id).copied()
    }

    pub fn step_for_field(&self, field_name: &str) -> Option<&StepDefinition> {
        self.field_index.get(field_name).map(|&i| &self.steps[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_from_label() {
        assert_eq!(ChoiceOption::from_label("Salt Lake").value, "salt-lake");
        assert_eq!(
            ChoiceOption::from_label("Social Media (Instagram/Facebook)").value,
            "social-media-instagram-facebook"
        );
    }

    #[test]
    fn branching_falls_back_for_unmapped_answers() {
        let transition = Transition::Branching {
            branches: AHashMap::from([("studio".to_string(), Target::Step("q2b".to_string()))]),
            fallback: Target::Step("q3".to_string()),
        };
        assert_eq!(
            transition.resolve(Some(&Answer::text("studio"))),
            Target::Step("q2b".to_string())
        );
        for other in ["agency", "", "STUDIO"] {
            assert_eq!(
                transition.resolve(Some(&Answer::text(other))),
                Target::Step("q3".to_string())
            );
        }
        assert_eq!(transition.resolve(None), Target::Step("q3".to_string()));
    }
}
