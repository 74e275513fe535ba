use ahash::{AHashMap, AHashSet};
use itertools::Itertools;

use crate::catalog::Catalog;
use crate::error::DefinitionError;
use crate::workflow::{
    FieldConstraint, FieldType, RawNextStep, RawStep, RawWorkflow, StepDefinition, Target,
    Transition, WorkflowDefinition,
};

mod graph;
pub mod parsing;

use graph::StepGraph;
use parsing::*;

/// Terminal sentinels recognised by default.
pub const DEFAULT_TERMINAL_SENTINELS: [&str; 2] = ["complete", "terminal"];

/// Key of a branching `nextStep` map that holds the fallback step.
pub const FALLBACK_KEY: &str = "default";

/// Validates a [`RawWorkflow`] into a [`WorkflowDefinition`].
///
/// Loading is pure: the definition must already be in memory. Any structural
/// problem is reported as [`DefinitionError::MalformedDefinition`].
pub struct Loader {
    raw: RawWorkflow,
    catalog: Catalog,
    registry: AHashMap<String, FieldType>,
    terminal_sentinels: Vec<String>,
}

pub struct LoaderBuilder {
    raw: RawWorkflow,
    catalog: Catalog,
    registry: AHashMap<String, FieldType>,
    terminal_sentinels: Vec<String>,
}

impl LoaderBuilder {
    pub fn new(raw: RawWorkflow) -> Self {
        let mut registry: AHashMap<String, FieldType> = AHashMap::new();
        register_default_field_types(&mut registry);
        Self {
            raw,
            catalog: Catalog::default(),
            registry,
            terminal_sentinels: DEFAULT_TERMINAL_SENTINELS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Accepts `user_type_name` as an alias of a known field type name.
    pub fn with_field_type_alias(mut self, user_type_name: &str, stepflow_type_name: &str) -> Self {
        if let Some(field_type) = field_type_by_name(stepflow_type_name) {
            self.registry.insert(user_type_name.to_string(), field_type);
        }
        self
    }

    /// Adds another `nextStep` value that means "finish the workflow".
    pub fn with_terminal_sentinel(mut self, sentinel: &str) -> Self {
        if !self.terminal_sentinels.iter().any(|s| s == sentinel) {
            self.terminal_sentinels.push(sentinel.to_string());
        }
        self
    }

    pub fn build(self) -> Loader {
        Loader {
            raw: self.raw,
            catalog: self.catalog,
            registry: self.registry,
            terminal_sentinels: self.terminal_sentinels,
        }
    }
}

impl Loader {
    pub fn builder(raw: RawWorkflow) -> LoaderBuilder {
        LoaderBuilder::new(raw)
    }

    /// Parses JSON and prepares a loader with default settings.
    pub fn from_json(json: &str) -> Result<Self, DefinitionError> {
        Ok(Self::builder(RawWorkflow::from_json(json)?).build())
    }

    pub fn load(self) -> Result<WorkflowDefinition, DefinitionError> {
        if self.raw.steps.is_empty() {
            return Err(DefinitionError::malformed("workflow declares no steps"));
        }

        self.check_identifiers()?;

        let steps = self
            .raw
            .steps
            .iter()
            .map(|raw_step| self.build_step(raw_step))
            .collect::<Result<Vec<_>, _>>()?;

        let entry = match &self.raw.entry_step_id {
            Some(id) => id.clone(),
            None => steps[0].id.clone(),
        };
        if !steps.iter().any(|s| s.id == entry) {
            return Err(DefinitionError::malformed(format!(
                "entry step '{}' does not exist",
                entry
            )));
        }

        Self::check_matches_targets(&steps)?;

        let graph = StepGraph::new(&steps);
        graph.check_targets()?;

        let unreachable = graph.unreachable_from(&entry);
        if !unreachable.is_empty() {
            return Err(DefinitionError::malformed(format!(
                "steps unreachable from '{}': {}",
                entry,
                unreachable.join(", ")
            )));
        }
        if !graph.reaches_terminal(&entry) {
            return Err(DefinitionError::malformed(
                "no reachable step transitions to the terminal state",
            ));
        }

        tracing::debug!(
            workflow = self.raw.name.as_str(),
            steps = steps.len(),
            entry = entry.as_str(),
            "workflow definition loaded"
        );

        Ok(WorkflowDefinition::new(self.raw.name.clone(), steps, entry))
    }

    fn check_identifiers(&self) -> Result<(), DefinitionError> {
        let steps = &self.raw.steps;

        if let Some(step) = steps.iter().find(|s| s.id.trim().is_empty()) {
            return Err(DefinitionError::malformed(format!(
                "a step collecting '{}' has an empty id",
                step.field.name
            )));
        }
        if let Some(dup) = steps.iter().map(|s| s.id.as_str()).duplicates().next() {
            return Err(DefinitionError::malformed(format!(
                "step id '{}' is declared more than once",
                dup
            )));
        }
        if let Some(step) = steps.iter().find(|s| self.is_terminal_sentinel(&s.id)) {
            return Err(DefinitionError::malformed(format!(
                "step id '{}' collides with the terminal sentinel",
                step.id
            )));
        }
        if let Some(step) = steps.iter().find(|s| s.field.name.trim().is_empty()) {
            return Err(DefinitionError::malformed(format!(
                "step '{}' has an empty field name",
                step.id
            )));
        }
        if let Some(dup) = steps.iter().map(|s| s.field.name.as_str()).duplicates().next() {
            return Err(DefinitionError::malformed(format!(
                "field '{}' is collected by more than one step",
                dup
            )));
        }
        Ok(())
    }

    fn build_step(&self, raw: &RawStep) -> Result<StepDefinition, DefinitionError> {
        let field = &raw.field;
        let field_type = *self.registry.get(&field.field_type).ok_or_else(|| {
            DefinitionError::malformed(format!(
                "step '{}' has unknown field type '{}'",
                raw.id, field.field_type
            ))
        })?;

        let options = resolve_options(&raw.id, field, field_type, &self.catalog)?;
        check_field_shape(&raw.id, field, field_type, options.len())?;
        let constraints = parse_constraints(&raw.id, &field.constraints, field_type)?;
        let transition = self.build_transition(&raw.id, &raw.next_step)?;

        if let Transition::Branching { branches, .. } = &transition {
            if field_type.is_choice() {
                let known: AHashSet<&str> = options.iter().map(|o| o.value.as_str()).collect();
                for key in branches.keys().filter(|k| !known.contains(k.as_str())) {
                    tracing::warn!(
                        step = raw.id.as_str(),
                        branch = key.as_str(),
                        "branch key matches no option and can never be taken"
                    );
                }
            }
        }

        Ok(StepDefinition {
            id: raw.id.clone(),
            title: raw.title.clone(),
            description: raw.description.clone(),
            field_name: field.name.clone(),
            field_type,
            label: field.label.clone(),
            options,
            required: field.required,
            max_selections: field.max_selections,
            required_keys: field.required_keys.clone(),
            constraints,
            transition,
        })
    }

    fn build_transition(
        &self,
        step_id: &str,
        next: &RawNextStep,
    ) -> Result<Transition, DefinitionError> {
        match next {
            RawNextStep::Fixed(target) if self.is_terminal_sentinel(target) => {
                Ok(Transition::Terminal)
            }
            RawNextStep::Fixed(target) => Ok(Transition::Fixed(target.clone())),
            RawNextStep::Branching(map) => {
                let fallback = map.get(FALLBACK_KEY).ok_or_else(|| {
                    DefinitionError::malformed(format!(
                        "branching transition of step '{}' has no '{}' entry",
                        step_id, FALLBACK_KEY
                    ))
                })?;
                let branches = map
                    .iter()
                    .filter(|(key, _)| key.as_str() != FALLBACK_KEY)
                    .map(|(key, target)| (key.clone(), self.target(target)))
                    .collect();
                Ok(Transition::Branching {
                    branches,
                    fallback: self.target(fallback),
                })
            }
        }
    }

    fn target(&self, id: &str) -> Target {
        if self.is_terminal_sentinel(id) {
            Target::Terminal
        } else {
            Target::Step(id.to_string())
        }
    }

    fn is_terminal_sentinel(&self, id: &str) -> bool {
        self.terminal_sentinels.iter().any(|s| s == id)
    }

    fn check_matches_targets(steps: &[StepDefinition]) -> Result<(), DefinitionError> {
        let fields: AHashSet<&str> = steps.iter().map(|s| s.field_name.as_str()).collect();
        for step in steps {
            for constraint in &step.constraints {
                if let FieldConstraint::Matches(other) = constraint {
                    if other == &step.field_name || !fields.contains(other.as_str()) {
                        return Err(DefinitionError::malformed(format!(
                            "step '{}' must match unknown field '{}'",
                            step.id, other
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Loads a raw workflow with default settings and no catalog.
pub fn load(raw: RawWorkflow) -> Result<WorkflowDefinition, DefinitionError> {
    Loader::builder(raw).build().load()
}
