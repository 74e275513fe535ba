use ahash::{AHashMap, AHashSet};
use std::collections::VecDeque;

use crate::error::DefinitionError;
use crate::workflow::{StepDefinition, Target};

/// Outgoing edges of every step, used for the structural checks.
pub(super) struct StepGraph<'a> {
    steps: &'a [StepDefinition],
    // Key: step id, Value: every target its transition can produce
    connections: AHashMap<&'a str, Vec<Target>>,
}

impl<'a> StepGraph<'a> {
    pub(super) fn new(steps: &'a [StepDefinition]) -> Self {
        let connections = steps
            .iter()
            .map(|s| (s.id.as_str(), s.transition.targets()))
            .collect();
        Self { steps, connections }
    }

    /// Every transition target must name a declared step.
    pub(super) fn check_targets(&self) -> Result<(), DefinitionError> {
        for step in self.steps {
            for target in &self.connections[step.id.as_str()] {
                if let Target::Step(id) = target {
                    if !self.connections.contains_key(id.as_str()) {
                        return Err(DefinitionError::malformed(format!(
                            "step '{}' transitions to unknown step '{}'",
                            step.id, id
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Steps that cannot be reached from `entry`, in declared order.
    /// Assumes `check_targets` passed.
    pub(super) fn unreachable_from(&self, entry: &str) -> Vec<&'a str> {
        let visited = self.reachable_from(entry);
        self.steps
            .iter()
            .map(|s| s.id.as_str())
            .filter(|id| !visited.contains(id))
            .collect()
    }

    /// Whether any step reachable from `entry` can finish the workflow.
    pub(super) fn reaches_terminal(&self, entry: &str) -> bool {
        self.reachable_from(entry).iter().any(|id| {
            self.connections[id]
                .iter()
                .any(|t| matches!(t, Target::Terminal))
        })
    }

    fn reachable_from(&self, entry: &str) -> AHashSet<&'a str> {
        let mut visited: AHashSet<&'a str> = AHashSet::new();
        let mut queue: VecDeque<&'a str> = VecDeque::new();

        if let Some((&start, _)) = self.connections.get_key_value(entry) {
            visited.insert(start);
            queue.push_back(start);
        }

        while let Some(current) = queue.pop_front() {
            for target in &self.connections[current] {
                let Target::Step(next) = target else { continue };
                if let Some((&key, _)) = self.connections.get_key_value(next.as_str()) {
                    if visited.insert(key) {
                        queue.push_back(key);
                    }
                }
            }
        }
        visited
    }
}
