//! # Stepflow - Branching Multi-Step Workflow Engine
//!
//! **Stepflow** drives onboarding, signup and booking wizards from declarative step
//! graphs. A definition is validated once when it is loaded; after that every user
//! interaction is a pure function from one immutable session snapshot to the next.
//!
//! ## Core Workflow
//!
//! 1.  **Describe the Workflow**: Write the steps as JSON (or implement `IntoWorkflow`
//!     for your own format). Each step collects one field and names its next step,
//!     either fixed or branching on the answer with a `"default"` fallback.
//! 2.  **Load**: Use `Loader::builder` to validate the graph. Dangling transitions,
//!     unreachable steps and malformed fields are rejected as `MalformedDefinition`.
//! 3.  **Drive a Session**: Create a `WorkflowEngine` and thread `WorkflowState`
//!     snapshots through `set_answer`, `advance`, `retreat` and `jump_to`.
//! 4.  **Submit**: Once the state is terminal, `assemble` re-validates the visited
//!     path and returns a `SubmissionPayload` or the complete list of problems.
//!
//! ## Quick Start
//!
//! ```rust
//! use stepflow::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let raw = RawWorkflow::from_json(
//!         r#"{
//!             "name": "provider",
//!             "steps": [
//!                 {
//!                     "id": "q1",
//!                     "field": {
//!                         "name": "role",
//!                         "type": "radio",
//!                         "required": true,
//!                         "options": [
//!                             { "value": "freelancer", "label": "Freelancer" },
//!                             { "value": "studio", "label": "Studio" }
//!                         ]
//!                     },
//!                     "nextStep": { "studio": "q2", "default": "complete" }
//!                 },
//!                 {
//!                     "id": "q2",
//!                     "field": { "name": "team_size", "type": "number" },
//!                     "nextStep": "complete"
//!                 }
//!             ]
//!         }"#,
//!     )?;
//!
//!     let definition = Loader::builder(raw).build().load()?;
//!     let engine = WorkflowEngine::new(definition);
//!
//!     let state = engine.start();
//!     let state = engine.set_answer(&state, "role", "studio")?;
//!     let state = engine.advance(&state)?;
//!     assert_eq!(state.current_step_id(), "q2");
//!
//!     let state = engine.set_answer(&state, "team_size", 4.0)?;
//!     let state = engine.advance(&state)?;
//!     assert!(state.is_terminal());
//!
//!     let payload = engine.assemble(&state)?;
//!     println!("{}", payload.to_json()?);
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod loader;
pub mod prelude;
pub mod presets;
pub mod quote;
pub mod script;
pub mod submission;
pub mod workflow;
