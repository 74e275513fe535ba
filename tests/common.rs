//! Common test utilities for building workflow definitions and sessions.
use rust_decimal_macros::dec;
use stepflow::prelude::*;

/// A small provider wizard with one branch.
///
/// `q1` (role) -> `studio`: `q2b` (team size), anything else: `q3` (services,
/// at most 2) -> `q4` (optional notes) -> complete.
#[allow(dead_code)]
pub const BRANCHING_JSON: &str = r#"{
    "name": "provider",
    "steps": [
        {
            "id": "q1",
            "title": "What best describes you?",
            "field": {
                "name": "role",
                "type": "radio",
                "required": true,
                "options": [
                    { "value": "freelancer", "label": "Freelancer" },
                    { "value": "studio", "label": "Studio" },
                    { "value": "agency", "label": "Agency" }
                ]
            },
            "nextStep": { "studio": "q2b", "default": "q3" }
        },
        {
            "id": "q2b",
            "field": {
                "name": "team_size",
                "type": "number",
                "required": true,
                "constraints": { "min": 1, "max": 50 }
            },
            "nextStep": "q3"
        },
        {
            "id": "q3",
            "field": {
                "name": "services",
                "type": "multiselect",
                "required": true,
                "maxSelections": 2,
                "options": [
                    { "value": "photo", "label": "Photography" },
                    { "value": "video", "label": "Videography" },
                    { "value": "drone", "label": "Drone" },
                    { "value": "editing", "label": "Editing" }
                ]
            },
            "nextStep": "q4"
        },
        {
            "id": "q4",
            "field": {
                "name": "notes",
                "type": "text",
                "constraints": { "maxLength": 20 }
            },
            "nextStep": "complete"
        }
    ]
}"#;

/// A linear account form exercising the field constraints.
#[allow(dead_code)]
pub const ACCOUNT_JSON: &str = r#"{
    "name": "account",
    "steps": [
        {
            "id": "email",
            "field": {
                "name": "email",
                "type": "free-text",
                "required": true,
                "constraints": { "pattern": "\\S+@\\S+\\.\\S+" }
            },
            "nextStep": "password"
        },
        {
            "id": "password",
            "field": {
                "name": "password",
                "type": "free-text",
                "required": true,
                "constraints": { "minLength": 6 }
            },
            "nextStep": "confirm"
        },
        {
            "id": "confirm",
            "field": {
                "name": "confirm_password",
                "type": "free-text",
                "required": true,
                "constraints": { "matches": "password" }
            },
            "nextStep": "address"
        },
        {
            "id": "address",
            "field": {
                "name": "address",
                "type": "nested-object",
                "required": true,
                "requiredKeys": ["street", "pincode"]
            },
            "nextStep": "terms"
        },
        {
            "id": "terms",
            "field": { "name": "accept_terms", "type": "boolean", "required": true },
            "nextStep": "complete"
        }
    ]
}"#;

/// Loads a JSON definition with default loader settings.
#[allow(dead_code)]
pub fn load_json(json: &str) -> WorkflowDefinition {
    let raw = RawWorkflow::from_json(json).expect("Fixture JSON should parse");
    Loader::builder(raw)
        .build()
        .load()
        .expect("Fixture definition should load")
}

/// Loads a JSON definition and returns the loader error.
#[allow(dead_code)]
pub fn load_error(json: &str) -> DefinitionError {
    Loader::from_json(json)
        .and_then(|loader| loader.load())
        .expect_err("Definition should be rejected")
}

#[allow(dead_code)]
pub fn branching_engine() -> WorkflowEngine {
    WorkflowEngine::new(load_json(BRANCHING_JSON))
}

#[allow(dead_code)]
pub fn account_engine() -> WorkflowEngine {
    WorkflowEngine::new(load_json(ACCOUNT_JSON))
}

/// Drives the branching wizard to its terminal state with the given role.
#[allow(dead_code)]
pub fn finish_branching(engine: &WorkflowEngine, role: &str) -> WorkflowState {
    let mut state = engine.start();
    state = engine.set_answer(&state, "role", role).unwrap();
    state = engine.advance(&state).unwrap();
    if role == "studio" {
        state = engine.set_answer(&state, "team_size", 4.0).unwrap();
        state = engine.advance(&state).unwrap();
    }
    state = engine
        .set_answer(&state, "services", Answer::list(["video", "photo"]))
        .unwrap();
    state = engine.advance(&state).unwrap();
    state = engine.set_answer(&state, "notes", "  weekends  ").unwrap();
    state = engine.advance(&state).unwrap();
    assert!(state.is_terminal());
    state
}

/// Drives the account form to its terminal state with valid answers.
#[allow(dead_code)]
pub fn finish_account(engine: &WorkflowEngine) -> WorkflowState {
    let mut state = engine.start();
    let answers: [(&str, Answer); 5] = [
        ("email", Answer::text("rover@example.com")),
        ("password", Answer::text("secret42")),
        ("confirm_password", Answer::text("secret42")),
        (
            "address",
            Answer::object([
                ("street", Answer::text("12 Park Street")),
                ("pincode", Answer::text("700016")),
            ]),
        ),
        ("accept_terms", Answer::Bool(true)),
    ];
    for (field, value) in answers {
        state = engine.set_answer(&state, field, value).unwrap();
        state = engine.advance(&state).unwrap();
    }
    assert!(state.is_terminal());
    state
}

/// Add-ons of a photography package: an album (preselected) and drone coverage.
#[allow(dead_code)]
pub fn booking_options() -> Vec<ServiceOption> {
    vec![
        ServiceOption::new("a", "Printed album", dec!(500)).preselected(),
        ServiceOption::new("drone", "Drone coverage", dec!(1500)),
    ]
}
