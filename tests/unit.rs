//! Unit tests for core stepflow types.
mod common;
use ahash::AHashMap;
use rust_decimal_macros::dec;
use stepflow::error::{ConfigError, ScriptError};
use stepflow::prelude::*;
use stepflow::workflow::{Target, Transition};

#[test]
fn test_answer_display() {
    assert_eq!(format!("{}", Answer::Number(42.0)), "42");
    assert_eq!(format!("{}", Answer::Number(2.5)), "2.5");
    assert_eq!(format!("{}", Answer::Bool(true)), "true");
    assert_eq!(format!("{}", Answer::list(["photo", "video"])), "[photo, video]");
    assert_eq!(
        format!(
            "{}",
            Answer::object([("street", Answer::text("Park St")), ("pincode", Answer::text("700016"))])
        ),
        "{pincode: 700016, street: Park St}"
    );
}

#[test]
fn test_large_whole_numbers_keep_their_value() {
    let big = Answer::Number(1e20);
    assert_eq!(big.to_string(), "100000000000000000000");
    assert_eq!(big.branch_key().unwrap(), "100000000000000000000");
    assert_eq!(Answer::Number(-1e20).to_string(), "-100000000000000000000");

    let mut branches = AHashMap::new();
    branches.insert("100000000000000000000".to_string(), Target::Terminal);
    let transition = Transition::Branching {
        branches,
        fallback: Target::Step("q3".to_string()),
    };
    assert_eq!(transition.resolve(Some(&big)), Target::Terminal);
    assert_eq!(
        transition.resolve(Some(&Answer::Number(9.3e18))),
        Target::Step("q3".to_string())
    );
}

#[test]
fn test_answer_json_shapes() {
    let parsed: Vec<Answer> =
        serde_json::from_str(r#"[true, 3, "studio", ["a", "b"], { "street": "x" }]"#).unwrap();
    assert_eq!(
        parsed,
        vec![
            Answer::Bool(true),
            Answer::Number(3.0),
            Answer::text("studio"),
            Answer::list(["a", "b"]),
            Answer::object([("street", Answer::text("x"))]),
        ]
    );
    assert_eq!(serde_json::to_string(&Answer::list(["a"])).unwrap(), r#"["a"]"#);
}

#[test]
fn test_answer_blankness() {
    assert!(Answer::text("   ").is_blank());
    assert!(Answer::Bool(false).is_blank());
    assert!(Answer::List(vec![]).is_blank());
    assert!(Answer::object([("street", Answer::text(""))]).is_blank());
    assert!(!Answer::Number(0.0).is_blank());
    assert!(!Answer::text("x").is_blank());
}

#[test]
fn test_answer_fits_field_type() {
    assert!(Answer::text("x").fits(FieldType::SingleChoice));
    assert!(Answer::text("x").fits(FieldType::FreeText));
    assert!(!Answer::text("x").fits(FieldType::MultiChoice));
    assert!(!Answer::Number(1.0).fits(FieldType::FreeText));
    assert!(Answer::Bool(false).fits(FieldType::Boolean));
}

#[test]
fn test_transition_resolution() {
    let mut branches = AHashMap::new();
    branches.insert("studio".to_string(), Target::Step("q2b".to_string()));
    branches.insert("true".to_string(), Target::Terminal);
    let transition = Transition::Branching {
        branches,
        fallback: Target::Step("q3".to_string()),
    };

    let studio = Answer::text("studio");
    let agency = Answer::text("agency");
    assert_eq!(transition.resolve(Some(&studio)), Target::Step("q2b".to_string()));
    assert_eq!(transition.resolve(Some(&agency)), Target::Step("q3".to_string()));
    assert_eq!(transition.resolve(Some(&Answer::Bool(true))), Target::Terminal);
    assert_eq!(transition.resolve(None), Target::Step("q3".to_string()));

    // Lists never match a branch.
    let list = Answer::list(["studio"]);
    assert_eq!(transition.resolve(Some(&list)), Target::Step("q3".to_string()));
}

#[test]
fn test_option_slugs() {
    let option = ChoiceOption::from_label("Gimbal/Stabilizer");
    assert_eq!(option.value, "gimbal-stabilizer");
    assert_eq!(ChoiceOption::from_label("  Mid-Range  ").value, "mid-range");
}

#[test]
fn test_operation_display_and_json() {
    let ops: Vec<Operation> = serde_json::from_str(
        r#"[
            { "op": "answer", "field": "team_size", "value": 4 },
            { "op": "toggle", "field": "services", "value": "drone" },
            { "op": "clear", "field": "notes" },
            { "op": "retreat" },
            { "op": "jump_to", "step_id": "q1" }
        ]"#,
    )
    .unwrap();

    let rendered: Vec<String> = ops.iter().map(ToString::to_string).collect();
    assert_eq!(
        rendered,
        vec![
            "answer team_size = 4",
            "toggle services drone",
            "clear notes",
            "retreat",
            "jump_to q1",
        ]
    );
}

#[test]
fn test_error_messages() {
    let err = ValidationError::SelectionLimitExceeded {
        field: "services".to_string(),
        limit: 2,
    };
    assert_eq!(err.to_string(), "Field 'services' allows at most 2 selections");

    let err = NavigationError::UnvisitedStep {
        step_id: "q4".to_string(),
    };
    assert_eq!(err.to_string(), "Step 'q4' has not been visited in this session");

    let err = SubmissionError::ValidationFailed {
        missing_fields: vec!["email".to_string(), "accept_terms".to_string()],
        invalid_fields: vec!["confirm_password".to_string()],
    };
    assert_eq!(
        err.to_string(),
        "Submission failed validation (missing: [email, accept_terms], invalid: [confirm_password])"
    );

    let err = QuoteError::DepositExceedsSubtotal {
        subtotal: dec!(900),
        deposit: dec!(999),
    };
    assert_eq!(err.to_string(), "Deposit 999 exceeds the subtotal 900");

    let err = ScriptError::OperationFailed {
        index: 2,
        operation: "advance".to_string(),
        source: WorkflowError::Validation(ValidationError::RequiredFieldMissing {
            field: "team_size".to_string(),
        }),
    };
    assert_eq!(
        err.to_string(),
        "Operation #2 (advance) failed: Field 'team_size' is required"
    );

    let err = SubmissionError::StalePath {
        step_id: "q1".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "The answer to step 'q1' no longer leads along the visited path"
    );
}

#[test]
fn test_policy_validation() {
    assert!(matches!(
        QuotePolicy::new(dec!(-1), dec!(0.25)),
        Err(ConfigError::InvalidValue { ref key, .. }) if key == "deposit"
    ));
    assert!(matches!(
        QuotePolicy::new(dec!(999), dec!(1.5)),
        Err(ConfigError::InvalidValue { ref key, .. }) if key == "escrow_fraction"
    ));
    assert!(matches!(QuotePolicy::from_json("{"), Err(ConfigError::Parse(_))));
}

#[test]
fn test_catalog_merge() {
    let base = Catalog::new()
        .with_labels("tiers", &["Budget"])
        .with_labels("radius", &["Within 5 km"]);
    let merged = base.merge(Catalog::new().with_labels("tiers", &["Premium", "Luxury"]));

    assert_eq!(merged.len(), 2);
    assert_eq!(merged.get("tiers").unwrap()[0].value, "premium");
    assert_eq!(merged.get("radius").unwrap()[0].value, "within-5-km");
}

#[test]
fn test_definition_lookup() {
    let definition = common::load_json(common::BRANCHING_JSON);
    assert_eq!(definition.position("q3"), Some(2));
    assert!(definition.step("nope").is_none());
    assert_eq!(definition.step_for_field("notes").unwrap().id, "q4");

    let q3 = definition.step("q3").unwrap();
    assert_eq!(q3.option_index("drone"), Some(2));
    assert!(q3.option("helicopter").is_none());
}
