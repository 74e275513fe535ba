use ahash::{AHashMap, AHashSet};

use crate::error::ValidationError;
use crate::workflow::{Answer, FieldConstraint, FieldType, StepDefinition};

/// Checks that `answer` can be stored for `step` and returns the value to store.
///
/// Multi-choice selections are deduplicated before the cap is checked.
pub(crate) fn check_answer(
    step: &StepDefinition,
    answer: Answer,
) -> Result<Answer, ValidationError> {
    if !answer.fits(step.field_type) {
        return Err(ValidationError::TypeMismatch {
            field: step.field_name.clone(),
            expected: step.field_type.to_string(),
        });
    }

    match (step.field_type, answer) {
        (FieldType::SingleChoice, Answer::Text(value)) => {
            ensure_option(step, &value)?;
            Ok(Answer::Text(value))
        }
        (FieldType::MultiChoice, Answer::List(values)) => {
            let mut seen = AHashSet::new();
            let mut selected = Vec::with_capacity(values.len());
            for value in values {
                ensure_option(step, &value)?;
                if seen.insert(value.clone()) {
                    selected.push(value);
                }
            }
            if let Some(limit) = step.max_selections {
                if selected.len() > limit {
                    return Err(ValidationError::SelectionLimitExceeded {
                        field: step.field_name.clone(),
                        limit,
                    });
                }
            }
            Ok(Answer::List(selected))
        }
        (_, answer) => Ok(answer),
    }
}

pub(crate) fn ensure_option(step: &StepDefinition, value: &str) -> Result<(), ValidationError> {
    if step.option(value).is_none() {
        return Err(ValidationError::UnknownOption {
            field: step.field_name.clone(),
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Required fields of `step` that have no usable answer.
///
/// Missing keys of a nested-object answer are reported as `field.key`.
pub(crate) fn missing_fields(
    step: &StepDefinition,
    answers: &AHashMap<String, Answer>,
) -> Vec<String> {
    let answer = answers.get(&step.field_name);
    let present = answer.is_some_and(|a| !a.is_blank());

    if step.required && !present {
        return vec![step.field_name.clone()];
    }

    match answer.and_then(Answer::as_object) {
        Some(entries) if present => step
            .required_keys
            .iter()
            .filter(|key| entries.get(key.as_str()).is_none_or(Answer::is_blank))
            .map(|key| format!("{}.{}", step.field_name, key))
            .collect(),
        _ => Vec::new(),
    }
}

/// Rules of `step` that its current answer breaks. Unanswered fields break none.
pub(crate) fn violated_rules(
    step: &StepDefinition,
    answers: &AHashMap<String, Answer>,
) -> Vec<String> {
    let Some(answer) = answers.get(&step.field_name).filter(|a| !a.is_blank()) else {
        return Vec::new();
    };

    step.constraints
        .iter()
        .filter(|constraint| !satisfies(constraint, answer, answers))
        .map(FieldConstraint::rule)
        .collect()
}

fn satisfies(
    constraint: &FieldConstraint,
    answer: &Answer,
    answers: &AHashMap<String, Answer>,
) -> bool {
    match constraint {
        FieldConstraint::MinLength(n) => answer
            .as_text()
            .is_some_and(|s| s.trim().chars().count() >= *n),
        FieldConstraint::MaxLength(n) => answer
            .as_text()
            .is_some_and(|s| s.trim().chars().count() <= *n),
        FieldConstraint::Pattern(re) => answer.as_text().is_some_and(|s| re.is_match(s.trim())),
        FieldConstraint::Min(min) => answer.as_number().is_some_and(|n| n >= *min),
        FieldConstraint::Max(max) => answer.as_number().is_some_and(|n| n <= *max),
        FieldConstraint::Matches(other) => answers.get(other) == Some(answer),
    }
}

/// The first problem that keeps the step from being left, if any.
pub(crate) fn first_error(
    step: &StepDefinition,
    answers: &AHashMap<String, Answer>,
) -> Option<ValidationError> {
    if let Some(field) = missing_fields(step, answers).into_iter().next() {
        return Some(ValidationError::RequiredFieldMissing { field });
    }
    violated_rules(step, answers)
        .into_iter()
        .next()
        .map(|rule| ValidationError::ConstraintViolated {
            field: step.field_name.clone(),
            rule,
        })
}

/// The form a stored answer takes in a submission payload.
pub(crate) fn normalize(step: &StepDefinition, answer: &Answer) -> Answer {
    match answer {
        Answer::Text(s) if step.field_type == FieldType::FreeText => Answer::text(s.trim()),
        Answer::List(values) => {
            let mut ordered = values.clone();
            ordered.sort_by_key(|v| step.option_index(v).unwrap_or(usize::MAX));
            Answer::List(ordered)
        }
        Answer::Object(entries) => Answer::Object(
            entries
                .iter()
                .map(|(key, value)| {
                    let value = match value {
                        Answer::Text(s) => Answer::text(s.trim()),
                        other => other.clone(),
                    };
                    (key.clone(), value)
                })
                .collect(),
        ),
        other => other.clone(),
    }
}
