use ahash::{AHashMap, AHashSet};
use regex::Regex;

use crate::catalog::Catalog;
use crate::error::DefinitionError;
use crate::workflow::{ChoiceOption, FieldConstraint, FieldType, RawConstraints, RawField};

/// Defines the accepted field type names and their canonical `FieldType`.
macro_rules! define_field_types {
    ( $( ($name:literal, $variant:path) ),* $(,)? ) => {
        pub(super) fn register_default_field_types(registry: &mut AHashMap<String, FieldType>) {
            $( registry.insert($name.to_string(), $variant); )*
        }

        pub(super) fn field_type_by_name(name: &str) -> Option<FieldType> {
            match name {
                $( $name => Some($variant), )*
                _ => None,
            }
        }
    };
}

define_field_types! {
    // Canonical names
    ("single-choice", FieldType::SingleChoice),
    ("multi-choice", FieldType::MultiChoice),
    ("free-text", FieldType::FreeText),
    ("numeric", FieldType::Numeric),
    ("boolean", FieldType::Boolean),
    ("nested-object", FieldType::NestedObject),

    // Widget names used by wizard schemas
    ("radio", FieldType::SingleChoice),
    ("select", FieldType::SingleChoice),
    ("multiselect", FieldType::MultiChoice),
    ("text", FieldType::FreeText),
    ("number", FieldType::Numeric),
    ("checkbox", FieldType::Boolean),
    ("group", FieldType::NestedObject),
}

/// Resolves the option list of a step, inline or from the catalog.
pub(super) fn resolve_options(
    step_id: &str,
    field: &RawField,
    field_type: FieldType,
    catalog: &Catalog,
) -> Result<Vec<ChoiceOption>, DefinitionError> {
    let options = match (&field.options, &field.options_from) {
        (Some(_), Some(_)) => {
            return Err(DefinitionError::malformed(format!(
                "step '{}' declares both inline options and optionsFrom",
                step_id
            )));
        }
        (Some(inline), None) => inline.clone(),
        (None, Some(list)) => catalog
            .get(list)
            .ok_or_else(|| {
                DefinitionError::malformed(format!(
                    "step '{}' takes options from unknown catalog list '{}'",
                    step_id, list
                ))
            })?
            .to_vec(),
        (None, None) => Vec::new(),
    };

    if !field_type.is_choice() {
        if !options.is_empty() || field.options_from.is_some() {
            return Err(DefinitionError::malformed(format!(
                "step '{}' is {} but declares options",
                step_id, field_type
            )));
        }
        return Ok(options);
    }

    if options.is_empty() {
        return Err(DefinitionError::malformed(format!(
            "choice step '{}' has no options",
            step_id
        )));
    }

    let mut seen = AHashSet::new();
    for option in &options {
        if !seen.insert(option.value.as_str()) {
            return Err(DefinitionError::malformed(format!(
                "step '{}' declares option '{}' more than once",
                step_id, option.value
            )));
        }
    }

    Ok(options)
}

/// Checks `maxSelections` and `requiredKeys` against the field type.
pub(super) fn check_field_shape(
    step_id: &str,
    field: &RawField,
    field_type: FieldType,
    option_count: usize,
) -> Result<(), DefinitionError> {
    if let Some(limit) = field.max_selections {
        if field_type != FieldType::MultiChoice {
            return Err(DefinitionError::malformed(format!(
                "step '{}' sets maxSelections but is {}",
                step_id, field_type
            )));
        }
        if limit == 0 {
            return Err(DefinitionError::malformed(format!(
                "step '{}' sets maxSelections to 0",
                step_id
            )));
        }
        if limit > option_count {
            tracing::warn!(
                step = step_id,
                limit,
                option_count,
                "maxSelections exceeds the number of options"
            );
        }
    }

    if !field.required_keys.is_empty() && field_type != FieldType::NestedObject {
        return Err(DefinitionError::malformed(format!(
            "step '{}' sets requiredKeys but is {}",
            step_id, field_type
        )));
    }

    Ok(())
}

/// Compiles the declared constraints, rejecting ones that cannot apply to the field type.
pub(super) fn parse_constraints(
    step_id: &str,
    raw: &RawConstraints,
    field_type: FieldType,
) -> Result<Vec<FieldConstraint>, DefinitionError> {
    let mut constraints = Vec::new();
    let is_text = field_type == FieldType::FreeText;
    let is_number = field_type == FieldType::Numeric;

    let wrong_type = |rule: &str| {
        DefinitionError::malformed(format!(
            "constraint '{}' on step '{}' does not apply to {}",
            rule, step_id, field_type
        ))
    };

    if let Some(n) = raw.min_length {
        if !is_text {
            return Err(wrong_type("minLength"));
        }
        constraints.push(FieldConstraint::MinLength(n));
    }
    if let Some(n) = raw.max_length {
        if !is_text {
            return Err(wrong_type("maxLength"));
        }
        constraints.push(FieldConstraint::MaxLength(n));
    }
    if let (Some(min), Some(max)) = (raw.min_length, raw.max_length) {
        if min > max {
            return Err(DefinitionError::malformed(format!(
                "step '{}' has minLength {} above maxLength {}",
                step_id, min, max
            )));
        }
    }
    if let Some(pattern) = &raw.pattern {
        if !is_text {
            return Err(wrong_type("pattern"));
        }
        let re = Regex::new(pattern).map_err(|e| {
            DefinitionError::malformed(format!(
                "step '{}' has an invalid pattern '{}': {}",
                step_id, pattern, e
            ))
        })?;
        constraints.push(FieldConstraint::Pattern(re));
    }
    if let Some(min) = raw.min {
        if !is_number {
            return Err(wrong_type("min"));
        }
        constraints.push(FieldConstraint::Min(min));
    }
    if let Some(max) = raw.max {
        if !is_number {
            return Err(wrong_type("max"));
        }
        constraints.push(FieldConstraint::Max(max));
    }
    if let (Some(min), Some(max)) = (raw.min, raw.max) {
        if min > max {
            return Err(DefinitionError::malformed(format!(
                "step '{}' has min {} above max {}",
                step_id, min, max
            )));
        }
    }
    if let Some(other) = &raw.matches {
        constraints.push(FieldConstraint::Matches(other.clone()));
    }

    Ok(constraints)
}
