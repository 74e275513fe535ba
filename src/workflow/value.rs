use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use super::FieldType;

/// 2^53, the largest magnitude below which every integer is exact in an f64.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A recorded answer.
///
/// Single-choice and free-text answers are both `Text`; the step's
/// [`FieldType`] decides how the value is interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<String>),
    Object(BTreeMap<String, Answer>),
}

impl Answer {
    pub fn text(value: impl Into<String>) -> Self {
        Answer::Text(value.into())
    }

    pub fn list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Answer::List(values.into_iter().map(Into::into).collect())
    }

    pub fn object<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Answer)>,
        K: Into<String>,
    {
        Answer::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Whether this value has the shape a field of `field_type` stores.
    pub fn fits(&self, field_type: FieldType) -> bool {
        matches!(
            (self, field_type),
            (Answer::Text(_), FieldType::SingleChoice | FieldType::FreeText)
                | (Answer::List(_), FieldType::MultiChoice)
                | (Answer::Number(_), FieldType::Numeric)
                | (Answer::Bool(_), FieldType::Boolean)
                | (Answer::Object(_), FieldType::NestedObject)
        )
    }

    /// An answer that does not count as "present" for a required field.
    ///
    /// `false` is blank so a required boolean behaves like a consent checkbox.
    pub fn is_blank(&self) -> bool {
        match self {
            Answer::Bool(b) => !b,
            Answer::Number(n) => n.is_nan(),
            Answer::Text(s) => s.trim().is_empty(),
            Answer::List(items) => items.is_empty(),
            Answer::Object(entries) => entries.values().all(Answer::is_blank),
        }
    }

    /// The key used to look this answer up in a branching transition.
    /// Lists and objects never match a branch and always take the fallback.
    pub fn branch_key(&self) -> Option<Cow<'_, str>> {
        match self {
            Answer::Text(s) => Some(Cow::Borrowed(s.as_str())),
            Answer::Bool(_) | Answer::Number(_) => Some(Cow::Owned(self.to_string())),
            Answer::List(_) | Answer::Object(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Answer::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Answer::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Answer::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&BTreeMap<String, Answer>> {
        match self {
            Answer::Object(entries) => Some(entries),
            _ => None,
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Number(n) => {
                // Whole numbers beyond f64's exact integer range keep the float form.
                if n.fract() == 0.0 && n.abs() < MAX_EXACT_INTEGER {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Answer::Bool(b) => write!(f, "{}", b),
            Answer::Text(s) => write!(f, "{}", s),
            Answer::List(items) => write!(f, "[{}]", items.join(", ")),
            Answer::Object(entries) => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<&str> for Answer {
    fn from(value: &str) -> Self {
        Answer::Text(value.to_string())
    }
}

impl From<String> for Answer {
    fn from(value: String) -> Self {
        Answer::Text(value)
    }
}

impl From<bool> for Answer {
    fn from(value: bool) -> Self {
        Answer::Bool(value)
    }
}

impl From<f64> for Answer {
    fn from(value: f64) -> Self {
        Answer::Number(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values() {
        assert!(Answer::text("   ").is_blank());
        assert!(Answer::List(vec![]).is_blank());
        assert!(Answer::Bool(false).is_blank());
        assert!(Answer::Number(f64::NAN).is_blank());
        assert!(Answer::object([("street", Answer::text(""))]).is_blank());

        assert!(!Answer::text("Kolkata").is_blank());
        assert!(!Answer::Number(0.0).is_blank());
        assert!(!Answer::Bool(true).is_blank());
    }

    #[test]
    fn branch_keys() {
        assert_eq!(Answer::text("studio").branch_key().as_deref(), Some("studio"));
        assert_eq!(Answer::Bool(true).branch_key().as_deref(), Some("true"));
        assert_eq!(Answer::Number(3.0).branch_key().as_deref(), Some("3"));
        assert!(Answer::list(["a"]).branch_key().is_none());
    }

    #[test]
    fn untagged_json_shapes() {
        let parsed: Answer = serde_json::from_str(r#"["a", "b"]"#).unwrap();
        assert_eq!(parsed, Answer::list(["a", "b"]));

        let parsed: Answer = serde_json::from_str(r#"{"street": "Park St"}"#).unwrap();
        assert_eq!(parsed, Answer::object([("street", Answer::text("Park St"))]));

        let parsed: Answer = serde_json::from_str("12.5").unwrap();
        assert_eq!(parsed, Answer::Number(12.5));
    }

    #[test]
    fn display() {
        assert_eq!(Answer::Number(42.0).to_string(), "42");
        assert_eq!(Answer::list(["a", "b"]).to_string(), "[a, b]");
    }
}
