//! Typed attribute values and validated property sets

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::AttributeKind;

/// A single attribute value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl AttributeValue {
    /// Integer view of the value, if it holds a whole number
    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttributeValue::Int(v) => Some(*v),
            AttributeValue::Float(v) if v.fract() == 0.0 => Some(*v as i64),
            AttributeValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttributeValue::Bool(v) => write!(f, "{}", v),
            AttributeValue::Int(v) => write!(f, "{}", v),
            AttributeValue::Float(v) => write!(f, "{}", v),
            AttributeValue::Text(v) => f.write_str(v),
        }
    }
}

impl AttributeKind {
    /// Parse form text into a value of this kind
    ///
    /// Empty (or whitespace-only) text is rejected as a missing value.
    pub fn parse(&self, field: &str, text: &str) -> Result<AttributeValue, FieldError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(FieldError::Required {
                field: field.to_string(),
            });
        }

        let invalid = || FieldError::InvalidValue {
            field: field.to_string(),
            kind: *self,
            value: text.to_string(),
        };

        match self {
            AttributeKind::Int => trimmed.parse().map(AttributeValue::Int).map_err(|_| invalid()),
            AttributeKind::Float => trimmed
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(AttributeValue::Float)
                .ok_or_else(invalid),
            AttributeKind::Number => {
                if let Ok(v) = trimmed.parse::<i64>() {
                    Ok(AttributeValue::Int(v))
                } else {
                    trimmed
                        .parse::<f64>()
                        .ok()
                        .filter(|v| v.is_finite())
                        .map(AttributeValue::Float)
                        .ok_or_else(invalid)
                }
            }
            AttributeKind::Str => Ok(AttributeValue::Text(text.to_string())),
            AttributeKind::Bool => match trimmed.to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(AttributeValue::Bool(true)),
                "false" | "0" => Ok(AttributeValue::Bool(false)),
                _ => Err(invalid()),
            },
        }
    }
}

/// Form validation error for a single field
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    #[error("Field '{field}' is required.")]
    Required { field: String },

    #[error("Field '{field}' expects {kind}, got '{value}'.")]
    InvalidValue {
        field: String,
        kind: AttributeKind,
        value: String,
    },

    #[error("Unknown field '{field}'.")]
    UnknownField { field: String },
}

impl FieldError {
    /// Name of the offending field
    pub fn field(&self) -> &str {
        match self {
            FieldError::Required { field }
            | FieldError::InvalidValue { field, .. }
            | FieldError::UnknownField { field } => field,
        }
    }
}

/// All field errors of one form submission, in form order
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join(" "))]
pub struct FormErrors(pub Vec<FieldError>);

impl FormErrors {
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// Error for a given field, if any
    pub fn for_field(&self, field: &str) -> Option<&FieldError> {
        self.0.iter().find(|e| e.field() == field)
    }
}

/// Attribute values of a feature
///
/// Once a feature is saved this holds a value for every attribute of its
/// schema; it is produced by [`FeatureTypeSchema::validate_form`].
///
/// [`FeatureTypeSchema::validate_form`]: super::FeatureTypeSchema::validate_form
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties(BTreeMap<String, AttributeValue>);

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub(crate) fn insert(&mut self, name: impl Into<String>, value: AttributeValue) {
        self.0.insert(name.into(), value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, AttributeValue)> for Properties {
    fn from_iter<T: IntoIterator<Item = (String, AttributeValue)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kinds() {
        assert_eq!(AttributeKind::Int.parse("n", " 3 "), Ok(AttributeValue::Int(3)));
        assert_eq!(
            AttributeKind::Float.parse("w", "2.5"),
            Ok(AttributeValue::Float(2.5))
        );
        assert_eq!(AttributeKind::Number.parse("w", "12"), Ok(AttributeValue::Int(12)));
        assert_eq!(
            AttributeKind::Number.parse("w", "12.5"),
            Ok(AttributeValue::Float(12.5))
        );
        assert_eq!(
            AttributeKind::Bool.parse("b", "TRUE"),
            Ok(AttributeValue::Bool(true))
        );
        assert_eq!(
            AttributeKind::Str.parse("s", "North field"),
            Ok(AttributeValue::Text("North field".into()))
        );
    }

    #[test]
    fn test_parse_rejects_empty_and_garbage() {
        assert_eq!(
            AttributeKind::Str.parse("fieldName", "  "),
            Err(FieldError::Required {
                field: "fieldName".into()
            })
        );
        assert!(matches!(
            AttributeKind::Int.parse("headlandNum", "two"),
            Err(FieldError::InvalidValue { .. })
        ));
        assert!(matches!(
            AttributeKind::Float.parse("safetyDistance", "NaN"),
            Err(FieldError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_as_int() {
        assert_eq!(AttributeValue::Int(2).as_int(), Some(2));
        assert_eq!(AttributeValue::Float(4.0).as_int(), Some(4));
        assert_eq!(AttributeValue::Float(4.5).as_int(), None);
        assert_eq!(AttributeValue::Text("7".into()).as_int(), Some(7));
        assert_eq!(AttributeValue::Bool(true).as_int(), None);
    }

    #[test]
    fn test_form_errors_message() {
        let errors = FormErrors(vec![
            FieldError::Required {
                field: "fieldName".into(),
            },
            FieldError::Required {
                field: "workingWidth".into(),
            },
        ]);
        assert_eq!(
            errors.to_string(),
            "Field 'fieldName' is required. Field 'workingWidth' is required."
        );
        assert!(errors.for_field("workingWidth").is_some());
        assert!(errors.for_field("headlandNum").is_none());
    }
}
