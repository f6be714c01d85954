use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Semantic category of a field's generated value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    String,
    Integer,
    Float,
    Boolean,
    Counter,
    SequenceString,
    Timestamp,
}

/// Keyword table in match priority order. More specific keywords come first
/// so that `str_seq` is never read as `str`.
const KEYWORDS: &[(&str, FieldKind)] = &[
    ("str_seq", FieldKind::SequenceString),
    ("str", FieldKind::String),
    ("float", FieldKind::Float),
    ("bool", FieldKind::Boolean),
    ("count", FieldKind::Counter),
    ("int", FieldKind::Integer),
    ("timestamp", FieldKind::Timestamp),
];

impl FieldKind {
    /// Classify a type expression head by keyword presence; first match wins.
    pub fn from_keyword(head: &str) -> Option<Self> {
        let head = head.trim().to_ascii_lowercase();
        KEYWORDS
            .iter()
            .find(|(keyword, _)| head.contains(keyword))
            .map(|(_, kind)| *kind)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Integer => "integer",
            FieldKind::Float => "float",
            FieldKind::Boolean => "boolean",
            FieldKind::Counter => "counter",
            FieldKind::SequenceString => "sequence_string",
            FieldKind::Timestamp => "timestamp",
        }
    }

    /// Whether values of this kind are drawn from sequence state.
    pub fn is_sequential(&self) -> bool {
        matches!(self, FieldKind::Counter | FieldKind::SequenceString)
    }

    /// Constraint mapping used when the expression omits a key.
    pub fn default_constraints(&self) -> Constraints {
        let mut constraints = Constraints::new();
        match self {
            FieldKind::String => {
                constraints.insert("min".to_string(), ConstraintValue::Int(1));
                constraints.insert("max".to_string(), ConstraintValue::Int(255));
            }
            FieldKind::Integer => {
                constraints.insert("min".to_string(), ConstraintValue::Int(0));
                constraints.insert("max".to_string(), ConstraintValue::Int(10_000));
            }
            FieldKind::Float => {
                constraints.insert("min".to_string(), ConstraintValue::Float(0.0));
                constraints.insert("max".to_string(), ConstraintValue::Float(10_000.0));
            }
            FieldKind::Boolean => {
                constraints.insert("true_ratio".to_string(), ConstraintValue::Float(0.5));
            }
            FieldKind::Counter => {
                constraints.insert("start".to_string(), ConstraintValue::Int(1));
            }
            FieldKind::SequenceString => {
                constraints.insert("prefix".to_string(), ConstraintValue::Text(String::new()));
                constraints.insert("start".to_string(), ConstraintValue::Int(1));
            }
            FieldKind::Timestamp => {}
        }
        constraints
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scalar value of a named constraint after literal coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConstraintValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl ConstraintValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ConstraintValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Integers widen to floats; other scalars do not convert.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ConstraintValue::Int(value) => Some(*value as f64),
            ConstraintValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConstraintValue::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            ConstraintValue::Int(_) => "integer",
            ConstraintValue::Float(_) => "float",
            ConstraintValue::Bool(_) => "boolean",
            ConstraintValue::Text(_) => "string",
        }
    }
}

impl fmt::Display for ConstraintValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintValue::Int(value) => write!(f, "{value}"),
            ConstraintValue::Float(value) => write!(f, "{value}"),
            ConstraintValue::Bool(value) => write!(f, "{value}"),
            ConstraintValue::Text(value) => f.write_str(value),
        }
    }
}

/// Named constraints for one field, defaults merged with explicit values.
pub type Constraints = BTreeMap<String, ConstraintValue>;

/// Result of parsing a type expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedType {
    pub kind: FieldKind,
    pub constraints: Constraints,
}

impl ParsedType {
    pub fn constraint(&self, key: &str) -> Option<&ConstraintValue> {
        self.constraints.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_priority_prefers_specific_matches() {
        assert_eq!(FieldKind::from_keyword("str_seq"), Some(FieldKind::SequenceString));
        assert_eq!(FieldKind::from_keyword("str"), Some(FieldKind::String));
        assert_eq!(FieldKind::from_keyword("count"), Some(FieldKind::Counter));
        assert_eq!(FieldKind::from_keyword("int"), Some(FieldKind::Integer));
        assert_eq!(FieldKind::from_keyword("boolean"), Some(FieldKind::Boolean));
        assert_eq!(FieldKind::from_keyword("timestamp"), Some(FieldKind::Timestamp));
        assert_eq!(FieldKind::from_keyword("enum"), None);
    }

    #[test]
    fn integer_constraints_widen_to_float() {
        assert_eq!(ConstraintValue::Int(3).as_f64(), Some(3.0));
        assert_eq!(ConstraintValue::Float(3.5).as_i64(), None);
    }
}
