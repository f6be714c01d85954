//! Parser for field type expressions.
//!
//! ```text
//! type_expr := kind_keyword ["(" param ("," param)* ")"]
//! param     := key "=" value
//! ```
//!
//! The kind is chosen by keyword presence in the text before `(`, checked in
//! a fixed priority order (see [`FieldKind::from_keyword`]).

use crate::constraints::resolve_constraints;
use crate::error::{Error, Result};
use crate::types::{FieldKind, ParsedType};

/// Parse a type expression such as `str(min=5, max=20)` or `timestamp`.
pub fn parse_type_expr(expr: &str) -> Result<ParsedType> {
    let trimmed = expr.trim();
    let (head, params) = match trimmed.split_once('(') {
        Some((head, rest)) => (head, Some(rest)),
        None => (trimmed, None),
    };

    let kind =
        FieldKind::from_keyword(head).ok_or_else(|| Error::UnsupportedType(expr.to_string()))?;
    let defaults = kind.default_constraints();

    let constraints = match params {
        None if head.contains(')') => return Err(Error::MalformedConstraint(expr.to_string())),
        None => defaults,
        Some(rest) => {
            let inner = rest
                .strip_suffix(')')
                .ok_or_else(|| Error::MalformedConstraint(expr.to_string()))?;
            resolve_constraints(inner, &defaults)?
        }
    };

    Ok(ParsedType { kind, constraints })
}
