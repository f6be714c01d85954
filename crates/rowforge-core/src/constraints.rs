use crate::error::{Error, Result};
use crate::types::{ConstraintValue, Constraints};

/// Merge the `key=value` list found inside a type expression's parentheses
/// over the kind's defaults.
///
/// Keys absent from `params` keep their default; unknown keys are kept as-is.
/// A blank list yields the defaults unchanged.
pub fn resolve_constraints(params: &str, defaults: &Constraints) -> Result<Constraints> {
    let mut constraints = defaults.clone();
    if params.trim().is_empty() {
        return Ok(constraints);
    }

    for token in split_params(params) {
        let token = token.trim();
        let Some((key, value)) = token.split_once('=') else {
            return Err(Error::MalformedConstraint(token.to_string()));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(Error::MalformedConstraint(token.to_string()));
        }
        constraints.insert(key.to_string(), coerce_literal(value));
    }

    Ok(constraints)
}

/// Best-effort literal interpretation: integer, float, boolean, quoted string,
/// falling back to the raw trimmed text. Zero-padded integers such as `007`
/// stay text so prefixes keep their padding.
pub fn coerce_literal(raw: &str) -> ConstraintValue {
    let value = raw.trim();

    if is_zero_padded(value) {
        return ConstraintValue::Text(value.to_string());
    }
    if let Ok(int) = value.parse::<i64>() {
        return ConstraintValue::Int(int);
    }
    // `f64::from_str` accepts `inf` and `NaN`; those stay text.
    if value.chars().any(|ch| ch.is_ascii_digit())
        && let Ok(float) = value.parse::<f64>()
    {
        return ConstraintValue::Float(float);
    }
    match value {
        "true" | "True" => return ConstraintValue::Bool(true),
        "false" | "False" => return ConstraintValue::Bool(false),
        _ => {}
    }
    if let Some(inner) = strip_quotes(value) {
        return ConstraintValue::Text(inner.to_string());
    }

    ConstraintValue::Text(value.to_string())
}

fn is_zero_padded(value: &str) -> bool {
    let digits = value.strip_prefix(['+', '-']).unwrap_or(value);
    digits.len() > 1 && digits.starts_with('0') && digits.bytes().all(|b| b.is_ascii_digit())
}

fn strip_quotes(value: &str) -> Option<&str> {
    ['\'', '"'].into_iter().find_map(|quote| {
        value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
    })
}

/// Split on commas that are not inside a quoted value.
fn split_params(params: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (idx, ch) in params.char_indices() {
        match (quote, ch) {
            (None, '\'' | '"') => quote = Some(ch),
            (Some(open), _) if ch == open => quote = None,
            (None, ',') => {
                tokens.push(&params[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    tokens.push(&params[start..]);
    tokens
}
