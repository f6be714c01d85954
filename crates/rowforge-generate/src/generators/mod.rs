use chrono::{Months, NaiveDateTime, TimeDelta, Utc};
use rand::{Rng, RngCore};

use rowforge_core::{ConstraintValue, Constraints, Field, FieldKind};

use crate::errors::GenerationError;
use crate::lexicon::LexicalSource;
use crate::sequence::{SequenceKey, SequenceStore};

/// Shortest string a `str` field may produce.
const MIN_TEXT_LEN: usize = 1;
/// Width of the timestamp window, ending at generation time.
const TIMESTAMP_WINDOW_MONTHS: u32 = 120;
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Generated value for a field.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratedValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Timestamp(NaiveDateTime),
}

impl GeneratedValue {
    pub fn to_csv(&self) -> String {
        match self {
            GeneratedValue::Bool(value) => value.to_string(),
            GeneratedValue::Int(value) => value.to_string(),
            GeneratedValue::Float(value) => value.to_string(),
            GeneratedValue::Text(value) => value.clone(),
            GeneratedValue::Timestamp(value) => value.format(TIMESTAMP_FORMAT).to_string(),
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            GeneratedValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            GeneratedValue::Int(value) => Some(*value as f64),
            GeneratedValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            GeneratedValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            GeneratedValue::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            GeneratedValue::Timestamp(value) => Some(*value),
            _ => None,
        }
    }
}

/// Range timestamps are drawn from, fixed once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimestampWindow {
    /// Ten years back from `end`.
    pub fn ending_at(end: NaiveDateTime) -> Self {
        let start = end
            .checked_sub_months(Months::new(TIMESTAMP_WINDOW_MONTHS))
            .unwrap_or(NaiveDateTime::MIN);
        Self { start, end }
    }

    pub fn ending_now() -> Self {
        Self::ending_at(Utc::now().naive_utc())
    }

    fn sample(&self, rng: &mut dyn RngCore) -> NaiveDateTime {
        let span = (self.end - self.start).num_seconds().max(0);
        let offset = rng.random_range(0..=span);
        self.start + TimeDelta::seconds(offset)
    }
}

/// Mutable state shared by every value generated in one run.
pub struct GeneratorContext<'a> {
    pub sequences: &'a mut SequenceStore,
    pub rng: &'a mut dyn RngCore,
    pub lexicon: &'a dyn LexicalSource,
    pub timestamps: TimestampWindow,
}

/// Typed generation policy for one field, resolved from its constraints.
///
/// Resolution happens before any row is produced, so a missing or
/// ill-typed constraint never surfaces halfway through a run.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueSpec {
    Text { min_len: usize, max_len: usize },
    Integer { min: i64, max: i64 },
    Float { min: f64, max: f64 },
    Boolean { true_ratio: f64 },
    Timestamp,
    Counter { start: i64 },
    SequenceText { prefix: String, start: i64 },
}

impl ValueSpec {
    /// Resolve the generation policy for `field` of `entity`.
    pub fn compile(entity: &str, field: &Field) -> Result<Self, GenerationError> {
        let params = ConstraintReader {
            entity,
            field: &field.name,
            constraints: &field.constraints,
        };

        let spec = match field.kind {
            FieldKind::String => {
                let min = params.required_i64("min")?;
                let max = params.required_i64("max")?;
                if min < 0 || max < 0 {
                    return Err(params.invalid("string lengths must be >= 0"));
                }
                let min_len = (min as usize).max(MIN_TEXT_LEN);
                let max_len = max as usize;
                if min_len > max_len {
                    return Err(params.invalid(format!(
                        "min length {min_len} exceeds max length {max_len}"
                    )));
                }
                ValueSpec::Text { min_len, max_len }
            }
            FieldKind::Integer => {
                let min = params.required_i64("min")?;
                let max = params.required_i64("max")?;
                if min > max {
                    return Err(params.invalid(format!("min {min} exceeds max {max}")));
                }
                ValueSpec::Integer { min, max }
            }
            FieldKind::Float => {
                let min = params.required_f64("min")?;
                let max = params.required_f64("max")?;
                if !min.is_finite() || !max.is_finite() {
                    return Err(params.invalid("float bounds must be finite"));
                }
                if min > max {
                    return Err(params.invalid(format!("min {min} exceeds max {max}")));
                }
                if !(max - min).is_finite() {
                    return Err(params.invalid(format!(
                        "range [{min}, {max}] is wider than f64 can represent"
                    )));
                }
                ValueSpec::Float { min, max }
            }
            FieldKind::Boolean => {
                let true_ratio = params.required_f64("true_ratio")?;
                if !(0.0..=1.0).contains(&true_ratio) {
                    return Err(params.invalid(format!(
                        "true_ratio {true_ratio} outside [0, 1]"
                    )));
                }
                ValueSpec::Boolean { true_ratio }
            }
            FieldKind::Timestamp => ValueSpec::Timestamp,
            FieldKind::Counter => ValueSpec::Counter {
                start: params.required_i64("start")?,
            },
            FieldKind::SequenceString => ValueSpec::SequenceText {
                prefix: params.required("prefix")?.to_string(),
                start: params.required_i64("start")?,
            },
        };

        Ok(spec)
    }

    /// Produce one value. Sequential kinds advance the sequence for `key`.
    pub fn generate(
        &self,
        key: &SequenceKey,
        ctx: &mut GeneratorContext<'_>,
    ) -> Result<GeneratedValue, GenerationError> {
        let value = match self {
            ValueSpec::Text { min_len, max_len } => {
                let len = ctx.rng.random_range(*min_len..=*max_len);
                GeneratedValue::Text(ctx.lexicon.lexify(len, ctx.rng))
            }
            ValueSpec::Integer { min, max } => {
                GeneratedValue::Int(ctx.rng.random_range(*min..=*max))
            }
            ValueSpec::Float { min, max } => {
                GeneratedValue::Float(ctx.rng.random_range(*min..=*max))
            }
            ValueSpec::Boolean { true_ratio } => {
                GeneratedValue::Bool(ctx.rng.random::<f64>() < *true_ratio)
            }
            ValueSpec::Timestamp => GeneratedValue::Timestamp(ctx.timestamps.sample(ctx.rng)),
            ValueSpec::Counter { start } => {
                GeneratedValue::Int(ctx.sequences.get_and_advance(key, *start)?)
            }
            ValueSpec::SequenceText { prefix, start } => {
                let current = ctx.sequences.get_and_advance(key, *start)?;
                GeneratedValue::Text(format!("{prefix}{current}"))
            }
        };
        Ok(value)
    }
}

struct ConstraintReader<'a> {
    entity: &'a str,
    field: &'a str,
    constraints: &'a Constraints,
}

impl ConstraintReader<'_> {
    fn required(&self, key: &str) -> Result<&ConstraintValue, GenerationError> {
        self.constraints
            .get(key)
            .ok_or_else(|| GenerationError::MissingConstraint {
                entity: self.entity.to_string(),
                field: self.field.to_string(),
                constraint: key.to_string(),
            })
    }

    fn required_i64(&self, key: &str) -> Result<i64, GenerationError> {
        let value = self.required(key)?;
        value.as_i64().ok_or_else(|| {
            self.invalid(format!(
                "'{key}' must be an integer, got {} '{value}'",
                value.type_name()
            ))
        })
    }

    fn required_f64(&self, key: &str) -> Result<f64, GenerationError> {
        let value = self.required(key)?;
        value.as_f64().ok_or_else(|| {
            self.invalid(format!(
                "'{key}' must be a number, got {} '{value}'",
                value.type_name()
            ))
        })
    }

    fn invalid(&self, message: impl Into<String>) -> GenerationError {
        GenerationError::InvalidConstraint {
            entity: self.entity.to_string(),
            field: self.field.to_string(),
            message: message.into(),
        }
    }
}
