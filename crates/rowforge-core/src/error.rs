use thiserror::Error;

/// Core error type shared across rowforge crates.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The type expression names a kind outside the supported vocabulary.
    #[error("unsupported field type: '{0}'")]
    UnsupportedType(String),
    /// A parameter inside `( ... )` is not a `key=value` pair.
    #[error("malformed constraint: '{0}'")]
    MalformedConstraint(String),
    /// The same field name appears twice in one entity.
    #[error("duplicate field name '{field}' in entity '{entity}'")]
    DuplicateFieldName { entity: String, field: String },
    /// A raw field entry could not be split into name and type expression.
    #[error("invalid field definition in entity '{entity}': {message}")]
    InvalidFieldDefinition { entity: String, message: String },
    /// A parse failure attributed to a specific entity field.
    #[error("{entity}.{field}: {source}")]
    Field {
        entity: String,
        field: String,
        source: Box<Error>,
    },
}

impl Error {
    /// Returns the innermost error, skipping entity/field context.
    pub fn root(&self) -> &Error {
        match self {
            Error::Field { source, .. } => source.root(),
            other => other,
        }
    }

    pub(crate) fn in_field(self, entity: &str, field: &str) -> Self {
        Error::Field {
            entity: entity.to_string(),
            field: field.to_string(),
            source: Box::new(self),
        }
    }
}

/// Convenience alias for results returned by rowforge crates.
pub type Result<T> = std::result::Result<T, Error>;
