use thiserror::Error;

/// Errors emitted by the generation engine.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("schema error: {0}")]
    Schema(#[from] rowforge_core::Error),
    #[error("plan error: {0}")]
    Plan(#[from] rowforge_plan::PlanError),
    #[error("invalid plan: {0}")]
    InvalidPlan(String),
    /// A kind's required constraint is absent after defaulting.
    #[error("{entity}.{field}: missing constraint '{constraint}'")]
    MissingConstraint {
        entity: String,
        field: String,
        constraint: String,
    },
    #[error("{entity}.{field}: invalid constraint: {message}")]
    InvalidConstraint {
        entity: String,
        field: String,
        message: String,
    },
    #[error("entity '{entity}' has no identity field '{field}'")]
    MissingIdentityField { entity: String, field: String },
    #[error("sequence '{0}' exhausted")]
    SequenceExhausted(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}
