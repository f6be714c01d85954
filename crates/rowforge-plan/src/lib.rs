//! Generation configuration contracts and validation.
//!
//! A configuration file carries the entity models, the per-entity row counts
//! and output files, and optional run options. This crate loads it and
//! derives the parent/child [`RelationalPlan`] the generator executes.

pub mod errors;
pub mod load;
pub mod model;
pub mod schema;
pub mod validate;

pub use errors::{IssueSeverity, PlanError, Result, ValidationIssue, ValidationReport};
pub use load::{ConfigFormat, load_config, parse_config};
pub use model::{EntityOutput, GenerationOptions, GeneratorConfig, RelationalPlan};
pub use schema::config_json_schema;
pub use validate::{validate_config, validated_plan};
