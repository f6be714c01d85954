//! Core contracts for rowforge.
//!
//! This crate defines the field kind vocabulary, the type expression parser,
//! constraint resolution, and the entity schema compiler shared by the
//! generator and the CLI.

pub mod constraints;
pub mod error;
pub mod schema;
pub mod type_expr;
pub mod types;

pub use constraints::{coerce_literal, resolve_constraints};
pub use error::{Error, Result};
pub use schema::{EntitySchema, Field, FieldDefinition, RawFieldDefinition, compile_entity};
pub use type_expr::parse_type_expr;
pub use types::{ConstraintValue, Constraints, FieldKind, ParsedType};
