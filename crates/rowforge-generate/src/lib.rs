//! Relational row generation for rowforge.
//!
//! This crate compiles entity schemas into typed value generators, produces
//! parent rows and their dependent child rows with field inheritance and
//! foreign-key propagation, and writes the results as CSV.

pub mod engine;
pub mod errors;
pub mod generators;
pub mod lexicon;
pub mod model;
pub mod output;
pub mod sequence;

pub use engine::{GenerationEngine, GenerationResult};
pub use errors::GenerationError;
pub use generators::{GeneratedValue, GeneratorContext, TimestampWindow, ValueSpec};
pub use lexicon::{FakerLexicon, LexicalSource};
pub use model::{EntityReport, EntityRows, GenerateOptions, GenerationReport, RelationalOutput, Row};
pub use sequence::{SequenceKey, SequenceStore};
