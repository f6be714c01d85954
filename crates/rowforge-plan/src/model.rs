use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use rowforge_core::RawFieldDefinition;

pub const DEFAULT_IDENTITY_FIELD: &str = "id";
pub const DEFAULT_FOREIGN_KEY_FIELD: &str = "parent_id";

/// Top-level generator configuration document.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GeneratorConfig {
    /// Entity name to its ordered field list.
    pub models: BTreeMap<String, Vec<RawFieldDefinition>>,
    /// Entity name to row counts and output file.
    pub config: BTreeMap<String, EntityOutput>,
    /// Optional run options.
    #[serde(default)]
    pub options: GenerationOptions,
}

/// Per-entity generation settings.
///
/// The parent entity sets `rows`; the child entity sets `rows_per_parent`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct EntityOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows_per_parent: Option<u64>,
    /// Output CSV path; defaults to `<entity>.csv`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_file: Option<String>,
}

/// Run-wide options.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationOptions {
    /// RNG seed; omitted means a fresh seed per run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Identity field on the parent entity.
    pub identity_field: String,
    /// Foreign-key field injected into every child row.
    pub foreign_key_field: String,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            seed: None,
            identity_field: DEFAULT_IDENTITY_FIELD.to_string(),
            foreign_key_field: DEFAULT_FOREIGN_KEY_FIELD.to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Output file for an entity, falling back to `<entity>.csv`.
    pub fn output_file(&self, entity: &str) -> String {
        self.config
            .get(entity)
            .and_then(|output| output.output_file.clone())
            .unwrap_or_else(|| format!("{entity}.csv"))
    }
}

/// Resolved parent/child generation plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationalPlan {
    pub parent_entity: String,
    pub child_entity: String,
    pub parent_row_count: u64,
    pub children_per_parent: u64,
    pub identity_field: String,
    pub foreign_key_field: String,
    pub seed: Option<u64>,
}

impl RelationalPlan {
    /// Plan with the default `id` / `parent_id` field names and no seed.
    pub fn new(
        parent_entity: impl Into<String>,
        child_entity: impl Into<String>,
        parent_row_count: u64,
        children_per_parent: u64,
    ) -> Self {
        Self {
            parent_entity: parent_entity.into(),
            child_entity: child_entity.into(),
            parent_row_count,
            children_per_parent,
            identity_field: DEFAULT_IDENTITY_FIELD.to_string(),
            foreign_key_field: DEFAULT_FOREIGN_KEY_FIELD.to_string(),
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
