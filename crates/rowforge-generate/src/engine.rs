use std::time::Instant;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use rowforge_core::{EntitySchema, compile_entity};
use rowforge_plan::{GeneratorConfig, RelationalPlan, validated_plan};

use crate::errors::GenerationError;
use crate::generators::{GeneratedValue, GeneratorContext, TimestampWindow, ValueSpec};
use crate::lexicon::{FakerLexicon, LexicalSource};
use crate::model::{
    EntityReport, EntityRows, GenerateOptions, GenerationReport, RelationalOutput, Row,
};
use crate::output::csv::write_entity_csv;
use crate::sequence::{SequenceKey, SequenceStore};

/// Result of a generation run.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub output: RelationalOutput,
    pub report: GenerationReport,
}

/// Entry point for generating parent/child datasets.
#[derive(Debug, Clone)]
pub struct GenerationEngine<L = FakerLexicon> {
    options: GenerateOptions,
    lexicon: L,
}

impl GenerationEngine {
    pub fn new(options: GenerateOptions) -> Self {
        Self {
            options,
            lexicon: FakerLexicon,
        }
    }
}

impl<L: LexicalSource> GenerationEngine<L> {
    pub fn with_lexicon(options: GenerateOptions, lexicon: L) -> Self {
        Self { options, lexicon }
    }

    /// Load a configuration, generate both entities and write their CSV files.
    ///
    /// Rows are fully generated in memory before any file is written. The
    /// run report is written last, when a report path is set.
    pub fn run(&self, config: &GeneratorConfig) -> Result<GenerationResult, GenerationError> {
        let start = Instant::now();
        let run_id = uuid::Uuid::new_v4().to_string();
        let started_at = chrono::Utc::now().to_rfc3339();

        let plan = validated_plan(config)?;
        let parent = compile_model(config, &plan.parent_entity)?;
        let child = compile_model(config, &plan.child_entity)?;

        info!(
            run_id = %run_id,
            parent = %plan.parent_entity,
            child = %plan.child_entity,
            "generation started"
        );

        let output = self.generate(&parent, &child, &plan)?;

        std::fs::create_dir_all(&self.options.out_dir)?;
        let mut report =
            GenerationReport::new(run_id.clone(), started_at, output.seed, output.reference_time);
        for (entity, role) in [(&output.parent, "parent"), (&output.child, "child")] {
            let path = self.options.out_dir.join(config.output_file(&entity.entity));
            let bytes_written = write_entity_csv(&path, entity)?;
            info!(
                entity = %entity.entity,
                path = %path.display(),
                rows = entity.len(),
                bytes_written,
                "entity written"
            );
            report.record_entity(EntityReport {
                entity: entity.entity.clone(),
                role: role.to_string(),
                rows_generated: entity.len() as u64,
                output_file: path,
                bytes_written,
            });
        }
        report.sequences = output.sequences.clone();
        report.duration_ms = start.elapsed().as_millis() as u64;

        if let Some(report_path) = &self.options.report_path {
            std::fs::write(report_path, serde_json::to_vec_pretty(&report)?)?;
            info!(path = %report_path.display(), "report written");
        }

        info!(
            run_id = %run_id,
            bytes_written = report.bytes_written,
            duration_ms = report.duration_ms,
            "generation completed"
        );

        Ok(GenerationResult { output, report })
    }

    /// Generate parent rows and their child rows in memory.
    ///
    /// Every field is resolved before the first row is produced. Sequence
    /// state is fresh for each call; the timestamp window ends at the
    /// configured reference time, or at the current time when none is set.
    pub fn generate(
        &self,
        parent: &EntitySchema,
        child: &EntitySchema,
        plan: &RelationalPlan,
    ) -> Result<RelationalOutput, GenerationError> {
        if parent.name != plan.parent_entity || child.name != plan.child_entity {
            return Err(GenerationError::InvalidPlan(format!(
                "plan expects '{}' -> '{}', got '{}' -> '{}'",
                plan.parent_entity, plan.child_entity, parent.name, child.name
            )));
        }
        if plan.parent_row_count > 0 && !parent.contains(&plan.identity_field) {
            return Err(GenerationError::MissingIdentityField {
                entity: parent.name.clone(),
                field: plan.identity_field.clone(),
            });
        }

        let parent_fields = compile_fields(parent)?;
        let child_fields = compile_child_fields(parent, child, plan)?;

        let seed = self
            .options
            .seed
            .or(plan.seed)
            .unwrap_or_else(|| rand::rng().random());
        let timestamps = match self.options.reference_time {
            Some(end) => TimestampWindow::ending_at(end),
            None => TimestampWindow::ending_now(),
        };
        debug!(seed, window_end = %timestamps.end, "rng seeded");

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut sequences = SequenceStore::new();
        let mut ctx = GeneratorContext {
            sequences: &mut sequences,
            rng: &mut rng,
            lexicon: &self.lexicon,
            timestamps,
        };

        let parent_columns = parent.field_names().map(String::from).collect();
        let mut parents = EntityRows::new(&parent.name, parent_columns);
        for _ in 0..plan.parent_row_count {
            let mut row = Row::with_capacity(parent_fields.len());
            for field in &parent_fields {
                let value = field.spec.generate(&field.key, &mut ctx)?;
                row.insert(field.key.field.clone(), value);
            }
            parents.rows.push(row);
        }
        info!(entity = %parent.name, rows = parents.len(), "entity generated");

        let mut child_columns: Vec<String> = child.field_names().map(String::from).collect();
        if !child.contains(&plan.foreign_key_field) {
            child_columns.push(plan.foreign_key_field.clone());
        }
        let mut children = EntityRows::new(&child.name, child_columns);
        for parent_row in &parents.rows {
            let parent_id = parent_row.get(&plan.identity_field).cloned().ok_or_else(|| {
                GenerationError::MissingIdentityField {
                    entity: parent.name.clone(),
                    field: plan.identity_field.clone(),
                }
            })?;
            for _ in 0..plan.children_per_parent {
                let row = build_child_row(&child_fields, parent_row, &parent_id, plan, &mut ctx)?;
                children.rows.push(row);
            }
        }
        info!(entity = %child.name, rows = children.len(), "entity generated");

        Ok(RelationalOutput {
            parent: parents,
            child: children,
            seed,
            reference_time: timestamps.end,
            sequences: sequences.high_water_marks(),
        })
    }
}

struct CompiledField {
    key: SequenceKey,
    spec: ValueSpec,
}

/// How a child field gets its value.
enum ChildField {
    Generated(CompiledField),
    Inherited(String),
    ForeignKey,
}

fn compile_model(config: &GeneratorConfig, entity: &str) -> Result<EntitySchema, GenerationError> {
    let raw = config.models.get(entity).ok_or_else(|| {
        GenerationError::InvalidPlan(format!("entity '{entity}' has no model"))
    })?;
    Ok(compile_entity(entity, raw)?)
}

fn compile_field(
    schema: &EntitySchema,
    field: &rowforge_core::Field,
) -> Result<CompiledField, GenerationError> {
    let spec = ValueSpec::compile(&schema.name, field)?;
    debug!(entity = %schema.name, field = %field.name, kind = %field.kind, "field compiled");
    Ok(CompiledField {
        key: SequenceKey::new(&schema.name, &field.name),
        spec,
    })
}

fn compile_fields(schema: &EntitySchema) -> Result<Vec<CompiledField>, GenerationError> {
    schema
        .fields
        .iter()
        .map(|field| compile_field(schema, field))
        .collect()
}

/// Classify child fields. Shared names inherit the parent value, except the
/// identity field (each entity owns its identity) and the foreign key.
fn compile_child_fields(
    parent: &EntitySchema,
    child: &EntitySchema,
    plan: &RelationalPlan,
) -> Result<Vec<ChildField>, GenerationError> {
    child
        .fields
        .iter()
        .map(|field| {
            // Copied fields are resolved too; their constraints must still be valid.
            let compiled = compile_field(child, field)?;
            let source = if field.name == plan.foreign_key_field {
                ChildField::ForeignKey
            } else if field.name != plan.identity_field && parent.contains(&field.name) {
                ChildField::Inherited(field.name.clone())
            } else {
                ChildField::Generated(compiled)
            };
            Ok(source)
        })
        .collect()
}

fn build_child_row(
    fields: &[ChildField],
    parent_row: &Row,
    parent_id: &GeneratedValue,
    plan: &RelationalPlan,
    ctx: &mut GeneratorContext<'_>,
) -> Result<Row, GenerationError> {
    let mut row = Row::with_capacity(fields.len() + 1);
    for field in fields {
        match field {
            ChildField::Generated(compiled) => {
                let value = compiled.spec.generate(&compiled.key, ctx)?;
                row.insert(compiled.key.field.clone(), value);
            }
            ChildField::Inherited(name) => {
                if let Some(value) = parent_row.get(name) {
                    row.insert(name.clone(), value.clone());
                }
            }
            ChildField::ForeignKey => {}
        }
    }
    row.insert(plan.foreign_key_field.clone(), parent_id.clone());
    Ok(row)
}
