use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::generators::GeneratedValue;

/// One generated entity instance, indexed by field name.
pub type Row = HashMap<String, GeneratedValue>;

/// Options for the generation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Directory relative output files are written under.
    pub out_dir: PathBuf,
    /// Seed override; takes precedence over the configured seed.
    pub seed: Option<u64>,
    /// End of the timestamp window. Defaults to the current UTC time, which
    /// makes timestamp columns differ between otherwise identical runs.
    pub reference_time: Option<NaiveDateTime>,
    /// Where to write the JSON run report, if anywhere.
    pub report_path: Option<PathBuf>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("."),
            seed: None,
            reference_time: None,
            report_path: None,
        }
    }
}

/// Rows produced for one entity, with their output column order.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRows {
    pub entity: String,
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl EntityRows {
    pub fn new(entity: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            entity: entity.into(),
            columns,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of one column in row order.
    pub fn column_values<'a>(
        &'a self,
        column: &'a str,
    ) -> impl Iterator<Item = Option<&'a GeneratedValue>> + 'a {
        self.rows.iter().map(move |row| row.get(column))
    }
}

/// Parent rows and child rows of one relational run.
#[derive(Debug, Clone)]
pub struct RelationalOutput {
    pub parent: EntityRows,
    pub child: EntityRows,
    /// Seed the run's RNG was created from.
    pub seed: u64,
    /// End of the timestamp window the run sampled from.
    pub reference_time: NaiveDateTime,
    /// Last value dispensed per sequence, keyed `entity.field`.
    pub sequences: BTreeMap<String, i64>,
}

/// Summary of one generated entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityReport {
    pub entity: String,
    pub role: String,
    pub rows_generated: u64,
    pub output_file: PathBuf,
    pub bytes_written: u64,
}

/// Report for a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub run_id: String,
    pub started_at: String,
    pub seed: u64,
    pub reference_time: NaiveDateTime,
    pub entities: Vec<EntityReport>,
    pub sequences: BTreeMap<String, i64>,
    pub bytes_written: u64,
    pub duration_ms: u64,
}

impl GenerationReport {
    pub fn new(
        run_id: String,
        started_at: String,
        seed: u64,
        reference_time: NaiveDateTime,
    ) -> Self {
        Self {
            run_id,
            started_at,
            seed,
            reference_time,
            entities: Vec::new(),
            sequences: BTreeMap::new(),
            bytes_written: 0,
            duration_ms: 0,
        }
    }

    pub fn record_entity(&mut self, report: EntityReport) {
        self.bytes_written = self.bytes_written.saturating_add(report.bytes_written);
        self.entities.push(report);
    }
}
