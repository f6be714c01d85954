use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::GenerationError;

/// Identity of a sequence: the owning entity and the field name.
///
/// Two entities declaring a `count` field with the same name draw from
/// separate sequences.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SequenceKey {
    pub entity: String,
    pub field: String,
}

impl SequenceKey {
    pub fn new(entity: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            field: field.into(),
        }
    }
}

impl fmt::Display for SequenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.entity, self.field)
    }
}

/// Next value to dispense per sequence, scoped to one generation run.
#[derive(Debug, Default, Clone)]
pub struct SequenceStore {
    next: HashMap<SequenceKey, i64>,
}

impl SequenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the current value for `key` and advance it by one.
    ///
    /// An unseen key starts at `start`; later calls ignore `start`.
    pub fn get_and_advance(&mut self, key: &SequenceKey, start: i64) -> Result<i64, GenerationError> {
        let slot = self.next.entry(key.clone()).or_insert(start);
        let current = *slot;
        *slot = current
            .checked_add(1)
            .ok_or_else(|| GenerationError::SequenceExhausted(key.to_string()))?;
        Ok(current)
    }

    /// Next value without advancing; `None` for unseen keys.
    pub fn peek(&self, key: &SequenceKey) -> Option<i64> {
        self.next.get(key).copied()
    }

    /// Forget every sequence.
    pub fn clear(&mut self) {
        self.next.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.next.is_empty()
    }

    /// Last dispensed value per sequence, keyed `entity.field`.
    pub fn high_water_marks(&self) -> BTreeMap<String, i64> {
        self.next
            .iter()
            .map(|(key, next)| (key.to_string(), next.saturating_sub(1)))
            .collect()
    }
}
