use std::collections::{BTreeMap, HashSet};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::type_expr::parse_type_expr;
use crate::types::{Constraints, FieldKind};

/// One entry of an entity's field list as written in the configuration.
///
/// Accepts both `"name: type_expr"` and `{name: type_expr}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum RawFieldDefinition {
    Inline(String),
    Mapping(BTreeMap<String, String>),
}

impl From<&str> for RawFieldDefinition {
    fn from(value: &str) -> Self {
        RawFieldDefinition::Inline(value.to_string())
    }
}

impl RawFieldDefinition {
    /// Split the entry into field name and type expression.
    pub fn definition(&self, entity: &str) -> Result<FieldDefinition> {
        let (name, type_expression) = match self {
            RawFieldDefinition::Inline(text) => text.split_once(':').ok_or_else(|| {
                Error::InvalidFieldDefinition {
                    entity: entity.to_string(),
                    message: format!("expected 'name: type', got '{text}'"),
                }
            })?,
            RawFieldDefinition::Mapping(map) => {
                let mut entries = map.iter();
                match (entries.next(), entries.next()) {
                    (Some((name, expr)), None) => (name.as_str(), expr.as_str()),
                    _ => {
                        return Err(Error::InvalidFieldDefinition {
                            entity: entity.to_string(),
                            message: format!(
                                "field mapping must have exactly one key, found {}",
                                map.len()
                            ),
                        });
                    }
                }
            }
        };

        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidFieldDefinition {
                entity: entity.to_string(),
                message: "field name must not be empty".to_string(),
            });
        }

        Ok(FieldDefinition {
            name: name.to_string(),
            type_expression: type_expression.trim().to_string(),
        })
    }
}

/// Field name paired with its unparsed type expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    pub type_expression: String,
}

/// Compiled field: name, kind and merged constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub kind: FieldKind,
    pub constraints: Constraints,
}

/// Ordered field table for one entity.
///
/// Field order is the output column order and the per-row generation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySchema {
    pub name: String,
    pub fields: Vec<Field>,
}

impl EntitySchema {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Compile an entity's raw field list into its ordered schema.
pub fn compile_entity(entity: &str, raw_fields: &[RawFieldDefinition]) -> Result<EntitySchema> {
    let mut seen = HashSet::new();
    let mut fields = Vec::with_capacity(raw_fields.len());

    for raw in raw_fields {
        let definition = raw.definition(entity)?;
        if !seen.insert(definition.name.clone()) {
            return Err(Error::DuplicateFieldName {
                entity: entity.to_string(),
                field: definition.name,
            });
        }

        let parsed = parse_type_expr(&definition.type_expression)
            .map_err(|err| err.in_field(entity, &definition.name))?;
        fields.push(Field {
            name: definition.name,
            kind: parsed.kind,
            constraints: parsed.constraints,
        });
    }

    Ok(EntitySchema {
        name: entity.to_string(),
        fields,
    })
}
