use crate::errors::{IssueSeverity, PlanError, Result, ValidationIssue, ValidationReport};
use crate::model::{GeneratorConfig, RelationalPlan};

/// Validate the `config` section against the declared models.
///
/// This checks:
/// - every configured entity has a model
/// - exactly one parent (`rows`) and one child (`rows_per_parent`)
/// - identity and foreign-key field names are usable
pub fn validate_config(config: &GeneratorConfig) -> ValidationReport {
    let mut report = ValidationReport::default();

    for (entity, output) in &config.config {
        let path = format!("config.{entity}");
        if !config.models.contains_key(entity) {
            report.push_error(ValidationIssue::new(
                IssueSeverity::Error,
                "unknown_entity",
                &path,
                format!("entity '{entity}' has no model"),
                Some("declare it under `models`".to_string()),
            ));
        }
        match (output.rows, output.rows_per_parent) {
            (Some(_), Some(_)) => report.push_error(ValidationIssue::new(
                IssueSeverity::Error,
                "conflicting_row_settings",
                &path,
                "set either `rows` or `rows_per_parent`, not both",
                None,
            )),
            (None, None) => report.push_error(ValidationIssue::new(
                IssueSeverity::Error,
                "missing_row_settings",
                &path,
                "expected `rows` (parent) or `rows_per_parent` (child)",
                None,
            )),
            _ => {}
        }
    }

    for entity in config.models.keys() {
        if !config.config.contains_key(entity) {
            report.push_warning(ValidationIssue::new(
                IssueSeverity::Warning,
                "unused_model",
                format!("models.{entity}"),
                format!("model '{entity}' is not generated"),
                None,
            ));
        }
    }

    let parents = entities_with(config, |output| {
        output.rows.is_some() && output.rows_per_parent.is_none()
    });
    let children = entities_with(config, |output| {
        output.rows_per_parent.is_some() && output.rows.is_none()
    });
    if parents.len() != 1 {
        report.push_error(ValidationIssue::new(
            IssueSeverity::Error,
            "parent_entity_count",
            "config",
            format!("expected exactly one parent entity, found {}", parents.len()),
            None,
        ));
    }
    if children.len() != 1 {
        report.push_error(ValidationIssue::new(
            IssueSeverity::Error,
            "child_entity_count",
            "config",
            format!("expected exactly one child entity, found {}", children.len()),
            None,
        ));
    }

    let options = &config.options;
    if options.identity_field.trim().is_empty() || options.foreign_key_field.trim().is_empty() {
        report.push_error(ValidationIssue::new(
            IssueSeverity::Error,
            "invalid_relation_fields",
            "options",
            "identity and foreign-key field names must not be empty",
            None,
        ));
    } else if options.identity_field == options.foreign_key_field {
        report.push_error(ValidationIssue::new(
            IssueSeverity::Error,
            "invalid_relation_fields",
            "options",
            "identity and foreign-key fields must differ",
            None,
        ));
    }

    report
}

/// Validate the configuration and derive its relational plan.
pub fn validated_plan(config: &GeneratorConfig) -> Result<RelationalPlan> {
    let report = validate_config(config);
    if !report.is_ok() {
        return Err(PlanError::InvalidPlan(report));
    }

    let parent = config
        .config
        .iter()
        .find_map(|(entity, output)| output.rows.map(|rows| (entity, rows)));
    let child = config
        .config
        .iter()
        .find_map(|(entity, output)| output.rows_per_parent.map(|rows| (entity, rows)));
    let (Some((parent, parent_row_count)), Some((child, children_per_parent))) = (parent, child)
    else {
        return Err(PlanError::InvalidPlan(report));
    };

    Ok(RelationalPlan {
        parent_entity: parent.clone(),
        child_entity: child.clone(),
        parent_row_count,
        children_per_parent,
        identity_field: config.options.identity_field.clone(),
        foreign_key_field: config.options.foreign_key_field.clone(),
        seed: config.options.seed,
    })
}

fn entities_with(
    config: &GeneratorConfig,
    predicate: impl Fn(&crate::model::EntityOutput) -> bool,
) -> Vec<&str> {
    config
        .config
        .iter()
        .filter(|(_, output)| predicate(output))
        .map(|(entity, _)| entity.as_str())
        .collect()
}
