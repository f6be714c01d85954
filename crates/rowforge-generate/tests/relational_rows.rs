use chrono::NaiveDate;
use rowforge_core::{EntitySchema, RawFieldDefinition, compile_entity};
use rowforge_generate::{GenerateOptions, GeneratedValue, GenerationEngine, GenerationError};
use rowforge_plan::RelationalPlan;

fn schema(entity: &str, fields: &[&str]) -> EntitySchema {
    let raw: Vec<RawFieldDefinition> = fields.iter().map(|field| (*field).into()).collect();
    compile_entity(entity, &raw).expect("compile schema")
}

fn engine() -> GenerationEngine {
    GenerationEngine::new(GenerateOptions::default())
}

fn ints(values: Vec<Option<&GeneratedValue>>) -> Vec<i64> {
    values
        .into_iter()
        .map(|value| value.and_then(GeneratedValue::as_i64).expect("integer value"))
        .collect()
}

#[test]
fn round_trip_parent_and_child_ids() {
    let parent = schema("Parent", &["id: count(start=1)", "name: str(min=3,max=3)"]);
    let child = schema(
        "Child",
        &["id: count(start=1)", "name: str(min=2,max=2)", "parent_id: int"],
    );
    let plan = RelationalPlan::new("Parent", "Child", 2, 2).with_seed(7);

    let output = engine().generate(&parent, &child, &plan).expect("generate");

    assert_eq!(ints(output.parent.column_values("id").collect()), vec![1, 2]);
    assert_eq!(ints(output.child.column_values("id").collect()), vec![1, 2, 3, 4]);
    assert_eq!(
        ints(output.child.column_values("parent_id").collect()),
        vec![1, 1, 2, 2]
    );
    assert_eq!(output.parent.columns, vec!["id", "name"]);
    assert_eq!(output.child.columns, vec!["id", "name", "parent_id"]);
    assert_eq!(output.sequences.get("Parent.id"), Some(&2));
    assert_eq!(output.sequences.get("Child.id"), Some(&4));
}

#[test]
fn shared_fields_are_copied_from_the_owning_parent() {
    let parent = schema(
        "Parent",
        &["id: count", "name: str(min=3,max=3)", "created_at: timestamp"],
    );
    let child = schema(
        "Child",
        &["id: count", "name: str(min=2,max=2)", "created_at: timestamp", "hobby: str"],
    );
    let plan = RelationalPlan::new("Parent", "Child", 5, 3).with_seed(11);

    let output = engine().generate(&parent, &child, &plan).expect("generate");

    assert_eq!(output.child.len(), 15);
    for (index, child_row) in output.child.rows.iter().enumerate() {
        let parent_row = &output.parent.rows[index / 3];
        assert_eq!(child_row.get("name"), parent_row.get("name"));
        assert_eq!(child_row.get("created_at"), parent_row.get("created_at"));
        assert_eq!(child_row.get("parent_id"), parent_row.get("id"));
        let name_len = child_row
            .get("name")
            .and_then(GeneratedValue::as_str)
            .map(|name| name.chars().count());
        assert_eq!(name_len, Some(3));
    }
}

#[test]
fn foreign_key_is_appended_when_not_declared() {
    let parent = schema("Parent", &["id: str_seq(prefix=P-)"]);
    let child = schema("Child", &["id: count"]);
    let plan = RelationalPlan::new("Parent", "Child", 2, 1).with_seed(1);

    let output = engine().generate(&parent, &child, &plan).expect("generate");

    assert_eq!(output.child.columns, vec!["id", "parent_id"]);
    let parent_ids: Vec<String> = output
        .child
        .column_values("parent_id")
        .map(|value| value.map(GeneratedValue::to_csv).unwrap_or_default())
        .collect();
    assert_eq!(parent_ids, vec!["P-1", "P-2"]);
}

#[test]
fn custom_relation_field_names_are_honoured() {
    let parent = schema("Team", &["team_no: count(start=10)", "label: str(min=4,max=4)"]);
    let child = schema("Player", &["player_no: count", "team_ref: int"]);
    let mut plan = RelationalPlan::new("Team", "Player", 2, 2).with_seed(3);
    plan.identity_field = "team_no".to_string();
    plan.foreign_key_field = "team_ref".to_string();

    let output = engine().generate(&parent, &child, &plan).expect("generate");

    assert_eq!(
        ints(output.child.column_values("team_ref").collect()),
        vec![10, 10, 11, 11]
    );
}

#[test]
fn zero_parent_rows_produce_empty_collections() {
    let parent = schema("Parent", &["id: count"]);
    let child = schema("Child", &["id: count", "parent_id: int"]);
    let plan = RelationalPlan::new("Parent", "Child", 0, 5);

    let output = engine().generate(&parent, &child, &plan).expect("generate");

    assert!(output.parent.is_empty());
    assert!(output.child.is_empty());
    assert!(output.sequences.is_empty());
}

#[test]
fn zero_children_per_parent_is_not_an_error() {
    let parent = schema("Parent", &["id: count"]);
    let child = schema("Child", &["id: count"]);
    let plan = RelationalPlan::new("Parent", "Child", 4, 0);

    let output = engine().generate(&parent, &child, &plan).expect("generate");

    assert_eq!(output.parent.len(), 4);
    assert!(output.child.is_empty());
}

#[test]
fn empty_parent_schema_requires_zero_rows() {
    let parent = schema("Parent", &[]);
    let child = schema("Child", &["id: count"]);

    let output = engine()
        .generate(&parent, &child, &RelationalPlan::new("Parent", "Child", 0, 2))
        .expect("zero rows is allowed");
    assert!(output.parent.is_empty());

    let err = engine()
        .generate(&parent, &child, &RelationalPlan::new("Parent", "Child", 1, 2))
        .unwrap_err();
    assert!(matches!(
        err,
        GenerationError::MissingIdentityField { ref entity, ref field }
            if entity == "Parent" && field == "id"
    ));
}

#[test]
fn invalid_child_constraints_fail_before_any_rows() {
    let parent = schema("Parent", &["id: count", "age: int"]);
    let child = schema("Child", &["id: count", "age: int(min=5, max=1)"]);
    let plan = RelationalPlan::new("Parent", "Child", 3, 3);

    let err = engine().generate(&parent, &child, &plan).unwrap_err();
    assert!(matches!(err, GenerationError::InvalidConstraint { .. }));
}

#[test]
fn same_seed_reproduces_rows() {
    let parent = schema(
        "Parent",
        &["id: count", "name: str(min=5, max=20)", "score: float", "active: boolean"],
    );
    let child = schema("Child", &["id: count", "hobby: str(min=5, max=10)", "parent_id: int"]);
    let plan = RelationalPlan::new("Parent", "Child", 10, 3).with_seed(42);

    let first = engine().generate(&parent, &child, &plan).expect("first run");
    let second = engine().generate(&parent, &child, &plan).expect("second run");

    assert_eq!(first.parent.rows, second.parent.rows);
    assert_eq!(first.child.rows, second.child.rows);
}

#[test]
fn same_seed_and_reference_time_reproduce_timestamps() {
    let parent = schema("Parent", &["id: count", "created_at: timestamp"]);
    let child = schema("Child", &["id: count", "birth_date: timestamp", "created_at: timestamp"]);
    let plan = RelationalPlan::new("Parent", "Child", 6, 2).with_seed(42);
    let reference_time = NaiveDate::from_ymd_opt(2024, 6, 1)
        .and_then(|date| date.and_hms_opt(12, 0, 0))
        .expect("valid date");
    let options = GenerateOptions {
        reference_time: Some(reference_time),
        ..GenerateOptions::default()
    };

    let first = GenerationEngine::new(options.clone())
        .generate(&parent, &child, &plan)
        .expect("first run");
    std::thread::sleep(std::time::Duration::from_millis(1100));
    let second = GenerationEngine::new(options)
        .generate(&parent, &child, &plan)
        .expect("second run");

    assert_eq!(first.reference_time, reference_time);
    assert_eq!(first.parent.rows, second.parent.rows);
    assert_eq!(first.child.rows, second.child.rows);
    for value in first.child.column_values("birth_date") {
        let ts = value
            .and_then(GeneratedValue::as_timestamp)
            .expect("timestamp value");
        assert!(ts <= reference_time);
    }
}

#[test]
fn sequences_reset_between_runs() {
    let parent = schema("Parent", &["id: count(start=100)"]);
    let child = schema("Child", &["code: str_seq(prefix=C, start=5)"]);
    let plan = RelationalPlan::new("Parent", "Child", 2, 1);
    let engine = engine();

    for _ in 0..2 {
        let output = engine.generate(&parent, &child, &plan).expect("generate");
        assert_eq!(ints(output.parent.column_values("id").collect()), vec![100, 101]);
        let codes: Vec<String> = output
            .child
            .column_values("code")
            .map(|value| value.map(GeneratedValue::to_csv).unwrap_or_default())
            .collect();
        assert_eq!(codes, vec!["C5", "C6"]);
    }
}

#[test]
fn schemas_must_match_the_plan() {
    let parent = schema("Parent", &["id: count"]);
    let child = schema("Child", &["id: count"]);
    let plan = RelationalPlan::new("Child", "Parent", 1, 1);

    let err = engine().generate(&parent, &child, &plan).unwrap_err();
    assert!(matches!(err, GenerationError::InvalidPlan(_)));
}
