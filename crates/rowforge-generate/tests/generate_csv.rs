use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rowforge_generate::{GenerateOptions, GenerationEngine, GenerationError};
use rowforge_plan::{ConfigFormat, GeneratorConfig, load_config, parse_config};

fn demo_config() -> GeneratorConfig {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/models.yml");
    load_config(&path).expect("load demo config")
}

fn temp_out_dir(label: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!("rowforge_generate_{label}_{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("create temp out dir");
    dir
}

fn engine(out_dir: &Path) -> GenerationEngine {
    let options = GenerateOptions {
        out_dir: out_dir.to_path_buf(),
        ..GenerateOptions::default()
    };
    GenerationEngine::new(options)
}

#[test]
fn writes_one_csv_per_entity_with_declared_headers() {
    let out_dir = temp_out_dir("headers");
    let result = engine(&out_dir).run(&demo_config()).expect("run generation");

    let parents = fs::read_to_string(out_dir.join("parents.csv")).expect("read parents.csv");
    let children = fs::read_to_string(out_dir.join("children.csv")).expect("read children.csv");

    assert_eq!(parents.lines().next(), Some("id,name,created_at"));
    assert_eq!(
        children.lines().next(),
        Some("id,name,hobby,code,score,active,birth_date,created_at,parent_id")
    );
    assert_eq!(parents.lines().count(), 1 + 10);
    assert_eq!(children.lines().count(), 1 + 30);

    let report = &result.report;
    assert_eq!(report.seed, 42);
    assert_eq!(report.entities.len(), 2);
    assert_eq!(report.entities[0].rows_generated, 10);
    assert_eq!(report.entities[1].rows_generated, 30);
    assert_eq!(
        report.bytes_written,
        (parents.len() + children.len()) as u64
    );
    assert_eq!(report.sequences.get("Child.code"), Some(&1029));
}

#[test]
fn seeded_runs_with_reference_time_are_byte_identical() {
    let config = demo_config();
    let reference_time = NaiveDate::from_ymd_opt(2024, 6, 1)
        .and_then(|date| date.and_hms_opt(12, 0, 0))
        .expect("valid date");

    let run = |label: &str| {
        let out_dir = temp_out_dir(label);
        let options = GenerateOptions {
            out_dir: out_dir.clone(),
            seed: None,
            reference_time: Some(reference_time),
            report_path: None,
        };
        let result = GenerationEngine::new(options)
            .run(&config)
            .expect("run generation");
        assert_eq!(result.report.reference_time, reference_time);
        out_dir
    };

    let dir_a = run("seed_a");
    std::thread::sleep(std::time::Duration::from_millis(1100));
    let dir_b = run("seed_b");

    for file in ["parents.csv", "children.csv"] {
        let a = fs::read_to_string(dir_a.join(file)).expect("read A");
        let b = fs::read_to_string(dir_b.join(file)).expect("read B");
        assert_eq!(a, b, "{file} should be deterministic");
    }
}

#[test]
fn seed_option_overrides_configured_seed() {
    let out_dir = temp_out_dir("seed_override");
    let options = GenerateOptions {
        out_dir: out_dir.clone(),
        seed: Some(5),
        reference_time: None,
        report_path: None,
    };

    let result = GenerationEngine::new(options)
        .run(&demo_config())
        .expect("run generation");
    assert_eq!(result.report.seed, 5);
}

#[test]
fn report_is_written_as_json_when_requested() {
    let out_dir = temp_out_dir("report");
    let report_path = out_dir.join("report.json");
    let options = GenerateOptions {
        out_dir: out_dir.clone(),
        report_path: Some(report_path.clone()),
        ..GenerateOptions::default()
    };

    let result = GenerationEngine::new(options)
        .run(&demo_config())
        .expect("run generation");

    let contents = fs::read_to_string(&report_path).expect("read report");
    let report: serde_json::Value = serde_json::from_str(&contents).expect("report json");
    assert_eq!(report["run_id"], result.report.run_id.as_str());
    assert_eq!(report["seed"], 42);
    assert_eq!(report["entities"][1]["rows_generated"], 30);
    assert_eq!(report["sequences"]["Child.code"], 1029);
}

#[test]
fn unreachable_report_path_is_an_io_error() {
    let out_dir = temp_out_dir("report_missing_dir");
    let options = GenerateOptions {
        out_dir: out_dir.clone(),
        report_path: Some(out_dir.join("missing").join("report.json")),
        ..GenerateOptions::default()
    };

    let err = GenerationEngine::new(options).run(&demo_config()).unwrap_err();
    assert!(matches!(err, GenerationError::Io(_)));
}

#[test]
fn unsupported_type_aborts_before_writing() {
    let yaml = r#"
models:
  Parent: ["id: count", "status: enum"]
  Child: ["id: count"]
config:
  Parent: {rows: 3, output_file: p.csv}
  Child: {rows_per_parent: 1, output_file: c.csv}
"#;
    let config = parse_config(yaml, ConfigFormat::Yaml).expect("parse yaml");
    let out_dir = temp_out_dir("unsupported");

    let err = engine(&out_dir).run(&config).unwrap_err();
    let GenerationError::Schema(schema_err) = err else {
        panic!("expected schema error, got {err:?}");
    };
    assert_eq!(
        schema_err.root(),
        &rowforge_core::Error::UnsupportedType("enum".to_string())
    );
    assert!(!out_dir.join("p.csv").exists());
    assert!(!out_dir.join("c.csv").exists());
}

#[test]
fn invalid_configs_surface_plan_errors() {
    let yaml = r#"
models:
  Parent: ["id: count"]
config:
  Parent: {rows: 3}
"#;
    let config = parse_config(yaml, ConfigFormat::Yaml).expect("parse yaml");
    let out_dir = temp_out_dir("invalid_plan");

    let err = engine(&out_dir).run(&config).unwrap_err();
    assert!(matches!(err, GenerationError::Plan(_)));
}
