// tests/cli_check.rs
//! Integration tests for the `movecheck check` subcommand: exit codes and
//! JSON output shape.

use std::fs;
use std::process::Command;
use tempfile::TempDir;

/// Writes a project with two on-disk files and classifier records for them.
/// `deps` are the raw specifiers assigned to the first file.
fn workspace(first_domain: &str, second_domain: &str, deps: &[&str]) -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    let src = dir.path().join("src");
    fs::create_dir_all(&src).expect("mkdir");
    fs::write(src.join("a.ts"), "export const a = 1;\n").expect("write a");
    fs::write(src.join("b.ts"), "export const b = 2;\n").expect("write b");

    let records = serde_json::json!([
        {
            "file_path": src.join("a.ts"),
            "domain": first_domain,
            "confidence": 0.95,
            "dependencies": deps,
        },
        {
            "file_path": src.join("b.ts"),
            "domain": second_domain,
            "confidence": 0.95,
            "dependencies": [],
        }
    ]);
    fs::write(
        dir.path().join("records.json"),
        serde_json::to_string_pretty(&records).expect("serialize"),
    )
    .expect("write records");

    dir
}

fn run_check(dir: &TempDir, extra: &[&str]) -> std::process::Output {
    let records = dir.path().join("records.json");
    let mut args = vec![
        "check".to_string(),
        "--records".to_string(),
        records.to_string_lossy().into_owned(),
        "--root".to_string(),
        dir.path().to_string_lossy().into_owned(),
    ];
    args.extend(extra.iter().map(|s| (*s).to_string()));

    Command::new(env!("CARGO_BIN_EXE_movecheck"))
        .args(&args)
        .output()
        .expect("run movecheck")
}

#[test]
fn check_clean_project_exits_zero() {
    let dir = workspace("auth", "auth", &["./b"]);
    let output = run_check(&dir, &[]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
}

#[test]
fn check_forbidden_import_exits_one() {
    // auth forbids business in the built-in ontology.
    let dir = workspace("auth", "business", &["./b"]);
    let output = run_check(&dir, &[]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn check_json_emits_report_fields() {
    let dir = workspace("auth", "auth", &["./b"]);
    let output = run_check(&dir, &["--json"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let value: serde_json::Value = serde_json::from_str(&stdout).expect("stdout is not valid JSON");
    let obj = value.as_object().expect("JSON root must be an object");
    assert_eq!(obj["is_valid"], serde_json::Value::Bool(true));
    assert!(obj.contains_key("domain_violations"));
    assert!(obj.contains_key("cyclic_dependencies"));
    assert!(obj.contains_key("statistics"));
    assert_eq!(obj["total_files"], serde_json::json!(2));
}

#[test]
fn check_custom_ontology_overrides_builtin() {
    // A permissive ontology that lets auth depend on business.
    let dir = workspace("auth", "business", &["./b"]);
    fs::write(
        dir.path().join("ontology.toml"),
        "[domains.auth]\nallowed_domains = [\"business\"]\n\n[domains.business]\n",
    )
    .expect("write ontology");

    let ontology = dir.path().join("ontology.toml");
    let output = run_check(&dir, &["--ontology", &ontology.to_string_lossy()]);
    assert!(output.status.success());
}
