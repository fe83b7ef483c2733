// tests/cli_apply.rs
//! Integration tests for `movecheck plan` and `movecheck apply`.

use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn workspace() -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    let src = dir.path().join("src");
    fs::create_dir_all(src.join("components")).expect("mkdir");

    fs::write(
        src.join("components/Button.tsx"),
        "export const Button = () => null;\n",
    )
    .expect("write");
    fs::write(
        src.join("components/App.tsx"),
        "import { Button } from './Button';\nexport const App = Button;\n",
    )
    .expect("write");

    let records = serde_json::json!([
        {
            "file_path": src.join("components/Button.tsx"),
            "domain": "ui",
            "confidence": 0.95,
            "dependencies": [],
        },
        {
            "file_path": src.join("components/App.tsx"),
            "domain": "ui",
            "confidence": 0.95,
            "dependencies": ["./Button"],
        }
    ]);
    fs::write(
        dir.path().join("records.json"),
        serde_json::to_string(&records).expect("serialize"),
    )
    .expect("write records");

    let moves = serde_json::json!([
        {
            "from_path": src.join("components/Button.tsx"),
            "to_path": src.join("shared/ui/Button.tsx"),
            "from_domain": "ui",
            "to_domain": "shared",
        }
    ]);
    fs::write(
        dir.path().join("moves.json"),
        serde_json::to_string(&moves).expect("serialize"),
    )
    .expect("write moves");

    dir
}

fn run(dir: &TempDir, subcommand: &str, extra: &[&str]) -> std::process::Output {
    let records = dir.path().join("records.json");
    let moves = dir.path().join("moves.json");
    let mut args = vec![
        subcommand.to_string(),
        "--records".to_string(),
        records.to_string_lossy().into_owned(),
        "--moves".to_string(),
        moves.to_string_lossy().into_owned(),
        "--root".to_string(),
        dir.path().to_string_lossy().into_owned(),
    ];
    args.extend(extra.iter().map(|s| (*s).to_string()));

    Command::new(env!("CARGO_BIN_EXE_movecheck"))
        .args(&args)
        .output()
        .expect("run movecheck")
}

fn app_content(dir: &Path) -> String {
    fs::read_to_string(dir.join("src/components/App.tsx")).expect("read App.tsx")
}

#[test]
fn plan_json_contains_report_and_updates() {
    let dir = workspace();
    let output = run(&dir, "plan", &["--json"]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    let value: serde_json::Value = serde_json::from_str(&stdout).expect("stdout is not valid JSON");
    assert_eq!(value["report"]["is_valid"], serde_json::json!(true));
    let updates = value["plan"]["updates"].as_array().expect("updates array");
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0]["old_specifier"], serde_json::json!("./Button"));
    assert_eq!(
        updates[0]["new_specifier"],
        serde_json::json!("../shared/ui/Button")
    );
}

#[test]
fn apply_dry_run_reports_but_writes_nothing() {
    let dir = workspace();
    let before = app_content(dir.path());

    let output = run(&dir, "apply", &["--dry-run"]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(app_content(dir.path()), before);
}

#[test]
fn apply_rewrites_imports_on_disk() {
    let dir = workspace();
    let output = run(&dir, "apply", &[]);
    assert!(
        output.status.success(),
        "stderr: {}\nstdout: {}",
        String::from_utf8_lossy(&output.stderr),
        String::from_utf8_lossy(&output.stdout)
    );
    assert!(app_content(dir.path()).contains("'../shared/ui/Button'"));
}

#[test]
fn apply_refuses_invalid_plan_without_force() {
    // Moving App.tsx into the business domain makes its edge to the ui
    // Button an unlisted cross-domain dependency.
    let dir = workspace();
    let src = dir.path().join("src");
    let moves = serde_json::json!([
        {
            "from_path": src.join("components/App.tsx"),
            "to_path": src.join("business/App.tsx"),
            "from_domain": "ui",
            "to_domain": "business",
        }
    ]);
    fs::write(
        dir.path().join("moves.json"),
        serde_json::to_string(&moves).expect("serialize"),
    )
    .expect("write moves");

    let before = app_content(dir.path());
    let output = run(&dir, "apply", &[]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(app_content(dir.path()), before);
}
