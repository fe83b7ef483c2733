// tests/integration_rewrite.rs
//! Full rewrite flow on a real temp project: plan, apply, physically move
//! the file, verify every rewritten import still resolves.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use movecheck_core::config::PathMap;
use movecheck_core::graph::resolver::FsProber;
use movecheck_core::migrate::{apply_plan, create_plan, verify_imports, SourceCache};
use movecheck_core::types::FileMove;

/// A project where Button.tsx is imported three ways: same-directory
/// relative, parent-walking relative, and via the `@/` alias.
fn project() -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    let src = dir.path().join("src");

    fs::write(
        dir.path().join("tsconfig.json"),
        r#"{
  "compilerOptions": {
    "baseUrl": "src",
    "paths": { "@/*": ["./*"] }
  }
}"#,
    )
    .expect("tsconfig");

    fs::create_dir_all(src.join("components")).expect("mkdir");
    fs::create_dir_all(src.join("pages")).expect("mkdir");
    fs::create_dir_all(src.join("services")).expect("mkdir");

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
    fs::write(
        src.join("pages/Home.tsx"),
        "import { Button } from '../components/Button';\nexport const Home = Button;\n",
    )
    .expect("write");
    fs::write(
        src.join("services/widget.ts"),
        "import type { Button } from '@/components/Button';\nexport type Widget = Button;\n",
    )
    .expect("write");

    dir
}

fn button_move(root: &Path) -> FileMove {
    FileMove {
        from_path: root.join("src/components/Button.tsx"),
        to_path: root.join("src/shared/ui/Button.tsx"),
        from_domain: "ui".to_string(),
        to_domain: "shared".to_string(),
    }
}

#[test]
fn test_three_importers_yield_three_updates() {
    let dir = project();
    let pathmap = PathMap::load(dir.path()).expect("pathmap");
    let moves = vec![button_move(dir.path())];
    let mut cache = SourceCache::new();

    let plan = create_plan(&pathmap, &moves, &mut cache, &FsProber).expect("plan");
    assert_eq!(plan.total_updates(), 3);

    let new_specs: Vec<&str> = plan
        .updates
        .iter()
        .map(|u| u.new_specifier.as_str())
        .collect();
    assert!(new_specs.contains(&"../shared/ui/Button"));
    assert!(new_specs.contains(&"@/shared/ui/Button"));

    let type_only: Vec<_> = plan.updates.iter().filter(|u| u.is_type_only).collect();
    assert_eq!(type_only.len(), 1);
    assert_eq!(type_only[0].old_specifier, "@/components/Button");
}

#[test]
fn test_apply_move_verify_round_trip() {
    let dir = project();
    let pathmap = PathMap::load(dir.path()).expect("pathmap");
    let moves = vec![button_move(dir.path())];
    let mut cache = SourceCache::new();

    let plan = create_plan(&pathmap, &moves, &mut cache, &FsProber).expect("plan");
    let outcome = apply_plan(&plan, false);
    assert_eq!(outcome.imports_updated, 3);
    assert_eq!(outcome.files_updated, 3);
    assert!(outcome.errors.is_empty());

    // Physically relocate the file the way the orchestrator would.
    let mv = &moves[0];
    fs::create_dir_all(mv.to_path.parent().expect("parent")).expect("mkdir");
    fs::rename(&mv.from_path, &mv.to_path).expect("rename");

    let post_files: Vec<PathBuf> = plan.post_move_files();
    let broken = verify_imports(&post_files, &pathmap, &mut cache, &FsProber).expect("verify");
    assert!(broken.is_empty(), "unresolved imports after move: {broken:?}");

    let app = fs::read_to_string(dir.path().join("src/components/App.tsx")).expect("read");
    assert!(app.contains("'../shared/ui/Button'"));
    let widget = fs::read_to_string(dir.path().join("src/services/widget.ts")).expect("read");
    assert!(widget.contains("'@/shared/ui/Button'"));
}

#[test]
fn test_reapplying_a_plan_is_a_no_op() {
    let dir = project();
    let pathmap = PathMap::load(dir.path()).expect("pathmap");
    let moves = vec![button_move(dir.path())];
    let mut cache = SourceCache::new();

    let plan = create_plan(&pathmap, &moves, &mut cache, &FsProber).expect("plan");
    let first = apply_plan(&plan, false);
    assert_eq!(first.imports_updated, 3);

    let second = apply_plan(&plan, false);
    assert_eq!(second.imports_updated, 0);
    assert_eq!(second.files_updated, 0);
}

#[test]
fn test_dry_run_plans_without_touching_disk() {
    let dir = project();
    let pathmap = PathMap::load(dir.path()).expect("pathmap");
    let moves = vec![button_move(dir.path())];
    let mut cache = SourceCache::new();

    let before = fs::read_to_string(dir.path().join("src/components/App.tsx")).expect("read");
    let plan = create_plan(&pathmap, &moves, &mut cache, &FsProber).expect("plan");
    let outcome = apply_plan(&plan, true);
    assert!(outcome.dry_run);
    assert_eq!(outcome.imports_updated, 3);

    let after = fs::read_to_string(dir.path().join("src/components/App.tsx")).expect("read");
    assert_eq!(before, after);
}

#[test]
fn test_moved_importer_gets_its_own_relative_imports_rewritten() {
    // Moving App.tsx (an importer) means its './Button' import must be
    // recomputed from the new directory even though Button never moves.
    let dir = project();
    let pathmap = PathMap::load(dir.path()).expect("pathmap");
    let moves = vec![FileMove {
        from_path: dir.path().join("src/components/App.tsx"),
        to_path: dir.path().join("src/pages/App.tsx"),
        from_domain: "ui".to_string(),
        to_domain: "ui".to_string(),
    }];
    let mut cache = SourceCache::new();

    let plan = create_plan(&pathmap, &moves, &mut cache, &FsProber).expect("plan");
    let app_updates: Vec<_> = plan
        .updates
        .iter()
        .filter(|u| u.file_path == dir.path().join("src/components/App.tsx"))
        .collect();
    assert_eq!(app_updates.len(), 1);
    assert_eq!(app_updates[0].old_specifier, "./Button");
    assert_eq!(app_updates[0].new_specifier, "../components/Button");
}
