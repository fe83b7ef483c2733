// src/migrate/plan.rs
//! Computes every import-statement edit required by a batch of file moves.
//!
//! Planning runs against the pre-move tree: edits are computed for the
//! post-move layout but target each file's current on-disk path, so the
//! external orchestrator applies edits first and moves files second.

use rayon::prelude::*;
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::PathMap;
use crate::error::Result;
use crate::graph::resolver::{self, FileProber, SpecifierKind, SOURCE_EXTENSIONS};
use crate::migrate::cache::SourceCache;
use crate::types::FileMove;

/// Files scanned per rayon work unit.
pub const SCAN_BATCH: usize = 64;

/// Directories never scanned for importers.
const PRUNE_DIRS: &[&str] = &[".git", "node_modules", "dist", "build", "coverage", ".next"];

/// One concrete import edit.
#[derive(Debug, Clone, Serialize)]
pub struct ImportUpdate {
    pub file_path: PathBuf,
    pub line: usize,
    pub old_specifier: String,
    pub new_specifier: String,
    pub kind: SpecifierKind,
    pub is_type_only: bool,
}

/// A path-mapping entry whose target directory is itself being moved.
#[derive(Debug, Clone, Serialize)]
pub struct PathMapUpdate {
    pub pattern: String,
    pub old_target: PathBuf,
    pub new_target: PathBuf,
}

/// The full rewrite plan for a batch of moves.
#[derive(Debug, Clone, Serialize)]
pub struct ImportRewritePlan {
    pub moves: Vec<FileMove>,
    pub updates: Vec<ImportUpdate>,
    pub pathmap_updates: Vec<PathMapUpdate>,
    pub affected_files: BTreeSet<PathBuf>,
}

impl ImportRewritePlan {
    #[must_use]
    pub fn total_updates(&self) -> usize {
        self.updates.len()
    }

    /// Affected files mapped through the moves, for verification after the
    /// physical relocation has happened.
    #[must_use]
    pub fn post_move_files(&self) -> Vec<PathBuf> {
        let move_map: HashMap<&Path, &Path> = self
            .moves
            .iter()
            .map(|m| (m.from_path.as_path(), m.to_path.as_path()))
            .collect();
        self.affected_files
            .iter()
            .map(|f| {
                move_map
                    .get(f.as_path())
                    .map_or_else(|| f.clone(), |to| to.to_path_buf())
            })
            .collect()
    }
}

/// An import occurrence in source text.
#[derive(Debug, Clone)]
pub(crate) struct ImportOccurrence {
    pub line: usize,
    pub specifier: String,
    pub is_type_only: bool,
}

/// Line-based import extraction covering static imports, re-exports,
/// `require(...)` and dynamic `import(...)`.
pub(crate) struct ImportScanner {
    regexes: [Regex; 4],
}

impl ImportScanner {
    pub fn new() -> Result<Self> {
        Ok(Self {
            regexes: [
                Regex::new(r#"from\s+['"]([^'"]+)['"]"#)?,
                Regex::new(r#"require\(\s*['"]([^'"]+)['"]\s*\)"#)?,
                Regex::new(r#"\bimport\(\s*['"]([^'"]+)['"]\s*\)"#)?,
                Regex::new(r#"^\s*import\s+['"]([^'"]+)['"]"#)?,
            ],
        })
    }

    /// Extracts import specifiers with 1-based line numbers.
    pub fn extract(&self, content: &str) -> Vec<ImportOccurrence> {
        let mut occurrences = Vec::new();
        for (idx, line) in content.lines().enumerate() {
            let mut seen: Vec<&str> = Vec::new();
            for regex in &self.regexes {
                for cap in regex.captures_iter(line) {
                    let Some(m) = cap.get(1) else { continue };
                    if seen.contains(&m.as_str()) {
                        continue;
                    }
                    seen.push(m.as_str());
                    occurrences.push(ImportOccurrence {
                        line: idx + 1,
                        specifier: m.as_str().to_string(),
                        is_type_only: line.contains("import type"),
                    });
                }
            }
        }
        occurrences
    }
}

/// Creates the rewrite plan for a batch of moves.
///
/// # Errors
/// Returns an error only for infrastructure failures (e.g. walking the
/// project roots); unreadable individual files are skipped.
pub fn create_plan(
    pathmap: &PathMap,
    moves: &[FileMove],
    cache: &mut SourceCache,
    prober: &dyn FileProber,
) -> Result<ImportRewritePlan> {
    let scanner = ImportScanner::new()?;
    let move_map: HashMap<PathBuf, PathBuf> = moves
        .iter()
        .map(|m| (m.from_path.clone(), m.to_path.clone()))
        .collect();

    let literals = candidate_literals(pathmap, moves);
    let scanned = scan_roots(pathmap, &move_map, &literals);
    for (path, content) in &scanned {
        cache.insert(path.clone(), content.clone());
    }

    let mut affected_files: BTreeSet<PathBuf> = scanned.iter().map(|(p, _)| p.clone()).collect();
    let mut updates = Vec::new();

    for (file, content) in &scanned {
        let file_updates = updates_for_file(&scanner, pathmap, file, content, &move_map, prober);
        if file_updates.is_empty() && !move_map.contains_key(file) {
            affected_files.remove(file);
        }
        updates.extend(file_updates);
    }

    let pathmap_updates = pathmap
        .moved_targets(moves)
        .into_iter()
        .map(|(pattern, old_target, new_target)| PathMapUpdate {
            pattern,
            old_target,
            new_target,
        })
        .collect();

    Ok(ImportRewritePlan {
        moves: moves.to_vec(),
        updates,
        pathmap_updates,
        affected_files,
    })
}

/// Cheap textual pre-filter literals derived from each moved file: bare
/// name, relative forms, and the alias-relative fragment.
fn candidate_literals(pathmap: &PathMap, moves: &[FileMove]) -> Vec<String> {
    let mut literals = Vec::new();
    for mv in moves {
        let stem = mv
            .from_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        if stem.is_empty() {
            continue;
        }
        literals.push(format!("./{stem}"));
        literals.push(format!("../{stem}"));
        literals.push(format!("/{stem}"));
        if let Some(alias) = pathmap.alias_for_path(&strip_extension(&mv.from_path)) {
            literals.push(alias);
        }
    }
    literals.sort();
    literals.dedup();
    literals
}

/// Walks the configured roots and reads candidate source files in bounded
/// parallel batches, keeping moved files and literal matches.
fn scan_roots(
    pathmap: &PathMap,
    move_map: &HashMap<PathBuf, PathBuf>,
    literals: &[String],
) -> Vec<(PathBuf, String)> {
    let mut candidates: Vec<PathBuf> = Vec::new();
    for root in &pathmap.roots {
        let walker = WalkDir::new(root).into_iter().filter_entry(|e| {
            e.file_name()
                .to_str()
                .map_or(true, |name| !PRUNE_DIRS.contains(&name))
        });
        for entry in walker.filter_map(std::result::Result::ok) {
            if entry.file_type().is_file() && is_source_file(entry.path()) {
                candidates.push(entry.into_path());
            }
        }
    }
    candidates.sort();
    candidates.dedup();

    let mut scanned: Vec<(PathBuf, String)> = candidates
        .par_chunks(SCAN_BATCH)
        .flat_map_iter(|chunk| {
            chunk.iter().filter_map(|path| {
                let content = std::fs::read_to_string(path).ok()?;
                let keep = move_map.contains_key(path.as_path())
                    || literals.iter().any(|lit| content.contains(lit));
                keep.then(|| (path.clone(), content))
            })
        })
        .collect();
    scanned.sort_by(|a, b| a.0.cmp(&b.0));
    scanned
}

fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| matches!(ext, "ts" | "tsx" | "js" | "jsx"))
}

/// Recomputes specifiers in one file. A moved importer has every relative
/// import re-evaluated (its own directory changes); other files are only
/// touched where an import resolves to a moved path.
fn updates_for_file(
    scanner: &ImportScanner,
    pathmap: &PathMap,
    file: &Path,
    content: &str,
    move_map: &HashMap<PathBuf, PathBuf>,
    prober: &dyn FileProber,
) -> Vec<ImportUpdate> {
    let importer_new: &Path = move_map.get(file).map_or(file, PathBuf::as_path);
    let mut updates = Vec::new();

    for occurrence in scanner.extract(content) {
        let spec = occurrence.specifier.as_str();
        let new_specifier = match resolver::specifier_kind(spec) {
            SpecifierKind::Relative => {
                let Some(resolved) = resolver::resolve(pathmap, file, spec, prober) else {
                    continue;
                };
                let new_target = move_map.get(&resolved).cloned().unwrap_or(resolved);
                relative_specifier(importer_new, &new_target, spec)
            }
            SpecifierKind::Alias => {
                let Some(resolved) = resolver::resolve(pathmap, file, spec, prober) else {
                    continue;
                };
                let Some(new_target) = move_map.get(&resolved) else {
                    continue;
                };
                alias_specifier(pathmap, new_target, spec)
            }
            SpecifierKind::Absolute | SpecifierKind::Package => continue,
        };

        let Some(new_specifier) = new_specifier else {
            continue;
        };
        if new_specifier != spec {
            updates.push(ImportUpdate {
                file_path: file.to_path_buf(),
                line: occurrence.line,
                old_specifier: spec.to_string(),
                new_specifier,
                kind: resolver::specifier_kind(spec),
                is_type_only: occurrence.is_type_only,
            });
        }
    }

    updates
}

/// Builds a relative specifier from the importer's directory to the target,
/// computing explicit `..` segments through the common ancestor when the
/// target is not below the importer.
fn relative_specifier(importer: &Path, target: &Path, old_spec: &str) -> Option<String> {
    let from_dir = importer.parent()?;
    let shaped = shape_target(target, old_spec);

    let from_parts: Vec<&std::ffi::OsStr> = from_dir.iter().collect();
    let target_parts: Vec<&std::ffi::OsStr> = shaped.iter().collect();

    let common = from_parts
        .iter()
        .zip(target_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let ups = from_parts.len() - common;
    let rest: Vec<String> = target_parts[common..]
        .iter()
        .map(|p| p.to_string_lossy().into_owned())
        .collect();

    let spec = if ups == 0 {
        if rest.is_empty() {
            return None;
        }
        format!("./{}", rest.join("/"))
    } else {
        let mut parts = vec![".."; ups];
        let rest_refs: Vec<&str> = rest.iter().map(String::as_str).collect();
        parts.extend(rest_refs);
        parts.join("/")
    };
    Some(spec)
}

/// Matches the produced path to the original specifier's convention:
/// strips the extension unless the original carried one, and collapses
/// resolved `index.*` files back to their directory when the original
/// imported the directory.
fn shape_target(target: &Path, old_spec: &str) -> PathBuf {
    if resolver::has_source_extension(old_spec) {
        return target.to_path_buf();
    }
    let stripped = strip_extension(target);
    let is_index = stripped
        .file_stem()
        .is_some_and(|s| s == "index");
    let old_names_index = old_spec.ends_with("index") || old_spec.contains("index.");
    if is_index && !old_names_index {
        if let Some(dir) = stripped.parent() {
            return dir.to_path_buf();
        }
    }
    stripped
}

fn strip_extension(path: &Path) -> PathBuf {
    let s = path.to_string_lossy();
    for ext in SOURCE_EXTENSIONS {
        if let Some(stripped) = s.strip_suffix(ext) {
            return PathBuf::from(stripped);
        }
    }
    path.to_path_buf()
}

/// Re-derives an alias specifier from the target's new absolute path.
fn alias_specifier(pathmap: &PathMap, new_target: &Path, old_spec: &str) -> Option<String> {
    let shaped = shape_target(new_target, old_spec);
    pathmap.alias_for_path(&shaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_imports_forms() {
        let content = r#"import { Foo } from './foo';
import type { Bar } from "@/types/bar";
const lazy = import('./lazy');
const legacy = require("./legacy");
import './side-effect';
"#;
        let occurrences = ImportScanner::new().unwrap().extract(content);
        let specs: Vec<&str> = occurrences.iter().map(|o| o.specifier.as_str()).collect();
        assert_eq!(
            specs,
            ["./foo", "@/types/bar", "./lazy", "./legacy", "./side-effect"]
        );
        assert!(occurrences[1].is_type_only);
        assert_eq!(occurrences[0].line, 1);
    }

    #[test]
    fn test_relative_specifier_same_dir() {
        let spec = relative_specifier(
            Path::new("/src/components/App.tsx"),
            Path::new("/src/components/Button.tsx"),
            "./Button",
        )
        .unwrap();
        assert_eq!(spec, "./Button");
    }

    #[test]
    fn test_relative_specifier_needs_parent_segments() {
        let spec = relative_specifier(
            Path::new("/src/domains/auth/Login.tsx"),
            Path::new("/src/shared/Button.tsx"),
            "../shared/Button",
        )
        .unwrap();
        assert_eq!(spec, "../../shared/Button");
    }

    #[test]
    fn test_relative_specifier_preserves_extension_convention() {
        let spec = relative_specifier(
            Path::new("/src/a.ts"),
            Path::new("/src/lib/b.ts"),
            "./old/b.ts",
        )
        .unwrap();
        assert_eq!(spec, "./lib/b.ts");
    }

    #[test]
    fn test_directory_import_stays_directory() {
        let spec = relative_specifier(
            Path::new("/src/a.ts"),
            Path::new("/src/widgets/index.ts"),
            "./components",
        )
        .unwrap();
        assert_eq!(spec, "./widgets");
    }

    #[test]
    fn test_candidate_literals() {
        let moves = vec![FileMove {
            from_path: PathBuf::from("/app/src/components/Login.tsx"),
            to_path: PathBuf::from("/app/src/domains/auth/Login.tsx"),
            from_domain: "auth".to_string(),
            to_domain: "auth".to_string(),
        }];
        let pathmap = PathMap {
            base_dir: PathBuf::from("/app/src"),
            aliases: vec![crate::config::AliasEntry {
                pattern: "@/*".to_string(),
                targets: vec![PathBuf::from("/app/src/*")],
            }],
            roots: vec![PathBuf::from("/app/src")],
        };
        let literals = candidate_literals(&pathmap, &moves);
        assert!(literals.contains(&"./Login".to_string()));
        assert!(literals.contains(&"@/components/Login".to_string()));
    }
}
