// src/migrate/apply.rs
//! Applies a rewrite plan to the files on disk.
//!
//! Edits are grouped per file and applied in descending line order so
//! earlier replacements never shift the line numbers of later ones.
//! Replacement matches the exact quoted specifier text, which makes a
//! second application of the same plan a no-op.

use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::migrate::plan::{ImportRewritePlan, ImportUpdate};

/// Result of applying (or dry-running) a plan.
#[derive(Debug)]
pub struct ApplyOutcome {
    pub files_updated: usize,
    pub imports_updated: usize,
    pub errors: Vec<String>,
    pub updates_by_file: BTreeMap<PathBuf, usize>,
    pub dry_run: bool,
}

/// Applies every import edit in the plan. With `dry_run` the files are
/// read and the edits counted, but nothing is written.
#[must_use]
pub fn apply_plan(plan: &ImportRewritePlan, dry_run: bool) -> ApplyOutcome {
    let mut by_file: BTreeMap<PathBuf, Vec<&ImportUpdate>> = BTreeMap::new();
    for update in &plan.updates {
        by_file.entry(update.file_path.clone()).or_default().push(update);
    }

    let results: Vec<(PathBuf, Result<usize, String>)> = by_file
        .par_iter()
        .map(|(path, updates)| (path.clone(), apply_file(path, updates, dry_run)))
        .collect();

    let mut outcome = ApplyOutcome {
        files_updated: 0,
        imports_updated: 0,
        errors: Vec::new(),
        updates_by_file: BTreeMap::new(),
        dry_run,
    };

    for (path, result) in results {
        match result {
            Ok(0) => {}
            Ok(count) => {
                outcome.files_updated += 1;
                outcome.imports_updated += count;
                outcome.updates_by_file.insert(path, count);
            }
            Err(message) => outcome.errors.push(message),
        }
    }

    outcome
}

/// Applies one file's edits, bottom-up. Returns how many edits took.
fn apply_file(path: &Path, updates: &[&ImportUpdate], dry_run: bool) -> Result<usize, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("{}: read failed: {e}", path.display()))?;

    let mut lines: Vec<String> = content.lines().map(str::to_string).collect();
    let trailing_newline = content.ends_with('\n');

    let mut ordered: Vec<&ImportUpdate> = updates.to_vec();
    ordered.sort_by(|a, b| b.line.cmp(&a.line));

    let mut applied = 0;
    for update in ordered {
        let Some(line) = lines.get_mut(update.line.saturating_sub(1)) else {
            continue;
        };
        if let Some(rewritten) = replace_specifier(line, &update.old_specifier, &update.new_specifier)
        {
            *line = rewritten;
            applied += 1;
        }
    }

    if applied > 0 && !dry_run {
        let mut output = lines.join("\n");
        if trailing_newline {
            output.push('\n');
        }
        std::fs::write(path, output)
            .map_err(|e| format!("{}: write failed: {e}", path.display()))?;
    }

    Ok(applied)
}

/// Replaces the specifier only when it appears quoted, trying each quote
/// style. Returns `None` when the quoted form is absent.
fn replace_specifier(line: &str, old: &str, new: &str) -> Option<String> {
    for quote in ['\'', '"', '`'] {
        let needle = format!("{quote}{old}{quote}");
        if line.contains(&needle) {
            let replacement = format!("{quote}{new}{quote}");
            return Some(line.replacen(&needle, &replacement, 1));
        }
    }
    None
}
