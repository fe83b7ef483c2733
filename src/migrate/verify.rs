// src/migrate/verify.rs
//! Post-apply verification: re-resolves every rewritten file's imports and
//! reports the specifiers that no longer land on a real file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::PathMap;
use crate::error::Result;
use crate::graph::resolver::{self, FileProber, SpecifierKind};
use crate::migrate::cache::SourceCache;
use crate::migrate::plan::{ImportRewritePlan, ImportScanner};
use crate::types::FileMove;

/// A prober view of the tree as it will look once the external process has
/// performed the moves: from-paths vanish, to-paths appear.
pub struct MoveOverlay<'a> {
    inner: &'a dyn FileProber,
    moves: &'a [FileMove],
}

impl<'a> MoveOverlay<'a> {
    #[must_use]
    pub fn new(inner: &'a dyn FileProber, moves: &'a [FileMove]) -> Self {
        Self { inner, moves }
    }
}

impl FileProber for MoveOverlay<'_> {
    fn is_file(&self, path: &Path) -> bool {
        for mv in self.moves {
            if mv.from_path == path {
                return false;
            }
            if mv.to_path == path {
                return self.inner.is_file(&mv.from_path);
            }
        }
        self.inner.is_file(path)
    }
}

/// Re-resolves relative and alias imports in the given files. Returns a map
/// from file to the specifiers that fail to resolve; an empty map means the
/// rewrite left every import intact. Unreadable files get a single entry.
///
/// # Errors
/// Fails only on scanner construction; per-file read failures are reported
/// as entries in the map.
pub fn verify_imports(
    files: &[PathBuf],
    pathmap: &PathMap,
    cache: &mut SourceCache,
    prober: &dyn FileProber,
) -> Result<BTreeMap<PathBuf, Vec<String>>> {
    let scanner = ImportScanner::new()?;
    let mut broken: BTreeMap<PathBuf, Vec<String>> = BTreeMap::new();

    for file in files {
        let content = match cache.read(file) {
            Ok(content) => content.to_string(),
            Err(e) => {
                broken.insert(file.clone(), vec![format!("unreadable: {e}")]);
                continue;
            }
        };

        let failures = unresolved_specifiers(&scanner, pathmap, file, &content, prober);
        if !failures.is_empty() {
            broken.insert(file.clone(), failures);
        }
    }

    Ok(broken)
}

/// Verifies a freshly applied plan before the physical moves happen: each
/// affected file is read at its current path, but its imports are resolved
/// from the post-move location against a [`MoveOverlay`] of the tree.
///
/// # Errors
/// Fails only on scanner construction.
pub fn verify_plan(
    plan: &ImportRewritePlan,
    pathmap: &PathMap,
    cache: &mut SourceCache,
    prober: &dyn FileProber,
) -> Result<BTreeMap<PathBuf, Vec<String>>> {
    let scanner = ImportScanner::new()?;
    let overlay = MoveOverlay::new(prober, &plan.moves);
    let mut broken: BTreeMap<PathBuf, Vec<String>> = BTreeMap::new();

    for file in &plan.affected_files {
        let content = match cache.read(file) {
            Ok(content) => content.to_string(),
            Err(e) => {
                broken.insert(file.clone(), vec![format!("unreadable: {e}")]);
                continue;
            }
        };

        let future_path = plan
            .moves
            .iter()
            .find(|mv| &mv.from_path == file)
            .map_or(file.as_path(), |mv| mv.to_path.as_path());

        let failures = unresolved_specifiers(&scanner, pathmap, future_path, &content, &overlay);
        if !failures.is_empty() {
            broken.insert(file.clone(), failures);
        }
    }

    Ok(broken)
}

fn unresolved_specifiers(
    scanner: &ImportScanner,
    pathmap: &PathMap,
    file: &Path,
    content: &str,
    prober: &dyn FileProber,
) -> Vec<String> {
    scanner
        .extract(content)
        .into_iter()
        .filter_map(|occurrence| {
            let spec = occurrence.specifier;
            match resolver::specifier_kind(&spec) {
                SpecifierKind::Relative | SpecifierKind::Alias => {
                    if resolver::resolve(pathmap, file, &spec, prober).is_none() {
                        Some(format!("line {}: {spec}", occurrence.line))
                    } else {
                        None
                    }
                }
                // Package and absolute imports are outside the rewriter's
                // responsibility.
                SpecifierKind::Absolute | SpecifierKind::Package => None,
            }
        })
        .collect()
}
