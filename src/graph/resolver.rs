// src/graph/resolver.rs
//! Resolves import specifiers to files on disk, reproducing TypeScript
//! module-resolution semantics closely enough to rewrite working code.

use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::config::PathMap;

/// Candidate suffixes probed in fixed order. The empty suffix matches an
/// exact on-disk path; the `/index.*` forms match directory imports.
pub const PROBE_SUFFIXES: &[&str] = &["", ".tsx", ".ts", ".jsx", ".js", "/index.tsx", "/index.ts"];

/// Extensions a specifier may carry explicitly.
pub const SOURCE_EXTENSIONS: &[&str] = &[".tsx", ".ts", ".jsx", ".js"];

/// Syntactic class of an import specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecifierKind {
    Relative,
    Alias,
    Absolute,
    Package,
}

#[must_use]
pub fn specifier_kind(specifier: &str) -> SpecifierKind {
    if specifier.starts_with('.') {
        SpecifierKind::Relative
    } else if specifier.starts_with('@') {
        SpecifierKind::Alias
    } else if specifier.starts_with('/') {
        SpecifierKind::Absolute
    } else {
        SpecifierKind::Package
    }
}

/// File-existence seam so resolution can run against an in-memory file set
/// in tests. Production callers use [`FsProber`].
pub trait FileProber: Sync {
    fn is_file(&self, path: &Path) -> bool;
}

/// Probes the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsProber;

impl FileProber for FsProber {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// In-memory prober for tests and dry simulations.
#[derive(Debug, Default)]
pub struct MemProber {
    files: std::collections::HashSet<PathBuf>,
}

impl MemProber {
    #[must_use]
    pub fn new<I, P>(files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            files: files.into_iter().map(Into::into).collect(),
        }
    }
}

impl FileProber for MemProber {
    fn is_file(&self, path: &Path) -> bool {
        self.files.contains(path)
    }
}

/// Resolves an import specifier to a file path, or `None` when the
/// specifier is external or does not map to an existing file.
///
/// Priority order: relative path walking, then alias expansion, then
/// bare/package (never resolved to an edge).
#[must_use]
pub fn resolve(
    pathmap: &PathMap,
    from_file: &Path,
    specifier: &str,
    prober: &dyn FileProber,
) -> Option<PathBuf> {
    match specifier_kind(specifier) {
        SpecifierKind::Relative => resolve_relative(from_file, specifier, prober),
        SpecifierKind::Alias => resolve_alias(pathmap, specifier, prober),
        SpecifierKind::Absolute => probe(Path::new(specifier), prober),
        SpecifierKind::Package => None,
    }
}

fn resolve_relative(from_file: &Path, specifier: &str, prober: &dyn FileProber) -> Option<PathBuf> {
    let mut current = from_file.parent()?.to_path_buf();
    for part in specifier.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                current = current.parent()?.to_path_buf();
            }
            segment => current.push(segment),
        }
    }
    probe(&current, prober)
}

fn resolve_alias(pathmap: &PathMap, specifier: &str, prober: &dyn FileProber) -> Option<PathBuf> {
    let (entry, captured) = pathmap.match_alias(specifier)?;
    pathmap
        .expand(entry, captured)
        .iter()
        .find_map(|candidate| probe(candidate, prober))
}

/// Probes candidate suffixes in fixed order; first existing file wins.
fn probe(base: &Path, prober: &dyn FileProber) -> Option<PathBuf> {
    PROBE_SUFFIXES.iter().find_map(|suffix| {
        let candidate = append_suffix(base, suffix);
        prober.is_file(&candidate).then_some(candidate)
    })
}

fn append_suffix(base: &Path, suffix: &str) -> PathBuf {
    if suffix.is_empty() {
        return base.to_path_buf();
    }
    if let Some(index_name) = suffix.strip_prefix('/') {
        return base.join(index_name);
    }
    let mut os: OsString = base.as_os_str().to_os_string();
    os.push(suffix);
    PathBuf::from(os)
}

/// Whether the specifier text carries one of the known source extensions.
#[must_use]
pub fn has_source_extension(specifier: &str) -> bool {
    SOURCE_EXTENSIONS.iter().any(|ext| specifier.ends_with(ext))
}
