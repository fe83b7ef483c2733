// src/config/pathmap.rs
//! Parser for tsconfig.json / jsconfig.json path mappings.
//!
//! Alias targets are anchored to the base directory at load time so all
//! later comparisons happen on absolute paths.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// A single alias pattern with its expansion targets.
///
/// The pattern may contain at most one `*` wildcard segment (trailing, as in
/// `@/*`). Targets may likewise contain one `*` that receives the capture.
#[derive(Debug, Clone)]
pub struct AliasEntry {
    pub pattern: String,
    pub targets: Vec<PathBuf>,
}

/// Resolved path mapping configuration.
#[derive(Debug, Clone, Default)]
pub struct PathMap {
    pub base_dir: PathBuf,
    pub aliases: Vec<AliasEntry>,
    /// Project roots probed as fallbacks when expanding alias targets.
    pub roots: Vec<PathBuf>,
}

#[derive(Deserialize)]
struct RawConfig {
    #[serde(rename = "compilerOptions")]
    compiler_options: Option<CompilerOptions>,
}

#[derive(Deserialize)]
struct CompilerOptions {
    #[serde(rename = "baseUrl")]
    base_url: Option<String>,
    paths: Option<std::collections::BTreeMap<String, Vec<String>>>,
}

impl PathMap {
    /// Attempt to load tsconfig.json or jsconfig.json from the project root.
    #[must_use]
    pub fn load(root: &Path) -> Option<Self> {
        let candidates = ["tsconfig.json", "jsconfig.json"];
        candidates
            .iter()
            .find_map(|name| Self::parse_file(&root.join(name), root))
    }

    /// Loads a mapping from the given root, or returns a bare mapping rooted
    /// there when no config file exists.
    #[must_use]
    pub fn load_or_default(root: &Path) -> Self {
        Self::load(root).unwrap_or_else(|| Self {
            base_dir: root.to_path_buf(),
            aliases: Vec::new(),
            roots: vec![root.to_path_buf()],
        })
    }

    fn parse_file(path: &Path, root: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        Self::parse_content(&content, root)
    }

    /// Parses tsconfig-style JSON, tolerating `//` and `/* */` comments.
    #[must_use]
    pub fn parse_content(content: &str, root: &Path) -> Option<Self> {
        let clean = strip_json_comments(content);
        let raw: RawConfig = serde_json::from_str(&clean).ok()?;
        let opts = raw.compiler_options?;

        let base_dir = opts
            .base_url
            .map_or_else(|| root.to_path_buf(), |b| root.join(&b));

        let aliases = opts.paths.map_or_else(Vec::new, |p| {
            p.into_iter()
                .map(|(pattern, targets)| AliasEntry {
                    pattern,
                    targets: targets.into_iter().map(|t| base_dir.join(&t)).collect(),
                })
                .collect()
        });

        Some(Self {
            roots: vec![base_dir.clone()],
            base_dir,
            aliases,
        })
    }

    /// Matches an import against the alias table, returning the entry and
    /// the text captured by the wildcard.
    #[must_use]
    pub fn match_alias<'a, 'b>(&'a self, import: &'b str) -> Option<(&'a AliasEntry, &'b str)> {
        self.aliases
            .iter()
            .find_map(|entry| match_pattern(&entry.pattern, import).map(|m| (entry, m)))
    }

    /// Expands a matched alias into candidate paths, one per target template
    /// per configured root.
    #[must_use]
    pub fn expand(&self, entry: &AliasEntry, captured: &str) -> Vec<PathBuf> {
        let mut candidates = Vec::new();
        for target in &entry.targets {
            let expanded = substitute_wildcard(target, captured);
            candidates.push(expanded.clone());

            // Re-base onto fallback roots when the target lives under base_dir.
            if let Ok(rel) = expanded.strip_prefix(&self.base_dir) {
                for root in &self.roots {
                    if root != &self.base_dir {
                        candidates.push(root.join(rel));
                    }
                }
            }
        }
        candidates
    }

    /// Re-derives an alias specifier for an absolute path, used when
    /// rewriting alias imports after a move. Returns the specifier without
    /// any file extension.
    #[must_use]
    pub fn alias_for_path(&self, path: &Path) -> Option<String> {
        for entry in &self.aliases {
            let Some(prefix) = entry.pattern.strip_suffix('*') else {
                continue;
            };
            for target in &entry.targets {
                let target_base = wildcard_base(target);
                if let Ok(rel) = path.strip_prefix(&target_base) {
                    let fragment = rel.to_string_lossy().replace('\\', "/");
                    return Some(format!("{prefix}{fragment}"));
                }
            }
        }
        None
    }

    /// Alias entries whose target directory is itself being moved, with the
    /// replacement target. Returned as (pattern, old target, new target).
    #[must_use]
    pub fn moved_targets(
        &self,
        moves: &[crate::types::FileMove],
    ) -> Vec<(String, PathBuf, PathBuf)> {
        let mut updates = Vec::new();
        for entry in &self.aliases {
            for target in &entry.targets {
                let base = wildcard_base(target);
                for mv in moves {
                    if let Ok(rest) = base.strip_prefix(&mv.from_path) {
                        let new_base = mv.to_path.join(rest);
                        if new_base != base {
                            updates.push((entry.pattern.clone(), base.clone(), new_base));
                        }
                    }
                }
            }
        }
        updates
    }
}

/// The directory portion of a wildcard target (`/src/components/*` -> `/src/components`).
fn wildcard_base(target: &Path) -> PathBuf {
    let s = target.to_string_lossy();
    let trimmed = s
        .strip_suffix("/*")
        .or_else(|| s.strip_suffix('*'))
        .unwrap_or(&s);
    PathBuf::from(trimmed)
}

fn match_pattern<'a>(pattern: &str, import: &'a str) -> Option<&'a str> {
    match pattern.strip_suffix('*') {
        Some(prefix) => import.strip_prefix(prefix),
        None if pattern == import => Some(""),
        None => None,
    }
}

fn substitute_wildcard(target: &Path, captured: &str) -> PathBuf {
    let target_str = target.to_string_lossy();
    if target_str.contains('*') {
        PathBuf::from(target_str.replace('*', captured))
    } else {
        target.to_path_buf()
    }
}

/// Strip single-line (//) and multi-line (/* */) comments from JSON.
fn strip_json_comments(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            result.push(c);
            in_string = handle_string_char(c, &mut chars, &mut result);
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                result.push(c);
            }
            '/' => handle_slash(&mut chars, &mut result),
            _ => result.push(c),
        }
    }
    result
}

fn handle_string_char(
    c: char,
    chars: &mut std::iter::Peekable<std::str::Chars>,
    result: &mut String,
) -> bool {
    if c == '\\' {
        if let Some(&next) = chars.peek() {
            result.push(next);
            chars.next();
        }
        return true;
    }
    c != '"'
}

fn handle_slash(chars: &mut std::iter::Peekable<std::str::Chars>, result: &mut String) {
    match chars.peek() {
        Some(&'/') => skip_line_comment(chars, result),
        Some(&'*') => skip_block_comment(chars),
        _ => result.push('/'),
    }
}

fn skip_line_comment(chars: &mut std::iter::Peekable<std::str::Chars>, result: &mut String) {
    for ch in chars.by_ref() {
        if ch == '\n' {
            result.push('\n');
            break;
        }
    }
}

fn skip_block_comment(chars: &mut std::iter::Peekable<std::str::Chars>) {
    chars.next(); // consume '*'
    while let Some(ch) = chars.next() {
        if ch == '*' && chars.peek() == Some(&'/') {
            chars.next();
            break;
        }
    }
}
