// src/records.rs
//! Input records from the external per-file classifier.
//!
//! The classifier assigns each file a domain and extracts raw import
//! specifiers from source text; this core consumes its output as-is.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{MoveCheckError, Result};

/// A raw import as emitted by the classifier. Older classifier versions
/// emit plain specifier strings; newer ones attach line and type-only flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawImport {
    Bare(String),
    Detailed {
        specifier: String,
        #[serde(default)]
        line: usize,
        #[serde(default)]
        is_type_only: Option<bool>,
        #[serde(default)]
        is_dynamic: bool,
    },
}

impl RawImport {
    #[must_use]
    pub fn specifier(&self) -> &str {
        match self {
            RawImport::Bare(s) => s,
            RawImport::Detailed { specifier, .. } => specifier,
        }
    }

    #[must_use]
    pub fn line(&self) -> usize {
        match self {
            RawImport::Bare(_) => 0,
            RawImport::Detailed { line, .. } => *line,
        }
    }

    /// Explicit flag when the classifier provides one; otherwise a textual
    /// heuristic matching the original platform's behavior.
    #[must_use]
    pub fn is_type_only(&self) -> bool {
        match self {
            RawImport::Bare(s) => type_only_heuristic(s),
            RawImport::Detailed {
                specifier,
                is_type_only,
                ..
            } => is_type_only.unwrap_or_else(|| type_only_heuristic(specifier)),
        }
    }

    #[must_use]
    pub fn is_dynamic(&self) -> bool {
        match self {
            RawImport::Bare(_) => false,
            RawImport::Detailed { is_dynamic, .. } => *is_dynamic,
        }
    }
}

fn type_only_heuristic(specifier: &str) -> bool {
    specifier.contains("types") || specifier.contains("interface")
}

/// One classifier record: a source file with its assigned domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedFile {
    pub file_path: PathBuf,
    pub domain: String,
    pub confidence: f64,
    #[serde(default)]
    pub requires_review: bool,
    #[serde(default)]
    pub dependencies: Vec<RawImport>,
}

/// Loads classifier output from a JSON file.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn load_records(path: &Path) -> Result<Vec<ClassifiedFile>> {
    let content = std::fs::read_to_string(path).map_err(|e| MoveCheckError::io(e, path))?;
    let records = serde_json::from_str(&content)?;
    Ok(records)
}

/// Loads a batch of proposed moves from a JSON file.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed, or if a move is
/// degenerate (identical source and destination).
pub fn load_moves(path: &Path) -> Result<Vec<crate::types::FileMove>> {
    let content = std::fs::read_to_string(path).map_err(|e| MoveCheckError::io(e, path))?;
    let moves: Vec<crate::types::FileMove> = serde_json::from_str(&content)?;
    for mv in &moves {
        if mv.from_path == mv.to_path {
            return Err(MoveCheckError::Config(format!(
                "move has identical source and destination: {}",
                mv.from_path.display()
            )));
        }
    }
    Ok(moves)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_and_detailed_imports() {
        let json = r#"[{
            "file_path": "/src/a.tsx",
            "domain": "auth",
            "confidence": 0.9,
            "dependencies": [
                "./utils",
                {"specifier": "@/services/auth", "line": 3, "is_type_only": false}
            ]
        }]"#;
        let records: Vec<ClassifiedFile> = serde_json::from_str(json).unwrap();
        assert_eq!(records[0].dependencies.len(), 2);
        assert_eq!(records[0].dependencies[0].specifier(), "./utils");
        assert_eq!(records[0].dependencies[1].line(), 3);
        assert!(!records[0].requires_review);
    }

    #[test]
    fn test_degenerate_move_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("moves.json");
        std::fs::write(
            &path,
            r#"[{"from_path": "/a.ts", "to_path": "/a.ts", "from_domain": "ui", "to_domain": "ui"}]"#,
        )
        .unwrap();
        let err = load_moves(&path).unwrap_err();
        assert!(matches!(err, MoveCheckError::Config(_)));
    }

    #[test]
    fn test_type_only_heuristic() {
        let dep = RawImport::Bare("@/types/user".to_string());
        assert!(dep.is_type_only());

        let dep = RawImport::Bare("@/services/auth".to_string());
        assert!(!dep.is_type_only());
    }
}
