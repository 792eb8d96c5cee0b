/// Data model for a project analysis
///
/// Source records are the analyzer's input; the report is its only output.

use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;

/// Suffix identifying Python source files
pub const PYTHON_SUFFIX: &str = ".py";
/// Conventional dependency manifest filename
pub const REQUIREMENTS_FILE: &str = "requirements.txt";
/// Conventional environment configuration filename
pub const ENV_FILE: &str = ".env";

/// One uploaded file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceRecord {
    /// Base filename
    pub name: String,
    /// Path within the upload
    pub path: String,
    /// Decoded text
    pub content: String,
}

impl SourceRecord {
    /// Create a record whose name and path are the same, as for direct uploads
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            path: name.clone(),
            name,
            content: content.into(),
        }
    }

    /// Create a record for an entry extracted from an archive or directory.
    /// The name is the final component of `path`.
    pub fn from_path(path: impl Into<String>, content: impl Into<String>) -> Self {
        let path = path.into();
        let name = Path::new(&path)
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.clone());
        Self {
            name,
            path,
            content: content.into(),
        }
    }

    /// Number of newline-delimited lines. Empty content counts as one line.
    pub fn line_count(&self) -> usize {
        self.content.split('\n').count()
    }

    pub fn is_python(&self) -> bool {
        self.name.ends_with(PYTHON_SUFFIX)
    }
}

/// Hardcoded-secret-shaped assignments found in one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CredentialFinding {
    pub file: String,
    pub matches: Vec<String>,
}

/// Per-file breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileDetail {
    pub name: String,
    pub lines: usize,
    /// AI/LLM library labels, in catalog order
    pub llms: Vec<String>,
    /// Framework labels, in catalog order
    pub frameworks: Vec<String>,
    pub has_hardcoded: bool,
}

/// Complete result of one analysis run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub total_files: usize,
    pub python_files: usize,
    pub total_lines: usize,
    pub detected_libraries: BTreeSet<String>,
    pub detected_frameworks: BTreeSet<String>,
    pub credential_findings: Vec<CredentialFinding>,
    pub env_using_files: BTreeSet<String>,
    pub has_env_file: bool,
    pub has_dependency_manifest: bool,
    pub architecture_patterns: BTreeSet<String>,
    pub best_practices: Vec<String>,
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
    pub file_details: Vec<FileDetail>,
}

impl Report {
    pub fn has_pattern(&self, label: &str) -> bool {
        self.architecture_patterns.contains(label)
    }

    /// Total number of matched credential literals across all files
    pub fn credential_match_count(&self) -> usize {
        self.credential_findings.iter().map(|f| f.matches.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path_uses_final_component() {
        let record = SourceRecord::from_path("project/app/main.py", "");
        assert_eq!(record.name, "main.py");
        assert_eq!(record.path, "project/app/main.py");
        assert!(record.is_python());
    }

    #[test]
    fn test_line_count() {
        assert_eq!(SourceRecord::new("a.py", "").line_count(), 1);
        assert_eq!(SourceRecord::new("a.py", "x\ny\n").line_count(), 3);
    }
}
