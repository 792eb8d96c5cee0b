/// Python Project Analyzer - static analysis reports for uploaded Python projects
///
/// This library scans a project's text files for AI/LLM client libraries,
/// frameworks, hardcoded credentials, environment variable usage and common
/// architecture patterns, and derives best practices, issues and
/// recommendations from what it finds.

// Re-export core modules
pub mod core;
pub mod utils;

// Re-export main analyzer types for convenience
pub use crate::core::analyzer::{AnalysisError, ProjectAnalyzer};
pub use crate::core::patterns::{load_catalog, CATALOG};
pub use crate::core::report::{CredentialFinding, FileDetail, Report, SourceRecord};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Analyze a collection of source records with the default limits
///
/// This is a convenience function for simple use cases.
pub fn analyze_sources(records: &[SourceRecord]) -> Result<Report, AnalysisError> {
    ProjectAnalyzer::default().analyze(records)
}

/// Library configuration and utilities
pub mod config {
    use log::{error, info};
    use serde::Deserialize;
    use std::path::Path;

    const MB: u64 = 1024 * 1024;

    /// Analyzer configuration, usually read from a JSON file
    #[derive(Debug, Clone, PartialEq, Deserialize)]
    #[serde(default)]
    pub struct AnalyzerConfig {
        /// Maximum number of files accepted per analysis
        pub max_files: usize,
        /// Files larger than this are skipped at ingestion
        pub max_file_size_mb: u64,
        /// Maximum combined size of all analyzed sources
        pub max_total_size_mb: u64,
        pub log_level: String,
        pub log_file: String,
    }

    impl Default for AnalyzerConfig {
        fn default() -> Self {
            Self {
                max_files: 1000,
                max_file_size_mb: 50,
                max_total_size_mb: 200,
                log_level: "info".to_string(),
                log_file: "py_project_analyzer.log".to_string(),
            }
        }
    }

    impl AnalyzerConfig {
        pub fn limits(&self) -> AnalysisLimits {
            AnalysisLimits {
                max_files: self.max_files,
                max_file_size: self.max_file_size_mb * MB,
                max_total_bytes: self.max_total_size_mb * MB,
            }
        }
    }

    /// Input caps applied during ingestion and analysis
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct AnalysisLimits {
        pub max_files: usize,
        /// Bytes
        pub max_file_size: u64,
        /// Bytes
        pub max_total_bytes: u64,
    }

    impl Default for AnalysisLimits {
        fn default() -> Self {
            AnalyzerConfig::default().limits()
        }
    }

    /// Load configuration from file if provided.
    ///
    /// A missing or malformed file is logged and the defaults are used.
    pub fn load_config(config_path: Option<&Path>) -> AnalyzerConfig {
        let Some(path) = config_path else {
            return AnalyzerConfig::default();
        };

        let config_str = match std::fs::read_to_string(path) {
            Ok(config_str) => config_str,
            Err(e) => {
                error!("Configuration file {} could not be read: {}", path.display(), e);
                return AnalyzerConfig::default();
            }
        };

        match serde_json::from_str(&config_str) {
            Ok(config) => {
                info!("Loaded configuration from {}", path.display());
                config
            }
            Err(e) => {
                error!("Invalid JSON in configuration file: {}", e);
                AnalyzerConfig::default()
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_partial_config_keeps_defaults() {
            let dir = tempfile::tempdir().expect("Failed to create temp dir");
            let path = dir.path().join("config.json");
            std::fs::write(&path, r#"{"max_files": 5}"#).expect("Failed to write config");

            let config = load_config(Some(&path));
            assert_eq!(config.max_files, 5);
            assert_eq!(config.max_file_size_mb, 50);
            assert_eq!(config.limits().max_file_size, 50 * MB);
        }

        #[test]
        fn test_invalid_config_falls_back() {
            let dir = tempfile::tempdir().expect("Failed to create temp dir");
            let path = dir.path().join("config.json");
            std::fs::write(&path, "not json").expect("Failed to write config");

            assert_eq!(load_config(Some(&path)), AnalyzerConfig::default());
            assert_eq!(
                load_config(Some(&dir.path().join("missing.json"))),
                AnalyzerConfig::default()
            );
        }
    }
}

/// Command-line application functionality
pub mod app {
    use crate::config::AnalyzerConfig;
    use crate::core::analyzer::ProjectAnalyzer;
    use crate::core::report::{Report, SourceRecord};
    use crate::utils::file_utils;
    use std::path::PathBuf;

    /// Where a project comes from
    #[derive(Debug, Clone)]
    pub enum ProjectInput {
        /// A ZIP archive of the project
        Zip(PathBuf),
        /// Individually selected files
        Files(Vec<PathBuf>),
        /// A project directory, walked recursively
        Directory(PathBuf),
    }

    /// Read every eligible source record from the input
    pub fn collect_sources(
        input: &ProjectInput,
        config: &AnalyzerConfig,
    ) -> anyhow::Result<Vec<SourceRecord>> {
        let limits = config.limits();
        match input {
            ProjectInput::Zip(path) => file_utils::extract_files_from_zip_path(path, &limits),
            ProjectInput::Files(paths) => Ok(file_utils::read_uploaded_files(paths, &limits)),
            ProjectInput::Directory(dir) => file_utils::read_directory(dir, &limits),
        }
    }

    /// Ingest a project and analyze it
    pub fn run_analyzer(input: &ProjectInput, config: &AnalyzerConfig) -> anyhow::Result<Report> {
        let records = collect_sources(input, config)?;
        let report = ProjectAnalyzer::new(config.limits()).analyze(&records)?;
        Ok(report)
    }
}
