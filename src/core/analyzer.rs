/// Core project analyzer implementation
///
/// This file contains the ProjectAnalyzer which runs every detector over a
/// collection of source records and derives the findings, best practices,
/// issues and recommendations of a single report.

use std::time::Instant;

use log::{debug, info};

use crate::config::AnalysisLimits;
use crate::core::patterns::{self, PatternCatalog, CATALOG};
use crate::core::report::{
    CredentialFinding, FileDetail, Report, SourceRecord, ENV_FILE, REQUIREMENTS_FILE,
};

pub const BP_USES_ENV_VARS: &str = "Uses environment variables properly";
pub const BP_ASYNC: &str = "Implements asynchronous programming";
pub const BP_HAS_REQUIREMENTS: &str = "Has requirements.txt for dependencies";
pub const BP_TYPE_HINTS: &str = "Uses type hints";

pub const ISSUE_HARDCODED_CREDENTIALS: &str = "Hardcoded credentials detected";
pub const ISSUE_MISSING_REQUIREMENTS: &str = "Missing requirements.txt";
pub const ISSUE_NO_ENV_FILE: &str = "No .env file found (recommended for API keys)";

pub const REC_MOVE_CREDENTIALS: &str = "Move hardcoded credentials to environment variables";
pub const REC_CREATE_ENV_FILE: &str = "Create a .env file for configuration";
pub const REC_ERROR_HANDLING: &str = "Implement proper error handling for API calls";
pub const REC_RATE_LIMITING: &str = "Add rate limiting and retry logic";
pub const REC_USE_ASYNC: &str = "Consider using async/await for better performance";
pub const REC_LOGGING: &str = "Add comprehensive logging";
pub const REC_UNIT_TESTS: &str = "Implement unit tests";
pub const REC_DOCSTRINGS: &str = "Add docstrings to functions and classes";

/// Errors that prevent an analysis from running
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// Nothing to analyze
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Input is larger than the configured limits
    #[error("Input limit exceeded: {0}")]
    LimitExceeded(String),
}

/// Stateless analyzer over a pattern catalog
pub struct ProjectAnalyzer<'a> {
    catalog: &'a PatternCatalog,
    limits: AnalysisLimits,
}

impl ProjectAnalyzer<'static> {
    /// Create an analyzer backed by the shared, precompiled catalog
    pub fn new(limits: AnalysisLimits) -> Self {
        Self {
            catalog: &*CATALOG,
            limits,
        }
    }
}

impl Default for ProjectAnalyzer<'static> {
    fn default() -> Self {
        Self::new(AnalysisLimits::default())
    }
}

impl<'a> ProjectAnalyzer<'a> {
    /// Create an analyzer over a caller-supplied catalog
    pub fn with_catalog(catalog: &'a PatternCatalog, limits: AnalysisLimits) -> Self {
        Self { catalog, limits }
    }

    /// Labels of the AI/LLM libraries imported by `content`, in catalog order
    pub fn detect_libraries(&self, content: &str) -> Vec<String> {
        matching_labels(&self.catalog.llm_libraries, content)
    }

    /// Labels of the frameworks imported by `content`, in catalog order
    pub fn detect_frameworks(&self, content: &str) -> Vec<String> {
        matching_labels(&self.catalog.frameworks, content)
    }

    /// Every `<keyword> = "<literal>"` substring, grouped by expression in
    /// catalog order and by position within each expression.
    pub fn detect_credential_exposure(&self, content: &str) -> Vec<String> {
        self.catalog
            .credentials
            .iter()
            .flat_map(|regex| regex.find_iter(content).map(|m| m.as_str().to_string()))
            .collect()
    }

    pub fn detect_env_usage(&self, content: &str) -> bool {
        self.catalog.env_usage.iter().any(|regex| regex.is_match(content))
    }

    /// Labels of the architecture patterns matching `content`
    pub fn detect_architecture_patterns(&self, content: &str) -> Vec<String> {
        matching_labels(&self.catalog.architecture, content)
    }

    /// Analyze a collection of source records
    ///
    /// # Arguments
    ///
    /// * `records` - Decoded files, in upload order
    ///
    /// # Returns
    ///
    /// The complete report, or an error when the input is empty or too large
    pub fn analyze(&self, records: &[SourceRecord]) -> Result<Report, AnalysisError> {
        self.check_input(records)?;

        info!("Analyzing {} files", records.len());
        let start_time = Instant::now();

        let mut report = Report {
            total_files: records.len(),
            python_files: records.iter().filter(|r| r.is_python()).count(),
            ..Report::default()
        };

        for record in records {
            let content = &record.content;
            let lines = record.line_count();
            report.total_lines += lines;

            let llms = self.detect_libraries(content);
            let frameworks = self.detect_frameworks(content);
            report.detected_libraries.extend(llms.iter().cloned());
            report.detected_frameworks.extend(frameworks.iter().cloned());

            let matches = self.detect_credential_exposure(content);
            let has_hardcoded = !matches.is_empty();
            if has_hardcoded {
                report.credential_findings.push(CredentialFinding {
                    file: record.name.clone(),
                    matches,
                });
            }

            if self.detect_env_usage(content) {
                report.env_using_files.insert(record.name.clone());
            }

            if record.name == ENV_FILE {
                report.has_env_file = true;
            }
            if record.name == REQUIREMENTS_FILE {
                report.has_dependency_manifest = true;
            }

            report
                .architecture_patterns
                .extend(self.detect_architecture_patterns(content));

            debug!(
                "{}: {} lines, llms={:?}, frameworks={:?}, hardcoded={}",
                record.path, lines, llms, frameworks, has_hardcoded
            );

            report.file_details.push(FileDetail {
                name: record.name.clone(),
                lines,
                llms,
                frameworks,
                has_hardcoded,
            });
        }

        let (best_practices, issues) = derive_best_practices_and_issues(&report);
        report.best_practices = best_practices;
        report.issues = issues;
        report.recommendations = derive_recommendations(&report);

        info!(
            "Analysis completed in {:?}: {} libraries, {} frameworks, {} credential findings",
            start_time.elapsed(),
            report.detected_libraries.len(),
            report.detected_frameworks.len(),
            report.credential_findings.len()
        );

        Ok(report)
    }

    fn check_input(&self, records: &[SourceRecord]) -> Result<(), AnalysisError> {
        if records.is_empty() {
            return Err(AnalysisError::InvalidInput(
                "at least one source file is required".to_string(),
            ));
        }

        if records.len() > self.limits.max_files {
            return Err(AnalysisError::LimitExceeded(format!(
                "{} files exceeds the maximum of {}",
                records.len(),
                self.limits.max_files
            )));
        }

        let total_bytes: u64 = records.iter().map(|r| r.content.len() as u64).sum();
        if total_bytes > self.limits.max_total_bytes {
            return Err(AnalysisError::LimitExceeded(format!(
                "{} bytes of source exceeds the maximum of {}",
                total_bytes, self.limits.max_total_bytes
            )));
        }

        Ok(())
    }
}

fn matching_labels(entries: &[patterns::CatalogEntry], content: &str) -> Vec<String> {
    entries
        .iter()
        .filter(|entry| entry.regex.is_match(content))
        .map(|entry| entry.label.clone())
        .collect()
}

/// Evaluate the best-practice and issue rules against aggregate fields
pub fn derive_best_practices_and_issues(report: &Report) -> (Vec<String>, Vec<String>) {
    let mut best_practices = Vec::new();
    let mut issues = Vec::new();

    if !report.env_using_files.is_empty() {
        best_practices.push(BP_USES_ENV_VARS.to_string());
    }
    if report.has_pattern(patterns::ASYNC_AWAIT_PATTERN) {
        best_practices.push(BP_ASYNC.to_string());
    }
    if report.has_dependency_manifest {
        best_practices.push(BP_HAS_REQUIREMENTS.to_string());
    }
    if report.has_pattern(patterns::TYPE_HINTS) {
        best_practices.push(BP_TYPE_HINTS.to_string());
    }

    if !report.credential_findings.is_empty() {
        issues.push(ISSUE_HARDCODED_CREDENTIALS.to_string());
    }
    if !report.has_dependency_manifest {
        issues.push(ISSUE_MISSING_REQUIREMENTS.to_string());
    }
    if !report.has_env_file && !report.detected_libraries.is_empty() {
        issues.push(ISSUE_NO_ENV_FILE.to_string());
    }

    (best_practices, issues)
}

/// Build the ordered recommendation list
pub fn derive_recommendations(report: &Report) -> Vec<String> {
    let mut recommendations = Vec::new();
    let uses_llms = !report.detected_libraries.is_empty();

    if !report.credential_findings.is_empty() {
        recommendations.push(REC_MOVE_CREDENTIALS);
    }
    if !report.has_env_file {
        recommendations.push(REC_CREATE_ENV_FILE);
    }
    if uses_llms {
        recommendations.push(REC_ERROR_HANDLING);
        recommendations.push(REC_RATE_LIMITING);
    }
    if uses_llms && !report.has_pattern(patterns::ASYNC_AWAIT_PATTERN) {
        recommendations.push(REC_USE_ASYNC);
    }
    recommendations.extend([REC_LOGGING, REC_UNIT_TESTS, REC_DOCSTRINGS]);

    recommendations.into_iter().map(String::from).collect()
}
