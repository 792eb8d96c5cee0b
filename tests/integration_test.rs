/// Integration tests for the project analyzer
///
/// These tests exercise ingestion and analysis end to end and check the
/// report fields an uploaded project produces.

use std::collections::BTreeSet;
use std::io::Write;

use py_project_analyzer::app::{run_analyzer, ProjectInput};
use py_project_analyzer::config::AnalyzerConfig;
use py_project_analyzer::core::analyzer::{
    BP_ASYNC, BP_HAS_REQUIREMENTS, BP_USES_ENV_VARS, ISSUE_HARDCODED_CREDENTIALS,
    ISSUE_MISSING_REQUIREMENTS, ISSUE_NO_ENV_FILE, REC_CREATE_ENV_FILE, REC_MOVE_CREDENTIALS,
};
use py_project_analyzer::core::patterns::ASYNC_AWAIT_PATTERN;
use py_project_analyzer::{analyze_sources, AnalysisError, CredentialFinding, SourceRecord};

fn sample_project() -> Vec<SourceRecord> {
    vec![
        SourceRecord::new("requirements.txt", "openai\nfastapi\n"),
        SourceRecord::from_path(
            "app/main.py",
            "from fastapi import FastAPI\nimport openai\n\napp = FastAPI()\n\n@app.route('/chat')\nasync def chat(prompt: str) -> str:\n    key = os.getenv('OPENAI_API_KEY')\n",
        ),
        SourceRecord::from_path(
            "app/models.py",
            "from pydantic import BaseModel\n\nclass ChatRequest(BaseModel):\n    prompt: str\n",
        ),
        SourceRecord::from_path("app/settings.py", "token = \"abc123\"\npassword='hunter2'\n"),
        SourceRecord::new(".env", "OPENAI_API_KEY=sk-test\n"),
    ]
}

#[test]
fn test_analysis_is_deterministic() {
    let records = sample_project();
    let first = analyze_sources(&records).expect("analysis failed");
    let second = analyze_sources(&records).expect("analysis failed");
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_detection_sets_ignore_input_order() {
    let records = sample_project();
    let mut reversed = records.clone();
    reversed.reverse();

    let forward = analyze_sources(&records).unwrap();
    let backward = analyze_sources(&reversed).unwrap();

    assert_eq!(forward.detected_libraries, backward.detected_libraries);
    assert_eq!(forward.detected_frameworks, backward.detected_frameworks);
    assert_eq!(forward.architecture_patterns, backward.architecture_patterns);
    assert_eq!(forward.env_using_files, backward.env_using_files);
    assert_eq!(forward.has_env_file, backward.has_env_file);

    let forward_names: Vec<_> = forward.file_details.iter().map(|d| d.name.clone()).collect();
    let mut backward_names: Vec<_> = backward.file_details.iter().map(|d| d.name.clone()).collect();
    backward_names.reverse();
    assert_eq!(forward_names, backward_names);
}

#[test]
fn test_credential_findings_follow_input_order() {
    let records = vec![
        SourceRecord::new("first.py", "api_key = \"sk-1\"\n"),
        SourceRecord::new("clean.py", "print('ok')\n"),
        SourceRecord::new("second.py", "secret = 's2'\n"),
    ];
    let mut reversed = records.clone();
    reversed.reverse();

    let forward = analyze_sources(&records).unwrap();
    let backward = analyze_sources(&reversed).unwrap();

    let files = |findings: &[CredentialFinding]| -> Vec<String> {
        findings.iter().map(|f| f.file.clone()).collect()
    };
    assert_eq!(files(&forward.credential_findings), vec!["first.py", "second.py"]);
    assert_eq!(files(&backward.credential_findings), vec!["second.py", "first.py"]);
    assert_eq!(forward.issues, backward.issues);
    assert_eq!(forward.recommendations, backward.recommendations);
}

#[test]
fn test_adding_unmatched_record_only_changes_counters() {
    let records = sample_project();
    let before = analyze_sources(&records).unwrap();

    let mut extended = records.clone();
    extended.push(SourceRecord::new("notes.txt", "just some notes\nnothing else"));
    let after = analyze_sources(&extended).unwrap();

    assert_eq!(after.total_files, before.total_files + 1);
    assert_eq!(after.total_lines, before.total_lines + 2);
    assert_eq!(after.detected_libraries, before.detected_libraries);
    assert_eq!(after.detected_frameworks, before.detected_frameworks);
    assert_eq!(after.architecture_patterns, before.architecture_patterns);
    assert_eq!(after.env_using_files, before.env_using_files);
    assert_eq!(after.credential_findings, before.credential_findings);
}

#[test]
fn test_hardcoded_api_key() {
    let records = vec![SourceRecord::new(
        "app.py",
        "import openai\napi_key = \"sk-12345\"\n",
    )];
    let report = analyze_sources(&records).unwrap();

    let expected: BTreeSet<String> = ["OpenAI".to_string()].into_iter().collect();
    assert_eq!(report.detected_libraries, expected);
    assert_eq!(
        report.credential_findings,
        vec![CredentialFinding {
            file: "app.py".to_string(),
            matches: vec!["api_key = \"sk-12345\"".to_string()],
        }]
    );
    assert!(report.issues.contains(&ISSUE_HARDCODED_CREDENTIALS.to_string()));
    assert!(report.issues.contains(&ISSUE_MISSING_REQUIREMENTS.to_string()));
    assert!(report.issues.contains(&ISSUE_NO_ENV_FILE.to_string()));
    assert!(!report.has_env_file);
    assert!(report.file_details[0].has_hardcoded);
    assert_eq!(report.recommendations[0], REC_MOVE_CREDENTIALS);
    assert_eq!(report.recommendations[1], REC_CREATE_ENV_FILE);
}

#[test]
fn test_requirements_and_async() {
    let records = vec![
        SourceRecord::new("requirements.txt", "openai\nfastapi\n"),
        SourceRecord::new(
            "main.py",
            "from fastapi import FastAPI\nasync def handler(): pass\n",
        ),
    ];
    let report = analyze_sources(&records).unwrap();

    assert!(report.detected_frameworks.contains("FastAPI"));
    assert!(report.architecture_patterns.contains(ASYNC_AWAIT_PATTERN));
    assert!(report.best_practices.contains(&BP_HAS_REQUIREMENTS.to_string()));
    assert!(report.best_practices.contains(&BP_ASYNC.to_string()));
    assert!(!report.issues.contains(&ISSUE_MISSING_REQUIREMENTS.to_string()));
    assert_eq!(report.python_files, 1);
}

#[test]
fn test_env_file_and_env_usage() {
    let records = vec![
        SourceRecord::new(".env", "API_KEY=abc"),
        SourceRecord::new("config.py", "import os\nKEY = os.getenv('API_KEY')\n"),
    ];
    let report = analyze_sources(&records).unwrap();

    assert!(report.has_env_file);
    assert!(report.env_using_files.contains("config.py"));
    assert!(report.best_practices.contains(&BP_USES_ENV_VARS.to_string()));
    assert!(report.credential_findings.is_empty());
}

#[test]
fn test_os_environ_counts_as_env_usage() {
    let records = vec![
        SourceRecord::new("settings.py", "import os\nDB_URL = os.environ['DB_URL']\n"),
        SourceRecord::new("plain.py", "environ = {}\n"),
    ];
    let report = analyze_sources(&records).unwrap();

    let expected: BTreeSet<String> = ["settings.py".to_string()].into_iter().collect();
    assert_eq!(report.env_using_files, expected);
    assert!(report.best_practices.contains(&BP_USES_ENV_VARS.to_string()));
}

#[test]
fn test_empty_content_counts_one_line() {
    let records = vec![SourceRecord::new("empty.py", "")];
    let report = analyze_sources(&records).unwrap();

    assert_eq!(report.total_lines, 1);
    assert!(report.detected_libraries.is_empty());
    assert!(report.detected_frameworks.is_empty());
    assert!(report.credential_findings.is_empty());
    assert!(report.env_using_files.is_empty());
    assert!(report.architecture_patterns.is_empty());
    assert_eq!(report.file_details[0].lines, 1);
}

#[test]
fn test_empty_input_is_rejected() {
    assert!(matches!(
        analyze_sources(&[]),
        Err(AnalysisError::InvalidInput(_))
    ));
}

#[test]
fn test_one_finding_per_file() {
    let report = analyze_sources(&sample_project()).unwrap();
    assert_eq!(report.credential_findings.len(), 1);
    assert_eq!(report.credential_findings[0].file, "settings.py");
    assert_eq!(
        report.credential_findings[0].matches,
        vec!["token = \"abc123\"", "password='hunter2'"]
    );
    assert_eq!(report.credential_match_count(), 2);
}

#[test]
fn test_zip_project_end_to_end() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let zip_path = dir.path().join("project.zip");

    let file = std::fs::File::create(&zip_path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();
    for record in sample_project() {
        writer.start_file(format!("project/{}", record.path), options).unwrap();
        writer.write_all(record.content.as_bytes()).unwrap();
    }
    writer.start_file("project/static/logo.png", options).unwrap();
    writer.write_all(b"\x89PNG\r\n").unwrap();
    writer.finish().unwrap();

    let report = run_analyzer(&ProjectInput::Zip(zip_path), &AnalyzerConfig::default()).unwrap();

    assert_eq!(report.total_files, 5);
    assert_eq!(report.python_files, 3);
    assert!(report.has_env_file);
    assert!(report.has_dependency_manifest);
    assert_eq!(report, analyze_sources(&sample_project()).unwrap());
}

#[test]
fn test_directory_project_end_to_end() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    std::fs::create_dir_all(dir.path().join("svc")).unwrap();
    std::fs::write(
        dir.path().join("svc/user_service.py"),
        "import anthropic\n\nclass UserService:\n    def get(self, id: int) -> dict:\n        return {}\n",
    )
    .unwrap();

    let report = run_analyzer(
        &ProjectInput::Directory(dir.path().to_path_buf()),
        &AnalyzerConfig::default(),
    )
    .unwrap();

    assert!(report.detected_libraries.contains("Anthropic (Claude)"));
    assert!(report.architecture_patterns.contains("Service Layer Pattern"));
    assert!(report.architecture_patterns.contains("Object-Oriented Programming"));
    assert!(report.architecture_patterns.contains("Type Hints"));
    assert_eq!(report.file_details[0].name, "user_service.py");
}

#[test]
fn test_project_without_eligible_files() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("README.md"), "# readme").unwrap();

    let result = run_analyzer(
        &ProjectInput::Directory(dir.path().to_path_buf()),
        &AnalyzerConfig::default(),
    );
    assert!(result.is_err());
}
