/// Simple example demonstrating how to use the project analyzer library

use py_project_analyzer::{analyze_sources, SourceRecord};

fn main() -> anyhow::Result<()> {
    let records = vec![
        SourceRecord::new(
            "app.py",
            r#"import openai
from fastapi import FastAPI

api_key = "sk-12345"

async def complete(prompt: str) -> str:
    return prompt
"#,
        ),
        SourceRecord::new("requirements.txt", "openai\nfastapi\n"),
    ];

    let report = analyze_sources(&records)?;

    println!("LLM libraries: {:?}", report.detected_libraries);
    println!("Frameworks: {:?}", report.detected_frameworks);
    println!("Patterns: {:?}", report.architecture_patterns);
    for finding in &report.credential_findings {
        println!("Hardcoded credentials in {}: {:?}", finding.file, finding.matches);
    }
    for recommendation in &report.recommendations {
        println!("  - {}", recommendation);
    }

    Ok(())
}
