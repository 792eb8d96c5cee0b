/// Output formatter for analysis reports
///
/// This module handles formatting and exporting a report in various formats,
/// including console output, JSON, HTML, and CSV. Nothing here feeds back into
/// the analysis.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use handlebars::Handlebars;
use serde_json::json;

use crate::core::report::{Report, SourceRecord};

/// Number of credential matches shown per file
const MAX_MATCHES_SHOWN: usize = 3;

/// Format an integer with comma thousands separators
pub fn format_number(value: usize) -> String {
    let digits = value.to_string();
    let mut output = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            output.push(',');
        }
        output.push(c);
    }
    output
}

fn section(output: &mut String, title: &str) {
    output.push_str(&format!("\n{}\n", title.yellow().bold()));
}

fn push_tags<'a>(output: &mut String, tags: impl Iterator<Item = &'a String>, empty: &str) {
    let tags: Vec<_> = tags.map(|t| format!("[{}]", t)).collect();
    if tags.is_empty() {
        output.push_str(&format!("  {}\n", empty));
    } else {
        output.push_str(&format!("  {}\n", tags.join(" ").cyan()));
    }
}

/// Format a report for console output
///
/// # Arguments
///
/// * `report` - Completed analysis report
/// * `use_markdown` - Whether to wrap the output in markdown triple backticks
/// * `summary_only` - Whether to omit the per-file breakdown
///
/// # Returns
///
/// Formatted string for console output
pub fn format_report(report: &Report, use_markdown: bool, summary_only: bool) -> String {
    let mut output = String::new();

    if use_markdown {
        output.push_str("```\n");
    }

    section(&mut output, "Analysis Results");
    output.push_str(&format!("  {} {}\n", "Total Files:".green(), report.total_files));
    output.push_str(&format!("  {} {}\n", "Python Files:".green(), report.python_files));
    output.push_str(&format!(
        "  {} {}\n",
        "Total Lines:".green(),
        format_number(report.total_lines)
    ));

    section(&mut output, "LLM & AI Libraries Detected");
    push_tags(
        &mut output,
        report.detected_libraries.iter(),
        "No LLM libraries detected",
    );

    section(&mut output, "Frameworks & Libraries");
    push_tags(
        &mut output,
        report.detected_frameworks.iter(),
        "No major frameworks detected",
    );

    section(&mut output, "Environment Variables Analysis");
    if report.credential_findings.is_empty() {
        output.push_str(&format!("  {}\n", "No hardcoded credentials detected".green()));
    } else {
        output.push_str(&format!("  {}\n", "Hardcoded Credentials Found:".red().bold()));
        for finding in &report.credential_findings {
            output.push_str(&format!("    - {}\n", finding.file.bold()));
            for value in finding.matches.iter().take(MAX_MATCHES_SHOWN) {
                output.push_str(&format!("        {}\n", value));
            }
        }
        output.push_str("  Recommendation: Move these to environment variables!\n");
    }
    if !report.env_using_files.is_empty() {
        output.push_str(&format!(
            "  {}\n",
            format!(
                "{} file(s) properly use environment variables",
                report.env_using_files.len()
            )
            .green()
        ));
    }
    if report.has_env_file {
        output.push_str(&format!("  {}\n", ".env file present".green()));
    }

    section(&mut output, "Architecture & Patterns");
    push_tags(
        &mut output,
        report.architecture_patterns.iter(),
        "Basic procedural structure",
    );

    section(&mut output, "Best Practices");
    if report.best_practices.is_empty() {
        output.push_str(&format!(
            "  {}\n",
            "Consider implementing more best practices".yellow()
        ));
    }
    for practice in &report.best_practices {
        output.push_str(&format!("  {} {}\n", "✓".green(), practice));
    }

    if !report.issues.is_empty() {
        section(&mut output, "Issues");
        for issue in &report.issues {
            output.push_str(&format!("  {} {}\n", "⚠".red(), issue));
        }
    }

    section(&mut output, "Recommendations");
    for recommendation in &report.recommendations {
        output.push_str(&format!("  - {}\n", recommendation));
    }

    if !summary_only {
        section(&mut output, "Detailed File Analysis");
        for detail in &report.file_details {
            output.push_str(&format!("  {} ({} lines)\n", detail.name.bold(), detail.lines));
            if !detail.llms.is_empty() {
                output.push_str(&format!("    - LLMs: {}\n", detail.llms.join(", ")));
            }
            if !detail.frameworks.is_empty() {
                output.push_str(&format!("    - Frameworks: {}\n", detail.frameworks.join(", ")));
            }
            if detail.has_hardcoded {
                output.push_str(&format!(
                    "    - {}\n",
                    "Contains hardcoded credentials".red()
                ));
            }
        }
    }

    if use_markdown {
        output.push_str("```\n");
    }

    output
}

/// List uploaded files with their line counts
pub fn format_uploaded_files(records: &[SourceRecord]) -> String {
    let mut output = String::new();
    for record in records {
        output.push_str(&format!("• {} ({} lines)\n", record.path, record.line_count()));
    }
    output
}

/// Export a report to a JSON file
pub fn export_report_json(report: &Report, output_path: &Path) -> Result<()> {
    let file = File::create(output_path)
        .context(format!("Failed to create JSON output file: {}", output_path.display()))?;

    serde_json::to_writer_pretty(file, report).context("Failed to write JSON data")?;

    Ok(())
}

const HTML_TEMPLATE: &str = r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Python Code Analysis Report</title>
    <style>
        body {
            font-family: Arial, sans-serif;
            line-height: 1.6;
            color: #333;
            max-width: 1200px;
            margin: 0 auto;
            padding: 20px;
        }
        .main-header {
            text-align: center;
            padding: 2rem 0;
            background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
            color: white;
            border-radius: 10px;
            margin-bottom: 2rem;
        }
        .metric-card {
            display: inline-block;
            background: #f8f9ff;
            padding: 1.5rem;
            border-radius: 10px;
            border-left: 4px solid #667eea;
            margin: 1rem 1rem 1rem 0;
            min-width: 180px;
        }
        .tag {
            display: inline-block;
            background: #667eea;
            color: white;
            padding: 0.3rem 1rem;
            border-radius: 20px;
            margin: 0.3rem;
            font-size: 0.9rem;
        }
        .warning-box {
            background: #fff3cd;
            border-left: 4px solid #ffc107;
            padding: 1rem;
            border-radius: 5px;
            margin: 1rem 0;
        }
        .success-box {
            background: #d4edda;
            border-left: 4px solid #28a745;
            padding: 1rem;
            border-radius: 5px;
            margin: 1rem 0;
        }
        .timestamp {
            color: #7f8c8d;
            font-size: 0.9em;
        }
        pre {
            background: #f4f4f4;
            padding: 0.5rem;
            border-radius: 5px;
        }
    </style>
</head>
<body>
    <div class="main-header">
        <h1>Python Code Analysis Report</h1>
        <div class="timestamp">Generated on: {{timestamp}}</div>
    </div>

    <div>
        <div class="metric-card">Total Files<br><strong>{{report.total_files}}</strong></div>
        <div class="metric-card">Python Files<br><strong>{{report.python_files}}</strong></div>
        <div class="metric-card">Total Lines<br><strong>{{total_lines}}</strong></div>
    </div>

    <h2>LLM &amp; AI Libraries Detected</h2>
    {{#if report.detected_libraries}}
    <div>{{#each report.detected_libraries}}<span class="tag">{{this}}</span>{{/each}}</div>
    {{else}}
    <p>No LLM libraries detected</p>
    {{/if}}

    <h2>Frameworks &amp; Libraries</h2>
    {{#if report.detected_frameworks}}
    <div>{{#each report.detected_frameworks}}<span class="tag">{{this}}</span>{{/each}}</div>
    {{else}}
    <p>No major frameworks detected</p>
    {{/if}}

    <h2>Environment Variables Analysis</h2>
    {{#if findings}}
    <div class="warning-box">
        <strong>Hardcoded Credentials Found:</strong>
        {{#each findings}}
        <p>{{file}}</p>
        {{#each matches}}<pre>{{this}}</pre>{{/each}}
        {{/each}}
        <strong>Recommendation:</strong> Move these to environment variables!
    </div>
    {{else}}
    <div class="success-box">No hardcoded credentials detected</div>
    {{/if}}
    {{#if report.env_using_files}}
    <div class="success-box">{{env_file_count}} file(s) properly use environment variables</div>
    {{/if}}
    {{#if report.has_env_file}}
    <div class="success-box">.env file present</div>
    {{/if}}

    <h2>Architecture &amp; Patterns</h2>
    {{#if report.architecture_patterns}}
    <div>{{#each report.architecture_patterns}}<span class="tag">{{this}}</span>{{/each}}</div>
    {{else}}
    <p>Basic procedural structure</p>
    {{/if}}

    <h2>Best Practices</h2>
    {{#if report.best_practices}}
    <ul>{{#each report.best_practices}}<li>&#10003; {{this}}</li>{{/each}}</ul>
    {{else}}
    <p>Consider implementing more best practices</p>
    {{/if}}

    {{#if report.issues}}
    <h2>Issues</h2>
    <ul>{{#each report.issues}}<li>&#9888; {{this}}</li>{{/each}}</ul>
    {{/if}}

    <h2>Recommendations</h2>
    <ul>{{#each report.recommendations}}<li>{{this}}</li>{{/each}}</ul>

    <h2>Detailed File Analysis</h2>
    {{#each report.file_details}}
    <p><strong>{{name}}</strong> ({{lines}} lines)</p>
    <ul>
        {{#if llms}}<li>LLMs: {{#each llms}}{{this}}{{#unless @last}}, {{/unless}}{{/each}}</li>{{/if}}
        {{#if frameworks}}<li>Frameworks: {{#each frameworks}}{{this}}{{#unless @last}}, {{/unless}}{{/each}}</li>{{/if}}
        {{#if has_hardcoded}}<li>&#9888; Contains hardcoded credentials</li>{{/if}}
    </ul>
    {{/each}}
</body>
</html>
"#;

/// Render a report as a standalone HTML page
pub fn render_html_report(report: &Report) -> Result<String> {
    let mut handlebars = Handlebars::new();
    handlebars
        .register_template_string("report", HTML_TEMPLATE)
        .context("Failed to register HTML template")?;

    let findings: Vec<_> = report
        .credential_findings
        .iter()
        .map(|finding| {
            json!({
                "file": finding.file,
                "matches": finding.matches.iter().take(MAX_MATCHES_SHOWN).collect::<Vec<_>>(),
            })
        })
        .collect();

    let template_data = json!({
        "timestamp": chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        "report": report,
        "total_lines": format_number(report.total_lines),
        "findings": findings,
        "env_file_count": report.env_using_files.len(),
    });

    handlebars
        .render("report", &template_data)
        .context("Failed to render HTML template")
}

/// Create an HTML report file
pub fn create_html_report(report: &Report, output_path: &Path) -> Result<()> {
    let html = render_html_report(report)?;

    let mut file = File::create(output_path)
        .context(format!("Failed to create HTML output file: {}", output_path.display()))?;

    file.write_all(html.as_bytes())
        .context("Failed to write HTML data")?;

    Ok(())
}

/// Create a CSV report with one row per analyzed file
pub fn create_csv_report(report: &Report, output_path: &Path) -> Result<()> {
    let file = File::create(output_path)
        .context(format!("Failed to create CSV output file: {}", output_path.display()))?;

    let mut writer = csv::Writer::from_writer(file);

    writer
        .write_record(["File", "Lines", "LLM Libraries", "Frameworks", "Hardcoded Credentials"])
        .context("Failed to write CSV header")?;

    for detail in &report.file_details {
        let lines = detail.lines.to_string();
        let llms = detail.llms.join("; ");
        let frameworks = detail.frameworks.join("; ");
        let hardcoded = if detail.has_hardcoded { "yes" } else { "no" };
        writer
            .write_record([
                detail.name.as_str(),
                lines.as_str(),
                llms.as_str(),
                frameworks.as_str(),
                hardcoded,
            ])
            .context("Failed to write CSV record")?;
    }

    writer.flush().context("Failed to flush CSV writer")?;

    Ok(())
}
