/// Python Project Analyzer - static analysis reports for Python projects
///
/// The main entry point for the analyzer application. It parses command-line
/// arguments, ingests the project, runs the analysis and renders the report.

use anyhow::Result;
use clap::{ArgAction, ArgGroup, Parser};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, LevelFilter};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process;
use std::time::{Duration, Instant};

use py_project_analyzer::app::{self, ProjectInput};
use py_project_analyzer::config::{load_config, AnalyzerConfig};
use py_project_analyzer::utils::output_formatter;
use py_project_analyzer::ProjectAnalyzer;

/// Command line argument structure
#[derive(Parser, Debug)]
#[command(
    name = "py_project_analyzer",
    version,
    about = "Analyze a Python project for LLMs, frameworks, env vars and architecture",
    long_about = "This tool scans a Python project and reports:
- LLM and AI client libraries in use
- Frameworks and general-purpose libraries
- Hardcoded credentials and environment variable usage
- Architecture patterns, best practices, issues and recommendations"
)]
#[command(group(
    ArgGroup::new("input")
        .required(true)
        .args(["file_paths", "zip", "dir"]),
))]
struct Args {
    /// Individual project files to analyze (.py, requirements.txt, .env, ...)
    #[arg(name = "file_paths")]
    file_paths: Vec<String>,

    /// ZIP archive containing the project
    #[arg(long = "zip")]
    zip: Option<String>,

    /// Analyze all files in directory (recursively)
    #[arg(long = "dir")]
    dir: Option<String>,

    /// Maximum file size to analyze in MB
    #[arg(long = "max-size")]
    max_size: Option<u64>,

    /// Maximum number of files to analyze
    #[arg(long = "max-files")]
    max_files: Option<usize>,

    /// Output in markdown format (wrapped in triple backticks)
    #[arg(long = "md", action = ArgAction::SetTrue)]
    md: bool,

    /// List the ingested files before the report
    #[arg(long = "list-files", action = ArgAction::SetTrue)]
    list_files: bool,

    /// Export the report to a JSON file
    #[arg(long = "json")]
    json: Option<String>,

    /// Export the report to an HTML file
    #[arg(long = "html")]
    html: Option<String>,

    /// Export the per-file breakdown to a CSV file
    #[arg(long = "csv")]
    csv: Option<String>,

    /// Directory to store all output files
    #[arg(long = "output-dir")]
    output_dir: Option<String>,

    /// Suppress terminal output
    #[arg(long = "quiet", action = ArgAction::SetTrue)]
    quiet: bool,

    /// Omit the per-file breakdown
    #[arg(long = "summary-only", action = ArgAction::SetTrue)]
    summary_only: bool,

    /// Path to JSON configuration file
    #[arg(long = "config")]
    config: Option<String>,

    /// Set logging level (default: from configuration, else INFO)
    #[arg(long = "log-level")]
    log_level: Option<LevelFilter>,

    /// Log file path (default: from configuration)
    #[arg(long = "log-file")]
    log_file: Option<String>,
}

/// Main entry point function
fn main() -> Result<()> {
    let start_time = Instant::now();

    let args = Args::parse();

    // The log file location comes from configuration, so loading it is not logged
    let config = resolve_config(&args);

    setup_logging(&args, &config);

    let input = project_input(&args);

    let spinner = start_spinner(&args, "Extracting files...");
    let records = app::collect_sources(&input, &config)?;
    if let Some(pb) = &spinner {
        pb.finish_and_clear();
    }

    if records.is_empty() {
        eprintln!("{}", "Error: No Python project files found for analysis".red());
        eprintln!("Run with --help for usage information");
        process::exit(1);
    }

    if !args.quiet {
        println!("{} {} files", "Loaded".green(), records.len());
        if args.list_files {
            print!("{}", output_formatter::format_uploaded_files(&records));
        }
    }

    let spinner = start_spinner(&args, "Analyzing your Python code...");
    let analysis = ProjectAnalyzer::new(config.limits()).analyze(&records);
    if let Some(pb) = &spinner {
        pb.finish_and_clear();
    }

    let report = match analysis {
        Ok(report) => report,
        Err(e) => {
            error!("Analysis failed: {}", e);
            eprintln!("{} {}", "Error:".red(), e);
            process::exit(1);
        }
    };

    export_report(&report, &args)?;

    if !args.quiet {
        print!(
            "{}",
            output_formatter::format_report(&report, args.md, args.summary_only)
        );
        println!(
            "\n{} {:.2} seconds",
            "Time elapsed:".green(),
            start_time.elapsed().as_secs_f64()
        );
    }

    Ok(())
}

/// Load the configuration file and apply command line overrides
fn resolve_config(args: &Args) -> AnalyzerConfig {
    let mut config = load_config(args.config.as_deref().map(Path::new));

    if let Some(max_files) = args.max_files {
        config.max_files = max_files;
    }
    if let Some(max_size) = args.max_size {
        config.max_file_size_mb = max_size;
    }
    if let Some(log_file) = &args.log_file {
        config.log_file = log_file.clone();
    }

    config
}

/// Set up logging with file output
fn setup_logging(args: &Args, config: &AnalyzerConfig) {
    let mut builder = env_logger::Builder::new();

    let level = args
        .log_level
        .or_else(|| config.log_level.parse().ok())
        .unwrap_or(LevelFilter::Info);
    builder.filter_level(level);

    builder.format(|buf, record| {
        use chrono::Local;
        use std::io::Write;
        writeln!(
            buf,
            "{} - {} - {} - {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.target(),
            record.args()
        )
    });

    if let Ok(file) = File::create(&config.log_file) {
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
}

fn project_input(args: &Args) -> ProjectInput {
    if let Some(zip) = &args.zip {
        ProjectInput::Zip(PathBuf::from(zip))
    } else if let Some(dir) = &args.dir {
        ProjectInput::Directory(PathBuf::from(dir))
    } else {
        ProjectInput::Files(args.file_paths.iter().map(PathBuf::from).collect())
    }
}

fn start_spinner(args: &Args, message: &'static str) -> Option<ProgressBar> {
    if args.quiet {
        return None;
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}

/// Export the report based on command line arguments
fn export_report(report: &py_project_analyzer::Report, args: &Args) -> Result<()> {
    if let Some(output_dir) = &args.output_dir {
        std::fs::create_dir_all(output_dir)?;
    }

    if let Some(json_path) = &args.json {
        let path = output_path(args, json_path);
        output_formatter::export_report_json(report, &path)?;
        info!("Wrote JSON report to {}", path.display());
    }

    if let Some(html_path) = &args.html {
        let path = output_path(args, html_path);
        output_formatter::create_html_report(report, &path)?;
        info!("Wrote HTML report to {}", path.display());
    }

    if let Some(csv_path) = &args.csv {
        let path = output_path(args, csv_path);
        output_formatter::create_csv_report(report, &path)?;
        info!("Wrote CSV report to {}", path.display());
    }

    Ok(())
}

/// Place an output file inside the output directory when one is given
fn output_path(args: &Args, file_name: &str) -> PathBuf {
    match &args.output_dir {
        Some(output_dir) => PathBuf::from(output_dir).join(file_name),
        None => PathBuf::from(file_name),
    }
}
