/// Utility modules for the project analyzer
///
/// This module contains project ingestion (archives, uploaded files,
/// directories) and report formatting.

pub mod file_utils;
pub mod output_formatter;
