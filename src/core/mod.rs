/// Core module for project analysis
///
/// This module contains the pattern catalog, the report data model and the
/// analyzer that turns source records into a report.

pub mod analyzer;
pub mod patterns;
pub mod report;
