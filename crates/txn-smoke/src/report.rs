//! Human-readable and JSON rendering of a run.

use std::fmt::Write as _;

use colored::Colorize;
use serde::Serialize;

use crate::error::Result;
use crate::runner::{CheckResult, RunReport};

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Coloured table for terminals.
    #[default]
    Text,
    /// Single JSON document for automation.
    Json,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    endpoint: &'a str,
    passed: bool,
    results: &'a [CheckResult],
}

/// Render the report in the requested format.
pub fn render(format: OutputFormat, endpoint: &str, report: &RunReport) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(endpoint, report)),
        OutputFormat::Json => render_json(endpoint, report),
    }
}

#[must_use]
pub fn render_text(endpoint: &str, report: &RunReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", "Connected to:".bold(), endpoint);
    let _ = writeln!(out);

    for result in &report.results {
        let tag = if result.passed {
            "PASS".green().bold()
        } else {
            "FAIL".red().bold()
        };
        let _ = writeln!(out, "  [{tag}] {}", result.name);
        if let Some(detail) = &result.detail {
            let _ = writeln!(out, "         {}", detail.dimmed());
        }
    }

    let total = report.results.len();
    let passed = report.passed_count();
    let summary = format!("{passed}/{total} checks passed");
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{}",
        if report.all_passed() {
            summary.green()
        } else {
            summary.red()
        }
    );
    out
}

pub fn render_json(endpoint: &str, report: &RunReport) -> Result<String> {
    let doc = JsonReport {
        endpoint,
        passed: report.all_passed(),
        results: &report.results,
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}
