//! Output renderers and formatting helpers for CLI commands.

use std::fmt::{self, Write};

use anyhow::anyhow;
use nexart_core::{PassThrough, RunReport};
use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

pub(crate) fn render_run_report(report: &RunReport, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => println!("{}", to_json(report)?),
        OutputFormat::Table => print!("{}", format_run_report(report)?),
    }
    Ok(())
}

pub(crate) fn render_pass_through(
    outcome: &PassThrough,
    columns: &[&str],
    format: OutputFormat,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => println!("{}", to_json(&outcome.body)?),
        OutputFormat::Table => print!("{}", format_pass_through(outcome, columns)?),
    }
    Ok(())
}

fn to_json<T: Serialize>(value: &T) -> CliResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))
}

fn table_error(err: fmt::Error) -> CliError {
    CliError::failure(anyhow!("failed to format table: {err}"))
}

pub(crate) fn format_run_report(report: &RunReport) -> CliResult<String> {
    let mut out = String::new();
    write_run_report(&mut out, report).map_err(table_error)?;
    Ok(out)
}

fn write_run_report(out: &mut impl Write, report: &RunReport) -> fmt::Result {
    writeln!(out, "run: {}", report.run_id)?;
    writeln!(out, "status: {}", report.message)?;
    let elapsed = report.finished_at - report.started_at;
    writeln!(out, "elapsed: {}ms", elapsed.num_milliseconds())?;

    writeln!(out)?;
    writeln!(out, "{:<32} {:<10} {:<16} ERROR", "REPOSITORY", "CLASS", "OUTCOME")?;
    for repo in &report.provisioned_repositories {
        writeln!(
            out,
            "{:<32} {:<10} {:<16} {}",
            repo.repository_name,
            repo.rclass.as_str(),
            repo.outcome.as_str(),
            repo.error.as_deref().unwrap_or("-")
        )?;
    }

    writeln!(out)?;
    writeln!(out, "migrated artifacts: {}", report.migrated_artifacts.len())?;
    writeln!(out, "failed artifacts: {}", report.failed_artifacts.len())?;
    for failed in &report.failed_artifacts {
        writeln!(
            out,
            "  {}/{}/{}: {}",
            failed.repository_name,
            failed.artifact_path,
            failed.artifact_filename,
            failed.error.as_deref().unwrap_or("unknown error")
        )?;
    }
    if !report.catalog_failures.is_empty() {
        writeln!(out, "catalog failures: {}", report.catalog_failures.len())?;
        for failure in &report.catalog_failures {
            let scope = failure.repository_name.as_deref().unwrap_or("<repositories>");
            writeln!(out, "  {scope}: {}", failure.reason)?;
        }
    }
    Ok(())
}

/// Table view of an upstream body. Arrays of objects become rows keyed by
/// `columns`; anything else is printed as pretty JSON.
pub(crate) fn format_pass_through(outcome: &PassThrough, columns: &[&str]) -> CliResult<String> {
    let mut out = String::new();
    write_pass_through(&mut out, outcome, columns).map_err(table_error)?;
    Ok(out)
}

fn write_pass_through(
    out: &mut impl Write,
    outcome: &PassThrough,
    columns: &[&str],
) -> fmt::Result {
    writeln!(out, "status: {}", outcome.status_code)?;
    match &outcome.body {
        Value::Array(rows) if !columns.is_empty() => {
            let header: Vec<String> = columns.iter().map(|column| column.to_uppercase()).collect();
            writeln!(out, "{}", header.join("\t"))?;
            for row in rows {
                let cells: Vec<String> = columns
                    .iter()
                    .map(|column| cell(row.get(*column)))
                    .collect();
                writeln!(out, "{}", cells.join("\t"))?;
            }
        }
        Value::Null => {}
        Value::String(text) => writeln!(out, "{text}")?,
        other => writeln!(out, "{other:#}")?,
    }
    Ok(())
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}
