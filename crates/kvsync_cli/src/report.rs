//! Human- and machine-readable rendering of engine results.

use kvsync_engine::{Batch, DuplicateRecord, ExecutionSummary, FlatEntry, RunStatus};
use kvsync_protocol::{ExportEntry, OperationError};
use serde::Serialize;
use std::fmt::Write as _;
use std::io;

const RULE_WIDTH: usize = 60;

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    Text,
    /// JSON.
    Json,
}

/// Renders a value as pretty JSON.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

/// Formats the duplicate key report.
pub fn format_duplicates(duplicates: &[DuplicateRecord]) -> String {
    let mut out = String::from("ERROR: Duplicate keys detected across YAML files:\n\n");

    for dup in duplicates {
        let _ = writeln!(out, "Key: \"{}\"", dup.path);
        for occurrence in &dup.occurrences {
            let _ = writeln!(
                out,
                "  - File: {}, Value: \"{}\"",
                occurrence.source_id, occurrence.value
            );
        }
        out.push('\n');
    }

    let _ = writeln!(out, "Total duplicate keys found: {}", duplicates.len());
    out.push_str("Aborting operation to prevent data inconsistency.");
    out
}

/// Formats the dry-run listing of entries.
pub fn format_entries(entries: &[FlatEntry]) -> String {
    let mut out = String::from("Key-Value pairs to be synced:\n");
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));

    for entry in entries {
        let _ = writeln!(out, "Key:   {}", entry.path);
        let _ = writeln!(out, "Value: {}", entry.value);
        let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));
    }

    let _ = writeln!(out, "\nTotal: {} key-value pairs", entries.len());
    out
}

/// Formats the batch layout of a plan.
pub fn format_plan(batches: &[Batch]) -> String {
    let mut out = format!("Planned {} batch(es):\n", batches.len());
    for (index, batch) in batches.iter().enumerate() {
        let ops = batch.operations();
        match (ops.first(), ops.last()) {
            (Some(first), Some(last)) => {
                let _ = writeln!(
                    out,
                    "  Batch {}: {} operations ({} .. {})",
                    index + 1,
                    batch.len(),
                    first.path,
                    last.path
                );
            }
            _ => {
                let _ = writeln!(out, "  Batch {}: empty", index + 1);
            }
        }
    }
    out
}

/// Formats the execution summary.
pub fn format_summary(summary: &ExecutionSummary) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "\n{}", "=".repeat(RULE_WIDTH));
    out.push_str("Execution Summary\n");
    let _ = writeln!(out, "{}\n", "=".repeat(RULE_WIDTH));

    let _ = writeln!(out, "Total key-value pairs: {}", summary.total_entries);
    let _ = writeln!(out, "Total batches: {}", summary.total_batches);
    let _ = writeln!(out, "Successful batches: {}", summary.succeeded_batches);
    let _ = writeln!(out, "Failed batches: {}", summary.failed_batches);

    if summary.failed_batches > 0 {
        out.push_str("\nFailed Batches:\n");
        let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));
        for outcome in summary.failures() {
            let _ = writeln!(
                out,
                "Batch {}: {}",
                outcome.index + 1,
                outcome.failure_reason.as_deref().unwrap_or("failed")
            );
            write_operation_errors(&mut out, &outcome.operation_errors);
        }
    }

    out.push_str(match summary.status() {
        RunStatus::Success => "\n[SUCCESS] All operations completed successfully!\n",
        RunStatus::PartialFailure => "\n[WARNING] Partial success: Some batches failed.\n",
        RunStatus::Failed => "\n[ERROR] All batches failed.\n",
    });
    out
}

fn write_operation_errors(out: &mut String, errors: &[OperationError]) {
    for err in errors {
        let _ = writeln!(out, "  - Operation {}: {}", err.operation_index, err.message);
    }
}

/// Writes the outcome of a sync run in the requested format.
///
/// Nothing but the summary is written, so JSON output stays parseable.
pub fn write_sync_report<W: io::Write>(
    summary: &ExecutionSummary,
    format: OutputFormat,
    mut writer: W,
) -> io::Result<()> {
    match format {
        OutputFormat::Text => writeln!(writer, "{}", format_summary(summary)),
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, summary)?;
            writeln!(writer)
        }
    }
}

/// Writes the KV export JSON, tab-indented.
pub fn write_export<W: io::Write>(entries: &[FlatEntry], writer: W) -> io::Result<()> {
    let records: Vec<ExportEntry> = entries
        .iter()
        .map(|e| ExportEntry::new(e.path.as_str(), e.value.as_bytes()))
        .collect();

    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut ser = serde_json::Serializer::with_formatter(writer, formatter);
    records.serialize(&mut ser)?;
    ser.into_inner().write_all(b"\n")
}
