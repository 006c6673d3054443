//! Report rendering and output.
//!
//! Text reports use the same `[OK]`/`[FAIL]` markers as the progress logs.
//! JSON reports are the serialized [`RunReport`].

use crate::{EnvStatus, OutputArgs, OutputFormat};
use connprobe_core::error::ConnProbeError;
use connprobe_core::{DiagnosticReport, ProbeResult, Result, RunReport, VariantSummary};
use std::fmt::Write as _;
use std::path::Path;

/// Renders a run report in the requested format.
///
/// # Errors
/// Returns error if JSON serialization fails.
pub fn render_report(report: &RunReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => report.to_json(),
        OutputFormat::Text => Ok(render_report_text(report)),
    }
}

/// Renders an env status in the requested format.
///
/// # Errors
/// Returns error if JSON serialization fails.
pub fn render_env(status: &EnvStatus, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(status)
            .map_err(|e| ConnProbeError::serialization("env status to JSON", e)),
        OutputFormat::Text => {
            let mut out = String::new();
            if let Some(redacted) = &status.redacted {
                let _ = writeln!(out, "[OK] {} is set", status.variable);
                let _ = writeln!(out, "  length: {}", status.length.unwrap_or_default());
                let _ = writeln!(out, "  value:  {redacted}");
                render_warnings(&mut out, &status.warnings);
            } else {
                let _ = writeln!(out, "[FAIL] {} is not set", status.variable);
            }
            Ok(out)
        }
    }
}

/// Text rendering of every populated report section.
pub fn render_report_text(report: &RunReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Target: {}", report.target);

    if let Some(diagnostics) = &report.diagnostics {
        out.push('\n');
        render_diagnostics(&mut out, diagnostics);
    }

    if !report.variants.is_empty() {
        out.push('\n');
        render_variants(&mut out, &report.variants);
    }

    if !report.probes.is_empty() {
        out.push('\n');
        render_probes(&mut out, &report.probes);
        let _ = writeln!(
            out,
            "\n{} of {} probe(s) succeeded",
            report.successful_probes(),
            report.probes.len()
        );
    }

    out
}

fn render_diagnostics(out: &mut String, diagnostics: &DiagnosticReport) {
    out.push_str("Diagnostics:\n");
    let entries = diagnostics.entries();
    let width = entries.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    for (name, value) in entries {
        let _ = writeln!(out, "  {name:<width$}  {value}");
    }
    render_warnings(out, &diagnostics.warnings);
}

fn render_warnings(out: &mut String, warnings: &[String]) {
    if warnings.is_empty() {
        out.push_str("[OK] No structural problems found\n");
        return;
    }
    let _ = writeln!(out, "Warnings ({}):", warnings.len());
    for warning in warnings {
        let _ = writeln!(out, "  - {warning}");
    }
}

fn render_variants(out: &mut String, variants: &[VariantSummary]) {
    let _ = writeln!(out, "Variants ({}):", variants.len());
    let width = variants.iter().map(|v| v.label.len()).max().unwrap_or(0);
    for variant in variants {
        let _ = writeln!(out, "  {:<width$}  {}", variant.label, variant.candidate);
    }
}

fn render_probes(out: &mut String, probes: &[ProbeResult]) {
    out.push_str("Probes:\n");
    for probe in probes {
        if probe.success {
            let _ = writeln!(out, "  [OK]   {} ({} ms)", probe.label, probe.elapsed_ms);
            continue;
        }
        let _ = write!(
            out,
            "  [FAIL] {} ({} ms): {}",
            probe.label,
            probe.elapsed_ms,
            probe.error_name().unwrap_or("UnknownError")
        );
        if let Some(code) = probe.error_code() {
            let _ = write!(out, " [code {code}]");
        }
        let _ = writeln!(out);
        if let Some(message) = probe.error_message() {
            let _ = writeln!(out, "         {message}");
        }
    }
}

/// Writes rendered output to the configured file, or stdout.
///
/// # Errors
/// Returns error if the file cannot be written.
pub async fn emit(content: &str, output: &OutputArgs) -> Result<()> {
    match &output.output {
        Some(path) => {
            save_output(content, path).await?;
            tracing::info!("[OK] Report written to {}", path.display());
            Ok(())
        }
        None => {
            print!("{content}");
            if !content.ends_with('\n') {
                println!();
            }
            Ok(())
        }
    }
}

/// Saves rendered output to a file.
///
/// # Errors
/// Returns an I/O error naming the path if the write fails.
pub async fn save_output(content: &str, path: &Path) -> Result<()> {
    tokio::fs::write(path, content)
        .await
        .map_err(|e| ConnProbeError::Io {
            context: format!("Failed to write to {}", path.display()),
            source: e,
        })
}
