mod render;

use std::fs;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use jobflow_core::parse::ParseOutcome;
use jobflow_core::{Severity, workflow_to_pretty_json};
use jobflow_diagnostics as diag;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::render::{Format, print_summary, render_diagnostics};

// ── CLI definition ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "jobflow",
    version,
    about = "Jobflow toolchain — parse and check compact workflow definition files"
)]
struct Cli {
    /// Output mode: "pretty" for coloured terminal output, "json" for
    /// machine-readable JSON. Defaults to "pretty" when stdout is a TTY,
    /// "json" otherwise.
    #[arg(long, global = true, value_parser = ["pretty", "json"])]
    output: Option<String>,

    /// Seed for the randomized station synthesis. With a fixed seed, a given
    /// input always produces the same model.
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Parse a workflow file and print the repaired model.
    Parse { file: String },

    /// Check a workflow file and report every correction that was needed.
    Check { file: String },

    /// Explain a diagnostic ID (e.g. WFD1201).
    Explain { id: String },
}

// ── Main ────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    let format = Format::resolve_or_detect(cli.output.as_deref());

    match cli.cmd {
        Cmd::Parse { file } => cmd_parse(&file, cli.seed, format)?,
        Cmd::Check { file } => cmd_check(&file, cli.seed, format)?,
        Cmd::Explain { id } => cmd_explain(&id, format)?,
    }

    Ok(())
}

// ── Commands ────────────────────────────────────────────────────────────

fn cmd_parse(file: &str, seed: Option<u64>, format: Format) -> Result<()> {
    let (input, outcome) = parse_workflow(file, seed)?;

    match format {
        Format::Json => {
            // Single valid JSON object to stdout.
            let out = serde_json::json!({
                "workflow": outcome.workflow,
                "diagnostics": outcome.diagnostics,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            // Model to stdout, diagnostics to stderr.
            println!("{}", workflow_to_pretty_json(&outcome.workflow));
            if !outcome.diagnostics.is_empty() {
                render_diagnostics(&input, file, &outcome.diagnostics, format);
                print_summary(&outcome.diagnostics);
            }
        }
    }

    exit_on_errors(&outcome.diagnostics);
    Ok(())
}

fn cmd_check(file: &str, seed: Option<u64>, format: Format) -> Result<()> {
    let (input, outcome) = parse_workflow(file, seed)?;
    let ok = outcome.diagnostics.is_empty();

    match format {
        Format::Json => {
            let out = serde_json::json!({
                "ok": ok,
                "diagnostics": outcome.diagnostics,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            render_diagnostics(&input, file, &outcome.diagnostics, format);
            print_summary(&outcome.diagnostics);
            if ok {
                eprintln!("workflow ok");
            }
        }
    }

    exit_on_errors(&outcome.diagnostics);
    Ok(())
}

fn cmd_explain(id: &str, format: Format) -> Result<()> {
    match format {
        Format::Json => {
            let text = diag::explain(id);
            let out = serde_json::json!({
                "id": id,
                "explanation": text,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            // Explanation is the expected output — write to stdout, not stderr.
            if let Some(text) = diag::explain(id) {
                use ariadne::Fmt;
                println!("{}: {}", id.fg(ariadne::Color::Cyan), text);
            } else {
                println!("{}: (no explanation available)", id);
            }
        }
    }
    Ok(())
}

// ── Helpers ─────────────────────────────────────────────────────────────

/// Read and parse a workflow file, honoring an optional synthesis seed.
fn parse_workflow(file: &str, seed: Option<u64>) -> Result<(String, ParseOutcome)> {
    let input =
        fs::read_to_string(file).with_context(|| format!("cannot read workflow file '{file}'"))?;
    let outcome = match seed {
        Some(seed) => {
            jobflow_core::parse_str_with_rng(&input, &mut StdRng::seed_from_u64(seed))
        }
        None => jobflow_core::parse_str(&input),
    }
    .with_context(|| format!("cannot parse workflow file '{file}'"))?;
    Ok((input, outcome))
}

/// Exit with code 1 if any diagnostic is an error.
/// Warnings and info do not cause a non-zero exit.
fn exit_on_errors(diagnostics: &[diag::Diagnostic]) {
    if diagnostics
        .iter()
        .any(|d| matches!(d.severity, Severity::Error))
    {
        process::exit(1);
    }
}
