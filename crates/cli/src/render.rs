//! Diagnostic rendering for the terminal.
//!
//! Pretty mode turns each [`Diagnostic`] into an ariadne report annotated
//! with the source lines it covers; json mode emits the diagnostics array
//! verbatim for tooling.

use std::io::{self, IsTerminal};
use std::ops::Range;

use ariadne::{Color, Config, Fmt, Label, Report, ReportKind, Source};
use jobflow_diagnostics::{Diagnostic, LineRange, Severity};

/// Output format for diagnostic rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Format {
    /// Coloured, source-annotated output (ariadne).
    Pretty,
    /// Machine-readable JSON.
    Json,
}

impl Format {
    /// Resolve an explicit `--output` choice; without one, pick pretty on a
    /// TTY and json on a pipe.
    pub(crate) fn resolve_or_detect(explicit: Option<&str>) -> Self {
        match explicit {
            Some("json") => Format::Json,
            Some("pretty") => Format::Pretty,
            _ if io::stdout().is_terminal() => Format::Pretty,
            _ => Format::Json,
        }
    }
}

/// Render diagnostics in the given format.
///
/// - `Pretty` → coloured output to stderr (model data stays on stdout).
/// - `Json`   → JSON array to stdout.
pub(crate) fn render_diagnostics(
    source: &str,
    filename: &str,
    diagnostics: &[Diagnostic],
    format: Format,
) {
    match format {
        Format::Pretty => render_pretty(source, filename, diagnostics),
        Format::Json => {
            let json = serde_json::to_string_pretty(diagnostics)
                .expect("diagnostics serialize to JSON");
            println!("{json}");
        }
    }
}

fn severity_style(severity: &Severity) -> (ReportKind<'static>, Color) {
    match severity {
        Severity::Error => (ReportKind::Error, Color::Red),
        Severity::Warn => (ReportKind::Warning, Color::Yellow),
        Severity::Info => (ReportKind::Advice, Color::Blue),
        _ => (ReportKind::Warning, Color::White),
    }
}

/// Map a 1-based inclusive line range onto byte offsets in `source`.
///
/// Diagnostics carry whole-line ranges, so the result covers the first byte
/// of the start line through the last content byte of the end line. Ranges
/// past the end of the source clamp to its length.
fn line_byte_range(source: &str, lines: &LineRange) -> Range<usize> {
    let mut start = source.len();
    let mut end = source.len();
    let mut offset = 0;
    for (idx, raw) in source.split_inclusive('\n').enumerate() {
        let number = idx as u32 + 1;
        if number == lines.start {
            start = offset;
        }
        if number == lines.end {
            end = offset + raw.trim_end_matches(['\n', '\r']).len();
            break;
        }
        offset += raw.len();
    }
    let start = start.min(source.len());
    start..end.clamp(start, source.len())
}

/// The machine-readable context of a diagnostic as one `k=v, k=v` line.
fn context_line(diag: &Diagnostic) -> Option<String> {
    let ctx = diag.context.as_ref().filter(|ctx| !ctx.is_empty())?;
    Some(
        ctx.iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(", "),
    )
}

/// Render diagnostics as ariadne reports on stderr.
///
/// Diagnostics without a line range (the post-scan repairs) fall back to a
/// plain one-line form.
fn render_pretty(source: &str, filename: &str, diagnostics: &[Diagnostic]) {
    if diagnostics.is_empty() {
        return;
    }

    // One Source index shared by every report.
    let mut cache = (filename, Source::from(source));
    let config = Config::default().with_compact(false);

    for diag in diagnostics {
        let Some(lines) = &diag.lines else {
            eprintln!("{diag}");
            if let Some(ctx) = context_line(diag) {
                eprintln!("  = note: {ctx}");
            }
            if let Some(explanation) = diag.explain() {
                eprintln!("  = help: {explanation}");
            }
            continue;
        };

        let range = line_byte_range(source, lines);
        let (kind, color) = severity_style(&diag.severity);

        // The label carries the structured context when there is any; the
        // header already shows the message.
        let label_text = context_line(diag).unwrap_or_else(|| diag.message.clone());

        let mut report = Report::build(kind, (filename, range.clone()))
            .with_code(diag.id.as_ref())
            .with_message(&diag.message)
            .with_config(config)
            .with_label(
                Label::new((filename, range))
                    .with_message(label_text)
                    .with_color(color),
            );
        if let Some(explanation) = diag.explain() {
            report = report.with_help(explanation);
        }
        report.finish().eprint(&mut cache).ok();
    }
}

/// Print a count summary to stderr, e.g. `1 error, 3 warnings`.
pub(crate) fn print_summary(diagnostics: &[Diagnostic]) {
    let tally = |severity: Severity, noun: &str, color: Color| {
        let n = diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count();
        (n > 0).then(|| {
            let plural = if n == 1 { "" } else { "s" };
            format!("{}", format!("{n} {noun}{plural}").fg(color))
        })
    };

    let parts: Vec<String> = [
        tally(Severity::Error, "error", Color::Red),
        tally(Severity::Warn, "warning", Color::Yellow),
        tally(Severity::Info, "note", Color::Blue),
    ]
    .into_iter()
    .flatten()
    .collect();

    if !parts.is_empty() {
        eprintln!("{}", parts.join(", "));
    }
}
