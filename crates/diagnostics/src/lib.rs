//! Diagnostics for the jobflow toolchain.
//!
//! Provides [`Diagnostic`], [`Severity`], and [`LineRange`] types used to
//! report errors, warnings, and informational messages from the workflow
//! parser and validator. Diagnostic codes are defined in the [`codes`]
//! module.

#![warn(missing_docs)]

/// Diagnostic ID constants.
pub mod codes;

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Severity level for a diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Severity {
    /// Hard error — the input is invalid.
    Error,
    /// Warning — the input was auto-corrected or may produce unexpected results.
    Warn,
    /// Informational note.
    Info,
}

/// Inclusive 1-based line range in the source input.
///
/// Workflow files are parsed line by line, so diagnostics point at whole
/// lines rather than byte offsets. A single-line diagnostic has
/// `start == end`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineRange {
    /// First line of the range (1-based).
    pub start: u32,
    /// Last line of the range (inclusive).
    pub end: u32,
}

impl LineRange {
    /// Range covering a single line.
    ///
    /// Panics if `line` is 0; line numbers are 1-based.
    pub fn single(line: u32) -> Self {
        assert!(line > 0, "line numbers are 1-based, got 0");
        Self {
            start: line,
            end: line,
        }
    }

    /// Range covering `[start, end]` inclusive.
    ///
    /// Panics if `end < start` or `start` is 0.
    pub fn span(start: u32, end: u32) -> Self {
        assert!(start > 0, "line numbers are 1-based, got 0");
        assert!(end >= start, "LineRange end ({end}) < start ({start})");
        Self { start, end }
    }

    /// Whether the range covers exactly one line.
    pub fn is_single(&self) -> bool {
        self.start == self.end
    }
}

impl std::fmt::Display for LineRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_single() {
            write!(f, "line {}", self.start)
        } else {
            write!(f, "lines {}-{}", self.start, self.end)
        }
    }
}

/// A diagnostic message produced by the parser or validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Unique diagnostic code (e.g., `"WFD1001"`).
    pub id: Cow<'static, str>,
    /// Severity level.
    pub severity: Severity,
    /// Human-readable diagnostic message.
    pub message: String,
    /// Source lines this diagnostic relates to, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lines: Option<LineRange>,
    /// Machine-readable context for tooling. Keys and values are free-form strings.
    ///
    /// Uses `BTreeMap` for deterministic key ordering in serialized output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<BTreeMap<String, String>>,
}

impl Diagnostic {
    /// Create a diagnostic with the given fields.
    pub fn new(
        id: impl Into<Cow<'static, str>>,
        severity: Severity,
        message: impl Into<String>,
        lines: Option<LineRange>,
    ) -> Self {
        Self {
            id: id.into(),
            severity,
            message: message.into(),
            lines,
            context: None,
        }
    }

    /// Shorthand for an `Error` diagnostic.
    pub fn error(
        id: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        lines: Option<LineRange>,
    ) -> Self {
        Self::new(id, Severity::Error, message, lines)
    }

    /// Shorthand for a `Warn` diagnostic.
    pub fn warn(
        id: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        lines: Option<LineRange>,
    ) -> Self {
        Self::new(id, Severity::Warn, message, lines)
    }

    /// Shorthand for an `Info` diagnostic.
    pub fn info(
        id: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        lines: Option<LineRange>,
    ) -> Self {
        Self::new(id, Severity::Info, message, lines)
    }

    /// Attach machine-readable context metadata (builder pattern).
    pub fn with_context(mut self, ctx: BTreeMap<String, String>) -> Self {
        self.context = Some(ctx);
        self
    }

    /// Returns the human-readable explanation for this diagnostic's code, if available.
    pub fn explain(&self) -> Option<&'static str> {
        explain(&self.id)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warn => write!(f, "warn"),
            Severity::Info => write!(f, "info"),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.id, self.message)?;
        if let Some(lines) = &self.lines {
            write!(f, " ({lines})")?;
        }
        Ok(())
    }
}

/// Returns the human-readable explanation for a diagnostic code, if known.
pub fn explain(id: &str) -> Option<&'static str> {
    match id {
        codes::INVALID_TASK_TYPE_ID => Some(
            "A task type identifier must be the letter T followed by digits \
             (e.g. T3). The token contained a T elsewhere, so it was rewritten \
             by removing every T and restoring a single leading T.",
        ),
        codes::INVALID_JOB_TYPE_ID => Some(
            "A job type identifier must be the letter J followed by digits \
             (e.g. J2). The token contained a J elsewhere, so it was rewritten \
             by removing every J and restoring a single leading J.",
        ),
        codes::INVALID_STATION_ID => Some(
            "A station identifier must be the letter S followed by digits \
             (e.g. S1). The token contained an S elsewhere, so it was rewritten \
             by removing every S and restoring a single leading S.",
        ),
        codes::NEGATIVE_VALUE => Some(
            "Sizes and service times must be non-negative. The leading minus \
             sign was stripped and the absolute value was used.",
        ),
        codes::UNPARSEABLE_NUMBER => Some(
            "A token in a numeric position could not be read as a decimal \
             number (using '.' as the fractional separator) and was skipped.",
        ),
        codes::DUPLICATE_ID => Some(
            "The same token was listed more than once within one section \
             run. The later occurrence was ignored.",
        ),
        codes::UNDECLARED_TASK_TYPE => Some(
            "A job route referenced a task type that was never declared in the \
             TASKTYPES section. The task type was inserted without a default \
             size so parsing could continue.",
        ),
        codes::JOB_TYPE_REDECLARED => Some(
            "Declaring an existing job type again is how alternative routes \
             are expressed: the new task sequence was appended as an \
             additional option for that job type.",
        ),
        codes::MISSING_DEFAULT_SIZE => Some(
            "A task type ended up with no size from either the TASKTYPES \
             section or any job route, so the default size 1.0 was assigned.",
        ),
        codes::UNUSED_TASK_TYPES => Some(
            "These task types are declared but no station executes them and no \
             job route references them. They are inert in the model.",
        ),
        codes::ORPHANED_TASK_TYPES => Some(
            "These task types are part of at least one job route but no \
             station executes them. A station with randomized parameters was \
             synthesized so every job-reachable task type has an executor.",
        ),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── LineRange ───────────────────────────────────────────────────────

    #[test]
    fn line_range_single() {
        let r = LineRange::single(5);
        assert_eq!(r.start, 5);
        assert_eq!(r.end, 5);
        assert!(r.is_single());
        assert_eq!(r.to_string(), "line 5");
    }

    #[test]
    fn line_range_span() {
        let r = LineRange::span(3, 9);
        assert!(!r.is_single());
        assert_eq!(r.to_string(), "lines 3-9");
    }

    #[test]
    #[should_panic(expected = "LineRange end (2) < start (4)")]
    fn line_range_inverted_panics() {
        LineRange::span(4, 2);
    }

    #[test]
    #[should_panic(expected = "1-based")]
    fn line_range_zero_panics() {
        LineRange::single(0);
    }

    // ── Severity Display ────────────────────────────────────────────────

    #[test]
    fn severity_display() {
        assert_eq!(format!("{}", Severity::Error), "error");
        assert_eq!(format!("{}", Severity::Warn), "warn");
        assert_eq!(format!("{}", Severity::Info), "info");
    }

    // ── Diagnostic constructors ─────────────────────────────────────────

    #[test]
    fn diagnostic_warn_constructor() {
        let d = Diagnostic::warn(codes::DUPLICATE_ID, "listed twice", Some(LineRange::single(2)));
        assert_eq!(d.id, "WFD1201");
        assert_eq!(d.severity, Severity::Warn);
        assert_eq!(d.lines, Some(LineRange::single(2)));
    }

    #[test]
    fn diagnostic_display_with_lines() {
        let d = Diagnostic::warn(codes::DUPLICATE_ID, "listed twice", Some(LineRange::single(2)));
        assert_eq!(format!("{d}"), "warn[WFD1201]: listed twice (line 2)");
    }

    #[test]
    fn diagnostic_display_without_lines() {
        let d = Diagnostic::error(codes::UNUSED_TASK_TYPES, "unused", None);
        assert_eq!(format!("{d}"), "error[WFD2001]: unused");
    }

    // ── explain ─────────────────────────────────────────────────────────

    #[test]
    fn all_codes_have_explanations() {
        let all = [
            codes::INVALID_TASK_TYPE_ID,
            codes::INVALID_JOB_TYPE_ID,
            codes::INVALID_STATION_ID,
            codes::NEGATIVE_VALUE,
            codes::UNPARSEABLE_NUMBER,
            codes::DUPLICATE_ID,
            codes::UNDECLARED_TASK_TYPE,
            codes::JOB_TYPE_REDECLARED,
            codes::MISSING_DEFAULT_SIZE,
            codes::UNUSED_TASK_TYPES,
            codes::ORPHANED_TASK_TYPES,
        ];
        for code in &all {
            assert!(
                explain(code).is_some(),
                "diagnostic code {code} has no explain() entry"
            );
        }
    }

    #[test]
    fn explain_unknown_code() {
        assert!(explain("WFD9999").is_none());
    }

    // ── Serde ───────────────────────────────────────────────────────────

    #[test]
    fn diagnostic_serde_roundtrip() {
        let d = Diagnostic::warn(
            codes::NEGATIVE_VALUE,
            "negative size",
            Some(LineRange::span(2, 4)),
        )
        .with_context(BTreeMap::from([("token".into(), "-3.5".into())]));
        let json = serde_json::to_string(&d).unwrap();
        let d2: Diagnostic = serde_json::from_str(&json).unwrap();
        assert_eq!(d, d2);
    }

    #[test]
    fn diagnostic_serde_omits_none_fields() {
        let d = Diagnostic::warn(codes::NEGATIVE_VALUE, "test", None);
        let json = serde_json::to_string(&d).unwrap();
        assert!(!json.contains("lines"), "None lines should be omitted: {json}");
        assert!(
            !json.contains("context"),
            "None context should be omitted: {json}"
        );
    }
}
