//! Line reader for workflow definition files.
//!
//! Produces a fully materialized, 1-based line-number-indexed sequence of
//! cleaned, non-blank lines. Line numbers of discarded blank lines are not
//! reused, so gaps in the sequence correspond to removed lines.

use std::fs;
use std::path::Path;

use crate::error::Error;

/// A cleaned source line with its original 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// 1-based physical line number in the source.
    pub number: u32,
    /// Cleaned line text (trimmed, stray punctuation removed).
    pub text: String,
}

/// Read a workflow file and clean its lines.
///
/// Failing to open or read the file is fatal.
pub fn read_lines(path: &Path) -> Result<Vec<Line>, Error> {
    let input = fs::read_to_string(path).map_err(|source| Error::Source {
        path: path.display().to_string(),
        source,
    })?;
    Ok(clean_lines(&input))
}

/// Clean an in-memory source: trim each line, strip characters outside the
/// token grammar, and drop lines that end up empty.
pub fn clean_lines(input: &str) -> Vec<Line> {
    let mut lines = Vec::new();
    for (idx, raw) in input.lines().enumerate() {
        let text = clean_line(raw);
        if text.is_empty() {
            continue;
        }
        lines.push(Line {
            number: idx as u32 + 1,
            text,
        });
    }
    lines
}

/// Strip characters that are not part of the token grammar.
///
/// Kept: ASCII letters and digits (identifiers, flags, section keywords),
/// `.` and `-` (numeric syntax), parentheses (structural separators), and
/// whitespace. Everything else, commas and other punctuation included, is
/// removed. The result is trimmed.
fn clean_line(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|&c| {
            c.is_ascii_alphanumeric()
                || c.is_ascii_whitespace()
                || matches!(c, '.' | '-' | '(' | ')')
        })
        .collect();
    cleaned.trim().to_string()
}

/// Split a cleaned line into tokens, treating parentheses as separators.
pub(crate) fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| c.is_ascii_whitespace() || c == '(' || c == ')')
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_keep_numbering_gaps() {
        let lines = clean_lines("TASKTYPES\n\n  \nT1 2.0\n");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].number, 1);
        assert_eq!(lines[0].text, "TASKTYPES");
        assert_eq!(lines[1].number, 4);
        assert_eq!(lines[1].text, "T1 2.0");
    }

    #[test]
    fn punctuation_is_stripped() {
        assert_eq!(clean_line("  T1, 2.0;  "), "T1 2.0");
        assert_eq!(clean_line("J1: T1 -> T2"), "J1 T1 - T2");
        assert_eq!(clean_line("\"T1\"\t2.0"), "T1\t2.0");
    }

    #[test]
    fn non_ascii_is_stripped() {
        assert_eq!(clean_line("T1 ±2.0"), "T1 2.0");
    }

    #[test]
    fn line_of_only_punctuation_is_dropped() {
        let lines = clean_lines("T1\n,,;;\nT2");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].number, 3);
    }

    #[test]
    fn parenthesis_lines_survive_cleaning() {
        let lines = clean_lines("(\n)\n");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "(");
        assert_eq!(lines[1].text, ")");
    }

    #[test]
    fn tokens_split_on_parens_and_whitespace() {
        let toks: Vec<&str> = tokens("(T1 2.0)(T2)").collect();
        assert_eq!(toks, vec!["T1", "2.0", "T2"]);
    }
}
