//! Fatal parse errors.
//!
//! Everything recoverable is reported as a [`jobflow_diagnostics::Diagnostic`]
//! instead; this enum covers only the conditions that abort the entire parse
//! with nothing usable returned.

/// A fatal condition encountered while reading or parsing a workflow file.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The source file could not be opened or read.
    #[error("workflow file '{path}' cannot be read")]
    Source {
        /// Path of the file that failed to open.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A non-blank, non-header line was encountered before any section
    /// header. The file is broken or information is missing.
    #[error("broken workflow file: line {line} belongs to no section")]
    BrokenFile {
        /// 1-based line number of the offending line.
        line: u32,
    },
}
