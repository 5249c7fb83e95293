//! Jobflow toolchain core library.
//!
//! Provides tolerant parsing and validation of compact workflow definition
//! files describing task types, job types with alternative routes, and the
//! stations that execute them. The main entry points are [`parse_str`] and
//! [`parse_file`]; both return a repaired model together with the
//! diagnostics produced while getting there.

#![warn(missing_docs)]

/// Fatal errors.
pub mod error;
/// Parsed data model: task type, job type and station tables.
pub mod model;
/// Section-based tolerant parser.
pub mod parse;
/// Line reading and cleaning.
pub mod source;

mod validate;

/// JSON export helpers.
pub mod dump;

// ── Convenience re-exports ──────────────────────────────────────────────────
// Flat imports for the most common entry points. The full module paths
// remain available for less common types.

pub use error::Error;

pub use model::{
    DEFAULT_SIZE, JobTypeId, JobTypeTable, Route, RouteStep, Service, StationConfig, StationId,
    StationTable, TaskTypeId, TaskTypeTable, UNSIZED, Workflow,
};

pub use parse::{ParseOutcome, parse_file, parse_file_with_rng, parse_str, parse_str_with_rng};

// Diagnostics (re-exported from the diagnostics crate)
pub use jobflow_diagnostics::{Diagnostic, LineRange, Severity, codes};

// Serialization helpers
pub use dump::{outcome_to_pretty_json, workflow_to_pretty_json};
