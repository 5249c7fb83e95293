//! Diagnostic ID constants.
//!
//! Use these instead of string literals to get compile-time typo detection
//! and IDE autocomplete. Long-form explanations live in [`super::explain`].

/// Task type identifier contains `T` but does not start with it; corrected.
pub const INVALID_TASK_TYPE_ID: &str = "WFD1001";
/// Job type identifier contains `J` but does not start with it; corrected.
pub const INVALID_JOB_TYPE_ID: &str = "WFD1002";
/// Station identifier contains `S` but does not start with it; corrected.
pub const INVALID_STATION_ID: &str = "WFD1003";

/// Negative size or time value; the sign was stripped.
pub const NEGATIVE_VALUE: &str = "WFD1101";
/// Numeric field that could not be parsed; the token was ignored.
pub const UNPARSEABLE_NUMBER: &str = "WFD1102";

/// Token listed more than once within the same declaration run.
pub const DUPLICATE_ID: &str = "WFD1201";

/// Task type referenced by a job route but never declared in TASKTYPES.
pub const UNDECLARED_TASK_TYPE: &str = "WFD1301";
/// Job type declared again; the new declaration adds an alternative route.
pub const JOB_TYPE_REDECLARED: &str = "WFD1302";

/// Task type with no usable size anywhere; defaulted to 1.0.
pub const MISSING_DEFAULT_SIZE: &str = "WFD1401";

/// Task types declared but referenced by no station and no job route.
pub const UNUSED_TASK_TYPES: &str = "WFD2001";
/// Task types used by job routes but executable at no station.
pub const ORPHANED_TASK_TYPES: &str = "WFD2002";
