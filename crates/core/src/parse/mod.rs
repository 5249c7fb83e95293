//! Workflow definition parser.
//!
//! A single-pass, line-oriented, error-tolerant parser. A state machine
//! dispatches lines among the three sections (`TASKTYPES`, `JOBTYPES`,
//! `STATIONS`); each section is itself a small token-level state machine.
//! After the scan, a repair pass reconciles the tables.
//!
//! The parser auto-corrects malformed input wherever it can, logging a
//! [`Diagnostic`] for every correction; only an unreadable source or a line
//! belonging to no section abort the parse.

mod job_types;
mod stations;
mod task_types;

use std::path::Path;

use jobflow_diagnostics::Diagnostic;
use rand::Rng;
use serde::Serialize;

use crate::error::Error;
use crate::model::{JobTypeId, StationId, TaskTypeId, Workflow};
use crate::source::{self, Line};

/// Shorthand for building a `BTreeMap<String, String>` context from key-value pairs.
macro_rules! ctx {
    ($($k:expr => $v:expr),+ $(,)?) => {
        std::collections::BTreeMap::from([$(($k.into(), $v.into())),+])
    };
}
pub(crate) use ctx;

/// Result of parsing a workflow definition.
#[derive(Debug, Serialize)]
pub struct ParseOutcome {
    /// The parsed, repaired workflow model.
    pub workflow: Workflow,
    /// Diagnostics produced during parsing and repair, in emission order.
    pub diagnostics: Vec<Diagnostic>,
}

// ── Public API ──────────────────────────────────────────────────────────

/// Parse a workflow definition from an in-memory string.
///
/// Station synthesis draws from the thread rng; use [`parse_str_with_rng`]
/// to pin it.
pub fn parse_str(input: &str) -> Result<ParseOutcome, Error> {
    parse_str_with_rng(input, &mut rand::rng())
}

/// Parse a workflow definition with an injected random source.
///
/// Everything except station synthesis is deterministic, so a seeded `rng`
/// makes the whole parse reproducible.
pub fn parse_str_with_rng<R: Rng + ?Sized>(
    input: &str,
    rng: &mut R,
) -> Result<ParseOutcome, Error> {
    Parser::new().run(&source::clean_lines(input), rng)
}

/// Parse a workflow definition file.
pub fn parse_file(path: impl AsRef<Path>) -> Result<ParseOutcome, Error> {
    parse_file_with_rng(path, &mut rand::rng())
}

/// Parse a workflow definition file with an injected random source.
pub fn parse_file_with_rng<R: Rng + ?Sized>(
    path: impl AsRef<Path>,
    rng: &mut R,
) -> Result<ParseOutcome, Error> {
    Parser::new().run(&source::read_lines(path.as_ref())?, rng)
}

// ── Section dispatch ────────────────────────────────────────────────────

/// The currently active section of the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    TaskTypes,
    JobTypes,
    Stations,
}

const HEADERS: [&str; 3] = ["TASKTYPES", "JOBTYPES", "STATIONS"];

/// Parse position within the TASKTYPES section.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) enum TaskPos {
    /// Expecting a task type identifier.
    #[default]
    ExpectId,
    /// A task type identifier was just read; an optional size may follow.
    ExpectSize(TaskTypeId),
}

/// Parse position within the JOBTYPES section.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) enum JobPos {
    /// Expecting a job type or task type identifier.
    #[default]
    ExpectId,
    /// A task type was just appended; an optional size override may follow.
    ExpectSizeOverride,
}

/// Parse position within the STATIONS section.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) enum StationPos {
    /// Expecting a station identifier.
    #[default]
    ExpectId,
    /// First positional attribute after the station identifier.
    ExpectCapacity,
    /// Second positional attribute.
    ExpectMultiFlag,
    /// Third positional attribute.
    ExpectFifoFlag,
    /// Dynamic part: expecting a task type identifier.
    ExpectTask,
    /// A task type was just read; its service time must follow.
    ExpectTime(TaskTypeId),
    /// A service time was just recorded; an optional tolerance may follow.
    ExpectTolerance(TaskTypeId),
}

/// The workflow parser. Build with [`Parser::new`], consume with `run`.
pub(crate) struct Parser {
    pub(crate) workflow: Workflow,
    pub(crate) diags: Vec<Diagnostic>,
    section: Option<Section>,

    // TASKTYPES state
    pub(crate) task_pos: TaskPos,
    /// Tokens already seen in the current TASKTYPES run, for duplicate
    /// detection. Reset at each TASKTYPES header.
    pub(crate) task_run_seen: std::collections::HashSet<String>,

    // JOBTYPES state
    pub(crate) job_pos: JobPos,
    pub(crate) current_job: Option<JobTypeId>,

    // STATIONS state
    pub(crate) station_pos: StationPos,
    pub(crate) current_station: Option<StationId>,
    /// Task types not yet claimed by any station. Seeded from the task type
    /// table at the first STATIONS header; `None` until then.
    pub(crate) unclaimed: Option<Vec<TaskTypeId>>,
    /// Line number of the first STATIONS header, anchoring the line range of
    /// the unused/orphan report.
    pub(crate) stations_start: Option<u32>,
    pub(crate) last_line: u32,
}

impl Parser {
    pub(crate) fn new() -> Self {
        Self {
            workflow: Workflow::default(),
            diags: Vec::new(),
            section: None,
            task_pos: TaskPos::default(),
            task_run_seen: std::collections::HashSet::new(),
            job_pos: JobPos::default(),
            current_job: None,
            station_pos: StationPos::default(),
            current_station: None,
            unclaimed: None,
            stations_start: None,
            last_line: 0,
        }
    }

    pub(crate) fn run<R: Rng + ?Sized>(
        mut self,
        lines: &[Line],
        rng: &mut R,
    ) -> Result<ParseOutcome, Error> {
        for line in lines {
            self.last_line = line.number;

            // Lines consisting solely of a parenthesis are separators.
            if line.text == "(" || line.text == ")" {
                continue;
            }

            // Header keywords switch the active section. Checked in fixed
            // order so that a pathological line naming several sections
            // resolves the same way every time (last match wins).
            if line.text.contains("TASKTYPES") {
                self.enter_task_types();
            }
            if line.text.contains("JOBTYPES") {
                self.enter_job_types();
            }
            if line.text.contains("STATIONS") {
                self.enter_stations(line.number);
            }

            let Some(section) = self.section else {
                return Err(Error::BrokenFile { line: line.number });
            };

            for token in source::tokens(&line.text).filter(|t| !HEADERS.contains(t)) {
                match section {
                    Section::TaskTypes => self.task_type_token(token, line.number),
                    Section::JobTypes => self.job_type_token(token, line.number),
                    Section::Stations => self.station_token(token, line.number),
                }
            }
        }

        crate::validate::repair_job_routes(&mut self);
        crate::validate::reconcile_stations(&mut self, rng);

        Ok(ParseOutcome {
            workflow: self.workflow,
            diagnostics: self.diags,
        })
    }

    fn enter_task_types(&mut self) {
        self.section = Some(Section::TaskTypes);
        self.task_pos = TaskPos::ExpectId;
        self.task_run_seen.clear();
    }

    fn enter_job_types(&mut self) {
        self.section = Some(Section::JobTypes);
        self.job_pos = JobPos::ExpectId;
        self.current_job = None;
    }

    fn enter_stations(&mut self, line: u32) {
        self.section = Some(Section::Stations);
        self.station_pos = StationPos::ExpectId;
        self.current_station = None;
        if self.stations_start.is_none() {
            self.stations_start = Some(line);
        }
        // Snapshot the unclaimed set once, at the first STATIONS header.
        if self.unclaimed.is_none() {
            self.unclaimed = Some(self.workflow.task_types.keys().cloned().collect());
        }
    }

    /// Remove a task type from the unclaimed set once a station executes it.
    pub(crate) fn claim_task(&mut self, task: &TaskTypeId) {
        if self.workflow.task_types.contains_key(task)
            && let Some(unclaimed) = &mut self.unclaimed
        {
            unclaimed.retain(|t| t != task);
        }
    }
}

/// Parse a numeric size/time token, stripping a leading `-` with a warning.
///
/// Returns `None` (with a diagnostic) when the remainder is not a decimal
/// number.
pub(crate) fn parse_unsigned(
    diags: &mut Vec<Diagnostic>,
    token: &str,
    owner: &str,
    line: u32,
) -> Option<f64> {
    use jobflow_diagnostics::{LineRange, codes};

    let unsigned = if let Some(rest) = token.strip_prefix('-') {
        diags.push(
            Diagnostic::warn(
                codes::NEGATIVE_VALUE,
                format!("invalid negative value {token} for {owner}"),
                Some(LineRange::single(line)),
            )
            .with_context(ctx!("token" => token, "owner" => owner)),
        );
        rest
    } else {
        token
    };

    match unsigned.parse::<f64>() {
        Ok(value) => Some(value),
        Err(_) => {
            diags.push(
                Diagnostic::warn(
                    codes::UNPARSEABLE_NUMBER,
                    format!("cannot read {token} as a number for {owner}"),
                    Some(LineRange::single(line)),
                )
                .with_context(ctx!("token" => token, "owner" => owner)),
            );
            None
        }
    }
}
