//! Data model for parsed workflow definitions.
//!
//! The parser produces three cross-referenced tables: task types with their
//! default sizes, job types with one or more alternative routes, and stations
//! with a capacity/discipline trio plus the task types they execute. All
//! tables preserve declaration order (first reference wins for task types).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Sentinel size meaning "not yet assigned".
pub const UNSIZED: f64 = 0.0;

/// Size assigned to task types that never receive one anywhere.
pub const DEFAULT_SIZE: f64 = 1.0;

// ── Identifiers ─────────────────────────────────────────────────────────

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident, $letter:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an already well-formed identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// The key letter for this identifier kind.
            pub const LETTER: char = $letter;

            /// Whether `token` is a well-formed identifier of this kind
            /// (starts with the key letter).
            pub fn is_well_formed(token: &str) -> bool {
                token.starts_with($letter)
            }

            /// Whether `token` mentions the key letter at all. Tokens that
            /// mention the letter without starting with it are malformed
            /// identifiers subject to auto-correction.
            pub fn mentions_letter(token: &str) -> bool {
                token.contains($letter)
            }

            /// Rewrite a malformed token into a well-formed identifier:
            /// every occurrence of the key letter is removed and a single
            /// leading one is restored.
            pub fn corrected(token: &str) -> Self {
                let mut id = String::with_capacity(token.len() + 1);
                id.push($letter);
                id.extend(token.chars().filter(|&c| c != $letter));
                Self(id)
            }

            /// The identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

id_type!(
    /// Identifier of a task type (`T` followed by digits).
    TaskTypeId,
    'T'
);
id_type!(
    /// Identifier of a job type (`J` followed by digits).
    JobTypeId,
    'J'
);
id_type!(
    /// Identifier of a station (`S` followed by digits).
    StationId,
    'S'
);

// ── Tables ──────────────────────────────────────────────────────────────

/// Task type identifier mapped to its default size, in first-reference order.
pub type TaskTypeTable = IndexMap<TaskTypeId, f64>;

/// One step of a route: a task type with its effective size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStep {
    /// The task type executed at this step.
    pub task: TaskTypeId,
    /// Effective size for this step ([`UNSIZED`] until resolved).
    pub size: f64,
}

/// One alternative ordered task sequence for a job type.
pub type Route = Vec<RouteStep>;

/// Job type identifier mapped to its alternative routes, in declaration order.
/// Re-declaring a job type appends a route; it never overwrites.
pub type JobTypeTable = IndexMap<JobTypeId, Vec<Route>>;

/// Station identifier mapped to its configuration, in declaration order.
pub type StationTable = IndexMap<StationId, StationConfig>;

/// A service entry of a station: how long one task type takes there.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// Service time as captured from the source.
    pub time: String,
    /// Optional tolerance to attach with a `±` at the boundary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<String>,
}

impl Service {
    /// Legacy attribute-value form: `"<time>"` or `"<time> ±<tolerance>"`.
    pub fn render(&self) -> String {
        match &self.tolerance {
            Some(tol) => format!("{} \u{00B1}{}", self.time, tol),
            None => self.time.clone(),
        }
    }
}

/// Configuration of a single station.
///
/// The three positional attributes are captured verbatim; their content is
/// deliberately not validated at parse time. Typed accessors are provided
/// for consumers that want them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StationConfig {
    /// Raw `max_capacity` token.
    pub max_capacity: String,
    /// Raw `MULTIFLAG` token (`Y`/`N` by convention).
    pub multi_flag: String,
    /// Raw `FIFOFLAG` token (`Y`/`N` by convention).
    pub fifo_flag: String,
    /// Task types this station executes, with service times, in
    /// declaration order.
    pub services: IndexMap<TaskTypeId, Service>,
}

impl StationConfig {
    /// Capacity as an integer, if the raw token parses as one.
    pub fn capacity(&self) -> Option<u32> {
        self.max_capacity.parse().ok()
    }

    /// Multi-instance flag as a boolean (`Y` → true, `N` → false).
    pub fn multi(&self) -> Option<bool> {
        parse_flag(&self.multi_flag)
    }

    /// FIFO flag as a boolean (`Y` → true, `N` → false).
    pub fn fifo(&self) -> Option<bool> {
        parse_flag(&self.fifo_flag)
    }

    /// Serialize to the legacy ordered attribute list: the fixed
    /// `max_capacity`/`MULTIFLAG`/`FIFOFLAG` trio followed by one entry per
    /// executed task type.
    pub fn attributes(&self) -> Vec<(String, String)> {
        let mut attrs = vec![
            ("max_capacity".to_string(), self.max_capacity.clone()),
            ("MULTIFLAG".to_string(), self.multi_flag.clone()),
            ("FIFOFLAG".to_string(), self.fifo_flag.clone()),
        ];
        for (task, service) in &self.services {
            attrs.push((task.to_string(), service.render()));
        }
        attrs
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw {
        "Y" => Some(true),
        "N" => Some(false),
        _ => None,
    }
}

// ── Workflow ────────────────────────────────────────────────────────────

/// The fully parsed and repaired workflow model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    /// Task types with their default sizes.
    pub task_types: TaskTypeTable,
    /// Job types with their alternative routes.
    pub job_types: JobTypeTable,
    /// Stations with their configurations.
    pub stations: StationTable,
}

impl Workflow {
    /// Whether any route of any job type references the given task type.
    pub fn is_task_routed(&self, task: &TaskTypeId) -> bool {
        self.job_types
            .values()
            .flatten()
            .any(|route| route.iter().any(|step| &step.task == task))
    }
}
