//! JSON export of parse results.

use serde::Serialize;

use crate::model::Workflow;
use crate::parse::ParseOutcome;

/// Serialize a full parse outcome (model plus diagnostics) to pretty JSON.
pub fn outcome_to_pretty_json(outcome: &ParseOutcome) -> String {
    pretty(outcome)
}

/// Serialize just the workflow model to pretty JSON.
pub fn workflow_to_pretty_json(workflow: &Workflow) -> String {
    pretty(workflow)
}

fn pretty<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).expect("workflow serialization cannot fail")
}
