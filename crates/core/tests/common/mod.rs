//! Shared test helpers for `jobflow_core` integration tests.

#![allow(unreachable_pub)]

use jobflow_core::{Diagnostic, ParseOutcome, TaskTypeId};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Parse with a fixed seed so station synthesis is reproducible.
#[allow(dead_code)]
pub fn parse_seeded(input: &str, seed: u64) -> ParseOutcome {
    jobflow_core::parse_str_with_rng(input, &mut StdRng::seed_from_u64(seed))
        .expect("input should parse")
}

/// Collect diagnostic codes in emission order.
#[allow(dead_code)]
pub fn diag_codes(outcome: &ParseOutcome) -> Vec<String> {
    outcome
        .diagnostics
        .iter()
        .map(|d| d.id.to_string())
        .collect()
}

/// Find the first diagnostic with the given code.
#[allow(dead_code)]
pub fn find_diag<'a>(issues: &'a [Diagnostic], code: &str) -> &'a Diagnostic {
    issues
        .iter()
        .find(|d| &*d.id == code)
        .unwrap_or_else(|| panic!("expected diagnostic {code}"))
}

/// Count diagnostics with the given code.
#[allow(dead_code)]
pub fn count_diags(issues: &[Diagnostic], code: &str) -> usize {
    issues.iter().filter(|d| &*d.id == code).count()
}

/// Shorthand for a task type key.
#[allow(dead_code)]
pub fn t(id: &str) -> TaskTypeId {
    TaskTypeId::new(id)
}
