//! Post-scan repair and cross-table reconciliation.
//!
//! Runs once after the line scan: first the size repair over every job
//! route, then the station coverage check, which partitions task types no
//! station executes into unused ones (warned and left alone) and orphaned
//! ones (warned and covered by one synthesized station).

use jobflow_diagnostics::{Diagnostic, LineRange, codes};
use rand::Rng;

use crate::model::{DEFAULT_SIZE, Service, StationConfig, StationId, TaskTypeId, UNSIZED};
use crate::parse::{Parser, ctx};

/// Reconcile route step sizes with the task type table.
///
/// A step still holding the sentinel size takes the table value; a table
/// entry still holding the sentinel takes the first nonzero step value seen.
/// Task types with no usable size anywhere default to [`DEFAULT_SIZE`], with
/// one warning each.
pub(crate) fn repair_job_routes(parser: &mut Parser) {
    for routes in parser.workflow.job_types.values_mut() {
        for step in routes.iter_mut().flatten() {
            let table = parser
                .workflow
                .task_types
                .entry(step.task.clone())
                .or_insert(UNSIZED);
            match (step.size == UNSIZED, *table == UNSIZED) {
                (true, true) => {
                    step.size = DEFAULT_SIZE;
                    *table = DEFAULT_SIZE;
                    parser.diags.push(default_size_warning(&step.task));
                }
                (true, false) => step.size = *table,
                (false, true) => *table = step.size,
                (false, false) => {}
            }
        }
    }

    // Declared-but-unrouted task types can still be sitting on the sentinel.
    let defaulted: Vec<TaskTypeId> = parser
        .workflow
        .task_types
        .iter_mut()
        .filter(|(_, size)| **size == UNSIZED)
        .map(|(task, size)| {
            *size = DEFAULT_SIZE;
            task.clone()
        })
        .collect();
    for task in defaulted {
        parser.diags.push(default_size_warning(&task));
    }
}

fn default_size_warning(task: &TaskTypeId) -> Diagnostic {
    Diagnostic::warn(
        codes::MISSING_DEFAULT_SIZE,
        format!("task type {task} has no size anywhere, defaulting to {DEFAULT_SIZE}"),
        None,
    )
    .with_context(ctx!("task" => task.as_str()))
}

/// Check station coverage of the task type table.
///
/// Task types no station executes are either unused (no job routes them
/// either) or orphaned (jobs need them but nowhere runs them). Orphans get
/// exactly one synthesized station covering them all, with randomized
/// capacity, flags and service times.
pub(crate) fn reconcile_stations<R: Rng + ?Sized>(parser: &mut Parser, rng: &mut R) {
    let unclaimed = parser
        .unclaimed
        .take()
        .unwrap_or_else(|| parser.workflow.task_types.keys().cloned().collect());

    let (orphaned, unused): (Vec<TaskTypeId>, Vec<TaskTypeId>) = unclaimed
        .into_iter()
        .partition(|task| parser.workflow.is_task_routed(task));

    let lines = parser
        .stations_start
        .map(|start| LineRange::span(start, parser.last_line.max(start)));

    if !unused.is_empty() {
        parser.diags.push(
            Diagnostic::warn(
                codes::UNUSED_TASK_TYPES,
                format!(
                    "task types {} are declared but used by no station and no job",
                    join(&unused)
                ),
                lines.clone(),
            )
            .with_context(ctx!("tasks" => join(&unused))),
        );
    }

    if orphaned.is_empty() {
        return;
    }

    let id = fresh_station_id(parser);
    parser.diags.push(
        Diagnostic::warn(
            codes::ORPHANED_TASK_TYPES,
            format!(
                "task types {} are needed by jobs but executed by no station, adding station {id}",
                join(&orphaned)
            ),
            lines,
        )
        .with_context(ctx!("tasks" => join(&orphaned), "station" => id.as_str())),
    );

    let mut config = StationConfig {
        max_capacity: rng.random_range(1..4u32).to_string(),
        multi_flag: flag(rng),
        fifo_flag: flag(rng),
        services: Default::default(),
    };
    for task in orphaned {
        let tolerance = rng
            .random_bool(0.5)
            .then(|| format!("{:.2}", (rng.random::<f64>() * 10.0).floor() / 10.0));
        config.services.insert(
            task,
            Service {
                time: rng.random_range(1..3u32).to_string(),
                tolerance,
            },
        );
    }
    parser.workflow.stations.insert(id, config);
}

/// Lowest `S<n>` identifier not yet taken, starting one past the table size.
fn fresh_station_id(parser: &Parser) -> StationId {
    let mut n = parser.workflow.stations.len() + 1;
    loop {
        let id = StationId::new(format!("S{n}"));
        if !parser.workflow.stations.contains_key(&id) {
            return id;
        }
        n += 1;
    }
}

fn flag<R: Rng + ?Sized>(rng: &mut R) -> String {
    if rng.random_bool(0.5) { "Y" } else { "N" }.to_string()
}

fn join(tasks: &[TaskTypeId]) -> String {
    tasks
        .iter()
        .map(TaskTypeId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
