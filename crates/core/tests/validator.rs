//! Repair pass and station reconciliation: size backfill, unused/orphan
//! partition, and synthesized stations.

mod common;

use common::{count_diags, find_diag, parse_seeded, t};
use jobflow_core::{JobTypeId, Severity, codes};

#[test]
fn sizeless_task_defaults_to_one_with_single_warning() {
    let out = parse_seeded("TASKTYPES T1\nJOBTYPES J1 T1\nJOBTYPES J1 T1", 3);
    assert_eq!(out.workflow.task_types[&t("T1")], 1.0);
    for routes in out.workflow.job_types.values() {
        for route in routes {
            assert_eq!(route[0].size, 1.0);
        }
    }
    assert_eq!(count_diags(&out.diagnostics, codes::MISSING_DEFAULT_SIZE), 1);
}

#[test]
fn declared_but_unrouted_sizeless_task_also_defaults() {
    let out = parse_seeded("TASKTYPES T1", 3);
    assert_eq!(out.workflow.task_types[&t("T1")], 1.0);
    assert_eq!(count_diags(&out.diagnostics, codes::MISSING_DEFAULT_SIZE), 1);
}

#[test]
fn defaulted_step_keeps_its_route_position() {
    let out = parse_seeded("TASKTYPES T1 2.0 T2\nJOBTYPES J1 T2 T1", 3);
    let route = &out.workflow.job_types[&JobTypeId::new("J1")][0];
    assert_eq!(route[0].task, t("T2"));
    assert_eq!(route[0].size, 1.0);
    assert_eq!(route[1].task, t("T1"));
    assert_eq!(route[1].size, 2.0);
}

#[test]
fn table_backfill_takes_first_route_value() {
    let input = "TASKTYPES T1\nJOBTYPES J1 T1 2.5\nJOBTYPES J2 T1 9.0";
    let out = parse_seeded(input, 3);
    assert_eq!(out.workflow.task_types[&t("T1")], 2.5);
    // No default was needed, so no warning about it.
    assert_eq!(count_diags(&out.diagnostics, codes::MISSING_DEFAULT_SIZE), 0);
}

#[test]
fn sentinel_step_takes_table_value() {
    let input = "TASKTYPES T1\nJOBTYPES J1 T1 2.5 J2 T1";
    let out = parse_seeded(input, 3);
    let routes = &out.workflow.job_types[&JobTypeId::new("J2")];
    assert_eq!(routes[0][0].size, 2.5);
}

#[test]
fn unused_tasks_are_reported_without_synthesis() {
    let input = "TASKTYPES T1 1.0 T2 2.0\nJOBTYPES J1 T1\nSTATIONS S1 2 Y N T1 3.0";
    let out = parse_seeded(input, 3);

    let diag = find_diag(&out.diagnostics, codes::UNUSED_TASK_TYPES);
    assert_eq!(diag.severity, Severity::Warn);
    assert!(diag.message.contains("T2"));

    assert_eq!(out.workflow.stations.len(), 1, "no station was synthesized");
    assert_eq!(count_diags(&out.diagnostics, codes::ORPHANED_TASK_TYPES), 0);
}

#[test]
fn orphaned_tasks_get_exactly_one_synthesized_station() {
    let input = "TASKTYPES T1 1.0 T2 2.0 T3 3.0\nJOBTYPES J1 T2 T3\nSTATIONS S1 2 Y N T1 3.0";
    let out = parse_seeded(input, 3);

    let diag = find_diag(&out.diagnostics, codes::ORPHANED_TASK_TYPES);
    assert!(diag.message.contains("T2") && diag.message.contains("T3"));

    assert_eq!(out.workflow.stations.len(), 2);
    let cfg = &out.workflow.stations[&jobflow_core::StationId::new("S2")];
    assert!(cfg.services.contains_key(&t("T2")));
    assert!(cfg.services.contains_key(&t("T3")));

    let capacity = cfg.capacity().expect("synthesized capacity is an integer");
    assert!((1..4).contains(&capacity));
    assert!(cfg.multi().is_some(), "flag is Y or N: {}", cfg.multi_flag);
    assert!(cfg.fifo().is_some(), "flag is Y or N: {}", cfg.fifo_flag);
    for service in cfg.services.values() {
        let time: u32 = service.time.parse().expect("synthesized time is an integer");
        assert!((1..3).contains(&time));
        if let Some(tol) = &service.tolerance {
            let value: f64 = tol.parse().expect("tolerance is numeric");
            assert!((0.0..1.0).contains(&value), "tolerance out of range: {tol}");
            assert_eq!(tol.len(), 4, "tolerance uses 0.00 formatting: {tol}");
        }
    }
}

#[test]
fn synthesized_station_id_skips_taken_names() {
    // Two stations exist but neither covers the routed task, so the fresh
    // id has to move past the table size when S3 is already taken.
    let input = "TASKTYPES T1 1.0\nJOBTYPES J1 T1\n\
                 STATIONS S2 1 Y N S3 1 Y N";
    let out = parse_seeded(input, 3);
    assert_eq!(out.workflow.stations.len(), 3);
    assert!(
        out.workflow
            .stations
            .contains_key(&jobflow_core::StationId::new("S4"))
    );
}

#[test]
fn missing_stations_section_orphans_every_routed_task() {
    let out = parse_seeded("TASKTYPES T1 1.0 T2 2.0\nJOBTYPES J1 T1", 3);
    let diag = find_diag(&out.diagnostics, codes::ORPHANED_TASK_TYPES);
    assert!(diag.message.contains("T1"));
    assert!(diag.lines.is_none(), "no STATIONS lines to point at");

    let unused = find_diag(&out.diagnostics, codes::UNUSED_TASK_TYPES);
    assert!(unused.message.contains("T2"));

    assert_eq!(out.workflow.stations.len(), 1);
}

#[test]
fn coverage_report_spans_the_stations_section() {
    let input = "TASKTYPES T1 1.0 T2 2.0\nJOBTYPES J1 T1 T2\nSTATIONS\nS1 2 Y N T1 3.0";
    let out = parse_seeded(input, 3);
    let diag = find_diag(&out.diagnostics, codes::ORPHANED_TASK_TYPES);
    let lines = diag.lines.expect("report is anchored to the section");
    assert_eq!(lines.start, 3);
    assert_eq!(lines.end, 4);
}

#[test]
fn same_seed_gives_identical_outcome() {
    let input = "TASKTYPES T1 T2 2.0 xT3\nJOBTYPES J1 T1 T3 J1 T2\nSTATIONS S1 2 Y N T2 1.0";
    let a = parse_seeded(input, 42);
    let b = parse_seeded(input, 42);
    assert_eq!(
        jobflow_core::outcome_to_pretty_json(&a),
        jobflow_core::outcome_to_pretty_json(&b)
    );
}

#[test]
fn explanations_exist_for_emitted_diagnostics() {
    let input = "TASKTYPES T1 -1.0 T1\nJOBTYPES J1 T9\nSTATIONS S1 2 Y N T1 3.0";
    let out = parse_seeded(input, 3);
    assert!(!out.diagnostics.is_empty());
    for diag in &out.diagnostics {
        assert!(diag.explain().is_some(), "no explanation for {}", diag.id);
    }
}
