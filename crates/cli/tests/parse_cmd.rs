//! CLI tests for the `jobflow parse` subcommand.

use std::io::Write;
use std::process::Command;

use assert_cmd::cargo;
use tempfile::NamedTempFile;

fn jobflow_cmd() -> Command {
    Command::new(cargo::cargo_bin!("jobflow"))
}

fn workflow_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(content.as_bytes()).expect("write temp file");
    file
}

#[test]
fn parse_json_emits_full_model() {
    let file = workflow_file(
        "TASKTYPES T1 2.0 T2\nJOBTYPES J1 T1 T2 1.5\nSTATIONS S1 2 Y N T1 3.0 T2 1.5 0.2\n",
    );
    let output = jobflow_cmd()
        .args(["parse", file.path().to_str().unwrap(), "--output", "json"])
        .output()
        .expect("run parse command");

    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("valid json on stdout");

    let workflow = &json["workflow"];
    assert_eq!(workflow["task_types"]["T1"], 2.0);
    assert_eq!(workflow["task_types"]["T2"], 1.5);
    assert_eq!(workflow["job_types"]["J1"][0][1]["task"], "T2");
    assert_eq!(workflow["job_types"]["J1"][0][1]["size"], 1.5);
    assert_eq!(workflow["stations"]["S1"]["max_capacity"], "2");
    assert_eq!(workflow["stations"]["S1"]["services"]["T2"]["tolerance"], "0.2");
    assert_eq!(json["diagnostics"].as_array().map(Vec::len), Some(0));
}

#[test]
fn parse_pretty_prints_model_to_stdout_and_warnings_to_stderr() {
    let file = workflow_file("TASKTYPES T1 2.0 T1 3.0\nJOBTYPES J1 T1\nSTATIONS S1 2 Y N T1 1.0\n");
    let output = jobflow_cmd()
        .args(["parse", file.path().to_str().unwrap(), "--output", "pretty"])
        .output()
        .expect("run parse command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stdout.contains("\"task_types\""), "model on stdout: {stdout}");
    assert!(stderr.contains("WFD1201"), "warning on stderr: {stderr}");
    assert!(stderr.contains("warning"), "summary on stderr: {stderr}");
}
