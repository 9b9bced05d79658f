use std::process::{Command, Output};

use serde_json::Value;

fn neurograph(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_neurograph"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("Failed to execute neurograph")
}

fn json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "neurograph exited with error: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is not JSON")
}

#[test]
fn layout_prints_positions_in_input_order() {
    let value = json(&neurograph(&["layout", "tests/fixtures/graph.json"]));
    let rows = value.as_array().unwrap();

    let ids: Vec<&str> = rows.iter().map(|row| row["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["n1", "n2", "n3"]);
    for row in rows {
        assert_eq!(row["position"].as_array().unwrap().len(), 3);
    }
}

#[test]
fn select_respects_budget_and_pins_selection() {
    let value = json(&neurograph(&[
        "select",
        "tests/fixtures/graph.json",
        "--max-nodes",
        "1",
        "--selected",
        "n3",
    ]));

    assert_eq!(value["nodes"], serde_json::json!(["n3"]));
    assert_eq!(value["relationships"], serde_json::json!([]));
}

#[test]
fn select_reports_dangling_relationships_with_warning() {
    let output = neurograph(&["select", "tests/fixtures/dangling.yaml"]);
    let value = json(&output);

    assert_eq!(value["dangling"], serde_json::json!(["r-missing"]));
    assert_eq!(value["relationships"], serde_json::json!(["r1", "r2"]));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("r-missing").count(), 1, "stderr: {stderr}");
}

#[test]
fn select_reads_config_file() {
    let value = json(&neurograph(&[
        "select",
        "tests/fixtures/dangling.yaml",
        "--config",
        "tests/fixtures/engine.yaml",
    ]));

    assert_eq!(value["nodes"], serde_json::json!(["n1", "n2"]));
    assert_eq!(value["relationships"], serde_json::json!(["r1"]));
}

#[test]
fn render_reports_status_and_overlays() {
    let value = json(&neurograph(&[
        "render",
        "tests/fixtures/graph.json",
        "--selected",
        "n1",
        "--frames",
        "3",
    ]));

    assert_eq!(value["outcome"], "rendered");
    assert_eq!(value["frames"], 3);
    assert_eq!(value["status"]["rendered_node_count"], 3);
    assert_eq!(value["status"]["rendered_relationship_count"], 2);
    assert_eq!(value["status"]["quality_tier"], "medium");
    assert_eq!(value["overlays"][0]["node_id"], "n1");
    assert_eq!(value["overlays"][0]["title"], "Kofeina");
    assert_eq!(value["overlays"][0]["role"], "selected");
}

#[test]
fn render_lowers_quality_at_low_frame_rate() {
    let value = json(&neurograph(&[
        "render",
        "tests/fixtures/graph.json",
        "--quality",
        "high",
        "--frames",
        "61",
        "--fps",
        "20",
    ]));

    let transitions = value["transitions"].as_array().unwrap();
    assert_eq!(transitions.len(), 2);
    assert_eq!(transitions[0]["from"], "high");
    assert_eq!(transitions[0]["to"], "medium");
    assert_eq!(transitions[1]["frame"], 40);
    assert_eq!(value["status"]["quality_tier"], "low");
    assert_eq!(value["status"]["fps"], 20.0);
}

#[test]
fn probe_always_answers() {
    let value = json(&neurograph(&["probe"]));
    let status = value["status"].as_str().unwrap();
    assert!(status == "supported" || status == "unsupported");
}

#[test]
fn missing_graph_file_fails() {
    let output = neurograph(&["layout", "tests/fixtures/missing.json"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("missing.json"));
}
