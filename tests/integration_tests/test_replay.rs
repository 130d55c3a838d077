// integration tests for the replay command

use crate::common::*;

const CONFIG: &str = r#"{
    // edge-triggered equal threshold
    Battery: {
        IfEqualValue: 5,
        IfEqualAction: "!Log five",
    },
    Status: {
        IfMatch: "^online$",
        IfMatchAction: "!Show",
        IfNotMatchAction: "!Hide",
    },
    Load: {
        IfCondition: "Load > Limit",
        IfTrueAction: "!Alarm",
        IfFalseAction: "!Calm",
        IfCondition2: "Load +",
        IfTrueAction2: "!Never",
    },
}"#;

fn fired(json: &serde_json::Value) -> Vec<Vec<String>> {
    json["result"]["cycles"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| {
            c["fired"]
                .as_array()
                .unwrap()
                .iter()
                .map(|a| a.as_str().unwrap().to_string())
                .collect()
        })
        .collect()
}

#[test]
fn test_replay_equal_fires_on_entry_only() {
    let config = create_test_config(CONFIG);
    let output = run_ifactions(
        &config.path,
        &["--json", "replay", "-s", "Battery", "4", "5", "5", "6", "5"],
    );

    assert!(output.status.success());
    let json = parse_json(&output);
    assert_eq!(json["jsonrpc"], "2.0");
    assert_eq!(json["result"]["section"], "Battery");

    let empty: Vec<String> = vec![];
    let five = vec!["!Log five".to_string()];
    assert_eq!(
        fired(&json),
        vec![empty.clone(), five.clone(), empty.clone(), empty, five]
    );
}

#[test]
fn test_replay_match_uses_step_text() {
    let config = create_test_config(CONFIG);
    let output = run_ifactions(
        &config.path,
        &[
            "--json", "replay", "-s", "Status", "0:online", "0:online", "0:offline", "0:online",
        ],
    );

    assert!(output.status.success());
    let json = parse_json(&output);
    assert_eq!(
        fired(&json),
        vec![
            vec!["!Show".to_string()],
            vec![],
            vec!["!Hide".to_string()],
            vec!["!Show".to_string()],
        ]
    );
}

#[test]
fn test_replay_reset_rearms_threshold() {
    let config = create_test_config(CONFIG);
    let output = run_ifactions(
        &config.path,
        &["--json", "replay", "-s", "Battery", "5", "reset:0", "5"],
    );

    let json = parse_json(&output);
    let cycles = json["result"]["cycles"].as_array().unwrap();
    assert_eq!(cycles[1]["kind"], "reset");
    assert_eq!(cycles[0]["fired"][0], "!Log five");
    assert_eq!(cycles[2]["fired"][0], "!Log five");
}

#[test]
fn test_replay_other_subjects_and_diagnostics() {
    let config = create_test_config(CONFIG);
    let output = run_ifactions(
        &config.path,
        &[
            "--json", "replay", "-s", "Load", "--with", "Limit=10", "20", "20", "5",
        ],
    );

    assert!(output.status.success());
    let json = parse_json(&output);
    assert_eq!(
        fired(&json),
        vec![
            vec!["!Alarm".to_string()],
            vec![],
            vec!["!Calm".to_string()],
        ]
    );

    // the broken second condition is reported once, then suppressed
    let cycles = json["result"]["cycles"].as_array().unwrap();
    let diagnostics = cycles[0]["diagnostics"].as_array().unwrap();
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].as_str().unwrap().contains("IfCondition2=Load +"));
    assert!(cycles[1].get("diagnostics").is_none());
}

#[test]
fn test_replay_text_output() {
    let config = create_test_config(CONFIG);
    let output = run_ifactions(&config.path, &["--no-json", "replay", "-s", "Battery", "4", "5"]);

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("(none)"));
    assert!(text.contains("!Log five"));
}

#[test]
fn test_replay_missing_section() {
    let config = create_test_config(CONFIG);
    let output = run_ifactions(&config.path, &["--json", "replay", "-s", "Nope", "1"]);

    assert_eq!(output.status.code(), Some(3));
    let json = parse_json(&output);
    assert_eq!(json["error"]["code"], -32003);
    assert!(json["error"]["message"].as_str().unwrap().contains("Nope"));
}

#[test]
fn test_replay_invalid_step() {
    let config = create_test_config(CONFIG);
    let output = run_ifactions(&config.path, &["--no-json", "replay", "-s", "Battery", "five"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("invalid value 'five'"));
}

#[test]
fn test_replay_missing_config_file() {
    let output = run_ifactions(
        std::path::Path::new("/nonexistent/ifactions.json5"),
        &["--json", "replay", "-s", "Battery", "1"],
    );

    assert_eq!(output.status.code(), Some(3));
    let json = parse_json(&output);
    assert_eq!(json["error"]["code"], -32003);
}

#[test]
fn test_replay_config_from_env() {
    let config = create_test_config(CONFIG);
    let output = run_ifactions_with_env(
        &["--json", "replay", "-s", "Battery", "5"],
        &[("IFACTIONS_CONFIG", config.path.to_str().unwrap())],
    );

    assert!(output.status.success());
    assert_eq!(parse_json(&output)["result"]["cycles"][0]["fired"][0], "!Log five");
}
