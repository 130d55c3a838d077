// integration tests for the check command

use crate::common::*;
use serde_json::json;

#[test]
fn test_check_valid_section() {
    let config = create_config_with_content(&json!({
        "CPU": {
            "IfAboveValue": 90,
            "IfAboveAction": "!Log hot",
            "IfCondition": "CPU > 50 && CPU < 90",
            "IfTrueAction": "!Log busy",
            "IfMatch": "^\\d+$",
            "IfMatchAction": "!Log digits",
        }
    }));
    let output = run_ifactions(&config.path, &["--json", "check", "-s", "CPU"]);

    assert!(output.status.success());
    let json = parse_json(&output);
    assert_eq!(json["result"]["ok"], true);
    assert_eq!(json["result"]["thresholds"][0]["option"], "IfAbove");
    assert_eq!(json["result"]["conditions"][0]["key"], "IfCondition");
    assert_eq!(json["result"]["matches"][0]["key"], "IfMatch");
}

#[test]
fn test_check_reports_broken_entries() {
    let config = create_config_with_content(&json!({
        "CPU": {
            "IfCondition": "CPU >",
            "IfTrueAction": "!A",
            "IfMatch": "(unclosed",
            "IfMatchAction": "!B",
        }
    }));
    let output = run_ifactions(&config.path, &["--json", "check", "-s", "CPU"]);

    assert_eq!(output.status.code(), Some(4));
    let json = parse_json(&output);
    assert_eq!(json["result"]["ok"], false);
    assert!(json["result"]["conditions"][0]["error"].is_string());
    assert!(json["result"]["matches"][0]["error"].is_string());
}

#[test]
fn test_check_text_output() {
    let config = create_config_with_content(&json!({
        "CPU": { "IfCondition": "CPU > 1", "IfTrueAction": "!A" }
    }));
    let output = run_ifactions(&config.path, &["--no-json", "check", "-s", "cpu"]);

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("IfCondition=CPU > 1  ok"));
    assert!(text.contains("OK"));
}
