// integration tests for the sections command

use crate::common::*;

#[test]
fn test_sections_sorted() {
    let config = create_test_config("{ Zeta: {}, Alpha: { IfAboveAction: 'x' } }");
    let output = run_ifactions(&config.path, &["--json", "sections"]);

    assert!(output.status.success());
    let json = parse_json(&output);
    assert_eq!(json["result"]["sections"], serde_json::json!(["Alpha", "Zeta"]));
}

#[test]
fn test_sections_invalid_config() {
    let config = create_test_config("{ not json5");
    let output = run_ifactions(&config.path, &["--no-json", "sections"]);

    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("Error:"));
}

#[test]
fn test_version() {
    let output = run_ifactions_with_env(&["--version"], &[]);
    assert!(output.status.success());
    assert!(stdout(&output).starts_with("ifactions "));
}
