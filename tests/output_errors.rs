use shipwright::error::ToolCommandFailedDetails;
use shipwright::output::{map_cmd_result_to_json, CliResponse};
use shipwright::Error;

#[test]
fn tool_command_failed_serializes_command_and_stderr() {
    let err = Error::tool_command_failed(ToolCommandFailedDetails {
        command: "python3 -m twine check 'dist/*'".to_string(),
        exit_code: 1,
        stderr: "InvalidDistribution: Cannot find file".to_string(),
    });

    let json = CliResponse::<()>::from_error(&err).to_json().unwrap();

    assert!(json.contains("\"code\": \"tool.command_failed\""));
    assert!(json.contains("twine check"));
    assert!(json.contains("InvalidDistribution"));
    assert!(json.contains("\"exitCode\": 1"));
}

#[test]
fn tool_command_failed_maps_to_exit_code_20() {
    let err = Error::tool_command_failed(ToolCommandFailedDetails {
        command: "python3 -m build".to_string(),
        exit_code: 1,
        stderr: String::new(),
    });

    let (_value, exit_code) = map_cmd_result_to_json::<serde_json::Value>(Err(err));

    assert_eq!(exit_code, 20);
}

#[test]
fn registry_load_failure_carries_install_hint() {
    let err = Error::registry_load_failed("tools.json", "No such file or directory")
        .with_hint("Make sure to install MCP dependencies: pip install -e '.[mcp]'");

    let json = CliResponse::<()>::from_error(&err).to_json().unwrap();
    let (_value, exit_code) = map_cmd_result_to_json::<serde_json::Value>(Err(err));

    assert!(json.contains("\"code\": \"registry.load_failed\""));
    assert!(json.contains("pip install -e"));
    assert_eq!(exit_code, 4);
}

#[test]
fn validation_errors_map_to_exit_code_2() {
    let err = "deploy".parse::<shipwright::Stage>().unwrap_err();

    let (_value, exit_code) = map_cmd_result_to_json::<serde_json::Value>(Err(err));

    assert_eq!(exit_code, 2);
}

#[test]
fn successful_data_keeps_its_exit_code() {
    let (value, exit_code) = map_cmd_result_to_json(Ok((serde_json::json!({"ok": true}), 1)));

    assert_eq!(value.unwrap()["ok"], true);
    assert_eq!(exit_code, 1);
}
