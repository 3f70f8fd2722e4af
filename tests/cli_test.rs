mod common;

use common::FolioTest;
use serde_json::Value;

// ============================================================================
// Config command tests
// ============================================================================

#[test]
fn test_config_show_defaults() {
    let folio = FolioTest::new();

    let output = folio.run_success(&["config", "show"]);
    assert!(output.contains("Configuration"));
    assert!(output.contains("http://localhost:3000"));
    assert!(output.contains("defaults"));
}

#[test]
fn test_config_set_then_get() {
    let folio = FolioTest::new();

    folio.run_success(&["config", "set", "api.timeout_secs", "45"]);
    let output = folio.run_success(&["config", "get", "api.timeout_secs"]);
    assert_eq!(output.trim(), "45");

    let content = folio.read_config();
    assert!(content.contains("timeout_secs: 45"));
}

#[test]
fn test_config_set_page_size_json() {
    let folio = FolioTest::new();

    let output = folio.run_success(&["config", "set", "pages.posts", "6", "--json"]);
    let json: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(json["key"], "pages.posts");
    assert_eq!(json["value"], "6");
    assert_eq!(json["previous_value"], Value::Null);

    let output = folio.run_success(&["config", "show", "--json"]);
    let json: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(json["pages"]["posts"], 6);
}

#[test]
fn test_config_get_unset_page_size() {
    let folio = FolioTest::new();

    let output = folio.run_success(&["config", "get", "pages.courses", "--json"]);
    let json: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(json["value"], Value::Null);
}

#[test]
fn test_config_set_invalid_key() {
    let folio = FolioTest::new();

    let stderr = folio.run_failure(&["config", "set", "invalid.key", "value"]);
    assert!(stderr.contains("unknown config key"));
}

#[test]
fn test_config_set_rejects_bad_values() {
    let folio = FolioTest::new();

    let stderr = folio.run_failure(&["config", "set", "api.base_url", "ftp://example.com"]);
    assert!(stderr.contains("http or https"));

    let stderr = folio.run_failure(&["config", "set", "pages.posts", "0"]);
    assert!(stderr.contains("at least 1"));
}

#[test]
fn test_config_rejects_underscore_keys() {
    let folio = FolioTest::new();

    let stderr = folio.run_failure(&["config", "set", "api_prefix", "/v1"]);
    assert!(stderr.contains("'api.prefix'"));
}

#[test]
fn test_config_show_reports_env_override() {
    let folio = FolioTest::new();

    let output = folio
        .command()
        .env("FOLIO_API_URL", "https://cms.example.com")
        .args(["config", "show", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["api"]["base_url"], "https://cms.example.com");
    assert_eq!(json["api"]["base_url_from_env"], true);
}

#[test]
fn test_malformed_config_file_fails() {
    let folio = FolioTest::new();
    folio.write_config("api: [not, a, map]\n");

    folio.run_failure(&["config", "show"]);
}

// ============================================================================
// Listing and mutation errors
// ============================================================================

#[test]
fn test_ls_unknown_resource() {
    let folio = FolioTest::new();

    let stderr = folio.run_failure(&["ls", "widgets"]);
    assert!(stderr.contains("Must be one of"));
}

#[test]
fn test_ls_rejects_malformed_filter() {
    let folio = FolioTest::new();

    let stderr = folio.run_failure(&["ls", "posts", "--filter", "status"]);
    assert!(stderr.contains("Expected name=value"));
}

#[test]
fn test_ls_reports_unreachable_api() {
    let folio = FolioTest::new();
    folio.write_config("api:\n  base_url: http://127.0.0.1:1\n  timeout_secs: 2\n");

    let stderr = folio.run_failure(&["ls", "posts"]);
    assert!(stderr.contains("failed to load posts"), "{stderr}");
}

#[test]
fn test_feature_rejects_courses() {
    let folio = FolioTest::new();

    let stderr = folio.run_failure(&["feature", "courses", "c1"]);
    assert!(stderr.contains("cannot be featured"));
}

// ============================================================================
// Completions
// ============================================================================

#[test]
fn test_completions_bash() {
    let folio = FolioTest::new();

    let output = folio.run_success(&["completions", "bash"]);
    assert!(output.contains("_folio"));
}

#[test]
fn test_completions_zsh() {
    let folio = FolioTest::new();

    let output = folio.run_success(&["completions", "zsh"]);
    assert!(output.contains("#compdef folio"));
}
