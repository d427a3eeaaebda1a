//! CLI Integration Tests
//!
//! Tests the command-line interface end-to-end.

use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::prelude::*;

const FORM_JSON: &str = r#"{
  "siteCode": "NBI001",
  "siteLocation": "Westlands",
  "county": "nairobi",
  "landlordName": "ABC Ltd",
  "monthlyRent": "50000",
  "leaseTerm": "15",
  "instructingCounsel": "John Doe"
}"#;

/// Get the binary to test, isolated from any user configuration.
fn fanisi(temp: &assert_fs::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("fanisi").unwrap();
    cmd.current_dir(temp.path()).env("XDG_CONFIG_HOME", temp.path()).env_remove("FANISI_CONFIG");
    cmd
}

// ============================================================================
// Help & Version Tests
// ============================================================================

#[test]
fn test_help_flag() {
    let temp = assert_fs::TempDir::new().unwrap();
    fanisi(&temp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Property-leasing instruction workflow"));
}

#[test]
fn test_version_flag() {
    let temp = assert_fs::TempDir::new().unwrap();
    fanisi(&temp)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

// ============================================================================
// Template Commands
// ============================================================================

#[test]
fn test_templates_lists_builtins() {
    let temp = assert_fs::TempDir::new().unwrap();
    fanisi(&temp)
        .arg("templates")
        .assert()
        .success()
        .stdout(predicate::str::contains("lease-agreement"))
        .stdout(predicate::str::contains("rof6-template"))
        .stdout(predicate::str::contains("Total: 2 templates"));
}

#[test]
fn test_templates_json() {
    let temp = assert_fs::TempDir::new().unwrap();
    let output = fanisi(&temp).args(["templates", "--format", "json"]).output().unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 2);
}

#[test]
fn test_extra_templates_from_config() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("templates/wayleave.yaml")
        .write_str("id: wayleave\nname: Wayleave\ncontent: \"Wayleave for {{site_code}}\"\nvariables: [site_code]\n")
        .unwrap();
    temp.child(".fanisi.toml").write_str("[templates]\nextra_dir = \"templates\"\n").unwrap();

    fanisi(&temp)
        .args(["render", "wayleave", "--var", "site_code=KSM003"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wayleave for KSM003"));

    temp.close().unwrap();
}

#[test]
fn test_render_leaves_unbound_placeholders() {
    let temp = assert_fs::TempDir::new().unwrap();
    fanisi(&temp)
        .args(["render", "rof6-template", "--var", "site_code=MSA002"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Site Code: MSA002"))
        .stdout(predicate::str::contains("{{total_fees}}"))
        .stderr(predicate::str::contains("Unbound:"));
}

#[test]
fn test_render_from_form_to_file() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("rof5.json").write_str(FORM_JSON).unwrap();

    fanisi(&temp)
        .args(["render", "lease-agreement", "--form", "rof5.json", "--out", "lease.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote lease.txt"));

    temp.child("lease.txt").assert(predicate::str::contains("KES 50000"));
    temp.close().unwrap();
}

#[test]
fn test_render_auto_fill() {
    let temp = assert_fs::TempDir::new().unwrap();
    fanisi(&temp)
        .args(["render", "rof6-template", "--var", "total_fees=100000", "--auto-fill"])
        .assert()
        .success()
        .stdout(predicate::str::contains("VAT (16%): KES 16000"))
        .stdout(predicate::str::contains("Total Amount Due: KES 116000"));
}

#[test]
fn test_render_unknown_template_fails() {
    let temp = assert_fs::TempDir::new().unwrap();
    fanisi(&temp)
        .args(["render", "licence"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Template not found: licence"));
}

#[test]
fn test_render_bad_var_fails() {
    let temp = assert_fs::TempDir::new().unwrap();
    fanisi(&temp)
        .args(["render", "lease-agreement", "--var", "site_code"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected key=value"));
}

// ============================================================================
// Submit Command
// ============================================================================

#[test]
fn test_submit_writes_documents() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("rof5.json").write_str(FORM_JSON).unwrap();

    fanisi(&temp)
        .args(["submit", "rof5.json", "--out-dir", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Document Drafting, 50%"))
        .stdout(predicate::str::contains("Review and finalize lease agreement"));

    temp.child("out/NBI001-lease-agreement.txt").assert(predicate::str::contains("ABC Ltd"));
    temp.close().unwrap();
}

#[test]
fn test_submit_yaml_json_output() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("rof5.yaml")
        .write_str("siteCode: MSA002\nsiteLocation: Nyali\nlandlordName: XYZ Holdings\nurgencyLevel: high\n")
        .unwrap();

    let output = fanisi(&temp)
        .args(["submit", "rof5.yaml", "--out-dir", "out", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["instruction"]["siteCode"], "MSA002");
    assert_eq!(value["instruction"]["priority"], "high");
    assert_eq!(value["instruction"]["progress"], 50);
    assert_eq!(value["suggestions"].as_array().unwrap().len(), 2);
}

#[test]
fn test_submit_validation_failure() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("rof5.json").write_str(r#"{"siteCode": "NBI001"}"#).unwrap();

    fanisi(&temp)
        .args(["submit", "rof5.json", "--out-dir", "out"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing required fields: siteLocation, landlordName"));

    fanisi(&temp)
        .args(["submit", "rof5.json", "--out-dir", "out", "--quick"])
        .assert()
        .success();
}

// ============================================================================
// Suggestion Commands
// ============================================================================

#[test]
fn test_suggest_locations() {
    let temp = assert_fs::TempDir::new().unwrap();
    fanisi(&temp)
        .args(["suggest", "siteLocation", "--var", "county=mombasa"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nyali"))
        .stdout(predicate::str::contains("80%"));
}

#[test]
fn test_suggest_without_rule() {
    let temp = assert_fs::TempDir::new().unwrap();
    fanisi(&temp)
        .args(["suggest", "landlordPhone"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No suggestions for landlordPhone"));
}

#[test]
fn test_assess() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("rof5.json").write_str(FORM_JSON).unwrap();

    // nairobi +2, term 15 +1
    fanisi(&temp)
        .args(["assess", "rof5.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Priority: medium (score 3)"));
}

// ============================================================================
// Misc Commands
// ============================================================================

#[test]
fn test_roles() {
    let temp = assert_fs::TempDir::new().unwrap();
    fanisi(&temp)
        .arg("roles")
        .assert()
        .success()
        .stdout(predicate::str::contains("EC - External Counsel"))
        .stdout(predicate::str::contains("assign-external-counsel"))
        .stdout(predicate::str::contains("Jane Smith"));
}

#[test]
fn test_config_shows_defaults() {
    let temp = assert_fs::TempDir::new().unwrap();
    fanisi(&temp)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("id_prefix = \"ROF\""));
}

#[test]
fn test_config_init_writes_once() {
    let temp = assert_fs::TempDir::new().unwrap();

    fanisi(&temp)
        .args(["--config", "conf/fanisi.toml", "config", "--init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote conf/fanisi.toml"));
    temp.child("conf/fanisi.toml").assert(predicate::str::contains("[workflow]"));

    fanisi(&temp)
        .args(["--config", "conf/fanisi.toml", "config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default_template = \"lease-agreement\""));

    fanisi(&temp)
        .args(["--config", "conf/fanisi.toml", "config", "--init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config already exists"));

    temp.close().unwrap();
}

#[test]
fn test_completions() {
    let temp = assert_fs::TempDir::new().unwrap();
    fanisi(&temp)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fanisi"));
}
