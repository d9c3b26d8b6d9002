use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use assert_cmd::cargo::{self};
use predicates::prelude::*;
use predicates::str::contains;

fn fixture(name: &str, contents: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let path = std::env::temp_dir().join(format!("vanishing-fields-{stamp}-{name}"));
    fs::write(&path, contents).unwrap();
    path
}

const DOCUMENT: &str = r#"[
  {"tag": "span", "attrs": {"id": "email-label", "data-vanishing-field-for": "email"}},
  {"tag": "div", "attrs": {"id": "email", "data-vanishing-field": "email"}, "children": [
    {"tag": "input", "attrs": {"id": "email-input", "name": "email", "value": "old@example.com"}}
  ]},
  {"tag": "button", "attrs": {"id": "elsewhere"}}
]"#;

#[test]
fn script_run_reports_changed_fields() {
    let document = fixture("doc.json", DOCUMENT);
    let script = fixture(
        "script.json",
        r#"[
          {"action": "click", "target": "email-label"},
          {"action": "input", "target": "email-input", "value": "new@example.com"},
          {"action": "focus", "target": "elsewhere"}
        ]"#,
    );

    let mut cmd = cargo::cargo_bin_cmd!("vanishing-fields");
    cmd.arg("--document")
        .arg(&document)
        .arg("--script")
        .arg(&script)
        .arg("--no-pretty")
        .assert()
        .success()
        .stdout(contains(r#""identifier":"email""#))
        .stdout(contains(r#""changed":true"#))
        .stdout(contains(r#""label":"new@example.com""#));

    let _ = fs::remove_file(document);
    let _ = fs::remove_file(script);
}

#[test]
fn unknown_script_target_fails() {
    let document = fixture("doc.json", DOCUMENT);
    let mut cmd = cargo::cargo_bin_cmd!("vanishing-fields");
    cmd.arg("-d")
        .arg(&document)
        .arg("-s")
        .arg(r#"[{"action":"open","field":"phone"}]"#)
        .assert()
        .failure()
        .stderr(contains("phone"));
    let _ = fs::remove_file(document);
}

#[test]
fn refuses_to_overwrite_outputs() {
    let document = fixture("doc.json", DOCUMENT);
    let existing = fixture("out.json", "{}");
    let mut cmd = cargo::cargo_bin_cmd!("vanishing-fields");
    cmd.arg("-d")
        .arg(&document)
        .arg("-s")
        .arg("[]")
        .arg("-o")
        .arg(&existing)
        .assert()
        .failure()
        .stderr(contains("already exists").and(contains("--force")));

    let mut cmd = cargo::cargo_bin_cmd!("vanishing-fields");
    cmd.arg("-d")
        .arg(&document)
        .arg("-s")
        .arg("[]")
        .arg("-o")
        .arg(&existing)
        .arg("--force")
        .assert()
        .success();
    let written = fs::read_to_string(&existing).unwrap();
    assert!(written.contains("\"fields\""));

    let _ = fs::remove_file(document);
    let _ = fs::remove_file(existing);
}
