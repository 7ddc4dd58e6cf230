use doc_tools::core::CheckOutcome;
use doc_tools::{EntityTable, LocalStorage, ToolError, XmlChecker};
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_checker_reads_files_from_disk() {
    let temp_dir = TempDir::new().unwrap();
    let good = write(
        &temp_dir,
        "good.xml",
        "<chapter><title>Na&iuml;ve &mdash; &lt;tags&gt;</title><para>&copy; 2011</para></chapter>",
    );
    let bad = write(&temp_dir, "bad.xml", "<chapter><para></chapter>");
    let last = write(&temp_dir, "last.xml", "<index/>");

    let checker = XmlChecker::new(LocalStorage::new(temp_dir.path()), EntityTable::html());
    let mut out = Vec::new();
    let report = checker
        .run(&[good.clone(), bad.clone(), last.clone()], &mut out)
        .unwrap();

    assert_eq!(report.checked, 3);
    assert_eq!(report.failed, 1);
    match &report.files[0].outcome {
        CheckOutcome::Parsed(doc) => {
            assert_eq!(doc.root, "chapter");
            assert_eq!(doc.elements, 3);
        }
        other => panic!("expected parsed document, got {:?}", other),
    }
    assert!(report.files[1].outcome.is_malformed());
    assert!(!report.files[2].outcome.is_malformed());

    let printed = String::from_utf8(out).unwrap();
    assert!(printed.starts_with(&format!("{} ", bad.display())));
}

#[test]
fn test_unknown_entity_aborts_run() {
    let temp_dir = TempDir::new().unwrap();
    let first = write(&temp_dir, "first.xml", "<a>&notanentity;</a>");
    let second = write(&temp_dir, "second.xml", "<b><c></b>");

    let checker = XmlChecker::new(LocalStorage::new(temp_dir.path()), EntityTable::html());
    let mut out = Vec::new();
    let err = checker.run(&[first, second], &mut out).unwrap_err();

    assert!(matches!(err, ToolError::UnknownEntity { ref name, .. } if name == "notanentity"));
    assert!(out.is_empty());
}

#[test]
fn test_cli_reports_and_exits_zero() {
    let temp_dir = TempDir::new().unwrap();
    let bad = write(&temp_dir, "bad.xml", "<a>");
    let good = write(&temp_dir, "good.xml", "<a>&eacute;</a>");

    let output = Command::new(env!("CARGO_BIN_EXE_checkxml"))
        .arg(&bad)
        .arg(&good)
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 1);
    assert!(stdout.starts_with(&bad.display().to_string()));
}

#[test]
fn test_cli_strict_mode_fails_on_malformed() {
    let temp_dir = TempDir::new().unwrap();
    let bad = write(&temp_dir, "bad.xml", "<a></b>");

    let status = Command::new(env!("CARGO_BIN_EXE_checkxml"))
        .arg("--strict")
        .arg(&bad)
        .status()
        .unwrap();

    assert_eq!(status.code(), Some(1));
}

#[test]
fn test_cli_unknown_entity_exits_non_zero() {
    let temp_dir = TempDir::new().unwrap();
    let doc = write(&temp_dir, "doc.xml", "<a>&whatever;</a>");

    let output = Command::new(env!("CARGO_BIN_EXE_checkxml"))
        .arg(&doc)
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("whatever"));
}

#[test]
fn test_cli_json_report_and_custom_entities() {
    let temp_dir = TempDir::new().unwrap();
    let config = write(
        &temp_dir,
        "tools.toml",
        "[checker.entities]\ncheck = \"✓\"\n",
    );
    let doc = write(&temp_dir, "doc.xml", "<list><item>&check;</item></list>");

    let output = Command::new(env!("CARGO_BIN_EXE_checkxml"))
        .arg("--config")
        .arg(&config)
        .arg("--report")
        .arg("json")
        .arg(&doc)
        .output()
        .unwrap();

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["checked"], 1);
    assert_eq!(report["failed"], 0);
    assert_eq!(report["files"][0]["status"], "parsed");
    assert_eq!(report["files"][0]["root"], "list");
}

#[test]
fn test_cli_json_report_with_malformed_file_is_pure_json() {
    let temp_dir = TempDir::new().unwrap();
    let bad = write(&temp_dir, "bad.xml", "<a>");
    let good = write(&temp_dir, "good.xml", "<b>&hellip;</b>");

    let output = Command::new(env!("CARGO_BIN_EXE_checkxml"))
        .arg("--report")
        .arg("json")
        .arg(&bad)
        .arg(&good)
        .output()
        .unwrap();

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["checked"], 2);
    assert_eq!(report["failed"], 1);
    assert_eq!(report["files"][0]["status"], "malformed");
    assert_eq!(report["files"][0]["path"], bad.display().to_string());
    assert!(!report["files"][0]["message"].as_str().unwrap().is_empty());
    assert_eq!(report["files"][1]["status"], "parsed");
}

#[test]
fn test_cli_text_report_follows_diagnostics() {
    let temp_dir = TempDir::new().unwrap();
    let bad = write(&temp_dir, "bad.xml", "<a>");

    let output = Command::new(env!("CARGO_BIN_EXE_checkxml"))
        .arg("--report")
        .arg("text")
        .arg(&bad)
        .output()
        .unwrap();

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with(&bad.display().to_string()));
    assert_eq!(lines[1], "1 checked, 1 malformed");
}

#[test]
fn test_cli_non_utf8_file_does_not_abort_run() {
    let temp_dir = TempDir::new().unwrap();
    let garbage = temp_dir.path().join("garbage.xml");
    std::fs::write(&garbage, b"<a>\xff\xfe</a>").unwrap();
    let latin1 = temp_dir.path().join("latin1.xml");
    std::fs::write(
        &latin1,
        b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><p>caf\xe9 &eacute;</p>",
    )
    .unwrap();
    let good = write(&temp_dir, "good.xml", "<ok/>");

    let output = Command::new(env!("CARGO_BIN_EXE_checkxml"))
        .arg(&latin1)
        .arg(&garbage)
        .arg(&good)
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 1);
    assert!(stdout.starts_with(&garbage.display().to_string()));
}
