//! Integration tests for the `duplex` binary, driven as a subprocess
//! against fixture line-stream files.

use std::path::PathBuf;
use std::process::Command;

fn duplex_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_duplex"))
}

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures").join(name)
}

fn run(args: &[&str]) -> (i32, String, String) {
    let output = Command::new(duplex_binary()).args(args).output().expect("failed to execute duplex");
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (output.status.code().unwrap_or(-1), stdout, stderr)
}

#[test]
fn test_help() {
    let (code, stdout, _stderr) = run(&["--help"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("duplex"));
}

#[test]
fn test_text_report_finds_match() {
    let a = fixture_path("doc_a.json");
    let b = fixture_path("doc_b.json");
    let (code, stdout, _stderr) =
        run(&["--window-n", "2", "--min-paragraph-len", "0", a.to_str().unwrap(), b.to_str().unwrap()]);
    assert_eq!(code, 0);
    assert!(stdout.contains("matches:"));
    assert!(stdout.contains("fragments:"));
}

#[test]
fn test_json_report_is_valid_json() {
    let a = fixture_path("doc_a.json");
    let b = fixture_path("doc_b.json");
    let (code, stdout, _stderr) = run(&[
        "--format",
        "json",
        "--window-n",
        "2",
        "--min-paragraph-len",
        "0",
        a.to_str().unwrap(),
        b.to_str().unwrap(),
    ]);
    assert_eq!(code, 0);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("valid json");
    assert!(parsed["matches"].is_array());
    assert!(parsed["total_fragments_a"].as_u64().unwrap() > 0);
}

#[test]
fn test_csv_report_has_header() {
    let a = fixture_path("doc_a.json");
    let b = fixture_path("doc_b.json");
    let (code, stdout, _stderr) = run(&[
        "--format",
        "csv",
        "--window-n",
        "2",
        "--min-paragraph-len",
        "0",
        a.to_str().unwrap(),
        b.to_str().unwrap(),
    ]);
    assert_eq!(code, 0);
    assert!(stdout.lines().next().unwrap().starts_with("score,a_page,a_line"));
}

#[test]
fn test_empty_documents_yield_zero_matches() {
    let empty = fixture_path("empty.json");
    let (code, stdout, _stderr) =
        run(&["--min-paragraph-len", "0", empty.to_str().unwrap(), empty.to_str().unwrap()]);
    assert_eq!(code, 0);
    assert!(stdout.contains("matches: 0"));
}

#[test]
fn test_invalid_window_n_exits_nonzero() {
    let a = fixture_path("doc_a.json");
    let b = fixture_path("doc_b.json");
    let (code, _stdout, stderr) =
        run(&["--window-n", "1", a.to_str().unwrap(), b.to_str().unwrap()]);
    assert_ne!(code, 0);
    assert!(stderr.contains("window_n"));
}

#[test]
fn test_missing_file_exits_nonzero() {
    let (code, _stdout, stderr) = run(&["/nonexistent/a.json", "/nonexistent/b.json"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("failed to read"));
}

#[test]
fn test_outfile_writes_report_to_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out_path = dir.path().join("report.json");
    let a = fixture_path("doc_a.json");
    let b = fixture_path("doc_b.json");
    let (code, stdout, _stderr) = run(&[
        "--format",
        "json",
        "--window-n",
        "2",
        "--min-paragraph-len",
        "0",
        "-o",
        out_path.to_str().unwrap(),
        a.to_str().unwrap(),
        b.to_str().unwrap(),
    ]);
    assert_eq!(code, 0);
    assert!(stdout.is_empty());
    let content = std::fs::read_to_string(&out_path).expect("report file written");
    let parsed: serde_json::Value = serde_json::from_str(&content).expect("valid json");
    assert!(parsed["matches"].is_array());
}

#[test]
fn test_tau_flag_excludes_low_scores() {
    let a = fixture_path("doc_a.json");
    let b = fixture_path("doc_b.json");
    let (code, stdout, _stderr) = run(&[
        "--window-n",
        "2",
        "--tau",
        "1.0",
        "--min-paragraph-len",
        "0",
        "--format",
        "json",
        a.to_str().unwrap(),
        b.to_str().unwrap(),
    ]);
    assert_eq!(code, 0);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("valid json");
    for m in parsed["matches"].as_array().unwrap() {
        assert!(m["score"].as_f64().unwrap() >= 1.0 - 1e-9);
    }
}
