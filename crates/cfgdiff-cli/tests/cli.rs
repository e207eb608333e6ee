use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::{tempdir, TempDir};

fn run_cli(cwd: &Path, args: &[&str]) -> Output {
    Command::new(assert_cmd::cargo::cargo_bin!("cfgdiff"))
        .current_dir(cwd)
        .env_remove("CFGDIFF_CONFIG")
        .env_remove("RUST_LOG")
        .args(["--color", "never"])
        .args(args)
        .output()
        .expect("run cfgdiff")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("stdout utf8")
}

fn fixture(files: &[(&str, &str)]) -> TempDir {
    let tmp = tempdir().expect("tempdir");
    for (name, contents) in files {
        fs::write(tmp.path().join(name), contents).expect("write fixture");
    }
    tmp
}

const INI_A: &str = "[server]\nhost = example.org\nport = 80\n";
const INI_B: &str = "# reordered\n[server]\nport = 80\nhost = example.org\n";

#[test]
fn permuted_ini_keys_are_equal() {
    let tmp = fixture(&[("a.ini", INI_A), ("b.ini", INI_B)]);
    let output = run_cli(tmp.path(), &["a.ini", "b.ini"]);
    assert_eq!(output.status.code(), Some(0), "stderr: {:?}", output.stderr);
    assert!(stdout(&output).is_empty());
}

#[test]
fn ordered_input_shows_permutation() {
    let tmp = fixture(&[("a.ini", INI_A), ("b.ini", INI_B)]);
    let output = run_cli(tmp.path(), &["-O", "a.ini", "b.ini"]);
    assert_eq!(output.status.code(), Some(1));
    let text = stdout(&output);
    assert!(text.starts_with("*** a.ini\n--- b.ini\n***************\n"), "{text}");
}

#[test]
fn permuted_json_keys_are_equal() {
    let tmp = fixture(&[
        ("a.json", r#"{"name": "web", "ports": [80, 443], "tls": {"on": true, "cert": "x"}}"#),
        ("b.json", "{\n  \"tls\": {\"cert\": \"x\", \"on\": true},\n  \"ports\": [80, 443],\n  \"name\": \"web\"\n}\n"),
    ]);
    let output = run_cli(tmp.path(), &["-i", "json", "a.json", "b.json"]);
    assert_eq!(output.status.code(), Some(0), "stdout: {}", stdout(&output));
}

#[test]
fn missing_from_file_reports_only_in() {
    let tmp = fixture(&[("b.ini", INI_A)]);
    let output = run_cli(tmp.path(), &["a.ini", "b.ini"]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout(&output), "Only in .: b.ini\n");
}

#[test]
fn new_file_diffs_against_empty() {
    let tmp = fixture(&[("b.ini", INI_A)]);
    let output = run_cli(tmp.path(), &["-N", "-u", "a.ini", "b.ini"]);
    assert_eq!(output.status.code(), Some(1));
    let text = stdout(&output);
    assert!(text.starts_with("--- /dev/null\n+++ b.ini\n@@ -0,0 +1,4 @@\n"), "{text}");
    assert!(text.contains("+[server]\n+host = example.org\n+port = 80\n"));
}

#[test]
fn parse_failure_is_reported() {
    let tmp = fixture(&[("a.json", "{\"a\": 1}"), ("b.json", "not json")]);
    let output = run_cli(tmp.path(), &["-i", "json", "-n", "a.json", "b.json"]);
    assert_eq!(output.status.code(), Some(1));
    let text = stdout(&output);
    assert!(text.starts_with("b.json could not be parsed as a json file:\n "));
    assert!(text.contains("It will be interpreted as an empty file.\n- {\n"));
}

#[test]
fn directory_and_file_in_recursive_mode_exit_two() {
    let tmp = fixture(&[("a.ini", INI_A)]);
    fs::create_dir(tmp.path().join("dir")).expect("mkdir");
    let output = run_cli(tmp.path(), &["-r", "dir", "a.ini"]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cannot compare folders and files"));
}

#[test]
fn config_file_supplies_defaults() {
    let tmp = fixture(&[
        ("a.json", r#"{"b": 1, "a": 2}"#),
        ("b.json", r#"{"a": 2, "b": 1}"#),
        (".cfgdiff.toml", "[defaults]\ninput_format = \"json\"\nordered = true\noutput = \"unified\"\n"),
    ]);
    let output = run_cli(tmp.path(), &["a.json", "b.json"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).starts_with("--- a.json\n+++ b.json\n"));
}

#[test]
fn malformed_config_is_fatal() {
    let tmp = fixture(&[("a.ini", INI_A), ("broken.toml", "[defaults\n")]);
    let output = run_cli(tmp.path(), &["--config", "broken.toml", "a.ini", "a.ini"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn unsupported_format_name_rejected_by_parser() {
    let tmp = fixture(&[("a.ini", INI_A)]);
    let output = run_cli(tmp.path(), &["-i", "csv", "a.ini", "a.ini"]);
    assert_eq!(output.status.code(), Some(2));
}
