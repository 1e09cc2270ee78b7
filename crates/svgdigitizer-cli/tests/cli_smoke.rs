use assert_cmd::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

fn repo_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("expected crates/<name> layout")
        .to_path_buf()
}

fn fixture(name: &str) -> PathBuf {
    let path = repo_root().join("fixtures").join(name);
    assert!(path.exists(), "fixture missing: {}", path.display());
    path
}

fn stdout_json(cmd: &mut Command) -> serde_json::Value {
    let assert = cmd.assert().success();
    serde_json::from_slice(&assert.get_output().stdout).expect("stdout is JSON")
}

#[test]
fn cli_digitizes_raw_vertices() {
    let exe = assert_cmd::cargo_bin!("svgdigitizer-cli");
    let value = stdout_json(Command::new(exe).arg(fixture("reference_points.svg")));

    let series = value.as_array().expect("array of series");
    assert_eq!(series.len(), 2);
    assert_eq!(series[0]["curve"], "forward");
    assert_eq!(series[0]["columns"], serde_json::json!(["x", "y"]));
    assert_eq!(series[0]["rows"][2], serde_json::json!([0.5, 1.0]));
    assert_eq!(series[1]["curve"], "peak");
}

#[test]
fn cli_resamples_with_labels_and_writes_out_file() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let out = tmp.path().join("series.json");

    let exe = assert_cmd::cargo_bin!("svgdigitizer-cli");
    Command::new(exe)
        .args([
            "digitize",
            "--xlabel",
            "U",
            "--ylabel",
            "I",
            "--sampling-interval",
            "0.3",
            "--pretty",
            "--out",
            out.to_string_lossy().as_ref(),
            fixture("reference_points.svg").to_string_lossy().as_ref(),
        ])
        .assert()
        .success();

    let text = fs::read_to_string(&out).expect("read output");
    let value: serde_json::Value = serde_json::from_str(&text).expect("valid JSON");
    assert_eq!(value[0]["columns"], serde_json::json!(["U", "I"]));
    assert_eq!(value[0]["rows"].as_array().map(Vec::len), Some(4));
    assert_eq!(value[1]["rows"].as_array().map(Vec::len), Some(3));
}

#[test]
fn cli_reads_config_file() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let config = tmp.path().join("options.json");
    fs::write(&config, r#"{"xlabel": "E", "ylabel": "j"}"#).expect("write config");

    let exe = assert_cmd::cargo_bin!("svgdigitizer-cli");
    let value = stdout_json(Command::new(exe).args([
        "--config",
        config.to_string_lossy().as_ref(),
        "--ylabel",
        "I",
        fixture("scale_bar.svg").to_string_lossy().as_ref(),
    ]));
    assert_eq!(value[0]["columns"], serde_json::json!(["E", "I"]));
}

#[test]
fn cli_reports_calibration() {
    let exe = assert_cmd::cargo_bin!("svgdigitizer-cli");
    let value = stdout_json(Command::new(exe).args([
        "calibrate",
        fixture("scale_bar.svg").to_string_lossy().as_ref(),
    ]));

    assert_eq!(value["x"]["mode"], "referencePoints");
    assert_eq!(value["y"]["mode"], "scaleBar");
    assert_eq!(value["y"]["scalingFactor"], 1000.0);
    assert_eq!(value["scaleBars"][0]["axis"], "y");
    assert_eq!(value["scaleBars"][0]["unit"], "mA");
    assert_eq!(value["referencePoints"].as_array().map(Vec::len), Some(3));
}

#[test]
fn cli_lists_curves_from_stdin() {
    let svg = fs::read_to_string(fixture("exported.svg")).expect("read fixture");
    let exe = assert_cmd::cargo_bin!("svgdigitizer-cli");
    assert_cmd::Command::new(exe)
        .args(["curves", "-"])
        .write_stdin(svg)
        .assert()
        .success()
        .stdout("first\npath5\n");
}

#[test]
fn cli_writes_curve_ids_to_out_file() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let out = tmp.path().join("ids.txt");

    let exe = assert_cmd::cargo_bin!("svgdigitizer-cli");
    Command::new(exe)
        .args([
            "curves",
            "--out",
            out.to_string_lossy().as_ref(),
            fixture("exported.svg").to_string_lossy().as_ref(),
        ])
        .assert()
        .success()
        .stdout("");

    let text = fs::read_to_string(&out).expect("read output");
    assert_eq!(text, "first\npath5\n");
}

#[test]
fn cli_fails_on_uncalibrated_document() {
    let svg = r#"<svg xmlns="http://www.w3.org/2000/svg"><path id="c" d="M 0 0 L 1 1"/></svg>"#;
    let exe = assert_cmd::cargo_bin!("svgdigitizer-cli");
    let assert = assert_cmd::Command::new(exe)
        .write_stdin(svg)
        .assert()
        .failure()
        .code(1);
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("calibration"), "{stderr}");
}

#[test]
fn cli_rejects_bad_arguments() {
    let exe = assert_cmd::cargo_bin!("svgdigitizer-cli");
    Command::new(exe)
        .args(["--sampling-interval", "-2"])
        .assert()
        .failure()
        .code(2);

    let exe = assert_cmd::cargo_bin!("svgdigitizer-cli");
    Command::new(exe)
        .args(["--frobnicate"])
        .assert()
        .failure()
        .code(2);
}
