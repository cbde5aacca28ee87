use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn rdv(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("rdv").unwrap();
    cmd.env("XDG_CONFIG_HOME", home.path());
    cmd
}

/// Config whose OCR tools do not exist, so scanned inputs degrade to empty text.
fn offline_config(dir: &Path) -> String {
    let path = dir.join("offline.json");
    fs::write(
        &path,
        r#"{"ocr": {"rasterizer_command": "rdv-test-missing-pdftoppm", "tesseract_command": "rdv-test-missing-tesseract"}}"#,
    )
    .unwrap();
    path.display().to_string()
}

#[test]
fn resolve_reads_stdin() {
    let home = TempDir::new().unwrap();
    rdv(&home)
        .args(["resolve", "-c", "meal"])
        .write_stdin("RESTAURANTE\nTotal: R$ 75,23\nSubtotal: R$ 60,00\n")
        .assert()
        .success()
        .stdout("75.23\n");
}

#[test]
fn resolve_reads_file_and_formats_brl() {
    let home = TempDir::new().unwrap();
    let input = home.path().join("hotel.txt");
    fs::write(&input, "Diaria R$ 175,00\nTOTAL R$ 1234,50\n").unwrap();

    rdv(&home)
        .args(["resolve", "-c", "hospedagem", "--brl"])
        .arg(&input)
        .assert()
        .success()
        .stdout("R$ 1.234,50\n");
}

#[test]
fn resolve_not_found_prints_zero() {
    let home = TempDir::new().unwrap();
    rdv(&home)
        .args(["resolve", "-c", "toll"])
        .write_stdin("Obrigado pela preferencia")
        .assert()
        .success()
        .stdout("0\n");
}

#[test]
fn unknown_category_is_rejected() {
    let home = TempDir::new().unwrap();
    rdv(&home)
        .args(["resolve", "-c", "fuel"])
        .write_stdin("TOTAL 10,00")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown document category: fuel"));
}

#[test]
fn extract_missing_file_fails() {
    let home = TempDir::new().unwrap();
    rdv(&home)
        .args(["extract", "-c", "toll", "/nonexistent/extrato.pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn extract_unreadable_pdf_reports_zero() {
    let home = TempDir::new().unwrap();
    let config = offline_config(home.path());
    let input = home.path().join("scan.pdf");
    fs::write(&input, b"not really a pdf").unwrap();

    let output = rdv(&home)
        .args(["--config", &config, "extract", "-c", "lodging"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success());

    let outcome: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(outcome["name"], "scan.pdf");
    assert_eq!(outcome["category"], "lodging");
    assert_eq!(outcome["amount"], "0");
    assert!(outcome.get("error").is_none());
}

#[test]
fn batch_without_inputs_fails() {
    let home = TempDir::new().unwrap();
    rdv(&home)
        .arg("batch")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files found"));
}

#[test]
fn batch_writes_summary_json_and_csv() {
    let home = TempDir::new().unwrap();
    let config = offline_config(home.path());
    for name in ["a.pdf", "b.pdf"] {
        fs::write(home.path().join(name), b"garbage").unwrap();
    }
    let csv_path = home.path().join("summary.csv");
    let pattern = format!("{}/*.pdf", home.path().display());

    let output = rdv(&home)
        .args(["--config", &config, "batch", "--meal", &pattern, "-j", "2", "--summary"])
        .arg(&csv_path)
        .output()
        .unwrap();
    assert!(output.status.success());

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["meal"], "0");
    assert_eq!(summary["files"].as_array().unwrap().len(), 2);
    assert_eq!(summary["files"][0]["name"], "a.pdf");

    let csv = fs::read_to_string(&csv_path).unwrap();
    assert!(csv.starts_with("category,filename,status,amount,error\n"));
    assert!(csv.contains("meal,b.pdf,success,0,"));
}

#[test]
fn config_init_get_set_round_trip() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("rdv.json");
    let path_arg = path.display().to_string();

    rdv(&home)
        .args(["--config", &path_arg, "config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration file"));
    assert!(path.exists());

    rdv(&home)
        .args(["--config", &path_arg, "config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    rdv(&home)
        .args(["--config", &path_arg, "config", "set", "ocr.render_dpi", "200"])
        .assert()
        .success();

    rdv(&home)
        .args(["--config", &path_arg, "config", "get", "ocr.render_dpi"])
        .assert()
        .success()
        .stdout("200\n");

    rdv(&home)
        .args(["--config", &path_arg, "config", "get", "ocr.nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));
}

#[test]
fn config_show_defaults() {
    let home = TempDir::new().unwrap();
    rdv(&home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"min_text_length\": 50"))
        .stdout(predicate::str::contains("\"language\": \"por\""));
}
