use std::{error::Error, path::Path};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::{tempdir, TempDir};

const ACCOUNT: &str = "11111111-1111-4111-8111-111111111111";

fn request_json(months: Option<i32>, budget: f64) -> String {
    let months = months
        .map(|months| format!(r#""months": {},"#, months))
        .unwrap_or_default();
    format!(
        r#"{{
  "accountId": "{account}",
  "initialBalance": 500.0,
  "startMonth": "2025-01",
  {months}
  "transactions": [
    {{
      "id": "22222222-2222-4222-8222-222222222222",
      "accountId": "{account}",
      "kind": "EXPENSE",
      "amount": 800.0,
      "date": "2025-01-10",
      "category": "dining"
    }}
  ],
  "categoryBudgets": [
    {{
      "id": "33333333-3333-4333-8333-333333333333",
      "accountId": "{account}",
      "category": "dining",
      "amount": {budget}
    }}
  ]
}}"#,
        account = ACCOUNT,
        months = months,
        budget = budget
    )
}

fn write_request(dir: &TempDir, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, body).expect("write request");
    path
}

fn cli(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("cashcast_cli").expect("binary");
    cmd.env("CASHCAST_HOME", home).env("NO_COLOR", "1");
    cmd
}

#[test]
fn project_prints_json_report() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let request = write_request(&dir, "request.json", &request_json(Some(3), 500.0));

    let output = cli(dir.path()).arg("project").arg(&request).output()?;
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(report["months"].as_array().map(Vec::len), Some(3));
    assert_eq!(report["months"][0]["endingBalance"], -300.0);
    assert_eq!(report["alerts"][0]["kind"], "BUDGET_EXCEEDED");
    assert_eq!(report["advancedAlerts"][0]["priorityRank"], 1);
    assert_eq!(report["analysis"]["deficitMonths"], 3);
    Ok(())
}

#[test]
fn months_come_from_flag_then_file_then_config() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let with_months = write_request(&dir, "with.json", &request_json(Some(3), 500.0));
    let without_months = write_request(&dir, "without.json", &request_json(None, 500.0));

    let count = |args: &[&str], path: &Path| -> Result<usize, Box<dyn Error>> {
        let output = cli(dir.path())
            .arg("project")
            .arg(path)
            .args(args)
            .output()?;
        let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
        Ok(report["months"].as_array().map(Vec::len).unwrap_or_default())
    };

    assert_eq!(count(&["--months", "5"], &with_months)?, 5);
    assert_eq!(count(&[], &with_months)?, 3);
    assert_eq!(count(&[], &without_months)?, 12);

    cli(dir.path())
        .args(["config", "set", "default_months", "6"])
        .assert()
        .success();
    assert_eq!(count(&[], &without_months)?, 6);
    Ok(())
}

#[test]
fn project_renders_text() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let request = write_request(&dir, "request.json", &request_json(Some(2), 500.0));

    cli(dir.path())
        .arg("project")
        .arg(&request)
        .args(["--format", "text"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("=== Projection ===")
                .and(predicate::str::contains("DEFICIT_START"))
                .and(predicate::str::contains("=== Ranked alerts ==="))
                .and(predicate::str::contains("Lowest balance")),
        );
    Ok(())
}

#[test]
fn alerts_filters_by_severity() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let request = write_request(&dir, "request.json", &request_json(Some(2), 500.0));

    let output = cli(dir.path())
        .arg("alerts")
        .arg(&request)
        .args(["--min-severity", "critical"])
        .output()?;
    assert!(output.status.success());

    let alerts: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout)?;
    assert!(!alerts.is_empty());
    assert!(alerts.iter().all(|alert| alert["severity"] == "CRITICAL"));
    assert_eq!(alerts[0]["domain"], "DEFICIT");
    assert_eq!(alerts[0]["priorityRank"], 1);
    Ok(())
}

#[test]
fn invalid_request_fails_with_error() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let request = write_request(&dir, "request.json", &request_json(Some(2), -10.0));

    cli(dir.path())
        .arg("project")
        .arg(&request)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error: Invalid request"));

    let malformed = write_request(
        &dir,
        "malformed.json",
        &request_json(Some(2), 10.0).replace("2025-01\"", "2025-13\""),
    );
    cli(dir.path())
        .arg("project")
        .arg(&malformed)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
    Ok(())
}

#[test]
fn config_commands_round_trip() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;

    cli(dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default_months = 12"));

    cli(dir.path())
        .args(["config", "set", "currency", "eur"])
        .assert()
        .success();
    cli(dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("currency = EUR"));

    cli(dir.path())
        .args(["config", "set", "theme", "dark"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown configuration key"));

    cli(dir.path())
        .args(["config", "backup", "Before Trip"])
        .assert()
        .success()
        .stdout(predicate::str::contains("before-trip"));
    cli(dir.path())
        .args(["config", "backups"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config_").and(predicate::str::contains("before-trip")));
    Ok(())
}

#[test]
fn version_and_unknown_command() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    cli(dir.path())
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "cashcast {}",
            env!("CARGO_PKG_VERSION")
        )));

    cli(dir.path())
        .arg("forecast")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown command"));
    Ok(())
}
