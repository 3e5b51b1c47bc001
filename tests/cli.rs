mod common;

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;

use common::{FEBRUARY_FILE, JANUARY_FILE, TestWorkspace, fixture_path};

fn salesboard() -> Command {
    Command::cargo_bin("salesboard").expect("binary exists")
}

fn fixture_args() -> Vec<String> {
    [JANUARY_FILE, FEBRUARY_FILE]
        .iter()
        .flat_map(|name| {
            [
                "-i".to_string(),
                fixture_path(name).to_string_lossy().to_string(),
            ]
        })
        .collect()
}

#[test]
fn report_prints_every_available_view() {
    salesboard()
        .arg("report")
        .args(fixture_args())
        .assert()
        .success()
        .stdout(contains("## Key indicators"))
        .stdout(contains("## Sales by month"))
        .stdout(contains("2024-02"))
        .stdout(contains("## TECNICO"))
        .stdout(contains("## Commission group share"))
        .stdout(contains("VENDEDOR INTERNO").not());
}

#[test]
fn report_json_applies_filters() {
    let output = salesboard()
        .arg("report")
        .args(fixture_args())
        .args(["--from", "2024-01-01", "--to", "2024-01-31", "--format", "json"])
        .output()
        .expect("run report");
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("parse json");
    assert_eq!(json["kpis"]["total_sales"], 2);
    assert_eq!(json["monthly_trend"]["rows"][0][0], "2024-01");
    assert_eq!(json["monthly_trend"]["rows"][0][1], 2);
}

#[test]
fn report_rejects_inverted_range() {
    salesboard()
        .arg("report")
        .args(fixture_args())
        .args(["--from", "2024-02-01", "--to", "2024-01-01"])
        .assert()
        .failure()
        .stderr(contains("Invalid date range"));
}

#[test]
fn report_skips_unreadable_files() {
    let workspace = TestWorkspace::new();
    let missing = workspace.path().join("missing.csv");
    salesboard()
        .arg("report")
        .args(fixture_args())
        .args(["-i", missing.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("total sales"));
}

#[test]
fn report_without_rows_asks_for_new_input() {
    let workspace = TestWorkspace::new();
    let empty = workspace.write("empty.csv", "FECHA,VENDEDOR\n");
    salesboard()
        .args(["report", "-i", empty.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(contains("No data rows"));
}

#[test]
fn columns_lists_resolved_roles() {
    salesboard()
        .arg("columns")
        .args(fixture_args())
        .assert()
        .success()
        .stdout(contains("FECHA_VENTA"))
        .stdout(contains("date"))
        .stdout(contains("CANAL_PEDIDO"))
        .stdout(contains("channel"));
}

#[test]
fn options_lists_filter_choices() {
    salesboard()
        .arg("options")
        .args(fixture_args())
        .assert()
        .success()
        .stdout(contains("dates: 2024-01-05 .. 2024-02-29"))
        .stdout(contains("  ASISTENTE DE VENTA"))
        .stdout(contains("  ROSA VEGA"));
}

#[test]
fn options_narrow_sellers_by_group() {
    salesboard()
        .arg("options")
        .args(fixture_args())
        .args(["--group", "Asistente de Venta"])
        .assert()
        .success()
        .stdout(contains("  ROSA VEGA"))
        .stdout(contains("  ANA PEREZ").not());
}

#[test]
fn custom_config_changes_segments() {
    let workspace = TestWorkspace::new();
    let config = workspace.write(
        "salesboard.yaml",
        "segments:\n  - label: Planta\n    marker: planta\n",
    );
    salesboard()
        .arg("report")
        .args(fixture_args())
        .args(["--config", config.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("## Planta"))
        .stdout(contains("## TECNICO").not());
}

#[test]
fn tab_delimited_input_is_detected_by_extension() {
    let workspace = TestWorkspace::new();
    let tsv = workspace.write(
        "ventas.tsv",
        "Fecha\tVendedor\tDistrito\n2024-03-01\tana\tlima\n2024-03-02\tluis\tlima\n",
    );
    salesboard()
        .args(["report", "-i", tsv.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("2024-03"))
        .stdout(contains("LIMA"));
}

#[test]
fn config_prints_default_yaml() {
    salesboard()
        .arg("config")
        .assert()
        .success()
        .stdout(contains("contains: FECHA"))
        .stdout(contains("marker: TECNIC"));
}
