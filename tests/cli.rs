use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn cli_shows_help() {
    let mut cmd = Command::cargo_bin("geolingua").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("geolingua"))
        .stdout(predicate::str::contains("reach"));
}

#[test]
fn reach_for_builtin_languages() {
    let mut cmd = Command::cargo_bin("geolingua").unwrap();
    cmd.args(["reach", "-l", "english,spanish"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Total speakers: 2,059,000,000 (2.1B)"))
        .stdout(predicate::str::contains("Countries: 19"));
}

#[test]
fn unknown_language_is_warned_about_not_fatal() {
    let mut cmd = Command::cargo_bin("geolingua").unwrap();
    cmd.args(["reach", "-l", "klingon"]);
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("klingon"))
        .stdout(predicate::str::contains("Global coverage: 0.0%"));
}

#[test]
fn languages_search_and_locale() {
    let mut cmd = Command::cargo_bin("geolingua").unwrap();
    cmd.args(["languages", "--search", "port", "--locale", "de"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("portuguese"))
        .stdout(predicate::str::contains("260.000.000"))
        .stdout(predicate::str::contains("english").not());
}

#[test]
fn countries_grouped_by_region() {
    let mut cmd = Command::cargo_bin("geolingua").unwrap();
    cmd.args(["countries", "-l", "portuguese", "--regions"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("South America (1)"))
        .stdout(predicate::str::contains("Africa (2)"));
}

#[test]
fn report_and_geojson_files_are_written() {
    let dir = tempdir().unwrap();
    let report = dir.path().join("report.json");
    let geojson = dir.path().join("map.geojson");

    Command::cargo_bin("geolingua")
        .unwrap()
        .args(["report", "-l", "mandarin;french", "--out"])
        .arg(&report)
        .assert()
        .success();
    let v: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(v["languages"].as_array().unwrap().len(), 2);
    assert!(v["generatedAt"].is_string());
    assert!(v["breakdown"].is_array());

    Command::cargo_bin("geolingua")
        .unwrap()
        .args(["heatmap", "-l", "french", "--geojson"])
        .arg(&geojson)
        .assert()
        .success()
        .stdout(predicate::str::contains("FR"));
    assert!(geojson.exists());
}

#[test]
fn missing_catalog_file_fails() {
    let mut cmd = Command::cargo_bin("geolingua").unwrap();
    cmd.args(["--catalog", "/no/such/catalog.json", "languages"]);
    cmd.assert().failure();
}

#[test]
fn heatmap_can_use_catalog_colors() {
    let mut cmd = Command::cargo_bin("geolingua").unwrap();
    cmd.args(["heatmap", "-l", "french", "--catalog-colors"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("color=language-french"))
        .stdout(predicate::str::contains("fill=#"));
}

#[test]
fn world_population_override() {
    let mut cmd = Command::cargo_bin("geolingua").unwrap();
    cmd.args(["reach", "-l", "spanish", "--world-population", "1000"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Global coverage: 100.0%"));
}
