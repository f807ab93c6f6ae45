#![cfg(feature = "cli")]

use assert_cmd::Command;
use predicates::str::contains as str_contains;
use std::fs;
use tempfile::{NamedTempFile, tempdir};
use wechselplan::{
    Assignment, ClassPlan, Period, PlanMetadata, Semester, Student, Week, save_plan_to_json,
};

fn write_sample_plan() -> NamedTempFile {
    let students = vec![
        Student::new(1, "Anna", "Albers").in_group(1),
        Student::new(2, "Ben", "Brandt").in_group(2),
        Student::new(3, "Cem", "Celik"),
    ];
    let mut plan = ClassPlan::from_roster(PlanMetadata::new(9, "BFS 12c"), &students, 2);
    plan.assignments = vec![
        Assignment::new(1, "Keller", Period::Am).with_subject("Holz"),
        Assignment::new(2, "Lorenz", Period::Am).with_subject("Metall"),
        Assignment::new(3, "Nowak", Period::Pm),
    ];
    plan.turns.insert(
        "TURNUS1",
        vec![Week::new("KW36", "02.09.24"), Week::new("KW37", "09.09.24")],
    );
    plan.turns.insert("TURNUS2", vec![Week::holiday("KW44", "28.10.24")]);
    plan.grades.record(1, 1, Semester::First, Some(2.0)).unwrap();
    plan.grades.record(1, 2, Semester::First, Some(3.5)).unwrap();

    let file = NamedTempFile::new().expect("create temp file");
    save_plan_to_json(&plan, file.path()).expect("save plan");
    file
}

#[allow(deprecated)]
fn run_cli(plan: &NamedTempFile, args: &[&str]) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("wechselplan").expect("cli binary");
    cmd.arg("--plan").arg(plan.path()).args(args).assert()
}

#[test]
fn cli_prints_rotation_overview() {
    let plan = write_sample_plan();
    run_cli(&plan, &["overview"])
        .success()
        .stdout(str_contains("class=BFS 12c"))
        .stdout(str_contains("Keller"))
        .stdout(str_contains("Gruppe 2"));
}

#[test]
fn cli_lists_turn_windows_with_empty_marker() {
    let plan = write_sample_plan();
    run_cli(&plan, &["turns", "--on", "2024-09-10"])
        .success()
        .stdout(str_contains("02.09.24 – 09.09.24"))
        .stdout(str_contains("TURNUS1 *"))
        .stdout(str_contains("—"));
}

#[test]
fn cli_shows_group_schedule() {
    let plan = write_sample_plan();
    run_cli(&plan, &["group", "2"])
        .success()
        .stdout(str_contains("Gruppe 2 (1 students)"))
        .stdout(str_contains("Lorenz"));
    run_cli(&plan, &["group", "5"])
        .success()
        .stdout(str_contains("Group 5 not found."));
}

#[test]
fn cli_prints_rounded_averages() {
    let plan = write_sample_plan();
    run_cli(&plan, &["averages"])
        .success()
        .stdout(str_contains("Albers, Anna"))
        .stdout(str_contains("2.8"))
        .stdout(str_contains("Celik, Cem"));
}

#[test]
fn cli_exports_csv() {
    let plan = write_sample_plan();
    let dir = tempdir().unwrap();
    let out = dir.path().join("plan.csv");
    run_cli(&plan, &["export", out.to_str().unwrap()])
        .success()
        .stdout(str_contains("Rotation grid written to"));
    let csv = fs::read_to_string(&out).unwrap();
    assert!(csv.starts_with("period,position,teacher"));
    assert!(csv.contains("AM,1,Keller,Holz,,1,2"));
}

#[test]
fn cli_reports_invalid_plan() {
    let file = NamedTempFile::new().unwrap();
    fs::write(
        file.path(),
        r#"{ "metadata": { "class_id": 1, "class_name": "X", "school_year": "2024/25" },
             "groups": [ { "id": 2 } ] }"#,
    )
    .unwrap();
    run_cli(&file, &["validate"])
        .failure()
        .stderr(str_contains("group 1 is missing"));
}

#[test]
fn cli_validates_good_plan() {
    let plan = write_sample_plan();
    run_cli(&plan, &["validate"])
        .success()
        .stdout(str_contains("Plan for class 'BFS 12c' is valid (2 groups, 2 turns)."));
}
