use wechselplan::persistence::PersistenceError;
use wechselplan::{
    Assignment, ClassPlan, DirectoryPlanStore, Period, PlanMetadata, PlanStore, Semester, Student,
    Week, export_overview_to_csv, load_plan_from_json, save_plan_to_json, write_overview_csv,
};
use std::fs;
use tempfile::{NamedTempFile, tempdir};

fn build_sample_plan(class_id: i64) -> ClassPlan {
    let students = vec![
        Student::new(1, "Anna", "Albers").in_group(1),
        Student::new(2, "Ben", "Brandt").in_group(2),
    ];
    let mut plan = ClassPlan::from_roster(PlanMetadata::new(class_id, "BFS 10"), &students, 2);
    plan.metadata.department = Some("Holztechnik".into());
    plan.assignments = vec![
        Assignment::new(7, "Keller", Period::Am)
            .with_subject("Holz")
            .with_room("W1")
            .with_learning_content("Zinken"),
        Assignment::new(8, "Lorenz", Period::Am).with_subject("Metall"),
        Assignment::new(9, "Nowak", Period::Pm).with_subject("Deutsch"),
    ];
    plan.turns.insert(
        "TURNUS1",
        vec![Week::new("KW36", "02.09.24"), Week::holiday("KW37", "09.09.24")],
    );
    plan.turns.insert("TURNUS2", vec![Week::new("KW40", "30.09.24")]);
    plan.grades.record(1, 7, Semester::First, Some(1.5)).unwrap();
    plan.grades.record(2, 9, Semester::Second, Some(4.5)).unwrap();
    plan
}

#[test]
fn json_round_trip_preserves_plan() {
    let plan = build_sample_plan(1);
    let file = NamedTempFile::new().unwrap();

    save_plan_to_json(&plan, file.path()).unwrap();
    let loaded = load_plan_from_json(file.path()).unwrap();

    assert_eq!(loaded, plan);
    assert_eq!(loaded.overview(), plan.overview());
}

#[test]
fn loading_rejects_invalid_grades() {
    let json = r#"{
        "metadata": { "class_id": 3, "class_name": "X", "school_year": "2024/25" },
        "groups": [ { "id": 1 } ],
        "assignments": [ { "teacher_id": 1, "teacher_name": "A", "period": "AM" } ],
        "turns": { "TURNUS1": [ { "label": "KW36", "date": "02.09.24" } ] },
        "grades": { "1": { "1": { "first": 2.3 } } }
    }"#;
    let file = NamedTempFile::new().unwrap();
    fs::write(file.path(), json).unwrap();

    match load_plan_from_json(file.path()) {
        Err(PersistenceError::InvalidData(message)) => assert!(message.contains("2.3")),
        other => panic!("expected invalid data, got {other:?}"),
    }
}

#[test]
fn loading_accepts_minimal_snapshot_with_defaults() {
    let json = r#"{
        "metadata": { "class_id": 4, "class_name": "Y", "school_year": "2025/26" },
        "groups": [ { "id": 2 }, { "id": 1 } ],
        "assignments": [
            { "teacher_id": 1, "teacher_name": "A", "period": "AM" },
            { "teacher_id": 2, "teacher_name": "B", "period": "am" }
        ]
    }"#;
    let file = NamedTempFile::new().unwrap();
    fs::write(file.path(), json).unwrap();

    let plan = load_plan_from_json(file.path()).unwrap();
    assert!(plan.turns.is_empty());
    assert!(plan.grades.is_empty());
    assert_eq!(plan.group_for(Period::Am, 0, 0).map(|g| g.id), Some(2));
    assert_eq!(plan.group_for(Period::Am, 0, 1).map(|g| g.id), Some(1));
}

#[test]
fn loading_tolerates_blank_and_unparseable_week_dates() {
    let json = r#"{
        "metadata": { "class_id": 6, "class_name": "Z", "school_year": "2024/25" },
        "groups": [ { "id": 1 } ],
        "assignments": [ { "teacher_id": 1, "teacher_name": "A", "period": "AM" } ],
        "turns": { "TURNUS1": [
            { "label": "KW36", "date": "02.09.24" },
            { "label": "KW37", "date": "" },
            { "label": "KW38", "date": "tbd" }
        ] }
    }"#;
    let file = NamedTempFile::new().unwrap();
    fs::write(file.path(), json).unwrap();

    let plan = load_plan_from_json(file.path()).unwrap();
    assert!(plan.validate().is_ok());
    let turns = plan.ordered_turns();
    assert_eq!(turns.len(), 1);
    assert_eq!(turns[0].window.week_count, 3);
    assert_eq!(turns[0].window.label(), "02.09.24");
}

#[test]
fn malformed_json_is_a_serialization_error() {
    let file = NamedTempFile::new().unwrap();
    fs::write(file.path(), "{ not json").unwrap();
    assert!(matches!(
        load_plan_from_json(file.path()),
        Err(PersistenceError::Serialization(_))
    ));
}

#[test]
fn csv_export_has_one_row_per_teacher_and_one_column_per_turn() {
    let plan = build_sample_plan(1);
    let overview = plan.overview();

    let mut buffer = Vec::new();
    write_overview_csv(&overview, &mut buffer).unwrap();
    let text = String::from_utf8(buffer).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(
        lines[0],
        "period,position,teacher,subject,room,TURNUS1 (02.09.24),TURNUS2 (30.09.24)"
    );
    assert_eq!(lines[1], "AM,1,Keller,Holz,W1,1,2");
    assert_eq!(lines[2], "AM,2,Lorenz,Metall,,2,1");
    assert_eq!(lines[3], "PM,1,Nowak,Deutsch,,1,2");
    assert_eq!(lines.len(), 4);

    let file = NamedTempFile::new().unwrap();
    export_overview_to_csv(&overview, file.path()).unwrap();
    assert_eq!(fs::read_to_string(file.path()).unwrap(), text);
}

#[test]
fn directory_store_saves_and_lists_plans() {
    let dir = tempdir().unwrap();
    let store = DirectoryPlanStore::new(dir.path().join("plans")).unwrap();

    assert!(store.load_plan(5).unwrap().is_none());
    assert!(store.list_class_ids().unwrap().is_empty());

    store.save_plan(&build_sample_plan(12)).unwrap();
    store.save_plan(&build_sample_plan(5)).unwrap();
    fs::write(store.root().join("notes.txt"), "ignored").unwrap();

    assert_eq!(store.list_class_ids().unwrap(), vec![5, 12]);
    let loaded = store.load_plan(12).unwrap().unwrap();
    assert_eq!(loaded, build_sample_plan(12));
}

#[test]
fn directory_store_refuses_invalid_plans() {
    let dir = tempdir().unwrap();
    let store = DirectoryPlanStore::new(dir.path()).unwrap();
    let mut plan = build_sample_plan(1);
    plan.assignments.push(Assignment::new(7, "Keller", Period::Am));

    assert!(matches!(
        store.save_plan(&plan),
        Err(PersistenceError::InvalidData(_))
    ));
    assert!(store.load_plan(1).unwrap().is_none());
}
