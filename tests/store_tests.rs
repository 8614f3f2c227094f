//! Integration tests for the file-backed workout store.
//!
//! These tests verify:
//! - Saved workouts survive across store instances
//! - The on-disk layout of `workouts.json`
//! - Records written by older versions are still listed
//! - A file that is not a workout array is reported as an error
//! - Entries this version cannot read survive every rewrite of the file

use std::fs;

use serde_json::{json, Value};

use workout_timer::config::{TimerConfig, CONFIG_FILE_NAME};
use workout_timer::store::WORKOUTS_KEY;
use workout_timer::{
    FileStore, KeyValueStore, PhaseKind, PhaseSpec, StoreError, WorkoutDefinition, WorkoutLibrary,
};

fn tabata() -> WorkoutDefinition {
    WorkoutDefinition::interval("Tabata", 8, 20, 10).unwrap()
}

fn legs() -> WorkoutDefinition {
    WorkoutDefinition::new(
        "Legs",
        3,
        vec![
            PhaseSpec::new("Squats", 40, PhaseKind::Exercise),
            PhaseSpec::new("Breathe", 15, PhaseKind::Rest),
            PhaseSpec::new("Lunges", 30, PhaseKind::Exercise),
        ],
    )
}

#[test]
fn workouts_persist_across_instances() {
    let dir = tempfile::tempdir().unwrap();

    {
        let library = WorkoutLibrary::new(FileStore::new(dir.path()));
        assert_eq!(library.add(tabata()).unwrap(), 0);
        assert_eq!(library.add(legs()).unwrap(), 1);
    }

    let library = WorkoutLibrary::new(FileStore::new(dir.path()));
    assert_eq!(library.list().unwrap(), vec![tabata(), legs()]);
    assert_eq!(library.find("LEGS").unwrap(), Some(legs()));
}

#[test]
fn data_directory_is_created_on_first_write() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("a").join("b");
    let library = WorkoutLibrary::new(FileStore::new(&nested));

    assert!(library.list().unwrap().is_empty());
    assert!(!nested.exists());

    library.add(tabata()).unwrap();
    assert!(nested.join("workouts.json").exists());
    assert!(!nested.join("workouts.json.tmp").exists());
}

#[test]
fn file_layout_is_a_json_array() {
    let dir = tempfile::tempdir().unwrap();
    let library = WorkoutLibrary::new(FileStore::new(dir.path()));
    library.add(legs()).unwrap();

    let raw = fs::read_to_string(dir.path().join("workouts.json")).unwrap();
    let value: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        value,
        json!([{
            "name": "Legs",
            "totalSets": 3,
            "phases": [
                {"name": "Squats", "durationSeconds": 40, "kind": "exercise"},
                {"name": "Breathe", "durationSeconds": 15, "kind": "rest"},
                {"name": "Lunges", "durationSeconds": 30, "kind": "exercise"}
            ]
        }])
    );
}

#[test]
fn update_and_remove_rewrite_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let library = WorkoutLibrary::new(FileStore::new(dir.path()));
    library.add(tabata()).unwrap();
    library.add(legs()).unwrap();

    let harder = WorkoutDefinition::interval("Tabata", 10, 30, 10).unwrap();
    library.update(0, harder.clone()).unwrap();
    assert_eq!(library.remove(1).unwrap(), legs());

    let reopened = WorkoutLibrary::new(FileStore::new(dir.path()));
    assert_eq!(reopened.list().unwrap(), vec![harder]);

    let err = reopened.remove(3).unwrap_err();
    assert!(matches!(err, StoreError::IndexOutOfRange { index: 3, len: 1 }));
}

#[test]
fn legacy_records_written_by_hand_are_listed() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("workouts.json"),
        r#"[
            {"name": "Morning", "sets": 4, "exerciseTime": 45, "restTime": 15},
            {"name": "Core", "sets": 2, "phases": [
                {"name": "Plank", "duration": 60},
                {"name": "Side Plank", "duration": 30}
            ]}
        ]"#,
    )
    .unwrap();

    let workouts = WorkoutLibrary::new(FileStore::new(dir.path())).list().unwrap();
    assert_eq!(workouts.len(), 2);
    assert_eq!(workouts[0].total_sets, 4);
    assert_eq!(workouts[0].as_interval(), Some((45, 15)));
    assert_eq!(workouts[1].phases.len(), 2);
}

#[test]
fn unreadable_entries_survive_a_write() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("workouts.json"),
        r#"[
            {"name": "Draft", "sets": 3, "phases": []},
            {"name": "Legacy", "sets": 2, "exerciseTime": 30, "restTime": 10}
        ]"#,
    )
    .unwrap();

    let library = WorkoutLibrary::new(FileStore::new(dir.path()));
    assert_eq!(library.add(tabata()).unwrap(), 1);

    let raw = fs::read_to_string(dir.path().join("workouts.json")).unwrap();
    let value: Value = serde_json::from_str(&raw).unwrap();
    let entries = value.as_array().unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0], json!({"name": "Draft", "sets": 3, "phases": []}));
    assert_eq!(entries[2]["name"], "Tabata");

    let names: Vec<String> = library.list().unwrap().into_iter().map(|w| w.name).collect();
    assert_eq!(names, vec!["Legacy", "Tabata"]);
}

#[test]
fn corrupt_file_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("workouts.json"), "{ not json").unwrap();

    let err = WorkoutLibrary::new(FileStore::new(dir.path()))
        .list()
        .unwrap_err();
    assert!(matches!(err, StoreError::Parse(_)));
}

#[test]
fn raw_key_value_access() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());

    assert_eq!(store.get(WORKOUTS_KEY).unwrap(), None);
    store.set("settings", &json!({"volume": 3})).unwrap();
    assert_eq!(store.get("settings").unwrap(), Some(json!({"volume": 3})));
    assert!(matches!(
        store.set("../escape", &json!(1)),
        Err(StoreError::InvalidKey(_))
    ));
}

#[test]
fn config_file_next_to_workouts() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join(CONFIG_FILE_NAME),
        r#"{"prep_seconds": 10, "speech_enabled": false}"#,
    )
    .unwrap();

    let config = TimerConfig::load(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
    assert_eq!(config.prep_seconds, 10);
    assert!(!config.speech_enabled);
    assert_eq!(config.countdown_beeps, TimerConfig::default().countdown_beeps);

    fs::write(dir.path().join(CONFIG_FILE_NAME), r#"{"prep_seconds": 0}"#).unwrap();
    assert!(TimerConfig::load(&dir.path().join(CONFIG_FILE_NAME)).is_err());
}
