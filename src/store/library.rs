//! The saved workout list.

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use super::error::{Result, StoreError};
use super::KeyValueStore;
use crate::types::WorkoutDefinition;

/// Store key holding the workout array.
pub const WORKOUTS_KEY: &str = "workouts";

/// Ordered list of saved workouts on top of a [`KeyValueStore`].
///
/// Entries are addressed by their position in the list, which is also the
/// order shown to the user.
#[derive(Debug)]
pub struct WorkoutLibrary<S> {
    store: S,
}

impl<S: KeyValueStore> WorkoutLibrary<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns every saved workout.
    ///
    /// Entries that fail to parse or validate are skipped with a warning so
    /// one bad record does not hide the rest. They stay in the store and
    /// do not count towards list positions.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or the value is not an
    /// array.
    pub fn list(&self) -> Result<Vec<WorkoutDefinition>> {
        let workouts = self
            .entries()?
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| match WorkoutDefinition::deserialize(entry) {
                Ok(workout) => Some(workout),
                Err(e) => {
                    warn!("Skipping saved workout #{}: {}", index, e);
                    None
                }
            })
            .collect();
        Ok(workouts)
    }

    /// Appends `workout` and returns its position.
    ///
    /// # Errors
    ///
    /// Returns an error if the workout is invalid or cannot be stored.
    pub fn add(&self, workout: WorkoutDefinition) -> Result<usize> {
        workout.validate()?;
        let mut entries = self.entries()?;
        let position = readable_slots(&entries).len();
        entries.push(to_entry(&workout)?);
        self.save(entries)?;
        Ok(position)
    }

    /// Replaces the workout at `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of range, the workout is invalid,
    /// or the list cannot be stored.
    pub fn update(&self, index: usize, workout: WorkoutDefinition) -> Result<()> {
        workout.validate()?;
        let mut entries = self.entries()?;
        let slot = locate(&entries, index)?;
        entries[slot] = to_entry(&workout)?;
        self.save(entries)
    }

    /// Removes and returns the workout at `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of range or the list cannot be
    /// stored.
    pub fn remove(&self, index: usize) -> Result<WorkoutDefinition> {
        let mut entries = self.entries()?;
        let slot = locate(&entries, index)?;
        let entry = entries.remove(slot);
        let removed = WorkoutDefinition::deserialize(&entry).map_err(StoreError::Parse)?;
        self.save(entries)?;
        Ok(removed)
    }

    /// Finds a workout by name, ignoring case. The first match wins.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn find(&self, name: &str) -> Result<Option<WorkoutDefinition>> {
        let needle = name.to_lowercase();
        Ok(self
            .list()?
            .into_iter()
            .find(|w| w.name.to_lowercase() == needle))
    }

    /// Raw stored entries, readable or not.
    fn entries(&self) -> Result<Vec<Value>> {
        let Some(value) = self.store.get(WORKOUTS_KEY)? else {
            return Ok(Vec::new());
        };
        serde_json::from_value(value).map_err(StoreError::Parse)
    }

    fn save(&self, entries: Vec<Value>) -> Result<()> {
        self.store.set(WORKOUTS_KEY, &Value::Array(entries))
    }
}

/// Positions in `entries` of the readable workouts, in list order.
fn readable_slots(entries: &[Value]) -> Vec<usize> {
    entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| WorkoutDefinition::deserialize(*entry).is_ok())
        .map(|(slot, _)| slot)
        .collect()
}

/// Maps a list position to its slot in `entries`.
fn locate(entries: &[Value], index: usize) -> Result<usize> {
    let slots = readable_slots(entries);
    slots.get(index).copied().ok_or(StoreError::IndexOutOfRange {
        index,
        len: slots.len(),
    })
}

fn to_entry(workout: &WorkoutDefinition) -> Result<Value> {
    serde_json::to_value(workout).map_err(StoreError::Serialize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::types::{PhaseKind, PhaseSpec};
    use serde_json::json;

    fn library() -> WorkoutLibrary<MemoryStore> {
        WorkoutLibrary::new(MemoryStore::new())
    }

    fn hiit() -> WorkoutDefinition {
        WorkoutDefinition::interval("HIIT", 8, 20, 10).unwrap()
    }

    mod crud_tests {
        use super::*;

        #[test]
        fn test_empty_library() {
            assert!(library().list().unwrap().is_empty());
        }

        #[test]
        fn test_add_and_list_keep_order() {
            let lib = library();
            assert_eq!(lib.add(hiit()).unwrap(), 0);
            let plank = WorkoutDefinition::new("Plank", 3, vec![PhaseSpec::exercise(60)]);
            assert_eq!(lib.add(plank.clone()).unwrap(), 1);

            assert_eq!(lib.list().unwrap(), vec![hiit(), plank]);
        }

        #[test]
        fn test_add_rejects_invalid() {
            let lib = library();
            let invalid = WorkoutDefinition::new("", 3, vec![PhaseSpec::exercise(10)]);

            assert!(matches!(lib.add(invalid), Err(StoreError::Validation(_))));
            assert!(lib.list().unwrap().is_empty());
        }

        #[test]
        fn test_update() {
            let lib = library();
            lib.add(hiit()).unwrap();

            let tabata = WorkoutDefinition::interval("Tabata", 8, 20, 10).unwrap();
            lib.update(0, tabata.clone()).unwrap();
            assert_eq!(lib.list().unwrap(), vec![tabata]);

            assert!(matches!(
                lib.update(3, hiit()),
                Err(StoreError::IndexOutOfRange { index: 3, len: 1 })
            ));
        }

        #[test]
        fn test_remove() {
            let lib = library();
            lib.add(hiit()).unwrap();
            let removed = lib.remove(0).unwrap();

            assert_eq!(removed, hiit());
            assert!(lib.list().unwrap().is_empty());
            assert!(matches!(
                lib.remove(0),
                Err(StoreError::IndexOutOfRange { index: 0, len: 0 })
            ));
        }

        #[test]
        fn test_find_ignores_case() {
            let lib = library();
            lib.add(hiit()).unwrap();

            assert_eq!(lib.find("hiit").unwrap(), Some(hiit()));
            assert!(lib.find("yoga").unwrap().is_none());
        }
    }

    mod format_tests {
        use super::*;

        #[test]
        fn test_stored_shape() {
            let lib = library();
            lib.add(hiit()).unwrap();

            let stored = lib.store().get(WORKOUTS_KEY).unwrap().unwrap();
            assert_eq!(
                stored,
                json!([{
                    "name": "HIIT",
                    "totalSets": 8,
                    "phases": [
                        {"name": "Exercise", "durationSeconds": 20, "kind": "exercise"},
                        {"name": "Rest", "durationSeconds": 10, "kind": "rest"}
                    ]
                }])
            );
        }

        #[test]
        fn test_reads_legacy_records() {
            let store = MemoryStore::new();
            store
                .set(
                    WORKOUTS_KEY,
                    &json!([
                        {"name": "Old", "sets": 3, "exerciseTime": 30, "restTime": 15},
                        {"name": "Circuit", "sets": 2, "phases": [
                            {"name": "Squats", "duration": 40},
                            {"name": "Lunges", "duration": 40}
                        ]}
                    ]),
                )
                .unwrap();
            let workouts = WorkoutLibrary::new(store).list().unwrap();

            assert_eq!(workouts.len(), 2);
            assert_eq!(workouts[0].as_interval(), Some((30, 15)));
            assert_eq!(workouts[1].phases[1].name, "Lunges");
            assert_eq!(workouts[1].phases[1].kind, PhaseKind::Exercise);
        }

        #[test]
        fn test_skips_invalid_records() {
            let store = MemoryStore::new();
            store
                .set(
                    WORKOUTS_KEY,
                    &json!([
                        {"name": "Zero", "sets": 0, "exerciseTime": 30, "restTime": 15},
                        {"name": "Good", "sets": 1, "exerciseTime": 30, "restTime": 15},
                        "garbage"
                    ]),
                )
                .unwrap();

            let workouts = WorkoutLibrary::new(store).list().unwrap();
            assert_eq!(workouts.len(), 1);
            assert_eq!(workouts[0].name, "Good");
        }

        #[test]
        fn test_writes_keep_unreadable_records() {
            let store = MemoryStore::new();
            store
                .set(
                    WORKOUTS_KEY,
                    &json!([
                        {"name": "Draft", "sets": 3, "phases": []},
                        {"name": "Old", "sets": 3, "exerciseTime": 30, "restTime": 15},
                        "garbage",
                        {"name": "Core", "sets": 2, "phases": [{"name": "Plank", "duration": 60}]}
                    ]),
                )
                .unwrap();
            let lib = WorkoutLibrary::new(store);

            assert_eq!(lib.add(hiit()).unwrap(), 2);
            lib.update(1, WorkoutDefinition::interval("Core", 4, 20, 10).unwrap())
                .unwrap();
            assert_eq!(lib.remove(0).unwrap().name, "Old");

            let stored = lib.store().get(WORKOUTS_KEY).unwrap().unwrap();
            let stored = stored.as_array().unwrap();
            assert_eq!(stored.len(), 4);
            assert_eq!(stored[0]["name"], "Draft");
            assert_eq!(stored[1], "garbage");
            assert_eq!(stored[2]["totalSets"], 4);
            assert_eq!(stored[3]["name"], "HIIT");

            let names: Vec<String> = lib.list().unwrap().into_iter().map(|w| w.name).collect();
            assert_eq!(names, vec!["Core", "HIIT"]);
        }

        #[test]
        fn test_index_counts_only_readable_records() {
            let store = MemoryStore::new();
            store
                .set(WORKOUTS_KEY, &json!([{"name": "Draft", "sets": 3, "phases": []}]))
                .unwrap();
            let lib = WorkoutLibrary::new(store);

            assert!(matches!(
                lib.remove(0),
                Err(StoreError::IndexOutOfRange { index: 0, len: 0 })
            ));
            assert_eq!(lib.add(hiit()).unwrap(), 0);
        }

        #[test]
        fn test_non_array_value_is_error() {
            let store = MemoryStore::new();
            store.set(WORKOUTS_KEY, &json!({"name": "x"})).unwrap();

            assert!(matches!(
                WorkoutLibrary::new(store).list(),
                Err(StoreError::Parse(_))
            ));
        }
    }
}
