//! Core data types for the workout timer.
//!
//! This module defines the data structures used for:
//! - Workout definitions (ordered phase lists) with validation
//! - Session phase and state snapshots published to observers
//! - The persisted record shapes accepted when loading workouts

pub mod error;

use serde::{Deserialize, Serialize};

pub use error::ValidationError;

/// Minimum length of the exercise and rest intervals of the
/// exercise/rest shorthand.
pub const MIN_INTERVAL_SECONDS: u32 = 3;

/// Name of the exercise phase created by [`WorkoutDefinition::interval`].
pub const EXERCISE_PHASE_NAME: &str = "Exercise";

/// Name of the rest phase created by [`WorkoutDefinition::interval`].
pub const REST_PHASE_NAME: &str = "Rest";

/// Name reported while the preparation countdown runs.
pub const PREPARE_PHASE_NAME: &str = "Prepare";

// ============================================================================
// PhaseKind
// ============================================================================

/// Whether a phase is worked or rested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    /// Active work
    #[default]
    Exercise,
    /// Recovery between exercise phases
    Rest,
}

impl PhaseKind {
    /// Returns the string representation of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseKind::Exercise => "exercise",
            PhaseKind::Rest => "rest",
        }
    }

    /// Returns the session phase reported while a phase of this kind runs.
    pub fn session_phase(&self) -> SessionPhase {
        match self {
            PhaseKind::Exercise => SessionPhase::Exercising,
            PhaseKind::Rest => SessionPhase::Resting,
        }
    }
}

// ============================================================================
// PhaseSpec
// ============================================================================

/// A named countdown segment of a workout set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseSpec {
    /// Display name, also spoken when the phase begins
    pub name: String,
    /// Length of the phase in seconds
    #[serde(alias = "duration")]
    pub duration_seconds: u32,
    /// Exercise or rest
    #[serde(default)]
    pub kind: PhaseKind,
}

impl PhaseSpec {
    /// Creates a new phase.
    pub fn new(name: impl Into<String>, duration_seconds: u32, kind: PhaseKind) -> Self {
        Self {
            name: name.into(),
            duration_seconds,
            kind,
        }
    }

    /// Creates the standard exercise phase.
    pub fn exercise(duration_seconds: u32) -> Self {
        Self::new(EXERCISE_PHASE_NAME, duration_seconds, PhaseKind::Exercise)
    }

    /// Creates the standard rest phase.
    pub fn rest(duration_seconds: u32) -> Self {
        Self::new(REST_PHASE_NAME, duration_seconds, PhaseKind::Rest)
    }

    /// Returns true if this is a rest phase.
    pub fn is_rest(&self) -> bool {
        self.kind == PhaseKind::Rest
    }
}

// ============================================================================
// WorkoutDefinition
// ============================================================================

/// A named workout: `total_sets` passes over an ordered list of phases.
///
/// The exercise/rest pair is represented as the two-phase list
/// `[Exercise, Rest]`; see [`WorkoutDefinition::interval`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "WorkoutRecord")]
pub struct WorkoutDefinition {
    /// Workout name (non-empty)
    pub name: String,
    /// Number of sets (at least 1)
    pub total_sets: u32,
    /// Phases run in order within every set
    pub phases: Vec<PhaseSpec>,
}

impl WorkoutDefinition {
    /// Creates a workout from a phase list without validating it.
    pub fn new(name: impl Into<String>, total_sets: u32, phases: Vec<PhaseSpec>) -> Self {
        Self {
            name: name.into(),
            total_sets,
            phases,
        }
    }

    /// Creates an exercise/rest interval workout.
    ///
    /// # Errors
    ///
    /// Returns an error if either interval is shorter than
    /// [`MIN_INTERVAL_SECONDS`] or the resulting workout is invalid.
    pub fn interval(
        name: impl Into<String>,
        total_sets: u32,
        exercise_seconds: u32,
        rest_seconds: u32,
    ) -> Result<Self, ValidationError> {
        if exercise_seconds < MIN_INTERVAL_SECONDS {
            return Err(ValidationError::IntervalTooShort {
                field: "運動時間",
                value: exercise_seconds,
                min: MIN_INTERVAL_SECONDS,
            });
        }
        if rest_seconds < MIN_INTERVAL_SECONDS {
            return Err(ValidationError::IntervalTooShort {
                field: "休憩時間",
                value: rest_seconds,
                min: MIN_INTERVAL_SECONDS,
            });
        }

        let workout = Self::new(
            name,
            total_sets,
            vec![
                PhaseSpec::exercise(exercise_seconds),
                PhaseSpec::rest(rest_seconds),
            ],
        );
        workout.validate()?;
        Ok(workout)
    }

    /// Validates the workout.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.total_sets == 0 {
            return Err(ValidationError::ZeroSets);
        }
        if self.phases.is_empty() {
            return Err(ValidationError::NoPhases);
        }
        if let Some(phase) = self.phases.iter().find(|p| p.duration_seconds == 0) {
            return Err(ValidationError::NonPositiveDuration(phase.name.clone()));
        }
        if self.last_exercise_index().is_none() {
            return Err(ValidationError::NoExercisePhase);
        }
        Ok(())
    }

    /// Returns the index of the last exercise phase in a set.
    pub fn last_exercise_index(&self) -> Option<usize> {
        self.phases.iter().rposition(|p| !p.is_rest())
    }

    /// Returns the exercise/rest durations if this is a plain interval workout,
    /// i.e. exactly the two phases built by [`WorkoutDefinition::interval`].
    pub fn as_interval(&self) -> Option<(u32, u32)> {
        match self.phases.as_slice() {
            [exercise, rest]
                if exercise.kind == PhaseKind::Exercise
                    && exercise.name == EXERCISE_PHASE_NAME
                    && rest.kind == PhaseKind::Rest
                    && rest.name == REST_PHASE_NAME =>
            {
                Some((exercise.duration_seconds, rest.duration_seconds))
            }
            _ => None,
        }
    }

    /// Returns the number of seconds a full session takes, including the
    /// preparation countdown.
    ///
    /// The final set stops after its last exercise phase, so trailing rest
    /// phases are only counted `total_sets - 1` times.
    pub fn total_seconds(&self, prep_seconds: u32) -> u64 {
        let set_seconds: u64 = self
            .phases
            .iter()
            .map(|p| u64::from(p.duration_seconds))
            .sum();
        let last_set_seconds: u64 = match self.last_exercise_index() {
            Some(last) => self.phases[..=last]
                .iter()
                .map(|p| u64::from(p.duration_seconds))
                .sum(),
            None => 0,
        };
        let full_sets = u64::from(self.total_sets.saturating_sub(1));

        u64::from(prep_seconds) + full_sets * set_seconds + last_set_seconds
    }
}

/// Workout shapes accepted when deserializing.
///
/// Besides the canonical phase list this also reads the exercise/rest
/// objects written by earlier versions (`sets`, `exerciseTime`, `restTime`).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WorkoutRecord {
    Phased {
        name: String,
        #[serde(rename = "totalSets", alias = "sets")]
        total_sets: u32,
        phases: Vec<PhaseRecord>,
    },
    Interval {
        name: String,
        #[serde(rename = "totalSets", alias = "sets")]
        total_sets: u32,
        #[serde(rename = "exerciseDurationSeconds", alias = "exerciseTime")]
        exercise_seconds: u32,
        #[serde(rename = "restDurationSeconds", alias = "restTime")]
        rest_seconds: u32,
    },
}

/// A phase inside a phase-list record.
///
/// Phases written by earlier versions carry no `kind`; there a phase named
/// "Rest" is a rest phase and anything else is exercise.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PhaseRecord {
    name: String,
    #[serde(alias = "duration")]
    duration_seconds: u32,
    kind: Option<PhaseKind>,
}

impl From<PhaseRecord> for PhaseSpec {
    fn from(record: PhaseRecord) -> Self {
        let kind = record.kind.unwrap_or_else(|| {
            if record.name.trim().eq_ignore_ascii_case(REST_PHASE_NAME) {
                PhaseKind::Rest
            } else {
                PhaseKind::Exercise
            }
        });
        Self::new(record.name, record.duration_seconds, kind)
    }
}

impl TryFrom<WorkoutRecord> for WorkoutDefinition {
    type Error = ValidationError;

    fn try_from(record: WorkoutRecord) -> Result<Self, Self::Error> {
        match record {
            WorkoutRecord::Phased {
                name,
                total_sets,
                phases,
            } => {
                let phases = phases.into_iter().map(PhaseSpec::from).collect();
                let workout = Self::new(name, total_sets, phases);
                workout.validate()?;
                Ok(workout)
            }
            WorkoutRecord::Interval {
                name,
                total_sets,
                exercise_seconds,
                rest_seconds,
            } => Self::interval(name, total_sets, exercise_seconds, rest_seconds),
        }
    }
}

// ============================================================================
// SessionPhase
// ============================================================================

/// Represents the current phase of a workout session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Preparation countdown before the first set
    #[default]
    Preparing,
    /// An exercise phase is running
    Exercising,
    /// A rest phase is running
    Resting,
    /// All sets are done
    Completed,
}

impl SessionPhase {
    /// Returns the string representation of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::Preparing => "preparing",
            SessionPhase::Exercising => "exercising",
            SessionPhase::Resting => "resting",
            SessionPhase::Completed => "completed",
        }
    }

    /// Returns true while the countdown still has work to do.
    pub fn is_active(&self) -> bool {
        !matches!(self, SessionPhase::Completed)
    }
}

// ============================================================================
// SessionState
// ============================================================================

/// Snapshot of a running session, as published to observers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    /// Current set, 1-indexed. `total_sets + 1` once completed.
    pub current_set: u32,
    /// Number of sets in the workout
    pub total_sets: u32,
    /// Current phase of the session
    pub current_phase: SessionPhase,
    /// Name of the running phase ("Prepare" during preparation)
    pub phase_name: String,
    /// Seconds left in the current phase
    pub time_left_seconds: u32,
    /// Whether ticking is suspended
    pub paused: bool,
}

impl SessionState {
    /// Creates the initial state: set 1, preparing.
    pub fn new(total_sets: u32, prep_seconds: u32) -> Self {
        Self {
            current_set: 1,
            total_sets,
            current_phase: SessionPhase::Preparing,
            phase_name: PREPARE_PHASE_NAME.to_string(),
            time_left_seconds: prep_seconds,
            paused: false,
        }
    }

    /// Returns true once the session has finished all sets.
    pub fn is_completed(&self) -> bool {
        self.current_phase == SessionPhase::Completed
    }

    /// Returns true if the countdown is advancing.
    pub fn is_running(&self) -> bool {
        !self.paused && self.current_phase.is_active()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ------------------------------------------------------------------------
    // PhaseKind / SessionPhase Tests
    // ------------------------------------------------------------------------

    mod phase_tests {
        use super::*;

        #[test]
        fn test_phase_kind_default_is_exercise() {
            assert_eq!(PhaseKind::default(), PhaseKind::Exercise);
        }

        #[test]
        fn test_phase_kind_session_phase() {
            assert_eq!(
                PhaseKind::Exercise.session_phase(),
                SessionPhase::Exercising
            );
            assert_eq!(PhaseKind::Rest.session_phase(), SessionPhase::Resting);
        }

        #[test]
        fn test_session_phase_as_str() {
            assert_eq!(SessionPhase::Preparing.as_str(), "preparing");
            assert_eq!(SessionPhase::Exercising.as_str(), "exercising");
            assert_eq!(SessionPhase::Resting.as_str(), "resting");
            assert_eq!(SessionPhase::Completed.as_str(), "completed");
        }

        #[test]
        fn test_session_phase_is_active() {
            assert!(SessionPhase::Preparing.is_active());
            assert!(SessionPhase::Exercising.is_active());
            assert!(SessionPhase::Resting.is_active());
            assert!(!SessionPhase::Completed.is_active());
        }

        #[test]
        fn test_session_phase_serialize() {
            let json = serde_json::to_string(&SessionPhase::Resting).unwrap();
            assert_eq!(json, "\"resting\"");
        }
    }

    // ------------------------------------------------------------------------
    // WorkoutDefinition Tests
    // ------------------------------------------------------------------------

    mod workout_definition_tests {
        use super::*;

        #[test]
        fn test_interval_builds_two_phases() {
            let workout = WorkoutDefinition::interval("HIIT", 3, 30, 10).unwrap();
            assert_eq!(workout.phases.len(), 2);
            assert_eq!(workout.phases[0], PhaseSpec::exercise(30));
            assert_eq!(workout.phases[1], PhaseSpec::rest(10));
            assert_eq!(workout.as_interval(), Some((30, 10)));
        }

        #[test]
        fn test_interval_minimum_boundary() {
            assert!(WorkoutDefinition::interval("x", 1, 3, 3).is_ok());
            assert!(matches!(
                WorkoutDefinition::interval("x", 1, 2, 3),
                Err(ValidationError::IntervalTooShort { value: 2, .. })
            ));
            assert!(matches!(
                WorkoutDefinition::interval("x", 1, 3, 0),
                Err(ValidationError::IntervalTooShort { value: 0, .. })
            ));
        }

        #[test]
        fn test_validate_zero_sets() {
            let result = WorkoutDefinition::interval("x", 0, 30, 10);
            assert_eq!(result, Err(ValidationError::ZeroSets));
        }

        #[test]
        fn test_validate_empty_name() {
            let workout = WorkoutDefinition::new("  ", 1, vec![PhaseSpec::exercise(5)]);
            assert_eq!(workout.validate(), Err(ValidationError::EmptyName));
        }

        #[test]
        fn test_validate_no_phases() {
            let workout = WorkoutDefinition::new("x", 1, vec![]);
            assert_eq!(workout.validate(), Err(ValidationError::NoPhases));
        }

        #[test]
        fn test_validate_zero_duration_phase() {
            let workout = WorkoutDefinition::new(
                "x",
                1,
                vec![
                    PhaseSpec::exercise(5),
                    PhaseSpec::new("Stretch", 0, PhaseKind::Rest),
                ],
            );
            assert_eq!(
                workout.validate(),
                Err(ValidationError::NonPositiveDuration("Stretch".to_string()))
            );
        }

        #[test]
        fn test_validate_rest_only() {
            let workout = WorkoutDefinition::new("x", 2, vec![PhaseSpec::rest(5)]);
            assert_eq!(workout.validate(), Err(ValidationError::NoExercisePhase));
        }

        #[test]
        fn test_phase_list_allows_short_phases() {
            let workout = WorkoutDefinition::new(
                "x",
                1,
                vec![PhaseSpec::new("Jump", 1, PhaseKind::Exercise)],
            );
            assert!(workout.validate().is_ok());
            assert_eq!(workout.as_interval(), None);
        }

        #[test]
        fn test_named_exercise_rest_pair_is_not_an_interval() {
            let workout = WorkoutDefinition::new(
                "Legs",
                3,
                vec![
                    PhaseSpec::new("Squats", 40, PhaseKind::Exercise),
                    PhaseSpec::new("Breathe", 15, PhaseKind::Rest),
                ],
            );
            assert_eq!(workout.as_interval(), None);

            let renamed_rest = WorkoutDefinition::new(
                "Run",
                2,
                vec![
                    PhaseSpec::exercise(30),
                    PhaseSpec::new("Walk", 10, PhaseKind::Rest),
                ],
            );
            assert_eq!(renamed_rest.as_interval(), None);
        }

        #[test]
        fn test_total_seconds_interval() {
            let workout = WorkoutDefinition::interval("x", 2, 3, 3).unwrap();
            // 5 prep + 2 * 3 exercise + 1 * 3 rest
            assert_eq!(workout.total_seconds(5), 14);
        }

        #[test]
        fn test_total_seconds_single_set() {
            let workout = WorkoutDefinition::interval("x", 1, 30, 10).unwrap();
            assert_eq!(workout.total_seconds(5), 35);
        }

        #[test]
        fn test_total_seconds_phase_list() {
            let workout = WorkoutDefinition::new(
                "circuit",
                3,
                vec![
                    PhaseSpec::new("Warm-up walk", 4, PhaseKind::Rest),
                    PhaseSpec::new("Squats", 20, PhaseKind::Exercise),
                    PhaseSpec::new("Push-ups", 15, PhaseKind::Exercise),
                    PhaseSpec::new("Breathe", 10, PhaseKind::Rest),
                ],
            );
            // 2 full sets of 49s + final set without trailing rest (39s)
            assert_eq!(workout.total_seconds(5), 5 + 2 * 49 + 39);
        }
    }

    // ------------------------------------------------------------------------
    // Serialization Tests
    // ------------------------------------------------------------------------

    mod serialization_tests {
        use super::*;

        #[test]
        fn test_serialize_canonical_shape() {
            let workout = WorkoutDefinition::interval("HIIT", 3, 30, 10).unwrap();
            let json = serde_json::to_value(&workout).unwrap();

            assert_eq!(json["name"], "HIIT");
            assert_eq!(json["totalSets"], 3);
            assert_eq!(json["phases"][0]["name"], "Exercise");
            assert_eq!(json["phases"][0]["durationSeconds"], 30);
            assert_eq!(json["phases"][1]["kind"], "rest");
        }

        #[test]
        fn test_deserialize_legacy_interval_record() {
            let json = r#"{"name":"Legacy","sets":3,"exerciseTime":30,"restTime":10}"#;
            let workout: WorkoutDefinition = serde_json::from_str(json).unwrap();
            assert_eq!(workout, WorkoutDefinition::interval("Legacy", 3, 30, 10).unwrap());
        }

        #[test]
        fn test_deserialize_legacy_phase_record() {
            let json = r#"{"name":"Phases","sets":2,"phases":[{"name":"Run","duration":60},{"name":"Walk","duration":30,"kind":"rest"}]}"#;
            let workout: WorkoutDefinition = serde_json::from_str(json).unwrap();

            assert_eq!(workout.total_sets, 2);
            assert_eq!(workout.phases[0].kind, PhaseKind::Exercise);
            assert_eq!(workout.phases[0].duration_seconds, 60);
            assert_eq!(workout.phases[1].kind, PhaseKind::Rest);
        }

        #[test]
        fn test_deserialize_phase_named_rest_without_kind() {
            let json = r#"{"name":"Run","sets":2,"phases":[
                {"name":"Run","duration":5},
                {"name":"Rest","duration":5}
            ]}"#;
            let workout: WorkoutDefinition = serde_json::from_str(json).unwrap();

            assert_eq!(workout.phases[0].kind, PhaseKind::Exercise);
            assert_eq!(workout.phases[1].kind, PhaseKind::Rest);
            assert_eq!(workout.phases[1].kind.session_phase(), SessionPhase::Resting);
            // The last set skips the trailing rest
            assert_eq!(workout.total_seconds(5), 5 + 10 + 5);
        }

        #[test]
        fn test_deserialize_explicit_kind_wins_over_name() {
            let json = r#"{"name":"Odd","totalSets":1,"phases":[
                {"name":"Rest","durationSeconds":5,"kind":"exercise"}
            ]}"#;
            let workout: WorkoutDefinition = serde_json::from_str(json).unwrap();
            assert_eq!(workout.phases[0].kind, PhaseKind::Exercise);
        }

        #[test]
        fn test_deserialize_rejects_invalid_workout() {
            let json = r#"{"name":"Bad","totalSets":0,"phases":[{"name":"Run","durationSeconds":60}]}"#;
            let result: Result<WorkoutDefinition, _> = serde_json::from_str(json);
            assert!(result.is_err());
        }

        #[test]
        fn test_canonical_shape_reads_back() {
            let workout = WorkoutDefinition::interval("HIIT", 3, 30, 10).unwrap();
            let json = serde_json::to_string(&workout).unwrap();
            let parsed: WorkoutDefinition = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, workout);
        }
    }

    // ------------------------------------------------------------------------
    // SessionState Tests
    // ------------------------------------------------------------------------

    mod session_state_tests {
        use super::*;

        #[test]
        fn test_new_state() {
            let state = SessionState::new(4, 5);
            assert_eq!(state.current_set, 1);
            assert_eq!(state.total_sets, 4);
            assert_eq!(state.current_phase, SessionPhase::Preparing);
            assert_eq!(state.phase_name, PREPARE_PHASE_NAME);
            assert_eq!(state.time_left_seconds, 5);
            assert!(!state.paused);
            assert!(state.is_running());
            assert!(!state.is_completed());
        }

        #[test]
        fn test_paused_state_is_not_running() {
            let mut state = SessionState::new(1, 5);
            state.paused = true;
            assert!(!state.is_running());
        }

        #[test]
        fn test_serialize_camel_case() {
            let state = SessionState::new(2, 5);
            let json = serde_json::to_value(&state).unwrap();
            assert_eq!(json["currentSet"], 1);
            assert_eq!(json["currentPhase"], "preparing");
            assert_eq!(json["timeLeftSeconds"], 5);
        }
    }
}
