//! Phase state machine.
//!
//! `PhaseMachine` owns the countdown of one session. It is advanced one
//! second at a time and returns the cues each second calls for; it never
//! performs a side effect itself, so timing and dispatch can be tested
//! separately.
//!
//! A phase of `n` seconds lasts exactly `n` ticks: the tick that finds one
//! second left does not count down to zero but enters the next phase with
//! its full duration.

use crate::types::{
    PhaseKind, SessionPhase, SessionState, ValidationError, WorkoutDefinition,
    EXERCISE_PHASE_NAME, REST_PHASE_NAME,
};

/// Title of the per-second progress notification.
pub const PROGRESS_TITLE: &str = "Workout Progress";

/// Title of the phase-change notifications.
pub const TRANSITION_TITLE: &str = "Workout";

/// Phrase spoken when the last set is done.
pub const COMPLETION_PHRASE: &str = "Workout complete";

/// Phase name reported once the session is complete.
pub const COMPLETED_PHASE_NAME: &str = "Completed";

/// A side effect requested by the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cue {
    /// Play the countdown tone
    Tone,
    /// Announce a phrase
    Speak(String),
    /// Post or update the progress notification
    Notify { title: String, body: String },
}

impl Cue {
    fn notify(title: &str, body: impl Into<String>) -> Self {
        Self::Notify {
            title: title.to_string(),
            body: body.into(),
        }
    }
}

/// A phase change that happened on a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Phase that ended
    pub from: SessionPhase,
    /// Phase that began
    pub to: SessionPhase,
    /// Set after the transition (`total_sets + 1` on completion)
    pub set: u32,
    /// Phrase announced for the new phase
    pub phrase: String,
}

/// Result of one elapsed second.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickOutcome {
    /// 1-based number of the tick within the session
    pub tick: u64,
    /// Cues to dispatch, in order
    pub cues: Vec<Cue>,
    /// Set if the tick changed the phase
    pub transition: Option<Transition>,
}

impl TickOutcome {
    /// Returns true if the outcome carries a tone cue.
    #[must_use]
    pub fn has_tone(&self) -> bool {
        self.cues.contains(&Cue::Tone)
    }
}

/// The countdown state machine of one session.
#[derive(Debug, Clone)]
pub struct PhaseMachine {
    workout: WorkoutDefinition,
    countdown_beeps: u32,
    state: SessionState,
    /// Index into `workout.phases`; None while preparing or completed
    phase_index: Option<usize>,
    /// Index of the last exercise phase of a set
    last_exercise: usize,
    ticks: u64,
}

impl PhaseMachine {
    /// Creates a machine in the preparation phase.
    ///
    /// A preparation time of zero is raised to one second so the first
    /// phase is still announced on a tick.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if the workout is invalid.
    pub fn new(
        workout: WorkoutDefinition,
        prep_seconds: u32,
        countdown_beeps: u32,
    ) -> Result<Self, ValidationError> {
        workout.validate()?;
        let last_exercise = workout
            .last_exercise_index()
            .ok_or(ValidationError::NoExercisePhase)?;
        let state = SessionState::new(workout.total_sets, prep_seconds.max(1));

        Ok(Self {
            workout,
            countdown_beeps,
            state,
            phase_index: None,
            last_exercise,
            ticks: 0,
        })
    }

    /// Returns the current state snapshot.
    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Returns the workout being run.
    #[must_use]
    pub fn workout(&self) -> &WorkoutDefinition {
        &self.workout
    }

    /// Returns the number of ticks processed so far.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Returns true once all sets are done.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.state.is_completed()
    }

    /// Suspends or resumes the countdown.
    ///
    /// Returns true if the paused flag changed. A completed machine cannot
    /// be paused.
    pub fn set_paused(&mut self, paused: bool) -> bool {
        if self.is_completed() || self.state.paused == paused {
            return false;
        }
        self.state.paused = paused;
        true
    }

    /// Advances the countdown by `delta_seconds` ticks.
    ///
    /// Stops early on completion. A paused machine does not advance.
    pub fn advance(&mut self, delta_seconds: u32) -> Vec<TickOutcome> {
        (0..delta_seconds).map_while(|_| self.tick()).collect()
    }

    /// Advances the countdown by one second.
    ///
    /// Returns None if the machine is paused or completed.
    pub fn tick(&mut self) -> Option<TickOutcome> {
        if !self.state.is_running() {
            return None;
        }

        self.ticks += 1;
        let left = self.state.time_left_seconds;

        if left <= 1 {
            let transition = self.enter_next_phase();
            let body = self.transition_body();
            let cues = vec![
                Cue::Tone,
                Cue::Speak(transition.phrase.clone()),
                Cue::notify(TRANSITION_TITLE, body),
            ];
            return Some(TickOutcome {
                tick: self.ticks,
                cues,
                transition: Some(transition),
            });
        }

        self.state.time_left_seconds = left - 1;

        let mut cues = Vec::with_capacity(2);
        if left <= self.countdown_beeps {
            cues.push(Cue::Tone);
        }
        cues.push(Cue::notify(
            PROGRESS_TITLE,
            format!(
                "Set: {} / {}, Time Left: {}s",
                self.state.current_set, self.state.total_sets, self.state.time_left_seconds
            ),
        ));

        Some(TickOutcome {
            tick: self.ticks,
            cues,
            transition: None,
        })
    }

    /// Picks the phase that follows the current one and enters it.
    fn enter_next_phase(&mut self) -> Transition {
        let from = self.state.current_phase;
        let set = self.state.current_set;
        let last_set = set >= self.workout.total_sets;

        let next = match self.phase_index {
            None => Some((0, set)),
            // The final set skips the rest phases after its last exercise
            Some(index) if last_set && index >= self.last_exercise => None,
            Some(index) if index + 1 < self.workout.phases.len() => Some((index + 1, set)),
            Some(_) => Some((0, set + 1)),
        };

        match next {
            Some((index, set)) => {
                let phase = &self.workout.phases[index];
                self.phase_index = Some(index);
                self.state.current_set = set;
                self.state.current_phase = phase.kind.session_phase();
                self.state.phase_name = phase.name.clone();
                self.state.time_left_seconds = phase.duration_seconds;

                Transition {
                    from,
                    to: self.state.current_phase,
                    set,
                    phrase: phase.name.clone(),
                }
            }
            None => {
                self.phase_index = None;
                self.state.current_set = self.workout.total_sets + 1;
                self.state.current_phase = SessionPhase::Completed;
                self.state.phase_name = COMPLETED_PHASE_NAME.to_string();
                self.state.time_left_seconds = 0;
                self.state.paused = false;

                Transition {
                    from,
                    to: SessionPhase::Completed,
                    set: self.state.current_set,
                    phrase: COMPLETION_PHRASE.to_string(),
                }
            }
        }
    }

    /// Notification body for the phase just entered.
    fn transition_body(&self) -> String {
        let Some(phase) = self.phase_index.map(|i| &self.workout.phases[i]) else {
            return "Workout complete!".to_string();
        };

        let (default_name, call) = match phase.kind {
            PhaseKind::Exercise => (EXERCISE_PHASE_NAME, "Time to exercise!"),
            PhaseKind::Rest => (REST_PHASE_NAME, "Time to rest!"),
        };
        if phase.name == default_name {
            call.to_string()
        } else {
            format!("{} - {}", phase.name, call)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
