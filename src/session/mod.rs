//! Workout sessions.
//!
//! This module provides:
//! - [`PhaseMachine`]: the side-effect free countdown state machine
//! - [`SessionController`]: validates a workout and wires a new
//!   [`Session`] to the audio, speech and notification backends
//! - [`Session`]: one run of a workout, driven by a one-second scheduler
//! - [`SessionHandle`]: a cloneable handle for pause/resume/exit commands
//!
//! # Example
//!
//! ```rust,no_run
//! use std::rc::Rc;
//! use workout_timer::config::TimerConfig;
//! use workout_timer::session::{SessionController, SessionOutcome};
//! use workout_timer::sound::RodioAudioBackend;
//! use workout_timer::types::WorkoutDefinition;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let controller = SessionController::new(TimerConfig::default(), Rc::new(RodioAudioBackend::new()));
//! let workout = WorkoutDefinition::interval("HIIT", 4, 20, 10)?;
//!
//! let session = controller.start(&workout)?;
//! let handle = session.handle();
//! # let _ = handle;
//! assert_eq!(session.run().await, SessionOutcome::Completed);
//! # Ok(())
//! # }
//! ```

mod controller;
pub mod error;
pub mod machine;

use tokio::sync::mpsc;
use uuid::Uuid;

pub use self::controller::{Session, SessionController};
pub use self::error::SessionError;
pub use self::machine::{Cue, PhaseMachine, TickOutcome, Transition};

use crate::types::SessionState;

// ============================================================================
// SessionEvent
// ============================================================================

/// Lifecycle events emitted by a session, in the order they happen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The session was created
    Started {
        /// Session identifier
        session_id: Uuid,
        /// Name of the workout being run
        workout_name: String,
    },
    /// The phase changed on a tick
    PhaseChanged(Transition),
    /// One second elapsed
    Tick {
        /// Tick number within the session
        tick: u64,
        /// State after the tick
        state: SessionState,
    },
    /// The countdown was suspended
    Paused,
    /// The countdown was resumed
    Resumed,
    /// All sets are done
    Completed,
    /// The user left the session
    Exited,
}

// ============================================================================
// SessionCommand / SessionHandle
// ============================================================================

/// Commands accepted by a running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    Pause,
    Resume,
    Exit,
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The countdown reached the end of the last set
    Completed,
    /// The session was exited before completing
    Exited,
}

/// Cloneable handle that sends commands to a session.
///
/// Handles are `Send`, so input can be read on another task or thread.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::UnboundedSender<SessionCommand>,
}

impl SessionHandle {
    pub(crate) fn new(tx: mpsc::UnboundedSender<SessionCommand>) -> Self {
        Self { tx }
    }

    /// Sends a command.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Closed` if the session has been dropped.
    pub fn send(&self, command: SessionCommand) -> Result<(), SessionError> {
        self.tx.send(command).map_err(|_| SessionError::Closed)
    }

    /// Requests a pause.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Closed` if the session has been dropped.
    pub fn pause(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::Pause)
    }

    /// Requests a resume.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Closed` if the session has been dropped.
    pub fn resume(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::Resume)
    }

    /// Requests an exit.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Closed` if the session has been dropped.
    pub fn exit(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::Exit)
    }

    /// Returns true once the session has been dropped.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
