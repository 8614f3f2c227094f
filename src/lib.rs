//! Workout Timer Library
//!
//! This library provides the core functionality for the Workout Timer CLI.
//! It includes:
//! - Phase state machine and session scheduler for interval workouts
//! - Cue dispatch to tone, speech and notification backends
//! - Countdown tone playback via rodio
//! - Spoken phase announcements via the platform speech command
//! - Progress notifications (native on macOS, logged elsewhere)
//! - Local storage of saved workouts
//! - CLI command parsing and display utilities

pub mod cli;
pub mod config;
pub mod cue;
pub mod notification;
pub mod session;
pub mod sound;
pub mod speech;
pub mod store;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    PhaseKind, PhaseSpec, SessionPhase, SessionState, ValidationError, WorkoutDefinition,
};

pub use config::{ConfigError, TimerConfig};

pub use session::{
    Session, SessionCommand, SessionController, SessionError, SessionEvent, SessionHandle,
    SessionOutcome,
};

// Re-export backend traits and their test doubles
pub use notification::{
    MockNotificationBackend, NotificationBackend, NotificationError, PermissionStatus,
};

pub use sound::{
    AudioBackend, MockAudioBackend, RodioAudioBackend, SoundError, ToneHandle, ToneSource,
};

pub use speech::{CommandSpeech, MockSpeechBackend, SpeechBackend, SpeechError};

pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError, WorkoutLibrary};
