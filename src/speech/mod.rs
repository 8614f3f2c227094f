//! Spoken phase announcements.
//!
//! A session announces every transition ("Exercise", "Rest", "Workout
//! complete"). Announcements are fire-and-forget: they never block the
//! countdown, and a failure only produces a log line.

mod command;
mod error;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

pub use command::{find_program_in, find_speech_command, CommandSpeech, SPEECH_COMMANDS};
pub use error::SpeechError;

/// Trait for speech synthesizers.
pub trait SpeechBackend {
    /// Queues `text` for announcement and returns immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if the announcement could not be started.
    fn speak(&self, text: &str) -> Result<(), SpeechError>;

    /// Cancels announcements that have not finished yet.
    fn stop(&self);
}

/// Mock speech backend for testing.
#[derive(Debug, Default)]
pub struct MockSpeechBackend {
    phrases: Mutex<Vec<String>>,
    stop_count: AtomicUsize,
    should_fail: AtomicBool,
}

impl MockSpeechBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    /// Returns every phrase spoken so far.
    #[must_use]
    pub fn phrases(&self) -> Vec<String> {
        self.phrases.lock().unwrap().clone()
    }

    #[must_use]
    pub fn speak_count(&self) -> usize {
        self.phrases.lock().unwrap().len()
    }

    #[must_use]
    pub fn stop_count(&self) -> usize {
        self.stop_count.load(Ordering::SeqCst)
    }
}

impl SpeechBackend for MockSpeechBackend {
    fn speak(&self, text: &str) -> Result<(), SpeechError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(SpeechError::SpawnFailed(
                "mock".to_string(),
                "Mock failure".to_string(),
            ));
        }
        self.phrases.lock().unwrap().push(text.to_string());
        Ok(())
    }

    fn stop(&self) {
        self.stop_count.fetch_add(1, Ordering::SeqCst);
    }
}
