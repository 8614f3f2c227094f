//! Countdown tone playback.
//!
//! This module provides the audio side of the cue system:
//!
//! - Tone loading from a synthesized beep or an audio file
//! - Restartable, non-overlapping playback through a per-session handle
//! - Graceful degradation when audio is unavailable
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐  load_tone   ┌──────────────────┐
//! │   AudioBackend   │─────────────▶│    ToneHandle    │
//! └──────────────────┘              │ play_from_start  │
//!                                   │ release          │
//!                                   └──────────────────┘
//! ```
//!
//! A session loads its tone once, replays it from the start on every cue
//! and releases it on every exit path.
//!
//! # Usage
//!
//! ```rust,no_run
//! use workout_timer::sound::{AudioBackend, RodioAudioBackend, ToneSource};
//!
//! let backend = RodioAudioBackend::new();
//! let mut tone = backend.load_tone(&ToneSource::default()).expect("audio init");
//! tone.play_from_start().expect("playback failed");
//! tone.release();
//! ```

mod error;
mod player;
mod source;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::warn;

pub use error::SoundError;
pub use player::{RodioAudioBackend, RodioToneHandle};
pub use source::{ToneSource, DEFAULT_TONE_DURATION_MS, DEFAULT_TONE_FREQUENCY_HZ};

/// Trait for audio backends that can load a tone.
pub trait AudioBackend {
    /// Loads `source` and acquires whatever device resources playback needs.
    ///
    /// # Errors
    ///
    /// Returns an error if the tone or the output device is unavailable.
    fn load_tone(&self, source: &ToneSource) -> Result<Box<dyn ToneHandle>, SoundError>;
}

/// A loaded tone owned by one session.
pub trait ToneHandle {
    /// Plays the tone from its beginning, cutting off a playback still in
    /// progress.
    ///
    /// # Errors
    ///
    /// Returns an error if playback fails or the handle was released.
    fn play_from_start(&mut self) -> Result<(), SoundError>;

    /// Releases the device resources. Calling it again is a no-op.
    fn release(&mut self);

    /// Returns true once `release` has been called.
    fn is_released(&self) -> bool;
}

/// Loads a tone, returning None if audio is unavailable.
///
/// If loading fails, a warning is logged and the caller continues silently.
#[must_use]
pub fn try_load_tone(
    backend: &dyn AudioBackend,
    source: &ToneSource,
) -> Option<Box<dyn ToneHandle>> {
    match backend.load_tone(source) {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!("Audio not available, tones disabled: {} ({})", e, e.suggestion());
            None
        }
    }
}

// ============================================================================
// Mock
// ============================================================================

#[derive(Debug, Default)]
struct MockToneCounters {
    plays: AtomicUsize,
    releases: AtomicUsize,
    live_handles: AtomicUsize,
    should_fail_play: AtomicBool,
}

/// Mock audio backend for testing.
///
/// Counts loads, plays and releases across every handle it hands out.
#[derive(Debug, Default)]
pub struct MockAudioBackend {
    loads: AtomicUsize,
    sources: std::sync::Mutex<Vec<ToneSource>>,
    should_fail_load: AtomicBool,
    counters: Arc<MockToneCounters>,
}

impl MockAudioBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail_load(&self, should_fail: bool) {
        self.should_fail_load.store(should_fail, Ordering::SeqCst);
    }

    pub fn set_should_fail_play(&self, should_fail: bool) {
        self.counters
            .should_fail_play
            .store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn play_count(&self) -> usize {
        self.counters.plays.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn release_count(&self) -> usize {
        self.counters.releases.load(Ordering::SeqCst)
    }

    /// Number of handles loaded and not yet released.
    #[must_use]
    pub fn live_handles(&self) -> usize {
        self.counters.live_handles.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn loaded_sources(&self) -> Vec<ToneSource> {
        self.sources.lock().unwrap().clone()
    }
}

impl AudioBackend for MockAudioBackend {
    fn load_tone(&self, source: &ToneSource) -> Result<Box<dyn ToneHandle>, SoundError> {
        if self.should_fail_load.load(Ordering::SeqCst) {
            return Err(SoundError::DeviceNotAvailable("Mock failure".to_string()));
        }
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.sources.lock().unwrap().push(source.clone());
        self.counters.live_handles.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockToneHandle {
            counters: Arc::clone(&self.counters),
            released: false,
        }))
    }
}

#[derive(Debug)]
struct MockToneHandle {
    counters: Arc<MockToneCounters>,
    released: bool,
}

impl ToneHandle for MockToneHandle {
    fn play_from_start(&mut self) -> Result<(), SoundError> {
        if self.released {
            return Err(SoundError::PlaybackError("tone handle was released".to_string()));
        }
        if self.counters.should_fail_play.load(Ordering::SeqCst) {
            return Err(SoundError::PlaybackError("Mock failure".to_string()));
        }
        self.counters.plays.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.counters.releases.fetch_add(1, Ordering::SeqCst);
            self.counters.live_handles.fetch_sub(1, Ordering::SeqCst);
        }
    }

    fn is_released(&self) -> bool {
        self.released
    }
}
