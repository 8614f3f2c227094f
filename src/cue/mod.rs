//! Cue dispatch.
//!
//! `CueDispatcher` turns the cues of a tick into calls on the audio, speech
//! and notification backends. Every backend is optional and every failure
//! is logged; dispatch never fails the countdown.

use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::notification::{NotificationBackend, PROGRESS_NOTIFICATION_ID};
use crate::session::{Cue, TickOutcome};
use crate::sound::ToneHandle;
use crate::speech::SpeechBackend;

/// Routes cues to the backends of one session.
pub struct CueDispatcher {
    tone: Option<Box<dyn ToneHandle>>,
    speech: Option<Rc<dyn SpeechBackend>>,
    notifier: Option<Rc<dyn NotificationBackend>>,
    /// Tick of the last tone, so a tick plays at most one
    last_tone_tick: Option<u64>,
}

impl CueDispatcher {
    /// Creates a dispatcher. A missing backend disables its cue; without a
    /// notifier, progress is written to the log.
    #[must_use]
    pub fn new(
        tone: Option<Box<dyn ToneHandle>>,
        speech: Option<Rc<dyn SpeechBackend>>,
        notifier: Option<Rc<dyn NotificationBackend>>,
    ) -> Self {
        Self {
            tone,
            speech,
            notifier,
            last_tone_tick: None,
        }
    }

    /// Creates a dispatcher with every cue disabled.
    #[must_use]
    pub fn silent() -> Self {
        Self::new(None, None, None)
    }

    /// Dispatches the cues of `outcome` in order.
    pub fn dispatch(&mut self, outcome: &TickOutcome) {
        for cue in &outcome.cues {
            match cue {
                Cue::Tone => {
                    self.play_tone(outcome.tick);
                }
                Cue::Speak(phrase) => self.speak(phrase),
                Cue::Notify { title, body } => self.post_or_update_notification(title, body),
            }
        }
    }

    /// Plays the tone for `tick`.
    ///
    /// Returns true if the tone was started; a second call for the same tick
    /// is ignored.
    pub fn play_tone(&mut self, tick: u64) -> bool {
        if self.last_tone_tick == Some(tick) {
            debug!("Tone already played on tick {}", tick);
            return false;
        }
        self.last_tone_tick = Some(tick);

        let Some(tone) = self.tone.as_mut() else {
            return false;
        };
        match tone.play_from_start() {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to play tone: {}", e);
                false
            }
        }
    }

    /// Announces `phrase`. Failures are logged.
    pub fn speak(&self, phrase: &str) {
        let Some(speech) = &self.speech else {
            return;
        };
        if let Err(e) = speech.speak(phrase) {
            warn!("Failed to announce '{}': {} ({})", phrase, e, e.suggestion());
        }
    }

    /// Updates the single progress notification, or logs the progress when
    /// no notifier is available.
    pub fn post_or_update_notification(&self, title: &str, body: &str) {
        match &self.notifier {
            Some(notifier) => {
                if let Err(e) = notifier.post_or_update(PROGRESS_NOTIFICATION_ID, title, body) {
                    warn!("Failed to update notification: {}", e);
                }
            }
            None => info!("{}: {}", title, body),
        }
    }

    /// Releases the tone handle. Further tones are silently skipped.
    pub fn release(&mut self) {
        if let Some(mut tone) = self.tone.take() {
            tone.release();
            debug!("Tone handle released");
        }
    }

    /// Cancels pending announcements and removes the notification.
    pub fn cancel(&self) {
        if let Some(speech) = &self.speech {
            speech.stop();
        }
        if let Some(notifier) = &self.notifier {
            notifier.cancel_all();
        }
    }

    /// Returns true while a tone handle is held.
    #[must_use]
    pub fn has_tone(&self) -> bool {
        self.tone.is_some()
    }

    /// Returns true if progress goes to a notification backend.
    #[must_use]
    pub fn has_notifier(&self) -> bool {
        self.notifier.is_some()
    }
}

impl Drop for CueDispatcher {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for CueDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CueDispatcher")
            .field("tone", &self.tone.is_some())
            .field("speech", &self.speech.is_some())
            .field("notifier", &self.notifier.is_some())
            .field("last_tone_tick", &self.last_tone_tick)
            .finish()
    }
}
