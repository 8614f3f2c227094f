//! Session controller and the session run loop.

use std::rc::Rc;

use tokio::sync::{mpsc, watch};
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::error::SessionError;
use super::machine::{PhaseMachine, TickOutcome};
use super::{SessionCommand, SessionEvent, SessionHandle, SessionOutcome};
use crate::config::TimerConfig;
use crate::cue::CueDispatcher;
use crate::notification::{NotificationBackend, NotificationError, PermissionStatus};
use crate::sound::{try_load_tone, AudioBackend, ToneSource};
use crate::speech::SpeechBackend;
use crate::types::{SessionState, WorkoutDefinition};

/// Scheduler period.
const TICK_PERIOD: Duration = Duration::from_secs(1);

// ============================================================================
// SessionController
// ============================================================================

/// Starts sessions and hands each one its backends.
pub struct SessionController {
    config: TimerConfig,
    audio: Rc<dyn AudioBackend>,
    speech: Option<Rc<dyn SpeechBackend>>,
    notifier: Option<Rc<dyn NotificationBackend>>,
}

impl SessionController {
    /// Creates a controller without speech or notifications.
    #[must_use]
    pub fn new(config: TimerConfig, audio: Rc<dyn AudioBackend>) -> Self {
        Self {
            config,
            audio,
            speech: None,
            notifier: None,
        }
    }

    /// Announces phases with `speech`.
    #[must_use]
    pub fn with_speech(mut self, speech: Rc<dyn SpeechBackend>) -> Self {
        self.speech = Some(speech);
        self
    }

    /// Reports progress through `notifier`.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Rc<dyn NotificationBackend>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Returns the configuration sessions are started with.
    #[must_use]
    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    /// Starts a session for `workout`.
    ///
    /// The workout is validated before anything is acquired. On success the
    /// session holds its own tone handle and is ready to [`Session::run`].
    /// Audio and notification problems are logged and only disable their
    /// cue.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Validation` if the workout is invalid.
    pub fn start(&self, workout: &WorkoutDefinition) -> Result<Session, SessionError> {
        let machine = PhaseMachine::new(
            workout.clone(),
            self.config.prep_seconds,
            self.config.countdown_beeps,
        )?;

        let tone = if self.config.sound_enabled {
            try_load_tone(self.audio.as_ref(), &ToneSource::from_config(&self.config))
        } else {
            None
        };

        let speech = if self.config.speech_enabled {
            self.speech.clone()
        } else {
            None
        };

        let notifier = if self.config.notifications_enabled {
            self.notifier.clone().filter(|notifier| {
                match notifier.request_permission() {
                    PermissionStatus::Granted => true,
                    PermissionStatus::Denied => {
                        let e = NotificationError::PermissionDenied;
                        warn!("{}: progress is logged instead ({})", e, e.suggestion());
                        false
                    }
                }
            })
        } else {
            None
        };

        let session = Session::new(machine, CueDispatcher::new(tone, speech, notifier));
        info!(
            "Session {} started: '{}' ({} sets, {}s)",
            session.id(),
            workout.name,
            workout.total_sets,
            workout.total_seconds(self.config.prep_seconds)
        );
        Ok(session)
    }
}

// ============================================================================
// Session
// ============================================================================

/// One run of a workout.
///
/// A session is driven either by [`Session::run`] (a one-second scheduler
/// that also serves [`SessionHandle`] commands) or by calling
/// [`Session::tick`] directly. State snapshots are published through
/// [`Session::subscribe`] after the cues of a tick have been dispatched.
pub struct Session {
    id: Uuid,
    machine: PhaseMachine,
    dispatcher: CueDispatcher,
    state_tx: watch::Sender<SessionState>,
    event_tx: mpsc::UnboundedSender<SessionEvent>,
    event_rx: Option<mpsc::UnboundedReceiver<SessionEvent>>,
    command_tx: mpsc::UnboundedSender<SessionCommand>,
    command_rx: mpsc::UnboundedReceiver<SessionCommand>,
    exited: bool,
}

impl Session {
    fn new(machine: PhaseMachine, dispatcher: CueDispatcher) -> Self {
        let id = Uuid::new_v4();
        let (state_tx, _) = watch::channel(machine.state().clone());
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (command_tx, command_rx) = mpsc::unbounded_channel();

        let session = Self {
            id,
            machine,
            dispatcher,
            state_tx,
            event_tx,
            event_rx: Some(event_rx),
            command_tx,
            command_rx,
            exited: false,
        };
        session.emit(SessionEvent::Started {
            session_id: id,
            workout_name: session.machine.workout().name.clone(),
        });
        session
    }

    /// Returns the session identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the workout being run.
    #[must_use]
    pub fn workout(&self) -> &WorkoutDefinition {
        self.machine.workout()
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> &SessionState {
        self.machine.state()
    }

    /// Returns a receiver of state snapshots.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    /// Takes the event stream. Only the first call returns it.
    pub fn take_events(&mut self) -> Option<mpsc::UnboundedReceiver<SessionEvent>> {
        self.event_rx.take()
    }

    /// Returns a command handle for this session.
    #[must_use]
    pub fn handle(&self) -> SessionHandle {
        SessionHandle::new(self.command_tx.clone())
    }

    /// Returns true while the countdown is suspended.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.machine.state().paused
    }

    /// Returns true if the session was exited.
    #[must_use]
    pub fn is_exited(&self) -> bool {
        self.exited
    }

    /// Returns true once the session completed or was exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.exited || self.machine.is_completed()
    }

    /// Returns how the session ended, if it has.
    #[must_use]
    pub fn outcome(&self) -> Option<SessionOutcome> {
        if self.exited {
            Some(SessionOutcome::Exited)
        } else if self.machine.is_completed() {
            Some(SessionOutcome::Completed)
        } else {
            None
        }
    }

    /// Returns true while a tone handle is held.
    #[must_use]
    pub fn holds_audio(&self) -> bool {
        self.dispatcher.has_tone()
    }

    /// Suspends the countdown. Returns false if it was already paused or
    /// the session is finished.
    pub fn pause(&mut self) -> bool {
        if self.exited || !self.machine.set_paused(true) {
            return false;
        }
        info!("Session paused ({}s left)", self.state().time_left_seconds);
        self.publish();
        self.emit(SessionEvent::Paused);
        true
    }

    /// Resumes the countdown from where it stopped. Returns false if it was
    /// not paused or the session is finished.
    pub fn resume(&mut self) -> bool {
        if self.exited || !self.machine.set_paused(false) {
            return false;
        }
        info!("Session resumed ({}s left)", self.state().time_left_seconds);
        self.publish();
        self.emit(SessionEvent::Resumed);
        true
    }

    /// Leaves the session.
    ///
    /// Releases the tone handle, cancels pending announcements and removes
    /// the notification. Safe to call in any state; later calls do nothing.
    pub fn exit(&mut self) {
        if self.exited {
            return;
        }
        self.exited = true;
        self.dispatcher.release();
        self.dispatcher.cancel();
        info!(
            "Session {} exited at set {}/{}",
            self.id,
            self.state().current_set,
            self.state().total_sets
        );
        self.publish();
        self.emit(SessionEvent::Exited);
    }

    /// Applies a command.
    pub fn apply(&mut self, command: SessionCommand) {
        debug!("Session command: {:?}", command);
        match command {
            SessionCommand::Pause => {
                self.pause();
            }
            SessionCommand::Resume => {
                self.resume();
            }
            SessionCommand::Exit => self.exit(),
        }
    }

    /// Processes one elapsed second.
    ///
    /// Cues are dispatched before the new state is published. Returns None
    /// if the session is paused or finished.
    pub fn tick(&mut self) -> Option<TickOutcome> {
        if self.exited {
            return None;
        }
        let outcome = self.machine.tick()?;

        self.dispatcher.dispatch(&outcome);
        self.publish();

        if let Some(transition) = &outcome.transition {
            debug!(
                "Tick {}: {} -> {} (set {})",
                outcome.tick,
                transition.from.as_str(),
                transition.to.as_str(),
                transition.set
            );
            self.emit(SessionEvent::PhaseChanged(transition.clone()));
        }
        self.emit(SessionEvent::Tick {
            tick: outcome.tick,
            state: self.state().clone(),
        });

        if self.machine.is_completed() {
            self.dispatcher.release();
            info!("Session {} completed after {} ticks", self.id, outcome.tick);
            self.emit(SessionEvent::Completed);
        }

        Some(outcome)
    }

    /// Runs the scheduler until the session completes or is exited.
    ///
    /// Ticks arrive once per second while unpaused; commands sent through a
    /// [`SessionHandle`] are handled between ticks. Resuming restarts the
    /// one-second period. Ticks missed while the process was suspended are
    /// delivered back to back.
    pub async fn run(mut self) -> SessionOutcome {
        let mut ticker = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);

        loop {
            if let Some(outcome) = self.outcome() {
                return outcome;
            }

            let paused = self.is_paused();
            tokio::select! {
                Some(command) = self.command_rx.recv() => {
                    self.apply(command);
                    if paused && !self.is_paused() {
                        ticker.reset();
                    }
                }
                _ = ticker.tick(), if !paused => {
                    self.tick();
                }
            }
        }
    }

    fn publish(&self) {
        self.state_tx.send_replace(self.machine.state().clone());
    }

    fn emit(&self, event: SessionEvent) {
        // The receiver may have been dropped by the host
        let _ = self.event_tx.send(event);
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.dispatcher.release();
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("state", self.machine.state())
            .field("exited", &self.exited)
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
