//! Runs a workout session in the terminal.
//!
//! This module provides:
//! - Backend wiring from the timer configuration
//! - Keyboard commands read from stdin
//! - Ctrl-C handling
//! - Progress display driven by session events

use std::io::{self, BufRead};
use std::rc::Rc;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, warn};

use crate::cli::display::Display;
use crate::config::TimerConfig;
use crate::notification;
use crate::session::{SessionCommand, SessionController, SessionHandle, SessionOutcome};
use crate::sound::RodioAudioBackend;
use crate::speech::CommandSpeech;
use crate::types::WorkoutDefinition;

// ============================================================================
// Input
// ============================================================================

/// Maps a line typed during a session to a command.
pub fn parse_input(line: &str) -> Option<SessionCommand> {
    match line.trim().to_ascii_lowercase().as_str() {
        "p" | "pause" => Some(SessionCommand::Pause),
        "r" | "resume" => Some(SessionCommand::Resume),
        "q" | "quit" | "exit" => Some(SessionCommand::Exit),
        _ => None,
    }
}

/// Forwards commands typed on stdin to the session.
///
/// Runs on a plain thread so a blocked read never holds up runtime
/// shutdown. The thread ends at end of input or once the session is gone.
fn spawn_input_reader(handle: SessionHandle) {
    let spawned = thread::Builder::new()
        .name("workout-input".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                let Some(command) = parse_input(&line) else {
                    if !line.trim().is_empty() {
                        Display::show_warning(&format!(
                            "不明な操作です: '{}' (p / r / q)",
                            line.trim()
                        ));
                    }
                    continue;
                };
                if handle.send(command).is_err() {
                    break;
                }
            }
            debug!("Input reader finished");
        });

    if let Err(e) = spawned {
        warn!("Failed to start input reader, keyboard controls disabled: {}", e);
    }
}

/// Exits the session on Ctrl-C.
fn spawn_interrupt_handler(handle: SessionHandle) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("Interrupt received");
            let _ = handle.exit();
        }
    });
}

// ============================================================================
// Runner
// ============================================================================

/// Builds a controller with the platform backends enabled in `config`.
///
/// Missing speech commands and notification support are reported once and
/// only disable their cue.
pub fn build_controller(config: &TimerConfig) -> SessionController {
    let mut controller =
        SessionController::new(config.clone(), Rc::new(RodioAudioBackend::new()));

    if config.speech_enabled {
        match CommandSpeech::detect(Duration::from_millis(config.announce_delay_ms)) {
            Ok(speech) => {
                debug!("Speech command: {}", speech.program().display());
                controller = controller.with_speech(Rc::new(speech));
            }
            Err(e) => {
                warn!("Speech disabled: {} ({})", e, e.suggestion());
            }
        }
    }

    if config.notifications_enabled {
        match notification::platform_backend() {
            Some(notifier) => controller = controller.with_notifier(notifier),
            None => debug!("System notifications are not available, progress is logged"),
        }
    }

    controller
}

/// Runs `workout` until it completes, the user quits or Ctrl-C is pressed.
///
/// # Errors
///
/// Returns an error if the workout is invalid.
pub async fn run_workout(
    workout: &WorkoutDefinition,
    config: &TimerConfig,
) -> Result<SessionOutcome> {
    let controller = build_controller(config);
    let mut session = controller.start(workout)?;

    Display::show_session_start(workout, config.prep_seconds);

    let events = session.take_events();
    let state = session.subscribe();
    spawn_input_reader(session.handle());
    spawn_interrupt_handler(session.handle());

    let display = async move {
        if let Some(mut events) = events {
            while let Some(event) = events.recv().await {
                Display::show_event(&event);
            }
        }
    };

    let (outcome, ()) = tokio::join!(session.run(), display);
    Display::show_session_end(outcome, &state.borrow());
    Ok(outcome)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod parse_input_tests {
        use super::*;

        #[test]
        fn test_short_keys() {
            assert_eq!(parse_input("p"), Some(SessionCommand::Pause));
            assert_eq!(parse_input("r"), Some(SessionCommand::Resume));
            assert_eq!(parse_input("q"), Some(SessionCommand::Exit));
        }

        #[test]
        fn test_words_and_case() {
            assert_eq!(parse_input("Pause\n"), Some(SessionCommand::Pause));
            assert_eq!(parse_input("  RESUME "), Some(SessionCommand::Resume));
            assert_eq!(parse_input("exit"), Some(SessionCommand::Exit));
            assert_eq!(parse_input("quit"), Some(SessionCommand::Exit));
        }

        #[test]
        fn test_unknown_input() {
            assert_eq!(parse_input(""), None);
            assert_eq!(parse_input("x"), None);
            assert_eq!(parse_input("stop"), None);
        }
    }

    mod build_controller_tests {
        use super::*;

        #[test]
        fn test_build_controller_keeps_config() {
            let config = TimerConfig {
                speech_enabled: false,
                notifications_enabled: false,
                ..TimerConfig::default()
            };
            let controller = build_controller(&config);
            assert_eq!(controller.config(), &config);
        }

        #[test]
        fn test_silent_controller_starts_without_audio() {
            let config = TimerConfig {
                sound_enabled: false,
                speech_enabled: false,
                notifications_enabled: false,
                ..TimerConfig::default()
            };
            let workout = WorkoutDefinition::interval("Test", 2, 3, 3).unwrap();
            let session = build_controller(&config).start(&workout).unwrap();
            assert!(!session.holds_audio());
            assert_eq!(session.state().time_left_seconds, config.prep_seconds);
        }
    }
}
