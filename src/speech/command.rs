//! Speech through the platform's command-line synthesizer.
//!
//! This module provides:
//!
//! - Detection of an installed synthesizer (`say`, `spd-say`, `espeak`)
//! - Delayed, non-blocking announcements on the tokio runtime
//! - Cancellation of announcements that have not finished yet

use std::cell::RefCell;
use std::env;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tokio::process::Command;
use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use tracing::{debug, warn};

use super::error::SpeechError;
use super::SpeechBackend;

/// Synthesizer commands in order of preference.
pub const SPEECH_COMMANDS: &[&str] = &["say", "spd-say", "espeak"];

/// Synthesizers that accept `--` before the text.
const OPTION_TERMINATOR_COMMANDS: &[&str] = &["say", "spd-say", "espeak-ng"];

/// Builds the synthesizer arguments for `text`.
///
/// Text starting with `-` must never be read as an option: it follows `--`
/// where the program supports it and is prefixed with a space otherwise.
#[must_use]
pub fn announcement_args(program_name: &str, text: &str) -> Vec<String> {
    if OPTION_TERMINATOR_COMMANDS.contains(&program_name) {
        vec!["--".to_string(), text.to_string()]
    } else if text.starts_with('-') {
        vec![format!(" {}", text)]
    } else {
        vec![text.to_string()]
    }
}

/// Finds the first synthesizer available on PATH.
#[must_use]
pub fn find_speech_command() -> Option<PathBuf> {
    let path = env::var_os("PATH")?;
    let dirs: Vec<PathBuf> = env::split_paths(&path).collect();
    find_program_in(&dirs, SPEECH_COMMANDS)
}

/// Finds the first of `programs` present in any of `dirs`.
///
/// Programs are tried in order; for each one every directory is searched.
#[must_use]
pub fn find_program_in(dirs: &[PathBuf], programs: &[&str]) -> Option<PathBuf> {
    programs.iter().find_map(|program| {
        dirs.iter()
            .map(|dir| dir.join(program))
            .find(|candidate| candidate.is_file())
    })
}

/// Speech backend that runs a synthesizer command per announcement.
#[derive(Debug)]
pub struct CommandSpeech {
    program: PathBuf,
    delay: Duration,
    pending: RefCell<Vec<AbortHandle>>,
}

impl CommandSpeech {
    /// Detects an installed synthesizer.
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::CommandNotFound` if none is installed.
    pub fn detect(delay: Duration) -> Result<Self, SpeechError> {
        let program = find_speech_command().ok_or(SpeechError::CommandNotFound)?;
        debug!("Using speech command {}", program.display());
        Ok(Self::with_program(program, delay))
    }

    /// Uses `program` as the synthesizer. See [`announcement_args`] for how
    /// the text is passed.
    #[must_use]
    pub fn with_program(program: impl Into<PathBuf>, delay: Duration) -> Self {
        Self {
            program: program.into(),
            delay,
            pending: RefCell::new(Vec::new()),
        }
    }

    /// Returns the synthesizer command.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Number of announcements spawned and not yet finished.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        let mut pending = self.pending.borrow_mut();
        pending.retain(|handle| !handle.is_finished());
        pending.len()
    }

    fn program_name(&self) -> String {
        self.program
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.program.display().to_string())
    }

    /// Runs the command immediately without a runtime. The child is reaped
    /// on a separate thread.
    fn speak_detached(&self, text: &str) -> Result<JoinHandle<()>, SpeechError> {
        let name = self.program_name();
        let mut child = std::process::Command::new(&self.program)
            .args(announcement_args(&name, text))
            .spawn()
            .map_err(|e| SpeechError::SpawnFailed(name.clone(), e.to_string()))?;

        thread::Builder::new()
            .name("speech-reaper".to_string())
            .spawn(move || match child.wait() {
                Ok(status) if !status.success() => {
                    warn!("{}", SpeechError::CommandFailed(name, status.to_string()));
                }
                Ok(_) => {}
                Err(e) => warn!("{}", SpeechError::SpawnFailed(name, e.to_string())),
            })
            .map_err(|e| SpeechError::SpawnFailed(self.program_name(), e.to_string()))
    }
}

impl SpeechBackend for CommandSpeech {
    fn speak(&self, text: &str) -> Result<(), SpeechError> {
        let Ok(runtime) = Handle::try_current() else {
            return self.speak_detached(text).map(|_| ());
        };

        let program = self.program.clone();
        let name = self.program_name();
        let text = text.to_string();
        let delay = self.delay;

        let task = runtime.spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            let status = Command::new(&program)
                .args(announcement_args(&name, &text))
                .kill_on_drop(true)
                .status()
                .await;
            match status {
                Ok(status) if status.success() => debug!("Announced '{}'", text),
                Ok(status) => warn!(
                    "{}",
                    SpeechError::CommandFailed(name, status.to_string())
                ),
                Err(e) => warn!("{}", SpeechError::SpawnFailed(name, e.to_string())),
            }
        });

        let mut pending = self.pending.borrow_mut();
        pending.retain(|handle| !handle.is_finished());
        pending.push(task.abort_handle());
        Ok(())
    }

    fn stop(&self) {
        let pending: Vec<AbortHandle> = self.pending.borrow_mut().drain(..).collect();
        if !pending.is_empty() {
            debug!("Cancelling {} pending announcement(s)", pending.len());
        }
        for handle in pending {
            handle.abort();
        }
    }
}

impl Drop for CommandSpeech {
    fn drop(&mut self) {
        self.stop();
    }
}
