//! Command definitions for the Workout Timer CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::TimerConfig;
use crate::types::{PhaseKind, PhaseSpec, ValidationError, WorkoutDefinition};

/// Sets used when `run` or `add` is given no `--sets`.
pub const DEFAULT_SETS: u32 = 3;

/// Exercise interval used when none is given.
pub const DEFAULT_EXERCISE_SECONDS: u32 = 30;

/// Rest interval used when none is given.
pub const DEFAULT_REST_SECONDS: u32 = 15;

/// Name given to workouts started from command-line intervals.
pub const QUICK_WORKOUT_NAME: &str = "Quick Workout";

// ============================================================================
// CLI Structure
// ============================================================================

/// Workout Timer CLI - interval training in the terminal
#[derive(Parser, Debug)]
#[command(
    name = "workout-timer",
    version,
    about = "インターバルトレーニング用ワークアウトタイマーCLI",
    long_about = "運動と休憩を繰り返すワークアウトをターミナルで実行します。\n\
                  カウントダウン音、音声読み上げ、システム通知でフェーズの切り替わりを知らせます。",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding saved workouts and config.json
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run a saved workout or a quick interval workout
    Run(RunArgs),

    /// List saved workouts
    List,

    /// Save a new workout
    Add(AddArgs),

    /// Replace a saved workout by its number in `list`
    Edit {
        /// Workout number as shown by `list` (1-based)
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        index: u32,

        /// The new definition
        #[command(flatten)]
        workout: AddArgs,
    },

    /// Delete a saved workout by its number in `list`
    Remove {
        /// Workout number as shown by `list` (1-based)
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        index: u32,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Run Command Arguments
// ============================================================================

/// Arguments for the run command
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Name of a saved workout (case-insensitive)
    #[arg(conflicts_with_all = ["sets", "exercise", "rest"])]
    pub name: Option<String>,

    /// Number of sets (1-99)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=99))]
    pub sets: Option<u32>,

    /// Exercise duration in seconds (3-3600)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(3..=3600))]
    pub exercise: Option<u32>,

    /// Rest duration in seconds (3-3600)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(3..=3600))]
    pub rest: Option<u32>,

    /// Preparation countdown in seconds (1-60)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=60))]
    pub prep: Option<u32>,

    /// Disable countdown tones
    #[arg(long)]
    pub no_sound: bool,

    /// Disable spoken announcements
    #[arg(long)]
    pub no_speech: bool,

    /// Disable system notifications
    #[arg(long)]
    pub no_notify: bool,
}

impl RunArgs {
    /// Applies the command-line overrides on top of the file configuration.
    pub fn apply_to(&self, config: &mut TimerConfig) {
        if let Some(prep) = self.prep {
            config.prep_seconds = prep;
        }
        if self.no_sound {
            config.sound_enabled = false;
        }
        if self.no_speech {
            config.speech_enabled = false;
        }
        if self.no_notify {
            config.notifications_enabled = false;
        }
    }

    /// Builds the quick workout described by `--sets/--exercise/--rest`.
    ///
    /// # Errors
    ///
    /// Returns an error if the intervals do not form a valid workout.
    pub fn quick_workout(&self) -> Result<WorkoutDefinition, ValidationError> {
        WorkoutDefinition::interval(
            QUICK_WORKOUT_NAME,
            self.sets.unwrap_or(DEFAULT_SETS),
            self.exercise.unwrap_or(DEFAULT_EXERCISE_SECONDS),
            self.rest.unwrap_or(DEFAULT_REST_SECONDS),
        )
    }
}

// ============================================================================
// Add Command Arguments
// ============================================================================

/// Workout definition taken by the add and edit commands
#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    /// Workout name
    #[arg(value_parser = validate_workout_name)]
    pub name: String,

    /// Number of sets (1-99)
    #[arg(
        short,
        long,
        default_value = "3",
        value_parser = clap::value_parser!(u32).range(1..=99)
    )]
    pub sets: u32,

    /// Exercise duration in seconds (3-3600)
    #[arg(
        short,
        long,
        conflicts_with = "phases",
        value_parser = clap::value_parser!(u32).range(3..=3600)
    )]
    pub exercise: Option<u32>,

    /// Rest duration in seconds (3-3600)
    #[arg(
        short,
        long,
        conflicts_with = "phases",
        value_parser = clap::value_parser!(u32).range(3..=3600)
    )]
    pub rest: Option<u32>,

    /// Custom phase as NAME:SECONDS or NAME:SECONDS:rest (repeatable)
    #[arg(long = "phase", value_name = "NAME:SECS[:rest]", value_parser = parse_phase)]
    pub phases: Vec<PhaseSpec>,
}

impl AddArgs {
    /// Builds the workout to be saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the workout is invalid.
    pub fn to_workout(&self) -> Result<WorkoutDefinition, ValidationError> {
        if self.phases.is_empty() {
            return WorkoutDefinition::interval(
                self.name.clone(),
                self.sets,
                self.exercise.unwrap_or(DEFAULT_EXERCISE_SECONDS),
                self.rest.unwrap_or(DEFAULT_REST_SECONDS),
            );
        }

        let workout = WorkoutDefinition::new(self.name.clone(), self.sets, self.phases.clone());
        workout.validate()?;
        Ok(workout)
    }
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Validates the workout name.
///
/// - Must not be blank
/// - Must not exceed 50 characters
fn validate_workout_name(s: &str) -> Result<String, String> {
    let name = s.trim();
    if name.is_empty() {
        return Err("ワークアウト名は空にできません".to_string());
    }
    if name.chars().count() > 50 {
        return Err("ワークアウト名は50文字以内にしてください".to_string());
    }
    Ok(name.to_string())
}

/// Parses a `--phase` value: `NAME:SECONDS` or `NAME:SECONDS:KIND`.
///
/// KIND is `exercise` (default) or `rest`.
pub fn parse_phase(s: &str) -> Result<PhaseSpec, String> {
    let mut parts = s.split(':');
    let name = parts.next().unwrap_or_default().trim();
    if name.is_empty() {
        return Err("フェーズ名は空にできません（形式: NAME:SECS[:rest]）".to_string());
    }

    let seconds = parts
        .next()
        .ok_or_else(|| format!("'{}' に秒数がありません（形式: NAME:SECS[:rest]）", s))?;
    let seconds: u32 = seconds
        .trim()
        .parse()
        .map_err(|_| format!("秒数 '{}' は正の整数で指定してください", seconds))?;
    if seconds == 0 {
        return Err("フェーズの秒数は1以上で指定してください".to_string());
    }

    let kind = match parts.next().map(str::trim) {
        None | Some("exercise") => PhaseKind::Exercise,
        Some("rest") => PhaseKind::Rest,
        Some(other) => {
            return Err(format!(
                "フェーズ種別 '{}' は exercise か rest で指定してください",
                other
            ))
        }
    };

    if parts.next().is_some() {
        return Err(format!("'{}' の形式が不正です（形式: NAME:SECS[:rest]）", s));
    }

    Ok(PhaseSpec::new(name, seconds, kind))
}

// ============================================================================
// Tests
// ============================================================================
