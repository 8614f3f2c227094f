//! Display utilities for the Workout Timer CLI.
//!
//! This module provides formatted output for:
//! - Success messages
//! - Error messages
//! - The saved workout list
//! - Live session progress

use std::io::{self, Write};

use crate::session::{SessionEvent, SessionOutcome, Transition};
use crate::types::{PhaseSpec, SessionPhase, SessionState, WorkoutDefinition};

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Shows the workout about to run and the terminal controls.
    pub fn show_session_start(workout: &WorkoutDefinition, prep_seconds: u32) {
        println!("* ワークアウトを開始します: {}", workout.name);
        println!("  {}", Self::format_plan(workout));
        let (minutes, seconds) =
            Self::format_time(Self::saturate(workout.total_seconds(prep_seconds)));
        println!("  合計時間: {}:{:02}", minutes, seconds);
        println!("  操作: p = 一時停止, r = 再開, q = 終了 (Enterで確定)");
    }

    /// Shows one session event.
    pub fn show_event(event: &SessionEvent) {
        match event {
            SessionEvent::Started { workout_name, .. } => {
                tracing::debug!("Session for '{}' started", workout_name);
            }
            SessionEvent::PhaseChanged(transition) => {
                println!();
                println!("{}", Self::format_transition(transition));
            }
            SessionEvent::Tick { state, .. } => {
                if state.is_completed() {
                    return;
                }
                print!("\r{}", Self::format_progress(state));
                let _ = io::stdout().flush();
            }
            SessionEvent::Paused => {
                println!();
                println!("|| 一時停止しました (r で再開)");
            }
            SessionEvent::Resumed => {
                println!("> 再開しました");
            }
            SessionEvent::Completed | SessionEvent::Exited => {}
        }
    }

    /// Shows how the session ended.
    pub fn show_session_end(outcome: SessionOutcome, state: &SessionState) {
        match outcome {
            SessionOutcome::Completed => {
                println!("* ワークアウト完了! ({}セット)", state.total_sets);
            }
            SessionOutcome::Exited => {
                println!();
                println!(
                    "[] ワークアウトを終了しました (セット {}/{})",
                    state.current_set.min(state.total_sets),
                    state.total_sets
                );
            }
        }
    }

    /// Shows the saved workouts.
    pub fn show_workout_list(workouts: &[WorkoutDefinition], prep_seconds: u32) {
        if workouts.is_empty() {
            println!("保存されたワークアウトはありません");
            println!("  workout-timer add <NAME> で追加できます");
            return;
        }

        println!("保存されたワークアウト");
        println!("─────────────────────────────");
        for (i, workout) in workouts.iter().enumerate() {
            println!("{}", Self::format_list_entry(i + 1, workout, prep_seconds));
        }
    }

    /// Shows a success message for a saved workout.
    pub fn show_add_success(number: usize, workout: &WorkoutDefinition) {
        println!("* ワークアウトを保存しました: #{} {}", number, workout.name);
        println!("  {}", Self::format_plan(workout));
    }

    /// Shows a success message for a replaced workout.
    pub fn show_edit_success(number: usize, workout: &WorkoutDefinition) {
        println!("* ワークアウトを更新しました: #{} {}", number, workout.name);
        println!("  {}", Self::format_plan(workout));
    }

    /// Shows a success message for a deleted workout.
    pub fn show_remove_success(number: usize, workout: &WorkoutDefinition) {
        println!("* ワークアウトを削除しました: #{} {}", number, workout.name);
    }

    /// Shows a warning that does not stop the command.
    pub fn show_warning(message: &str) {
        eprintln!("警告: {}", message);
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("エラー: {}", message);
    }

    /// Formats the live progress line.
    pub fn format_progress(state: &SessionState) -> String {
        let (minutes, seconds) = Self::format_time(state.time_left_seconds);
        format!(
            "  [{}] {} セット {}/{} 残り {}:{:02}  ",
            Self::phase_label(state.current_phase),
            state.phase_name,
            state.current_set,
            state.total_sets,
            minutes,
            seconds
        )
    }

    /// Formats the banner printed when a phase begins.
    pub fn format_transition(transition: &Transition) -> String {
        match transition.to {
            SessionPhase::Completed => format!(">> {}", transition.phrase),
            _ => format!(
                ">> {} ({} / セット {})",
                transition.phrase,
                Self::phase_label(transition.to),
                transition.set
            ),
        }
    }

    /// Formats one row of the workout list.
    pub fn format_list_entry(
        number: usize,
        workout: &WorkoutDefinition,
        prep_seconds: u32,
    ) -> String {
        let (minutes, seconds) =
            Self::format_time(Self::saturate(workout.total_seconds(prep_seconds)));
        format!(
            "#{:<3} {}  {}  合計 {}:{:02}",
            number,
            workout.name,
            Self::format_plan(workout),
            minutes,
            seconds
        )
    }

    /// Formats the set and phase layout of a workout.
    pub fn format_plan(workout: &WorkoutDefinition) -> String {
        if let Some((exercise, rest)) = workout.as_interval() {
            return format!(
                "{}セット × 運動{}秒 / 休憩{}秒",
                workout.total_sets, exercise, rest
            );
        }

        let phases: Vec<String> = workout.phases.iter().map(Self::format_phase).collect();
        format!("{}セット × [{}]", workout.total_sets, phases.join(", "))
    }

    fn format_phase(phase: &PhaseSpec) -> String {
        if phase.is_rest() {
            format!("{} {}秒(休憩)", phase.name, phase.duration_seconds)
        } else {
            format!("{} {}秒", phase.name, phase.duration_seconds)
        }
    }

    fn phase_label(phase: SessionPhase) -> &'static str {
        match phase {
            SessionPhase::Preparing => "準備",
            SessionPhase::Exercising => "運動",
            SessionPhase::Resting => "休憩",
            SessionPhase::Completed => "完了",
        }
    }

    fn saturate(seconds: u64) -> u32 {
        u32::try_from(seconds).unwrap_or(u32::MAX)
    }

    /// Formats remaining seconds as (minutes, seconds).
    fn format_time(total_seconds: u32) -> (u32, u32) {
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;
        (minutes, seconds)
    }
}

// ============================================================================
// Tests
// ============================================================================
