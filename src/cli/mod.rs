//! CLI module for the Workout Timer.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `runner`: Terminal session runner (keyboard controls, Ctrl-C)
//! - `display`: Output formatting and display logic

pub mod commands;
pub mod display;
pub mod runner;

pub use commands::{AddArgs, Cli, Commands, RunArgs};
pub use display::Display;
pub use runner::{build_controller, parse_input, run_workout};
