//! Workout Timer CLI - interval training in the terminal
//!
//! Runs exercise/rest workouts with countdown tones, spoken phase names and
//! system notifications:
//! - Quick workouts from `--sets/--exercise/--rest`
//! - Saved workouts with custom phase lists
//! - Pause, resume and exit from the keyboard

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use clap::{CommandFactory, Parser};

use workout_timer::cli::{run_workout, Cli, Commands, Display, RunArgs};
use workout_timer::config::{default_data_dir, TimerConfig, CONFIG_FILE_NAME};
use workout_timer::store::{FileStore, WorkoutLibrary};

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&e.to_string());
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
///
/// `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    let data_dir = cli.data_dir.clone().unwrap_or_else(default_data_dir);
    if cli.verbose {
        tracing::info!("Data directory: {}", data_dir.display());
    }

    let library = WorkoutLibrary::new(FileStore::new(&data_dir));

    match cli.command {
        Some(Commands::Run(args)) => {
            let config = load_config(&data_dir, Some(&args))?;
            let workout = match &args.name {
                Some(name) => library
                    .find(name)?
                    .ok_or_else(|| anyhow!("ワークアウト '{}' が見つかりません", name))?,
                None => args.quick_workout()?,
            };
            run_workout(&workout, &config).await?;
        }
        Some(Commands::List) => {
            let config = load_config(&data_dir, None)?;
            let workouts = library.list()?;
            Display::show_workout_list(&workouts, config.prep_seconds);
        }
        Some(Commands::Add(args)) => {
            let workout = args.to_workout()?;
            let index = library.add(workout.clone())?;
            Display::show_add_success(index + 1, &workout);
        }
        Some(Commands::Edit { index, workout }) => {
            let number = usize::try_from(index)?;
            let workout = workout.to_workout()?;
            library.update(number - 1, workout.clone())?;
            Display::show_edit_success(number, &workout);
        }
        Some(Commands::Remove { index }) => {
            let number = usize::try_from(index)?;
            let workout = library.remove(number - 1)?;
            Display::show_remove_success(number, &workout);
        }
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
        }
        None => {
            // No command provided, show help
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

/// Loads `config.json` from the data directory and applies `run` overrides.
fn load_config(data_dir: &Path, overrides: Option<&RunArgs>) -> Result<TimerConfig> {
    let path: PathBuf = data_dir.join(CONFIG_FILE_NAME);
    let mut config = TimerConfig::load(&path)?;
    if let Some(args) = overrides {
        args.apply_to(&mut config);
        config.validate()?;
    }
    Ok(config)
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
