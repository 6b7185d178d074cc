use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "workout-cli", version, about = "Workout Calendar CLI")]
struct Cli {
    /// Directory holding workout.db and config.toml
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Exercise catalog management
    Exercise {
        #[command(subcommand)]
        action: commands::exercise::ExerciseAction,
    },
    /// Workout entry management
    Entry {
        #[command(subcommand)]
        action: commands::entry::EntryAction,
    },
    /// Print the calendar around a date
    Calendar(commands::calendar::CalendarArgs),
    /// Select the day entries are logged against
    Select {
        /// Date as YYYY-MM-DD
        date: String,
    },
    /// Replace the free-text record memo
    Memo {
        text: String,
    },
    /// Volume progress for one exercise
    Progress(commands::progress::ProgressArgs),
    /// Session and rest timers
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    logging::init();
    let cli = Cli::parse();
    let ctx = match commands::Context::resolve(cli.data_dir) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Exercise { action } => commands::exercise::run(&ctx, action),
        Commands::Entry { action } => commands::entry::run(&ctx, action),
        Commands::Calendar(args) => commands::calendar::run(&ctx, args),
        Commands::Select { date } => commands::calendar::select(&ctx, &date),
        Commands::Memo { text } => commands::calendar::memo(&ctx, &text),
        Commands::Progress(args) => commands::progress::run(&ctx, args),
        Commands::Timer { action } => commands::timer::run(&ctx, action),
        Commands::Config { action } => commands::config::run(&ctx, action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
