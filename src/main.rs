mod browser;
mod cli;
mod error;
mod fixtures;
mod fmt;
mod forms;
mod logging;
mod meters;
mod models;
mod payments;
#[cfg(feature = "pdf")]
mod pdf;
mod repo;
mod report;
mod settings;
mod tui;

use std::io::IsTerminal;

use clap::{CommandFactory, Parser};

use cli::{Cli, Commands};
use logging::LogConfig;
use settings::FileStore;

fn main() {
    let cli = Cli::parse();
    logging::init_logging(&LogConfig::from_verbosity(cli.verbose).with_ansi(std::io::stderr().is_terminal()));

    let mut store = FileStore::default_location();

    let result = match cli.command {
        Commands::Attendance { command } => cli::attendance::dispatch(command, &store),
        Commands::Payments { command } => cli::payments::dispatch(command, &store),
        Commands::Invoices { command } => cli::invoices::dispatch(command, &store),
        Commands::Meters { command } => cli::meters::dispatch(command, &store),
        Commands::Residents { command } => cli::residents::dispatch(command),
        Commands::Managers { command } => cli::managers::dispatch(command),
        Commands::Prefs { command } => cli::prefs::dispatch(command, &mut store),
        Commands::Status => cli::status::run(&store),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "ems", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
