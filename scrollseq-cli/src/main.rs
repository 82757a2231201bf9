mod console;
mod scenario;

use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode, WriteLogger};

use scrollseq::{ScopeTree, factory};

use console::ConsoleScroller;
use scenario::{Player, Scenario};

#[derive(Parser)]
#[command(name = "scrollseq")]
#[command(about = "Replay a mount/unmount scenario and print every published sequence")]
struct Args {
    /// Scenario file (JSON).
    scenario: PathBuf,

    /// Write logs to this file instead of stderr.
    #[arg(long)]
    log: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid scenario: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Scroll(#[from] scrollseq::Error),

    #[error("Unknown scope name '{0}'")]
    UnknownName(String),

    #[error("Scope name '{0}' is already mounted")]
    DuplicateName(String),

    #[error("Failed to initialize logger: {0}")]
    Logger(#[from] log::SetLoggerError),
}

fn init_logging(args: &Args) -> Result<(), CliError> {
    let level = match args.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    match &args.log {
        Some(path) => {
            let log_file = File::create(path)?;
            WriteLogger::init(level, Config::default(), log_file)?;
        }
        None => {
            TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto)?;
        }
    }
    Ok(())
}

fn run(args: &Args) -> Result<(), CliError> {
    let scenario = Scenario::load(&args.scenario)?;
    info!(
        "Loaded {} cycles from {}",
        scenario.cycles.len(),
        args.scenario.display()
    );

    let tree = ScopeTree::new(factory(ConsoleScroller::from_options));
    let mut player = Player::new(tree);
    let published = player.play(scenario)?;

    info!("Done, {} publishes", published);
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_logging(&args) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
