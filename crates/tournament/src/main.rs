//! Tournament CLI
//!
//! Play a tournament between two Hex programs and record the results.

use anyhow::Context;
use clap::{CommandFactory, Parser};
use std::path::PathBuf;
use std::process::ExitCode;
use tournament::{run_tournament, ConfigError, TournamentConfig, TournamentKind};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tournament", about = "Plays a tournament between two Hex programs")]
struct Cli {
    /// Command of the first program (`%SRAND` is replaced by a random seed)
    #[arg(short = 'b', long = "p1cmd")]
    p1cmd: Option<String>,

    /// Name of the first program
    #[arg(long = "p1name")]
    p1name: Option<String>,

    /// Command of the second program
    #[arg(short = 'w', long = "p2cmd")]
    p2cmd: Option<String>,

    /// Name of the second program
    #[arg(long = "p2name")]
    p2name: Option<String>,

    /// Board size (default 7)
    #[arg(short = 's', long = "size")]
    size: Option<u32>,

    /// Number of rounds (default 1)
    #[arg(short = 'r', long)]
    rounds: Option<u32>,

    /// Directory for storing results
    #[arg(short = 'o', long = "dir")]
    dir: Option<PathBuf>,

    /// Openings to use, one per line
    #[arg(short = 'l', long)]
    openings: Option<PathBuf>,

    /// Type of tournament ('iterative' or 'random')
    #[arg(short = 't', long = "type")]
    kind: Option<String>,

    /// Do not show protocol traffic and board after each move
    #[arg(short = 'q', long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show protocol traffic and board after each move
    #[arg(short = 'v', long)]
    verbose: bool,

    /// TOML file with tournament settings; command line options take precedence
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Cli {
    fn apply(self, config: &mut TournamentConfig) -> Result<(), ConfigError> {
        if let Some(kind) = self.kind {
            config.kind = kind.parse::<TournamentKind>()?;
        }
        if let Some(command) = self.p1cmd {
            config.program1.command = command;
        }
        if let Some(name) = self.p1name {
            config.program1.name = name;
        }
        if let Some(command) = self.p2cmd {
            config.program2.command = command;
        }
        if let Some(name) = self.p2name {
            config.program2.name = name;
        }
        if let Some(size) = self.size {
            config.board_size = size;
        }
        if let Some(rounds) = self.rounds {
            config.rounds = rounds;
        }
        if let Some(dir) = self.dir {
            config.results_dir = dir;
        }
        if let Some(openings) = self.openings {
            config.openings = openings;
        }
        if self.verbose {
            config.verbose = true;
        }
        if self.quiet {
            config.verbose = false;
        }
        Ok(())
    }
}

fn init_tracing(quiet: bool) {
    let default = if quiet { "warn" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_usage() {
    eprintln!("{}", Cli::command().render_help());
}

fn build_config(cli: Cli) -> anyhow::Result<TournamentConfig> {
    let mut config = match &cli.config {
        Some(path) => TournamentConfig::load(path)?,
        None => TournamentConfig::default(),
    };
    cli.apply(&mut config)?;
    Ok(config)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.quiet);

    let config = match build_config(cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        if matches!(e, ConfigError::Missing(_)) {
            print_usage();
        }
        return ExitCode::FAILURE;
    }

    match run_tournament(&config).context("tournament aborted") {
        Ok(results) => {
            results.print_report();
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
