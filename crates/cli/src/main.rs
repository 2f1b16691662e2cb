mod play;
mod replay;
mod term;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};

const EXIT_ASSERT_FAIL: i32 = 1;
const EXIT_CONFIG_ERROR: i32 = 2;

#[derive(Parser, Debug)]
#[command(author, version, about = "Serpent Console Snake", long_about = None)]
struct Args {
    /// Enable verbose key/tick tracing
    #[arg(short, long, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Play interactively in the terminal
    Play {
        /// Path to a game manifest (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Replay a scenario script headlessly and check its assertions
    Test {
        /// Path to the scenario script (YAML)
        #[arg(short, long)]
        script: PathBuf,
        /// Directory to write result.json into
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
}

fn main() {
    let args = Args::parse();

    let level = if args.trace {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    // Logs go to stderr so the alternate screen stays clean in play mode
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Commands::Play { config } => {
            if let Err(e) = play::run(config.as_deref()) {
                error!("{:#}", e);
                std::process::exit(EXIT_CONFIG_ERROR);
            }
        }
        Commands::Test { script, output_dir } => {
            match replay::run_script(&script, output_dir.as_deref()) {
                Ok(report) if report.passed() => {
                    info!(
                        "Scenario passed: state {:?}, head {:?}, length {}",
                        report.state, report.head, report.body_length
                    );
                }
                Ok(report) => {
                    for failure in &report.failures {
                        error!("Assertion failed: {}", failure);
                    }
                    std::process::exit(EXIT_ASSERT_FAIL);
                }
                Err(e) => {
                    error!("{:#}", e);
                    std::process::exit(EXIT_CONFIG_ERROR);
                }
            }
        }
    }
}
