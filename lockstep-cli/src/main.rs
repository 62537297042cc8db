//! # lockstep
//!
//! Find the first step at which several walkers, each following the same
//! cyclic left/right instructions through a node map, all stand on an
//! accepting node.
//!
//! ## Commands
//!
//! - `solve`: Synchronize every walker whose start node matches the start pattern
//! - `walk`: Follow one walker from a named node to a named target
//! - `describe`: Show each walker's tail/cycle analysis
//!
//! ## Example
//!
//! ```bash
//! # All nodes ending in A walk until all stand on nodes ending in Z
//! lockstep solve map.txt
//!
//! # Single walker from AAA to ZZZ
//! lockstep walk map.txt --from AAA --to ZZZ
//!
//! # Inspect cycles, with the first five accepting steps per walker
//! lockstep describe map.txt --preview 5
//!
//! # Use settings from a file, with debug logging
//! lockstep -v --config lockstep.toml solve map.txt
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lockstep_core::Detector;
use lockstep_types::NodePattern;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{describe, solve, walk};
use config::Config;

/// Multi-walker cycle synchronization.
#[derive(Parser, Debug)]
#[command(name = "lockstep")]
#[command(version, about, long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Overrides for walker selection and analysis.
#[derive(clap::Args, Debug)]
struct WalkerArgs {
    /// Start a walker on every node whose name ends with this suffix
    #[arg(long)]
    start_suffix: Option<String>,

    /// Treat nodes whose name ends with this suffix as accepting
    #[arg(long)]
    accept_suffix: Option<String>,

    /// Cycle detector: hash_map or floyd
    #[arg(long)]
    detector: Option<Detector>,

    /// Analyse and fold walkers on one thread
    #[arg(long)]
    sequential: bool,
}

impl WalkerArgs {
    fn apply(self, config: &mut Config) {
        if let Some(suffix) = self.start_suffix {
            config.walkers.start = NodePattern::Suffix(suffix);
        }
        if let Some(suffix) = self.accept_suffix {
            config.walkers.accept = NodePattern::Suffix(suffix);
        }
        if let Some(detector) = self.detector {
            config.analysis.detector = detector;
        }
        if self.sequential {
            config.analysis.parallel = false;
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Find the first step at which every walker is accepting
    Solve {
        /// Map file (instruction line, blank line, node definitions)
        input: PathBuf,

        #[command(flatten)]
        walkers: WalkerArgs,
    },

    /// Count the steps one walker needs to reach a target node
    Walk {
        /// Map file
        input: PathBuf,

        /// Start node
        #[arg(long, default_value = "AAA")]
        from: String,

        /// Target node
        #[arg(long, default_value = "ZZZ")]
        to: String,

        /// Cycle detector: hash_map or floyd
        #[arg(long)]
        detector: Option<Detector>,
    },

    /// Show each walker's tail and cycle
    Describe {
        /// Map file
        input: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,

        /// Also list this many accepting steps per walker
        #[arg(long, default_value = "0")]
        preview: usize,

        #[command(flatten)]
        walkers: WalkerArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Solve { input, walkers } => {
            walkers.apply(&mut config);
            solve::run(&input, &config)?;
        }
        Commands::Walk {
            input,
            from,
            to,
            detector,
        } => {
            if let Some(detector) = detector {
                config.analysis.detector = detector;
            }
            walk::run(&input, &from, &to, &config)?;
        }
        Commands::Describe {
            input,
            json,
            preview,
            walkers,
        } => {
            walkers.apply(&mut config);
            describe::run(&input, &config, json, preview)?;
        }
    }

    Ok(())
}

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise `warn`, or `debug` with `--verbose`.
fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn walker_args_override_config() {
        let cli = Cli::parse_from([
            "lockstep",
            "solve",
            "map.txt",
            "--start-suffix",
            "B",
            "--accept-suffix",
            "Y",
            "--detector",
            "floyd",
            "--sequential",
        ]);
        let Commands::Solve { walkers, .. } = cli.command else {
            panic!("expected solve");
        };
        let mut config = Config::default();
        walkers.apply(&mut config);
        assert_eq!(config.walkers.start, NodePattern::Suffix("B".into()));
        assert_eq!(config.walkers.accept, NodePattern::Suffix("Y".into()));
        assert_eq!(config.analysis.detector, Detector::Floyd);
        assert!(!config.analysis.parallel);
    }

    #[test]
    fn absent_overrides_keep_config() {
        let cli = Cli::parse_from(["lockstep", "describe", "map.txt"]);
        let Commands::Describe { walkers, preview, json, .. } = cli.command else {
            panic!("expected describe");
        };
        let mut config = Config::default();
        walkers.apply(&mut config);
        assert_eq!(config, Config::default());
        assert_eq!(preview, 0);
        assert!(!json);
    }

    #[test]
    fn bad_detector_is_rejected() {
        let result = Cli::try_parse_from(["lockstep", "solve", "map.txt", "--detector", "brent"]);
        assert!(result.is_err());
    }
}
