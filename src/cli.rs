use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file (.json or .json5)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Removes every purge target
    Purge {
        /// List each target at debug level before and after it is touched
        #[arg(short, long)]
        inspect: bool,
    },
    /// Empties the reset clear targets in place, then removes the reset remove targets
    Reset {
        #[arg(short, long)]
        inspect: bool,
    },
    /// Runs the free-form steps from the configuration file
    Run {
        #[arg(short, long)]
        inspect: bool,
    },
    /// Removes the given directories
    Rm {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Empties the given directories, keeping the directories themselves
    Clear {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Logs the immediate contents of a directory at debug level
    Ls {
        dir: PathBuf,
        /// Label attached to every log line
        #[arg(long, default_value = "ls")]
        context: String,
    },
    /// Shows the configured cleanup plans
    Targets,
    /// Runs the pipeline's test suite: unit, integration, e2e or all
    Test {
        test_type: Option<String>,
        /// Skip the pytest-cov probe
        #[arg(long)]
        no_coverage: bool,
    },
}
