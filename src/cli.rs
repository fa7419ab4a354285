//! CLI argument parser for node-warden
//!
//! Provides type-safe argument parsing using clap derive.

use clap::Parser;

use crate::config::{Config, DEFAULT_TARGET_PREFIX};
use crate::error::NodeWardenError;

/// How the binary should run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Interactive menu
    Interactive,
    /// Print the target listing once and exit
    ListOnce,
}

/// CLI arguments for node-warden
#[derive(Parser, Debug)]
#[command(
    name = "node-warden",
    version,
    about = "List and safely terminate Node.js processes",
    long_about = "An interactive tool for listing and terminating processes by executable-name prefix.\n\
                  Processes whose command line mentions a protected keyword are never terminated."
)]
pub struct CliArgs {
    /// Executable-name prefix selecting target processes (case-insensitive)
    #[arg(short, long, default_value = DEFAULT_TARGET_PREFIX, value_name = "NAME")]
    pub prefix: String,

    /// Print target processes and exit
    #[arg(short, long)]
    pub list: bool,
}

impl CliArgs {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments and determine execution mode
    pub fn validate(&self) -> Result<ExecutionMode, NodeWardenError> {
        if self.prefix.trim().is_empty() {
            return Err(NodeWardenError::InvalidInput(
                "--prefix must not be empty".to_string(),
            ));
        }

        if self.list {
            Ok(ExecutionMode::ListOnce)
        } else {
            Ok(ExecutionMode::Interactive)
        }
    }

    /// Build the runtime configuration
    pub fn config(&self) -> Config {
        Config::with_prefix(self.prefix.trim())
    }
}
