//! Command definitions for the `userscout` binary.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use userscout_core::AppConfig;
use userscout_probe::parse_service_list;

/// Check whether a username exists across many online services.
#[derive(Debug, Parser)]
#[command(name = "userscout", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output JSON instead of text.
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Comma-separated list of services to check (defaults to all).
    #[arg(short, long, global = true, value_name = "LIST")]
    pub services: Option<String>,

    /// Timeout in seconds shared by all probes of one username.
    #[arg(short, long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Include NSFW services.
    #[arg(long, global = true)]
    pub include_nsfw: bool,

    /// Load service definitions from this directory instead of the bundled set.
    #[arg(long, global = true, value_name = "DIR")]
    pub catalog_dir: Option<PathBuf>,

    /// Read configuration from this file instead of the default location.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check a single username across services.
    Check {
        /// Username to check.
        username: String,
    },

    /// Check several usernames across services.
    CheckMany {
        /// Usernames to check.
        #[arg(required = true, num_args = 1..)]
        usernames: Vec<String>,
    },

    /// List available services.
    ListSites {
        /// Only services tagged with this category.
        #[arg(short, long)]
        category: Option<String>,
    },

    /// List the category tags in use.
    Categories,
}

impl Cli {
    /// Overlay command-line flags onto a loaded configuration.
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(services) = &self.services {
            config.probe.services = parse_service_list(services);
        }
        if let Some(timeout) = self.timeout {
            config.probe.timeout_secs = timeout.max(1);
        }
        if self.include_nsfw {
            config.probe.include_nsfw = true;
        }
        if let Some(dir) = &self.catalog_dir {
            config.catalog.directory = Some(dir.clone());
        }
    }
}
