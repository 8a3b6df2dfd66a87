//! CLI structure and command definitions.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cmkits_core::KitsConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cmkits")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Find, persist, and select CMake compiler kits", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to ~/.cmkits/config)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Kits file to use instead of the configured one
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Only report errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan the toolchain directory for compilers and save the kits found
    Scan,

    /// List known kits
    List {
        /// Print the kits as JSON
        #[arg(long)]
        json: bool,
    },

    /// Choose the active kit
    Select {
        /// Kit name; prompts when omitted
        name: Option<String>,
    },

    /// Show the active kit
    Active,

    /// Check whether switching kits requires a clean build
    #[command(name = "needs-clean")]
    NeedsClean {
        /// Kit being switched to
        new: String,

        /// Kit being switched from (defaults to the active kit)
        old: Option<String>,
    },

    /// List the kits offered by Visual Studio installations
    #[command(name = "vs-kits")]
    VsKits,

    /// Print the build environment of a Visual Studio kit
    Env {
        /// Kit name
        name: String,
    },

    /// Reload the kits file whenever it changes
    Watch,
}

impl Cli {
    /// Settings from `--config` (or the default file), with `--store` applied.
    pub fn load_config(&self) -> Result<KitsConfig> {
        let mut config = match &self.config {
            Some(path) => KitsConfig::load_from(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => KitsConfig::load().context("Failed to load config")?,
        };

        if let Some(store) = &self.store {
            config.store_path = store.clone();
        }
        Ok(config)
    }

    /// Default log filter for the verbosity flags.
    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            "cmkits=error"
        } else if self.debug {
            "cmkits=trace"
        } else if self.verbose {
            "cmkits=debug"
        } else {
            cmkits_core::log::DEFAULT_FILTER
        }
    }

    pub async fn execute(&self, config: KitsConfig) -> Result<()> {
        use crate::commands::*;

        let session = Session::new(config);

        match &self.command {
            Commands::Scan => {
                scan::execute(&session).await
            }
            Commands::List { json } => {
                list::execute(&session, *json).await
            }
            Commands::Select { name } => {
                select::execute(&session, name.as_deref()).await
            }
            Commands::Active => {
                active::execute(&session).await
            }
            Commands::NeedsClean { new, old } => {
                needs_clean::execute(&session, new, old.as_deref()).await
            }
            Commands::VsKits => {
                vs::kits(&session).await
            }
            Commands::Env { name } => {
                vs::env(&session, name).await
            }
            Commands::Watch => {
                watch::execute(&session).await
            }
        }
    }
}
