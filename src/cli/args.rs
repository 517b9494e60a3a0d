//! CLI argument parsing

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "vertex-launch")]
#[command(author, version, about = "Build and run the VERTEX dashboard container", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<SubCommand>,

    /// Environment file with the PG* credentials (default: .env)
    #[arg(long, global = true, value_name = "PATH", env = "VERTEX_ENV_FILE")]
    pub env_file: Option<PathBuf>,

    /// Continue with inherited variables when the environment file is missing
    #[arg(long, global = true)]
    pub env_optional: bool,

    /// Settings file (default: .vertex.yaml in the working directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Image name to check, build and run
    #[arg(long, global = true)]
    pub image: Option<String>,

    /// Port published on the host and inside the container
    #[arg(long, short, global = true)]
    pub port: Option<u16>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum SubCommand {
    /// Load the environment, build the image if missing, and run the dashboard (default)
    Run,

    /// Print the resolved launch as JSON without calling Docker
    Plan,

    /// Build the image if it is missing
    Build {
        /// Rebuild even if the image already exists
        #[arg(long)]
        force: bool,
    },

    /// Remove stopped containers, unused networks and dangling images
    Prune,
}

impl Args {
    /// Fold command-line overrides into the loaded settings.
    pub fn apply(&self, cfg: &mut Config) {
        if let Some(path) = &self.env_file {
            cfg.env_file = path.clone();
        }
        if self.env_optional {
            cfg.env_required = false;
        }
        if let Some(image) = &self.image {
            cfg.image = image.clone();
        }
        if let Some(port) = self.port {
            cfg.host_port = port;
            cfg.container_port = port;
        }
    }

    pub fn subcommand(&self) -> SubCommand {
        self.command.clone().unwrap_or(SubCommand::Run)
    }
}
