use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// When to allocate a pseudo-terminal for the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tty {
    /// Only when the launcher's own stdin is a terminal.
    Auto,
    Always,
    Never,
}

impl Tty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tty::Auto => "auto",
            Tty::Always => "always",
            Tty::Never => "never",
        }
    }

    pub fn resolve(self) -> bool {
        match self {
            Tty::Always => true,
            Tty::Never => false,
            Tty::Auto => {
                use std::io::IsTerminal;
                std::io::stdin().is_terminal()
            }
        }
    }
}

/// Fixed runtime parameters of a launch.
///
/// Every field has a default, so an empty settings file (or none at all)
/// reproduces the stock `vertex` invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub image: String,
    pub build_context: PathBuf,
    pub dockerfile: Option<PathBuf>,
    pub host_port: u16,
    pub container_port: u16,
    pub workdir: String,
    pub mount_target: String,
    pub env_file: PathBuf,
    pub env_required: bool,
    pub remove_on_exit: bool,
    /// Command run inside the container; `None` keeps the image's own CMD.
    pub command: Option<String>,
    pub docker: String,
    /// Map `PGHOST=localhost` to the Docker host gateway.
    pub rewrite_localhost: bool,
    /// Run as the invoking user so files written to the mount stay theirs.
    pub run_as_user: bool,
    pub tty: Tty,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            image: "vertex".to_string(),
            build_context: PathBuf::from("."),
            dockerfile: None,
            host_port: 8050,
            container_port: 8050,
            workdir: "/app".to_string(),
            mount_target: "/app".to_string(),
            env_file: PathBuf::from(".env"),
            env_required: true,
            remove_on_exit: true,
            command: Some("python -m vertex.descriptive_dashboard".to_string()),
            docker: "docker".to_string(),
            rewrite_localhost: false,
            run_as_user: false,
            tty: Tty::Auto,
        }
    }
}

impl Config {
    pub fn env_requirement(&self) -> crate::env::EnvRequirement {
        if self.env_required {
            crate::env::EnvRequirement::Required
        } else {
            crate::env::EnvRequirement::Optional
        }
    }
}
