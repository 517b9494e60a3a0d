use std::path::PathBuf;

use serde::{Serialize, Serializer};

use crate::env::EnvironmentConfig;

/// An image the launcher can query and, if needed, build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageDescriptor {
    pub name: String,
    pub context: PathBuf,
    pub dockerfile: Option<PathBuf>,
}

/// What the local image store reported for an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageBuildState {
    Present,
    Absent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PortMapping {
    pub host: u16,
    pub container: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VolumeBind {
    pub host: PathBuf,
    pub container: String,
}

/// Everything `docker run` needs for one invocation. Built fresh per launch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaunchSpec {
    pub image: String,
    pub port: PortMapping,
    pub workdir: String,
    pub volume: VolumeBind,
    #[serde(serialize_with = "serialize_redacted")]
    pub env: EnvironmentConfig,
    pub remove_on_exit: bool,
    pub tty: bool,
    /// `--user uid:gid` arguments, empty when the image's user is kept.
    pub user: Vec<String>,
    /// `host:address` entries passed as `--add-host`.
    pub extra_hosts: Vec<String>,
    pub command: Vec<String>,
}

fn serialize_redacted<S: Serializer>(env: &EnvironmentConfig, s: S) -> Result<S::Ok, S::Error> {
    env.redacted().serialize(s)
}

/// A fully assembled backend invocation.
///
/// `args` go on the command line; `env` is set on the spawned process only and
/// never appears in `args`.
pub struct ContainerCommand {
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
}

/// Outcome of a foreground container run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerResult {
    pub success: bool,
    /// `None` when the backend was terminated by a signal.
    pub exit_code: Option<i32>,
}

impl ContainerResult {
    pub fn from_status(status: std::process::ExitStatus) -> Self {
        Self {
            success: status.success(),
            exit_code: status.code(),
        }
    }
}
