use std::process::{Command, ExitStatus, Stdio};

use tracing::{debug, info};

use super::commands::{build_command, inspect_command, prune_command, run_command};
use super::types::{ContainerCommand, ContainerResult, ImageDescriptor, LaunchSpec};
use crate::error::{LaunchError, Result};

/// The operations the launcher needs from a container runtime.
pub trait ContainerBackend {
    /// Verify the daemon is reachable.
    fn ensure_available(&self) -> Result<()>;

    /// Whether the image is present in the local store. Never pulls.
    fn image_exists(&self, image: &str) -> Result<bool>;

    /// Build the image, blocking until done. Non-zero exit is `BuildFailed`.
    fn build_image(&self, image: &ImageDescriptor) -> Result<()>;

    /// Run the container in the foreground and wait for it to exit.
    fn run(&self, spec: &LaunchSpec) -> Result<ContainerResult>;

    /// Remove unused containers, networks and dangling images.
    fn prune(&self) -> Result<()>;
}

/// [`ContainerBackend`] over the `docker` command-line client.
#[derive(Debug, Clone)]
pub struct DockerCli {
    program: String,
}

impl DockerCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command(&self, cmd: &ContainerCommand) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&cmd.args);
        command.envs(cmd.env.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        command
    }

    /// Run with stdio inherited so Docker's own output reaches the operator.
    fn status(&self, cmd: &ContainerCommand) -> Result<ExitStatus> {
        debug!(program = %self.program, args = ?cmd.args, "invoking backend");
        self.command(cmd)
            .status()
            .map_err(|source| LaunchError::Spawn {
                program: self.program.clone(),
                source,
            })
    }

    fn quiet_status(&self, cmd: &ContainerCommand) -> Result<ExitStatus> {
        debug!(program = %self.program, args = ?cmd.args, "invoking backend");
        self.command(cmd)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|source| LaunchError::Spawn {
                program: self.program.clone(),
                source,
            })
    }
}

impl Default for DockerCli {
    fn default() -> Self {
        Self::new("docker")
    }
}

impl ContainerBackend for DockerCli {
    fn ensure_available(&self) -> Result<()> {
        let cmd = ContainerCommand {
            args: vec![
                "version".into(),
                "--format".into(),
                "{{.Server.Version}}".into(),
            ],
            env: Vec::new(),
        };
        let status = self.quiet_status(&cmd)?;
        if !status.success() {
            return Err(LaunchError::BackendUnavailable(status.to_string()));
        }
        Ok(())
    }

    fn image_exists(&self, image: &str) -> Result<bool> {
        Ok(self.quiet_status(&inspect_command(image))?.success())
    }

    fn build_image(&self, image: &ImageDescriptor) -> Result<()> {
        info!(image = %image.name, context = %image.context.display(), "building image");
        let status = self.status(&build_command(image))?;
        if !status.success() {
            return Err(LaunchError::BuildFailed {
                image: image.name.clone(),
                code: status.code(),
            });
        }
        Ok(())
    }

    fn run(&self, spec: &LaunchSpec) -> Result<ContainerResult> {
        info!(
            image = %spec.image,
            port = spec.port.host,
            mount = %spec.volume.host.display(),
            "starting container"
        );
        let status = self.status(&run_command(spec))?;
        Ok(ContainerResult::from_status(status))
    }

    fn prune(&self) -> Result<()> {
        let status = self.status(&prune_command())?;
        if !status.success() {
            return Err(LaunchError::BackendUnavailable(format!(
                "system prune failed ({status})"
            )));
        }
        Ok(())
    }
}

/// Returns `["--user", "uid:gid"]` on Unix so files the container writes to
/// the bind mount belong to the invoking user. Empty on other platforms.
pub fn user_args() -> Vec<String> {
    #[cfg(unix)]
    {
        // SAFETY: geteuid() and getegid() are simple POSIX getters that always succeed and have no side effects.
        let uid = unsafe { libc::geteuid() };
        let gid = unsafe { libc::getegid() };
        vec!["--user".into(), format!("{uid}:{gid}")]
    }

    #[cfg(not(unix))]
    {
        Vec::new()
    }
}
