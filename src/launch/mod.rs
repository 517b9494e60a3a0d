//! The launch procedure: environment → image → run.
//!
//! Each step runs strictly after the previous one and the run blocks until the
//! container exits. A missing required environment file or an unparseable
//! command stops everything before the backend is touched.

mod spec;

use std::path::PathBuf;

use tracing::info;

pub use spec::{DOCKER_HOST_ALIAS, image_descriptor, resolve_spec};

use crate::config::Config;
use crate::docker::{BuildLock, ContainerBackend, ContainerResult, ImageBuildState, LaunchSpec};
use crate::env::{self, EnvironmentConfig};
use crate::error::Result;

/// Drives one launch against a [`ContainerBackend`].
pub struct Launcher<B> {
    backend: B,
    config: Config,
    work_dir: PathBuf,
    lock_dir: PathBuf,
}

impl<B: ContainerBackend> Launcher<B> {
    /// `work_dir` is both the bind-mount source and the base for relative paths.
    pub fn new(backend: B, config: Config, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            backend,
            config,
            work_dir: work_dir.into(),
            lock_dir: std::env::temp_dir(),
        }
    }

    /// Directory holding the per-image build lock files.
    pub fn with_lock_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.lock_dir = dir.into();
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn env_file(&self) -> PathBuf {
        self.work_dir.join(&self.config.env_file)
    }

    pub fn load_environment(&self) -> Result<EnvironmentConfig> {
        env::load_environment(&self.env_file(), self.config.env_requirement())
    }

    /// Make sure the image exists locally, building it once if it does not.
    ///
    /// Returns the state found by the first query. The check-then-build runs
    /// under a per-image file lock and re-checks once the lock is held, so
    /// concurrent launchers build at most once.
    pub fn ensure_image(&self) -> Result<ImageBuildState> {
        let image = image_descriptor(&self.config, &self.work_dir);
        if self.backend.image_exists(&image.name)? {
            info!(image = %image.name, "image present");
            return Ok(ImageBuildState::Present);
        }

        info!(image = %image.name, "image absent");
        let _lock = BuildLock::acquire(&self.lock_dir, &image.name)?;
        if self.backend.image_exists(&image.name)? {
            info!(image = %image.name, "image built by a concurrent launch");
            return Ok(ImageBuildState::Absent);
        }
        self.backend.build_image(&image)?;
        Ok(ImageBuildState::Absent)
    }

    /// Build unconditionally (`force`) or only if the image is missing.
    pub fn build(&self, force: bool) -> Result<ImageBuildState> {
        self.backend.ensure_available()?;
        if !force {
            return self.ensure_image();
        }
        let image = image_descriptor(&self.config, &self.work_dir);
        let state = if self.backend.image_exists(&image.name)? {
            ImageBuildState::Present
        } else {
            ImageBuildState::Absent
        };
        let _lock = BuildLock::acquire(&self.lock_dir, &image.name)?;
        self.backend.build_image(&image)?;
        Ok(state)
    }

    /// Resolve the launch spec without touching the backend.
    pub fn plan(&self) -> Result<LaunchSpec> {
        let env = self.load_environment()?;
        resolve_spec(&self.config, env, &self.work_dir)
    }

    /// Run the whole procedure and wait for the container to exit.
    pub fn launch(&self) -> Result<ContainerResult> {
        let env = self.load_environment()?;
        let spec = resolve_spec(&self.config, env, &self.work_dir)?;
        self.backend.ensure_available()?;
        self.ensure_image()?;
        let result = self.backend.run(&spec)?;
        info!(exit_code = ?result.exit_code, "container exited");
        Ok(result)
    }

    pub fn prune(&self) -> Result<()> {
        self.backend.ensure_available()?;
        self.backend.prune()
    }
}
