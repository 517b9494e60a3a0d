use std::path::Path;

use tracing::{debug, info, warn};

use super::parse::parse_env;
use super::types::{EnvRequirement, EnvironmentConfig, RECOGNIZED_VARS};
use crate::error::{LaunchError, Result};

/// Read the environment file at `path`.
///
/// A missing file is [`LaunchError::ConfigNotFound`] when `requirement` is
/// `Required`. When `Optional`, the recognized `PG*` variables are taken from
/// the launcher's own process environment instead.
pub fn load_environment(path: &Path, requirement: EnvRequirement) -> Result<EnvironmentConfig> {
    load_environment_with(path, requirement, |name| std::env::var(name).ok())
}

/// [`load_environment`] with an explicit lookup for inherited variables.
pub fn load_environment_with<F>(
    path: &Path,
    requirement: EnvRequirement,
    lookup: F,
) -> Result<EnvironmentConfig>
where
    F: Fn(&str) -> Option<String>,
{
    if !path.exists() {
        return match requirement {
            EnvRequirement::Required => Err(LaunchError::ConfigNotFound {
                path: path.to_path_buf(),
            }),
            EnvRequirement::Optional => {
                warn!(path = %path.display(), "environment file not found, inheriting from process");
                Ok(inherit(lookup))
            }
        };
    }

    let text = std::fs::read_to_string(path)?;
    let env = parse_env(&text);
    info!(path = %path.display(), vars = env.len(), "loaded environment file");
    debug!(keys = ?env, "environment keys");
    Ok(env)
}

fn inherit<F>(lookup: F) -> EnvironmentConfig
where
    F: Fn(&str) -> Option<String>,
{
    let env: EnvironmentConfig = RECOGNIZED_VARS
        .into_iter()
        .filter_map(|name| lookup(name).map(|v| (name, v)))
        .collect();

    for name in env.missing_recognized() {
        warn!(var = name, "database variable is not set; the dashboard will use its own default");
    }
    env
}
