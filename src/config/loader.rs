use std::path::Path;

use tracing::debug;

use super::types::Config;
use crate::error::{LaunchError, Result};

/// Settings file looked up in the working directory.
pub const SETTINGS_FILE: &str = ".vertex.yaml";

/// Load `.vertex.yaml` from `dir`, falling back to defaults when absent.
pub fn load(dir: &Path) -> Result<Config> {
    let path = dir.join(SETTINGS_FILE);
    if !path.exists() {
        debug!(path = %path.display(), "no settings file, using defaults");
        return Ok(Config::default());
    }
    load_file(&path)
}

/// Load an explicit settings file. Unlike [`load`], a missing file is an error.
pub fn load_file(path: &Path) -> Result<Config> {
    let contents = std::fs::read_to_string(path)?;
    let config = serde_yaml::from_str(&contents).map_err(|source| LaunchError::Settings {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "loaded settings file");
    Ok(config)
}
