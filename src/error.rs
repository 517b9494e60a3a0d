use std::path::PathBuf;

use thiserror::Error;

/// Everything that can stop a launch before or during the container run.
#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("environment file not found: {}", .path.display())]
    ConfigNotFound { path: PathBuf },

    #[error("failed to build image `{image}` ({})", describe_code(.code))]
    BuildFailed { image: String, code: Option<i32> },

    #[error("docker daemon is not reachable ({0})")]
    BackendUnavailable(String),

    #[error("failed to invoke `{program}`: is it installed and on PATH?")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings file {}", .path.display())]
    Settings {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid command `{command}`")]
    Command {
        command: String,
        #[source]
        source: shell_words::ParseError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("exit {c}"),
        None => "terminated by signal".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, LaunchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_not_found_names_the_path() {
        let err = LaunchError::ConfigNotFound {
            path: PathBuf::from("/srv/vertex/.env"),
        };
        assert_eq!(err.to_string(), "environment file not found: /srv/vertex/.env");
    }

    #[test]
    fn build_failed_reports_exit_code() {
        let err = LaunchError::BuildFailed {
            image: "vertex".into(),
            code: Some(2),
        };
        assert_eq!(err.to_string(), "failed to build image `vertex` (exit 2)");

        let killed = LaunchError::BuildFailed {
            image: "vertex".into(),
            code: None,
        };
        assert!(killed.to_string().contains("signal"));
    }
}
