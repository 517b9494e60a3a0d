use std::path::Path;

use tracing::info;

use crate::config::Config;
use crate::docker::{self, ImageDescriptor, LaunchSpec, PortMapping, VolumeBind};
use crate::env::EnvironmentConfig;
use crate::error::{LaunchError, Result};

/// Host name Docker Desktop (and `host-gateway` on Linux) resolves to the host.
pub const DOCKER_HOST_ALIAS: &str = "host.docker.internal";

const LOOPBACK_HOSTS: [&str; 2] = ["localhost", "127.0.0.1"];

/// The image to check and build, with its context resolved against `work_dir`.
pub fn image_descriptor(cfg: &Config, work_dir: &Path) -> ImageDescriptor {
    ImageDescriptor {
        name: cfg.image.clone(),
        context: work_dir.join(&cfg.build_context),
        dockerfile: cfg.dockerfile.as_ref().map(|f| work_dir.join(f)),
    }
}

/// Resolve the run invocation: `work_dir` is mounted at the configured target.
pub fn resolve_spec(cfg: &Config, env: EnvironmentConfig, work_dir: &Path) -> Result<LaunchSpec> {
    let command = match &cfg.command {
        Some(line) => shell_words::split(line).map_err(|source| LaunchError::Command {
            command: line.clone(),
            source,
        })?,
        None => Vec::new(),
    };

    let mut env = env;
    let mut extra_hosts = Vec::new();
    if cfg.rewrite_localhost && rewrite_loopback_host(&mut env) {
        extra_hosts.push(format!("{DOCKER_HOST_ALIAS}:host-gateway"));
    }

    Ok(LaunchSpec {
        image: cfg.image.clone(),
        port: PortMapping {
            host: cfg.host_port,
            container: cfg.container_port,
        },
        workdir: cfg.workdir.clone(),
        volume: VolumeBind {
            host: work_dir.to_path_buf(),
            container: cfg.mount_target.clone(),
        },
        env,
        remove_on_exit: cfg.remove_on_exit,
        tty: cfg.tty.resolve(),
        user: if cfg.run_as_user {
            docker::user_args()
        } else {
            Vec::new()
        },
        extra_hosts,
        command,
    })
}

/// Point a loopback `PGHOST` at the Docker host. Returns whether it changed.
fn rewrite_loopback_host(env: &mut EnvironmentConfig) -> bool {
    match env.get("PGHOST") {
        Some(host) if LOOPBACK_HOSTS.contains(&host) => {
            info!(from = host, to = DOCKER_HOST_ALIAS, "rewriting PGHOST for the container");
            env.insert("PGHOST", DOCKER_HOST_ALIAS);
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::config::Tty;

    fn test_config() -> Config {
        Config {
            tty: Tty::Never,
            ..Config::default()
        }
    }

    fn pg_env(host: &str) -> EnvironmentConfig {
        [("PGUSER", "postgres"), ("PGHOST", host), ("PGPORT", "5432")]
            .into_iter()
            .collect()
    }

    #[test]
    fn default_spec_matches_stock_invocation() {
        let spec = resolve_spec(&test_config(), pg_env("db"), Path::new("/srv/vertex")).unwrap();
        assert_eq!(spec.image, "vertex");
        assert_eq!(spec.port, PortMapping { host: 8050, container: 8050 });
        assert_eq!(spec.workdir, "/app");
        assert_eq!(spec.volume.host, PathBuf::from("/srv/vertex"));
        assert_eq!(spec.volume.container, "/app");
        assert!(spec.remove_on_exit);
        assert!(!spec.tty);
        assert!(spec.user.is_empty());
        assert_eq!(
            spec.command,
            vec!["python", "-m", "vertex.descriptive_dashboard"]
        );
    }

    #[test]
    fn env_is_forwarded_verbatim_by_default() {
        let spec = resolve_spec(&test_config(), pg_env("localhost"), Path::new("/w")).unwrap();
        assert_eq!(spec.env.get("PGHOST"), Some("localhost"));
        assert!(spec.extra_hosts.is_empty());
    }

    #[test]
    fn loopback_host_is_rewritten_when_enabled() {
        let cfg = Config {
            rewrite_localhost: true,
            ..test_config()
        };
        for host in ["localhost", "127.0.0.1"] {
            let spec = resolve_spec(&cfg, pg_env(host), Path::new("/w")).unwrap();
            assert_eq!(spec.env.get("PGHOST"), Some(DOCKER_HOST_ALIAS));
            assert_eq!(spec.extra_hosts, vec!["host.docker.internal:host-gateway"]);
        }
    }

    #[test]
    fn remote_host_is_not_rewritten() {
        let cfg = Config {
            rewrite_localhost: true,
            ..test_config()
        };
        let spec = resolve_spec(&cfg, pg_env("db.example.org"), Path::new("/w")).unwrap();
        assert_eq!(spec.env.get("PGHOST"), Some("db.example.org"));
        assert!(spec.extra_hosts.is_empty());
    }

    #[test]
    fn quoted_command_is_split_like_a_shell() {
        let cfg = Config {
            command: Some("python -m vertex.descriptive_dashboard --title 'South America'".into()),
            ..test_config()
        };
        let spec = resolve_spec(&cfg, EnvironmentConfig::new(), Path::new("/w")).unwrap();
        assert_eq!(spec.command.last().map(String::as_str), Some("South America"));
    }

    #[test]
    fn unbalanced_command_is_rejected() {
        let cfg = Config {
            command: Some("python -c 'oops".into()),
            ..test_config()
        };
        let err = resolve_spec(&cfg, EnvironmentConfig::new(), Path::new("/w")).unwrap_err();
        assert!(matches!(err, LaunchError::Command { .. }));
    }

    #[test]
    fn no_command_keeps_image_default() {
        let cfg = Config {
            command: None,
            ..test_config()
        };
        let spec = resolve_spec(&cfg, EnvironmentConfig::new(), Path::new("/w")).unwrap();
        assert!(spec.command.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn run_as_user_adds_user_flag() {
        let cfg = Config {
            run_as_user: true,
            ..test_config()
        };
        let spec = resolve_spec(&cfg, EnvironmentConfig::new(), Path::new("/w")).unwrap();
        assert_eq!(spec.user[0], "--user");
    }

    #[test]
    fn image_descriptor_resolves_against_work_dir() {
        let cfg = Config {
            build_context: PathBuf::from("docker"),
            dockerfile: Some(PathBuf::from("docker/Dockerfile")),
            ..test_config()
        };
        let image = image_descriptor(&cfg, Path::new("/srv/vertex"));
        assert_eq!(image.name, "vertex");
        assert_eq!(image.context, PathBuf::from("/srv/vertex/docker"));
        assert_eq!(image.dockerfile, Some(PathBuf::from("/srv/vertex/docker/Dockerfile")));
    }
}
