use super::types::{ContainerCommand, ImageDescriptor, LaunchSpec};

/// `docker image inspect NAME`: succeeds only if the image is stored locally.
pub fn inspect_command(image: &str) -> ContainerCommand {
    ContainerCommand {
        args: vec!["image".into(), "inspect".into(), image.to_string()],
        env: Vec::new(),
    }
}

/// `docker build -t NAME [-f DOCKERFILE] CONTEXT`.
pub fn build_command(image: &ImageDescriptor) -> ContainerCommand {
    let mut args = vec!["build".into(), "-t".into(), image.name.clone()];
    if let Some(dockerfile) = &image.dockerfile {
        args.extend(["-f".into(), dockerfile.display().to_string()]);
    }
    args.push(image.context.display().to_string());

    ContainerCommand {
        args,
        env: Vec::new(),
    }
}

/// Build a `docker run` command for the launch spec.
///
/// Variables are passed as bare `-e NAME` flags and their values travel in
/// the spawned process's environment, so the command line never carries a
/// credential.
pub fn run_command(spec: &LaunchSpec) -> ContainerCommand {
    let mut args: Vec<String> = vec!["run".into()];
    if spec.remove_on_exit {
        args.push("--rm".into());
    }
    if spec.tty {
        args.push("-it".into());
    }
    args.extend([
        "-v".into(),
        format!("{}:{}", spec.volume.host.display(), spec.volume.container),
        "-p".into(),
        format!("{}:{}", spec.port.host, spec.port.container),
        "-w".into(),
        spec.workdir.clone(),
    ]);
    args.extend(spec.user.iter().cloned());
    for host in &spec.extra_hosts {
        args.extend(["--add-host".into(), host.clone()]);
    }
    for name in spec.env.keys() {
        args.extend(["-e".into(), name.to_string()]);
    }
    args.push(spec.image.clone());
    args.extend(spec.command.iter().cloned());

    ContainerCommand {
        args,
        env: spec
            .env
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    }
}

/// `docker system prune -f`.
pub fn prune_command() -> ContainerCommand {
    ContainerCommand {
        args: vec!["system".into(), "prune".into(), "-f".into()],
        env: Vec::new(),
    }
}
