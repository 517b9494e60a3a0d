use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use vertex_launcher::cli::{Args, SubCommand};
use vertex_launcher::docker::{DockerCli, ImageBuildState};
use vertex_launcher::{Launcher, config, observability};

fn main() -> ExitCode {
    let args = Args::parse();
    observability::init_tracing(args.verbose);

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("cannot determine the working directory")?;

    let mut cfg = match &args.config {
        Some(path) => config::load_file(path)?,
        None => config::load(&cwd)?,
    };
    args.apply(&mut cfg);

    let backend = DockerCli::new(cfg.docker.clone());
    let launcher = Launcher::new(backend, cfg, cwd);

    match args.subcommand() {
        SubCommand::Run => {
            let result = launcher.launch()?;
            Ok(match result.exit_code {
                Some(0) => ExitCode::SUCCESS,
                Some(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
                None => ExitCode::FAILURE,
            })
        }
        SubCommand::Plan => {
            let spec = launcher.plan()?;
            println!("{}", serde_json::to_string_pretty(&spec)?);
            Ok(ExitCode::SUCCESS)
        }
        SubCommand::Build { force } => {
            match launcher.build(force)? {
                ImageBuildState::Present if !force => {
                    println!("image `{}` already present", launcher.config().image)
                }
                _ => println!("image `{}` built", launcher.config().image),
            }
            Ok(ExitCode::SUCCESS)
        }
        SubCommand::Prune => {
            launcher.prune()?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
