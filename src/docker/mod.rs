// Docker backend: argument assembly, CLI invocation, build serialization.

pub mod commands;
pub mod engine;
pub mod lock;
pub mod types;

pub use engine::{ContainerBackend, DockerCli, user_args};
pub use lock::BuildLock;
pub use types::{
    ContainerCommand, ContainerResult, ImageBuildState, ImageDescriptor, LaunchSpec, PortMapping,
    VolumeBind,
};
