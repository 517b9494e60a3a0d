//! Local bootstrap for the VERTEX dashboard container.
//!
//! Loads PostgreSQL credentials from a `.env` file, makes sure the image
//! exists (building it once if not), and runs it with a fixed mount, port
//! mapping and environment through the Docker CLI.

pub mod cli;
pub mod config;
pub mod docker;
pub mod env;
pub mod error;
pub mod launch;
pub mod observability;

pub use error::{LaunchError, Result};
pub use launch::Launcher;
