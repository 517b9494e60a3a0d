// Environment files: parsing, loading, and the mapping handed to the container.

mod load;
mod parse;
mod types;

pub use load::{load_environment, load_environment_with};
pub use parse::parse_env;
pub use types::{EnvRequirement, EnvironmentConfig, RECOGNIZED_VARS, RedactedVar, is_secret};
