mod loader;
mod types;

pub use loader::{SETTINGS_FILE, load, load_file};
pub use types::{Config, Tty};
