mod args;

pub use args::{Args, SubCommand};
