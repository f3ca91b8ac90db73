pub mod check;
pub mod commands;
pub mod serve;
pub mod token;

pub use commands::{Cli, Commands};
