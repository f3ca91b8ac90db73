pub mod token;
pub mod usage;

pub use token::*;
pub use usage::*;
