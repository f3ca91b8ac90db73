pub mod health;
pub mod moderate;
pub mod tokens;
pub mod usage;
