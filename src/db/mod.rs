pub mod connection;
pub mod schema;
pub mod tokens;
pub mod usages;

pub use connection::Database;
