//! Shared database configuration and connection infrastructure.
//! Used by the schema verifier and its CLI.

pub mod config;
pub mod error;
pub mod infra;

pub use config::db;
pub use error::DbInfraError;
pub use infra::db::core::{close, connect};
