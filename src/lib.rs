//! Programs catalog server library
//!
//! This library exposes the internal modules for testing and for the CLI client.

pub mod config;
pub mod program_store;
pub mod server;
pub mod sqlite_persistence;
pub mod view;

// Re-export commonly used types for convenience
pub use program_store::{ProgramStore, SqliteProgramStore};
pub use server::{make_app, run_server, RequestsLoggingLevel, ServerConfig};
