pub mod config;
pub mod error;
mod http_layers;
pub mod metrics;
pub mod programs_routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::ProgramsApiError;
pub use http_layers::*;
pub use server::{make_app, run_server};
