use axum::extract::FromRef;

use crate::program_store::ProgramStore;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedProgramStore = Arc<dyn ProgramStore>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub program_store: GuardedProgramStore,
    pub hash: String,
}

impl ServerState {
    pub fn new(config: ServerConfig, program_store: GuardedProgramStore) -> ServerState {
        ServerState {
            config,
            start_time: Instant::now(),
            program_store,
            hash: env!("GIT_HASH").to_owned(),
        }
    }
}

impl FromRef<ServerState> for GuardedProgramStore {
    fn from_ref(input: &ServerState) -> Self {
        input.program_store.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
