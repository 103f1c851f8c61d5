//! Shared constants for end-to-end tests
//!
//! When the seeded programs change, update only this file and `fixtures.rs`.

// ============================================================================
// Seeded Programs
// ============================================================================

/// Id of "Dune", the first seeded program
pub const DUNE_ID: i64 = 1;

/// Id of "Amélie", the second seeded program
pub const AMELIE_ID: i64 = 2;

/// Number of programs seeded by `TestServer::spawn_seeded()`
pub const SEEDED_PROGRAMS_COUNT: usize = 2;

/// An id that is never assigned in seeded databases
pub const MISSING_PROGRAM_ID: i64 = 999;

// ============================================================================
// Timeouts
// ============================================================================

/// Maximum time to wait for the server to answer on `/`
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Delay between readiness probes
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 20;

/// Timeout of every request made by `TestClient`
pub const REQUEST_TIMEOUT_SECS: u64 = 10;
