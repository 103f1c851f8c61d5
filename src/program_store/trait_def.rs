//! ProgramStore trait definition.

use super::models::{NewProgram, Program, ProgramPatch};
use anyhow::Result;

/// Storage backend for programs.
///
/// Lookups of a missing id are not errors: `read_one` returns `None` and
/// `update`/`delete` return `false`. An `Err` always means the backend failed.
pub trait ProgramStore: Send + Sync {
    /// Every stored program, ordered by id.
    fn read_all(&self) -> Result<Vec<Program>>;

    fn read_one(&self, id: i64) -> Result<Option<Program>>;

    /// Inserts a program and returns the id assigned to it.
    fn create(&self, program: &NewProgram) -> Result<i64>;

    /// Applies a partial update. Returns whether a row was affected.
    fn update(&self, id: i64, patch: &ProgramPatch) -> Result<bool>;

    /// Hard-deletes a program. Returns whether a row was affected.
    fn delete(&self, id: i64) -> Result<bool>;

    fn count(&self) -> Result<usize>;
}
