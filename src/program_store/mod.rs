mod models;
mod schema;
mod store;
mod trait_def;
pub mod validation;

pub use models::*;
pub use schema::PROGRAM_VERSIONED_SCHEMAS;
pub use store::SqliteProgramStore;
pub use trait_def::ProgramStore;
pub use validation::{validate_new_program, validate_program_patch};
