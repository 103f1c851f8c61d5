//! Client view of the programs catalog: state model, form drafts, HTTP client
//! and the controller tying them together.

pub mod client;
pub mod controller;
pub mod form;
pub mod state;

pub use client::{AddOutcome, ClientError, DeleteOutcome, EditOutcome, ProgramsClient};
pub use controller::{ActionOutcome, ProgramsController};
pub use form::{FormField, ProgramForm};
pub use state::{ViewEvent, ViewState};
