//! Client-side view state and its transitions.
//!
//! Transitions are pure: `ViewState::apply` consumes the current state and an
//! event and returns the next state. The server is the only source of truth for
//! the list; it is replaced wholesale on `Fetched` and never patched locally.

use crate::program_store::Program;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub items: Vec<Program>,
    /// Draft of the program currently being edited, if any.
    pub editing: Option<Program>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewEvent {
    Fetched(Vec<Program>),
    Added(i64),
    Updated(i64),
    Deleted(i64),
    EditStarted(Program),
    EditCancelled,
    EditChanged(Program),
}

impl ViewState {
    pub fn apply(self, event: ViewEvent) -> ViewState {
        match event {
            ViewEvent::Fetched(items) => ViewState { items, ..self },
            // The list only changes through the resync that follows.
            ViewEvent::Added(_) => self,
            ViewEvent::Updated(id) | ViewEvent::Deleted(id) => {
                let editing = self.editing.filter(|program| program.id != id);
                ViewState { editing, ..self }
            }
            ViewEvent::EditStarted(program) => ViewState {
                editing: Some(program),
                ..self
            },
            ViewEvent::EditCancelled => ViewState {
                editing: None,
                ..self
            },
            ViewEvent::EditChanged(program) => {
                let is_edited = matches!(&self.editing, Some(current) if current.id == program.id);
                if is_edited {
                    ViewState {
                        editing: Some(program),
                        ..self
                    }
                } else {
                    self
                }
            }
        }
    }

    pub fn find(&self, id: i64) -> Option<&Program> {
        self.items.iter().find(|program| program.id == id)
    }
}
