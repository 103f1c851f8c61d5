//! Drives the view state from user intents and server responses.
//!
//! The controller never edits the list itself: after every successful write it
//! re-fetches the whole list from the server. Failed requests are logged and
//! leave the state as it was.

use super::client::{AddOutcome, DeleteOutcome, EditOutcome, ProgramsClient};
use super::form::{apply_edit_input, check_edit_required, FormField, ProgramForm};
use super::state::{ViewEvent, ViewState};
use crate::program_store::{FieldViolation, ProgramPatch};
use tracing::{error, warn};

/// What happened to a user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Done,
    /// Rejected by the client-side check or by the server; see `form_errors`.
    Invalid,
    NotFound,
    /// The user did not confirm.
    Declined,
    /// The request failed; the error was logged.
    Failed,
}

pub struct ProgramsController {
    client: ProgramsClient,
    state: ViewState,
    form: ProgramForm,
    form_errors: Vec<FieldViolation>,
}

impl ProgramsController {
    pub fn new(client: ProgramsClient) -> Self {
        ProgramsController {
            client,
            state: ViewState::default(),
            form: ProgramForm::default(),
            form_errors: Vec::new(),
        }
    }

    pub fn client(&self) -> &ProgramsClient {
        &self.client
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn form(&self) -> &ProgramForm {
        &self.form
    }

    pub fn form_errors(&self) -> &[FieldViolation] {
        &self.form_errors
    }

    pub fn form_error(&self, field: &str) -> Option<&str> {
        self.form_errors
            .iter()
            .find(|violation| violation.field == field)
            .map(|violation| violation.message.as_str())
    }

    fn dispatch(&mut self, event: ViewEvent) {
        let state = std::mem::take(&mut self.state);
        self.state = state.apply(event);
    }

    /// Initial load of the list.
    pub async fn mount(&mut self) -> ActionOutcome {
        self.refresh().await
    }

    pub async fn refresh(&mut self) -> ActionOutcome {
        match self.client.browse().await {
            Ok(items) => {
                self.dispatch(ViewEvent::Fetched(items));
                ActionOutcome::Done
            }
            Err(err) => {
                error!("Error fetching programs: {}", err);
                ActionOutcome::Failed
            }
        }
    }

    pub fn set_form_field(&mut self, field: FormField, value: &str) {
        self.form.set(field, value);
    }

    pub fn clear_form(&mut self) {
        self.form.reset();
        self.form_errors.clear();
    }

    /// Submits the add form. Nothing is sent while required fields are blank.
    pub async fn submit_form(&mut self) -> ActionOutcome {
        let missing = self.form.check_required();
        if !missing.is_empty() {
            self.form_errors = missing;
            return ActionOutcome::Invalid;
        }

        match self.client.add(&self.form.to_json()).await {
            Ok(AddOutcome::Created(id)) => {
                self.dispatch(ViewEvent::Added(id));
                self.clear_form();
                self.refresh().await;
                ActionOutcome::Done
            }
            Ok(AddOutcome::Rejected(violations)) => {
                self.form_errors = violations;
                ActionOutcome::Invalid
            }
            Err(err) => {
                error!("Error adding program: {}", err);
                ActionOutcome::Failed
            }
        }
    }

    pub fn start_edit(&mut self, id: i64) -> ActionOutcome {
        match self.state.find(id).cloned() {
            Some(program) => {
                self.form_errors.clear();
                self.dispatch(ViewEvent::EditStarted(program));
                ActionOutcome::Done
            }
            None => ActionOutcome::NotFound,
        }
    }

    pub fn change_edit(&mut self, field: FormField, value: &str) -> ActionOutcome {
        let mut draft = match self.state.editing.clone() {
            Some(draft) => draft,
            None => return ActionOutcome::NotFound,
        };
        match apply_edit_input(&mut draft, field, value) {
            Ok(()) => {
                self.form_errors.retain(|violation| violation.field != field.key());
                self.dispatch(ViewEvent::EditChanged(draft));
                ActionOutcome::Done
            }
            Err(violation) => {
                self.form_errors.retain(|v| v.field != violation.field);
                self.form_errors.push(violation);
                ActionOutcome::Invalid
            }
        }
    }

    pub fn cancel_edit(&mut self) {
        self.form_errors.clear();
        self.dispatch(ViewEvent::EditCancelled);
    }

    /// Sends the whole edit draft as a replacement of the stored program.
    pub async fn save_edit(&mut self) -> ActionOutcome {
        let draft = match self.state.editing.clone() {
            Some(draft) => draft,
            None => return ActionOutcome::NotFound,
        };
        let missing = check_edit_required(&draft);
        if !missing.is_empty() {
            warn!("All required fields must be filled in before saving");
            self.form_errors = missing;
            return ActionOutcome::Invalid;
        }

        match self.client.edit(draft.id, &ProgramPatch::from(&draft)).await {
            Ok(EditOutcome::Updated) => {
                self.form_errors.clear();
                self.dispatch(ViewEvent::Updated(draft.id));
                self.refresh().await;
                ActionOutcome::Done
            }
            Ok(EditOutcome::NotFound) => {
                error!("Error updating program {}: not found", draft.id);
                ActionOutcome::NotFound
            }
            Ok(EditOutcome::Rejected(violations)) => {
                self.form_errors = violations;
                ActionOutcome::Invalid
            }
            Err(err) => {
                error!("Error updating program {}: {}", draft.id, err);
                ActionOutcome::Failed
            }
        }
    }

    /// Deletes a program once `confirm` agrees. A declined confirmation sends nothing.
    pub async fn delete<F>(&mut self, id: i64, confirm: F) -> ActionOutcome
    where
        F: FnOnce(i64) -> bool,
    {
        if !confirm(id) {
            return ActionOutcome::Declined;
        }

        match self.client.delete(id).await {
            Ok(DeleteOutcome::Deleted) => {
                self.dispatch(ViewEvent::Deleted(id));
                self.refresh().await;
                ActionOutcome::Done
            }
            Ok(DeleteOutcome::NotFound) => {
                error!("Error deleting program {}: not found", id);
                ActionOutcome::NotFound
            }
            Err(err) => {
                error!("Error deleting program {}: {}", id, err);
                ActionOutcome::Failed
            }
        }
    }
}
