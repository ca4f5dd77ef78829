use tracing::debug;

use super::dialog::{DialogEvent, DialogLabels, DialogState};
use crate::forms::answer_form::AnswerForm;
use crate::models::answer::Answer;

/// Dialog slot and parent binding shared by the collection editors.
///
/// Nothing here talks to the remote boundary; every method is a plain state
/// transition.
#[derive(Debug, Clone)]
pub struct RecordController<I> {
    dialog: DialogState<I>,
    parent_id: Option<i32>,
}

impl<I> Default for RecordController<I> {
    fn default() -> Self {
        Self {
            dialog: DialogState::Closed,
            parent_id: None,
        }
    }
}

impl<I: std::fmt::Debug> RecordController<I> {
    pub fn new(parent_id: Option<i32>) -> Self {
        Self {
            dialog: DialogState::Closed,
            parent_id,
        }
    }

    pub fn dialog(&self) -> &DialogState<I> {
        &self.dialog
    }

    /// Persisted id of the owning question, if it has one.
    pub fn parent_id(&self) -> Option<i32> {
        self.parent_id
    }

    pub fn set_parent_id(&mut self, parent_id: Option<i32>) {
        self.parent_id = parent_id;
    }

    pub fn open_confirm_dialog(
        &mut self,
        title: impl Into<String>,
        message: impl Into<String>,
        on_submit: I,
        on_abort: Option<I>,
        labels: DialogLabels,
    ) {
        self.replace(DialogState::confirm(title, message, on_submit, on_abort, labels));
    }

    pub fn open_direct_action_dialog(
        &mut self,
        title: impl Into<String>,
        message: impl Into<String>,
        on_submit: I,
        on_action: I,
        on_abort: Option<I>,
        labels: DialogLabels,
    ) {
        self.replace(DialogState::direct_action(
            title, message, on_submit, on_action, on_abort, labels,
        ));
    }

    pub fn reset_dialog(&mut self) {
        if matches!(self.dialog, DialogState::Confirming(_)) {
            self.dialog = DialogState::Closed;
        }
    }

    pub fn reset_action_dialog(&mut self) {
        if self.dialog.is_direct_action() {
            self.dialog = DialogState::Closed;
        }
    }

    pub fn resolve(&mut self, event: DialogEvent) -> Option<I> {
        let (next, intent) = std::mem::take(&mut self.dialog).transition(event);
        self.dialog = next;
        intent
    }

    pub fn materialize_answer_form(&self, record: Option<&Answer>, assigned_option_id: Option<i32>) -> AnswerForm {
        AnswerForm::materialize(record, assigned_option_id, self.parent_id)
    }

    fn replace(&mut self, next: DialogState<I>) {
        if let Some(title) = self.dialog.title() {
            debug!(discarded = title, "replacing unresolved dialog");
        }
        self.dialog = next;
    }
}
