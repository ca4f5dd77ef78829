use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, instrument, warn};
use validator::Validate;

use super::answer_editor::AnswerCollectionEditor;
use super::collection::{EditableCollection, RowKey};
use super::controller::RecordController;
use super::dialog::{DialogEvent, DialogLabels, DialogState};
use super::mutation::{MutationBag, MutationOutcome, PendingMutation};
use crate::error::EditError;
use crate::forms::assignment_option_form::AssignmentOptionForm;
use crate::forms::EditableForm;
use crate::models::answer::Answer;
use crate::models::assignment_option::AssignmentOption;
use crate::models::question_type::QuestionType;
use crate::services::gateway::{AnswerGateway, AssignmentOptionGateway, AssignmentOptionRecords};
use crate::services::toast_service::Notifier;
use crate::utils::validation::joined_field_errors;

pub const ACTION_ERROR_TITLE: &str = "Error during assignment option action";
const NOT_SAVED_TITLE: &str = "Unable to save assignment option";
const QUESTION_NOT_SAVED_MESSAGE: &str =
    "Could not save assignment because question was not saved yet. Please consider saving the question first.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionIntent {
    RemoveLocal(RowKey),
    Save(RowKey),
    DeleteRemote(RowKey),
}

/// Assignment options of one question. Every option owns a nested answer
/// editor holding the answers assigned to it.
///
/// Nested answers are linked to their option by integer key: the option id
/// once persisted, a negative placeholder before that.
pub struct OptionCollectionEditor {
    controller: RecordController<OptionIntent>,
    rows: EditableCollection<AssignmentOptionForm>,
    nested: HashMap<RowKey, AnswerCollectionEditor>,
    placeholders: HashMap<RowKey, i32>,
    next_placeholder: i32,
    answers: Vec<Answer>,
    last_snapshot: Option<(Vec<AssignmentOption>, Vec<Answer>)>,
    answer_gateway: AnswerGateway,
    bag: MutationBag<AssignmentOptionRecords>,
    notifier: Arc<dyn Notifier>,
    answer_change: Option<UnboundedSender<Vec<Answer>>>,
}

impl OptionCollectionEditor {
    pub fn new(
        gateway: AssignmentOptionGateway,
        answer_gateway: AnswerGateway,
        notifier: Arc<dyn Notifier>,
        question_id: Option<i32>,
    ) -> Self {
        Self {
            controller: RecordController::new(question_id),
            rows: EditableCollection::new(),
            nested: HashMap::new(),
            placeholders: HashMap::new(),
            next_placeholder: -1,
            answers: Vec::new(),
            last_snapshot: None,
            answer_gateway,
            bag: MutationBag::new(gateway),
            notifier,
            answer_change: None,
        }
    }

    /// Flattened nested answers are sent here after every nested change.
    /// A new subscription replaces the previous one.
    pub fn subscribe_answer_changes(&mut self) -> UnboundedReceiver<Vec<Answer>> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.answer_change = Some(tx);
        rx
    }

    pub fn question_id(&self) -> Option<i32> {
        self.controller.parent_id()
    }

    pub fn set_question_id(&mut self, question_id: Option<i32>) {
        self.controller.set_parent_id(question_id);
        for editor in self.nested.values_mut() {
            editor.set_question_id(question_id);
        }
    }

    pub fn dialog(&self) -> &DialogState<OptionIntent> {
        self.controller.dialog()
    }

    pub fn gateway(&self) -> &AssignmentOptionGateway {
        self.bag.gateway()
    }

    pub fn in_flight(&self) -> usize {
        self.bag.in_flight() + self.nested.values().map(AnswerCollectionEditor::in_flight).sum::<usize>()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn form(&self, index: usize) -> Option<&AssignmentOptionForm> {
        self.rows.get(index)
    }

    pub fn has_id(&self, index: usize) -> bool {
        self.rows.has_id(index)
    }

    pub fn values(&self) -> Vec<AssignmentOption> {
        self.rows.forms().map(AssignmentOptionForm::to_record).collect()
    }

    /// Key nested answers of the option at `index` are filtered by.
    pub fn option_key(&self, index: usize) -> Option<i32> {
        let row = self.rows.rows().get(index)?;
        row.form.id.or_else(|| self.placeholders.get(&row.key).copied())
    }

    pub fn answers(&self, index: usize) -> Option<&AnswerCollectionEditor> {
        let key = self.rows.key_at(index)?;
        self.nested.get(&key)
    }

    /// All nested answers in option order.
    pub fn flattened_answers(&self) -> Vec<Answer> {
        self.rows
            .rows()
            .iter()
            .filter_map(|row| self.nested.get(&row.key))
            .flat_map(AnswerCollectionEditor::values)
            .collect()
    }

    /// Rebuilds when either snapshot differs from the last one applied.
    pub fn sync(&mut self, options: &[AssignmentOption], answers: &[Answer]) -> bool {
        if let Some((last_options, last_answers)) = &self.last_snapshot {
            if last_options.as_slice() == options && last_answers.as_slice() == answers {
                return false;
            }
        }
        self.reconcile(options, answers);
        self.last_snapshot = Some((options.to_vec(), answers.to_vec()));
        true
    }

    /// Clears and rebuilds every option with its nested answers. Nested
    /// editors of options whose id survives are kept along with their
    /// in-flight calls; the others are dropped.
    #[instrument(level = "debug", skip_all, fields(options = options.len(), answers = answers.len()))]
    pub fn reconcile(&mut self, options: &[AssignmentOption], answers: &[Answer]) {
        let previous_keys = self.rows.keys_by_id();
        let mut previous_nested = std::mem::take(&mut self.nested);

        self.rows.clear();
        self.placeholders.clear();
        self.answers = answers.to_vec();
        self.last_snapshot = None;

        for option in options {
            let reused = option
                .id
                .and_then(|id| previous_keys.get(&id).copied())
                .and_then(|key| previous_nested.remove(&key).map(|editor| (key, editor)));

            match reused {
                Some((key, editor)) => {
                    let form = AssignmentOptionForm::materialize(Some(option), self.question_id());
                    self.rows.push_with_key(key, form);
                    self.nested.insert(key, editor);
                    self.populate_nested(key, option.id);
                }
                None => {
                    self.insert_option(Some(option));
                }
            }
        }

        if !previous_nested.is_empty() {
            debug!(dropped = previous_nested.len(), "dropping nested answer editors");
        }
    }

    pub fn add_assignment_option(&mut self, record: Option<&AssignmentOption>, emit: bool) -> RowKey {
        let key = self.insert_option(record);
        if emit {
            self.emit();
        }
        key
    }

    pub fn set_option_text(&mut self, index: usize, text: impl Into<String>) -> Result<(), EditError> {
        self.rows
            .get_mut(index)
            .ok_or(EditError::IndexOutOfRange(index))?
            .text = text.into();
        self.emit();
        Ok(())
    }

    /// Runs `edit` against the nested answers of the option at `index`, then
    /// emits the flattened answers.
    pub fn edit_answers<R>(
        &mut self,
        index: usize,
        edit: impl FnOnce(&mut AnswerCollectionEditor) -> R,
    ) -> Result<R, EditError> {
        let key = self.key_at(index)?;
        let editor = self.nested.get_mut(&key).ok_or(EditError::RowNotFound)?;
        let result = edit(editor);
        self.emit();
        Ok(result)
    }

    pub fn delete_assignment_option_at_index(&mut self, index: usize) -> Result<(), EditError> {
        let key = self.key_at(index)?;

        if self.has_id(index) {
            self.controller.open_direct_action_dialog(
                "Directly delete assignment option",
                "Do you want to delete the assignment option directly? It will be removed permanently and cannot be restored.",
                OptionIntent::RemoveLocal(key),
                OptionIntent::DeleteRemote(key),
                None,
                DialogLabels::new()
                    .submit("Delete")
                    .abort("Cancel")
                    .action("Delete directly"),
            );
        } else {
            self.controller.open_confirm_dialog(
                "Delete assignment option",
                "Do you want to delete the assignment option?",
                OptionIntent::RemoveLocal(key),
                None,
                DialogLabels::new().submit("Delete").abort("Cancel"),
            );
        }
        Ok(())
    }

    pub fn open_save_dialog(&mut self, index: usize) -> Result<(), EditError> {
        let key = self.key_at(index)?;

        if self.controller.parent_id().is_none() {
            self.notifier.add_error_toast(NOT_SAVED_TITLE, QUESTION_NOT_SAVED_MESSAGE);
            return Err(EditError::ParentNotSaved);
        }

        self.controller.open_confirm_dialog(
            "Save Assignment",
            "Do you want to save the current changes to this assignment?",
            OptionIntent::Save(key),
            None,
            DialogLabels::new().submit("Save").abort("Cancel"),
        );
        Ok(())
    }

    pub fn submit_dialog(&mut self) -> Result<(), EditError> {
        self.resolve(DialogEvent::Submit)
    }

    pub fn abort_dialog(&mut self) {
        self.controller.resolve(DialogEvent::Abort);
    }

    pub fn trigger_dialog_action(&mut self) -> Result<(), EditError> {
        self.resolve(DialogEvent::Action)
    }

    /// Applies the next settled option call. Nested answer calls are
    /// settled by [`settle_all`](Self::settle_all).
    pub async fn settle(&mut self) -> Option<MutationOutcome<AssignmentOption>> {
        let outcome = self.bag.next().await?;
        self.apply(&outcome);
        Some(outcome)
    }

    /// Settles option calls first, then every nested answer call. Emits the
    /// flattened answers when a nested call settled.
    pub async fn settle_all(&mut self) -> usize {
        let mut settled = 0;
        while self.settle().await.is_some() {
            settled += 1;
        }

        let mut nested_settled = 0;
        for editor in self.nested.values_mut() {
            nested_settled += editor.settle_all().await;
        }
        if nested_settled > 0 {
            self.emit();
        }

        settled + nested_settled
    }

    fn insert_option(&mut self, record: Option<&AssignmentOption>) -> RowKey {
        let form = AssignmentOptionForm::materialize(record, self.question_id());
        let id = form.id;
        let key = self.rows.push(form);

        let mut editor = AnswerCollectionEditor::new(
            self.answer_gateway.clone(),
            Arc::clone(&self.notifier),
            QuestionType::Assignment,
            self.question_id(),
        );
        match id {
            Some(_) => editor.reconcile(QuestionType::Assignment, &self.answers, id),
            None => {
                let placeholder = self.next_placeholder;
                self.next_placeholder -= 1;
                self.placeholders.insert(key, placeholder);
                editor.rebind_option(Some(placeholder), false);
            }
        }
        self.nested.insert(key, editor);
        key
    }

    fn populate_nested(&mut self, key: RowKey, option_id: Option<i32>) {
        if let Some(editor) = self.nested.get_mut(&key) {
            editor.set_question_id(self.controller.parent_id());
            editor.reconcile(QuestionType::Assignment, &self.answers, option_id);
        }
    }

    fn emit(&self) {
        let Some(tx) = &self.answer_change else {
            return;
        };
        if self.rows.is_empty() {
            return;
        }
        if tx.send(self.flattened_answers()).is_err() {
            debug!("answer change receiver dropped");
        }
    }

    fn resolve(&mut self, event: DialogEvent) -> Result<(), EditError> {
        if !self.controller.dialog().is_open() {
            return Err(EditError::NoPendingDialog);
        }
        match self.controller.resolve(event) {
            Some(intent) => self.run(intent),
            None => Ok(()),
        }
    }

    fn run(&mut self, intent: OptionIntent) -> Result<(), EditError> {
        debug!(?intent, "assignment option dialog resolved");
        match intent {
            OptionIntent::RemoveLocal(key) => {
                self.remove_row(key).ok_or(EditError::RowNotFound)?;
                self.emit();
                Ok(())
            }
            OptionIntent::Save(key) => self.save_row(key),
            OptionIntent::DeleteRemote(key) => self.delete_row(key),
        }
    }

    fn save_row(&mut self, key: RowKey) -> Result<(), EditError> {
        let form = self.rows.find_mut(key).ok_or(EditError::RowNotFound)?;

        if let Err(errors) = form.validate() {
            form.mark_all_as_touched();
            let joined = joined_field_errors(&errors);
            self.notifier.add_error_toast(
                NOT_SAVED_TITLE,
                &format!("Could not save assignment because form is not valid: {}", joined),
            );
            return Err(EditError::InvalidForm(joined));
        }

        let mut record = form.to_record();
        if record.question_id.is_none() {
            record.question_id = self.controller.parent_id();
        }
        if record.question_id.is_none() {
            self.notifier.add_error_toast(NOT_SAVED_TITLE, QUESTION_NOT_SAVED_MESSAGE);
            return Err(EditError::ParentNotSaved);
        }

        let mutation = if record.id.is_some() {
            PendingMutation::Update { key, record }
        } else {
            PendingMutation::Create { key, record }
        };
        self.bag.spawn(mutation)
    }

    fn delete_row(&mut self, key: RowKey) -> Result<(), EditError> {
        let index = self.rows.position(key).ok_or(EditError::RowNotFound)?;
        let id = self
            .rows
            .get(index)
            .and_then(|f| f.id)
            .ok_or(EditError::NotPersisted(index))?;

        self.bag.spawn(PendingMutation::Delete { key, id })
    }

    fn remove_row(&mut self, key: RowKey) -> Option<AssignmentOptionForm> {
        self.placeholders.remove(&key);
        self.nested.remove(&key);
        self.rows.remove(key)
    }

    fn apply(&mut self, outcome: &MutationOutcome<AssignmentOption>) {
        match outcome {
            MutationOutcome::Saved { key, created, record } => {
                let Some(form) = self.rows.find_mut(*key) else {
                    warn!(%key, "saved assignment option no longer in collection");
                    return;
                };
                form.id = record.id;
                form.question_id = record.question_id.or(form.question_id);

                if *created {
                    self.placeholders.remove(key);
                    if let Some(editor) = self.nested.get_mut(key) {
                        editor.rebind_option(record.id, record.id.is_some());
                    }
                    info!(id = ?record.id, "assignment option created");
                    self.notifier.add_success_toast(
                        "Successfully created assignment option",
                        "Assignment option was created successfully.",
                    );
                    self.emit();
                } else {
                    info!(id = ?record.id, "assignment option updated");
                    self.notifier.add_success_toast(
                        "Successfully updated assignment option",
                        &format!(
                            "Assignment option with id {} was updated successfully.",
                            record.id.unwrap_or_default()
                        ),
                    );
                }
            }
            MutationOutcome::Deleted { key, id, count } => {
                if *count == 0 {
                    warn!(id, "remote reported nothing deleted");
                    return;
                }
                if self.remove_row(*key).is_none() {
                    warn!(%key, "deleted assignment option no longer in collection");
                }
                self.notifier.add_success_toast(
                    "Assignment was deleted",
                    &format!("Assignment with id {} was deleted successfully.", id),
                );
                self.emit();
            }
            MutationOutcome::Failed { message, .. } => {
                self.notifier.add_error_toast(ACTION_ERROR_TITLE, message);
            }
        }
    }

    fn key_at(&self, index: usize) -> Result<RowKey, EditError> {
        self.rows.key_at(index).ok_or(EditError::IndexOutOfRange(index))
    }
}
