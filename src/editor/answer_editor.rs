use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};
use validator::Validate;

use super::collection::{EditableCollection, RowKey};
use super::controller::RecordController;
use super::dialog::{DialogEvent, DialogLabels, DialogState};
use super::mutation::{MutationBag, MutationOutcome, PendingMutation};
use crate::error::EditError;
use crate::forms::answer_form::AnswerForm;
use crate::forms::EditableForm;
use crate::models::answer::Answer;
use crate::models::question_type::QuestionType;
use crate::services::gateway::{AnswerGateway, AnswerRecords};
use crate::services::toast_service::Notifier;
use crate::utils::validation::joined_field_errors;

pub const ACTION_ERROR_TITLE: &str = "Error during Answer action";
const NOT_SAVED_TITLE: &str = "Answer can not be saved";
const QUESTION_NOT_SAVED_MESSAGE: &str =
    "The question is not saved yet, therefore the answer can not be saved. Please save the Question first.";
const NO_QUESTION_ID_MESSAGE: &str =
    "The answer is not linked to a saved question, therefore it can not be saved. Please save the Question first.";
const INVALID_FORM_MESSAGE: &str = "The answer can not be saved because form is not valid.";
const OPTION_NOT_SAVED_MESSAGE: &str =
    "The assignment option is not saved yet, therefore the answer can not be saved. Please save the assignment option first.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerIntent {
    RemoveLocal(RowKey),
    Save(RowKey),
    DeleteRemote(RowKey),
}

/// External input the answer collection is rebuilt from.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnswerSnapshot {
    pub question_type: QuestionType,
    pub answers: Vec<Answer>,
    pub assigned_option_id: Option<i32>,
}

/// Rebuilds the editable collection from a snapshot.
///
/// Assignment questions keep only answers bound to `assigned_option_id`.
/// Single-choice questions keep at most one correct answer: every inserted
/// correct answer clears the ones before it, and if none was correct the
/// first one is marked. Rows whose id appears in `previous_keys` keep their
/// key.
pub fn reconcile_answers(
    question_type: QuestionType,
    answers: &[Answer],
    assigned_option_id: Option<i32>,
    previous_keys: &HashMap<i32, RowKey>,
) -> EditableCollection<AnswerForm> {
    let mut rows = EditableCollection::new();

    let selected = answers
        .iter()
        .filter(|a| !question_type.is_assignment() || a.assigned_option_id == assigned_option_id);

    for answer in selected {
        let key = answer
            .id
            .and_then(|id| previous_keys.get(&id).copied())
            .unwrap_or_default();
        let form = AnswerForm::materialize(Some(answer), assigned_option_id, None);
        let is_correct = form.is_correct;
        let index = rows.len();
        rows.push_with_key(key, form);

        if question_type.is_single_choice() && is_correct {
            mark_only_correct(&mut rows, index);
        }
    }

    if question_type.is_single_choice() && !rows.is_empty() && !rows.forms().any(|f| f.is_correct) {
        mark_only_correct(&mut rows, 0);
    }

    rows
}

fn mark_only_correct(rows: &mut EditableCollection<AnswerForm>, index: usize) {
    for (i, row) in rows.rows_mut().enumerate() {
        row.form.is_correct = i == index;
    }
}

/// Editable answer list of one question, or of one assignment option when
/// nested inside an option editor.
pub struct AnswerCollectionEditor {
    controller: RecordController<AnswerIntent>,
    rows: EditableCollection<AnswerForm>,
    question_type: QuestionType,
    assigned_option_id: Option<i32>,
    option_persisted: bool,
    last_snapshot: Option<AnswerSnapshot>,
    bag: MutationBag<AnswerRecords>,
    notifier: Arc<dyn Notifier>,
}

impl AnswerCollectionEditor {
    pub fn new(
        gateway: AnswerGateway,
        notifier: Arc<dyn Notifier>,
        question_type: QuestionType,
        question_id: Option<i32>,
    ) -> Self {
        Self {
            controller: RecordController::new(question_id),
            rows: EditableCollection::new(),
            question_type,
            assigned_option_id: None,
            option_persisted: true,
            last_snapshot: None,
            bag: MutationBag::new(gateway),
            notifier,
        }
    }

    pub fn question_type(&self) -> QuestionType {
        self.question_type
    }

    pub fn question_id(&self) -> Option<i32> {
        self.controller.parent_id()
    }

    pub fn set_question_id(&mut self, question_id: Option<i32>) {
        self.controller.set_parent_id(question_id);
    }

    pub fn assigned_option_id(&self) -> Option<i32> {
        self.assigned_option_id
    }

    pub fn dialog(&self) -> &DialogState<AnswerIntent> {
        self.controller.dialog()
    }

    pub fn gateway(&self) -> &AnswerGateway {
        self.bag.gateway()
    }

    pub fn in_flight(&self) -> usize {
        self.bag.in_flight()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn form(&self, index: usize) -> Option<&AnswerForm> {
        self.rows.get(index)
    }

    pub fn has_id(&self, index: usize) -> bool {
        self.rows.has_id(index)
    }

    /// Raw values of every row, in display order.
    pub fn values(&self) -> Vec<Answer> {
        self.rows.forms().map(AnswerForm::to_record).collect()
    }

    /// Rebuilds the collection when the snapshot differs from the last one
    /// applied. Returns whether a rebuild happened.
    pub fn sync(&mut self, snapshot: &AnswerSnapshot) -> bool {
        if self.last_snapshot.as_ref() == Some(snapshot) {
            return false;
        }
        self.reconcile(snapshot.question_type, &snapshot.answers, snapshot.assigned_option_id);
        self.last_snapshot = Some(snapshot.clone());
        true
    }

    /// Clears and rebuilds the collection. Unsaved local rows are discarded.
    #[instrument(level = "debug", skip(self, answers), fields(answers = answers.len()))]
    pub fn reconcile(&mut self, question_type: QuestionType, answers: &[Answer], assigned_option_id: Option<i32>) {
        let previous_keys = self.rows.keys_by_id();
        self.question_type = question_type;
        self.assigned_option_id = assigned_option_id;
        self.option_persisted = true;
        self.rows = reconcile_answers(question_type, answers, assigned_option_id, &previous_keys);
        self.last_snapshot = None;
    }

    pub fn add_answer(&mut self) -> RowKey {
        let form = self.controller.materialize_answer_form(None, self.assigned_option_id);
        self.rows.push(form)
    }

    pub fn set_answer_text(&mut self, index: usize, text: impl Into<String>) -> Result<(), EditError> {
        self.form_mut(index)?.answer_text = text.into();
        Ok(())
    }

    pub fn set_description(&mut self, index: usize, description: Option<String>) -> Result<(), EditError> {
        self.form_mut(index)?.description = description;
        Ok(())
    }

    pub fn set_is_correct(&mut self, index: usize, is_correct: bool) -> Result<(), EditError> {
        if is_correct && self.question_type.is_single_choice() {
            self.form_mut(index)?;
            self.handle_correct_answer_check_box_state(index);
        } else {
            self.form_mut(index)?.is_correct = is_correct;
        }
        Ok(())
    }

    /// On single-choice questions marks `index` as the only correct answer.
    pub fn handle_correct_answer_check_box_state(&mut self, index: usize) {
        if self.question_type.is_single_choice() {
            mark_only_correct(&mut self.rows, index);
        }
    }

    /// Moves every row to another option key. `persisted` is false while the
    /// key is a local placeholder; saving is refused until it is rebound to
    /// the option's server id.
    pub fn rebind_option(&mut self, assigned_option_id: Option<i32>, persisted: bool) {
        self.assigned_option_id = assigned_option_id;
        self.option_persisted = persisted;
        for row in self.rows.rows_mut() {
            row.form.assigned_option_id = assigned_option_id;
        }
    }

    pub fn delete_answer(&mut self, index: usize) -> Result<(), EditError> {
        let key = self.key_at(index)?;

        if self.has_id(index) {
            self.controller.open_direct_action_dialog(
                "Directly delete Answer",
                "Do you want to delete the answer directly? It will be removed permanently and cannot be restored.",
                AnswerIntent::RemoveLocal(key),
                AnswerIntent::DeleteRemote(key),
                None,
                DialogLabels::new()
                    .submit("Delete")
                    .abort("Cancel")
                    .action("Delete directly"),
            );
        } else {
            self.controller.open_confirm_dialog(
                "Delete Answer",
                "Are you sure you want to delete this answer?",
                AnswerIntent::RemoveLocal(key),
                None,
                DialogLabels::new().submit("Delete").abort("Cancel"),
            );
        }
        Ok(())
    }

    pub fn save_answer(&mut self, index: usize) -> Result<(), EditError> {
        let key = self.key_at(index)?;

        if self.controller.parent_id().is_none() {
            self.notifier.add_error_toast(NOT_SAVED_TITLE, QUESTION_NOT_SAVED_MESSAGE);
            return Err(EditError::ParentNotSaved);
        }
        self.ensure_option_persisted()?;

        self.controller.open_confirm_dialog(
            "Save Answer",
            "Are you sure you want to save this answer?",
            AnswerIntent::Save(key),
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

    /// Applies the next settled remote call. `None` when nothing is in flight.
    pub async fn settle(&mut self) -> Option<MutationOutcome<Answer>> {
        let outcome = self.bag.next().await?;
        self.apply(&outcome);
        Some(outcome)
    }

    pub async fn settle_all(&mut self) -> usize {
        let mut settled = 0;
        while self.settle().await.is_some() {
            settled += 1;
        }
        settled
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

    fn run(&mut self, intent: AnswerIntent) -> Result<(), EditError> {
        debug!(?intent, "answer dialog resolved");
        match intent {
            AnswerIntent::RemoveLocal(key) => self.rows.remove(key).map(|_| ()).ok_or(EditError::RowNotFound),
            AnswerIntent::Save(key) => self.save_row(key),
            AnswerIntent::DeleteRemote(key) => self.delete_row(key),
        }
    }

    fn save_row(&mut self, key: RowKey) -> Result<(), EditError> {
        let form = self.rows.find_mut(key).ok_or(EditError::RowNotFound)?;

        if let Err(errors) = form.validate() {
            form.mark_all_as_touched();
            self.notifier.add_error_toast(NOT_SAVED_TITLE, INVALID_FORM_MESSAGE);
            return Err(EditError::InvalidForm(joined_field_errors(&errors)));
        }

        let record = form.to_record();
        if record.question_id.is_none() {
            self.notifier.add_error_toast(NOT_SAVED_TITLE, NO_QUESTION_ID_MESSAGE);
            return Err(EditError::ParentNotSaved);
        }
        self.ensure_option_persisted()?;

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

    fn apply(&mut self, outcome: &MutationOutcome<Answer>) {
        match outcome {
            MutationOutcome::Saved { key, created, record } => {
                let Some(position) = self.rows.position(*key) else {
                    warn!(%key, "saved answer no longer in collection");
                    return;
                };
                if let Some(form) = self.rows.get_mut(position) {
                    form.id = record.id;
                }

                let verb = if *created { "created" } else { "updated" };
                info!(id = ?record.id, verb, "answer saved");
                self.notifier.add_success_toast(
                    "Edit Answer success",
                    &format!("Answer: {} was {} successfully", position + 1, verb),
                );
            }
            MutationOutcome::Deleted { key, id, count } => {
                if *count == 0 {
                    warn!(id, "remote reported nothing deleted");
                    return;
                }
                if self.rows.remove(*key).is_none() {
                    warn!(%key, "deleted answer no longer in collection");
                }
                self.notifier.add_success_toast(
                    "Deleted Answer",
                    &format!("Answer with id: {} was deleted successfully.", id),
                );
            }
            MutationOutcome::Failed { message, .. } => {
                self.notifier.add_error_toast(ACTION_ERROR_TITLE, message);
            }
        }
    }

    fn ensure_option_persisted(&self) -> Result<(), EditError> {
        if self.question_type.is_assignment() && !self.option_persisted {
            self.notifier.add_error_toast(NOT_SAVED_TITLE, OPTION_NOT_SAVED_MESSAGE);
            return Err(EditError::ParentNotSaved);
        }
        Ok(())
    }

    fn key_at(&self, index: usize) -> Result<RowKey, EditError> {
        self.rows.key_at(index).ok_or(EditError::IndexOutOfRange(index))
    }

    fn form_mut(&mut self, index: usize) -> Result<&mut AnswerForm, EditError> {
        self.rows.get_mut(index).ok_or(EditError::IndexOutOfRange(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::gateway::CrudGateway;
    use crate::services::remote::MockRemoteBoundary;
    use crate::services::toast_service::{MockNotifier, ToastService};
    use serde_json::json;

    fn answer(id: Option<i32>, text: &str, is_correct: bool) -> Answer {
        Answer {
            id,
            answer_text: text.to_string(),
            is_correct,
            question_id: Some(1),
            ..Default::default()
        }
    }

    fn editor_with(
        mock: MockRemoteBoundary,
        question_type: QuestionType,
        question_id: Option<i32>,
    ) -> (AnswerCollectionEditor, ToastService) {
        let toasts = ToastService::new();
        let editor = AnswerCollectionEditor::new(
            CrudGateway::new(Arc::new(mock)),
            Arc::new(toasts.clone()),
            question_type,
            question_id,
        );
        (editor, toasts)
    }

    #[test]
    fn single_choice_keeps_last_correct_answer() {
        let answers = vec![
            answer(Some(1), "First answer", true),
            answer(Some(2), "Second answer", false),
            answer(Some(3), "Third answer", true),
        ];
        let rows = reconcile_answers(QuestionType::SingleChoice, &answers, None, &HashMap::new());
        let flags: Vec<bool> = rows.forms().map(|f| f.is_correct).collect();
        assert_eq!(flags, vec![false, false, true]);
    }

    #[test]
    fn single_choice_without_correct_marks_first() {
        let answers = vec![
            answer(Some(1), "First answer", false),
            answer(Some(2), "Second answer", false),
        ];
        let rows = reconcile_answers(QuestionType::SingleChoice, &answers, None, &HashMap::new());
        let flags: Vec<bool> = rows.forms().map(|f| f.is_correct).collect();
        assert_eq!(flags, vec![true, false]);
    }

    #[test]
    fn multiple_choice_keeps_source_flags() {
        let answers = vec![
            answer(Some(1), "First answer", true),
            answer(Some(2), "Second answer", true),
        ];
        let rows = reconcile_answers(QuestionType::MultipleChoice, &answers, None, &HashMap::new());
        assert!(rows.forms().all(|f| f.is_correct));
    }

    #[test]
    fn assignment_filters_by_option() {
        let mut bound = answer(Some(1), "Bound answer", false);
        bound.assigned_option_id = Some(5);
        let mut other = answer(Some(2), "Other answer", false);
        other.assigned_option_id = Some(6);

        let rows = reconcile_answers(QuestionType::Assignment, &[bound, other], Some(5), &HashMap::new());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows.get(0).unwrap().id, Some(1));
    }

    #[test]
    fn rebuild_keeps_keys_of_persisted_rows() {
        let (mut editor, _) = editor_with(MockRemoteBoundary::new(), QuestionType::MultipleChoice, Some(1));
        let answers = vec![answer(Some(8), "Persisted one", false)];
        editor.reconcile(QuestionType::MultipleChoice, &answers, None);
        let key = editor.rows.key_at(0).unwrap();

        editor.add_answer();
        editor.reconcile(QuestionType::MultipleChoice, &answers, None);

        assert_eq!(editor.len(), 1);
        assert_eq!(editor.rows.key_at(0), Some(key));
    }

    #[test]
    fn sync_skips_identical_snapshots() {
        let (mut editor, _) = editor_with(MockRemoteBoundary::new(), QuestionType::SingleChoice, Some(1));
        let snapshot = AnswerSnapshot {
            question_type: QuestionType::SingleChoice,
            answers: vec![answer(Some(1), "Only answer", true)],
            assigned_option_id: None,
        };

        assert!(editor.sync(&snapshot));
        editor.add_answer();
        assert!(!editor.sync(&snapshot));
        assert_eq!(editor.len(), 2);
    }

    #[test]
    fn checkbox_fan_out_is_exclusive() {
        let (mut editor, _) = editor_with(MockRemoteBoundary::new(), QuestionType::SingleChoice, Some(1));
        editor.add_answer();
        editor.add_answer();

        editor.handle_correct_answer_check_box_state(0);

        assert!(editor.form(0).unwrap().is_correct);
        assert!(!editor.form(1).unwrap().is_correct);

        editor.set_is_correct(1, true).unwrap();
        assert!(!editor.form(0).unwrap().is_correct);
        assert!(editor.form(1).unwrap().is_correct);
    }

    #[test]
    fn unpersisted_delete_opens_plain_confirm() {
        let (mut editor, _) = editor_with(MockRemoteBoundary::new(), QuestionType::SingleChoice, Some(1));
        editor.add_answer();

        editor.delete_answer(0).unwrap();
        assert!(matches!(editor.dialog(), DialogState::Confirming(_)));

        editor.submit_dialog().unwrap();
        assert!(editor.is_empty());
        assert!(!editor.dialog().is_open());
    }

    #[test]
    fn staged_removal_of_persisted_answer_stays_local() {
        let mut mock = MockRemoteBoundary::new();
        mock.expect_invoke().never();
        let (mut editor, _) = editor_with(mock, QuestionType::MultipleChoice, Some(1));
        editor.reconcile(QuestionType::MultipleChoice, &[answer(Some(4), "Persisted one", false)], None);

        editor.delete_answer(0).unwrap();
        assert!(editor.dialog().is_direct_action());
        editor.submit_dialog().unwrap();

        assert!(editor.is_empty());
        assert_eq!(editor.in_flight(), 0);
    }

    #[test]
    fn save_without_question_never_reaches_gateway() {
        let mut mock = MockRemoteBoundary::new();
        mock.expect_invoke().never();
        let mut notifier = MockNotifier::new();
        notifier
            .expect_add_error_toast()
            .withf(|title, _| title == "Answer can not be saved")
            .times(1)
            .return_const(());

        let mut editor = AnswerCollectionEditor::new(
            CrudGateway::new(Arc::new(mock)),
            Arc::new(notifier),
            QuestionType::SingleChoice,
            None,
        );
        editor.add_answer();

        assert!(matches!(editor.save_answer(0), Err(EditError::ParentNotSaved)));
        assert!(!editor.dialog().is_open());
    }

    #[tokio::test]
    async fn invalid_form_is_marked_touched_and_not_sent() {
        let mut mock = MockRemoteBoundary::new();
        mock.expect_invoke().never();
        let (mut editor, toasts) = editor_with(mock, QuestionType::SingleChoice, Some(1));
        editor.add_answer();
        editor.set_answer_text(0, "abc").unwrap();

        editor.save_answer(0).unwrap();
        let result = editor.submit_dialog();

        assert!(matches!(result, Err(EditError::InvalidForm(_))));
        assert!(editor.form(0).unwrap().touched);
        assert_eq!(toasts.errors().len(), 1);
        assert_eq!(editor.in_flight(), 0);
        assert!(!editor.dialog().is_open());
    }

    #[tokio::test]
    async fn create_writes_id_back_into_row() {
        let mut mock = MockRemoteBoundary::new();
        mock.expect_invoke()
            .withf(|command, payload| command == "create_answer" && payload["answer"]["questionId"] == 1)
            .times(1)
            .returning(|_, payload| {
                let mut answer = payload["answer"].clone();
                answer["id"] = json!(21);
                Ok(answer)
            });
        let (mut editor, toasts) = editor_with(mock, QuestionType::SingleChoice, Some(1));
        editor.add_answer();
        editor.set_answer_text(0, "Fearless concurrency").unwrap();

        editor.save_answer(0).unwrap();
        editor.submit_dialog().unwrap();
        assert!(!editor.dialog().is_open());
        assert_eq!(editor.settle_all().await, 1);

        assert_eq!(editor.form(0).unwrap().id, Some(21));
        assert_eq!(toasts.successes()[0].message, "Answer: 1 was created successfully");
    }

    #[tokio::test]
    async fn direct_delete_removes_row_after_success() {
        let mut mock = MockRemoteBoundary::new();
        mock.expect_invoke()
            .withf(|command, payload| command == "delete_answer" && payload["id"] == 4)
            .times(1)
            .returning(|_, _| Ok(json!(1)));
        let (mut editor, toasts) = editor_with(mock, QuestionType::MultipleChoice, Some(1));
        editor.reconcile(
            QuestionType::MultipleChoice,
            &[answer(Some(4), "Persisted one", false), answer(None, "Local one", false)],
            None,
        );

        editor.delete_answer(0).unwrap();
        editor.trigger_dialog_action().unwrap();
        assert!(!editor.dialog().is_open());
        assert_eq!(editor.len(), 2);

        editor.settle_all().await;
        assert_eq!(editor.len(), 1);
        assert_eq!(editor.form(0).unwrap().answer_text, "Local one");
        assert_eq!(toasts.successes()[0].title, "Deleted Answer");
    }

    #[tokio::test]
    async fn remote_failure_is_toasted_and_row_kept() {
        let mut mock = MockRemoteBoundary::new();
        mock.expect_invoke()
            .returning(|_, _| Err(crate::models::failure::Failure::Message("database is locked".into())));
        let (mut editor, toasts) = editor_with(mock, QuestionType::MultipleChoice, Some(1));
        editor.reconcile(QuestionType::MultipleChoice, &[answer(Some(4), "Persisted one", false)], None);

        editor.delete_answer(0).unwrap();
        editor.trigger_dialog_action().unwrap();
        editor.settle_all().await;

        assert_eq!(editor.len(), 1);
        let errors = toasts.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].title, ACTION_ERROR_TITLE);
        assert_eq!(errors[0].message, "database is locked");
        assert_eq!(editor.gateway().errors(), vec!["database is locked".to_string()]);
    }

    #[tokio::test]
    async fn outcome_for_discarded_row_is_ignored() {
        let mut mock = MockRemoteBoundary::new();
        mock.expect_invoke().returning(|_, payload| {
            let mut answer = payload["answer"].clone();
            answer["id"] = json!(30);
            Ok(answer)
        });
        let (mut editor, _) = editor_with(mock, QuestionType::MultipleChoice, Some(1));
        editor.add_answer();
        editor.set_answer_text(0, "Unsaved draft answer").unwrap();
        editor.save_answer(0).unwrap();
        editor.submit_dialog().unwrap();

        let replacement = [answer(Some(2), "Fresh from server", false)];
        editor.reconcile(QuestionType::MultipleChoice, &replacement, None);
        editor.settle_all().await;

        assert_eq!(editor.len(), 1);
        assert_eq!(editor.form(0).unwrap().id, Some(2));
    }

    #[test]
    fn submit_without_runtime_returns_error() {
        let mut mock = MockRemoteBoundary::new();
        mock.expect_invoke().never();
        let (mut editor, _) = editor_with(mock, QuestionType::MultipleChoice, Some(1));
        editor.add_answer();
        editor.set_answer_text(0, "Fearless concurrency").unwrap();

        editor.save_answer(0).unwrap();
        let result = editor.submit_dialog();

        assert!(matches!(result, Err(EditError::NoRuntime)));
        assert!(!editor.dialog().is_open());
        assert_eq!(editor.in_flight(), 0);
        assert_eq!(editor.form(0).unwrap().id, None);
    }

    #[test]
    fn dialog_events_without_dialog_are_rejected() {
        let (mut editor, _) = editor_with(MockRemoteBoundary::new(), QuestionType::SingleChoice, Some(1));
        assert!(matches!(editor.submit_dialog(), Err(EditError::NoPendingDialog)));
        assert!(matches!(editor.delete_answer(3), Err(EditError::IndexOutOfRange(3))));
    }
}
