use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::editor::answer_editor::{AnswerCollectionEditor, AnswerSnapshot};
use crate::editor::option_editor::OptionCollectionEditor;
use crate::error::{EditError, Error, Result};
use crate::models::answer::Answer;
use crate::models::assignment_option::AssignmentOption;
use crate::models::question_type::QuestionType;
use crate::models::toast::Toast;
use crate::services::gateway::CrudGateway;
use crate::services::remote::RemoteBoundary;
use crate::services::toast_service::ToastService;
use crate::utils::validation::validate;

/// Question context plus the ordered edits replayed against it.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SessionScript {
    #[validate(range(min = 1, message = "must be a persisted question id"))]
    #[serde(default)]
    pub question_id: Option<i32>,
    #[serde(default)]
    pub question_type: QuestionType,
    #[serde(default)]
    pub answers: Vec<Answer>,
    #[serde(default)]
    pub options: Vec<AssignmentOption>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl SessionScript {
    pub fn from_json(raw: &str) -> Result<Self> {
        let script: SessionScript = serde_json::from_str(raw)?;
        validate(&script)?;

        if !script.options.is_empty() && !script.question_type.is_assignment() {
            return Err(Error::BadRequest(format!(
                "options are only allowed on ASSIGNMENT questions, got {:?}",
                script.question_type
            )));
        }
        Ok(script)
    }
}

/// Which editor a dialog step is aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DialogTarget {
    #[default]
    Answers,
    Options,
    Nested(usize),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Step {
    AddAnswer,
    SetAnswerText { index: usize, text: String },
    SetDescription { index: usize, description: Option<String> },
    SetIsCorrect { index: usize, is_correct: bool },
    CheckCorrect { index: usize },
    SaveAnswer { index: usize },
    DeleteAnswer { index: usize },
    AddOption,
    SetOptionText { index: usize, text: String },
    SaveOption { index: usize },
    DeleteOption { index: usize },
    AddNestedAnswer { option: usize },
    SetNestedAnswerText { option: usize, index: usize, text: String },
    SaveNestedAnswer { option: usize, index: usize },
    DeleteNestedAnswer { option: usize, index: usize },
    Submit {
        #[serde(default)]
        target: DialogTarget,
    },
    Abort {
        #[serde(default)]
        target: DialogTarget,
    },
    Action {
        #[serde(default)]
        target: DialogTarget,
    },
    SetQuestionId { question_id: Option<i32> },
    Snapshot {
        #[serde(default)]
        answers: Vec<Answer>,
        #[serde(default)]
        options: Vec<AssignmentOption>,
    },
    Settle,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepReport {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionReport {
    #[serde(flatten)]
    pub option: AssignmentOption,
    pub answers: Vec<Answer>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionReport {
    pub question_id: Option<i32>,
    pub question_type: QuestionType,
    pub answers: Vec<Answer>,
    pub options: Vec<OptionReport>,
    pub assignment_answers: Option<Vec<Answer>>,
    pub steps: Vec<StepReport>,
    pub toasts: Vec<Toast>,
}

/// Both editors of one question wired to a shared boundary and toast list.
pub struct Session {
    question_type: QuestionType,
    answers: AnswerCollectionEditor,
    options: OptionCollectionEditor,
    answer_changes: UnboundedReceiver<Vec<Answer>>,
    assignment_answers: Option<Vec<Answer>>,
    toasts: ToastService,
    reports: Vec<StepReport>,
}

impl Session {
    pub fn new(boundary: Arc<dyn RemoteBoundary>, script: &SessionScript) -> Self {
        let toasts = ToastService::new();
        let answer_gateway = CrudGateway::new(Arc::clone(&boundary));

        let mut answers = AnswerCollectionEditor::new(
            answer_gateway.clone(),
            Arc::new(toasts.clone()),
            script.question_type,
            script.question_id,
        );
        answers.sync(&AnswerSnapshot {
            question_type: script.question_type,
            answers: script.answers.clone(),
            assigned_option_id: None,
        });

        let mut options = OptionCollectionEditor::new(
            CrudGateway::new(boundary),
            answer_gateway,
            Arc::new(toasts.clone()),
            script.question_id,
        );
        let answer_changes = options.subscribe_answer_changes();
        if script.question_type.is_assignment() {
            options.sync(&script.options, &script.answers);
        }

        Self {
            question_type: script.question_type,
            answers,
            options,
            answer_changes,
            assignment_answers: None,
            toasts,
            reports: Vec::new(),
        }
    }

    pub fn answers(&self) -> &AnswerCollectionEditor {
        &self.answers
    }

    pub fn options(&self) -> &OptionCollectionEditor {
        &self.options
    }

    pub fn toasts(&self) -> &ToastService {
        &self.toasts
    }

    /// Replays every step, settling remote calls after each one. Local
    /// failures are recorded per step and never stop the replay.
    #[instrument(skip_all, fields(steps = steps.len()))]
    pub async fn run(&mut self, steps: &[Step]) {
        for (index, step) in steps.iter().enumerate() {
            let error = match self.apply(step) {
                Ok(()) => None,
                Err(err) => {
                    warn!(index, error = %err, "step rejected");
                    Some(err.to_string())
                }
            };
            self.settle().await;
            self.reports.push(StepReport { index, error });
        }
        info!(toasts = self.toasts.toasts().len(), "session replayed");
    }

    pub async fn settle(&mut self) -> usize {
        let settled = self.answers.settle_all().await + self.options.settle_all().await;
        self.drain_answer_changes();
        settled
    }

    pub fn apply(&mut self, step: &Step) -> std::result::Result<(), EditError> {
        let result = self.dispatch(step);
        self.drain_answer_changes();
        result
    }

    fn dispatch(&mut self, step: &Step) -> std::result::Result<(), EditError> {
        match step {
            Step::AddAnswer => {
                self.answers.add_answer();
                Ok(())
            }
            Step::SetAnswerText { index, text } => self.answers.set_answer_text(*index, text.as_str()),
            Step::SetDescription { index, description } => {
                self.answers.set_description(*index, description.clone())
            }
            Step::SetIsCorrect { index, is_correct } => self.answers.set_is_correct(*index, *is_correct),
            Step::CheckCorrect { index } => {
                self.answers
                    .form(*index)
                    .ok_or(EditError::IndexOutOfRange(*index))?;
                self.answers.handle_correct_answer_check_box_state(*index);
                Ok(())
            }
            Step::SaveAnswer { index } => self.answers.save_answer(*index),
            Step::DeleteAnswer { index } => self.answers.delete_answer(*index),
            Step::AddOption => {
                self.options.add_assignment_option(None, true);
                Ok(())
            }
            Step::SetOptionText { index, text } => self.options.set_option_text(*index, text.as_str()),
            Step::SaveOption { index } => self.options.open_save_dialog(*index),
            Step::DeleteOption { index } => self.options.delete_assignment_option_at_index(*index),
            Step::AddNestedAnswer { option } => self.options.edit_answers(*option, |a| {
                a.add_answer();
            }),
            Step::SetNestedAnswerText { option, index, text } => self
                .options
                .edit_answers(*option, |a| a.set_answer_text(*index, text.as_str()))?,
            Step::SaveNestedAnswer { option, index } => {
                self.options.edit_answers(*option, |a| a.save_answer(*index))?
            }
            Step::DeleteNestedAnswer { option, index } => {
                self.options.edit_answers(*option, |a| a.delete_answer(*index))?
            }
            Step::Submit { target } => self.on_target(*target, |t| t.submit()),
            Step::Abort { target } => self.on_target(*target, |t| {
                t.abort();
                Ok(())
            }),
            Step::Action { target } => self.on_target(*target, |t| t.action()),
            Step::SetQuestionId { question_id } => {
                self.answers.set_question_id(*question_id);
                self.options.set_question_id(*question_id);
                Ok(())
            }
            Step::Snapshot { answers, options } => {
                self.answers.sync(&AnswerSnapshot {
                    question_type: self.question_type,
                    answers: answers.clone(),
                    assigned_option_id: None,
                });
                if self.question_type.is_assignment() {
                    self.options.sync(options, answers);
                }
                Ok(())
            }
            Step::Settle => Ok(()),
        }
    }

    fn on_target(
        &mut self,
        target: DialogTarget,
        f: impl FnOnce(&mut dyn DialogDriver) -> std::result::Result<(), EditError>,
    ) -> std::result::Result<(), EditError> {
        match target {
            DialogTarget::Answers => f(&mut self.answers),
            DialogTarget::Options => f(&mut self.options),
            DialogTarget::Nested(option) => self.options.edit_answers(option, |a| f(a))?,
        }
    }

    fn drain_answer_changes(&mut self) {
        while let Ok(answers) = self.answer_changes.try_recv() {
            self.assignment_answers = Some(answers);
        }
    }

    pub fn report(&self) -> SessionReport {
        let options = self
            .options
            .values()
            .into_iter()
            .enumerate()
            .map(|(index, option)| OptionReport {
                option,
                answers: self.options.answers(index).map(|a| a.values()).unwrap_or_default(),
            })
            .collect();

        SessionReport {
            question_id: self.answers.question_id(),
            question_type: self.question_type,
            answers: self.answers.values(),
            options,
            assignment_answers: self.assignment_answers.clone(),
            steps: self.reports.clone(),
            toasts: self.toasts.toasts(),
        }
    }
}

/// Dialog resolution shared by both editors so steps can address either.
trait DialogDriver {
    fn submit(&mut self) -> std::result::Result<(), EditError>;
    fn abort(&mut self);
    fn action(&mut self) -> std::result::Result<(), EditError>;
}

impl DialogDriver for AnswerCollectionEditor {
    fn submit(&mut self) -> std::result::Result<(), EditError> {
        self.submit_dialog()
    }

    fn abort(&mut self) {
        self.abort_dialog()
    }

    fn action(&mut self) -> std::result::Result<(), EditError> {
        self.trigger_dialog_action()
    }
}

impl DialogDriver for OptionCollectionEditor {
    fn submit(&mut self) -> std::result::Result<(), EditError> {
        self.submit_dialog()
    }

    fn abort(&mut self) {
        self.abort_dialog()
    }

    fn action(&mut self) -> std::result::Result<(), EditError> {
        self.trigger_dialog_action()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tagged_steps() {
        let script = SessionScript::from_json(
            r#"{
                "questionId": 3,
                "questionType": "SINGLE_CHOICE",
                "steps": [
                    {"op": "addAnswer"},
                    {"op": "setAnswerText", "index": 0, "text": "Zero-cost abstractions"},
                    {"op": "saveAnswer", "index": 0},
                    {"op": "submit"},
                    {"op": "action", "target": {"nested": 1}},
                    {"op": "setQuestionId", "questionId": null}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(script.question_id, Some(3));
        assert_eq!(script.steps.len(), 6);
        assert!(matches!(script.steps[3], Step::Submit { target: DialogTarget::Answers }));
        assert!(matches!(script.steps[4], Step::Action { target: DialogTarget::Nested(1) }));
        assert!(matches!(script.steps[5], Step::SetQuestionId { question_id: None }));
    }

    #[test]
    fn rejects_options_on_non_assignment_question() {
        let err = SessionScript::from_json(
            r#"{"questionType": "MULTIPLE_CHOICE", "options": [{"text": "Left"}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::BadRequest(_)));
    }

    #[test]
    fn rejects_non_positive_question_id() {
        let err = SessionScript::from_json(r#"{"questionId": 0}"#).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
}
