use serde::Serialize;
use validator::Validate;

use super::EditableForm;
use crate::models::answer::Answer;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AnswerForm {
    pub id: Option<i32>,
    #[validate(
        length(min = 5, max = 255, message = "must be between 5 and 255 characters"),
        custom(function = "crate::utils::validation::validate_text_chars")
    )]
    pub answer_text: String,
    #[validate(length(min = 5, max = 255, message = "must be between 5 and 255 characters"))]
    pub description: Option<String>,
    pub is_correct: bool,
    pub assigned_option_id: Option<i32>,
    pub question_id: Option<i32>,
    #[serde(skip)]
    pub touched: bool,
    #[serde(skip)]
    pub(crate) created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl AnswerForm {
    /// Builds a form for `record`, or an empty one bound to `assigned_option_id`.
    /// `question_id` is the owning question's persisted id; an existing record
    /// keeps its own `question_id` instead.
    pub fn materialize(
        record: Option<&Answer>,
        assigned_option_id: Option<i32>,
        question_id: Option<i32>,
    ) -> Self {
        match record {
            Some(answer) => Self {
                id: answer.id,
                answer_text: answer.answer_text.clone(),
                description: answer.description.clone(),
                is_correct: answer.is_correct,
                assigned_option_id: answer.assigned_option_id.or(assigned_option_id),
                question_id: answer.question_id,
                touched: true,
                created_at: answer.created_at,
            },
            None => Self {
                assigned_option_id,
                question_id,
                ..Default::default()
            },
        }
    }

    pub fn to_record(&self) -> Answer {
        Answer {
            id: self.id,
            answer_text: self.answer_text.clone(),
            description: self.description.clone().filter(|d| !d.is_empty()),
            is_correct: self.is_correct,
            assigned_option_id: self.assigned_option_id,
            question_id: self.question_id,
            created_at: self.created_at,
            updated_at: None,
        }
    }
}

impl EditableForm for AnswerForm {
    fn id(&self) -> Option<i32> {
        self.id
    }

    fn mark_all_as_touched(&mut self) {
        self.touched = true;
    }
}
