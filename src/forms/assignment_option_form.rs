use serde::Serialize;
use validator::Validate;

use super::EditableForm;
use crate::models::assignment_option::AssignmentOption;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentOptionForm {
    #[validate(range(min = 1, message = "must be a positive identifier"))]
    pub id: Option<i32>,
    pub row_id: Option<i32>,
    #[validate(length(min = 4, max = 255, message = "must be between 4 and 255 characters"))]
    pub text: String,
    pub question_id: Option<i32>,
    #[serde(skip)]
    pub touched: bool,
}

impl AssignmentOptionForm {
    pub fn materialize(record: Option<&AssignmentOption>, question_id: Option<i32>) -> Self {
        match record {
            Some(option) => Self {
                id: option.id,
                row_id: option.row_id,
                text: option.text.clone(),
                question_id: option.question_id,
                touched: true,
            },
            None => Self {
                question_id,
                ..Default::default()
            },
        }
    }

    pub fn to_record(&self) -> AssignmentOption {
        AssignmentOption {
            id: self.id,
            text: self.text.clone(),
            row_id: self.row_id,
            question_id: self.question_id,
        }
    }
}

impl EditableForm for AssignmentOptionForm {
    fn id(&self) -> Option<i32> {
        self.id
    }

    fn mark_all_as_touched(&mut self) {
        self.touched = true;
    }
}
