use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionType {
    #[default]
    SingleChoice,
    MultipleChoice,
    Assignment,
    Code,
}

impl QuestionType {
    pub fn is_single_choice(self) -> bool {
        matches!(self, QuestionType::SingleChoice)
    }

    pub fn is_assignment(self) -> bool {
        matches!(self, QuestionType::Assignment)
    }
}
