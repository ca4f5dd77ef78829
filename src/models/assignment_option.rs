use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentOption {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    pub text: String,
    #[serde(default)]
    pub row_id: Option<i32>,
    #[serde(default)]
    pub question_id: Option<i32>,
}
