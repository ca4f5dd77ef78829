use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::services::error_formatter;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Rejection shape of a remote CRUD command.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrudError {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub validation_errors: Option<Vec<ValidationError>>,
}

/// Validation failure of one element of a nested collection, mirroring the
/// nesting of the collection itself.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedValidationError {
    pub index: usize,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub errors: Vec<ValidationError>,
    #[serde(default)]
    pub nested_errors: Vec<ExtendedValidationError>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{}", error_formatter::format(self))]
pub enum Failure {
    Message(String),
    Native(String),
    Crud(CrudError),
    ExtendedValidation(ExtendedValidationError),
    Other(JsonValue),
}

impl Failure {
    pub fn native(err: impl std::fmt::Display) -> Self {
        Failure::Native(err.to_string())
    }

    /// Classifies a raw rejection value. An `index` key marks the recursive
    /// validation shape and takes precedence over the CRUD shape, which also
    /// carries a `message`.
    pub fn from_value(value: JsonValue) -> Self {
        match value {
            JsonValue::String(message) => Failure::Message(message),
            JsonValue::Object(ref map) if map.contains_key("index") => {
                match serde_json::from_value(value.clone()) {
                    Ok(err) => Failure::ExtendedValidation(err),
                    Err(_) => Failure::Other(value),
                }
            }
            JsonValue::Object(ref map)
                if map.contains_key("message") || map.contains_key("validationErrors") =>
            {
                match serde_json::from_value(value.clone()) {
                    Ok(err) => Failure::Crud(err),
                    Err(_) => Failure::Other(value),
                }
            }
            other => Failure::Other(other),
        }
    }
}

impl From<CrudError> for Failure {
    fn from(err: CrudError) -> Self {
        Failure::Crud(err)
    }
}

impl From<ExtendedValidationError> for Failure {
    fn from(err: ExtendedValidationError) -> Self {
        Failure::ExtendedValidation(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classifies_plain_strings() {
        assert_eq!(
            Failure::from_value(json!("database locked")),
            Failure::Message("database locked".to_string())
        );
    }

    #[test]
    fn classifies_crud_errors() {
        let failure = Failure::from_value(json!({
            "message": "Answer is invalid",
            "validationErrors": [{ "field": "answer_text", "message": "too short" }]
        }));

        let Failure::Crud(err) = failure else {
            panic!("expected crud error, got {:?}", failure);
        };
        assert_eq!(err.message, "Answer is invalid");
        assert_eq!(err.validation_errors.unwrap()[0].field, "answer_text");
    }

    #[test]
    fn index_key_wins_over_message_key() {
        let failure = Failure::from_value(json!({
            "index": 2,
            "message": "row invalid",
            "errors": [],
            "nestedErrors": [{ "index": 0, "message": "answer invalid" }]
        }));

        let Failure::ExtendedValidation(err) = failure else {
            panic!("expected extended validation error, got {:?}", failure);
        };
        assert_eq!(err.index, 2);
        assert_eq!(err.nested_errors.len(), 1);
        assert!(err.nested_errors[0].errors.is_empty());
    }

    #[test]
    fn unknown_shapes_are_kept_raw() {
        assert_eq!(
            Failure::from_value(json!({ "code": 7 })),
            Failure::Other(json!({ "code": 7 }))
        );
        assert_eq!(Failure::from_value(json!(42)), Failure::Other(json!(42)));
    }
}
