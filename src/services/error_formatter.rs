use crate::models::failure::{CrudError, ExtendedValidationError, Failure};

pub fn format(failure: &Failure) -> String {
    match failure {
        Failure::Message(message) | Failure::Native(message) => message.clone(),
        Failure::Crud(err) => format_crud_error(err),
        Failure::ExtendedValidation(err) => format_extended_validation_error(err, 0),
        Failure::Other(value) => value.to_string(),
    }
}

fn format_crud_error(err: &CrudError) -> String {
    let mut lines = vec![err.message.clone()];

    if let Some(validation_errors) = err.validation_errors.as_ref().filter(|v| !v.is_empty()) {
        lines.push("Details:".to_string());
        for ve in validation_errors {
            lines.push(format!("  • {}: {}", ve.field, ve.message));
        }
    }

    lines.join("\n")
}

fn format_extended_validation_error(err: &ExtendedValidationError, depth: usize) -> String {
    let indent = "  ".repeat(depth);
    let mut result = format!("{}- Index {}: {}", indent, err.index, err.message);

    for validation_error in &err.errors {
        result.push_str(&format!("\n{}  • {}", indent, validation_error.message));
    }

    for nested in &err.nested_errors {
        result.push('\n');
        result.push_str(&format_extended_validation_error(nested, depth + 1));
    }

    result
}
