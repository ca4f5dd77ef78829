use validator::{Validate, ValidationError, ValidationErrors};

const TEXT_PUNCTUATION: &str = ".:\\/,!?'\"()-–—…&";

pub fn validate<T: Validate>(val: &T) -> Result<(), ValidationErrors> {
    val.validate()
}

/// Letters, combining marks, digits, whitespace and common punctuation.
pub fn validate_text_chars(value: &str) -> Result<(), ValidationError> {
    let allowed = |c: char| {
        c.is_alphanumeric()
            || c.is_whitespace()
            || is_combining_mark(c)
            || TEXT_PUNCTUATION.contains(c)
    };

    if value.chars().all(allowed) {
        Ok(())
    } else {
        let mut err = ValidationError::new("pattern");
        err.message = Some("contains unsupported characters".into());
        Err(err)
    }
}

fn is_combining_mark(c: char) -> bool {
    matches!(c as u32, 0x0300..=0x036F | 0x1AB0..=0x1AFF | 0x1DC0..=0x1DFF | 0x20D0..=0x20FF | 0xFE20..=0xFE2F)
}

/// One `field: message` entry per failed rule, ordered by field name.
pub fn field_error_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter()
                .map(|e| match &e.message {
                    Some(message) => format!("{}: {}", field, message),
                    None => format!("{}: {}", field, e.code),
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

pub fn joined_field_errors(errors: &ValidationErrors) -> String {
    field_error_messages(errors).join(", ")
}
