pub mod answer_form;
pub mod assignment_option_form;

use validator::Validate;

/// Form state bound to one row of an editable collection.
pub trait EditableForm: Validate {
    fn id(&self) -> Option<i32>;
    fn mark_all_as_touched(&mut self);
}
