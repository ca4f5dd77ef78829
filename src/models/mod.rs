pub mod answer;
pub mod assignment_option;
pub mod failure;
pub mod question_type;
pub mod toast;
