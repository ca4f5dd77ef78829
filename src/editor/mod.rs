pub mod answer_editor;
pub mod collection;
pub mod controller;
pub mod dialog;
pub mod mutation;
pub mod option_editor;

pub use answer_editor::{AnswerCollectionEditor, AnswerIntent, AnswerSnapshot};
pub use collection::{EditableCollection, RowKey};
pub use dialog::{DialogEvent, DialogLabels, DialogState};
pub use option_editor::{OptionCollectionEditor, OptionIntent};
