use std::collections::HashMap;
use std::fmt;

use uuid::Uuid;

use crate::forms::EditableForm;

/// Local identity of a row. Survives edits and index shifts; remote
/// outcomes are routed by it instead of by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowKey(Uuid);

impl RowKey {
    pub fn new() -> Self {
        RowKey(Uuid::new_v4())
    }
}

impl Default for RowKey {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone)]
pub struct EditableRow<F> {
    pub key: RowKey,
    pub form: F,
}

/// Ordered rows; the order is the display order.
#[derive(Debug, Clone)]
pub struct EditableCollection<F> {
    rows: Vec<EditableRow<F>>,
}

impl<F> Default for EditableCollection<F> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<F: EditableForm> EditableCollection<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    pub fn push(&mut self, form: F) -> RowKey {
        self.push_with_key(RowKey::new(), form)
    }

    pub fn push_with_key(&mut self, key: RowKey, form: F) -> RowKey {
        self.rows.push(EditableRow { key, form });
        key
    }

    pub fn rows(&self) -> &[EditableRow<F>] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut EditableRow<F>> {
        self.rows.iter_mut()
    }

    pub fn forms(&self) -> impl Iterator<Item = &F> {
        self.rows.iter().map(|r| &r.form)
    }

    pub fn get(&self, index: usize) -> Option<&F> {
        self.rows.get(index).map(|r| &r.form)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut F> {
        self.rows.get_mut(index).map(|r| &mut r.form)
    }

    pub fn key_at(&self, index: usize) -> Option<RowKey> {
        self.rows.get(index).map(|r| r.key)
    }

    pub fn position(&self, key: RowKey) -> Option<usize> {
        self.rows.iter().position(|r| r.key == key)
    }

    pub fn find_mut(&mut self, key: RowKey) -> Option<&mut F> {
        self.rows.iter_mut().find(|r| r.key == key).map(|r| &mut r.form)
    }

    pub fn remove(&mut self, key: RowKey) -> Option<F> {
        let index = self.position(key)?;
        Some(self.rows.remove(index).form)
    }

    /// True iff the row at `index` carries a server-assigned identifier.
    pub fn has_id(&self, index: usize) -> bool {
        self.get(index).and_then(EditableForm::id).is_some()
    }

    /// Row keys of persisted rows, so a rebuild can hand them back to the
    /// records that keep their id.
    pub fn keys_by_id(&self) -> HashMap<i32, RowKey> {
        self.rows
            .iter()
            .filter_map(|r| r.form.id().map(|id| (id, r.key)))
            .collect()
    }
}
