use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{info, warn};

use crate::models::toast::{Toast, ToastKind};

/// Fire-and-forget notification sink used by the editors.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    fn add_success_toast(&self, title: &str, message: &str);
    fn add_error_toast(&self, title: &str, message: &str);
}

/// Keeps every toast in memory and mirrors it to the log.
#[derive(Clone, Default)]
pub struct ToastService {
    toasts: Arc<Mutex<Vec<Toast>>>,
}

impl ToastService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, toast: Toast) {
        self.guard().push(toast);
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.guard().clone()
    }

    pub fn errors(&self) -> Vec<Toast> {
        self.of_kind(ToastKind::Danger)
    }

    pub fn successes(&self) -> Vec<Toast> {
        self.of_kind(ToastKind::Success)
    }

    pub fn remove(&self, index: usize) -> Option<Toast> {
        let mut toasts = self.guard();
        (index < toasts.len()).then(|| toasts.remove(index))
    }

    fn of_kind(&self, kind: ToastKind) -> Vec<Toast> {
        self.guard()
            .iter()
            .filter(|t| t.kind == kind)
            .cloned()
            .collect()
    }

    fn push(&self, title: &str, message: &str, kind: ToastKind) {
        self.add(Toast {
            title: title.to_string(),
            message: message.to_string(),
            kind,
            date: chrono::Utc::now(),
        });
    }

    fn guard(&self) -> MutexGuard<'_, Vec<Toast>> {
        self.toasts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Notifier for ToastService {
    fn add_success_toast(&self, title: &str, message: &str) {
        info!(title, message, "success toast");
        self.push(title, message, ToastKind::Success);
    }

    fn add_error_toast(&self, title: &str, message: &str) {
        warn!(title, message, "error toast");
        self.push(title, message, ToastKind::Danger);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_toasts_by_kind() {
        let service = ToastService::new();
        service.add_success_toast("Saved", "Answer: 1 was created successfully");
        service.add_error_toast("Error", "locked");

        assert_eq!(service.toasts().len(), 2);
        assert_eq!(service.successes()[0].title, "Saved");
        assert_eq!(service.errors()[0].message, "locked");
    }

    #[test]
    fn remove_ignores_out_of_range() {
        let service = ToastService::new();
        service.add_error_toast("Error", "first");
        assert!(service.remove(3).is_none());
        assert_eq!(service.remove(0).unwrap().message, "first");
        assert!(service.toasts().is_empty());
    }
}
