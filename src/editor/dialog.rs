pub const DEFAULT_ABORT_LABEL: &str = "Cancel";
pub const DEFAULT_SUBMIT_LABEL: &str = "Confirm";
pub const DEFAULT_ACTION_LABEL: &str = "Execute Action";

/// Label overrides; `None` falls back to the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogLabels {
    pub abort: Option<String>,
    pub submit: Option<String>,
    pub action: Option<String>,
}

impl DialogLabels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn abort(mut self, label: impl Into<String>) -> Self {
        self.abort = Some(label.into());
        self
    }

    pub fn submit(mut self, label: impl Into<String>) -> Self {
        self.submit = Some(label.into());
        self
    }

    pub fn action(mut self, label: impl Into<String>) -> Self {
        self.action = Some(label.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmDialog<I> {
    pub title: String,
    pub message: String,
    pub abort_label: String,
    pub submit_label: String,
    pub on_submit: I,
    pub on_abort: Option<I>,
}

impl<I> ConfirmDialog<I> {
    fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        on_submit: I,
        on_abort: Option<I>,
        labels: &DialogLabels,
    ) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            abort_label: labels.abort.clone().unwrap_or_else(|| DEFAULT_ABORT_LABEL.to_string()),
            submit_label: labels.submit.clone().unwrap_or_else(|| DEFAULT_SUBMIT_LABEL.to_string()),
            on_submit,
            on_abort,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectActionDialog<I> {
    pub confirm: ConfirmDialog<I>,
    pub action_label: String,
    pub on_action: I,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogEvent {
    Submit,
    Abort,
    Action,
}

/// One dialog slot per editor. Opening a dialog replaces whatever was open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogState<I> {
    Closed,
    Confirming(ConfirmDialog<I>),
    DirectActioning(DirectActionDialog<I>),
}

impl<I> Default for DialogState<I> {
    fn default() -> Self {
        DialogState::Closed
    }
}

impl<I> DialogState<I> {
    pub fn confirm(
        title: impl Into<String>,
        message: impl Into<String>,
        on_submit: I,
        on_abort: Option<I>,
        labels: DialogLabels,
    ) -> Self {
        DialogState::Confirming(ConfirmDialog::new(title, message, on_submit, on_abort, &labels))
    }

    pub fn direct_action(
        title: impl Into<String>,
        message: impl Into<String>,
        on_submit: I,
        on_action: I,
        on_abort: Option<I>,
        labels: DialogLabels,
    ) -> Self {
        DialogState::DirectActioning(DirectActionDialog {
            confirm: ConfirmDialog::new(title, message, on_submit, on_abort, &labels),
            action_label: labels.action.unwrap_or_else(|| DEFAULT_ACTION_LABEL.to_string()),
            on_action,
        })
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, DialogState::Closed)
    }

    pub fn is_direct_action(&self) -> bool {
        matches!(self, DialogState::DirectActioning(_))
    }

    pub fn title(&self) -> Option<&str> {
        self.confirm_part().map(|d| d.title.as_str())
    }

    pub fn submit_label(&self) -> Option<&str> {
        self.confirm_part().map(|d| d.submit_label.as_str())
    }

    pub fn action_label(&self) -> Option<&str> {
        match self {
            DialogState::DirectActioning(d) => Some(d.action_label.as_str()),
            _ => None,
        }
    }

    fn confirm_part(&self) -> Option<&ConfirmDialog<I>> {
        match self {
            DialogState::Closed => None,
            DialogState::Confirming(d) => Some(d),
            DialogState::DirectActioning(d) => Some(&d.confirm),
        }
    }

    /// Applies a user event and returns the next state plus the intent it
    /// resolved to, if any. A plain confirm dialog has no action button, so
    /// `Action` leaves it untouched.
    pub fn transition(self, event: DialogEvent) -> (DialogState<I>, Option<I>) {
        match (self, event) {
            (DialogState::Closed, _) => (DialogState::Closed, None),
            (DialogState::Confirming(d), DialogEvent::Submit) => (DialogState::Closed, Some(d.on_submit)),
            (DialogState::Confirming(d), DialogEvent::Abort) => (DialogState::Closed, d.on_abort),
            (state @ DialogState::Confirming(_), DialogEvent::Action) => (state, None),
            (DialogState::DirectActioning(d), DialogEvent::Submit) => {
                (DialogState::Closed, Some(d.confirm.on_submit))
            }
            (DialogState::DirectActioning(d), DialogEvent::Abort) => (DialogState::Closed, d.confirm.on_abort),
            (DialogState::DirectActioning(d), DialogEvent::Action) => (DialogState::Closed, Some(d.on_action)),
        }
    }
}
