use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Danger,
}

#[derive(Debug, Clone, Serialize)]
pub struct Toast {
    pub title: String,
    pub message: String,
    pub kind: ToastKind,
    pub date: DateTime<Utc>,
}
