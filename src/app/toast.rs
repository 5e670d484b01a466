use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::util::generate_id;

const MAX_TOASTS: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Warning,
    Error,
}

impl ToastKind {
    pub fn icon(self) -> &'static str {
        match self {
            ToastKind::Info => "i",
            ToastKind::Success => "+",
            ToastKind::Warning => "!",
            ToastKind::Error => "x",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ToastMessage {
    pub id: String,
    pub kind: ToastKind,
    pub text: String,
}

impl ToastMessage {
    pub fn new(kind: ToastKind, text: impl Into<String>) -> Self {
        Self {
            id: generate_id("toast"),
            kind,
            text: text.into(),
        }
    }
}

/// Shared queue of transient notifications. Clones point at the same queue.
#[derive(Clone, Debug, Default)]
pub struct Toasts {
    entries: Arc<Mutex<Vec<ToastMessage>>>,
}

impl Toasts {
    pub fn push(&self, kind: ToastKind, message: impl Into<String>) {
        let text = message.into();
        let mut entries = self.lock();
        if entries.len() >= MAX_TOASTS {
            entries.remove(0);
        }
        entries.push(ToastMessage::new(kind, text));
    }

    /// Take everything queued, oldest first. Each toast is shown once.
    pub fn drain(&self) -> Vec<ToastMessage> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ToastMessage>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
