//! Transient user-facing notifications ("toasts").
//!
//! Page controllers report the outcome of every backend call through a
//! `Notifier`; how it is shown is up to the front-end.

use std::fmt;
use std::sync::Mutex;

use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Success => "success",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub severity: Severity,
    pub message: String,
}

impl Toast {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Toast {
            severity,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Toast::new(Severity::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Toast::new(Severity::Error, message)
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, toast: Toast);
}

/// Prints toasts to stderr for the command-line front-end, and logs them.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, toast: Toast) {
        match toast.severity {
            Severity::Error | Severity::Warning => {
                warn!(event_name = "toast", severity = %toast.severity, "{}", toast.message)
            }
            _ => info!(event_name = "toast", severity = %toast.severity, "{}", toast.message),
        }
        eprintln!("[{}] {}", toast.severity, toast.message);
    }
}

/// Keeps every toast in memory, in order. Handy for embedding and for tests.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    toasts: Mutex<Vec<Toast>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        MemoryNotifier::default()
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Returns the recorded toasts and forgets them.
    pub fn take(&self) -> Vec<Toast> {
        std::mem::take(&mut *self.toasts.lock().unwrap_or_else(|e| e.into_inner()))
    }

    pub fn last(&self) -> Option<Toast> {
        self.toasts().pop()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, toast: Toast) {
        self.toasts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(toast);
    }
}
