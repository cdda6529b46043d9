use std::time::Duration;

/// How long a toast stays up unless configured otherwise.
pub const TOAST_DURATION: Duration = Duration::from_millis(5000);

/// Severity of a [`Toast`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastStatus {
    Success,
    Error,
}

/// A transient, auto-dismissing status message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub status: ToastStatus,
    pub title: String,
    pub description: String,
    pub duration: Duration,
    /// Whether the user may dismiss it before it expires.
    pub is_closable: bool,
}

impl Toast {
    /// Creates a closable toast.
    pub fn new(
        status: ToastStatus,
        title: impl Into<String>,
        description: impl Into<String>,
        duration: Duration,
    ) -> Self {
        Self {
            status,
            title: title.into(),
            description: description.into(),
            duration,
            is_closable: true,
        }
    }
}

/// Presents toasts to the user.
pub trait Notifier: Send + Sync {
    fn notify(&self, toast: Toast);
}
