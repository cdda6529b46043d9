//! Reusable TUI widgets.

pub mod form;
pub mod toast;

pub use form::{Form, FormField, draw_form};
pub use toast::{ToastQueue, draw_toasts};
