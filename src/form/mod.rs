//! The add-image form: field state, validation and the submission flow.

mod controller;
mod toast;

pub use controller::{AddImageForm, FormServices, SubmitOutcome};
pub use toast::{Notifier, TOAST_DURATION, Toast, ToastStatus};
