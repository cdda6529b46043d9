//! Actions returned by screen event handlers.

use std::path::PathBuf;

use crossterm::event::KeyEvent;

/// An action that a screen handler returns to the [`App`](super::App).
///
/// Anything that needs the network is an action so the `App` can redraw
/// before awaiting it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// No state change needed.
    None,
    /// Open the add-image modal over the gallery.
    OpenAddImage,
    /// Read and upload the image at the given path.
    PickFile(PathBuf),
    /// Validate the form and send the record.
    Submit,
    /// Invalidate the image list and fetch it again.
    Refresh,
    /// Fetch the page after the last one loaded.
    LoadMore,
    /// Dismiss the newest toast.
    DismissToast,
    /// Quit the application.
    Quit,
}

/// Common behavior for all screen state types.
pub trait ScreenState {
    /// Process a key event and return an [`Action`] for the `App` to apply.
    fn handle_key(&mut self, key: KeyEvent) -> Action;
}
