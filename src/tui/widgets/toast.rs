//! Toast stack: transient status messages in the top-right corner.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::form::{Notifier, Toast, ToastStatus};

const TOAST_WIDTH: u16 = 40;
const TOAST_HEIGHT: u16 = 4;

/// Toasts currently on screen, oldest first.
#[derive(Debug, Default)]
pub struct ToastQueue {
    entries: Mutex<Vec<(Toast, Instant)>>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, Vec<(Toast, Instant)>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn push_at(&self, toast: Toast, shown_at: Instant) {
        self.entries().push((toast, shown_at));
    }

    /// Drops every toast whose duration has elapsed at `now`.
    pub fn expire(&self, now: Instant) {
        self.entries()
            .retain(|(toast, shown_at)| now.saturating_duration_since(*shown_at) < toast.duration);
    }

    /// Removes the newest closable toast. Returns `true` if one was removed.
    pub fn dismiss_latest(&self) -> bool {
        let mut entries = self.entries();
        match entries.iter().rposition(|(toast, _)| toast.is_closable) {
            Some(index) => {
                entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Snapshot of the toasts on screen, oldest first.
    pub fn visible(&self) -> Vec<Toast> {
        self.entries().iter().map(|(toast, _)| toast.clone()).collect()
    }
}

impl Notifier for ToastQueue {
    fn notify(&self, toast: Toast) {
        self.push_at(toast, Instant::now());
    }
}

/// Renders `toasts` stacked downward from the top-right corner of `area`,
/// newest on top. Toasts that do not fit are skipped.
#[mutants::skip]
pub fn draw_toasts(toasts: &[Toast], frame: &mut Frame, area: Rect) {
    let width = TOAST_WIDTH.min(area.width);
    let x = area.x + area.width - width;

    for (slot, toast) in toasts.iter().rev().enumerate() {
        let y = area.y + slot as u16 * TOAST_HEIGHT;
        if y + TOAST_HEIGHT > area.y + area.height {
            break;
        }
        let rect = Rect::new(x, y, width, TOAST_HEIGHT);
        let color = match toast.status {
            ToastStatus::Success => Color::Green,
            ToastStatus::Error => Color::Red,
        };
        let block = Block::default()
            .title(Line::styled(
                format!(" {} ", toast.title),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color));
        let body = Paragraph::new(toast.description.as_str())
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(Clear, rect);
        frame.render_widget(body, rect);
    }
}
