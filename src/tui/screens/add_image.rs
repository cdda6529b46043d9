//! Add-image modal: image path, title and description inputs over the gallery.

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::form::AddImageForm;
use crate::model::Field;
use crate::tui::action::{Action, ScreenState};
use crate::tui::widgets::form::{Form, FormField, draw_form};

const IMAGE: usize = 0;
const TITLE: usize = 1;
const DESCRIPTION: usize = 2;

/// State for the add-image modal.
///
/// The [`Form`] widget holds what the user typed; the [`AddImageForm`] holds
/// the values the rules see, and its errors are copied back for display.
pub struct AddImageState {
    input: Form,
    form: AddImageForm,
    uploading: bool,
}

impl AddImageState {
    pub fn new(form: AddImageForm) -> Self {
        Self {
            input: Form::new(vec![
                FormField::new("Image", true).with_placeholder("Path to a PNG, JPEG or GIF..."),
                FormField::new("Title", true).with_placeholder("Image title..."),
                FormField::new("Description", true).with_placeholder("Image description..."),
            ]),
            form,
            uploading: false,
        }
    }

    pub fn input(&self) -> &Form {
        &self.input
    }

    pub fn form(&self) -> &AddImageForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut AddImageForm {
        &mut self.form
    }

    /// Set while the picker is waiting on the image host.
    pub fn set_uploading(&mut self, uploading: bool) {
        self.uploading = uploading;
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    /// `true` while keys are ignored.
    pub fn is_busy(&self) -> bool {
        self.uploading || self.form.is_submitting()
    }

    /// Copies the form's field errors into the input rows.
    pub fn sync_errors(&mut self) {
        for field in Field::ALL {
            self.input
                .set_error(field.index(), self.form.error(field).map(str::to_string));
        }
    }

    /// Pushes the focused row's text into the form.
    fn sync_focused(&mut self) {
        let value = self.input.value(self.input.focus()).to_string();
        match self.input.focus() {
            TITLE => self.form.set_title(value),
            DESCRIPTION => self.form.set_description(value),
            _ => {
                // The typed path no longer names the picked file.
                self.form.set_image(None);
                self.form.set_image_url("");
                self.form.set_local_image_url("");
            }
        }
    }

    fn picked_path(&self) -> PathBuf {
        PathBuf::from(self.input.value(IMAGE).trim())
    }
}

impl ScreenState for AddImageState {
    fn handle_key(&mut self, key: KeyEvent) -> Action {
        if self.is_busy() {
            return Action::None;
        }
        match key.code {
            KeyCode::Tab => {
                self.input.focus_next();
                Action::None
            }
            KeyCode::BackTab => {
                self.input.focus_prev();
                Action::None
            }
            KeyCode::Char(ch) => {
                self.input.insert_char(ch);
                self.sync_focused();
                Action::None
            }
            KeyCode::Backspace => {
                self.input.delete_char();
                self.sync_focused();
                Action::None
            }
            KeyCode::Esc => {
                self.form.cancel();
                self.input.reset();
                Action::None
            }
            KeyCode::Enter if self.input.focus() == IMAGE => Action::PickFile(self.picked_path()),
            KeyCode::Enter => Action::Submit,
            _ => Action::None,
        }
    }
}

/// Renders the modal centered over `area`.
#[mutants::skip]
pub fn draw_add_image(state: &AddImageState, frame: &mut Frame, area: Rect) {
    let [popup] = Layout::horizontal([Constraint::Length(64)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::vertical([Constraint::Length(20)])
        .flex(Flex::Center)
        .areas(popup);

    let block = Block::default()
        .title(" Add Image ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(popup);
    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);

    let [form_area, status_area, button_area, footer_area] = Layout::vertical([
        Constraint::Length(12),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .spacing(1)
    .areas(inner);

    draw_form(&state.input, state.is_busy(), frame, form_area);

    let status = if state.is_uploading() {
        Span::styled("Uploading image...", Style::default().fg(Color::Yellow))
    } else if state.form.upload().is_uploaded() {
        Span::styled(
            format!("Uploaded: {}", state.form.image_url()),
            Style::default().fg(Color::Green),
        )
    } else {
        Span::styled(
            "Press Enter on the image field to upload",
            Style::default().fg(Color::DarkGray),
        )
    };
    frame.render_widget(Paragraph::new(Line::from(status)), status_area);

    let button = if state.form.is_submitting() {
        Paragraph::new("[ Sending... ]").style(Style::default().fg(Color::DarkGray))
    } else {
        Paragraph::new("[ Send ]").style(Style::default().add_modifier(Modifier::BOLD))
    };
    frame.render_widget(button.alignment(Alignment::Center), button_area);

    let footer = Paragraph::new("Tab/Shift+Tab: next/prev  Enter: upload/send  Esc: cancel")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, footer_area);
}
