//! Text input rows with focus, placeholders and inline errors.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

/// A single input row within a [`Form`].
#[derive(Debug, Clone)]
pub struct FormField {
    /// Title shown on the input border.
    pub label: String,
    /// Hint rendered while the value is empty.
    pub placeholder: String,
    /// Current text value.
    pub value: String,
    /// Error message rendered under the input.
    pub error: Option<String>,
    /// Marks the label with `*`.
    pub required: bool,
}

impl FormField {
    /// Creates an empty field with no placeholder.
    pub fn new(label: impl Into<String>, required: bool) -> Self {
        Self {
            label: label.into(),
            placeholder: String::new(),
            value: String::new(),
            error: None,
            required,
        }
    }

    /// Sets the hint shown while the value is empty.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }
}

/// Input buffers for a column of fields, one of which has focus.
#[derive(Debug, Clone)]
pub struct Form {
    fields: Vec<FormField>,
    focus: usize,
}

impl Form {
    /// Focus starts on the first field.
    pub fn new(fields: Vec<FormField>) -> Self {
        Self { fields, focus: 0 }
    }

    /// Returns the index of the currently focused field.
    pub fn focus(&self) -> usize {
        self.focus
    }

    /// Moves focus to the next field, wrapping around.
    pub fn focus_next(&mut self) {
        if self.fields.is_empty() {
            return;
        }
        self.focus = (self.focus + 1) % self.fields.len();
    }

    /// Moves focus to the previous field, wrapping around.
    pub fn focus_prev(&mut self) {
        if self.fields.is_empty() {
            return;
        }
        self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
    }

    /// Inserts a character at the end of the focused field.
    pub fn insert_char(&mut self, ch: char) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.value.push(ch);
        }
    }

    /// Deletes the last character from the focused field.
    pub fn delete_char(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.value.pop();
        }
    }

    /// Sets or clears the error of the field at `index`.
    pub fn set_error(&mut self, index: usize, error: Option<String>) {
        if let Some(field) = self.fields.get_mut(index) {
            field.error = error;
        }
    }

    /// Returns `true` if any field has an error set.
    pub fn has_errors(&self) -> bool {
        self.fields.iter().any(|f| f.error.is_some())
    }

    /// Returns the value at `index`, or an empty string if out of bounds.
    pub fn value(&self, index: usize) -> &str {
        self.fields
            .get(index)
            .map(|f| f.value.as_str())
            .unwrap_or("")
    }

    /// Clears values and errors and returns focus to the first field.
    pub fn reset(&mut self) {
        for field in &mut self.fields {
            field.value.clear();
            field.error = None;
        }
        self.focus = 0;
    }

    /// Returns a reference to the fields.
    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }
}

/// Renders the form; the focused row gets a cursor and a yellow border
/// unless `disabled` is set.
#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
pub fn draw_form(form: &Form, disabled: bool, frame: &mut Frame, area: Rect) {
    let row_height = 3_u16;
    let constraints: Vec<Constraint> = form
        .fields
        .iter()
        .map(|_| Constraint::Length(row_height + 1))
        .collect();

    let rows = Layout::vertical(constraints).split(area);

    for (i, field) in form.fields.iter().enumerate() {
        let is_focused = !disabled && i == form.focus;

        let border_color = if field.error.is_some() {
            Color::Red
        } else if is_focused {
            Color::Yellow
        } else {
            Color::DarkGray
        };

        let label = if field.required {
            format!("{} *", field.label)
        } else {
            field.label.clone()
        };

        let block = Block::default()
            .title(label)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color));

        let mut spans = if field.value.is_empty() {
            vec![Span::styled(
                field.placeholder.as_str(),
                Style::default().fg(Color::DarkGray),
            )]
        } else {
            vec![Span::raw(field.value.as_str())]
        };
        if is_focused {
            spans.push(Span::styled(
                "\u{2588}",
                Style::default().add_modifier(Modifier::SLOW_BLINK),
            ));
        }

        let input_area = Rect {
            height: row_height.min(rows[i].height),
            ..rows[i]
        };
        frame.render_widget(Paragraph::new(Line::from(spans)).block(block), input_area);

        if let Some(ref err) = field.error {
            let err_area = Rect {
                x: rows[i].x + 1,
                y: rows[i].y + row_height,
                width: rows[i].width.saturating_sub(2),
                height: 1,
            };
            if err_area.y < area.y + area.height {
                let error_line =
                    Paragraph::new(Span::styled(err.as_str(), Style::default().fg(Color::Red)));
                frame.render_widget(error_line, err_area);
            }
        }
    }
}
