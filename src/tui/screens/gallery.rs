//! Gallery screen: the images already stored, newest page first.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Paragraph, Row, Table};

use crate::model::ImagePage;
use crate::tui::action::{Action, ScreenState};

/// State for the gallery screen.
#[derive(Debug, Clone, Default)]
pub struct GalleryState {
    page: ImagePage,
    /// Index of the highlighted row.
    selected: usize,
    error: Option<String>,
}

impl GalleryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the listed images and clears any load error.
    pub fn set_page(&mut self, page: ImagePage) {
        self.selected = self.selected.min(page.data.len().saturating_sub(1));
        self.page = page;
        self.error = None;
    }

    pub fn page(&self) -> &ImagePage {
        &self.page
    }

    pub fn set_error(&mut self, msg: String) {
        self.error = Some(msg);
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// `true` if the server reported another page.
    pub fn has_more(&self) -> bool {
        self.page.after.is_some()
    }
}

impl ScreenState for GalleryState {
    fn handle_key(&mut self, key: KeyEvent) -> Action {
        let count = self.page.data.len();
        match key.code {
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
                Action::None
            }
            KeyCode::Down => {
                if count > 0 {
                    self.selected = (self.selected + 1).min(count - 1);
                }
                Action::None
            }
            KeyCode::Home => {
                self.selected = 0;
                Action::None
            }
            KeyCode::End => {
                self.selected = count.saturating_sub(1);
                Action::None
            }
            KeyCode::Char('a') => Action::OpenAddImage,
            KeyCode::Char('r') => Action::Refresh,
            KeyCode::Char('m') if self.has_more() => Action::LoadMore,
            KeyCode::Char('x') => Action::DismissToast,
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            _ => Action::None,
        }
    }
}

/// Renders the gallery screen.
#[mutants::skip]
pub fn draw_gallery(state: &GalleryState, frame: &mut Frame, area: Rect) {
    let [title_area, error_area, table_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    let images = &state.page.data;
    let more = if state.has_more() { "+" } else { "" };
    let title = Paragraph::new(Line::from(format!("Images ({}{more})", images.len())))
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(title, title_area);

    if let Some(err) = state.error() {
        let error = Paragraph::new(err).style(Style::default().fg(Color::Red));
        frame.render_widget(error, error_area);
    }

    if images.is_empty() {
        let empty = Paragraph::new("No images yet. Press a to add one.").alignment(Alignment::Center);
        frame.render_widget(empty, table_area);
    } else {
        let header = Row::new(vec!["Title", "Description", "URL"])
            .style(Style::default().add_modifier(Modifier::BOLD))
            .bottom_margin(1);

        let rows: Vec<Row> = images
            .iter()
            .enumerate()
            .map(|(i, image)| {
                let style = if i == state.selected {
                    Style::default().fg(Color::Black).bg(Color::Yellow)
                } else {
                    Style::default()
                };
                Row::new(vec![
                    image.title.clone(),
                    image.description.clone(),
                    image.url.clone(),
                ])
                .style(style)
            })
            .collect();

        let widths = [
            Constraint::Length(22),
            Constraint::Percentage(50),
            Constraint::Min(0),
        ];
        frame.render_widget(Table::new(rows, widths).header(header), table_area);
    }

    let footer_text = if state.has_more() {
        "↑↓: navigate  a: add image  r: refresh  m: more  x: dismiss  q: quit"
    } else {
        "↑↓: navigate  a: add image  r: refresh  x: dismiss  q: quit"
    };
    let footer = Paragraph::new(footer_text).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, footer_area);
}
