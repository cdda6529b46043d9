use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crossterm::event::{Event, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use ratatui::backend::Backend;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders};
use ratatui::{Frame, Terminal};
use tracing::warn;

use crate::api::{IMAGES_KEY, ImageApi, QueryCache, QueryClient};
use crate::form::{AddImageForm, FormServices, SubmitOutcome};
use crate::model::ImagePage;
use crate::upload::{FileInput, ImageHost};

use super::action::{Action, ScreenState};
use super::error::AppError;
use super::screens::{AddImageState, GalleryState, draw_add_image, draw_gallery};
use super::widgets::{ToastQueue, draw_toasts};

/// How often the loop wakes without input, so toasts can expire.
const TICK: Duration = Duration::from_millis(250);

/// All screens the app can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    /// List of stored images.
    Gallery,
    /// The add-image modal over the gallery.
    AddImage,
}

/// Top-level application state.
pub struct App {
    screen: Screen,
    gallery: GalleryState,
    add_image: Option<AddImageState>,
    services: FormServices,
    query_client: Arc<QueryClient>,
    toasts: Arc<ToastQueue>,
    file_input: FileInput,
    /// Set by the form's `on_close` callback.
    close_requested: Arc<AtomicBool>,
    /// The last list fetch failed; cleared by a refresh or a created image.
    fetch_failed: bool,
    should_quit: bool,
}

impl App {
    /// Creates an `App` on the [`Screen::Gallery`] screen.
    pub fn new(api: Arc<dyn ImageApi>, host: Arc<dyn ImageHost>, toast_duration: Duration) -> Self {
        let query_client = Arc::new(QueryClient::new());
        let toasts = Arc::new(ToastQueue::new());
        let services = FormServices {
            api,
            cache: query_client.clone(),
            notifier: toasts.clone(),
            toast_duration,
        };
        Self {
            screen: Screen::Gallery,
            gallery: GalleryState::new(),
            add_image: None,
            services,
            query_client,
            toasts,
            file_input: FileInput::new(host),
            close_requested: Arc::new(AtomicBool::new(false)),
            fetch_failed: false,
            should_quit: false,
        }
    }

    /// Main event loop: refresh → draw → wait for a key or tick → apply.
    #[cfg_attr(coverage_nightly, coverage(off))]
    #[mutants::skip]
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut events = EventStream::new();
        let mut ticker = tokio::time::interval(TICK);
        while !self.should_quit {
            self.refresh_gallery().await;
            self.toasts.expire(Instant::now());
            terminal.draw(|frame| self.draw(frame))?;
            tokio::select! {
                event = events.next() => match event {
                    Some(Ok(Event::Key(key))) => {
                        let action = self.handle_key(key);
                        self.apply(action, terminal).await?;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                    None => self.should_quit = true,
                },
                _ = ticker.tick() => {}
            }
        }
        Ok(())
    }

    #[cfg_attr(coverage_nightly, coverage(off))]
    #[mutants::skip]
    fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let block = Block::default()
            .title(" imgform ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        draw_gallery(&self.gallery, frame, inner);
        if let (Screen::AddImage, Some(state)) = (self.screen, &self.add_image) {
            draw_add_image(state, frame, inner);
        }
        draw_toasts(&self.toasts.visible(), frame, inner);
    }

    /// Routes a key press to the current screen.
    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.kind != KeyEventKind::Press {
            return Action::None;
        }
        match (self.screen, self.add_image.as_mut()) {
            (Screen::AddImage, Some(state)) => state.handle_key(key),
            _ => self.gallery.handle_key(key),
        }
    }

    /// Applies an action, redrawing before anything that waits on the network.
    pub async fn apply<B: Backend>(
        &mut self,
        action: Action,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        match action {
            Action::None => {}
            Action::OpenAddImage => self.open_add_image(),
            Action::PickFile(path) => {
                if let Some(state) = self.add_image.as_mut() {
                    state.set_uploading(true);
                    terminal.draw(|frame| self.draw(frame))?;
                }
                if let Some(state) = self.add_image.as_mut() {
                    self.file_input.select(state.form_mut(), &path).await;
                    state.set_uploading(false);
                    state.sync_errors();
                }
            }
            Action::Submit => {
                let started = self
                    .add_image
                    .as_mut()
                    .is_some_and(|state| state.form_mut().begin_submit());
                if started {
                    terminal.draw(|frame| self.draw(frame))?;
                }
                if let Some(state) = self.add_image.as_mut() {
                    if started {
                        let outcome = state.form_mut().send().await;
                        if matches!(outcome, SubmitOutcome::Created(_)) {
                            // The list is stale now, so retry after an earlier failure.
                            self.fetch_failed = false;
                        }
                    }
                    state.sync_errors();
                }
            }
            Action::Refresh => {
                self.query_client.invalidate(IMAGES_KEY);
                self.fetch_failed = false;
            }
            Action::LoadMore => self.load_more().await,
            Action::DismissToast => {
                self.toasts.dismiss_latest();
            }
            Action::Quit => self.should_quit = true,
        }
        self.close_modal_if_requested();
        Ok(())
    }

    fn open_add_image(&mut self) {
        let flag = self.close_requested.clone();
        let form = AddImageForm::new(self.services.clone(), move || {
            flag.store(true, Ordering::SeqCst);
        });
        self.add_image = Some(AddImageState::new(form));
        self.screen = Screen::AddImage;
    }

    fn close_modal_if_requested(&mut self) {
        if self.close_requested.swap(false, Ordering::SeqCst) {
            self.add_image = None;
            self.screen = Screen::Gallery;
        }
    }

    /// Fetches the first page if the cached list is missing or stale.
    pub async fn refresh_gallery(&mut self) {
        if self.fetch_failed || !self.query_client.is_stale(IMAGES_KEY) {
            return;
        }
        match self.services.api.list_images(None).await {
            Ok(page) => self.store_page(page),
            Err(e) => {
                warn!(error = %e, "failed to load images");
                self.fetch_failed = true;
                self.gallery.set_error(format!("Could not load images: {e}"));
            }
        }
    }

    async fn load_more(&mut self) {
        let Some(after) = self.gallery.page().after.clone() else {
            return;
        };
        match self.services.api.list_images(Some(&after)).await {
            Ok(next) => {
                let mut page = self.gallery.page().clone();
                page.extend(next);
                self.store_page(page);
            }
            Err(e) => {
                warn!(error = %e, "failed to load more images");
                self.gallery.set_error(format!("Could not load more images: {e}"));
            }
        }
    }

    fn store_page(&mut self, page: ImagePage) {
        if let Err(e) = self.query_client.set(IMAGES_KEY, &page) {
            warn!(error = %e, "could not cache image list");
        }
        self.gallery.set_page(page);
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn gallery(&self) -> &GalleryState {
        &self.gallery
    }

    pub fn add_image(&self) -> Option<&AddImageState> {
        self.add_image.as_ref()
    }

    pub fn toasts(&self) -> &ToastQueue {
        &self.toasts
    }
}
