//! Test doubles for the form's collaborators.

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tracing_subscriber::fmt::MakeWriter;

use crate::api::{ApiError, ImageApi, QueryCache};
use crate::form::{AddImageForm, FormServices, Notifier, Toast};
use crate::model::{ImageFile, ImagePage, NewImage};
use crate::upload::ImageHost;

/// Records created images; fails every call when `fail` is set.
#[derive(Default)]
pub(crate) struct FakeApi {
    pub fail: bool,
    pub created: Mutex<Vec<NewImage>>,
    pub pages: Mutex<Vec<ImagePage>>,
    pub list_calls: Mutex<Vec<Option<String>>>,
    /// Number of upcoming `list_images` calls that fail.
    pub list_failures: AtomicUsize,
}

impl FakeApi {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn with_pages(pages: Vec<ImagePage>) -> Self {
        Self {
            pages: Mutex::new(pages),
            ..Self::default()
        }
    }

    pub fn failing_lists(self, count: usize) -> Self {
        self.list_failures.store(count, Ordering::SeqCst);
        self
    }

    pub fn created(&self) -> Vec<NewImage> {
        self.created.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> Vec<Option<String>> {
        self.list_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageApi for FakeApi {
    async fn create_image(&self, image: &NewImage) -> Result<(), ApiError> {
        if self.fail {
            return Err(ApiError::Status {
                status: 500,
                body: "internal error".into(),
            });
        }
        self.created.lock().unwrap().push(image.clone());
        Ok(())
    }

    async fn list_images(&self, after: Option<&str>) -> Result<ImagePage, ApiError> {
        self.list_calls
            .lock()
            .unwrap()
            .push(after.map(str::to_string));
        let pending = self
            .list_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if self.fail || pending {
            return Err(ApiError::Status {
                status: 503,
                body: String::new(),
            });
        }
        let mut pages = self.pages.lock().unwrap();
        if pages.is_empty() {
            Ok(ImagePage::default())
        } else {
            Ok(pages.remove(0))
        }
    }
}

/// Returns a fixed URL, or fails when `url` is `None`.
pub(crate) struct FakeHost {
    pub url: Option<String>,
    pub uploads: AtomicUsize,
}

impl FakeHost {
    pub fn ok(url: &str) -> Self {
        Self {
            url: Some(url.to_string()),
            uploads: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            url: None,
            uploads: AtomicUsize::new(0),
        }
    }

    pub fn uploads(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageHost for FakeHost {
    async fn upload(&self, _file: &ImageFile) -> Result<String, ApiError> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        self.url.clone().ok_or(ApiError::MissingUrl)
    }
}

#[derive(Default)]
pub(crate) struct RecordingCache {
    pub keys: Mutex<Vec<String>>,
}

impl RecordingCache {
    pub fn keys(&self) -> Vec<String> {
        self.keys.lock().unwrap().clone()
    }
}

impl QueryCache for RecordingCache {
    fn invalidate(&self, key: &str) {
        self.keys.lock().unwrap().push(key.to_string());
    }
}

#[derive(Default)]
pub(crate) struct RecordingNotifier {
    pub toasts: Mutex<Vec<Toast>>,
}

impl RecordingNotifier {
    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, toast: Toast) {
        self.toasts.lock().unwrap().push(toast);
    }
}

/// Shared fakes plus a counter of `on_close` calls.
pub(crate) struct Fakes {
    pub api: Arc<FakeApi>,
    pub cache: Arc<RecordingCache>,
    pub notifier: Arc<RecordingNotifier>,
    pub closed: Arc<AtomicUsize>,
}

impl Fakes {
    pub fn new(api: FakeApi) -> Self {
        Self {
            api: Arc::new(api),
            cache: Arc::new(RecordingCache::default()),
            notifier: Arc::new(RecordingNotifier::default()),
            closed: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn services(&self) -> FormServices {
        FormServices {
            api: self.api.clone(),
            cache: self.cache.clone(),
            notifier: self.notifier.clone(),
            toast_duration: Duration::from_millis(5000),
        }
    }

    /// A new form whose `on_close` bumps [`closed`](Self::closed).
    pub fn form(&self) -> AddImageForm {
        let counter = self.closed.clone();
        AddImageForm::new(self.services(), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

/// A form wired to fakes, plus handles to inspect them.
pub(crate) struct Harness {
    pub form: AddImageForm,
    pub api: Arc<FakeApi>,
    pub cache: Arc<RecordingCache>,
    pub notifier: Arc<RecordingNotifier>,
    closed: Arc<AtomicUsize>,
}

impl Harness {
    pub fn new(api: FakeApi) -> Self {
        let fakes = Fakes::new(api);
        Self {
            form: fakes.form(),
            api: fakes.api,
            cache: fakes.cache,
            notifier: fakes.notifier,
            closed: fakes.closed,
        }
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

pub(crate) fn png(size: u64) -> ImageFile {
    ImageFile {
        path: "/tmp/cat.png".into(),
        size,
        mime_type: "image/png".into(),
    }
}

/// Collects formatted log output so tests can assert on diagnostics.
#[derive(Clone, Default)]
pub(crate) struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    /// Installs a subscriber writing into this buffer for the current thread.
    pub fn capture(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.0.lock().unwrap())
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Lines logged at `level`, e.g. `"ERROR"`.
    pub fn at_level(&self, level: &str) -> Vec<String> {
        let tag = format!(" {level} ");
        self.lines().into_iter().filter(|l| l.contains(&tag)).collect()
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
