use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use super::toast::{Notifier, Toast, ToastStatus};
use crate::api::{IMAGES_KEY, ImageApi, QueryCache};
use crate::model::{Field, FieldRules, FieldValue, ImageFile, NewImage, validate_field};
use crate::upload::UploadState;

const SUCCESS_TITLE: &str = "Success";
const SUCCESS_DESCRIPTION: &str = "Image saved successfully";
const ERROR_TITLE: &str = "Error";
const ERROR_DESCRIPTION: &str = "Failed to save image";

/// Collaborators the form talks to.
#[derive(Clone)]
pub struct FormServices {
    pub api: Arc<dyn ImageApi>,
    pub cache: Arc<dyn QueryCache>,
    pub notifier: Arc<dyn Notifier>,
    pub toast_duration: Duration,
}

/// How a submission ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A field rule failed. Nothing was sent and the form kept its values.
    Invalid,
    /// The fields were valid but no image URL was available.
    MissingImageUrl,
    /// The record was created.
    Created(NewImage),
    /// The create request failed.
    Failed,
}

/// State and submission flow of the add-image form.
///
/// Field values and errors live here; the picker reports its result through
/// [`set_image_url`](Self::set_image_url) and
/// [`set_local_image_url`](Self::set_local_image_url). Every submission that
/// passes validation ends with the form reset and `on_close` called, whatever
/// happened in between.
pub struct AddImageForm {
    image: Option<ImageFile>,
    title: String,
    description: String,
    errors: [Option<String>; 3],
    upload: UploadState,
    submitting: bool,
    rules: FieldRules,
    services: FormServices,
    on_close: Box<dyn FnMut() + Send>,
}

impl AddImageForm {
    /// Creates an empty form with the default rule table.
    pub fn new(services: FormServices, on_close: impl FnMut() + Send + 'static) -> Self {
        Self {
            image: None,
            title: String::new(),
            description: String::new(),
            errors: Default::default(),
            upload: UploadState::default(),
            submitting: false,
            rules: FieldRules::default(),
            services,
            on_close: Box::new(on_close),
        }
    }

    /// Replaces the rule table.
    pub fn with_rules(mut self, rules: FieldRules) -> Self {
        self.rules = rules;
        self
    }

    /// The picked file, if any.
    pub fn image(&self) -> Option<&ImageFile> {
        self.image.as_ref()
    }

    /// Replaces the picked file without re-validating it.
    pub fn set_image(&mut self, image: Option<ImageFile>) {
        self.image = image;
    }

    /// Returns the current title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Sets the title without re-validating it.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Returns the current description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Sets the description without re-validating it.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    fn value(&self, field: Field) -> FieldValue<'_> {
        match field {
            Field::Image => FieldValue::File(self.image.as_ref()),
            Field::Title => FieldValue::Text(&self.title),
            Field::Description => FieldValue::Text(&self.description),
        }
    }

    /// Returns the error shown under `field`, if any.
    pub fn error(&self, field: Field) -> Option<&str> {
        self.errors[field.index()].as_deref()
    }

    /// Shows `message` under `field` until the next validation of it.
    pub fn set_error(&mut self, field: Field, message: impl Into<String>) {
        self.errors[field.index()] = Some(message.into());
    }

    /// Returns `true` if any field shows an error.
    pub fn has_errors(&self) -> bool {
        self.errors.iter().any(Option::is_some)
    }

    /// Re-runs the rules of one field, updating its error. Returns `true` if
    /// the field is valid.
    pub fn trigger(&mut self, field: Field) -> bool {
        let result = validate_field(field, self.value(field), self.rules.for_field(field));
        self.errors[field.index()] = result.err().map(|e| e.message);
        self.errors[field.index()].is_none()
    }

    /// Runs the rules of every field so all errors show at once.
    pub fn validate(&mut self) -> bool {
        Field::ALL
            .into_iter()
            .fold(true, |valid, field| self.trigger(field) && valid)
    }

    /// Returns the picker's URLs.
    pub fn upload(&self) -> &UploadState {
        &self.upload
    }

    /// URL returned by the image host, or empty before an upload.
    pub fn image_url(&self) -> &str {
        self.upload.image_url()
    }

    /// Stores the URL returned by the image host.
    pub fn set_image_url(&mut self, url: impl Into<String>) {
        self.upload.set_image_url(url);
    }

    /// Path of the picked file as shown to the user.
    pub fn local_image_url(&self) -> &str {
        self.upload.local_image_url()
    }

    /// Stores the path of the picked file.
    pub fn set_local_image_url(&mut self, url: impl Into<String>) {
        self.upload.set_local_image_url(url);
    }

    /// `true` while a create request is in flight.
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Validates every field and, if all pass, enters the submitting state.
    pub fn begin_submit(&mut self) -> bool {
        if self.submitting {
            return false;
        }
        self.submitting = self.validate();
        self.submitting
    }

    /// Sends the record after a successful [`begin_submit`](Self::begin_submit),
    /// then resets the form and calls `on_close`.
    ///
    /// Returns [`SubmitOutcome::Invalid`] without side effects if the form is
    /// not in the submitting state.
    pub async fn send(&mut self) -> SubmitOutcome {
        if !self.submitting {
            return SubmitOutcome::Invalid;
        }
        let outcome = self.persist().await;
        self.settle();
        outcome
    }

    /// Validates and sends in one step.
    pub async fn submit(&mut self) -> SubmitOutcome {
        if !self.begin_submit() {
            return SubmitOutcome::Invalid;
        }
        self.send().await
    }

    async fn persist(&self) -> SubmitOutcome {
        if !self.upload.is_uploaded() {
            self.notify(ToastStatus::Error, ERROR_TITLE, ERROR_DESCRIPTION);
            return SubmitOutcome::MissingImageUrl;
        }

        let record = NewImage {
            title: self.title.clone(),
            description: self.description.clone(),
            url: self.upload.image_url().to_string(),
        };
        match self.services.api.create_image(&record).await {
            Ok(()) => {
                self.services.cache.invalidate(IMAGES_KEY);
                info!(title = %record.title, url = %record.url, "image created");
                self.notify(ToastStatus::Success, SUCCESS_TITLE, SUCCESS_DESCRIPTION);
                SubmitOutcome::Created(record)
            }
            Err(e) => {
                error!(error = %e, "failed to create image");
                self.notify(ToastStatus::Error, ERROR_TITLE, ERROR_DESCRIPTION);
                SubmitOutcome::Failed
            }
        }
    }

    /// Clears values, errors and upload state.
    pub fn reset(&mut self) {
        self.image = None;
        self.title.clear();
        self.description.clear();
        self.errors = Default::default();
        self.upload.clear();
    }

    /// Abandons the form: resets it and asks the host to close.
    pub fn cancel(&mut self) {
        self.reset();
        (self.on_close)();
    }

    fn settle(&mut self) {
        self.reset();
        self.submitting = false;
        (self.on_close)();
    }

    fn notify(&self, status: ToastStatus, title: &str, description: &str) {
        self.services.notifier.notify(Toast::new(
            status,
            title,
            description,
            self.services.toast_duration,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeApi, Harness, LogBuffer, png};

    const MIB: u64 = 1024 * 1024;

    fn fill_valid(harness: &mut Harness) {
        harness.form.set_image(Some(png(3 * MIB)));
        harness.form.set_title("Sunset");
        harness.form.set_description("Over the bay");
    }

    mod fields {
        use super::*;

        #[test]
        fn starts_empty() {
            let harness = Harness::new(FakeApi::default());
            let form = &harness.form;
            assert!(form.image().is_none());
            assert_eq!(form.title(), "");
            assert_eq!(form.description(), "");
            assert!(!form.has_errors());
            assert!(!form.is_submitting());
            assert_eq!(form.image_url(), "");
            assert_eq!(form.local_image_url(), "");
        }

        #[test]
        fn trigger_sets_and_clears_error() {
            let mut harness = Harness::new(FakeApi::default());
            harness.form.set_title("a");
            assert!(!harness.form.trigger(Field::Title));
            assert_eq!(
                harness.form.error(Field::Title),
                Some("Minimum of 2 characters")
            );
            harness.form.set_title("ab");
            assert!(harness.form.trigger(Field::Title));
            assert_eq!(harness.form.error(Field::Title), None);
        }

        #[test]
        fn trigger_only_touches_its_field() {
            let mut harness = Harness::new(FakeApi::default());
            harness.form.trigger(Field::Image);
            assert_eq!(harness.form.error(Field::Image), Some("File required"));
            assert_eq!(harness.form.error(Field::Title), None);
        }

        #[test]
        fn validate_reports_every_field() {
            let mut harness = Harness::new(FakeApi::default());
            assert!(!harness.form.validate());
            assert_eq!(harness.form.error(Field::Image), Some("File required"));
            assert_eq!(harness.form.error(Field::Title), Some("Title required"));
            assert_eq!(
                harness.form.error(Field::Description),
                Some("Description required")
            );
        }

        #[test]
        fn set_error_is_visible() {
            let mut harness = Harness::new(FakeApi::default());
            harness.form.set_error(Field::Image, "Upload failed");
            assert!(harness.form.has_errors());
            assert_eq!(harness.form.error(Field::Image), Some("Upload failed"));
        }

        #[test]
        fn custom_rules_replace_defaults() {
            let harness = Harness::new(FakeApi::default());
            let mut form = harness.form.with_rules(FieldRules {
                image: vec![],
                title: vec![],
                description: vec![],
            });
            assert!(form.validate());
        }

        #[test]
        fn cancel_resets_and_closes() {
            let mut harness = Harness::new(FakeApi::default());
            fill_valid(&mut harness);
            harness.form.set_image_url("https://i.example/cat.png");
            harness.form.set_local_image_url("/tmp/cat.png");
            harness.form.cancel();
            assert_eq!(harness.form.title(), "");
            assert_eq!(harness.form.image_url(), "");
            assert_eq!(harness.form.local_image_url(), "");
            assert_eq!(harness.closed(), 1);
            assert!(harness.notifier.toasts().is_empty());
        }
    }

    mod submit {
        use super::*;

        #[tokio::test]
        async fn success_creates_invalidates_notifies_and_closes() {
            let mut harness = Harness::new(FakeApi::default());
            fill_valid(&mut harness);
            harness.form.set_image_url("https://i.example/cat.png");
            harness.form.set_local_image_url("/tmp/cat.png");

            let outcome = harness.form.submit().await;

            let expected = NewImage {
                title: "Sunset".into(),
                description: "Over the bay".into(),
                url: "https://i.example/cat.png".into(),
            };
            assert_eq!(outcome, SubmitOutcome::Created(expected.clone()));
            assert_eq!(harness.api.created(), vec![expected]);
            assert_eq!(harness.cache.keys(), vec![IMAGES_KEY.to_string()]);

            let toasts = harness.notifier.toasts();
            assert_eq!(toasts.len(), 1);
            assert_eq!(toasts[0].status, ToastStatus::Success);
            assert_eq!(toasts[0].title, "Success");
            assert_eq!(toasts[0].description, "Image saved successfully");
            assert_eq!(toasts[0].duration, Duration::from_millis(5000));
            assert!(toasts[0].is_closable);

            assert_eq!(harness.form.title(), "");
            assert_eq!(harness.form.description(), "");
            assert!(harness.form.image().is_none());
            assert_eq!(harness.form.image_url(), "");
            assert_eq!(harness.form.local_image_url(), "");
            assert!(!harness.form.is_submitting());
            assert_eq!(harness.closed(), 1);
        }

        #[tokio::test]
        async fn missing_image_url_skips_network() {
            let mut harness = Harness::new(FakeApi::default());
            fill_valid(&mut harness);

            let outcome = harness.form.submit().await;

            assert_eq!(outcome, SubmitOutcome::MissingImageUrl);
            assert!(harness.api.created().is_empty());
            assert!(harness.cache.keys().is_empty());
            let toasts = harness.notifier.toasts();
            assert_eq!(toasts.len(), 1);
            assert_eq!(toasts[0].status, ToastStatus::Error);
            assert_eq!(toasts[0].description, "Failed to save image");
            assert_eq!(harness.form.title(), "");
            assert_eq!(harness.closed(), 1);
        }

        #[tokio::test]
        async fn create_failure_notifies_resets_and_closes() {
            let mut harness = Harness::new(FakeApi::failing());
            fill_valid(&mut harness);
            harness.form.set_image_url("https://i.example/cat.png");

            let outcome = harness.form.submit().await;

            assert_eq!(outcome, SubmitOutcome::Failed);
            assert!(harness.cache.keys().is_empty());
            let toasts = harness.notifier.toasts();
            assert_eq!(toasts.len(), 1);
            assert_eq!(toasts[0].status, ToastStatus::Error);
            assert_eq!(toasts[0].title, "Error");
            assert_eq!(harness.form.image_url(), "");
            assert!(!harness.form.is_submitting());
            assert_eq!(harness.closed(), 1);
        }

        #[tokio::test]
        async fn create_failure_logs_one_error() {
            let logs = LogBuffer::default();
            let _guard = logs.capture();
            let mut harness = Harness::new(FakeApi::failing());
            fill_valid(&mut harness);
            harness.form.set_image_url("https://i.example/cat.png");

            assert_eq!(harness.form.submit().await, SubmitOutcome::Failed);

            let errors = logs.at_level("ERROR");
            assert_eq!(errors.len(), 1, "{errors:?}");
            assert!(errors[0].contains("failed to create image"));
        }

        #[tokio::test]
        async fn create_success_logs_no_error() {
            let logs = LogBuffer::default();
            let _guard = logs.capture();
            let mut harness = Harness::new(FakeApi::default());
            fill_valid(&mut harness);
            harness.form.set_image_url("https://i.example/cat.png");

            harness.form.submit().await;

            assert!(logs.at_level("ERROR").is_empty());
            assert_eq!(logs.at_level("INFO").len(), 1);
        }

        #[tokio::test]
        async fn invalid_fields_block_everything() {
            let mut harness = Harness::new(FakeApi::default());
            fill_valid(&mut harness);
            harness.form.set_title("a");
            harness.form.set_image_url("https://i.example/cat.png");

            let outcome = harness.form.submit().await;

            assert_eq!(outcome, SubmitOutcome::Invalid);
            assert!(harness.api.created().is_empty());
            assert!(harness.notifier.toasts().is_empty());
            assert_eq!(harness.closed(), 0);
            // Values survive so the user can fix them.
            assert_eq!(harness.form.title(), "a");
            assert_eq!(harness.form.image_url(), "https://i.example/cat.png");
            assert_eq!(
                harness.form.error(Field::Title),
                Some("Minimum of 2 characters")
            );
            assert!(!harness.form.is_submitting());
        }

        #[tokio::test]
        async fn oversized_image_blocks_submit() {
            let mut harness = Harness::new(FakeApi::default());
            fill_valid(&mut harness);
            harness.form.set_image(Some(png(11 * MIB)));
            harness.form.set_image_url("https://i.example/cat.png");

            assert_eq!(harness.form.submit().await, SubmitOutcome::Invalid);
            assert_eq!(
                harness.form.error(Field::Image),
                Some("File must be smaller than 10MB")
            );
        }

        #[tokio::test]
        async fn begin_submit_sets_submitting_until_send() {
            let mut harness = Harness::new(FakeApi::default());
            fill_valid(&mut harness);
            harness.form.set_image_url("https://i.example/cat.png");

            assert!(harness.form.begin_submit());
            assert!(harness.form.is_submitting());
            assert!(!harness.form.begin_submit(), "second begin is refused");

            harness.form.send().await;
            assert!(!harness.form.is_submitting());
            assert_eq!(harness.closed(), 1);
        }

        #[tokio::test]
        async fn send_without_begin_is_noop() {
            let mut harness = Harness::new(FakeApi::default());
            fill_valid(&mut harness);
            harness.form.set_image_url("https://i.example/cat.png");

            assert_eq!(harness.form.send().await, SubmitOutcome::Invalid);
            assert!(harness.api.created().is_empty());
            assert_eq!(harness.closed(), 0);
            assert_eq!(harness.form.title(), "Sunset");
        }

        #[tokio::test]
        async fn form_is_reusable_after_settling() {
            let mut harness = Harness::new(FakeApi::default());
            fill_valid(&mut harness);
            harness.form.set_image_url("https://i.example/1.png");
            harness.form.submit().await;

            fill_valid(&mut harness);
            harness.form.set_image_url("https://i.example/2.png");
            harness.form.submit().await;

            let urls: Vec<String> = harness.api.created().into_iter().map(|i| i.url).collect();
            assert_eq!(urls, vec!["https://i.example/1.png", "https://i.example/2.png"]);
            assert_eq!(harness.closed(), 2);
        }
    }
}
