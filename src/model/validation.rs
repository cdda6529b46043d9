use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use super::image::ImageFile;
use super::size::format_scale;

/// The inputs of the add-image form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Image,
    Title,
    Description,
}

impl Field {
    /// All fields in display order.
    pub const ALL: [Field; 3] = [Field::Image, Field::Title, Field::Description];

    /// Position of the field in display order.
    pub fn index(self) -> usize {
        match self {
            Self::Image => 0,
            Self::Title => 1,
            Self::Description => 2,
        }
    }
}

/// A field failed one of its rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub field: Field,
    pub message: String,
}

static ACCEPTED_FORMATS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"image/(jpeg|png|gif)").expect("valid hardcoded regex"));

/// The current value of a field, as seen by its rules.
#[derive(Debug, Clone, Copy)]
pub enum FieldValue<'a> {
    Text(&'a str),
    File(Option<&'a ImageFile>),
}

/// A predicate over a [`FieldValue`].
///
/// Length checks only look at text values and file checks only at a picked
/// file; anything else passes, leaving absence to [`Check::Required`].
#[derive(Debug, Clone)]
pub enum Check {
    Required,
    /// Minimum number of characters.
    MinLength(usize),
    /// Maximum number of characters.
    MaxLength(usize),
    /// Upper bound on [`format_scale`] of the file size, inclusive.
    MaxScaledSize(f64),
    /// The sniffed MIME type must contain a match.
    MimeType(&'static Regex),
}

impl Check {
    fn passes(&self, value: FieldValue<'_>) -> bool {
        match (self, value) {
            (Self::Required, FieldValue::Text(text)) => !text.is_empty(),
            (Self::Required, FieldValue::File(file)) => file.is_some(),
            (Self::MinLength(min), FieldValue::Text(text)) => text.chars().count() >= *min,
            (Self::MaxLength(max), FieldValue::Text(text)) => text.chars().count() <= *max,
            (Self::MaxScaledSize(limit), FieldValue::File(Some(file))) => {
                format_scale(file.size) <= *limit
            }
            (Self::MimeType(pattern), FieldValue::File(Some(file))) => {
                pattern.is_match(&file.mime_type)
            }
            _ => true,
        }
    }
}

/// A check plus the message shown when it fails.
#[derive(Debug, Clone)]
pub struct Rule {
    pub check: Check,
    pub message: &'static str,
}

impl Rule {
    pub const fn new(check: Check, message: &'static str) -> Self {
        Self { check, message }
    }
}

/// The rule table for every field of the form.
#[derive(Debug, Clone)]
pub struct FieldRules {
    pub image: Vec<Rule>,
    pub title: Vec<Rule>,
    pub description: Vec<Rule>,
}

impl FieldRules {
    /// Returns the rules declared for `field`.
    pub fn for_field(&self, field: Field) -> &[Rule] {
        match field {
            Field::Image => &self.image,
            Field::Title => &self.title,
            Field::Description => &self.description,
        }
    }
}

impl Default for FieldRules {
    fn default() -> Self {
        Self {
            image: vec![
                Rule::new(Check::Required, "File required"),
                Rule::new(
                    Check::MaxScaledSize(10.0),
                    "File must be smaller than 10MB",
                ),
                Rule::new(
                    Check::MimeType(&ACCEPTED_FORMATS_RE),
                    "Only PNG, JPEG and GIF files are accepted",
                ),
            ],
            title: vec![
                Rule::new(Check::Required, "Title required"),
                Rule::new(Check::MinLength(2), "Minimum of 2 characters"),
                Rule::new(Check::MaxLength(20), "Maximum of 20 characters"),
            ],
            description: vec![
                Rule::new(Check::Required, "Description required"),
                Rule::new(Check::MaxLength(65), "Maximum of 65 characters"),
            ],
        }
    }
}

/// Runs `rules` in order against `value`; the first failure wins.
pub fn validate_field(
    field: Field,
    value: FieldValue<'_>,
    rules: &[Rule],
) -> Result<(), ValidationError> {
    match rules.iter().find(|rule| !rule.check.passes(value)) {
        Some(rule) => Err(ValidationError {
            field,
            message: rule.message.to_string(),
        }),
        None => Ok(()),
    }
}
