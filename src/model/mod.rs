mod image;
mod size;
mod validation;

pub use image::{ImageFile, ImagePage, NewImage, StoredImage};
pub use size::format_scale;
pub use validation::{
    Check, Field, FieldRules, FieldValue, Rule, ValidationError, validate_field,
};
