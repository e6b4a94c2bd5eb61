//! Field-level validation helpers shared by all drafts.

use std::collections::BTreeMap;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use validator::{ValidationError, ValidationErrors};

use crate::constants::{CATEGORY_ICONS, MAX_RATING, MIN_RATING};

/// `local@domain.tld` shape; loose beyond that.
pub static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// `#RGB` or `#RRGGBB`
pub static HEX_COLOR_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").unwrap());

/// Per-field validation messages keyed by the camelCase wire field name.
///
/// Only the first message for a field is kept, which is what a form shows
/// under the input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message unless the field already has one.
    pub fn add(&mut self, field: impl AsRef<str>, message: impl Into<String>) {
        self.0
            .entry(camel_case(field.as_ref()))
            .or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Merge another set of errors, keeping existing messages.
    pub fn merge(&mut self, other: FieldErrors) {
        for (field, message) in other.0 {
            self.0.entry(field).or_insert(message);
        }
    }

    /// `Ok(())` when empty, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Collect the outcome of a `validator` run.
    pub fn from_validation(result: Result<(), ValidationErrors>) -> Self {
        let mut errors = FieldErrors::new();
        if let Err(e) = result {
            for (field, field_errors) in e.field_errors() {
                if let Some(error) = field_errors.first() {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| error.code.to_string());
                    errors.add(field.to_string(), message);
                }
            }
        }
        errors
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "{}", joined)
    }
}

/// `snake_case` -> `camelCase`; already camelCase input passes through.
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

// =============================================================================
// Custom validator functions
// =============================================================================

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut e = ValidationError::new(code);
    e.message = Some(message.into());
    e
}

/// Required text: empty or whitespace-only is rejected.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error("required", "This field is required"));
    }
    Ok(())
}

/// Email must look like `local@domain.tld`.
pub fn email_shape(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error("required", "Email is required"));
    }
    if !EMAIL_REGEX.is_match(value.trim()) {
        return Err(error("email", "Please enter a valid email address"));
    }
    Ok(())
}

/// Empty is allowed (no color chosen); otherwise must be a hex color.
pub fn hex_color(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || HEX_COLOR_REGEX.is_match(value) {
        Ok(())
    } else {
        Err(error("color", "Color must be a hex value like #6366F1"))
    }
}

fn within(value: f64, min: f64, max: f64) -> bool {
    !value.is_nan() && (min..=max).contains(&value)
}

/// Optional rating; only checked when set.
pub fn rating_range(value: f64) -> Result<(), ValidationError> {
    if within(value, MIN_RATING, MAX_RATING) {
        Ok(())
    } else {
        Err(error("range", "Rating must be between 0 and 5"))
    }
}

pub fn latitude_range(value: f64) -> Result<(), ValidationError> {
    if within(value, -90.0, 90.0) {
        Ok(())
    } else {
        Err(error("range", "Latitude must be between -90 and 90"))
    }
}

pub fn longitude_range(value: f64) -> Result<(), ValidationError> {
    if within(value, -180.0, 180.0) {
        Ok(())
    } else {
        Err(error("range", "Longitude must be between -180 and 180"))
    }
}

/// Icon key must be one the front-end registry can render.
pub fn known_icon(value: &str) -> Result<(), ValidationError> {
    if CATEGORY_ICONS.contains(&value) {
        Ok(())
    } else {
        Err(error("icon", "Pick one of the available icons"))
    }
}
