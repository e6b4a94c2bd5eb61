//! Unified client-side error handling.
//!
//! Every failure of an admin operation ends up as one `AppError`, which can
//! be rendered as a single human-readable message while the screen stays
//! usable. Nothing here is fatal to the process.

use domain::{DomainError, FieldErrors};
use serde_json::Value;
use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication & Authorization
    #[error("Authentication required")]
    Unauthorized,

    #[error("Access denied")]
    Forbidden,

    // Resource errors
    #[error("Resource not found")]
    NotFound,

    #[error("{0} already exists")]
    Conflict(String),

    // Validation
    /// Rejected by the backend
    #[error("{0}")]
    Validation(String),

    /// Rejected client-side; never reached the network
    #[error("Please fix the highlighted fields")]
    InvalidFields(FieldErrors),

    // Remote errors
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Image upload failed: {0}")]
    ImageHost(String),

    #[cfg(feature = "http")]
    #[error("HTTP client error")]
    Http(#[from] reqwest::Error),

    // Local
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error")]
    Internal(String),
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Forbidden => "FORBIDDEN",
            AppError::NotFound => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::InvalidFields(_) => "INVALID_FIELDS",
            AppError::Api { .. } => "API_ERROR",
            AppError::Network(_) => "NETWORK_ERROR",
            AppError::Decode(_) => "DECODE_ERROR",
            AppError::ImageHost(_) => "IMAGE_HOST_ERROR",
            #[cfg(feature = "http")]
            AppError::Http(_) => "HTTP_ERROR",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            // Show full message for client errors
            AppError::Validation(msg) => msg.clone(),
            AppError::Conflict(msg) => {
                if msg.ends_with("already exists") {
                    msg.clone()
                } else {
                    format!("{} already exists", msg)
                }
            }
            AppError::NotFound => {
                "This item no longer exists. Refresh the list and try again.".to_string()
            }
            AppError::Api { message, .. } if !message.is_empty() => message.clone(),

            // Hide details for transport/internal errors
            AppError::Network(e) => {
                tracing::error!("Network error: {}", e);
                "Could not reach the server. Check your connection and try again.".to_string()
            }
            #[cfg(feature = "http")]
            AppError::Http(e) => {
                tracing::error!("HTTP client error: {:?}", e);
                "Could not reach the server. Check your connection and try again.".to_string()
            }
            AppError::Decode(e) => {
                tracing::error!("Decode error: {}", e);
                "The server sent an unexpected response".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }

            // Use default message for others
            _ => self.to_string(),
        }
    }

    /// Map a non-success HTTP status and its body to an error.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = extract_message(body);
        match status {
            401 => AppError::Unauthorized,
            403 => AppError::Forbidden,
            404 => AppError::NotFound,
            409 => AppError::Conflict(message.unwrap_or_else(|| "Resource".to_string())),
            400 | 422 => {
                AppError::Validation(message.unwrap_or_else(|| "Invalid request".to_string()))
            }
            _ => AppError::Api {
                status,
                message: message.unwrap_or_default(),
            },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound)
    }

    /// Field-level errors, when this is a client-side validation failure.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            AppError::InvalidFields(errors) => Some(errors),
            _ => None,
        }
    }
}

/// Pull a human-readable message out of a backend error body.
fn extract_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    let Ok(json) = serde_json::from_str::<Value>(trimmed) else {
        return Some(trimmed.to_string());
    };

    let text = |v: &Value| v.as_str().map(str::to_string);
    json.get("message")
        .and_then(text)
        .or_else(|| json.get("error").and_then(text))
        .or_else(|| {
            json.get("error")
                .and_then(|e| e.get("message"))
                .and_then(text)
        })
}

// =============================================================================
// Domain Error Conversion
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Invalid(fields) => AppError::InvalidFields(fields),
            DomainError::Validation(msg) => AppError::Validation(msg),
            DomainError::NotFound(_) => AppError::NotFound,
            DomainError::Malformed(msg) => AppError::Decode(msg),
        }
    }
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        AppError::InvalidFields(errors)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Decode(err.to_string())
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self) -> AppResult<T> {
        self.ok_or(AppError::NotFound)
    }
}

/// Convenience constructors
impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    pub fn network(msg: impl Into<String>) -> Self {
        AppError::Network(msg.into())
    }

    pub fn image_host(msg: impl Into<String>) -> Self {
        AppError::ImageHost(msg.into())
    }
}
