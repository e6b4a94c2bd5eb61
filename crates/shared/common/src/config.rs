//! Client configuration loaded from environment variables.

use std::env;
use std::time::Duration;

// =============================================================================
// Environment variables
// =============================================================================

/// Base URL of the WhereToGo backend, read on every request
pub const ENV_API_URL: &str = "WHERETOGO_API_URL";
pub const ENV_REQUEST_TIMEOUT_MS: &str = "WHERETOGO_REQUEST_TIMEOUT_MS";
pub const ENV_PAGE_SIZE: &str = "WHERETOGO_PAGE_SIZE";
pub const ENV_SEARCH_DEBOUNCE_MS: &str = "WHERETOGO_SEARCH_DEBOUNCE_MS";
pub const ENV_IMAGE_UPLOAD_PATH: &str = "WHERETOGO_IMAGE_UPLOAD_PATH";
pub const ENV_SESSION_ID: &str = "WHERETOGO_SESSION_ID";

// =============================================================================
// Defaults
// =============================================================================

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 100;
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;
pub const DEFAULT_IMAGE_UPLOAD_PATH: &str = "/api/images/upload";
pub const IMAGE_DELETE_PATH: &str = "/api/images/delete";

/// Where the backend lives.
///
/// The URL is resolved at call time so a changed environment takes effect
/// without rebuilding clients.
#[derive(Debug, Clone, Default)]
pub struct ApiConfig {
    /// Fixed base URL; when `None` the environment is consulted per call
    pub fixed_base_url: Option<String>,
}

impl ApiConfig {
    /// Always use this base URL (tests, CLI override).
    pub fn fixed(url: impl Into<String>) -> Self {
        Self {
            fixed_base_url: Some(url.into()),
        }
    }

    /// Current base URL without a trailing slash.
    pub fn base_url(&self) -> String {
        let raw = match &self.fixed_base_url {
            Some(url) => url.clone(),
            None => env::var(ENV_API_URL).unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
        };
        raw.trim_end_matches('/').to_string()
    }

    /// Join the base URL and an absolute path such as `/api/places`.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url(), path.trim_start_matches('/'))
    }
}

/// Client-wide settings.
#[derive(Clone)]
pub struct ClientConfig {
    pub api: ApiConfig,
    pub request_timeout_ms: u64,
    pub page_size: usize,
    pub search_debounce_ms: u64,
    pub image_upload_path: String,
    /// Marks "this browser's" session in the session list
    session_id: Option<String>,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api", &self.api)
            .field("request_timeout_ms", &self.request_timeout_ms)
            .field("page_size", &self.page_size)
            .field("search_debounce_ms", &self.search_debounce_ms)
            .field("image_upload_path", &self.image_upload_path)
            .field("session_id", &self.session_id.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl ClientConfig {
    /// Load configuration from environment variables (and `.env`).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            api: ApiConfig::default(),
            request_timeout_ms: env::var(ENV_REQUEST_TIMEOUT_MS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS),
            page_size: env::var(ENV_PAGE_SIZE)
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|size| *size > 0)
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .min(MAX_PAGE_SIZE),
            search_debounce_ms: env::var(ENV_SEARCH_DEBOUNCE_MS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SEARCH_DEBOUNCE_MS),
            image_upload_path: env::var(ENV_IMAGE_UPLOAD_PATH)
                .unwrap_or_else(|_| DEFAULT_IMAGE_UPLOAD_PATH.to_string()),
            session_id: env::var(ENV_SESSION_ID).ok().filter(|s| !s.is_empty()),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            page_size: DEFAULT_PAGE_SIZE,
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
            image_upload_path: DEFAULT_IMAGE_UPLOAD_PATH.to_string(),
            session_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_url_joins_paths() {
        let api = ApiConfig::fixed("http://api.test/");
        assert_eq!(api.base_url(), "http://api.test");
        assert_eq!(api.url("/api/places"), "http://api.test/api/places");
        assert_eq!(api.url("api/places/3"), "http://api.test/api/places/3");
    }

    #[test]
    fn test_debug_redacts_session() {
        let config = ClientConfig::default().with_session_id("abc-123");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("abc-123"));
        assert_eq!(config.session_id(), Some("abc-123"));
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.page_size, 10);
        assert_eq!(config.search_debounce(), Duration::from_millis(300));
    }
}
