//! Commands module - one module per CLI command.

pub mod delete;
pub mod list;

use std::sync::Arc;

use tracing::debug;

use common::{AppResult, ClientConfig};

use crate::clients::{ApiTransport, HttpTransport};

/// Backend transport shared by every command.
fn connect(config: &ClientConfig) -> AppResult<Arc<dyn ApiTransport>> {
    debug!("Using backend {}", config.api.base_url());
    Ok(Arc::new(HttpTransport::new(config)?))
}
