//! Clients for the external collaborators: the REST backend and the image host.

mod api_client;
mod image_host;
mod profile_client;

pub use api_client::{unwrap_envelope, ApiTransport, HttpTransport};
pub use image_host::{public_id_from_url, HttpImageHost, ImageHost};
pub use profile_client::ProfileClient;

#[cfg(any(test, feature = "test-utils"))]
pub use api_client::MockApiTransport;
#[cfg(any(test, feature = "test-utils"))]
pub use image_host::MockImageHost;
