use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use ab_domain::config::Config;
use ab_secrets::SecretStore;

use crate::backends::BackendFactory;

/// Shared application state passed to the request handler.
///
/// Holds no per-request data and nothing mutable: secrets are resolved
/// and clients built inside each request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub secrets: Arc<dyn SecretStore>,
    pub backends: Arc<dyn BackendFactory>,
    /// Cancelled on shutdown; in-flight run polls stop when it fires.
    pub shutdown: CancellationToken,
}
