/// Shared error type used across all assistant-bridge crates.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP: {0}")]
    Http(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("cancelled: {0}")]
    Cancelled(String),

    /// Secret store unreachable or a parameter is missing.
    #[error("config unavailable: {0}")]
    ConfigUnavailable(String),

    #[error("assistant profile not found: {0}")]
    ProfileNotFound(String),

    #[error("validation: {0}")]
    Validation(String),

    #[error("assistant run {run_id} failed: {message}")]
    AssistantRunFailed { run_id: String, message: String },

    /// Unexpected response shape or status from the assistant service.
    #[error("assistant service: {0}")]
    Assistant(String),

    #[error("datastore: {0}")]
    Datastore(String),

    #[error("transcript write failed: {0}")]
    LogWriteFailed(String),

    #[error("auth: {0}")]
    Auth(String),

    #[error("config: {0}")]
    Config(String),
}

impl Error {
    /// Stable classification used in structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Io(_) => "Io",
            Error::Json(_) => "Json",
            Error::Http(_) => "Http",
            Error::Timeout(_) => "Timeout",
            Error::Cancelled(_) => "Cancelled",
            Error::ConfigUnavailable(_) => "ConfigUnavailable",
            Error::ProfileNotFound(_) => "ProfileNotFound",
            Error::Validation(_) => "ValidationError",
            Error::AssistantRunFailed { .. } => "AssistantRunFailed",
            Error::Assistant(_) => "Assistant",
            Error::Datastore(_) => "Datastore",
            Error::LogWriteFailed(_) => "LogWriteFailed",
            Error::Auth(_) => "Auth",
            Error::Config(_) => "Config",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
