use serde_json::{json, Value};
use thiserror::Error;

pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Only POST requests are allowed.";
pub const MISSING_API_KEY_MESSAGE: &str = "Server configuration error: API key is missing.";
pub const BAD_REQUEST_MESSAGE: &str = "Bad Request: Missing \"contents\" in the request body.";
pub const UPSTREAM_FAILURE_PREFIX: &str = "Failed to get a response from the AI.";
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal server error occurred.";

#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    #[error("API key is not configured")]
    MissingApiKey,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Upstream returned {status}: {}", .message.as_deref().unwrap_or("no error message"))]
    Upstream { status: u16, message: Option<String> },

    #[error("Internal error: {0}")]
    Internal(String),
}

// reqwest errors carry the request URL, and the URL carries the key.
impl From<reqwest::Error> for ProxyError {
    fn from(e: reqwest::Error) -> Self {
        ProxyError::Internal(e.without_url().to_string())
    }
}

impl From<serde_json::Error> for ProxyError {
    fn from(e: serde_json::Error) -> Self {
        ProxyError::Internal(format!("JSON error: {}", e))
    }
}

impl From<url::ParseError> for ProxyError {
    fn from(e: url::ParseError) -> Self {
        ProxyError::Internal(format!("Invalid upstream URL: {}", e))
    }
}

impl ProxyError {
    /// HTTP status returned to the caller for this error.
    pub fn status(&self) -> u16 {
        match self {
            ProxyError::MethodNotAllowed(_) => 405,
            ProxyError::MissingApiKey => 500,
            ProxyError::BadRequest(_) => 400,
            ProxyError::Upstream { status, .. } => *status,
            ProxyError::Internal(_) => 500,
        }
    }

    /// JSON body returned to the caller. Never includes internal details.
    pub fn body(&self) -> Value {
        match self {
            ProxyError::MethodNotAllowed(_) => json!({ "message": METHOD_NOT_ALLOWED_MESSAGE }),
            ProxyError::MissingApiKey => json!({ "error": MISSING_API_KEY_MESSAGE }),
            ProxyError::BadRequest(_) => json!({ "error": BAD_REQUEST_MESSAGE }),
            ProxyError::Upstream { message, .. } => {
                let error = match message {
                    Some(m) if !m.is_empty() => format!("{} {}", UPSTREAM_FAILURE_PREFIX, m),
                    _ => UPSTREAM_FAILURE_PREFIX.to_string(),
                };
                json!({ "error": error })
            }
            ProxyError::Internal(_) => json!({ "error": INTERNAL_ERROR_MESSAGE }),
        }
    }
}
