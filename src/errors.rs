use std::fmt;

/// Error types surfaced by the SDK.
///
/// Every variant is raised at the point of the offending call; nothing is
/// retried or swallowed inside the core.
#[derive(Debug)]
pub enum ApiError {
    /// A date/time string that could not be parsed.
    InvalidDate(String),
    /// Custom field added without either a field ID or a name.
    InvalidCustomField(String),
    /// Composite (array/object) value where a scalar was expected.
    UnsupportedValueType(String),
    /// Response payload that is not valid JSON.
    MalformedResponse(String),
    /// Failure while serializing a request body.
    Serialization(String),
    /// Network or HTTP-level failure, passed through from the transport.
    Transport(String),
    /// Error with context chain for better debugging.
    WithContext {
        /// The underlying source of the error.
        source: Box<ApiError>,
        /// Additional context message.
        context: String,
    },
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::InvalidDate(msg) => write!(f, "Invalid date: {}", msg),
            ApiError::InvalidCustomField(msg) => write!(f, "Invalid custom field: {}", msg),
            ApiError::UnsupportedValueType(msg) => {
                write!(f, "Unsupported value type: {}", msg)
            }
            ApiError::MalformedResponse(msg) => write!(f, "Malformed response: {}", msg),
            ApiError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            ApiError::Transport(msg) => write!(f, "Transport error: {}", msg),
            ApiError::WithContext { source, context } => {
                write!(f, "{}: {}", context, source)
            }
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::WithContext { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Serialization(err.to_string())
    }
}

/// Extension trait for adding context to errors.
/// Similar to `anyhow::Context` but for our `ApiError` type.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T, ApiError>;

    /// Add context lazily (only evaluated on error).
    #[allow(dead_code)]
    fn with_context<F>(self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T, ApiError> {
    fn context(self, context: impl Into<String>) -> Result<T, ApiError> {
        self.map_err(|e| ApiError::WithContext {
            source: Box::new(e),
            context: context.into(),
        })
    }

    fn with_context<F>(self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| ApiError::WithContext {
            source: Box::new(e),
            context: f(),
        })
    }
}
