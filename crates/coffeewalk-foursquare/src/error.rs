use thiserror::Error;

/// Errors reported by the venue client.
///
/// Cancellation is not an error; see [`crate::FetchOutcome::Canceled`].
#[derive(Debug, Error)]
pub enum VenueError {
    /// The request URL could not be built from the given inputs.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Network or TLS failure from the underlying HTTP client. Built through
    /// [`VenueError::http`], which strips the signed request URL.
    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    /// A non-2xx status whose body was not JSON (proxy pages, gateway errors).
    #[error("unexpected HTTP status {status} from {path}")]
    UnexpectedStatus { status: u16, path: String },

    /// A non-2xx status carrying a provider JSON error body instead of a
    /// `response` payload.
    #[error("provider rejected {path} with HTTP status {status}{}", detail_suffix(.detail))]
    Provider {
        status: u16,
        path: String,
        detail: Option<String>,
    },

    /// The response body was not valid JSON.
    #[error("JSON deserialization error for {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The JSON body did not have the expected top-level shape.
    #[error("unexpected response shape at `{path}`: {reason}")]
    Parse { path: String, reason: String },
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default()
}

/// Coarse classification of a [`VenueError`], for callers that only need to
/// pick a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidRequest,
    NetworkError,
    ParseError,
}

impl VenueError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            VenueError::InvalidRequest(_) => ErrorKind::InvalidRequest,
            VenueError::Http(_) | VenueError::UnexpectedStatus { .. } => ErrorKind::NetworkError,
            VenueError::Provider { .. } | VenueError::Json { .. } | VenueError::Parse { .. } => {
                ErrorKind::ParseError
            }
        }
    }

    /// Wraps a transport error, dropping the request URL so the signed
    /// query string never reaches a message.
    pub(crate) fn http(err: reqwest::Error) -> Self {
        VenueError::Http(err.without_url())
    }

    pub(crate) fn parse(path: &str, reason: impl Into<String>) -> Self {
        VenueError::Parse {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}
