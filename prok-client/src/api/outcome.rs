use reqwest::StatusCode;
use thiserror::Error;

/// Failures that are not an application answer from the server.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The response body did not have the expected shape.
    #[error("could not decode response: {0}")]
    Decode(String),

    /// A non-success status without an `error` body.
    #[error("unexpected status {status}")]
    Status { status: StatusCode, body: String },

    /// A request path could not be joined onto the base URL.
    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),
}

impl GatewayError {
    /// True for failures where no response arrived.
    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

/// Result of one gateway call.
///
/// Application errors are data, not `Err`: the server answered and the caller
/// is expected to show `message` verbatim.
#[derive(Debug)]
#[must_use]
pub enum ApiOutcome<T> {
    Ok(T),
    /// The body carried an `error` field.
    Application(String),
    /// The credential was rejected and the session has been cleared.
    AuthRequired,
    Failed(GatewayError),
}

impl<T> ApiOutcome<T> {
    /// Transform the success value, keeping every failure as is.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiOutcome<U> {
        match self {
            Self::Ok(value) => ApiOutcome::Ok(f(value)),
            Self::Application(message) => ApiOutcome::Application(message),
            Self::AuthRequired => ApiOutcome::AuthRequired,
            Self::Failed(err) => ApiOutcome::Failed(err),
        }
    }

    /// True for [`ApiOutcome::Ok`].
    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    /// The success value, discarding any failure.
    #[must_use]
    pub fn ok(self) -> Option<T> {
        match self {
            Self::Ok(value) => Some(value),
            _ => None,
        }
    }
}

impl<T> From<GatewayError> for ApiOutcome<T> {
    fn from(err: GatewayError) -> Self {
        Self::Failed(err)
    }
}
