use std::fmt;
use thiserror::Error;

/// Context attached to an error the venue reported through a response
/// envelope: the unified operation that was running plus the raw
/// `err-code` / `err-msg` (v1) or `code` / `message` (v2) pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VenueError {
    pub operation: String,
    pub code: Option<String>,
    pub message: Option<String>,
}

impl VenueError {
    pub fn new(
        operation: impl Into<String>,
        code: Option<String>,
        message: Option<String>,
    ) -> Self {
        Self {
            operation: operation.into(),
            code,
            message,
        }
    }
}

impl fmt::Display for VenueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.operation)?;
        if let Some(code) = &self.code {
            write!(f, " [{code}]")?;
        }
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("API error: {code} - {message}")]
    ApiError { code: i32, message: String },

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    // Venue-classified failures. One variant per canonical kind so callers
    // can match on the failure class without inspecting venue codes.
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    #[error("Authentication rejected: {0}")]
    AuthRejected(VenueError),

    #[error("Permission denied: {0}")]
    PermissionDenied(VenueError),

    #[error("Rate limited or timed out: {0}")]
    RateLimited(VenueError),

    #[error("Exchange unavailable: {0}")]
    Unavailable(VenueError),

    #[error("Exchange under maintenance: {0}")]
    UnderMaintenance(VenueError),

    #[error("Bad request: {0}")]
    BadRequest(VenueError),

    #[error("Bad symbol: {0}")]
    BadSymbol(VenueError),

    #[error("Invalid order: {0}")]
    InvalidOrder(VenueError),

    #[error("Order not found: {0}")]
    OrderNotFound(VenueError),

    #[error("Insufficient funds: {0}")]
    InsufficientFunds(VenueError),

    #[error("Exchange error: {0}")]
    ExchangeFailure(VenueError),

    #[error("Other error: {0}")]
    Other(String),
}

impl From<crate::core::config::ConfigError> for ExchangeError {
    fn from(err: crate::core::config::ConfigError) -> Self {
        Self::ConfigurationError(err.to_string())
    }
}

impl ExchangeError {
    /// True for the venue-classified variants, false for transport and
    /// local errors.
    pub fn is_venue_error(&self) -> bool {
        matches!(
            self,
            Self::AuthRejected(_)
                | Self::PermissionDenied(_)
                | Self::RateLimited(_)
                | Self::Unavailable(_)
                | Self::UnderMaintenance(_)
                | Self::BadRequest(_)
                | Self::BadSymbol(_)
                | Self::InvalidOrder(_)
                | Self::OrderNotFound(_)
                | Self::InsufficientFunds(_)
                | Self::ExchangeFailure(_)
        )
    }

    pub fn venue_detail(&self) -> Option<&VenueError> {
        match self {
            Self::AuthRejected(detail)
            | Self::PermissionDenied(detail)
            | Self::RateLimited(detail)
            | Self::Unavailable(detail)
            | Self::UnderMaintenance(detail)
            | Self::BadRequest(detail)
            | Self::BadSymbol(detail)
            | Self::InvalidOrder(detail)
            | Self::OrderNotFound(detail)
            | Self::InsufficientFunds(detail)
            | Self::ExchangeFailure(detail) => Some(detail),
            _ => None,
        }
    }
}
