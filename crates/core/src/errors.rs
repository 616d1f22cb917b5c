use thiserror::Error;

/// Message shown to a customer whose slot was taken between viewing and submitting.
pub const CONFLICT_MESSAGE: &str = "time no longer available, pick another";

/// Message returned for every failed self-service authorization, whether or not
/// the appointment exists.
pub const AUTHORIZATION_MESSAGE: &str = "appointment not found for this phone number";

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Authorization error: {0}")]
    Authorization(String),

    #[error("Service temporarily unavailable: {0}")]
    Transient(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl BookingError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn conflict() -> Self {
        Self::Conflict(CONFLICT_MESSAGE.to_string())
    }

    pub fn unauthorized() -> Self {
        Self::Authorization(AUTHORIZATION_MESSAGE.to_string())
    }

    /// Whether retrying the same action later may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient(_) | Self::Conflict(_))
    }
}

pub type BookingResult<T> = Result<T, BookingError>;
