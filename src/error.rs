use reqwest::StatusCode;
use thiserror::Error;

/// Failures talking to the store gateway.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("building HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("gateway request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("gateway answered {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("gateway response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A domain precondition that failed before anything was sent to the store.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("metadata id cannot be empty")]
    EmptyMetadataId,

    #[error("exercise id cannot be empty")]
    EmptyExerciseId,

    #[error("user id cannot be empty")]
    EmptyUserId,

    #[error("GPS positions list cannot be empty")]
    NoPositions,

    #[error("latitude must be between -90 and 90, got {0}")]
    LatitudeOutOfRange(f64),

    #[error("longitude must be between -180 and 180, got {0}")]
    LongitudeOutOfRange(f64),

    #[error("accuracy must be positive, got {0}")]
    NonPositiveAccuracy(f64),

    #[error("heart rate must be positive, got {0}")]
    NonPositiveHeartRate(i32),

    #[error("heart rate is unrealistically high: {0}")]
    HeartRateTooHigh(i32),

    #[error("calories must be non-negative, got {0}")]
    NegativeCalories(f64),
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    /// True when the caller sent bad input, false when persistence failed.
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
