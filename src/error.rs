//! Error types for the validating entry points.
//!
//! The geometry primitives never fail: too little data yields `0`, an empty
//! [`ElevationChange`](crate::ElevationChange) or `None`. Only the functions
//! that check their input up front ([`TrackSummary::compute`](crate::TrackSummary::compute)
//! and the ingestion parser) return a [`GeoError`].

use thiserror::Error;

/// Errors raised when input fails validation.
#[derive(Error, Debug)]
pub enum GeoError {
    /// An argument is outside its meaningful range (negative weight, NaN duration, ...).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A point has non-finite or out-of-range coordinates.
    #[error("Invalid point at index {index}: lat={latitude}, lng={longitude}")]
    InvalidPoint {
        index: usize,
        latitude: f64,
        longitude: f64,
    },

    /// Path-coordinate JSON could not be parsed.
    #[cfg(feature = "ingest")]
    #[error("Malformed path JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for validating operations.
pub type Result<T> = std::result::Result<T, GeoError>;

impl GeoError {
    /// Create an invalid argument error.
    #[must_use]
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = GeoError::invalid_argument("weight must be positive");
        assert_eq!(err.to_string(), "Invalid argument: weight must be positive");

        let err = GeoError::InvalidPoint { index: 3, latitude: f64::NAN, longitude: 0.0 };
        assert!(err.to_string().starts_with("Invalid point at index 3"));
    }
}
