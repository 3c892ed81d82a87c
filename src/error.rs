//! Error types for hull construction and kriging

use thiserror::Error;

/// Errors that can occur while configuring, fitting, or querying a model
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KrigingError {
    /// Configuration validation failed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Input coordinates are malformed (odd flat length, non-finite values)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Not enough populated lag bins to fit a variogram
    #[error("insufficient distance bins: {bins} populated, at least 2 required")]
    InsufficientLagBins {
        /// Number of bins that received at least one point pair
        bins: usize,
    },

    /// Too few samples to form a single point pair
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    /// Both the Cholesky and the dense inverse failed
    #[error("singular matrix: {0}")]
    SingularMatrix(String),

    /// A prediction was requested before `train` succeeded
    #[error("model has not been trained")]
    NotTrained,
}

/// Result type alias for kriging and hull operations
pub type Result<T> = std::result::Result<T, KrigingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = KrigingError::InsufficientLagBins { bins: 1 };
        assert_eq!(
            err.to_string(),
            "insufficient distance bins: 1 populated, at least 2 required"
        );

        let err = KrigingError::InvalidConfig("alpha must be positive".into());
        assert!(err.to_string().starts_with("invalid configuration"));
    }
}
