//! Error types for sizing policies.

use thiserror::Error;

/// Errors raised while validating, loading or saving a [`SizingPolicy`](crate::SizingPolicy).
#[derive(Error, Debug)]
pub enum PolicyError {
    /// A length parameter is negative or not finite.
    #[error("{field} must be a finite non-negative length, got {value}")]
    InvalidLength {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A fixed finger count of zero was requested.
    #[error("fixed_finger_count must be at least 1")]
    ZeroFingerCount,

    /// A dynamic-count branch would divide by `min_*_length + gap = 0`.
    #[error("{field} plus gap must be positive when the count is dynamic")]
    ZeroDenominator {
        /// Name of the minimum length that is zero.
        field: &'static str,
    },

    /// Reading or writing a policy file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON policy document could not be parsed or written.
    #[error("invalid JSON policy: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML policy document could not be parsed.
    #[error("invalid TOML policy: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// Policy could not be written as TOML.
    #[error("cannot write TOML policy: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

/// Result type for policy operations.
pub type Result<T> = std::result::Result<T, PolicyError>;
