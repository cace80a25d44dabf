//! Error types for the actor layer.
//!
//! Every variant is a broken caller contract (bad configuration or mis-sized
//! inputs). They are reported before any buffer is touched, so an `Err`
//! leaves the actor exactly as it was.

use thiserror::Error;

use crate::helpers::Int3;

/// Invalid-configuration failures raised by [`Actor`](crate::actor::Actor).
#[derive(Error, Debug)]
pub enum ActorError {
    /// Hidden extent has a non-positive axis
    #[error("Invalid hidden size {0:?}: all axes must be positive")]
    InvalidHiddenSize(Int3),

    /// No visible layers were configured
    #[error("Actor needs at least one visible layer")]
    NoVisibleLayers,

    /// A visible layer descriptor is malformed
    #[error("Invalid visible layer descriptor {index}: size {size:?}, radius {radius}")]
    InvalidVisibleLayerDesc {
        /// Visible layer index
        index: usize,
        /// Offending extent
        size: Int3,
        /// Offending radius
        radius: i32,
    },

    /// Wrong number of visible codes passed to `step`
    #[error("Expected {expected} visible codes, got {actual}")]
    VisibleLayerCount {
        /// Configured visible layers
        expected: usize,
        /// Codes supplied
        actual: usize,
    },

    /// A visible code has the wrong number of columns
    #[error("Visible code {index} has {actual} columns, expected {expected}")]
    VisibleCodeLength {
        /// Visible layer index
        index: usize,
        /// Columns in the layer
        expected: usize,
        /// Columns supplied
        actual: usize,
    },

    /// A visible code selects a cell outside its column
    #[error("Visible code {index} column {column} selects {value}, column size is {column_size}")]
    VisibleCodeOutOfRange {
        /// Visible layer index
        index: usize,
        /// Column within the layer
        column: usize,
        /// Supplied cell index
        value: i32,
        /// Cells per column
        column_size: i32,
    },

    /// The target code has the wrong number of columns
    #[error("Target code has {actual} columns, expected {expected}")]
    TargetCodeLength {
        /// Hidden columns
        expected: usize,
        /// Columns supplied
        actual: usize,
    },

    /// The target code selects a cell outside its column
    #[error("Target code column {column} selects {value}, column size is {column_size}")]
    TargetCodeOutOfRange {
        /// Hidden column
        column: usize,
        /// Supplied cell index
        value: i32,
        /// Cells per hidden column
        column_size: i32,
    },

    /// Learning hyperparameters are unusable
    #[error("Invalid params: alpha {alpha}, gamma {gamma}, td_clip {td_clip}")]
    InvalidParams {
        /// Learning rate
        alpha: f32,
        /// Discount factor
        gamma: f32,
        /// TD error clamp
        td_clip: f32,
    },

    /// A visible layer index is past the configured layers
    #[error("Visible layer {index} does not exist ({count} configured)")]
    VisibleLayerIndex {
        /// Requested layer
        index: usize,
        /// Configured layers
        count: usize,
    },

    /// Replacement weights have the wrong length
    #[error("Visible layer {index} has {expected} weights, got {actual}")]
    WeightsLength {
        /// Visible layer index
        index: usize,
        /// Weights in the layer
        expected: usize,
        /// Weights supplied
        actual: usize,
    },

    /// Reward is NaN or infinite
    #[error("Reward must be finite, got {0}")]
    NonFiniteReward(f32),

    /// Dedicated compute pool could not be started
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// A specialized `Result` type for actor operations.
pub type Result<T> = std::result::Result<T, ActorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ActorError::VisibleCodeLength {
            index: 1,
            expected: 16,
            actual: 9,
        };
        assert_eq!(err.to_string(), "Visible code 1 has 9 columns, expected 16");

        let err = ActorError::NonFiniteReward(f32::NAN);
        assert_eq!(err.to_string(), "Reward must be finite, got NaN");

        let err = ActorError::InvalidParams {
            alpha: 0.1,
            gamma: f32::NAN,
            td_clip: 10.0,
        };
        assert_eq!(err.to_string(), "Invalid params: alpha 0.1, gamma NaN, td_clip 10");

        let err = ActorError::InvalidHiddenSize(Int3::new(0, 2, 2));
        assert!(err.to_string().contains("all axes must be positive"));
    }
}
