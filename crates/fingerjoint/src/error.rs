//! Error types for joint planning.

use fingerjoint_layout::PolicyError;
use thiserror::Error;

/// A geometry kernel request that could not be served.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KernelError {
    /// The kernel cannot represent the requested operation.
    #[error("{operation} is not supported by this kernel: {reason}")]
    Unsupported {
        /// Kernel operation name.
        operation: &'static str,
        /// What made the request unsupported.
        reason: String,
    },

    /// The kernel tried and failed.
    #[error("{operation} failed: {reason}")]
    Failed {
        /// Kernel operation name.
        operation: &'static str,
        /// Failure details.
        reason: String,
    },
}

impl KernelError {
    /// Create an unsupported-operation error.
    pub fn unsupported(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::Unsupported {
            operation,
            reason: reason.into(),
        }
    }

    /// Create an operation-failed error.
    pub fn failed(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::Failed {
            operation,
            reason: reason.into(),
        }
    }
}

/// Fatal errors while planning a joint.
///
/// An infeasible layout or a pair of bodies that do not overlap is not an
/// error; those are reported through [`JointPlan`](crate::JointPlan).
#[derive(Error, Debug)]
pub enum JointError {
    /// The joint direction has zero length.
    #[error("joint direction has zero length")]
    DegenerateDirection,

    /// The reference volume has no measurable bounding box.
    #[error("overlap volume has an empty bounding box")]
    EmptyBoundingBox,

    /// The local frame could not be inverted.
    #[error("joint frame is not invertible")]
    SingularFrame,

    /// A tool body was requested from zero slices.
    #[error("cannot build a tool body from an empty slice set")]
    EmptySliceSet,

    /// The sizing policy is unusable.
    #[error("invalid sizing policy: {0}")]
    InvalidPolicy(#[from] PolicyError),

    /// The geometry kernel rejected a request.
    #[error("geometry kernel error: {0}")]
    Kernel(#[from] KernelError),
}

/// Result type for joint planning.
pub type Result<T> = std::result::Result<T, JointError>;
