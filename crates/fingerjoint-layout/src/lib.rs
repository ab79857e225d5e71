#![warn(missing_docs)]

//! Finger and notch layout along a joint axis.
//!
//! Given the length of the overlap between two parts and a [`SizingPolicy`],
//! [`resolve`] decides how many fingers and notches fit, how long each one is,
//! and which slabs the two tool bodies must occupy to cut them.
//!
//! # Example
//!
//! ```
//! use fingerjoint_layout::{resolve, LayoutResult, Placement, SizeMode, SizingPolicy};
//!
//! let policy = SizingPolicy {
//!     placement: Placement::FingersOutside,
//!     size_mode: SizeMode::EqualSize,
//!     finger_count_fixed: true,
//!     fixed_finger_count: 5,
//!     ..SizingPolicy::default()
//! };
//!
//! let LayoutResult::Layout(layout) = resolve(100.0, &policy) else {
//!     panic!("expected a layout");
//! };
//! assert_eq!(layout.num_fingers, 5);
//! assert_eq!(layout.num_notches, 4);
//! assert_eq!(layout.notch_tool_slices.len(), 5);
//! ```

pub mod error;
mod policy;
mod slice;
mod solver;

pub use error::{PolicyError, Result};
pub use policy::{Placement, SizeMode, SizingPolicy};
pub use slice::{Interval, SliceSet};
pub use solver::{resolve, Infeasibility, JointLayout, LayoutResult, LAYOUT_EPSILON, MAX_UNITS};
