#![warn(missing_docs)]

//! Finger joint planning between two overlapping solids.
//!
//! [`JointPlanner`] intersects the two bodies, aligns a frame with the joint
//! axis, resolves a finger/notch layout for the overlap and stacks slabs
//! into two tool bodies. Solids live in a [`GeometryKernel`]; the bundled
//! [`CuboidKernel`] handles axis-aligned parts.
//!
//! # Example
//!
//! ```
//! use fingerjoint::{AxisDirection, CuboidKernel, CuboidSet, JointCut, JointPlanner, SizingPolicy};
//! use fingerjoint::math::Point3;
//!
//! let kernel = CuboidKernel::new();
//! let side = CuboidSet::cuboid(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 10.0, 30.0));
//! let front = CuboidSet::cuboid(Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 1.0, 30.0));
//! let axis = AxisDirection::new(Point3::origin(), Point3::new(0.0, 0.0, 1.0));
//!
//! let planner = JointPlanner::new(&kernel);
//! let JointCut::Cut { layout, .. } = planner
//!     .cut(side, front, &axis, &SizingPolicy::default())
//!     .unwrap()
//! else {
//!     panic!("expected a cut");
//! };
//! assert!(layout.num_fingers >= 2);
//! ```

pub use fingerjoint_layout as layout;
pub use fingerjoint_math as math;

pub mod error;
mod frame;
pub mod kernel;
mod planner;
mod slab;

pub use error::{JointError, KernelError, Result};
pub use fingerjoint_layout::{
    resolve, Infeasibility, Interval, JointLayout, LayoutResult, Placement, SizeMode,
    SizingPolicy, SliceSet,
};
pub use frame::{orthonormal_basis, AxisDirection, AxisFrame};
pub use kernel::{BoxSpec, CuboidKernel, CuboidSet, CuttingKernel, GeometryKernel};
pub use planner::{JointCut, JointPlan, JointPlanner, ToolBodies};
pub use slab::{gap_to_part_scale, Footprint, SlabStacker, SLAB_SLACK};
