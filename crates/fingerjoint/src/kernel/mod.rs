//! The solid-modeling operations the planner needs from a geometry kernel.
//!
//! The planner never looks inside a solid. It asks the kernel for boxes,
//! Booleans, rigid or scaling transforms and bounding boxes, and hands the
//! resulting handles back to the caller.

mod cuboid;

pub use cuboid::{CuboidKernel, CuboidSet};

use fingerjoint_math::{Aabb3, Point3, Vec3};

use crate::error::KernelError;

/// An oriented box request: center, two in-plane axes and the three edge lengths.
///
/// The height runs along `x_axis × y_axis`.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSpec {
    /// Center of the box.
    pub center: Point3,
    /// Direction of the `length` edges.
    pub x_axis: Vec3,
    /// Direction of the `width` edges.
    pub y_axis: Vec3,
    /// Edge length along `x_axis`.
    pub length: f64,
    /// Edge length along `y_axis`.
    pub width: f64,
    /// Edge length along the third axis.
    pub height: f64,
}

impl BoxSpec {
    /// A box whose edges follow the coordinate axes.
    pub fn axis_aligned(center: Point3, length: f64, width: f64, height: f64) -> Self {
        Self {
            center,
            x_axis: Vec3::x(),
            y_axis: Vec3::y(),
            length,
            width,
            height,
        }
    }

    /// Direction of the `height` edges.
    pub fn z_axis(&self) -> Vec3 {
        self.x_axis.cross(&self.y_axis)
    }
}

/// Opaque solid-modeling primitives.
///
/// Operations that take a solid by value may consume or invalidate it; the
/// returned handle is the only one the caller should keep using.
pub trait GeometryKernel {
    /// Handle to a solid owned by the kernel.
    type Solid: Clone;

    /// Axis-aligned bounds of `solid`, `None` if it is empty.
    fn bounding_box(&self, solid: &Self::Solid) -> Option<Aabb3>;

    /// Boolean intersection `a ∩ b`.
    fn intersect(&self, a: Self::Solid, b: &Self::Solid) -> Result<Self::Solid, KernelError>;

    /// Boolean union `a ∪ b`.
    fn union(&self, a: Self::Solid, b: &Self::Solid) -> Result<Self::Solid, KernelError>;

    /// Apply a rigid or scaling transform.
    fn transform(
        &self,
        solid: Self::Solid,
        transform: &fingerjoint_math::Transform,
    ) -> Result<Self::Solid, KernelError>;

    /// Create a solid box.
    fn make_box(&self, spec: &BoxSpec) -> Result<Self::Solid, KernelError>;
}

/// A kernel that can also subtract, which is all it takes to apply a joint.
pub trait CuttingKernel: GeometryKernel {
    /// Boolean difference `target − tool`.
    fn difference(&self, target: Self::Solid, tool: &Self::Solid)
        -> Result<Self::Solid, KernelError>;
}
