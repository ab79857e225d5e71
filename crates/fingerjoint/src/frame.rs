//! Local coordinate frame aligned with a joint axis.
//!
//! In the local frame the joint axis is +Z, the overlap is centered on the
//! Z axis and starts at `z = 0`, so layout offsets can be used directly as
//! local z coordinates.

use fingerjoint_math::{Dir3, Point3, Tolerance, Transform, Vec3};

use crate::error::{JointError, Result};
use crate::kernel::GeometryKernel;

/// A directed line segment defining the joint axis.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisDirection {
    /// Start of the segment.
    pub start: Point3,
    /// End of the segment.
    pub end: Point3,
}

impl AxisDirection {
    /// Segment from `start` to `end`.
    pub fn new(start: Point3, end: Point3) -> Self {
        Self { start, end }
    }

    /// `end − start`.
    pub fn vector(&self) -> Vec3 {
        self.end - self.start
    }

    /// Length of the segment.
    pub fn length(&self) -> f64 {
        self.vector().norm()
    }

    /// Normalized direction, or [`JointError::DegenerateDirection`] for a
    /// segment shorter than the linear tolerance.
    pub fn unit(&self) -> Result<Dir3> {
        let v = self.vector();
        if !v.iter().all(|c| c.is_finite()) || Tolerance::DEFAULT.is_zero(v.norm()) {
            return Err(JointError::DegenerateDirection);
        }
        Ok(Dir3::new_normalize(v))
    }
}

/// Two unit vectors completing `z` to a right-handed orthonormal basis.
///
/// Seeded with +X, or +Y when `z` is parallel to +X.
pub fn orthonormal_basis(z: &Dir3) -> (Vec3, Vec3) {
    let mut seed = Vec3::x();
    if Tolerance::DEFAULT.dirs_parallel(z, &Dir3::new_unchecked(seed)) {
        seed = Vec3::y();
    }
    let x = z.cross(&seed).normalize();
    let y = z.cross(&x).normalize();
    (x, y)
}

/// A right-handed frame whose z axis is the joint direction.
#[derive(Debug, Clone)]
pub struct AxisFrame {
    /// Frame origin in world coordinates.
    pub origin: Point3,
    /// Local x axis in world coordinates.
    pub x_axis: Vec3,
    /// Local y axis in world coordinates.
    pub y_axis: Vec3,
    /// Local z axis (the joint direction) in world coordinates.
    pub z_axis: Vec3,
    to_global: Transform,
    to_local: Transform,
}

impl AxisFrame {
    /// Frame at `origin` with `z` as its third axis.
    pub fn with_axis(origin: Point3, z: &Dir3) -> Result<Self> {
        let (x_axis, y_axis) = orthonormal_basis(z);
        let z_axis = z.into_inner();
        let to_global = Transform::from_coordinate_system(&origin, &x_axis, &y_axis, &z_axis);
        let to_local = to_global.inverse().ok_or(JointError::SingularFrame)?;
        Ok(Self {
            origin,
            x_axis,
            y_axis,
            z_axis,
            to_global,
            to_local,
        })
    }

    /// Frame for `direction` with its origin at the lateral center and
    /// axial minimum of `overlap`.
    ///
    /// The bounding box is only meaningful once the orientation is fixed,
    /// so a provisional frame at `direction.start` is used to measure it.
    pub fn align<K: GeometryKernel>(
        kernel: &K,
        direction: &AxisDirection,
        overlap: &K::Solid,
    ) -> Result<Self> {
        let z = direction.unit()?;
        let provisional = Self::with_axis(direction.start, &z)?;

        let local = provisional.to_local_solid(kernel, overlap.clone())?;
        let bounds = kernel
            .bounding_box(&local)
            .filter(|bb| !bb.is_empty())
            .ok_or(JointError::EmptyBoundingBox)?;
        let center = bounds.center();
        let origin = provisional.point_to_global(&Point3::new(center.x, center.y, bounds.min.z));

        Self::with_axis(origin, &z)
    }

    /// Local-to-world transform.
    pub fn to_global(&self) -> &Transform {
        &self.to_global
    }

    /// World-to-local transform.
    pub fn to_local(&self) -> &Transform {
        &self.to_local
    }

    /// Express a world solid in this frame.
    pub fn to_local_solid<K: GeometryKernel>(&self, kernel: &K, solid: K::Solid) -> Result<K::Solid> {
        Ok(kernel.transform(solid, &self.to_local)?)
    }

    /// Bring a local solid back to world coordinates.
    pub fn to_global_solid<K: GeometryKernel>(
        &self,
        kernel: &K,
        solid: K::Solid,
    ) -> Result<K::Solid> {
        Ok(kernel.transform(solid, &self.to_global)?)
    }

    /// World point to local coordinates.
    pub fn point_to_local(&self, p: &Point3) -> Point3 {
        self.to_local.apply_point(p)
    }

    /// Local point to world coordinates.
    pub fn point_to_global(&self, p: &Point3) -> Point3 {
        self.to_global.apply_point(p)
    }
}
