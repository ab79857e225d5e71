//! Reference kernel over unions of axis-aligned cuboids.
//!
//! Exact for the geometry most finger joints are cut into: rectangular
//! boards whose joint axis is a coordinate axis. Booleans reduce to
//! interval arithmetic per axis and every result stays a set of pairwise
//! disjoint cuboids. Requests that would leave that class (oriented boxes,
//! rotations other than quarter turns) are refused rather than approximated.

use fingerjoint_math::{Aabb3, Point3, Tolerance, Transform, Vec3};

use super::{BoxSpec, CuttingKernel, GeometryKernel};
use crate::error::KernelError;

/// A solid made of pairwise disjoint axis-aligned cuboids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CuboidSet {
    cuboids: Vec<Aabb3>,
}

impl CuboidSet {
    /// The empty solid.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A single cuboid spanning `min`..`max`. Flat or inverted boxes give the empty solid.
    pub fn cuboid(min: Point3, max: Point3) -> Self {
        let aabb = Aabb3::new(min, max);
        if aabb.volume() > 0.0 {
            Self {
                cuboids: vec![aabb],
            }
        } else {
            Self::empty()
        }
    }

    /// The cuboids making up this solid.
    pub fn cuboids(&self) -> &[Aabb3] {
        &self.cuboids
    }

    /// True if the solid encloses no volume.
    pub fn is_empty(&self) -> bool {
        self.cuboids.is_empty()
    }

    /// Enclosed volume.
    pub fn volume(&self) -> f64 {
        self.cuboids.iter().map(Aabb3::volume).sum()
    }

    /// True if `p` lies strictly inside one of the cuboids.
    pub fn contains(&self, p: &Point3) -> bool {
        self.cuboids.iter().any(|c| {
            (0..3).all(|axis| c.min[axis] < p[axis] && p[axis] < c.max[axis])
        })
    }

    fn subtract(&self, tool: &CuboidSet) -> CuboidSet {
        let mut pieces = self.cuboids.clone();
        for cutter in &tool.cuboids {
            pieces = pieces
                .iter()
                .flat_map(|piece| subtract_cuboid(piece, cutter))
                .collect();
        }
        CuboidSet { cuboids: pieces }
    }
}

/// Split `piece − cutter` into at most six disjoint cuboids.
fn subtract_cuboid(piece: &Aabb3, cutter: &Aabb3) -> Vec<Aabb3> {
    let Some(common) = piece.intersection(cutter) else {
        return vec![*piece];
    };
    let mut rest = *piece;
    let mut out = Vec::with_capacity(6);
    for axis in 0..3 {
        if rest.min[axis] < common.min[axis] {
            let mut below = rest;
            below.max[axis] = common.min[axis];
            out.push(below);
        }
        if common.max[axis] < rest.max[axis] {
            let mut above = rest;
            above.min[axis] = common.max[axis];
            out.push(above);
        }
        rest.min[axis] = common.min[axis];
        rest.max[axis] = common.max[axis];
    }
    out
}

/// [`GeometryKernel`] over [`CuboidSet`] solids.
#[derive(Debug, Clone, Copy, Default)]
pub struct CuboidKernel {
    tolerance: Tolerance,
}

impl CuboidKernel {
    /// Kernel with the default tolerances.
    pub fn new() -> Self {
        Self::default()
    }

    /// True if `v` points along a coordinate axis.
    fn is_axis_aligned(&self, v: &Vec3) -> bool {
        let norm = v.norm();
        norm > self.tolerance.linear
            && v.iter()
                .filter(|c| c.abs() / norm > self.tolerance.angular)
                .count()
                == 1
    }

    /// True if the linear part maps coordinate axes onto coordinate axes.
    fn preserves_axes(&self, transform: &Transform) -> bool {
        [Vec3::x(), Vec3::y(), Vec3::z()]
            .iter()
            .all(|axis| self.is_axis_aligned(&transform.apply_vec(axis)))
    }
}

impl GeometryKernel for CuboidKernel {
    type Solid = CuboidSet;

    fn bounding_box(&self, solid: &CuboidSet) -> Option<Aabb3> {
        let mut cuboids = solid.cuboids.iter();
        let mut bounds = *cuboids.next()?;
        for c in cuboids {
            bounds.merge(c);
        }
        Some(bounds)
    }

    fn intersect(&self, a: CuboidSet, b: &CuboidSet) -> Result<CuboidSet, KernelError> {
        let cuboids = a
            .cuboids
            .iter()
            .flat_map(|x| b.cuboids.iter().filter_map(move |y| x.intersection(y)))
            .collect();
        Ok(CuboidSet { cuboids })
    }

    fn union(&self, a: CuboidSet, b: &CuboidSet) -> Result<CuboidSet, KernelError> {
        // Keep the pieces disjoint: add only what `b` covers beyond `a`.
        let extra = b.subtract(&a);
        let mut cuboids = a.cuboids;
        cuboids.extend(extra.cuboids);
        Ok(CuboidSet { cuboids })
    }

    fn transform(&self, solid: CuboidSet, transform: &Transform) -> Result<CuboidSet, KernelError> {
        if !self.preserves_axes(transform) {
            return Err(KernelError::unsupported(
                "transform",
                "linear part must map coordinate axes onto coordinate axes",
            ));
        }
        let cuboids = solid
            .cuboids
            .iter()
            .map(|c| {
                let corners = c.corners().map(|p| transform.apply_point(&p));
                Aabb3::from_points(corners.iter())
            })
            .collect();
        Ok(CuboidSet { cuboids })
    }

    fn make_box(&self, spec: &BoxSpec) -> Result<CuboidSet, KernelError> {
        if spec.length <= 0.0 || spec.width <= 0.0 || spec.height <= 0.0 {
            return Err(KernelError::failed(
                "make_box",
                format!(
                    "box dimensions must be positive, got {} x {} x {}",
                    spec.length, spec.width, spec.height
                ),
            ));
        }
        let z_axis = spec.z_axis();
        if !self.is_axis_aligned(&spec.x_axis)
            || !self.is_axis_aligned(&spec.y_axis)
            || !self.is_axis_aligned(&z_axis)
        {
            return Err(KernelError::unsupported(
                "make_box",
                "box axes must follow the coordinate axes",
            ));
        }

        let half = [
            spec.x_axis.normalize() * (spec.length / 2.0),
            spec.y_axis.normalize() * (spec.width / 2.0),
            z_axis.normalize() * (spec.height / 2.0),
        ];
        let corners: Vec<Point3> = (0..8)
            .map(|bits: usize| {
                let mut p = spec.center;
                for (axis, h) in half.iter().enumerate() {
                    if bits & (1 << axis) == 0 {
                        p -= *h;
                    } else {
                        p += *h;
                    }
                }
                p
            })
            .collect();
        Ok(CuboidSet {
            cuboids: vec![Aabb3::from_points(corners.iter())],
        })
    }
}

impl CuttingKernel for CuboidKernel {
    fn difference(&self, target: CuboidSet, tool: &CuboidSet) -> Result<CuboidSet, KernelError> {
        Ok(target.subtract(tool))
    }
}
