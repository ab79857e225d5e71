//! Tool bodies built from stacked slabs.

use fingerjoint_layout::SliceSet;
use fingerjoint_math::{Aabb3, Point3, Transform};
use tracing::debug;

use crate::error::{JointError, Result};
use crate::kernel::{BoxSpec, GeometryKernel};

/// Lateral oversize of every slab before it is clipped to the part.
///
/// Keeps slab faces off the part's side faces, where coincident geometry
/// tends to upset Boolean operations.
pub const SLAB_SLACK: f64 = 1.0;

/// Lateral extent of the overlap in the joint frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    /// Lateral center, local x.
    pub center_x: f64,
    /// Lateral center, local y.
    pub center_y: f64,
    /// Extent along local x.
    pub length: f64,
    /// Extent along local y.
    pub width: f64,
    /// Axial minimum, where slice offsets start.
    pub min_z: f64,
}

impl Footprint {
    /// Footprint of a local-frame bounding box.
    pub fn from_aabb(bb: &Aabb3) -> Self {
        let center = bb.center();
        let extent = bb.extent();
        Self {
            center_x: center.x,
            center_y: center.y,
            length: extent.x,
            width: extent.y,
            min_z: bb.min.z,
        }
    }
}

/// Lateral scale factor that grows the footprint by `gap_to_part` on each side.
///
/// The larger of the two per-axis ratios is used for both axes, which is
/// only an exact offset for rectangular cross-sections. Flat dimensions are
/// ignored; a footprint with no usable dimension gives 1.
pub fn gap_to_part_scale(footprint: &Footprint, gap_to_part: f64) -> f64 {
    [footprint.length, footprint.width]
        .into_iter()
        .filter(|d| *d > 0.0)
        .map(|d| (d + 2.0 * gap_to_part) / d)
        .fold(1.0, f64::max)
}

/// Turns slice sets into solids through a geometry kernel.
#[derive(Debug)]
pub struct SlabStacker<'k, K> {
    kernel: &'k K,
}

impl<'k, K: GeometryKernel> SlabStacker<'k, K> {
    /// Stacker issuing requests to `kernel`.
    pub fn new(kernel: &'k K) -> Self {
        Self { kernel }
    }

    /// Build one slab per interval, union them, clip to `clip` and widen by
    /// `gap_to_part`.
    ///
    /// All inputs are in the joint frame: slice offsets are measured from
    /// `footprint.min_z` along local z.
    pub fn build(
        &self,
        slices: &SliceSet,
        clip: &K::Solid,
        footprint: &Footprint,
        gap_to_part: f64,
    ) -> Result<K::Solid> {
        let mut slabs = slices.iter().map(|slice| {
            let center = Point3::new(
                footprint.center_x,
                footprint.center_y,
                footprint.min_z + slice.midpoint(),
            );
            self.kernel.make_box(&BoxSpec::axis_aligned(
                center,
                footprint.length + SLAB_SLACK,
                footprint.width + SLAB_SLACK,
                slice.length,
            ))
        });

        let first = slabs.next().ok_or(JointError::EmptySliceSet)??;
        let stacked = slabs.try_fold(first, |acc, slab| self.kernel.union(acc, &slab?))?;
        let clipped = self.kernel.intersect(stacked, clip)?;

        if gap_to_part <= 0.0 {
            return Ok(clipped);
        }
        let Some(bounds) = self.kernel.bounding_box(&clipped) else {
            return Ok(clipped);
        };
        let s = gap_to_part_scale(footprint, gap_to_part);
        debug!(scale = s, gap_to_part, "widening tool body");
        let widen = Transform::scale_about(&bounds.center(), s, s, 1.0);
        Ok(self.kernel.transform(clipped, &widen)?)
    }
}
