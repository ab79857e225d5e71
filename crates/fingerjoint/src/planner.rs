//! Joint planning: overlap, frame, layout and tool bodies in one pass.

use fingerjoint_layout::{resolve, Infeasibility, JointLayout, LayoutResult, SizingPolicy};
use tracing::{debug, info, instrument, warn};

use crate::error::{JointError, Result};
use crate::frame::{AxisDirection, AxisFrame};
use crate::kernel::{CuttingKernel, GeometryKernel};
use crate::slab::{Footprint, SlabStacker};

/// The two tool bodies of a joint, in world coordinates.
#[derive(Debug, Clone)]
pub struct ToolBodies<S> {
    /// Subtracted from the first body; it occupies the notches, so the
    /// first body keeps its fingers.
    pub finger_tool: S,
    /// Subtracted from the second body; it occupies the fingers.
    pub notch_tool: S,
    /// Layout the tools were built from.
    pub layout: JointLayout,
}

/// Outcome of [`JointPlanner::plan`].
#[derive(Debug, Clone)]
pub enum JointPlan<S> {
    /// The bodies do not overlap, or the overlap has no extent along the axis.
    NoCutNeeded,
    /// The overlap is fine but no layout satisfies the policy.
    Infeasible(Infeasibility),
    /// Tool bodies ready to be subtracted.
    Cut(ToolBodies<S>),
}

impl<S> JointPlan<S> {
    /// The tool bodies, if the plan produced any.
    pub fn tools(&self) -> Option<&ToolBodies<S>> {
        match self {
            JointPlan::Cut(tools) => Some(tools),
            _ => None,
        }
    }
}

/// Outcome of [`JointPlanner::cut`]. Every variant hands the bodies back.
#[derive(Debug, Clone)]
pub enum JointCut<S> {
    /// Nothing to cut; the bodies are returned as given.
    Unchanged {
        /// First body.
        body0: S,
        /// Second body.
        body1: S,
    },
    /// No layout fits; the bodies are returned as given.
    Infeasible {
        /// Why no layout fits.
        reason: Infeasibility,
        /// First body.
        body0: S,
        /// Second body.
        body1: S,
    },
    /// The joint was cut.
    Cut {
        /// First body, carrying the fingers.
        body0: S,
        /// Second body, carrying the notches' counterpart fingers.
        body1: S,
        /// Layout of the cut.
        layout: JointLayout,
    },
}

/// Plans finger joints between pairs of solids.
#[derive(Debug)]
pub struct JointPlanner<'k, K> {
    kernel: &'k K,
}

impl<'k, K: GeometryKernel> JointPlanner<'k, K> {
    /// Planner issuing all geometry requests to `kernel`.
    pub fn new(kernel: &'k K) -> Self {
        Self { kernel }
    }

    /// Plan the joint between `body0` and `body1` along `direction`.
    ///
    /// Neither body is modified. Infeasible layouts and non-overlapping
    /// bodies are reported through [`JointPlan`]; an invalid policy, a
    /// zero-length direction or a kernel failure is an error.
    #[instrument(skip_all, fields(placement = ?policy.placement, size_mode = ?policy.size_mode))]
    pub fn plan(
        &self,
        body0: &K::Solid,
        body1: &K::Solid,
        direction: &AxisDirection,
        policy: &SizingPolicy,
    ) -> Result<JointPlan<K::Solid>> {
        policy.validate()?;
        direction.unit()?;

        let overlap = self.kernel.intersect(body0.clone(), body1)?;
        let volumeless = self
            .kernel
            .bounding_box(&overlap)
            .map_or(true, |bb| bb.is_empty() || bb.volume() <= 0.0);
        if volumeless {
            info!("bodies do not overlap, no cut needed");
            return Ok(JointPlan::NoCutNeeded);
        }

        let frame = AxisFrame::align(self.kernel, direction, &overlap)?;
        let local = frame.to_local_solid(self.kernel, overlap)?;
        let bounds = self
            .kernel
            .bounding_box(&local)
            .ok_or(JointError::EmptyBoundingBox)?;
        let size = bounds.max.z - bounds.min.z;
        debug!(size, origin = ?frame.origin, "overlap measured in joint frame");

        let layout = match resolve(size, policy) {
            LayoutResult::NoCutNeeded => {
                info!(size, "overlap has no extent along the axis, no cut needed");
                return Ok(JointPlan::NoCutNeeded);
            }
            LayoutResult::Infeasible(reason) => {
                warn!(size, %reason, "no finger layout fits the overlap");
                return Ok(JointPlan::Infeasible(reason));
            }
            LayoutResult::Layout(layout) => layout,
        };

        let footprint = Footprint::from_aabb(&bounds);
        let stacker = SlabStacker::new(self.kernel);
        let finger_tool =
            stacker.build(&layout.finger_tool_slices, &local, &footprint, policy.gap_to_part)?;
        let notch_tool =
            stacker.build(&layout.notch_tool_slices, &local, &footprint, policy.gap_to_part)?;

        info!(
            fingers = layout.num_fingers,
            notches = layout.num_notches,
            finger_length = layout.finger_length,
            notch_length = layout.notch_length,
            "joint planned"
        );

        Ok(JointPlan::Cut(ToolBodies {
            finger_tool: frame.to_global_solid(self.kernel, finger_tool)?,
            notch_tool: frame.to_global_solid(self.kernel, notch_tool)?,
            layout,
        }))
    }
}

impl<'k, K: CuttingKernel> JointPlanner<'k, K> {
    /// Plan the joint and subtract the tools: the finger tool from `body0`,
    /// the notch tool from `body1`.
    #[instrument(skip_all)]
    pub fn cut(
        &self,
        body0: K::Solid,
        body1: K::Solid,
        direction: &AxisDirection,
        policy: &SizingPolicy,
    ) -> Result<JointCut<K::Solid>> {
        let tools = match self.plan(&body0, &body1, direction, policy)? {
            JointPlan::NoCutNeeded => return Ok(JointCut::Unchanged { body0, body1 }),
            JointPlan::Infeasible(reason) => {
                return Ok(JointCut::Infeasible {
                    reason,
                    body0,
                    body1,
                })
            }
            JointPlan::Cut(tools) => tools,
        };

        let body0 = self.kernel.difference(body0, &tools.finger_tool)?;
        let body1 = self.kernel.difference(body1, &tools.notch_tool)?;
        Ok(JointCut::Cut {
            body0,
            body1,
            layout: tools.layout,
        })
    }
}
