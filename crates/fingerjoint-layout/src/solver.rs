//! Layout resolution: how many fingers and notches fit, how long each one
//! is, and where the tool bodies have to remove material.
//!
//! [`resolve`] picks one of six branches from `(finger_count_fixed, size_mode)`,
//! checks the result against the overlap length and lays the units out from
//! offset zero. Everything here is pure arithmetic on the policy.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::policy::{Placement, SizeMode, SizingPolicy};
use crate::slice::{Interval, SliceSet};

/// Slack allowed in length comparisons, in the working length unit.
pub const LAYOUT_EPSILON: f64 = 1e-5;

/// Largest number of fingers plus notches a layout may hold.
pub const MAX_UNITS: i64 = 100_000;

/// Why no layout satisfies the sizing constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Infeasibility {
    /// The overlap length is NaN or infinite.
    InvalidSize,
    /// Not a single finger/notch pair fits at the minimum size.
    NoUnitsFit,
    /// The layout degenerates to one undivided unit.
    SingleUnit,
    /// A finger or notch would be shorter than the tolerance.
    NonPositiveLength,
    /// Placement adjustments produced a negative count.
    NegativeCount,
    /// Units and gaps together are longer than the overlap.
    Overfull,
    /// The policy asks to split length among zero units.
    ZeroDivisor,
    /// More units than [`MAX_UNITS`] would fit the overlap.
    TooManyUnits,
}

impl fmt::Display for Infeasibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Infeasibility::InvalidSize => "overlap length is not a finite number",
            Infeasibility::NoUnitsFit => "no finger fits at the requested minimum size",
            Infeasibility::SingleUnit => "a joint needs at least one finger and one notch",
            Infeasibility::NonPositiveLength => "fingers or notches would have no length",
            Infeasibility::NegativeCount => "placement leaves a negative number of units",
            Infeasibility::Overfull => "fingers, notches and gaps exceed the overlap",
            Infeasibility::ZeroDivisor => "the policy leaves no unit to absorb the length",
            Infeasibility::TooManyUnits => "the overlap holds too many fingers to lay out",
        };
        f.write_str(msg)
    }
}

/// A resolved joint: counts, lengths, start offsets and the tool slices.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JointLayout {
    /// Number of fingers.
    pub num_fingers: usize,
    /// Number of notches.
    pub num_notches: usize,
    /// Length of each finger along the axis.
    pub finger_length: f64,
    /// Length of each notch along the axis.
    pub notch_length: f64,
    /// Clearance between neighbouring units.
    pub gap: f64,
    /// Offset of the first finger.
    pub finger_start: f64,
    /// Offset of the first notch.
    pub notch_start: f64,
    /// Slabs the finger tool occupies: every notch widened by one gap per side.
    pub finger_tool_slices: SliceSet,
    /// Slabs the notch tool occupies: every finger widened by one gap per side.
    pub notch_tool_slices: SliceSet,
}

impl JointLayout {
    /// Distance between consecutive fingers (and consecutive notches).
    pub fn spacing(&self) -> f64 {
        self.finger_length + self.notch_length + 2.0 * self.gap
    }

    /// The fingers themselves, without clearance.
    pub fn finger_slices(&self) -> SliceSet {
        repeat(self.finger_start, self.spacing(), self.finger_length, self.num_fingers)
    }

    /// The notches themselves, without clearance.
    pub fn notch_slices(&self) -> SliceSet {
        repeat(self.notch_start, self.spacing(), self.notch_length, self.num_notches)
    }

    /// Length covered by all units and the gaps between them.
    pub fn occupied_length(&self) -> f64 {
        let units = self.num_fingers + self.num_notches;
        self.finger_length * self.num_fingers as f64
            + self.notch_length * self.num_notches as f64
            + units.saturating_sub(1) as f64 * self.gap
    }
}

/// Outcome of [`resolve`].
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutResult {
    /// The overlap has no extent along the axis; nothing to cut.
    NoCutNeeded,
    /// The input is valid but no layout satisfies the policy.
    Infeasible(Infeasibility),
    /// A valid layout.
    Layout(JointLayout),
}

impl LayoutResult {
    /// The layout, if one was found.
    pub fn layout(&self) -> Option<&JointLayout> {
        match self {
            LayoutResult::Layout(layout) => Some(layout),
            _ => None,
        }
    }

    /// Consume the result, keeping the layout if one was found.
    pub fn into_layout(self) -> Option<JointLayout> {
        match self {
            LayoutResult::Layout(layout) => Some(layout),
            _ => None,
        }
    }
}

/// Counts and lengths before validation. Counts are signed so that
/// placement adjustments below zero are caught instead of wrapping.
#[derive(Debug, Clone, Copy)]
struct Sizing {
    fingers: i64,
    notches: i64,
    finger_length: f64,
    notch_length: f64,
}

impl Sizing {
    fn units(&self) -> i64 {
        self.fingers + self.notches
    }

    fn gaps(&self) -> f64 {
        (self.units() - 1) as f64
    }
}

/// Resolve the finger/notch layout for an overlap of length `size`.
///
/// Deterministic and side-effect free apart from a debug log line.
pub fn resolve(size: f64, policy: &SizingPolicy) -> LayoutResult {
    if size.is_nan() || size.is_infinite() {
        return LayoutResult::Infeasible(Infeasibility::InvalidSize);
    }
    if size <= 0.0 {
        return LayoutResult::NoCutNeeded;
    }

    let sizing = if policy.finger_count_fixed {
        fixed_count(size, policy)
    } else {
        match policy.size_mode {
            SizeMode::EqualSize => dynamic_equal(size, policy),
            SizeMode::FixedNotchSize => dynamic_fixed_notch(size, policy),
            SizeMode::FixedFingerSize => dynamic_fixed_finger(size, policy),
        }
    };

    let result = sizing
        .and_then(|s| check(size, policy.gap, s))
        .map(|s| place(s, policy));

    match result {
        Ok(layout) => {
            debug!(
                size,
                fixed_count = policy.finger_count_fixed,
                size_mode = ?policy.size_mode,
                fingers = layout.num_fingers,
                notches = layout.num_notches,
                finger_length = layout.finger_length,
                notch_length = layout.notch_length,
                "resolved joint layout"
            );
            LayoutResult::Layout(layout)
        }
        Err(reason) => {
            debug!(size, ?reason, "no joint layout");
            LayoutResult::Infeasible(reason)
        }
    }
}

/// Branches 1-3: the finger count is given, notches follow from the placement.
fn fixed_count(size: f64, policy: &SizingPolicy) -> Result<Sizing, Infeasibility> {
    let fingers = i64::from(policy.fixed_finger_count);
    let notches = match policy.placement {
        Placement::FingersOutside => fingers - 1,
        Placement::NotchesOutside => fingers + 1,
        Placement::SameCountStartFinger | Placement::SameCountStartNotch => fingers,
    };
    let mut s = Sizing {
        fingers,
        notches,
        finger_length: 0.0,
        notch_length: 0.0,
    };
    if s.units() == 1 {
        return Err(Infeasibility::SingleUnit);
    }
    if s.units() > MAX_UNITS {
        return Err(Infeasibility::TooManyUnits);
    }
    let free = size - s.gaps() * policy.gap;

    match policy.size_mode {
        SizeMode::EqualSize => {
            if s.units() <= 0 {
                return Err(Infeasibility::ZeroDivisor);
            }
            s.finger_length = free / s.units() as f64;
            s.notch_length = s.finger_length;
        }
        SizeMode::FixedNotchSize => {
            if s.fingers <= 0 {
                return Err(Infeasibility::ZeroDivisor);
            }
            s.notch_length = policy.fixed_notch_length;
            s.finger_length = (free - s.notches as f64 * s.notch_length) / s.fingers as f64;
        }
        SizeMode::FixedFingerSize => {
            if s.notches <= 0 {
                return Err(Infeasibility::ZeroDivisor);
            }
            s.finger_length = policy.fixed_finger_length;
            s.notch_length = (free - s.fingers as f64 * s.finger_length) / s.notches as f64;
        }
    }
    Ok(s)
}

/// Branch 4: as many equal units as fit at the minimum finger length.
fn dynamic_equal(size: f64, policy: &SizingPolicy) -> Result<Sizing, Infeasibility> {
    let gap = policy.gap;
    let max_count = floor_count(size + gap, policy.min_finger_length + gap)?;

    // Split evenly, then let the placement claim the odd unit (or give one up).
    let half = max_count / 2;
    let odd = max_count % 2 == 1;
    let (mut fingers, mut notches) = (half, half);
    match policy.placement {
        Placement::FingersOutside if odd => fingers += 1,
        Placement::FingersOutside => notches -= 1,
        Placement::NotchesOutside if odd => notches += 1,
        Placement::NotchesOutside => fingers -= 1,
        Placement::SameCountStartFinger | Placement::SameCountStartNotch => {}
    }
    if fingers + notches <= 0 {
        return Err(Infeasibility::NoUnitsFit);
    }

    let mut s = Sizing {
        fingers,
        notches,
        finger_length: 0.0,
        notch_length: 0.0,
    };
    s.finger_length = (size - s.gaps() * gap) / s.units() as f64;
    s.notch_length = s.finger_length;
    Ok(s)
}

/// Branch 5: notches are fixed, fingers stretch to fill.
///
/// Adding or removing one notch (plus its gap) turns every placement into
/// "same number of fingers and notches", which makes the count a single
/// division.
fn dynamic_fixed_notch(size: f64, policy: &SizingPolicy) -> Result<Sizing, Infeasibility> {
    let gap = policy.gap;
    let notch = policy.fixed_notch_length;
    let extra_notch = match policy.placement {
        Placement::FingersOutside => -1,
        Placement::NotchesOutside => 1,
        Placement::SameCountStartFinger | Placement::SameCountStartNotch => 0,
    };

    let fingers = floor_count(
        size - extra_notch as f64 * (notch + gap) + gap,
        notch + policy.min_finger_length + 2.0 * gap,
    )?;
    if fingers <= 0 {
        return Err(Infeasibility::NoUnitsFit);
    }

    let mut s = Sizing {
        fingers,
        notches: fingers + extra_notch,
        finger_length: 0.0,
        notch_length: notch,
    };
    s.finger_length = (size - s.notches as f64 * notch - s.gaps() * gap) / fingers as f64;
    Ok(s)
}

/// Branch 6: fingers are fixed, notches stretch to fill.
fn dynamic_fixed_finger(size: f64, policy: &SizingPolicy) -> Result<Sizing, Infeasibility> {
    let gap = policy.gap;
    let finger = policy.fixed_finger_length;
    let extra_finger = match policy.placement {
        Placement::FingersOutside => 1,
        Placement::NotchesOutside => -1,
        Placement::SameCountStartFinger | Placement::SameCountStartNotch => 0,
    };

    let notches = floor_count(
        size - extra_finger as f64 * (finger + gap) + gap,
        finger + policy.min_notch_length + 2.0 * gap,
    )?;
    if notches <= 0 {
        return Err(Infeasibility::NoUnitsFit);
    }

    let mut s = Sizing {
        fingers: notches + extra_finger,
        notches,
        finger_length: finger,
        notch_length: 0.0,
    };
    s.notch_length = (size - s.fingers as f64 * finger - s.gaps() * gap) / notches as f64;
    Ok(s)
}

/// Plain `floor(numerator / denominator)`, clamped to `0..=MAX_UNITS` so the
/// count arithmetic after it cannot overflow.
fn floor_count(numerator: f64, denominator: f64) -> Result<i64, Infeasibility> {
    if denominator <= 0.0 {
        return Err(Infeasibility::ZeroDivisor);
    }
    let count = (numerator / denominator).floor();
    if !count.is_finite() || count > MAX_UNITS as f64 {
        return Err(Infeasibility::TooManyUnits);
    }
    Ok(count.max(0.0) as i64)
}

fn check(size: f64, gap: f64, s: Sizing) -> Result<Sizing, Infeasibility> {
    if s.finger_length <= LAYOUT_EPSILON || s.notch_length <= LAYOUT_EPSILON {
        return Err(Infeasibility::NonPositiveLength);
    }
    if s.fingers < 0 || s.notches < 0 {
        return Err(Infeasibility::NegativeCount);
    }
    if s.units() == 1 {
        return Err(Infeasibility::SingleUnit);
    }
    let occupied = s.finger_length * s.fingers as f64
        + s.notch_length * s.notches as f64
        + s.gaps() * gap;
    if occupied > size + LAYOUT_EPSILON {
        return Err(Infeasibility::Overfull);
    }
    Ok(s)
}

fn place(s: Sizing, policy: &SizingPolicy) -> JointLayout {
    let gap = policy.gap;
    let (finger_start, notch_start) = if policy.placement.starts_with_finger() {
        (0.0, s.finger_length + gap)
    } else {
        (s.notch_length + gap, 0.0)
    };
    let spacing = s.finger_length + s.notch_length + 2.0 * gap;
    // `check` has ruled out negative counts.
    let num_fingers = s.fingers as usize;
    let num_notches = s.notches as usize;

    JointLayout {
        num_fingers,
        num_notches,
        finger_length: s.finger_length,
        notch_length: s.notch_length,
        gap,
        finger_start,
        notch_start,
        finger_tool_slices: repeat(
            notch_start - gap,
            spacing,
            s.notch_length + 2.0 * gap,
            num_notches,
        ),
        notch_tool_slices: repeat(
            finger_start - gap,
            spacing,
            s.finger_length + 2.0 * gap,
            num_fingers,
        ),
    }
}

fn repeat(start: f64, spacing: f64, length: f64, count: usize) -> SliceSet {
    SliceSet::new(
        (0..count)
            .map(|i| Interval::new(start + i as f64 * spacing, length))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const PLACEMENTS: [Placement; 4] = [
        Placement::FingersOutside,
        Placement::NotchesOutside,
        Placement::SameCountStartFinger,
        Placement::SameCountStartNotch,
    ];

    const SIZE_MODES: [SizeMode; 3] = [
        SizeMode::FixedNotchSize,
        SizeMode::FixedFingerSize,
        SizeMode::EqualSize,
    ];

    fn policy(placement: Placement, size_mode: SizeMode, fixed: bool) -> SizingPolicy {
        SizingPolicy {
            placement,
            size_mode,
            finger_count_fixed: fixed,
            fixed_finger_count: 4,
            fixed_finger_length: 3.0,
            fixed_notch_length: 2.5,
            min_finger_length: 3.5,
            min_notch_length: 2.0,
            ..SizingPolicy::default()
        }
    }

    fn assert_slices_eq(a: &SliceSet, b: &SliceSet) {
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b.iter()) {
            assert_relative_eq!(x.offset, y.offset, epsilon = 1e-9);
            assert_relative_eq!(x.length, y.length, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_non_positive_size_needs_no_cut() {
        let p = SizingPolicy::default();
        assert_eq!(resolve(0.0, &p), LayoutResult::NoCutNeeded);
        assert_eq!(resolve(-3.0, &p), LayoutResult::NoCutNeeded);
    }

    #[test]
    fn test_non_finite_size_is_infeasible() {
        let p = SizingPolicy::default();
        assert_eq!(
            resolve(f64::NAN, &p),
            LayoutResult::Infeasible(Infeasibility::InvalidSize)
        );
        assert_eq!(
            resolve(f64::INFINITY, &p),
            LayoutResult::Infeasible(Infeasibility::InvalidSize)
        );
    }

    #[test]
    fn test_fixed_count_equal_size_fingers_outside() {
        let p = SizingPolicy {
            finger_count_fixed: true,
            fixed_finger_count: 5,
            size_mode: SizeMode::EqualSize,
            placement: Placement::FingersOutside,
            gap: 0.0,
            ..SizingPolicy::default()
        };
        let layout = resolve(100.0, &p).into_layout().unwrap();
        assert_eq!(layout.num_fingers, 5);
        assert_eq!(layout.num_notches, 4);
        assert_relative_eq!(layout.finger_length, 100.0 / 9.0, epsilon = 1e-12);
        assert_relative_eq!(layout.notch_length, 100.0 / 9.0, epsilon = 1e-12);

        // The notch tool removes the five finger positions of the mating part.
        assert_eq!(layout.notch_tool_slices.len(), 5);
        for (i, slice) in layout.notch_tool_slices.iter().enumerate() {
            assert_relative_eq!(slice.offset, 2.0 * i as f64 * 100.0 / 9.0, epsilon = 1e-9);
            assert_relative_eq!(slice.length, 100.0 / 9.0, epsilon = 1e-9);
        }
        // The finger tool removes the four notches in between.
        assert_eq!(layout.finger_tool_slices.len(), 4);
        assert_relative_eq!(
            layout.finger_tool_slices.as_slice()[0].offset,
            100.0 / 9.0,
            epsilon = 1e-9
        );
        assert_relative_eq!(layout.occupied_length(), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_fixed_count_fixed_notch_and_finger() {
        let p = SizingPolicy {
            finger_count_fixed: true,
            fixed_finger_count: 3,
            size_mode: SizeMode::FixedNotchSize,
            fixed_notch_length: 4.0,
            placement: Placement::NotchesOutside,
            gap: 0.5,
            ..SizingPolicy::default()
        };
        // 3 fingers, 4 notches, 6 gaps: 3f + 16 + 3 = 40
        let layout = resolve(40.0, &p).into_layout().unwrap();
        assert_eq!((layout.num_fingers, layout.num_notches), (3, 4));
        assert_relative_eq!(layout.finger_length, 7.0, epsilon = 1e-12);
        assert_relative_eq!(layout.notch_length, 4.0);
        assert_relative_eq!(layout.finger_start, 4.5);
        assert_relative_eq!(layout.notch_start, 0.0);

        let p = SizingPolicy {
            size_mode: SizeMode::FixedFingerSize,
            fixed_finger_length: 4.0,
            placement: Placement::SameCountStartFinger,
            ..p
        };
        // 3 fingers, 3 notches, 5 gaps: 12 + 3n + 2.5 = 40
        let layout = resolve(40.0, &p).into_layout().unwrap();
        assert_eq!((layout.num_fingers, layout.num_notches), (3, 3));
        assert_relative_eq!(layout.notch_length, 25.5 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(layout.occupied_length(), 40.0, epsilon = 1e-9);
    }

    #[test]
    fn test_dynamic_equal_same_count_start_finger() {
        let p = SizingPolicy {
            finger_count_fixed: false,
            size_mode: SizeMode::EqualSize,
            placement: Placement::SameCountStartFinger,
            min_finger_length: 3.0,
            gap: 0.0,
            ..SizingPolicy::default()
        };
        // floor(10 / 3) = 3 is odd; same-count placements drop the odd unit.
        let layout = resolve(10.0, &p).into_layout().unwrap();
        assert_eq!((layout.num_fingers, layout.num_notches), (1, 1));
        assert_relative_eq!(layout.finger_length, 5.0);
        assert!(layout.occupied_length() <= 10.0 + LAYOUT_EPSILON);
    }

    #[test]
    fn test_dynamic_equal_parity_rules() {
        let base = SizingPolicy {
            min_finger_length: 3.0,
            ..SizingPolicy::default()
        };
        let counts = |size: f64, placement: Placement| {
            let layout = resolve(size, &SizingPolicy { placement, ..base.clone() })
                .into_layout()
                .unwrap();
            (layout.num_fingers, layout.num_notches)
        };
        // max count 3 (odd)
        assert_eq!(counts(10.0, Placement::FingersOutside), (2, 1));
        assert_eq!(counts(10.0, Placement::NotchesOutside), (1, 2));
        // max count 4 (even)
        assert_eq!(counts(12.0, Placement::FingersOutside), (2, 1));
        assert_eq!(counts(12.0, Placement::NotchesOutside), (1, 2));
        assert_eq!(counts(12.0, Placement::SameCountStartNotch), (2, 2));
    }

    #[test]
    fn test_dynamic_fixed_notch_with_gap() {
        let p = SizingPolicy {
            size_mode: SizeMode::FixedNotchSize,
            placement: Placement::FingersOutside,
            fixed_notch_length: 2.0,
            min_finger_length: 3.0,
            gap: 0.5,
            ..SizingPolicy::default()
        };
        // floor((20 + 2.5 + 0.5) / 6) = 3 fingers, 2 notches, 4 gaps
        let layout = resolve(20.0, &p).into_layout().unwrap();
        assert_eq!((layout.num_fingers, layout.num_notches), (3, 2));
        assert_relative_eq!(layout.finger_length, (20.0 - 4.0 - 2.0) / 3.0, epsilon = 1e-12);

        // Finger tool slices sit on the notches, widened by one gap per side.
        let first = layout.finger_tool_slices.as_slice()[0];
        assert_relative_eq!(first.offset, layout.finger_length, epsilon = 1e-12);
        assert_relative_eq!(first.length, 3.0);
        // Notch tool slices start one gap before the first finger.
        assert_relative_eq!(layout.notch_tool_slices.as_slice()[0].offset, -0.5);
    }

    #[test]
    fn test_every_branch_produces_valid_layouts() {
        for fixed in [true, false] {
            for size_mode in SIZE_MODES {
                for placement in PLACEMENTS {
                    for gap in [0.0, 0.2] {
                        let p = SizingPolicy {
                            gap,
                            ..policy(placement, size_mode, fixed)
                        };
                        let mut feasible = 0;
                        for step in 1..=80 {
                            let size = step as f64 * 0.75;
                            let Some(layout) = resolve(size, &p).into_layout() else {
                                continue;
                            };
                            feasible += 1;
                            assert!(layout.finger_length > LAYOUT_EPSILON);
                            assert!(layout.notch_length > LAYOUT_EPSILON);
                            assert_ne!(layout.num_fingers + layout.num_notches, 1);
                            assert!(layout.occupied_length() <= size + LAYOUT_EPSILON);
                            assert!(layout.finger_tool_slices.is_disjoint(1e-9));
                            assert!(layout.notch_tool_slices.is_disjoint(1e-9));
                            assert_eq!(layout.finger_tool_slices.len(), layout.num_notches);
                            assert_eq!(layout.notch_tool_slices.len(), layout.num_fingers);
                            if !fixed && size_mode != SizeMode::FixedFingerSize {
                                assert!(
                                    layout.finger_length >= p.min_finger_length - LAYOUT_EPSILON
                                );
                            }
                        }
                        assert!(feasible > 0, "{fixed} {size_mode:?} {placement:?} never fits");
                    }
                }
            }
        }
    }

    #[test]
    fn test_resolve_is_deterministic() {
        for size_mode in SIZE_MODES {
            for fixed in [true, false] {
                let p = policy(Placement::NotchesOutside, size_mode, fixed);
                assert_eq!(resolve(37.3, &p), resolve(37.3, &p));
            }
        }
    }

    #[test]
    fn test_single_unit_is_infeasible() {
        let p = SizingPolicy {
            finger_count_fixed: true,
            fixed_finger_count: 1,
            placement: Placement::FingersOutside,
            ..SizingPolicy::default()
        };
        for size_mode in SIZE_MODES {
            let p = SizingPolicy { size_mode, ..p.clone() };
            assert_eq!(
                resolve(10.0, &p),
                LayoutResult::Infeasible(Infeasibility::SingleUnit)
            );
        }
    }

    #[test]
    fn test_minimum_longer_than_overlap_is_infeasible() {
        for size_mode in SIZE_MODES {
            for placement in PLACEMENTS {
                let p = SizingPolicy {
                    placement,
                    size_mode,
                    min_finger_length: 60.0,
                    min_notch_length: 60.0,
                    fixed_finger_length: 60.0,
                    fixed_notch_length: 60.0,
                    ..SizingPolicy::default()
                };
                assert!(
                    matches!(resolve(50.0, &p), LayoutResult::Infeasible(_)),
                    "{size_mode:?} {placement:?}"
                );
            }
        }
    }

    #[test]
    fn test_fixed_notches_longer_than_overlap() {
        let p = SizingPolicy {
            finger_count_fixed: true,
            fixed_finger_count: 3,
            size_mode: SizeMode::FixedNotchSize,
            fixed_notch_length: 6.0,
            ..SizingPolicy::default()
        };
        assert_eq!(
            resolve(10.0, &p),
            LayoutResult::Infeasible(Infeasibility::NonPositiveLength)
        );
    }

    #[test]
    fn test_mirrored_policy_swaps_tools() {
        for size_mode in SIZE_MODES {
            for placement in PLACEMENTS {
                // Equal sizing only reads the finger minimum, so both minima match.
                let p = SizingPolicy {
                    gap: 0.1,
                    min_notch_length: 3.5,
                    ..policy(placement, size_mode, false)
                };
                for size in [9.0, 17.5, 33.0, 64.25] {
                    let a = resolve(size, &p);
                    let b = resolve(size, &p.mirrored());
                    match (a, b) {
                        (LayoutResult::Layout(a), LayoutResult::Layout(b)) => {
                            assert_eq!(a.num_fingers, b.num_notches);
                            assert_eq!(a.num_notches, b.num_fingers);
                            assert_slices_eq(&a.finger_tool_slices, &b.notch_tool_slices);
                            assert_slices_eq(&a.notch_tool_slices, &b.finger_tool_slices);
                        }
                        (a, b) => assert_eq!(
                            std::mem::discriminant(&a),
                            std::mem::discriminant(&b),
                            "{size_mode:?} {placement:?} {size}"
                        ),
                    }
                }
            }
        }
    }

    #[test]
    fn test_larger_gap_never_adds_units() {
        let units = |size: f64, p: &SizingPolicy| {
            resolve(size, p)
                .layout()
                .map_or(0, |l| l.num_fingers + l.num_notches)
        };
        for size_mode in SIZE_MODES {
            for placement in PLACEMENTS {
                for size in [7.0, 12.5, 30.0, 55.5] {
                    let mut previous = usize::MAX;
                    for gap in [0.0, 0.1, 0.25, 0.5, 1.0, 2.0] {
                        let p = SizingPolicy {
                            gap,
                            ..policy(placement, size_mode, false)
                        };
                        let count = units(size, &p);
                        assert!(count <= previous, "{size_mode:?} {placement:?} {size} {gap}");
                        previous = count;
                    }
                }
            }
        }
    }

    #[test]
    fn test_finger_and_notch_slices_tile_the_overlap() {
        let p = SizingPolicy {
            placement: Placement::SameCountStartNotch,
            gap: 0.25,
            ..SizingPolicy::default()
        };
        let layout = resolve(20.0, &p).into_layout().unwrap();
        let fingers = layout.finger_slices();
        let notches = layout.notch_slices();
        assert_eq!(notches.as_slice()[0].offset, 0.0);
        assert_relative_eq!(
            fingers.as_slice()[0].offset,
            layout.notch_length + layout.gap
        );
        let (_, end) = fingers.span().unwrap();
        assert_relative_eq!(end, 20.0, epsilon = 1e-9);
    }

    #[test]
    fn test_infeasibility_messages() {
        assert!(Infeasibility::NoUnitsFit.to_string().contains("minimum"));
        assert!(Infeasibility::SingleUnit.to_string().contains("notch"));
        assert!(Infeasibility::TooManyUnits.to_string().contains("too many"));
    }

    #[test]
    fn test_huge_overlap_is_too_many_units() {
        let mut p = policy(Placement::NotchesOutside, SizeMode::FixedNotchSize, false);
        p.fixed_notch_length = 1.0;
        p.min_finger_length = 0.0;
        assert!(p.validate().is_ok());
        assert_eq!(
            resolve(1e19, &p),
            LayoutResult::Infeasible(Infeasibility::TooManyUnits)
        );

        for size_mode in [SizeMode::EqualSize, SizeMode::FixedFingerSize] {
            let p = policy(Placement::FingersOutside, size_mode, false);
            assert_eq!(
                resolve(f64::MAX, &p),
                LayoutResult::Infeasible(Infeasibility::TooManyUnits)
            );
        }

        let mut p = policy(Placement::NotchesOutside, SizeMode::EqualSize, true);
        p.fixed_finger_count = u32::MAX;
        assert_eq!(
            resolve(1e19, &p),
            LayoutResult::Infeasible(Infeasibility::TooManyUnits)
        );
    }

    #[test]
    fn test_count_floors_without_slack() {
        // floor(5.999995 / 3) = 1: a single unit, not one finger and one notch.
        let mut p = policy(Placement::SameCountStartFinger, SizeMode::EqualSize, false);
        p.min_finger_length = 3.0;
        assert_eq!(
            resolve(5.999995, &p),
            LayoutResult::Infeasible(Infeasibility::NoUnitsFit)
        );
        let layout = resolve(6.0, &p).into_layout().unwrap();
        assert_eq!((layout.num_fingers, layout.num_notches), (1, 1));
        assert_relative_eq!(layout.finger_length, 3.0, epsilon = 1e-12);
    }
}
