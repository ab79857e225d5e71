//! Sizing and placement policy for a finger joint.
//!
//! A [`SizingPolicy`] is a fully resolved, immutable value. It can be read
//! from and written to JSON or TOML so a front end can remember the last
//! used settings between sessions.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PolicyError, Result};

/// Which kind of unit sits at the two ends of the overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// Fingers at both ends, one notch fewer than fingers.
    #[default]
    FingersOutside,
    /// Notches at both ends, one notch more than fingers.
    NotchesOutside,
    /// Equal counts, the first unit is a finger.
    SameCountStartFinger,
    /// Equal counts, the first unit is a notch.
    SameCountStartNotch,
}

impl Placement {
    /// True if the layout begins with a finger at offset zero.
    pub fn starts_with_finger(self) -> bool {
        matches!(self, Placement::FingersOutside | Placement::SameCountStartFinger)
    }

    /// The placement seen from the mating part, where fingers and notches trade places.
    pub fn mirrored(self) -> Self {
        match self {
            Placement::FingersOutside => Placement::NotchesOutside,
            Placement::NotchesOutside => Placement::FingersOutside,
            Placement::SameCountStartFinger => Placement::SameCountStartNotch,
            Placement::SameCountStartNotch => Placement::SameCountStartFinger,
        }
    }

    /// Integer code used when the policy is stored as numeric feature parameters.
    pub fn to_code(self) -> u32 {
        match self {
            Placement::FingersOutside => 0,
            Placement::NotchesOutside => 1,
            Placement::SameCountStartFinger => 2,
            Placement::SameCountStartNotch => 3,
        }
    }

    /// Inverse of [`Placement::to_code`]; unknown codes fall back to `FingersOutside`.
    pub fn from_code(code: u32) -> Self {
        match code {
            1 => Placement::NotchesOutside,
            2 => Placement::SameCountStartFinger,
            3 => Placement::SameCountStartNotch,
            _ => Placement::FingersOutside,
        }
    }
}

/// Which length is fixed and which one absorbs the remaining space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeMode {
    /// Notches have `fixed_notch_length`, fingers are stretched.
    FixedNotchSize,
    /// Fingers have `fixed_finger_length`, notches are stretched.
    FixedFingerSize,
    /// Fingers and notches share one length.
    #[default]
    EqualSize,
}

impl SizeMode {
    /// The mode with finger and notch roles swapped.
    pub fn mirrored(self) -> Self {
        match self {
            SizeMode::FixedNotchSize => SizeMode::FixedFingerSize,
            SizeMode::FixedFingerSize => SizeMode::FixedNotchSize,
            SizeMode::EqualSize => SizeMode::EqualSize,
        }
    }

    /// Integer code used when the policy is stored as numeric feature parameters.
    pub fn to_code(self) -> u32 {
        match self {
            SizeMode::FixedNotchSize => 0,
            SizeMode::FixedFingerSize => 1,
            SizeMode::EqualSize => 2,
        }
    }

    /// Inverse of [`SizeMode::to_code`]; unknown codes fall back to `EqualSize`.
    pub fn from_code(code: u32) -> Self {
        match code {
            0 => SizeMode::FixedNotchSize,
            1 => SizeMode::FixedFingerSize,
            _ => SizeMode::EqualSize,
        }
    }
}

/// Everything the layout solver needs besides the overlap length.
///
/// All lengths share one linear unit. Missing keys in a policy document
/// take their [`Default`] values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizingPolicy {
    /// Which unit type sits at the ends.
    pub placement: Placement,
    /// Which length is fixed.
    pub size_mode: SizeMode,
    /// Use `fixed_finger_count` instead of fitting as many units as possible.
    pub finger_count_fixed: bool,
    /// Number of fingers when the count is fixed.
    pub fixed_finger_count: u32,
    /// Finger length for [`SizeMode::FixedFingerSize`].
    pub fixed_finger_length: f64,
    /// Notch length for [`SizeMode::FixedNotchSize`].
    pub fixed_notch_length: f64,
    /// Lower bound on the finger length when the count is dynamic.
    pub min_finger_length: f64,
    /// Lower bound on the notch length when the count is dynamic.
    pub min_notch_length: f64,
    /// Clearance between neighbouring units along the axis.
    pub gap: f64,
    /// Lateral clearance between the tool bodies and the part boundary.
    pub gap_to_part: f64,
}

impl Default for SizingPolicy {
    fn default() -> Self {
        Self {
            placement: Placement::FingersOutside,
            size_mode: SizeMode::EqualSize,
            finger_count_fixed: false,
            fixed_finger_count: 3,
            fixed_finger_length: 2.0,
            fixed_notch_length: 2.0,
            min_finger_length: 2.0,
            min_notch_length: 2.0,
            gap: 0.0,
            gap_to_part: 0.0,
        }
    }
}

impl SizingPolicy {
    /// The policy for the mating part: placement, size mode and the
    /// finger/notch length parameters all swap roles.
    pub fn mirrored(&self) -> Self {
        Self {
            placement: self.placement.mirrored(),
            size_mode: self.size_mode.mirrored(),
            fixed_finger_length: self.fixed_notch_length,
            fixed_notch_length: self.fixed_finger_length,
            min_finger_length: self.min_notch_length,
            min_notch_length: self.min_finger_length,
            ..self.clone()
        }
    }

    /// Check that every length is usable and that no resolution branch
    /// selected by this policy can divide by zero.
    pub fn validate(&self) -> Result<()> {
        let lengths = [
            ("fixed_finger_length", self.fixed_finger_length),
            ("fixed_notch_length", self.fixed_notch_length),
            ("min_finger_length", self.min_finger_length),
            ("min_notch_length", self.min_notch_length),
            ("gap", self.gap),
            ("gap_to_part", self.gap_to_part),
        ];
        for (field, value) in lengths {
            if !value.is_finite() || value < 0.0 {
                return Err(PolicyError::InvalidLength { field, value });
            }
        }

        if self.finger_count_fixed {
            if self.fixed_finger_count == 0 {
                return Err(PolicyError::ZeroFingerCount);
            }
            return Ok(());
        }

        let (field, denominator) = match self.size_mode {
            SizeMode::EqualSize => ("min_finger_length", self.min_finger_length + self.gap),
            SizeMode::FixedNotchSize => (
                "min_finger_length",
                self.fixed_notch_length + self.min_finger_length + 2.0 * self.gap,
            ),
            SizeMode::FixedFingerSize => (
                "min_notch_length",
                self.fixed_finger_length + self.min_notch_length + 2.0 * self.gap,
            ),
        };
        if denominator <= 0.0 {
            return Err(PolicyError::ZeroDenominator { field });
        }
        Ok(())
    }

    /// Parse a policy from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the policy as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a policy from TOML.
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Serialize the policy as TOML.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Read a policy file. `.toml` files are parsed as TOML, everything else as JSON.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        if is_toml(path) {
            Self::from_toml(&text)
        } else {
            Self::from_json(&text)
        }
    }

    /// Like [`SizingPolicy::load`], but a missing file yields the defaults.
    ///
    /// A file that exists but cannot be parsed is still an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            tracing::debug!(path = %path.display(), "no policy file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Write the policy to `path`, picking the format from the extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = if is_toml(path) {
            self.to_toml()?
        } else {
            self.to_json()?
        };
        fs::write(path, text)?;
        Ok(())
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_is_valid() {
        let policy = SizingPolicy::default();
        assert!(policy.validate().is_ok());
        assert_eq!(policy.placement, Placement::FingersOutside);
        assert_eq!(policy.size_mode, SizeMode::EqualSize);
        assert!(!policy.finger_count_fixed);
    }

    #[test]
    fn test_codes_roundtrip_and_fallback() {
        for code in 0..4 {
            assert_eq!(Placement::from_code(code).to_code(), code);
        }
        for code in 0..3 {
            assert_eq!(SizeMode::from_code(code).to_code(), code);
        }
        assert_eq!(Placement::from_code(42), Placement::FingersOutside);
        assert_eq!(SizeMode::from_code(42), SizeMode::EqualSize);
    }

    #[test]
    fn test_mirrored_swaps_roles() {
        let policy = SizingPolicy {
            placement: Placement::SameCountStartFinger,
            size_mode: SizeMode::FixedNotchSize,
            fixed_finger_length: 1.0,
            fixed_notch_length: 4.0,
            min_finger_length: 3.0,
            min_notch_length: 5.0,
            gap: 0.25,
            ..SizingPolicy::default()
        };
        let mirrored = policy.mirrored();
        assert_eq!(mirrored.placement, Placement::SameCountStartNotch);
        assert_eq!(mirrored.size_mode, SizeMode::FixedFingerSize);
        assert_eq!(mirrored.fixed_finger_length, 4.0);
        assert_eq!(mirrored.min_notch_length, 3.0);
        assert_eq!(mirrored.gap, 0.25);
        assert_eq!(mirrored.mirrored(), policy);
    }

    #[test]
    fn test_validate_rejects_bad_lengths() {
        let policy = SizingPolicy {
            gap: -0.1,
            ..SizingPolicy::default()
        };
        assert!(matches!(
            policy.validate(),
            Err(PolicyError::InvalidLength { field: "gap", .. })
        ));

        let policy = SizingPolicy {
            min_notch_length: f64::NAN,
            ..SizingPolicy::default()
        };
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_count_and_denominator() {
        let policy = SizingPolicy {
            finger_count_fixed: true,
            fixed_finger_count: 0,
            ..SizingPolicy::default()
        };
        assert!(matches!(policy.validate(), Err(PolicyError::ZeroFingerCount)));

        let policy = SizingPolicy {
            min_finger_length: 0.0,
            gap: 0.0,
            ..SizingPolicy::default()
        };
        assert!(matches!(
            policy.validate(),
            Err(PolicyError::ZeroDenominator { .. })
        ));

        // A gap alone keeps the denominator positive.
        let policy = SizingPolicy {
            min_finger_length: 0.0,
            gap: 0.5,
            ..SizingPolicy::default()
        };
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let policy =
            SizingPolicy::from_json(r#"{"placement": "notches_outside", "gap": 0.1}"#).unwrap();
        assert_eq!(policy.placement, Placement::NotchesOutside);
        assert_eq!(policy.gap, 0.1);
        assert_eq!(policy.fixed_finger_count, 3);
        assert_eq!(policy.size_mode, SizeMode::EqualSize);
    }

    #[test]
    fn test_json_and_toml_preserve_policy() {
        let policy = SizingPolicy {
            placement: Placement::SameCountStartNotch,
            size_mode: SizeMode::FixedFingerSize,
            finger_count_fixed: true,
            fixed_finger_count: 7,
            gap_to_part: 0.05,
            ..SizingPolicy::default()
        };
        let json = policy.to_json().unwrap();
        assert!(json.contains("same_count_start_notch"));
        assert_eq!(SizingPolicy::from_json(&json).unwrap(), policy);

        let text = policy.to_toml().unwrap();
        assert!(text.contains("fixed_finger_size"));
        assert_eq!(SizingPolicy::from_toml(&text).unwrap(), policy);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(matches!(
            SizingPolicy::from_json("{ not json"),
            Err(PolicyError::Json(_))
        ));
        assert!(SizingPolicy::from_json(r#"{"placement": "sideways"}"#).is_err());
    }

    #[test]
    fn test_save_and_load_files() {
        let dir = std::env::temp_dir().join(format!(
            "fingerjoint-policy-save-and-load-files-{}",
            std::process::id()
        ));
        fs::create_dir_all(&dir).unwrap();
        let policy = SizingPolicy {
            min_finger_length: 6.0,
            ..SizingPolicy::default()
        };

        for name in ["defaults.json", "defaults.toml"] {
            let path = dir.join(name);
            policy.save(&path).unwrap();
            assert_eq!(SizingPolicy::load(&path).unwrap(), policy);
            assert_eq!(SizingPolicy::load_or_default(&path).unwrap(), policy);
        }

        let missing = dir.join("missing.json");
        assert_eq!(
            SizingPolicy::load_or_default(&missing).unwrap(),
            SizingPolicy::default()
        );
        assert!(matches!(
            SizingPolicy::load(&missing),
            Err(PolicyError::Io(_))
        ));

        fs::remove_dir_all(&dir).unwrap();
    }
}
