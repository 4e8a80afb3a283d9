use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, Result};

/// Construction recipe of one feature, selected by its `type` tag.
///
/// Offsets are chord fractions. Flaps measure from the trailing edge,
/// slats and tip closures from the leading edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeatureRecipe {
    Symmetric(SymmetricFlap),
    NonSymmetric(NonSymmetricFlap),
    Fowler(FowlerFlap),
    Slat(SlatRecipe),
    WingTipClosure(TipClosure),
}

impl FeatureRecipe {
    /// Parses a recipe from JSON and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Parse`] for malformed JSON, or the
    /// validation error of the recipe.
    pub fn from_json(json: &str) -> Result<Self> {
        let recipe: Self = serde_json::from_str(json).map_err(ConfigurationError::from)?;
        recipe.validate()?;
        Ok(recipe)
    }

    /// Short feature name used in diagnostics.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Symmetric(_) => SymmetricFlap::NAME,
            Self::NonSymmetric(_) => NonSymmetricFlap::NAME,
            Self::Fowler(_) => FowlerFlap::NAME,
            Self::Slat(_) => SlatRecipe::NAME,
            Self::WingTipClosure(_) => TipClosure::NAME,
        }
    }

    /// Checks every ratio of the recipe.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidRecipe`] for out-of-range values
    /// and [`ConfigurationError::UnsupportedFeature`] for Fowler flaps.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Symmetric(r) => r.validate(),
            Self::NonSymmetric(r) => r.validate(),
            Self::Fowler(r) => r.validate(),
            Self::Slat(r) => r.validate(),
            Self::WingTipClosure(r) => r.validate(),
        }
    }
}

fn invalid(recipe: &str, message: impl std::fmt::Display) -> crate::error::WingcutError {
    ConfigurationError::InvalidRecipe(format!("{recipe}: {message}")).into()
}

fn check_ratio(recipe: &str, field: &str, value: f64, max: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 && value <= max {
        Ok(())
    } else {
        Err(invalid(recipe, format!("{field} = {value} is outside (0, {max}]")))
    }
}

fn check_positive(recipe: &str, field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(recipe, format!("{field} = {value} must be positive")))
    }
}

fn check_gap(recipe: &str, lateral_gap: f64) -> Result<()> {
    if lateral_gap.is_finite() && lateral_gap >= 0.0 {
        Ok(())
    } else {
        Err(invalid(recipe, format!("lateral_gap = {lateral_gap} must not be negative")))
    }
}

/// Plain flap whose upper and lower skins are cut at the same chord station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SymmetricFlap {
    pub inner_chord_ratio: f64,
    pub outer_chord_ratio: f64,
    /// Spanwise clearance to the fixed wing, in meters.
    pub lateral_gap: f64,
    /// Span length above which a support station is inserted, in meters.
    pub support_threshold: f64,
    /// Chordwise gap as a fraction of the flap chord ratio.
    pub gap_factor: f64,
    /// Depth of the cove lip as a fraction of the gap.
    pub lip_factor: f64,
    /// Flap nose length as a multiple of the gap.
    pub nose_factor: f64,
}

impl SymmetricFlap {
    pub const NAME: &'static str = "symmetric flap";

    /// Checks the ratios.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidRecipe`] describing the first
    /// offending field.
    pub fn validate(&self) -> Result<()> {
        check_ratio(Self::NAME, "inner_chord_ratio", self.inner_chord_ratio, 0.6)?;
        check_ratio(Self::NAME, "outer_chord_ratio", self.outer_chord_ratio, 0.6)?;
        check_gap(Self::NAME, self.lateral_gap)?;
        check_positive(Self::NAME, "support_threshold", self.support_threshold)?;
        check_ratio(Self::NAME, "gap_factor", self.gap_factor, 0.5)?;
        check_ratio(Self::NAME, "lip_factor", self.lip_factor, 1.0)?;
        check_positive(Self::NAME, "nose_factor", self.nose_factor)?;
        for ratio in [self.inner_chord_ratio, self.outer_chord_ratio] {
            if self.nose_factor * self.gap_factor * ratio >= ratio {
                return Err(invalid(Self::NAME, "flap nose reaches the trailing edge"));
            }
        }
        Ok(())
    }
}

impl Default for SymmetricFlap {
    fn default() -> Self {
        Self {
            inner_chord_ratio: 0.3,
            outer_chord_ratio: 0.3,
            lateral_gap: 0.025,
            support_threshold: 5.0,
            gap_factor: 0.1,
            lip_factor: 0.08,
            nose_factor: 3.0,
        }
    }
}

/// Flap whose upper skin overhangs the flap nose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NonSymmetricFlap {
    pub inner_chord_ratio: f64,
    pub outer_chord_ratio: f64,
    pub lateral_gap: f64,
    pub support_threshold: f64,
    /// Chord fraction of the flap upper skin, from the trailing edge.
    pub upper_overhang: f64,
    /// Upper gap as a fraction of the overhang.
    pub gap_factor: f64,
    /// Lower cove gap as a fraction of the lower trim.
    pub lower_gap_factor: f64,
    /// Lower trim as a fraction of the flap chord ratio.
    pub lower_trim_factor: f64,
    /// Upper lip depth as a fraction of the upper gap.
    pub lip_factor: f64,
    /// Flap nose offset as a fraction of the lower trim.
    pub nose_factor: f64,
}

impl NonSymmetricFlap {
    pub const NAME: &'static str = "non-symmetric flap";

    /// Checks the ratios.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidRecipe`] describing the first
    /// offending field.
    pub fn validate(&self) -> Result<()> {
        check_ratio(Self::NAME, "inner_chord_ratio", self.inner_chord_ratio, 0.6)?;
        check_ratio(Self::NAME, "outer_chord_ratio", self.outer_chord_ratio, 0.6)?;
        check_gap(Self::NAME, self.lateral_gap)?;
        check_positive(Self::NAME, "support_threshold", self.support_threshold)?;
        check_ratio(Self::NAME, "upper_overhang", self.upper_overhang, 0.6)?;
        check_ratio(Self::NAME, "gap_factor", self.gap_factor, 1.0)?;
        check_ratio(Self::NAME, "lower_gap_factor", self.lower_gap_factor, 1.0)?;
        check_ratio(Self::NAME, "lower_trim_factor", self.lower_trim_factor, 1.0)?;
        check_ratio(Self::NAME, "lip_factor", self.lip_factor, 1.0)?;
        check_ratio(Self::NAME, "nose_factor", self.nose_factor, 1.0)?;
        for ratio in [self.inner_chord_ratio, self.outer_chord_ratio] {
            if self.upper_overhang * (1.0 + self.gap_factor) >= ratio * (1.0 - self.lower_trim_factor) {
                return Err(invalid(
                    Self::NAME,
                    format!("upper cut passes the flap nose at chord ratio {ratio}"),
                ));
            }
        }
        Ok(())
    }
}

impl Default for NonSymmetricFlap {
    fn default() -> Self {
        Self {
            inner_chord_ratio: 0.3,
            outer_chord_ratio: 0.3,
            lateral_gap: 0.025,
            support_threshold: 5.0,
            upper_overhang: 0.12,
            gap_factor: 0.15,
            lower_gap_factor: 0.4,
            lower_trim_factor: 0.05,
            lip_factor: 0.01,
            nose_factor: 0.5,
        }
    }
}

/// Fowler flap; recognised but not constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FowlerFlap {
    pub inner_chord_ratio: f64,
    pub outer_chord_ratio: f64,
    pub lateral_gap: f64,
}

impl FowlerFlap {
    pub const NAME: &'static str = "fowler flap";

    /// Always fails.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::UnsupportedFeature`].
    pub fn validate(&self) -> Result<()> {
        Err(ConfigurationError::UnsupportedFeature(Self::NAME).into())
    }
}

impl Default for FowlerFlap {
    fn default() -> Self {
        Self {
            inner_chord_ratio: 0.3,
            outer_chord_ratio: 0.3,
            lateral_gap: 0.025,
        }
    }
}

/// Leading edge slat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlatRecipe {
    pub inner_chord_ratio: f64,
    pub outer_chord_ratio: f64,
    pub lateral_gap: f64,
    pub support_threshold: f64,
    /// Reference slat chord fraction scaling the slat trim and gap.
    pub slat_chord: f64,
    /// Lower cut as a fraction of the slat chord ratio.
    pub lower_factor: f64,
    /// Upper trim of the slat body as a fraction of `slat_chord`.
    pub trim_factor: f64,
    /// Lower trim of the slat body as a fraction of the lower cut.
    pub lower_trim_factor: f64,
    /// Cove apex on the chord as a fraction of the slat chord ratio.
    pub middle_factor: f64,
    /// Slat gap as a fraction of `slat_chord`.
    pub gap_factor: f64,
    /// Length of the lower trailing edge detail, chord fraction.
    pub lower_detail: f64,
}

/// Chord fractions of the slat construction points at one station.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SlatOffsets {
    pub upper_cut: f64,
    pub lower_cut: f64,
    pub cove_apex: f64,
    pub body_upper: f64,
    pub body_lower: f64,
    pub body_detail: f64,
    pub body_apex: f64,
}

impl SlatRecipe {
    pub const NAME: &'static str = "slat";

    /// Checks the ratios and that every derived offset stays on the chord.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidRecipe`] describing the first
    /// offending field.
    pub fn validate(&self) -> Result<()> {
        check_ratio(Self::NAME, "inner_chord_ratio", self.inner_chord_ratio, 0.4)?;
        check_ratio(Self::NAME, "outer_chord_ratio", self.outer_chord_ratio, 0.4)?;
        check_gap(Self::NAME, self.lateral_gap)?;
        check_positive(Self::NAME, "support_threshold", self.support_threshold)?;
        check_ratio(Self::NAME, "slat_chord", self.slat_chord, 0.4)?;
        check_ratio(Self::NAME, "lower_factor", self.lower_factor, 1.0)?;
        check_ratio(Self::NAME, "trim_factor", self.trim_factor, 1.0)?;
        check_ratio(Self::NAME, "lower_trim_factor", self.lower_trim_factor, 1.0)?;
        check_ratio(Self::NAME, "middle_factor", self.middle_factor, 1.0)?;
        check_ratio(Self::NAME, "gap_factor", self.gap_factor, 1.0)?;
        check_ratio(Self::NAME, "lower_detail", self.lower_detail, 0.1)?;
        self.offsets(self.inner_chord_ratio)?;
        self.offsets(self.outer_chord_ratio)?;
        Ok(())
    }

    /// Offsets of the slat points for chord ratio `ratio`.
    pub(crate) fn offsets(&self, ratio: f64) -> Result<SlatOffsets> {
        let lower_cut = self.lower_factor * ratio;
        let cove_apex = self.middle_factor * ratio;
        let body_lower = lower_cut - self.lower_trim_factor * lower_cut;
        let offsets = SlatOffsets {
            upper_cut: ratio,
            lower_cut,
            cove_apex,
            body_upper: ratio - self.trim_factor * self.slat_chord,
            body_lower,
            body_detail: body_lower - self.lower_detail,
            body_apex: cove_apex - self.gap_factor * self.slat_chord,
        };
        let derived = [
            ("body_upper", offsets.body_upper),
            ("body_detail", offsets.body_detail),
            ("body_apex", offsets.body_apex),
        ];
        for (field, value) in derived {
            if value <= 0.0 {
                return Err(invalid(
                    Self::NAME,
                    format!("{field} = {value} at chord ratio {ratio} falls ahead of the leading edge"),
                ));
            }
        }
        Ok(offsets)
    }
}

impl Default for SlatRecipe {
    fn default() -> Self {
        Self {
            inner_chord_ratio: 0.17,
            outer_chord_ratio: 0.17,
            lateral_gap: 0.025,
            support_threshold: 3.0,
            slat_chord: 0.17,
            lower_factor: 0.70,
            trim_factor: 0.25,
            lower_trim_factor: 0.30,
            middle_factor: 0.32,
            gap_factor: 0.08,
            lower_detail: 0.011,
        }
    }
}

/// Rounded closure of the wing tip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TipClosure {
    /// Chord fractions, from the leading edge, of the closure sections.
    pub chord_fractions: Vec<f64>,
    /// Outboard distance of the closure apex as a multiple of the local thickness.
    pub apex_height_ratio: f64,
    /// Exponent of the apex tangent weight law.
    pub weight_exponent: f64,
}

impl TipClosure {
    pub const NAME: &'static str = "wingtip closure";

    /// Checks the fractions and shape parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidRecipe`] describing the first
    /// offending field.
    pub fn validate(&self) -> Result<()> {
        if self.chord_fractions.is_empty() {
            return Err(invalid(Self::NAME, "at least one chord fraction is required"));
        }
        for &f in &self.chord_fractions {
            if !(f > 0.0 && f < 1.0) {
                return Err(invalid(Self::NAME, format!("chord fraction {f} is outside (0, 1)")));
            }
        }
        check_positive(Self::NAME, "apex_height_ratio", self.apex_height_ratio)?;
        check_positive(Self::NAME, "weight_exponent", self.weight_exponent)
    }
}

impl Default for TipClosure {
    fn default() -> Self {
        Self {
            chord_fractions: vec![0.15, 0.3, 0.5, 0.7, 0.85],
            apex_height_ratio: 0.4,
            weight_exponent: 0.6,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::WingcutError;
    use approx::assert_relative_eq;
    use test_case::test_case;

    #[test]
    fn parses_tagged_recipes_with_defaults() {
        let recipe = FeatureRecipe::from_json(
            r#"{"type": "symmetric", "inner_chord_ratio": 0.25, "lateral_gap": 0.0}"#,
        )
        .unwrap();
        let FeatureRecipe::Symmetric(flap) = recipe else {
            panic!("expected a symmetric flap");
        };
        assert_relative_eq!(flap.inner_chord_ratio, 0.25);
        assert_relative_eq!(flap.outer_chord_ratio, 0.3);
        assert_relative_eq!(flap.nose_factor, 3.0);

        let tip = FeatureRecipe::from_json(r#"{"type": "wing_tip_closure"}"#).unwrap();
        assert_eq!(tip.name(), TipClosure::NAME);
    }

    #[test]
    fn fowler_is_unsupported() {
        let err = FeatureRecipe::from_json(r#"{"type": "fowler"}"#).unwrap_err();
        assert!(matches!(
            err,
            WingcutError::Configuration(ConfigurationError::UnsupportedFeature(_))
        ));
    }

    #[test]
    fn unknown_tag_is_a_parse_error() {
        let err = FeatureRecipe::from_json(r#"{"type": "spoiler"}"#).unwrap_err();
        assert!(matches!(err, WingcutError::Configuration(ConfigurationError::Parse(_))));
    }

    #[test_case(0.0 ; "zero ratio")]
    #[test_case(-0.2 ; "negative ratio")]
    #[test_case(0.9 ; "ratio too large")]
    fn rejects_flap_ratios(ratio: f64) {
        let flap = SymmetricFlap {
            outer_chord_ratio: ratio,
            ..SymmetricFlap::default()
        };
        assert!(flap.validate().is_err());
    }

    #[test]
    fn overhang_must_stay_aft_of_the_cove() {
        let flap = NonSymmetricFlap {
            inner_chord_ratio: 0.1,
            ..NonSymmetricFlap::default()
        };
        assert!(flap.validate().is_err());
        assert!(NonSymmetricFlap::default().validate().is_ok());
    }

    #[test]
    fn slat_offsets_follow_the_ratio() {
        let slat = SlatRecipe::default();
        let o = slat.offsets(0.17).unwrap();
        assert_relative_eq!(o.lower_cut, 0.119, epsilon = 1e-12);
        assert_relative_eq!(o.cove_apex, 0.0544, epsilon = 1e-12);
        assert_relative_eq!(o.body_upper, 0.17 - 0.0425, epsilon = 1e-12);
        assert_relative_eq!(o.body_apex, 0.0544 - 0.0136, epsilon = 1e-12);
        assert!(o.body_detail < o.body_lower);
    }

    #[test]
    fn tiny_slat_is_rejected() {
        let slat = SlatRecipe {
            inner_chord_ratio: 0.03,
            ..SlatRecipe::default()
        };
        assert!(slat.validate().is_err());
    }

    #[test]
    fn tip_fractions_are_checked() {
        let tip = TipClosure {
            chord_fractions: vec![0.2, 1.0],
            ..TipClosure::default()
        };
        assert!(tip.validate().is_err());
        assert!(TipClosure::default().validate().is_ok());
    }
}
