use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, Result};
use crate::math::{CONNECTION_TOLERANCE, INTERSECTION_TOLERANCE};

/// Largest accepted intersection or connection tolerance, in meters.
const MAX_TOLERANCE: f64 = 1e-2;

/// Numeric settings shared by every feature run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Coincidence tolerance of curve intersections.
    pub intersection_tolerance: f64,
    /// Endpoint matching tolerance when assembling loops.
    pub connection_tolerance: f64,
    /// Span length above which clean sections get a support station, in meters.
    pub clean_support_threshold: f64,
    /// Magnitude of the end tangents of transition curves.
    pub tangent_weight: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            intersection_tolerance: INTERSECTION_TOLERANCE,
            connection_tolerance: CONNECTION_TOLERANCE,
            clean_support_threshold: 1.0,
            tangent_weight: 1.0,
        }
    }
}

impl PipelineConfig {
    /// Parses a configuration from a JSON object; missing fields take their
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Parse`] for malformed JSON or unknown
    /// fields and [`ConfigurationError::InvalidRecipe`] for anything other
    /// than an object or for values rejected by [`Self::validate`].
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json).map_err(ConfigurationError::from)?;
        if !value.is_object() {
            return Err(ConfigurationError::InvalidRecipe("pipeline config must be a JSON object".into()).into());
        }
        let config: Self = serde_json::from_value(value).map_err(ConfigurationError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every value is finite and positive, and that both
    /// tolerances stay below a centimeter.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidRecipe`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("intersection_tolerance", self.intersection_tolerance),
            ("connection_tolerance", self.connection_tolerance),
            ("clean_support_threshold", self.clean_support_threshold),
            ("tangent_weight", self.tangent_weight),
        ];
        for (name, value) in fields {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigurationError::InvalidRecipe(format!(
                    "pipeline config: {name} = {value} must be positive"
                ))
                .into());
            }
        }
        for (name, value) in &fields[..2] {
            if *value > MAX_TOLERANCE {
                return Err(ConfigurationError::InvalidRecipe(format!(
                    "pipeline config: {name} = {value} exceeds {MAX_TOLERANCE}"
                ))
                .into());
            }
        }
        Ok(())
    }
}
