use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, Result};
use crate::math::interpolate::{linear, panel_index};
use crate::math::{Point3, Vector3};

use super::AirfoilSection;

/// Which lifting surface is described; selects the span axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceKind {
    Wing,
    HorizontalTail,
    VerticalTail,
}

/// Planform data at one spanwise breakpoint.
///
/// Angles are in radians. `dihedral` applies to the panel outboard of
/// the breakpoint and is ignored on the last one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpanBreakpoint {
    /// Spanwise distance from the root, in meters.
    pub y: f64,
    pub chord: f64,
    /// Leading edge chordwise offset from the apex.
    pub x_le: f64,
    #[serde(default)]
    pub twist: f64,
    #[serde(default)]
    pub dihedral: f64,
    pub airfoil: AirfoilSection,
}

/// Parametric description of a wing or tail surface.
///
/// Fields are private so that a surface stays valid once built or parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiftingSurface {
    kind: SurfaceKind,
    /// Root leading edge position in aircraft axes.
    #[serde(default)]
    apex: [f64; 3],
    /// Incidence added to every section's twist, in radians.
    #[serde(default)]
    rigging_angle: f64,
    breakpoints: Vec<SpanBreakpoint>,
}

impl LiftingSurface {
    /// Builds a surface from breakpoints and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidSurface`] if the breakpoints are
    /// inconsistent.
    pub fn new(kind: SurfaceKind, breakpoints: Vec<SpanBreakpoint>) -> Result<Self> {
        let surface = Self {
            kind,
            apex: [0.0; 3],
            rigging_angle: 0.0,
            breakpoints,
        };
        surface.validate()?;
        Ok(surface)
    }

    /// Straight untapered surface with one airfoil, rooted at the origin.
    ///
    /// # Errors
    ///
    /// Returns an error if the chord or span is not positive.
    pub fn rectangular(kind: SurfaceKind, chord: f64, semi_span: f64, airfoil: AirfoilSection) -> Result<Self> {
        Self::trapezoidal(kind, chord, chord, semi_span, 0.0, 0.0, airfoil)
    }

    /// Single-panel tapered surface with leading edge sweep and dihedral.
    ///
    /// # Errors
    ///
    /// Returns an error if a chord or the span is not positive.
    pub fn trapezoidal(
        kind: SurfaceKind,
        root_chord: f64,
        tip_chord: f64,
        semi_span: f64,
        sweep_le: f64,
        dihedral: f64,
        airfoil: AirfoilSection,
    ) -> Result<Self> {
        let root = SpanBreakpoint {
            y: 0.0,
            chord: root_chord,
            x_le: 0.0,
            twist: 0.0,
            dihedral,
            airfoil: airfoil.clone(),
        };
        let tip = SpanBreakpoint {
            y: semi_span,
            chord: tip_chord,
            x_le: semi_span * sweep_le.tan(),
            twist: 0.0,
            dihedral,
            airfoil,
        };
        Self::new(kind, vec![root, tip])
    }

    /// Parses a surface from JSON and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Parse`] for malformed JSON and
    /// [`ConfigurationError::InvalidSurface`] for inconsistent data.
    pub fn from_json(json: &str) -> Result<Self> {
        let surface: Self = serde_json::from_str(json).map_err(ConfigurationError::from)?;
        surface.validate()?;
        Ok(surface)
    }

    /// Sets the apex position.
    #[must_use]
    pub fn with_apex(mut self, apex: Point3) -> Self {
        self.apex = [apex.x, apex.y, apex.z];
        self
    }

    /// Sets the rigging angle.
    #[must_use]
    pub fn with_rigging_angle(mut self, angle: f64) -> Self {
        self.rigging_angle = angle;
        self
    }

    /// Checks breakpoint ordering, chords and airfoils.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidSurface`] describing the first problem.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| -> Result<()> { Err(ConfigurationError::InvalidSurface(msg).into()) };
        if self.breakpoints.len() < 2 {
            return invalid("at least two span breakpoints are required".into());
        }
        if self.breakpoints[0].y.abs() > 1e-12 {
            return invalid("the first breakpoint must sit at the root (y = 0)".into());
        }
        for (i, w) in self.breakpoints.windows(2).enumerate() {
            if w[1].y <= w[0].y {
                return invalid(format!("breakpoint {} is not outboard of breakpoint {i}", i + 1));
            }
        }
        for (i, bp) in self.breakpoints.iter().enumerate() {
            if !(bp.chord.is_finite() && bp.chord > 0.0) {
                return invalid(format!("breakpoint {i} has a non-positive chord"));
            }
            bp.airfoil.validate()?;
        }
        Ok(())
    }

    #[must_use]
    pub fn kind(&self) -> SurfaceKind {
        self.kind
    }

    /// Incidence added to every section's twist, in radians.
    #[must_use]
    pub fn rigging_angle(&self) -> f64 {
        self.rigging_angle
    }

    #[must_use]
    pub fn breakpoints(&self) -> &[SpanBreakpoint] {
        &self.breakpoints
    }

    /// Distance from root to tip along the span axis.
    #[must_use]
    pub fn semi_span(&self) -> f64 {
        self.breakpoints.last().map_or(0.0, |bp| bp.y)
    }

    /// Unit span axis: `+Y` for wings and horizontal tails, `+Z` for fins.
    #[must_use]
    pub fn span_axis(&self) -> Vector3 {
        match self.kind {
            SurfaceKind::VerticalTail => Vector3::z(),
            SurfaceKind::Wing | SurfaceKind::HorizontalTail => Vector3::y(),
        }
    }

    /// Root leading edge position.
    #[must_use]
    pub fn apex(&self) -> Point3 {
        Point3::new(self.apex[0], self.apex[1], self.apex[2])
    }

    fn stations(&self) -> Vec<f64> {
        self.breakpoints.iter().map(|bp| bp.y).collect()
    }

    fn interpolate(&self, y: f64, value: impl Fn(&SpanBreakpoint) -> f64) -> Result<f64> {
        let values: Vec<f64> = self.breakpoints.iter().map(value).collect();
        linear(&self.stations(), &values, y)
            .ok_or_else(|| ConfigurationError::InvalidSurface("surface has no span breakpoints".into()).into())
    }

    /// Local chord at span position `y`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidSurface`] if there are no breakpoints.
    pub fn chord_at(&self, y: f64) -> Result<f64> {
        self.interpolate(y, |bp| bp.chord)
    }

    /// Leading edge chordwise offset at `y`.
    ///
    /// # Errors
    ///
    /// See [`LiftingSurface::chord_at`].
    pub fn x_le_at(&self, y: f64) -> Result<f64> {
        self.interpolate(y, |bp| bp.x_le)
    }

    /// Geometric twist at `y`, excluding the rigging angle.
    ///
    /// # Errors
    ///
    /// See [`LiftingSurface::chord_at`].
    pub fn twist_at(&self, y: f64) -> Result<f64> {
        self.interpolate(y, |bp| bp.twist)
    }

    /// Leading edge height from dihedral, accumulated panel by panel.
    #[must_use]
    pub fn z_le_at(&self, y: f64) -> f64 {
        let mut z = 0.0;
        for w in self.breakpoints.windows(2) {
            if y <= w[0].y {
                break;
            }
            let dy = y.min(w[1].y) - w[0].y;
            z += dy * w[0].dihedral.tan();
        }
        z
    }

    /// Airfoil of the panel containing `y`; the tip section at the tip.
    ///
    /// # Errors
    ///
    /// See [`LiftingSurface::chord_at`].
    pub fn airfoil_at(&self, y: f64) -> Result<&AirfoilSection> {
        let Some(tip) = self.breakpoints.last() else {
            return Err(ConfigurationError::InvalidSurface("surface has no span breakpoints".into()).into());
        };
        if y >= tip.y - 1e-9 {
            return Ok(&tip.airfoil);
        }
        Ok(&self.breakpoints[panel_index(&self.stations(), y)].airfoil)
    }
}
