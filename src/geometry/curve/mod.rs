mod circle;
mod hermite;
mod line;

pub use circle::Circle;
pub use hermite::HermiteSpline;
pub use line::Line;

use crate::error::{GeometryError, Result, WingcutError};
use crate::math::quadrature::gauss_legendre;
use crate::math::{Point3, Vector3, TOLERANCE};

/// Slack allowed when checking a parameter against a curve domain.
const DOMAIN_SLACK: f64 = 1e-9;

/// Parameter domain for a curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveDomain {
    /// Start of the parameter range.
    pub t_min: f64,
    /// End of the parameter range.
    pub t_max: f64,
}

impl CurveDomain {
    /// Creates a new curve domain.
    #[must_use]
    pub fn new(t_min: f64, t_max: f64) -> Self {
        Self { t_min, t_max }
    }

    /// Width of the domain.
    #[must_use]
    pub fn span(&self) -> f64 {
        self.t_max - self.t_min
    }

    /// Whether both ends are finite.
    #[must_use]
    pub fn is_bounded(&self) -> bool {
        self.t_min.is_finite() && self.t_max.is_finite()
    }

    /// Clamps `t` into the domain.
    #[must_use]
    pub fn clamp(&self, t: f64) -> f64 {
        t.clamp(self.t_min, self.t_max)
    }

    /// Checks `t` against the domain, allowing a small slack, and clamps it.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ParameterOutOfRange`] if `t` lies outside.
    pub fn check(&self, t: f64) -> Result<f64> {
        let slack = DOMAIN_SLACK * self.span().abs().max(1.0);
        if t.is_nan() || t < self.t_min - slack || t > self.t_max + slack {
            return Err(GeometryError::ParameterOutOfRange {
                parameter: "t",
                value: t,
                min: self.t_min,
                max: self.t_max,
            }
            .into());
        }
        Ok(self.clamp(t))
    }
}

/// Trait for parametric curves in 3D space.
pub trait Curve {
    /// Evaluates the curve at parameter `t`, returning the 3D point.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameter is out of range or evaluation fails.
    fn evaluate(&self, t: f64) -> Result<Point3>;

    /// First derivative `dP/dt` at parameter `t`.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameter is out of range.
    fn derivative(&self, t: f64) -> Result<Vector3>;

    /// Computes the unit tangent vector at parameter `t`.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameter is out of range or the tangent is degenerate.
    fn tangent(&self, t: f64) -> Result<Vector3> {
        let d = self.derivative(t)?;
        let len = d.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(d / len)
    }

    /// Returns the parameter domain of the curve.
    fn domain(&self) -> CurveDomain;

    /// Returns whether the curve is closed.
    fn is_closed(&self) -> bool;

    /// Number of uniform samples that resolve the shape of the curve.
    fn sample_count(&self) -> usize {
        64
    }

    /// Arc length between parameters `t0` and `t1` (signed by their order).
    ///
    /// # Errors
    ///
    /// Returns an error if either parameter is out of range.
    fn length_between(&self, t0: f64, t1: f64) -> Result<f64> {
        let domain = self.domain();
        let t0 = domain.check(t0)?;
        let t1 = domain.check(t1)?;
        let panels = u32::try_from(self.sample_count() / 2).unwrap_or(u32::MAX);
        gauss_legendre(t0, t1, panels, |t| Ok::<f64, WingcutError>(self.derivative(t)?.norm()))
    }

    /// Arc length over the whole domain.
    ///
    /// # Errors
    ///
    /// Returns an error if the domain is unbounded.
    fn length(&self) -> Result<f64> {
        let domain = self.domain();
        if !domain.is_bounded() {
            return Err(GeometryError::Degenerate("curve has an unbounded domain".into()).into());
        }
        self.length_between(domain.t_min, domain.t_max)
    }
}
