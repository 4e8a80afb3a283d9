use crate::error::{GeometryError, Result};
use crate::math::{unit, Point3, Vector3, TOLERANCE};

use super::{Curve, CurveDomain};

/// A full circle, parameterized by angle over `[0, 2*pi]`.
///
/// Sections use it as the locus of points at a fixed distance from a
/// chord reference, lying in the section plane. Angle zero is along
/// `ref_dir`; angles grow toward `normal x ref_dir`.
#[derive(Debug, Clone)]
pub struct Circle {
    center: Point3,
    radius: f64,
    ref_dir: Vector3,
    binormal: Vector3,
}

impl Circle {
    /// Creates a circle of `radius` around `center` in the plane normal to
    /// `normal`.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is not positive, a direction is
    /// zero-length, or `ref_dir` does not lie in the circle plane.
    pub fn new(center: Point3, radius: f64, normal: Vector3, ref_dir: Vector3) -> Result<Self> {
        if !(radius.is_finite() && radius > TOLERANCE) {
            return Err(GeometryError::Degenerate(format!("circle radius {radius} must be positive")).into());
        }
        let normal = unit(&normal).ok_or(GeometryError::ZeroVector)?;
        let ref_dir = unit(&ref_dir).ok_or(GeometryError::ZeroVector)?;
        if normal.dot(&ref_dir).abs() > 1e-9 {
            return Err(GeometryError::Degenerate("circle reference direction leaves its plane".into()).into());
        }
        Ok(Self {
            center,
            radius,
            ref_dir,
            binormal: normal.cross(&ref_dir),
        })
    }

    #[must_use]
    pub fn center(&self) -> &Point3 {
        &self.center
    }

    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Copy of the circle moved by `offset`.
    #[must_use]
    pub fn translated(&self, offset: &Vector3) -> Self {
        Self {
            center: self.center + offset,
            ..self.clone()
        }
    }
}

impl Curve for Circle {
    fn evaluate(&self, t: f64) -> Result<Point3> {
        let (sin, cos) = t.sin_cos();
        Ok(self.center + (self.ref_dir * cos + self.binormal * sin) * self.radius)
    }

    fn derivative(&self, t: f64) -> Result<Vector3> {
        let (sin, cos) = t.sin_cos();
        Ok((self.binormal * cos - self.ref_dir * sin) * self.radius)
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::new(0.0, std::f64::consts::TAU)
    }

    fn is_closed(&self) -> bool {
        true
    }

    fn length_between(&self, t0: f64, t1: f64) -> Result<f64> {
        Ok(self.radius * (t1 - t0))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, TAU};

    fn section_circle(radius: f64) -> Circle {
        // Wing section plane: normal along the span.
        Circle::new(Point3::new(1.0, 2.0, 0.0), radius, Vector3::y(), Vector3::z()).unwrap()
    }

    #[test]
    fn stays_in_the_section_plane() {
        let c = section_circle(0.3);
        for i in 0..8 {
            let p = c.evaluate(f64::from(i) * TAU / 8.0).unwrap();
            assert_relative_eq!(p.y, 2.0, epsilon = 1e-12);
            assert_relative_eq!((p - c.center()).norm(), 0.3, epsilon = 1e-12);
        }
    }

    #[test]
    fn quarter_turn_and_tangent() {
        let c = section_circle(1.0);
        // y x z = x
        assert_relative_eq!(c.evaluate(FRAC_PI_2).unwrap(), Point3::new(2.0, 2.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(c.tangent(0.0).unwrap(), Vector3::x(), epsilon = 1e-12);
    }

    #[test]
    fn length_is_circumference() {
        let c = section_circle(2.0);
        assert!(c.is_closed());
        assert_relative_eq!(c.length().unwrap(), 2.0 * TAU, epsilon = 1e-12);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(Circle::new(Point3::origin(), 0.0, Vector3::z(), Vector3::x()).is_err());
        assert!(Circle::new(Point3::origin(), f64::NAN, Vector3::z(), Vector3::x()).is_err());
        assert!(Circle::new(Point3::origin(), 1.0, Vector3::z(), Vector3::new(1.0, 0.0, 1.0)).is_err());
    }
}
