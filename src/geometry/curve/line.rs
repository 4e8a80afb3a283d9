use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};

use super::{Curve, CurveDomain};

/// A bounded straight segment parameterized by arc length.
///
/// The parametric form is `P(t) = origin + t * direction` for
/// `t` in `[0, extent]`, with `direction` of unit length.
#[derive(Debug, Clone)]
pub struct Line {
    origin: Point3,
    direction: Vector3,
    extent: f64,
}

impl Line {
    /// Creates a segment starting at `origin`, running `extent` along `direction`.
    ///
    /// # Errors
    ///
    /// Returns an error if the direction vector is zero-length or the extent
    /// is not positive.
    pub fn new(origin: Point3, direction: Vector3, extent: f64) -> Result<Self> {
        let len = direction.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        if extent.is_nan() || extent < TOLERANCE {
            return Err(GeometryError::Degenerate("line extent must be positive".into()).into());
        }
        Ok(Self {
            origin,
            direction: direction / len,
            extent,
        })
    }

    /// Creates the segment from `start` to `end`.
    ///
    /// # Errors
    ///
    /// Returns an error if the two points coincide.
    pub fn between(start: Point3, end: Point3) -> Result<Self> {
        let d = end - start;
        Self::new(start, d, d.norm())
    }

    /// Returns the origin point of the line.
    #[must_use]
    pub fn origin(&self) -> &Point3 {
        &self.origin
    }

    /// Returns the unit direction vector of the line.
    #[must_use]
    pub fn direction(&self) -> &Vector3 {
        &self.direction
    }

    /// Returns the end point `P(extent)`.
    #[must_use]
    pub fn end(&self) -> Point3 {
        self.origin + self.direction * self.extent
    }

    /// Copy of the segment moved by `offset`.
    #[must_use]
    pub fn translated(&self, offset: &Vector3) -> Self {
        Self {
            origin: self.origin + offset,
            ..self.clone()
        }
    }
}

impl Curve for Line {
    fn evaluate(&self, t: f64) -> Result<Point3> {
        let t = self.domain().check(t)?;
        Ok(self.origin + self.direction * t)
    }

    fn derivative(&self, _t: f64) -> Result<Vector3> {
        Ok(self.direction)
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::new(0.0, self.extent)
    }

    fn is_closed(&self) -> bool {
        false
    }

    fn sample_count(&self) -> usize {
        2
    }

    fn length_between(&self, t0: f64, t1: f64) -> Result<f64> {
        let domain = self.domain();
        Ok(domain.check(t1)? - domain.check(t0)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn between_endpoints() {
        let l = Line::between(p(1.0, 0.0, 0.0), p(1.0, 3.0, 4.0)).unwrap();
        assert_relative_eq!(l.domain().t_max, 5.0);
        let e = l.evaluate(5.0).unwrap();
        assert!((e - p(1.0, 3.0, 4.0)).norm() < 1e-12);
        assert!((l.end() - e).norm() < 1e-12);
    }

    #[test]
    fn length_is_extent() {
        let l = Line::new(p(0.0, 0.0, 0.0), Vector3::new(0.0, 2.0, 0.0), 3.0).unwrap();
        assert_relative_eq!(l.length().unwrap(), 3.0);
        assert_relative_eq!(l.tangent(1.0).unwrap().y, 1.0);
    }

    #[test]
    fn rejects_out_of_range() {
        let l = Line::between(p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0)).unwrap();
        assert!(l.evaluate(1.5).is_err());
        assert!(l.evaluate(-0.1).is_err());
    }

    #[test]
    fn coincident_points_fail() {
        assert!(Line::between(p(1.0, 1.0, 1.0), p(1.0, 1.0, 1.0)).is_err());
    }

    #[test]
    fn translated_keeps_direction() {
        let l = Line::between(p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0)).unwrap();
        let m = l.translated(&Vector3::new(0.0, 0.5, 0.0));
        assert!((m.evaluate(1.0).unwrap() - p(1.0, 0.5, 0.0)).norm() < 1e-12);
    }
}
