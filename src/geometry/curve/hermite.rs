use crate::error::{GeometryError, Result, WingcutError};
use crate::math::quadrature::gauss_legendre;
use crate::math::{Point3, Vector3, TOLERANCE};

use super::{Curve, CurveDomain};

/// Quadrature panels per knot span for arc length.
const SPAN_PANELS: u32 = 4;

/// A C1 piecewise cubic Hermite curve through a list of points.
///
/// Knots follow the cumulative chord length between consecutive points,
/// so the parameter approximates arc length. Derivatives at interior
/// points come from the three-point (Bessel) rule; the end derivatives
/// are either prescribed or taken from the same rule.
#[derive(Debug, Clone)]
pub struct HermiteSpline {
    points: Vec<Point3>,
    knots: Vec<f64>,
    derivatives: Vec<Vector3>,
    closed: bool,
}

impl HermiteSpline {
    /// Interpolates `points` with free ends.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than two points are given or two consecutive
    /// points coincide.
    pub fn interpolate(points: &[Point3]) -> Result<Self> {
        Self::with_end_tangents(points, None, None)
    }

    /// Interpolates `points`, imposing the derivative at the first and/or
    /// last point.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than two points are given or two consecutive
    /// points coincide.
    pub fn with_end_tangents(
        points: &[Point3],
        start: Option<Vector3>,
        end: Option<Vector3>,
    ) -> Result<Self> {
        let knots = chord_knots(points)?;
        let mut derivatives = bessel_derivatives(points, &knots);
        if let Some(d) = start {
            derivatives[0] = d;
        }
        if let Some(d) = end {
            let last = derivatives.len() - 1;
            derivatives[last] = d;
        }
        Ok(Self {
            points: points.to_vec(),
            knots,
            derivatives,
            closed: false,
        })
    }

    /// Interpolates a closed curve through `points`; the first point is
    /// repeated at the end. `start` fixes the derivative at the seam.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than three points are given or two consecutive
    /// points coincide.
    pub fn periodic(points: &[Point3], start: Option<Vector3>) -> Result<Self> {
        if points.len() < 3 {
            return Err(GeometryError::Degenerate(
                "periodic interpolation needs at least three points".into(),
            )
            .into());
        }
        let mut closed_points = points.to_vec();
        closed_points.push(points[0]);
        let knots = chord_knots(&closed_points)?;
        let mut derivatives = bessel_derivatives(&closed_points, &knots);

        let n = closed_points.len() - 1;
        let seam = start.unwrap_or_else(|| {
            let h0 = knots[n] - knots[n - 1];
            let h1 = knots[1] - knots[0];
            let d0 = (closed_points[n] - closed_points[n - 1]) / h0;
            let d1 = (closed_points[1] - closed_points[0]) / h1;
            (d0 * h1 + d1 * h0) / (h0 + h1)
        });
        derivatives[0] = seam;
        derivatives[n] = seam;

        Ok(Self {
            points: closed_points,
            knots,
            derivatives,
            closed: true,
        })
    }

    /// Interpolation points, including the repeated seam point when closed.
    #[must_use]
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    /// Parameter value of every interpolation point.
    #[must_use]
    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    /// Copy of the curve moved by `offset`.
    #[must_use]
    pub fn translated(&self, offset: &Vector3) -> Self {
        Self {
            points: self.points.iter().map(|p| p + offset).collect(),
            ..self.clone()
        }
    }

    fn span_of(&self, t: f64) -> usize {
        let last_span = self.knots.len() - 2;
        self.knots
            .partition_point(|&k| k <= t)
            .saturating_sub(1)
            .min(last_span)
    }

    fn span_parts(&self, t: f64) -> Result<(usize, f64, f64)> {
        let t = self.domain().check(t)?;
        let i = self.span_of(t);
        let h = self.knots[i + 1] - self.knots[i];
        Ok((i, (t - self.knots[i]) / h, h))
    }
}

impl Curve for HermiteSpline {
    fn evaluate(&self, t: f64) -> Result<Point3> {
        let (i, s, h) = self.span_parts(t)?;
        let s2 = s * s;
        let s3 = s2 * s;
        let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
        let h10 = s3 - 2.0 * s2 + s;
        let h01 = -2.0 * s3 + 3.0 * s2;
        let h11 = s3 - s2;
        let p0 = self.points[i].coords;
        let p1 = self.points[i + 1].coords;
        let v = p0 * h00
            + self.derivatives[i] * (h10 * h)
            + p1 * h01
            + self.derivatives[i + 1] * (h11 * h);
        Ok(Point3::from(v))
    }

    fn derivative(&self, t: f64) -> Result<Vector3> {
        let (i, s, h) = self.span_parts(t)?;
        let s2 = s * s;
        let d00 = 6.0 * s2 - 6.0 * s;
        let d10 = 3.0 * s2 - 4.0 * s + 1.0;
        let d01 = -6.0 * s2 + 6.0 * s;
        let d11 = 3.0 * s2 - 2.0 * s;
        let p0 = self.points[i].coords;
        let p1 = self.points[i + 1].coords;
        Ok((p0 * d00 + p1 * d01) / h
            + self.derivatives[i] * d10
            + self.derivatives[i + 1] * d11)
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::new(self.knots[0], self.knots[self.knots.len() - 1])
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn sample_count(&self) -> usize {
        (4 * (self.points.len() - 1)).max(64)
    }

    fn length_between(&self, t0: f64, t1: f64) -> Result<f64> {
        let domain = self.domain();
        let (a, b) = (domain.check(t0)?, domain.check(t1)?);
        let (lo, hi, sign) = if a <= b { (a, b, 1.0) } else { (b, a, -1.0) };

        let mut total = 0.0;
        let mut cursor = lo;
        for &k in self.knots.iter().filter(|&&k| k > lo && k < hi) {
            total += self.speed_integral(cursor, k)?;
            cursor = k;
        }
        total += self.speed_integral(cursor, hi)?;
        Ok(sign * total)
    }
}

impl HermiteSpline {
    /// Arc length over `[a, b]`, which must not straddle a knot.
    fn speed_integral(&self, a: f64, b: f64) -> Result<f64> {
        gauss_legendre(a, b, SPAN_PANELS, |t| {
            Ok::<f64, WingcutError>(self.derivative(t)?.norm())
        })
    }
}

fn chord_knots(points: &[Point3]) -> Result<Vec<f64>> {
    if points.len() < 2 {
        return Err(GeometryError::Degenerate("interpolation needs at least two points".into()).into());
    }
    let mut knots = Vec::with_capacity(points.len());
    knots.push(0.0);
    let mut acc = 0.0;
    for (i, w) in points.windows(2).enumerate() {
        let d = (w[1] - w[0]).norm();
        if d < TOLERANCE {
            return Err(GeometryError::Degenerate(format!(
                "interpolation points {i} and {} coincide",
                i + 1
            ))
            .into());
        }
        acc += d;
        knots.push(acc);
    }
    Ok(knots)
}

fn bessel_derivatives(points: &[Point3], knots: &[f64]) -> Vec<Vector3> {
    let n = points.len();
    let slopes: Vec<Vector3> = (0..n - 1)
        .map(|i| (points[i + 1] - points[i]) / (knots[i + 1] - knots[i]))
        .collect();
    if n == 2 {
        return vec![slopes[0]; 2];
    }
    let h = |i: usize| knots[i + 1] - knots[i];

    let mut out = Vec::with_capacity(n);
    let (h0, h1) = (h(0), h(1));
    out.push(slopes[0] * (1.0 + h0 / (h0 + h1)) - slopes[1] * (h0 / (h0 + h1)));
    for i in 1..n - 1 {
        let (ha, hb) = (h(i - 1), h(i));
        out.push((slopes[i - 1] * hb + slopes[i] * ha) / (ha + hb));
    }
    let (ha, hb) = (h(n - 3), h(n - 2));
    out.push(slopes[n - 2] * (1.0 + hb / (ha + hb)) - slopes[n - 3] * (hb / (ha + hb)));
    out
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
    fn passes_through_points() {
        let pts = [p(0.0, 0.0, 0.0), p(1.0, 1.0, 0.0), p(2.0, 0.0, 0.0), p(3.0, 1.0, 0.5)];
        let s = HermiteSpline::interpolate(&pts).unwrap();
        for (pt, &k) in pts.iter().zip(s.knots()) {
            assert!((s.evaluate(k).unwrap() - pt).norm() < 1e-12);
        }
    }

    #[test]
    fn collinear_points_stay_straight() {
        let pts = [p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(3.0, 0.0, 0.0)];
        let s = HermiteSpline::interpolate(&pts).unwrap();
        assert_relative_eq!(s.length().unwrap(), 3.0, epsilon = 1e-9);
        let mid = s.evaluate(2.0).unwrap();
        assert!(mid.y.abs() < 1e-12 && mid.z.abs() < 1e-12);
    }

    #[test]
    fn prescribed_end_tangents_hold() {
        let pts = [p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0)];
        let s = HermiteSpline::with_end_tangents(
            &pts,
            Some(Vector3::new(0.0, 1.0, 0.0)),
            Some(Vector3::new(0.0, -2.0, 0.0)),
        )
        .unwrap();
        let d = s.domain();
        let t0 = s.tangent(d.t_min).unwrap();
        let t1 = s.tangent(d.t_max).unwrap();
        assert!((t0 - Vector3::y()).norm() < 1e-12);
        assert!((t1 + Vector3::y()).norm() < 1e-12);
        assert_relative_eq!(s.derivative(d.t_max).unwrap().norm(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn derivative_is_continuous_at_knots() {
        let pts = [p(0.0, 0.0, 0.0), p(1.0, 2.0, 0.0), p(3.0, 1.0, 0.0), p(4.0, 3.0, 0.0)];
        let s = HermiteSpline::interpolate(&pts).unwrap();
        let k = s.knots()[1];
        let left = s.derivative(k - 1e-9).unwrap();
        let right = s.derivative(k + 1e-9).unwrap();
        assert!((left - right).norm() < 1e-6);
    }

    #[test]
    fn periodic_closes() {
        let pts = [p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0), p(-1.0, 0.0, 0.0), p(0.0, -1.0, 0.0)];
        let s = HermiteSpline::periodic(&pts, None).unwrap();
        assert!(s.is_closed());
        let d = s.domain();
        let a = s.evaluate(d.t_min).unwrap();
        let b = s.evaluate(d.t_max).unwrap();
        assert!((a - b).norm() < 1e-12);
        let ta = s.tangent(d.t_min).unwrap();
        let tb = s.tangent(d.t_max).unwrap();
        assert!((ta - tb).norm() < 1e-12);
    }

    #[test]
    fn split_lengths_add_up() {
        let pts = [p(0.0, 0.0, 0.0), p(1.0, 0.5, 0.0), p(2.0, 0.0, 0.0), p(3.0, -0.4, 0.0)];
        let s = HermiteSpline::interpolate(&pts).unwrap();
        let d = s.domain();
        let mid = 0.37 * d.t_max;
        let whole = s.length().unwrap();
        let parts = s.length_between(d.t_min, mid).unwrap() + s.length_between(mid, d.t_max).unwrap();
        assert_relative_eq!(whole, parts, epsilon = 1e-9);
    }

    #[test]
    fn rejects_duplicate_points() {
        let pts = [p(0.0, 0.0, 0.0), p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0)];
        assert!(HermiteSpline::interpolate(&pts).is_err());
        assert!(HermiteSpline::interpolate(&pts[..1]).is_err());
    }
}
