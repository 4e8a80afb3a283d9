use crate::error::{IntersectionError, Result};
use crate::geometry::curve::{Curve, CurveDomain};
use crate::math::distance_3d::segment_segment_closest;
use crate::math::{Point3, INTERSECTION_TOLERANCE, TOLERANCE};

/// Maximum Gauss-Newton iterations per seed.
const MAX_ITERATIONS: usize = 50;

/// Radius under which refined solutions are merged.
const MERGE_RADIUS: f64 = 1e-4;

/// Result of a curve-curve intersection.
#[derive(Debug, Clone, Copy)]
pub struct IntersectionResult {
    /// The intersection point (midpoint of the two curve points).
    pub point: Point3,
    /// Parameter on the first curve.
    pub t1: f64,
    /// Parameter on the second curve.
    pub t2: f64,
}

/// Finds the single intersection of two bounded curves.
///
/// Both curves are sampled into polylines; every pair of segments that
/// comes close enough seeds a Gauss-Newton refinement of
/// `|a(t1) - b(t2)|^2` within the two domains. Converged solutions whose
/// points coincide within the tolerance are merged. The query succeeds
/// only if exactly one solution remains.
pub struct CurveCurveIntersect<'a> {
    curve_a: &'a dyn Curve,
    curve_b: &'a dyn Curve,
    tolerance: f64,
}

impl<'a> CurveCurveIntersect<'a> {
    /// Creates a new `CurveCurveIntersect` query.
    #[must_use]
    pub fn new(curve_a: &'a dyn Curve, curve_b: &'a dyn Curve) -> Self {
        Self {
            curve_a,
            curve_b,
            tolerance: INTERSECTION_TOLERANCE,
        }
    }

    /// Overrides the coincidence tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Executes the query, returning the unique intersection.
    ///
    /// # Errors
    ///
    /// Returns [`IntersectionError::NoSolution`] if the curves do not meet,
    /// [`IntersectionError::Ambiguous`] if they meet more than once and
    /// [`IntersectionError::Unbounded`] for curves without a finite domain.
    pub fn execute(&self) -> Result<IntersectionResult> {
        let mut hits = self.execute_all()?;
        match hits.len() {
            1 => Ok(hits.remove(0)),
            0 => Err(IntersectionError::NoSolution {
                closest: self.closest_approach()?,
            }
            .into()),
            count => Err(IntersectionError::Ambiguous { count }.into()),
        }
    }

    /// Executes the query, returning every distinct intersection.
    ///
    /// # Errors
    ///
    /// Returns an error if a domain is unbounded or evaluation fails.
    pub fn execute_all(&self) -> Result<Vec<IntersectionResult>> {
        let dom_a = self.curve_a.domain();
        let dom_b = self.curve_b.domain();
        if !dom_a.is_bounded() || !dom_b.is_bounded() {
            return Err(IntersectionError::Unbounded.into());
        }

        let (ta, pa) = sample(self.curve_a, &dom_a)?;
        let (tb, pb) = sample(self.curve_b, &dom_b)?;

        let mut hits: Vec<IntersectionResult> = Vec::new();
        for i in 0..pa.len() - 1 {
            let la = (pa[i + 1] - pa[i]).norm();
            for j in 0..pb.len() - 1 {
                let lb = (pb[j + 1] - pb[j]).norm();
                let approach = segment_segment_closest(&pa[i], &pa[i + 1], &pb[j], &pb[j + 1]);
                if approach.distance > 0.25 * (la + lb) + self.tolerance {
                    continue;
                }
                let u = ta[i] + approach.s * (ta[i + 1] - ta[i]);
                let v = tb[j] + approach.t * (tb[j + 1] - tb[j]);
                let Some(hit) = self.refine(u, v)? else {
                    continue;
                };
                if !hits
                    .iter()
                    .any(|h| (h.point - hit.point).norm() < MERGE_RADIUS.max(self.tolerance))
                {
                    hits.push(hit);
                }
            }
        }
        Ok(hits)
    }

    /// Newton-refines a seed; returns `None` if it does not converge onto
    /// a coincident pair.
    fn refine(&self, mut u: f64, mut v: f64) -> Result<Option<IntersectionResult>> {
        let dom_a = self.curve_a.domain();
        let dom_b = self.curve_b.domain();
        let mut residual = f64::INFINITY;

        for _ in 0..MAX_ITERATIONS {
            let a = self.curve_a.evaluate(u)?;
            let b = self.curve_b.evaluate(v)?;
            let f = a - b;
            residual = f.norm();
            if residual < TOLERANCE {
                break;
            }
            let da = self.curve_a.derivative(u)?;
            let db = self.curve_b.derivative(v)?;

            let a11 = da.dot(&da);
            let a12 = -da.dot(&db);
            let a22 = db.dot(&db);
            let r1 = -da.dot(&f);
            let r2 = db.dot(&f);
            let det = a11 * a22 - a12 * a12;
            if det.abs() < TOLERANCE * TOLERANCE {
                break;
            }
            let du = (r1 * a22 - r2 * a12) / det;
            let dv = (a11 * r2 - a12 * r1) / det;

            let nu = wrap(self.curve_a.is_closed(), &dom_a, u + du);
            let nv = wrap(self.curve_b.is_closed(), &dom_b, v + dv);
            let moved = (nu - u).abs() + (nv - v).abs();
            u = nu;
            v = nv;
            if moved < TOLERANCE * TOLERANCE {
                residual = (self.curve_a.evaluate(u)? - self.curve_b.evaluate(v)?).norm();
                break;
            }
        }

        if residual > self.tolerance {
            return Ok(None);
        }
        let a = self.curve_a.evaluate(u)?;
        let b = self.curve_b.evaluate(v)?;
        Ok(Some(IntersectionResult {
            point: Point3::from((a.coords + b.coords) * 0.5),
            t1: u,
            t2: v,
        }))
    }

    fn closest_approach(&self) -> Result<f64> {
        let (_, pa) = sample(self.curve_a, &self.curve_a.domain())?;
        let (_, pb) = sample(self.curve_b, &self.curve_b.domain())?;
        let mut best = f64::INFINITY;
        for sa in pa.windows(2) {
            for sb in pb.windows(2) {
                best = best.min(segment_segment_closest(&sa[0], &sa[1], &sb[0], &sb[1]).distance);
            }
        }
        Ok(best)
    }
}

fn sample(curve: &dyn Curve, domain: &CurveDomain) -> Result<(Vec<f64>, Vec<Point3>)> {
    let n = curve.sample_count().max(2);
    let mut params = Vec::with_capacity(n + 1);
    let mut points = Vec::with_capacity(n + 1);
    for i in 0..=n {
        #[allow(clippy::cast_precision_loss)]
        let t = domain.t_min + domain.span() * (i as f64 / n as f64);
        params.push(t);
        points.push(curve.evaluate(t)?);
    }
    Ok((params, points))
}

fn wrap(closed: bool, domain: &CurveDomain, t: f64) -> f64 {
    if closed {
        domain.t_min + (t - domain.t_min).rem_euclid(domain.span())
    } else {
        domain.clamp(t)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::WingcutError;
    use crate::geometry::{Circle, HermiteSpline, Line};
    use crate::math::Vector3;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn crossing_lines() {
        let a = Line::between(p(-1.0, 0.0, 0.0), p(1.0, 0.0, 0.0)).unwrap();
        let b = Line::between(p(0.25, -1.0, 0.0), p(0.25, 1.0, 0.0)).unwrap();
        let r = CurveCurveIntersect::new(&a, &b).execute().unwrap();
        assert_relative_eq!(r.t1, 1.25, epsilon = 1e-9);
        assert_relative_eq!(r.t2, 1.0, epsilon = 1e-9);
        assert!((r.point - p(0.25, 0.0, 0.0)).norm() < 1e-9);
    }

    #[test]
    fn segment_exits_circle_once() {
        let c = Circle::new(p(0.0, 0.0, 0.0), 0.5, Vector3::z(), Vector3::x()).unwrap();
        let l = Line::between(p(0.0, 0.0, 0.0), p(2.0, 0.0, 0.0)).unwrap();
        let r = CurveCurveIntersect::new(&l, &c).execute().unwrap();
        assert_relative_eq!(r.t1, 0.5, epsilon = 1e-9);
        assert!((r.point - p(0.5, 0.0, 0.0)).norm() < 1e-9);
    }

    #[test]
    fn chord_through_circle_is_ambiguous() {
        let c = Circle::new(p(0.0, 0.0, 0.0), 0.5, Vector3::z(), Vector3::x()).unwrap();
        let l = Line::between(p(-2.0, 0.1, 0.0), p(2.0, 0.1, 0.0)).unwrap();
        let err = CurveCurveIntersect::new(&l, &c).execute().unwrap_err();
        assert!(matches!(
            err,
            WingcutError::Intersection(IntersectionError::Ambiguous { count: 2 })
        ));
    }

    #[test]
    fn disjoint_curves_report_gap() {
        let a = Line::between(p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0)).unwrap();
        let b = Line::between(p(0.0, 1.0, 0.5), p(1.0, 1.0, 0.5)).unwrap();
        let err = CurveCurveIntersect::new(&a, &b).execute().unwrap_err();
        match err {
            WingcutError::Intersection(IntersectionError::NoSolution { closest }) => {
                assert_relative_eq!(closest, 1.25_f64.sqrt(), epsilon = 1e-9);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn ray_hits_spline_once() {
        let arc = HermiteSpline::interpolate(&[
            p(0.0, 0.0, 0.0),
            p(0.5, 0.0, 0.3),
            p(1.0, 0.0, 0.4),
            p(1.5, 0.0, 0.3),
            p(2.0, 0.0, 0.0),
        ])
        .unwrap();
        let ray = Line::new(p(0.7, 0.0, 0.0), Vector3::z(), 1.0).unwrap();
        let r = CurveCurveIntersect::new(&arc, &ray).execute().unwrap();
        assert!((r.point.x - 0.7).abs() < 1e-6);
        assert!(r.point.z > 0.3 && r.point.z < 0.45);
        let on_arc = arc.evaluate(r.t1).unwrap();
        assert!((on_arc - r.point).norm() < INTERSECTION_TOLERANCE);
    }

    #[test]
    fn seam_hit_is_counted_once() {
        let c = Circle::new(p(0.0, 0.0, 0.0), 1.0, Vector3::z(), Vector3::x()).unwrap();
        let l = Line::between(p(0.0, 0.0, 0.0), p(3.0, 0.0, 0.0)).unwrap();
        let all = CurveCurveIntersect::new(&c, &l).execute_all().unwrap();
        assert_eq!(all.len(), 1);
    }
}
