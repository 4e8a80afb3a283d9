use crate::error::Result;
use crate::geometry::curve::Curve;
use crate::math::distance_3d::point_segment_closest;
use crate::math::Point3;
use crate::topology::{EdgeId, TopologyStore};

/// Ternary-search iterations after the sampling pass.
const BRACKET_ITERATIONS: usize = 20;

/// Bisection steps on the foot condition.
const POLISH_ITERATIONS: usize = 40;

/// Result of a closest point query.
#[derive(Debug, Clone, Copy)]
pub struct ClosestPointResult {
    /// The closest point on the curve.
    pub point: Point3,
    /// The parameter value at the closest point.
    pub parameter: f64,
    /// The distance from the query point to the closest point.
    pub distance: f64,
}

/// Finds the closest point on an edge to a given point.
pub struct ClosestPointOnCurve {
    edge: EdgeId,
    point: Point3,
}

impl ClosestPointOnCurve {
    /// Creates a new `ClosestPointOnCurve` query.
    #[must_use]
    pub fn new(edge: EdgeId, point: Point3) -> Self {
        Self { edge, point }
    }

    /// Executes the query over the edge's parameter range.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge is not found.
    pub fn execute(&self, store: &TopologyStore) -> Result<ClosestPointResult> {
        let edge = store.edge(self.edge)?;
        let (lo, hi) = edge.bounds();
        closest_point_on_curve(&edge.curve, lo, hi, &self.point)
    }
}

/// Closest point on `curve` restricted to `[t_lo, t_hi]`.
///
/// Seeds from the closest segment of a sampled polyline, narrows the
/// bracket around it with a ternary search on the squared distance, then
/// bisects the foot condition `(c(t) - p) . c'(t) = 0` when it changes
/// sign inside the bracket.
///
/// # Errors
///
/// Returns an error if the range lies outside the curve domain.
pub fn closest_point_on_curve(
    curve: &dyn Curve,
    t_lo: f64,
    t_hi: f64,
    point: &Point3,
) -> Result<ClosestPointResult> {
    let n_samples = u32::try_from(curve.sample_count().max(16)).unwrap_or(u32::MAX);
    let dt = (t_hi - t_lo) / f64::from(n_samples);
    let mut best_t = t_lo;
    let mut best_dist = f64::INFINITY;

    let mut prev = curve.evaluate(t_lo)?;
    for i in 1..=n_samples {
        let t0 = t_lo + dt * f64::from(i - 1);
        let next = curve.evaluate(t_lo + dt * f64::from(i))?;
        let (frac, d) = point_segment_closest(point, &prev, &next);
        if d < best_dist {
            best_dist = d;
            best_t = t0 + frac * dt;
        }
        prev = next;
    }

    let sq = |t: f64| -> Result<f64> { Ok((point - curve.evaluate(t)?).norm_squared()) };
    let foot = |t: f64| -> Result<f64> { Ok((curve.evaluate(t)? - point).dot(&curve.derivative(t)?)) };

    let bracket = ((best_t - dt).max(t_lo), (best_t + dt).min(t_hi));
    let (mut lo, mut hi) = narrow(&sq, bracket.0, bracket.1, BRACKET_ITERATIONS)?;
    if foot(lo)? < 0.0 && foot(hi)? > 0.0 {
        for _ in 0..POLISH_ITERATIONS {
            #[allow(clippy::manual_midpoint)]
            let mid = (lo + hi) / 2.0;
            if foot(mid)? < 0.0 {
                lo = mid;
            } else {
                hi = mid;
            }
        }
    } else {
        // Minimum at a range end.
        (lo, hi) = narrow(&sq, lo, hi, POLISH_ITERATIONS)?;
    }

    #[allow(clippy::manual_midpoint)]
    let best_t = (lo + hi) / 2.0;
    let closest = curve.evaluate(best_t)?;
    Ok(ClosestPointResult {
        point: closest,
        parameter: best_t,
        distance: (point - closest).norm(),
    })
}

/// Ternary search for the minimum of `f` over `[lo, hi]`.
fn narrow(f: &dyn Fn(f64) -> Result<f64>, mut lo: f64, mut hi: f64, iterations: usize) -> Result<(f64, f64)> {
    for _ in 0..iterations {
        let mid1 = lo + (hi - lo) / 3.0;
        let mid2 = hi - (hi - lo) / 3.0;
        if f(mid1)? < f(mid2)? {
            hi = mid2;
        } else {
            lo = mid1;
        }
    }
    Ok((lo, hi))
}
