use crate::error::{GeometryError, Result};
use crate::geometry::curve::Curve;
use crate::math::{Point3, INTERSECTION_TOLERANCE};
use crate::operations::query::closest_point_on_curve;
use crate::topology::{EdgeData, EdgeId, TopologyStore, VertexData};

/// Where along the edge the split happens.
#[derive(Debug, Clone, Copy)]
enum SplitAt {
    Point(Point3),
    Parameter(f64),
}

/// Splits an edge in two at a point on its curve.
///
/// The original edge is left untouched; the two halves are new edges
/// sharing one new vertex at the split point. They are returned in the
/// edge's direction: `(start..split, split..end)`.
pub struct SplitEdge {
    edge: EdgeId,
    at: SplitAt,
    tolerance: f64,
}

impl SplitEdge {
    /// Splits `edge` at the curve point nearest to `point`.
    #[must_use]
    pub fn new(edge: EdgeId, point: Point3) -> Self {
        Self {
            edge,
            at: SplitAt::Point(point),
            tolerance: INTERSECTION_TOLERANCE,
        }
    }

    /// Splits `edge` at a known curve parameter.
    #[must_use]
    pub fn at_parameter(edge: EdgeId, t: f64) -> Self {
        Self {
            edge,
            at: SplitAt::Parameter(t),
            tolerance: INTERSECTION_TOLERANCE,
        }
    }

    /// Overrides the on-curve and minimum-piece tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Executes the split.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`] if the point is not on the edge
    /// or either piece would have (near) zero length.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<(EdgeId, EdgeId)> {
        let edge = store.edge(self.edge)?.clone();
        let (lo, hi) = edge.bounds();

        let t = match self.at {
            SplitAt::Parameter(t) => {
                if t < lo - self.tolerance || t > hi + self.tolerance {
                    return Err(GeometryError::Degenerate(format!(
                        "split parameter {t} outside edge range [{lo}, {hi}]"
                    ))
                    .into());
                }
                t.clamp(lo, hi)
            }
            SplitAt::Point(point) => {
                let hit = closest_point_on_curve(&edge.curve, lo, hi, &point)?;
                if hit.distance > self.tolerance {
                    return Err(GeometryError::Degenerate(format!(
                        "split point is {:.3e} away from the edge",
                        hit.distance
                    ))
                    .into());
                }
                hit.parameter
            }
        };

        let head_len = edge.curve.length_between(edge.t_start, t)?.abs();
        let tail_len = edge.curve.length_between(t, edge.t_end)?.abs();
        if head_len < self.tolerance || tail_len < self.tolerance {
            return Err(GeometryError::Degenerate(
                "split point coincides with an edge end".into(),
            )
            .into());
        }

        let middle = store.add_vertex(VertexData::new(edge.curve.evaluate(t)?));
        let head = store.add_edge(EdgeData {
            start: edge.start,
            end: middle,
            curve: edge.curve.clone(),
            t_start: edge.t_start,
            t_end: t,
        });
        let tail = store.add_edge(EdgeData {
            start: middle,
            end: edge.end,
            curve: edge.curve,
            t_start: t,
            t_end: edge.t_end,
        });
        Ok((head, tail))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::HermiteSpline;
    use crate::operations::creation::MakeEdge;
    use crate::operations::query::Length;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn wavy(store: &mut TopologyStore) -> EdgeId {
        let pts: Vec<Point3> = (0..=20)
            .map(|i| {
                let x = f64::from(i) * 0.1;
                p(x, 0.0, (x * 3.0).sin() * 0.2)
            })
            .collect();
        MakeEdge::whole(HermiteSpline::interpolate(&pts).unwrap())
            .execute(store)
            .unwrap()
    }

    #[test]
    fn halves_sum_to_original() {
        let mut store = TopologyStore::new();
        let e = wavy(&mut store);
        let total = Length::new(e).execute(&store).unwrap();
        let at = store.edge(e).unwrap().curve.evaluate(0.77).unwrap();

        let (head, tail) = SplitEdge::new(e, at).execute(&mut store).unwrap();
        let a = Length::new(head).execute(&store).unwrap();
        let b = Length::new(tail).execute(&store).unwrap();
        assert_relative_eq!(a + b, total, epsilon = 1e-6);

        let (_, head_end) = store.edge_endpoints(head).unwrap();
        let (tail_start, _) = store.edge_endpoints(tail).unwrap();
        assert!((head_end - at).norm() < 1e-6);
        assert_eq!(store.edge(head).unwrap().end, store.edge(tail).unwrap().start);
        assert!((head_end - tail_start).norm() < 1e-12);
    }

    #[test]
    fn split_by_parameter_is_exact() {
        let mut store = TopologyStore::new();
        let e = wavy(&mut store);
        let (head, tail) = SplitEdge::at_parameter(e, 0.5).execute(&mut store).unwrap();
        assert_relative_eq!(store.edge(head).unwrap().t_end, 0.5);
        assert_relative_eq!(store.edge(tail).unwrap().t_start, 0.5);
    }

    #[test]
    fn off_curve_point_is_degenerate() {
        let mut store = TopologyStore::new();
        let e = wavy(&mut store);
        let r = SplitEdge::new(e, p(1.0, 0.5, 0.0)).execute(&mut store);
        assert!(matches!(
            r,
            Err(crate::WingcutError::Geometry(GeometryError::Degenerate(_)))
        ));
    }

    #[test]
    fn split_at_end_is_degenerate() {
        let mut store = TopologyStore::new();
        let e = wavy(&mut store);
        let (_, end) = store.edge_endpoints(e).unwrap();
        assert!(SplitEdge::new(e, end).execute(&mut store).is_err());
    }
}
