use crate::error::{OperationError, Result, TopologyError};
use crate::math::{Point3, CONNECTION_TOLERANCE};
use crate::topology::{EdgeId, OrientedEdge, TopologyStore, WireData, WireId};

/// Assembles edges given in adjacency order into a closed wire.
///
/// Each edge is oriented so that it starts where the previous one ends.
/// The list is never reordered: a pair of consecutive edges (including
/// last to first) that do not share an endpoint within the tolerance is
/// an error.
pub struct AssembleLoop {
    edges: Vec<EdgeId>,
    tolerance: f64,
}

impl AssembleLoop {
    /// Creates a new `AssembleLoop` operation.
    #[must_use]
    pub fn new(edges: Vec<EdgeId>) -> Self {
        Self {
            edges,
            tolerance: CONNECTION_TOLERANCE,
        }
    }

    /// Overrides the endpoint matching tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Executes the operation, adding the closed wire to the store.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::InvalidTopology`] if two consecutive edges are
    /// not adjacent and [`TopologyError::WireNotClosed`] if the last edge does
    /// not return to the first.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<WireId> {
        let Some(&first) = self.edges.first() else {
            return Err(OperationError::InvalidInput("cannot assemble an empty loop".into()).into());
        };
        let ends = self
            .edges
            .iter()
            .map(|&e| store.edge_endpoints(e))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let first_forward = match ends.get(1) {
            None => true,
            Some(next) => {
                let (s0, e0) = ends[0];
                let via_end = nearest(&e0, next);
                let via_start = nearest(&s0, next);
                if via_end <= self.tolerance && via_end <= via_start {
                    true
                } else if via_start <= self.tolerance {
                    false
                } else {
                    return Err(TopologyError::InvalidTopology(
                        "edges 0 and 1 share no endpoint".into(),
                    )
                    .into());
                }
            }
        };

        let (s0, e0) = ends[0];
        let (head, mut cursor) = if first_forward { (s0, e0) } else { (e0, s0) };
        let mut oriented = vec![OrientedEdge::new(first, first_forward)];

        for (i, (&edge, &(s, e))) in self.edges.iter().zip(&ends).enumerate().skip(1) {
            let ds = (s - cursor).norm();
            let de = (e - cursor).norm();
            let forward = if ds <= self.tolerance && ds <= de {
                true
            } else if de <= self.tolerance {
                false
            } else {
                return Err(TopologyError::InvalidTopology(format!(
                    "edge {i} does not touch the end of edge {} (gap {:.3e})",
                    i - 1,
                    ds.min(de)
                ))
                .into());
            };
            cursor = if forward { e } else { s };
            oriented.push(OrientedEdge::new(edge, forward));
        }

        if (cursor - head).norm() > self.tolerance {
            return Err(TopologyError::WireNotClosed.into());
        }

        Ok(store.add_wire(WireData {
            edges: oriented,
            is_closed: true,
        }))
    }
}

fn nearest(point: &Point3, ends: &(Point3, Point3)) -> f64 {
    (point - ends.0).norm().min((point - ends.1).norm())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::Line;
    use crate::operations::creation::MakeEdge;
    use crate::operations::query::Perimeter;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn segment(store: &mut TopologyStore, a: Point3, b: Point3) -> EdgeId {
        MakeEdge::whole(Line::between(a, b).unwrap()).execute(store).unwrap()
    }

    fn square(store: &mut TopologyStore) -> Vec<EdgeId> {
        vec![
            segment(store, p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0)),
            // stored backwards on purpose
            segment(store, p(1.0, 1.0, 0.0), p(1.0, 0.0, 0.0)),
            segment(store, p(1.0, 1.0, 0.0), p(0.0, 1.0, 0.0)),
            segment(store, p(0.0, 1.0, 0.0), p(0.0, 0.0, 0.0)),
        ]
    }

    #[test]
    fn orients_edges() {
        let mut store = TopologyStore::new();
        let edges = square(&mut store);
        let w = AssembleLoop::new(edges).execute(&mut store).unwrap();
        let wire = store.wire(w).unwrap();
        assert!(wire.is_closed);
        let dirs: Vec<bool> = wire.edges.iter().map(|o| o.forward).collect();
        assert_eq!(dirs, vec![true, false, true, true]);
    }

    #[test]
    fn rotation_keeps_perimeter() {
        let mut store = TopologyStore::new();
        let mut edges = square(&mut store);
        let w0 = AssembleLoop::new(edges.clone()).execute(&mut store).unwrap();
        edges.rotate_left(2);
        let w1 = AssembleLoop::new(edges).execute(&mut store).unwrap();
        let a = Perimeter::new(w0).execute(&store).unwrap();
        let b = Perimeter::new(w1).execute(&store).unwrap();
        assert!((a - 4.0).abs() < 1e-12);
        assert!((a - b).abs() < 1e-12);
    }

    #[test]
    fn misordered_edges_fail() {
        let mut store = TopologyStore::new();
        let mut edges = square(&mut store);
        edges.swap(1, 2);
        edges.swap(2, 3);
        let r = AssembleLoop::new(edges).execute(&mut store);
        assert!(matches!(
            r,
            Err(crate::WingcutError::Topology(TopologyError::InvalidTopology(_)))
        ));
    }

    #[test]
    fn open_chain_fails() {
        let mut store = TopologyStore::new();
        let edges = square(&mut store);
        let r = AssembleLoop::new(edges[..3].to_vec()).execute(&mut store);
        assert!(matches!(
            r,
            Err(crate::WingcutError::Topology(TopologyError::WireNotClosed))
        ));
    }

    #[test]
    fn empty_input_fails() {
        let mut store = TopologyStore::new();
        assert!(AssembleLoop::new(Vec::new()).execute(&mut store).is_err());
    }
}
