use crate::error::{GeometryError, Result};
use crate::math::TOLERANCE;
use crate::operations::creation::MakeEdge;
use crate::topology::{EdgeId, TopologyStore};

/// Extracts the sub-range `[t0, t1]` of an edge as a new edge.
pub struct Trim {
    edge: EdgeId,
    t0: f64,
    t1: f64,
}

impl Trim {
    /// Creates a new `Trim` operation. `t0 > t1` reverses the direction.
    #[must_use]
    pub fn new(edge: EdgeId, t0: f64, t1: f64) -> Self {
        Self { edge, t0, t1 }
    }

    /// Executes the trim.
    ///
    /// # Errors
    ///
    /// Returns an error if the range is not inside the edge or is empty.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<EdgeId> {
        let edge = store.edge(self.edge)?;
        let (lo, hi) = edge.bounds();
        let slack = TOLERANCE.max(1e-9 * (hi - lo));
        for t in [self.t0, self.t1] {
            if t < lo - slack || t > hi + slack {
                return Err(GeometryError::ParameterOutOfRange {
                    parameter: "trim",
                    value: t,
                    min: lo,
                    max: hi,
                }
                .into());
            }
        }
        let curve = edge.curve.clone();
        MakeEdge::new(curve, self.t0.clamp(lo, hi), self.t1.clamp(lo, hi)).execute(store)
    }
}
