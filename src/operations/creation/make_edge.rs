use crate::error::{GeometryError, Result};
use crate::geometry::curve::Curve;
use crate::math::TOLERANCE;
use crate::topology::{EdgeCurve, EdgeData, EdgeId, TopologyStore, VertexData};

/// Creates an edge over a parameter range of a curve, with fresh end vertices.
pub struct MakeEdge {
    curve: EdgeCurve,
    t_start: f64,
    t_end: f64,
}

impl MakeEdge {
    /// Creates a new `MakeEdge` operation over `[t_start, t_end]`.
    ///
    /// `t_start > t_end` builds an edge running against the curve direction.
    #[must_use]
    pub fn new(curve: impl Into<EdgeCurve>, t_start: f64, t_end: f64) -> Self {
        Self {
            curve: curve.into(),
            t_start,
            t_end,
        }
    }

    /// Creates an edge spanning the whole domain of `curve`.
    #[must_use]
    pub fn whole(curve: impl Into<EdgeCurve>) -> Self {
        let curve = curve.into();
        let domain = curve.domain();
        Self {
            curve,
            t_start: domain.t_min,
            t_end: domain.t_max,
        }
    }

    /// Executes the operation, adding the vertices and the edge to the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the range lies outside the curve domain or is empty.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<EdgeId> {
        let domain = self.curve.domain();
        let t_start = domain.check(self.t_start)?;
        let t_end = domain.check(self.t_end)?;
        if (t_end - t_start).abs() < TOLERANCE {
            return Err(GeometryError::Degenerate("edge parameter range is empty".into()).into());
        }

        let start = store.add_vertex(VertexData::new(self.curve.evaluate(t_start)?));
        let end = store.add_vertex(VertexData::new(self.curve.evaluate(t_end)?));
        Ok(store.add_edge(EdgeData {
            start,
            end,
            curve: self.curve.clone(),
            t_start,
            t_end,
        }))
    }
}
