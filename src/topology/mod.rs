pub mod edge;
pub mod vertex;
pub mod wire;

pub use edge::{EdgeCurve, EdgeData, EdgeId};
pub use vertex::{VertexData, VertexId};
pub use wire::{OrientedEdge, WireData, WireId};

use crate::error::TopologyError;
use crate::math::Point3;
use slotmap::SlotMap;

/// Central arena that owns all topological entities of a section run.
///
/// Entities reference each other via typed IDs (generational indices).
/// Nothing is removed; split and trimmed edges are added alongside the
/// edges they were derived from.
#[derive(Debug, Default)]
pub struct TopologyStore {
    vertices: SlotMap<VertexId, VertexData>,
    edges: SlotMap<EdgeId, EdgeData>,
    wires: SlotMap<WireId, WireData>,
}

impl TopologyStore {
    /// Creates a new, empty topology store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Vertex operations ---

    /// Inserts a vertex and returns its ID.
    pub fn add_vertex(&mut self, data: VertexData) -> VertexId {
        self.vertices.insert(data)
    }

    /// Returns a reference to the vertex data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn vertex(&self, id: VertexId) -> Result<&VertexData, TopologyError> {
        self.vertices
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("vertex".into()))
    }

    // --- Edge operations ---

    /// Inserts an edge and returns its ID.
    pub fn add_edge(&mut self, data: EdgeData) -> EdgeId {
        self.edges.insert(data)
    }

    /// Returns a reference to the edge data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn edge(&self, id: EdgeId) -> Result<&EdgeData, TopologyError> {
        self.edges
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("edge".into()))
    }

    /// Start and end positions of an edge, in its natural direction.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge or one of its vertices is missing.
    pub fn edge_endpoints(&self, id: EdgeId) -> Result<(Point3, Point3), TopologyError> {
        let edge = self.edge(id)?;
        Ok((self.vertex(edge.start)?.point, self.vertex(edge.end)?.point))
    }

    // --- Wire operations ---

    /// Inserts a wire and returns its ID.
    pub fn add_wire(&mut self, data: WireData) -> WireId {
        self.wires.insert(data)
    }

    /// Returns a reference to the wire data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn wire(&self, id: WireId) -> Result<&WireData, TopologyError> {
        self.wires
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("wire".into()))
    }

    /// Number of edges held by the store.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::Line;

    #[test]
    fn edge_endpoints_follow_vertices() {
        let mut store = TopologyStore::new();
        let a = store.add_vertex(VertexData::new(Point3::new(0.0, 0.0, 0.0)));
        let b = store.add_vertex(VertexData::new(Point3::new(2.0, 0.0, 0.0)));
        let line = Line::between(Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 0.0, 0.0)).unwrap();
        let e = store.add_edge(EdgeData {
            start: a,
            end: b,
            curve: EdgeCurve::Line(line),
            t_start: 0.0,
            t_end: 2.0,
        });
        let (s, t) = store.edge_endpoints(e).unwrap();
        assert!((s.x).abs() < 1e-12);
        assert!((t.x - 2.0).abs() < 1e-12);
        assert_eq!(store.edge_count(), 1);
    }

    #[test]
    fn missing_entities_are_reported() {
        let mut other = TopologyStore::new();
        let w = other.add_wire(WireData {
            edges: Vec::new(),
            is_closed: false,
        });
        let store = TopologyStore::new();
        assert!(matches!(
            store.wire(w),
            Err(TopologyError::EntityNotFound(_))
        ));
    }
}
