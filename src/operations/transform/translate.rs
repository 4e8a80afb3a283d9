use slotmap::SecondaryMap;

use crate::error::Result;
use crate::math::Vector3;
use crate::topology::{EdgeData, EdgeId, TopologyStore, VertexData, VertexId};

/// Copies a set of edges, displaced by a vector.
///
/// Vertices shared between the input edges stay shared in the copies.
pub struct Translate {
    edges: Vec<EdgeId>,
    displacement: Vector3,
}

impl Translate {
    /// Creates a new `Translate` operation.
    #[must_use]
    pub fn new(edges: Vec<EdgeId>, displacement: Vector3) -> Self {
        Self {
            edges,
            displacement,
        }
    }

    /// Executes the translation, returning the copies in input order.
    ///
    /// # Errors
    ///
    /// Returns an error if an edge or vertex is missing from the store.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<Vec<EdgeId>> {
        let mut moved: SecondaryMap<VertexId, VertexId> = SecondaryMap::new();
        let mut out = Vec::with_capacity(self.edges.len());
        for &id in &self.edges {
            let edge = store.edge(id)?.clone();
            let start = self.copy_vertex(store, &mut moved, edge.start)?;
            let end = self.copy_vertex(store, &mut moved, edge.end)?;
            out.push(store.add_edge(EdgeData {
                start,
                end,
                curve: edge.curve.translated(&self.displacement),
                t_start: edge.t_start,
                t_end: edge.t_end,
            }));
        }
        Ok(out)
    }

    fn copy_vertex(
        &self,
        store: &mut TopologyStore,
        moved: &mut SecondaryMap<VertexId, VertexId>,
        vertex: VertexId,
    ) -> Result<VertexId> {
        if let Some(&copy) = moved.get(vertex) {
            return Ok(copy);
        }
        let point = store.vertex(vertex)?.point + self.displacement;
        let copy = store.add_vertex(VertexData::new(point));
        moved.insert(vertex, copy);
        Ok(copy)
    }
}
