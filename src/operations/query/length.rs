use crate::error::Result;
use crate::topology::{EdgeId, TopologyStore};

/// Computes the arc length of an edge.
pub struct Length {
    edge: EdgeId,
}

impl Length {
    /// Creates a new `Length` query.
    #[must_use]
    pub fn new(edge: EdgeId) -> Self {
        Self { edge }
    }

    /// Executes the query, returning the length of the edge's parameter range.
    ///
    /// Lines and circles are measured exactly; splines by Gauss-Legendre
    /// quadrature of the derivative norm.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge is not found.
    pub fn execute(&self, store: &TopologyStore) -> Result<f64> {
        store.edge(self.edge)?.length()
    }
}
