use crate::error::{OperationError, Result};
use crate::topology::{EdgeId, TopologyStore};

/// Which end of the length ordering to select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extreme {
    Longest,
    Shortest,
}

/// Picks the longest or shortest edge of a list by arc length.
///
/// Ties go to the edge that appears first.
pub struct SelectEdge {
    edges: Vec<EdgeId>,
    extreme: Extreme,
}

impl SelectEdge {
    /// Selects the longest of `edges`.
    #[must_use]
    pub fn longest(edges: &[EdgeId]) -> Self {
        Self {
            edges: edges.to_vec(),
            extreme: Extreme::Longest,
        }
    }

    /// Selects the shortest of `edges`.
    #[must_use]
    pub fn shortest(edges: &[EdgeId]) -> Self {
        Self {
            edges: edges.to_vec(),
            extreme: Extreme::Shortest,
        }
    }

    /// Executes the selection.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidInput`] for an empty list, or an error
    /// if an edge is missing from the store.
    pub fn execute(&self, store: &TopologyStore) -> Result<EdgeId> {
        let mut best: Option<EdgeId> = None;
        let mut best_len = match self.extreme {
            Extreme::Longest => f64::NEG_INFINITY,
            Extreme::Shortest => f64::INFINITY,
        };
        for &edge in &self.edges {
            let len = store.edge(edge)?.length()?;
            let better = match self.extreme {
                Extreme::Longest => len > best_len,
                Extreme::Shortest => len < best_len,
            };
            if better {
                best_len = len;
                best = Some(edge);
            }
        }
        best.ok_or_else(|| OperationError::InvalidInput("no edges to select from".into()).into())
    }
}
