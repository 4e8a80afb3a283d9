use crate::error::{GeometryError, Result};
use crate::geometry::curve::Curve;
use crate::math::polygon::signed_area;
use crate::math::{unit, Point3, Vector3};
use crate::topology::{TopologyStore, WireId};

/// Computes the area enclosed by a closed wire, seen along a normal.
///
/// Each edge is sampled along its orientation in the wire and the
/// resulting polygon is measured with the shoelace formula. The sign
/// follows the winding about `normal`.
pub struct EnclosedArea {
    wire: WireId,
    normal: Vector3,
}

impl EnclosedArea {
    /// Creates a new `EnclosedArea` query.
    #[must_use]
    pub fn new(wire: WireId, normal: Vector3) -> Self {
        Self { wire, normal }
    }

    /// Executes the query, returning the signed enclosed area.
    ///
    /// # Errors
    ///
    /// Returns an error if the wire or one of its edges is missing, or the
    /// normal is zero-length.
    pub fn execute(&self, store: &TopologyStore) -> Result<f64> {
        let normal = unit(&self.normal).ok_or(GeometryError::ZeroVector)?;
        let polygon = wire_polygon(store, self.wire)?;
        Ok(signed_area(&polygon, &normal))
    }
}

/// Computes the total length of a wire.
pub struct Perimeter {
    wire: WireId,
}

impl Perimeter {
    /// Creates a new `Perimeter` query.
    #[must_use]
    pub fn new(wire: WireId) -> Self {
        Self { wire }
    }

    /// Executes the query.
    ///
    /// # Errors
    ///
    /// Returns an error if the wire or one of its edges is missing.
    pub fn execute(&self, store: &TopologyStore) -> Result<f64> {
        let wire = store.wire(self.wire)?;
        wire.edges
            .iter()
            .map(|o| store.edge(o.edge)?.length())
            .sum()
    }
}

/// Samples a wire into a closed polygon (last point omitted).
fn wire_polygon(store: &TopologyStore, wire: WireId) -> Result<Vec<Point3>> {
    let wire = store.wire(wire)?;
    let mut polygon = Vec::new();
    for oriented in &wire.edges {
        let edge = store.edge(oriented.edge)?;
        let (from, to) = if oriented.forward {
            (edge.t_start, edge.t_end)
        } else {
            (edge.t_end, edge.t_start)
        };
        let n = u32::try_from(edge.curve.sample_count().max(8)).unwrap_or(u32::MAX);
        for i in 0..n {
            let t = from + (to - from) * f64::from(i) / f64::from(n);
            polygon.push(edge.curve.evaluate(t)?);
        }
    }
    Ok(polygon)
}
