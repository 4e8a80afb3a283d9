use crate::error::{GeometryError, OperationError, Result};
use crate::geometry::HermiteSpline;
use crate::math::{unit, Point3, Vector3};
use crate::topology::{EdgeId, TopologyStore};

use super::MakeEdge;

/// Builds a tangent-continuous transition curve through ordered waypoints.
///
/// Only the first and last tangents are imposed. Each is normalized and
/// then scaled by its weight, so the weight controls how far the curve
/// follows the prescribed direction before bending toward the next point.
#[derive(Debug, Clone)]
pub struct MakeTransition {
    waypoints: Vec<Point3>,
    start_tangent: Vector3,
    end_tangent: Vector3,
    start_weight: f64,
    end_weight: f64,
    periodic: bool,
}

impl MakeTransition {
    /// Creates a new open transition with unit weights.
    #[must_use]
    pub fn new(waypoints: Vec<Point3>, start_tangent: Vector3, end_tangent: Vector3) -> Self {
        Self {
            waypoints,
            start_tangent,
            end_tangent,
            start_weight: 1.0,
            end_weight: 1.0,
            periodic: false,
        }
    }

    /// Convenience for the common two-point transition.
    #[must_use]
    pub fn between(from: Point3, to: Point3, start_tangent: Vector3, end_tangent: Vector3) -> Self {
        Self::new(vec![from, to], start_tangent, end_tangent)
    }

    /// Sets the same magnitude on both end tangents.
    #[must_use]
    pub fn with_weight(self, weight: f64) -> Self {
        self.with_weights(weight, weight)
    }

    /// Sets separate magnitudes on the start and end tangents.
    #[must_use]
    pub fn with_weights(mut self, start: f64, end: f64) -> Self {
        self.start_weight = start;
        self.end_weight = end;
        self
    }

    /// Closes the curve through the first waypoint; the start tangent is
    /// reused at the seam and the end tangent is ignored.
    #[must_use]
    pub fn periodic(mut self) -> Self {
        self.periodic = true;
        self
    }

    /// Builds the curve without adding it to a store.
    ///
    /// # Errors
    ///
    /// Returns an error if a tangent is zero-length, a weight is not positive,
    /// or the waypoints are degenerate.
    pub fn build(&self) -> Result<HermiteSpline> {
        let start = scaled(&self.start_tangent, self.start_weight)?;
        if self.periodic {
            return HermiteSpline::periodic(&self.waypoints, Some(start));
        }
        let end = scaled(&self.end_tangent, self.end_weight)?;
        HermiteSpline::with_end_tangents(&self.waypoints, Some(start), Some(end))
    }

    /// Builds the curve and adds it to the store as one edge.
    ///
    /// # Errors
    ///
    /// Returns an error if the curve cannot be built.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<EdgeId> {
        MakeEdge::whole(self.build()?).execute(store)
    }
}

fn scaled(direction: &Vector3, weight: f64) -> Result<Vector3> {
    if weight.is_nan() || weight <= 0.0 {
        return Err(
            OperationError::InvalidInput(format!("tangent weight must be positive, got {weight}"))
                .into(),
        );
    }
    unit(direction)
        .map(|d| d * weight)
        .ok_or_else(|| GeometryError::ZeroVector.into())
}
