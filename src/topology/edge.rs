use crate::error::Result;
use crate::geometry::curve::{Circle, Curve, CurveDomain, HermiteSpline, Line};
use crate::math::{Point3, Vector3};

use super::vertex::VertexId;

slotmap::new_key_type! {
    /// Unique identifier for an edge in the topology store.
    pub struct EdgeId;
}

/// The geometric curve associated with an edge.
#[derive(Debug, Clone)]
pub enum EdgeCurve {
    /// A straight segment.
    Line(Line),
    /// A full circle; edges use a sub-range of its angle.
    Circle(Circle),
    /// An interpolated profile or transition curve.
    Spline(HermiteSpline),
}

impl EdgeCurve {
    /// Copy of the curve moved by `offset`.
    #[must_use]
    pub fn translated(&self, offset: &Vector3) -> Self {
        match self {
            Self::Line(c) => Self::Line(c.translated(offset)),
            Self::Circle(c) => Self::Circle(c.translated(offset)),
            Self::Spline(c) => Self::Spline(c.translated(offset)),
        }
    }

    fn inner(&self) -> &dyn Curve {
        match self {
            Self::Line(c) => c,
            Self::Circle(c) => c,
            Self::Spline(c) => c,
        }
    }
}

impl Curve for EdgeCurve {
    fn evaluate(&self, t: f64) -> Result<Point3> {
        self.inner().evaluate(t)
    }

    fn derivative(&self, t: f64) -> Result<Vector3> {
        self.inner().derivative(t)
    }

    fn domain(&self) -> CurveDomain {
        self.inner().domain()
    }

    fn is_closed(&self) -> bool {
        self.inner().is_closed()
    }

    fn sample_count(&self) -> usize {
        self.inner().sample_count()
    }

    fn length_between(&self, t0: f64, t1: f64) -> Result<f64> {
        self.inner().length_between(t0, t1)
    }
}

impl From<Line> for EdgeCurve {
    fn from(c: Line) -> Self {
        Self::Line(c)
    }
}

impl From<Circle> for EdgeCurve {
    fn from(c: Circle) -> Self {
        Self::Circle(c)
    }
}

impl From<HermiteSpline> for EdgeCurve {
    fn from(c: HermiteSpline) -> Self {
        Self::Spline(c)
    }
}

/// Data associated with a topological edge.
///
/// An edge connects two vertices and carries a geometric curve
/// that defines the shape of the edge between them. `t_start` may be
/// greater than `t_end` when the edge runs against the curve direction.
#[derive(Debug, Clone)]
pub struct EdgeData {
    /// Start vertex of the edge.
    pub start: VertexId,
    /// End vertex of the edge.
    pub end: VertexId,
    /// The geometric curve defining this edge's shape.
    pub curve: EdgeCurve,
    /// Parameter on the curve corresponding to the start vertex.
    pub t_start: f64,
    /// Parameter on the curve corresponding to the end vertex.
    pub t_end: f64,
}

impl EdgeData {
    /// Arc length of the edge's parameter range.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameter range falls outside the curve domain.
    pub fn length(&self) -> Result<f64> {
        Ok(self.curve.length_between(self.t_start, self.t_end)?.abs())
    }

    /// The parameter range as `(low, high)`.
    #[must_use]
    pub fn bounds(&self) -> (f64, f64) {
        (self.t_start.min(self.t_end), self.t_start.max(self.t_end))
    }
}
