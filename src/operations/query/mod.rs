mod area;
mod closest_point;
mod extreme_edge;
mod intersect;
mod length;

pub use area::{EnclosedArea, Perimeter};
pub use closest_point::{closest_point_on_curve, ClosestPointOnCurve, ClosestPointResult};
pub use extreme_edge::{Extreme, SelectEdge};
pub use intersect::{CurveCurveIntersect, IntersectionResult};
pub use length::Length;
