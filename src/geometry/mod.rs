pub mod curve;
pub mod plane;

pub use curve::{Circle, Curve, CurveDomain, HermiteSpline, Line};
pub use plane::Plane;
