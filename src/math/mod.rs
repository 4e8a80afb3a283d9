pub mod distance_3d;
pub mod interpolate;
pub mod polygon;
pub mod quadrature;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Distance under which two curve points count as one intersection.
pub const INTERSECTION_TOLERANCE: f64 = 1e-5;

/// Distance under which two edge endpoints count as connected.
pub const CONNECTION_TOLERANCE: f64 = 1e-6;

/// Normalizes `v`, returning `None` for (near) zero-length vectors.
#[must_use]
pub fn unit(v: &Vector3) -> Option<Vector3> {
    let len = v.norm();
    (len > TOLERANCE).then(|| v / len)
}
