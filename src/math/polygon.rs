use super::{Point3, Vector3};

/// Signed area of a closed polygon, measured about `normal`.
///
/// Positive when the vertices wind counter-clockwise seen from the tip of
/// `normal`. The polygon need not be planar; it is projected first.
#[must_use]
pub fn signed_area(points: &[Point3], normal: &Vector3) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let o = &points[0];
    let mut cross_sum = Vector3::zeros();
    for pair in points[1..].windows(2) {
        cross_sum += (pair[0] - o).cross(&(pair[1] - o));
    }
    0.5 * cross_sum.dot(normal)
}

/// Total length of the open polyline through `points`.
#[must_use]
pub fn polyline_length(points: &[Point3]) -> f64 {
    points.windows(2).map(|w| (w[1] - w[0]).norm()).sum()
}
