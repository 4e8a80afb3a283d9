use super::{Point3, TOLERANCE};

/// Closest approach between two 3D segments.
#[derive(Debug, Clone, Copy)]
pub struct SegmentApproach {
    /// Fraction along the first segment, in `[0, 1]`.
    pub s: f64,
    /// Fraction along the second segment, in `[0, 1]`.
    pub t: f64,
    /// Distance between the two closest points.
    pub distance: f64,
}

/// Computes the closest points between segments `p0-p1` and `q0-q1`.
///
/// Degenerate (zero-length) segments are treated as points.
#[must_use]
pub fn segment_segment_closest(p0: &Point3, p1: &Point3, q0: &Point3, q1: &Point3) -> SegmentApproach {
    let d1 = p1 - p0;
    let d2 = q1 - q0;
    let r = p0 - q0;
    let a = d1.norm_squared();
    let e = d2.norm_squared();
    let f = d2.dot(&r);

    let (s, t) = if a <= TOLERANCE && e <= TOLERANCE {
        (0.0, 0.0)
    } else if a <= TOLERANCE {
        (0.0, (f / e).clamp(0.0, 1.0))
    } else {
        let c = d1.dot(&r);
        if e <= TOLERANCE {
            ((-c / a).clamp(0.0, 1.0), 0.0)
        } else {
            let b = d1.dot(&d2);
            let denom = a * e - b * b;
            let mut s = if denom > TOLERANCE {
                ((b * f - c * e) / denom).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let mut t = (b * s + f) / e;
            if t < 0.0 {
                t = 0.0;
                s = (-c / a).clamp(0.0, 1.0);
            } else if t > 1.0 {
                t = 1.0;
                s = ((b - c) / a).clamp(0.0, 1.0);
            }
            (s, t)
        }
    };

    let cp = p0 + d1 * s;
    let cq = q0 + d2 * t;
    SegmentApproach {
        s,
        t,
        distance: (cp - cq).norm(),
    }
}

/// Distance from `point` to the segment `a-b`, with the fraction of the foot point.
#[must_use]
pub fn point_segment_closest(point: &Point3, a: &Point3, b: &Point3) -> (f64, f64) {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq < TOLERANCE * TOLERANCE {
        return (0.0, (point - a).norm());
    }
    let t = ((point - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    (t, (point - (a + ab * t)).norm())
}
