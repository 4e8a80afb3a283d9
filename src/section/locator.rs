use crate::error::Result;
use crate::geometry::curve::Curve;
use crate::geometry::{Circle, HermiteSpline, Line, Plane};
use crate::math::{Point3, Vector3, INTERSECTION_TOLERANCE};
use crate::operations::query::CurveCurveIntersect;

use super::chord::ChordSegment;

/// Airfoil surface on which to locate a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Upper,
    Lower,
    /// Upper first, then lower.
    Both,
}

/// Curve a [`SectionPoint`] was derived from, with its parameter there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Anchor {
    Upper(f64),
    Lower(f64),
    Chord(f64),
    /// Constructed off any curve, e.g. by an inward offset.
    Free,
}

/// A named construction point of a section.
#[derive(Debug, Clone, Copy)]
pub struct SectionPoint {
    pub name: &'static str,
    pub point: Point3,
    pub anchor: Anchor,
}

impl SectionPoint {
    /// Parameter on the airfoil, if the point lies on it.
    #[must_use]
    pub fn airfoil_parameter(&self) -> Option<f64> {
        match self.anchor {
            Anchor::Upper(u) | Anchor::Lower(u) => Some(u),
            Anchor::Chord(_) | Anchor::Free => None,
        }
    }
}

/// Locates points on an airfoil at a chordwise offset from a reference point.
///
/// An auxiliary circle of radius `offset` centred at the reference and
/// lying in the section plane is cut with the chord. From that chord
/// point a ray normal to the chord, as long as the chord, is cast toward
/// the requested surface and cut with the airfoil.
pub struct SectionPointLocator<'a> {
    chord: &'a ChordSegment,
    airfoil: &'a HermiteSpline,
    tolerance: f64,
}

impl<'a> SectionPointLocator<'a> {
    /// Creates a new `SectionPointLocator`.
    #[must_use]
    pub fn new(chord: &'a ChordSegment, airfoil: &'a HermiteSpline) -> Self {
        Self {
            chord,
            airfoil,
            tolerance: INTERSECTION_TOLERANCE,
        }
    }

    /// Overrides the intersection coincidence tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Airfoil parameters of the points at `offset` (meters) from `reference`.
    ///
    /// Returns one parameter for [`Side::Upper`] or [`Side::Lower`] and two,
    /// upper then lower, for [`Side::Both`].
    ///
    /// # Errors
    ///
    /// Returns the first failing intersection; no partial result is returned.
    pub fn locate(&self, offset: f64, reference: &Point3, side: Side) -> Result<Vec<f64>> {
        let (_, foot) = self.chord_station(offset, reference)?;
        match side {
            Side::Upper => Ok(vec![self.project(&foot, self.chord.upper_normal())?]),
            Side::Lower => Ok(vec![self.project(&foot, self.chord.lower_normal())?]),
            Side::Both => Ok(vec![
                self.project(&foot, self.chord.upper_normal())?,
                self.project(&foot, self.chord.lower_normal())?,
            ]),
        }
    }

    /// Chord parameter and point at `offset` from `reference`.
    ///
    /// # Errors
    ///
    /// Returns an error if the offset is not positive or the circle does not
    /// cut the chord exactly once.
    pub fn chord_station(&self, offset: f64, reference: &Point3) -> Result<(f64, Point3)> {
        let plane = Plane::from_normal(*reference, self.chord.span_axis())?;
        let circle = Circle::new(*reference, offset, *plane.normal(), *plane.u_dir())?;
        let hit = CurveCurveIntersect::new(self.chord.line(), &circle)
            .with_tolerance(self.tolerance)
            .execute()?;
        Ok((hit.t1, self.chord.line().evaluate(hit.t1)?))
    }

    fn project(&self, foot: &Point3, normal: Vector3) -> Result<f64> {
        let ray = Line::new(*foot, normal, self.chord.length())?;
        let hit = CurveCurveIntersect::new(self.airfoil, &ray)
            .with_tolerance(self.tolerance)
            .execute()?;
        Ok(hit.t1)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::aircraft::{AirfoilSection, LiftingSurface, SurfaceKind};
    use crate::error::{IntersectionError, WingcutError};
    use crate::section::chord::{ChordProjector, Datum, StationGeometry};
    use approx::assert_relative_eq;
    use test_case::test_case;

    fn section(code: &str, chord: f64) -> StationGeometry {
        let wing = LiftingSurface::rectangular(
            SurfaceKind::Wing,
            chord,
            6.0,
            AirfoilSection::naca4(code, 40).unwrap(),
        )
        .unwrap();
        ChordProjector::new(&wing).section(0.5).unwrap()
    }

    #[test_case(0.1 ; "near the leading edge")]
    #[test_case(0.3 ; "quarter chord region")]
    #[test_case(0.75 ; "aft region")]
    fn upper_point_lies_above_chord_foot(fraction: f64) {
        let geo = section("0012", 2.0);
        let locator = SectionPointLocator::new(&geo.chord, &geo.airfoil);
        let le = geo.chord.reference(Datum::LeadingEdge);
        let u = locator.locate(fraction * 2.0, &le, Side::Upper).unwrap();
        assert_eq!(u.len(), 1);
        let p = geo.airfoil.evaluate(u[0]).unwrap();
        assert_relative_eq!(p.x, fraction * 2.0, epsilon = 1e-6);
        assert!(p.z > 0.0);
    }

    #[test]
    fn both_is_upper_then_lower() {
        let geo = section("2412", 1.5);
        let locator = SectionPointLocator::new(&geo.chord, &geo.airfoil);
        let te = geo.chord.reference(Datum::TrailingEdge);
        let both = locator.locate(0.45, &te, Side::Both).unwrap();
        let upper = locator.locate(0.45, &te, Side::Upper).unwrap();
        let lower = locator.locate(0.45, &te, Side::Lower).unwrap();
        assert_eq!(both, vec![upper[0], lower[0]]);
        let pu = geo.airfoil.evaluate(both[0]).unwrap();
        let pl = geo.airfoil.evaluate(both[1]).unwrap();
        assert!(pu.z > pl.z);
        assert_relative_eq!(pu.x, 1.5 - 0.45, epsilon = 1e-6);
    }

    #[test]
    fn repeated_calls_are_identical() {
        let geo = section("2412", 1.0);
        let locator = SectionPointLocator::new(&geo.chord, &geo.airfoil);
        let le = geo.chord.reference(Datum::LeadingEdge);
        let a = locator.locate(0.2, &le, Side::Both).unwrap();
        let b = locator.locate(0.2, &le, Side::Both).unwrap();
        assert_eq!(a[0].to_bits(), b[0].to_bits());
        assert_eq!(a[1].to_bits(), b[1].to_bits());
    }

    #[test]
    fn chord_station_is_at_the_offset() {
        let geo = section("0012", 1.0);
        let locator = SectionPointLocator::new(&geo.chord, &geo.airfoil);
        let te = geo.chord.trailing_edge();
        let (t, p) = locator.chord_station(0.3, &te).unwrap();
        assert_relative_eq!(t, 0.3, epsilon = 1e-8);
        assert_relative_eq!((p - te).norm(), 0.3, epsilon = 1e-8);
    }

    #[test]
    fn offset_beyond_the_chord_fails() {
        let geo = section("0012", 1.0);
        let locator = SectionPointLocator::new(&geo.chord, &geo.airfoil);
        let le = geo.chord.leading_edge();
        let err = locator.locate(1.5, &le, Side::Upper).unwrap_err();
        assert!(matches!(
            err,
            WingcutError::Intersection(IntersectionError::NoSolution { .. })
        ));
    }
}
