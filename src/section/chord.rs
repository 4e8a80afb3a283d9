use serde::{Deserialize, Serialize};

use crate::aircraft::{LiftingSurface, SurfaceKind};
use crate::error::{ConfigurationError, Result};
use crate::geometry::curve::Curve;
use crate::geometry::{HermiteSpline, Line};
use crate::math::{Point3, Vector3};

/// Chord end from which offsets are measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Datum {
    LeadingEdge,
    TrailingEdge,
}

/// The local chord at one span station, as a segment from the trailing
/// edge to the leading edge.
#[derive(Debug, Clone)]
pub struct ChordSegment {
    line: Line,
    span_axis: Vector3,
    station: f64,
    span_position: f64,
}

impl ChordSegment {
    /// The chord as a curve; parameter 0 is the trailing edge.
    #[must_use]
    pub fn line(&self) -> &Line {
        &self.line
    }

    #[must_use]
    pub fn trailing_edge(&self) -> Point3 {
        *self.line.origin()
    }

    #[must_use]
    pub fn leading_edge(&self) -> Point3 {
        self.line.end()
    }

    /// Chord length in meters.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.line.domain().t_max
    }

    /// Unit direction from trailing edge to leading edge.
    #[must_use]
    pub fn direction(&self) -> Vector3 {
        *self.line.direction()
    }

    /// Unit span axis; normal of the section plane.
    #[must_use]
    pub fn span_axis(&self) -> Vector3 {
        self.span_axis
    }

    /// In-plane normal pointing toward the upper surface.
    #[must_use]
    pub fn upper_normal(&self) -> Vector3 {
        self.span_axis.cross(&self.direction())
    }

    /// In-plane normal pointing toward the lower surface.
    #[must_use]
    pub fn lower_normal(&self) -> Vector3 {
        self.direction().cross(&self.span_axis)
    }

    /// Chord end used as the origin of offsets.
    #[must_use]
    pub fn reference(&self, datum: Datum) -> Point3 {
        match datum {
            Datum::LeadingEdge => self.leading_edge(),
            Datum::TrailingEdge => self.trailing_edge(),
        }
    }

    /// Span fraction of this station.
    #[must_use]
    pub fn station(&self) -> f64 {
        self.station
    }

    /// Distance from the root along the span, in meters.
    #[must_use]
    pub fn span_position(&self) -> f64 {
        self.span_position
    }
}

/// Chord and airfoil profile at one station.
#[derive(Debug, Clone)]
pub struct StationGeometry {
    pub chord: ChordSegment,
    pub airfoil: HermiteSpline,
}

/// Places chords and airfoil profiles of a lifting surface in aircraft axes.
pub struct ChordProjector<'a> {
    surface: &'a LiftingSurface,
}

impl<'a> ChordProjector<'a> {
    /// Creates a new `ChordProjector` for `surface`.
    #[must_use]
    pub fn new(surface: &'a LiftingSurface) -> Self {
        Self { surface }
    }

    /// The chord segment at span fraction `station`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::StationOutOfRange`] outside `[0, 1]`.
    pub fn chord(&self, station: f64) -> Result<ChordSegment> {
        let placement = self.placement(station)?;
        let line = Line::between(placement.place(1.0, 0.0), placement.place(0.0, 0.0))?;
        Ok(ChordSegment {
            line,
            span_axis: self.surface.span_axis(),
            station,
            span_position: placement.y,
        })
    }

    /// The airfoil profile curve at span fraction `station`, in Selig order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::StationOutOfRange`] outside `[0, 1]`, or
    /// an error if the coordinate table cannot be interpolated.
    pub fn airfoil(&self, station: f64) -> Result<HermiteSpline> {
        let placement = self.placement(station)?;
        let points: Vec<Point3> = self
            .surface
            .airfoil_at(placement.y)?
            .coordinates
            .iter()
            .map(|&[x, z]| placement.place(x, z))
            .collect();
        HermiteSpline::interpolate(&points)
    }

    /// Chord and airfoil together.
    ///
    /// # Errors
    ///
    /// See [`ChordProjector::chord`] and [`ChordProjector::airfoil`].
    pub fn section(&self, station: f64) -> Result<StationGeometry> {
        Ok(StationGeometry {
            chord: self.chord(station)?,
            airfoil: self.airfoil(station)?,
        })
    }

    fn placement(&self, station: f64) -> Result<Placement> {
        if !(0.0..=1.0).contains(&station) {
            return Err(ConfigurationError::StationOutOfRange(station).into());
        }
        let s = self.surface;
        let y = station * s.semi_span();
        Ok(Placement {
            kind: s.kind(),
            apex: s.apex(),
            y,
            chord: s.chord_at(y)?,
            x_le: s.x_le_at(y)?,
            z_le: s.z_le_at(y),
            twist: s.twist_at(y)? + s.rigging_angle(),
        })
    }
}

/// Planform transform of one station.
struct Placement {
    kind: SurfaceKind,
    apex: Point3,
    y: f64,
    chord: f64,
    x_le: f64,
    z_le: f64,
    twist: f64,
}

impl Placement {
    /// Maps normalized airfoil coordinates to aircraft axes.
    ///
    /// Scales by the chord, rotates nose-up by the twist about the
    /// mid-chord, then offsets by sweep, dihedral and apex. Fins map the
    /// local thickness axis to `-Y` and the span to `+Z`.
    fn place(&self, x: f64, z: f64) -> Point3 {
        let x_mid = self.x_le + 0.5 * self.chord;
        let dx = self.x_le + x * self.chord - x_mid;
        let dz = z * self.chord;
        let (sin, cos) = self.twist.sin_cos();
        let xr = x_mid + dx * cos + dz * sin;
        let zr = self.z_le - dx * sin + dz * cos;
        let local = match self.kind {
            SurfaceKind::VerticalTail => Vector3::new(xr, -zr, self.y),
            SurfaceKind::Wing | SurfaceKind::HorizontalTail => Vector3::new(xr, self.y, zr),
        };
        self.apex + local
    }
}
