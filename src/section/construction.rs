use tracing::{debug, warn};

use crate::error::{GeometryError, OperationError, Result, WingcutError};
use crate::geometry::curve::Curve;
use crate::geometry::{HermiteSpline, Line};
use crate::math::{unit, Point3, Vector3};
use crate::operations::creation::{MakeEdge, MakeTransition};
use crate::operations::modification::{SplitEdge, Trim};
use crate::operations::query::{CurveCurveIntersect, Extreme, SelectEdge};
use crate::topology::{EdgeId, TopologyStore};

use super::chord::{ChordSegment, Datum, StationGeometry};
use super::config::PipelineConfig;
use super::locator::{Anchor, SectionPoint, SectionPointLocator, Side};

/// Named-point and curve construction at one station of a feature run.
///
/// Every failure is wrapped with the construction point, the station and
/// the feature it occurred in.
pub(crate) struct StationBuilder<'a> {
    geometry: &'a StationGeometry,
    locator: SectionPointLocator<'a>,
    config: &'a PipelineConfig,
    feature: &'static str,
}

impl<'a> StationBuilder<'a> {
    pub fn new(geometry: &'a StationGeometry, config: &'a PipelineConfig, feature: &'static str) -> Self {
        Self {
            geometry,
            locator: SectionPointLocator::new(&geometry.chord, &geometry.airfoil)
                .with_tolerance(config.intersection_tolerance),
            config,
            feature,
        }
    }

    pub fn chord(&self) -> &ChordSegment {
        &self.geometry.chord
    }

    pub fn station(&self) -> f64 {
        self.geometry.chord.station()
    }

    fn context(&self, point: &'static str) -> impl FnOnce(WingcutError) -> WingcutError + '_ {
        move |err| {
            warn!(
                point,
                station = self.station(),
                feature = self.feature,
                error = %err,
                "section construction failed"
            );
            err.during(point, self.station(), self.feature)
        }
    }

    /// Attaches construction context to a failed step.
    pub fn step<T>(&self, point: &'static str, result: Result<T>) -> Result<T> {
        result.map_err(self.context(point))
    }

    fn offset(&self, fraction: f64) -> f64 {
        fraction * self.chord().length()
    }

    fn on_airfoil(&self, name: &'static str, u: f64, upper: bool) -> Result<SectionPoint> {
        let point = self.geometry.airfoil.evaluate(u)?;
        debug!(point = name, station = self.station(), u, "located section point");
        Ok(SectionPoint {
            name,
            point,
            anchor: if upper { Anchor::Upper(u) } else { Anchor::Lower(u) },
        })
    }

    /// Point on the upper surface at `fraction` of the chord from `datum`.
    pub fn upper(&self, name: &'static str, fraction: f64, datum: Datum) -> Result<SectionPoint> {
        self.step(name, self.locate_one(name, fraction, datum, Side::Upper))
    }

    /// Point on the lower surface at `fraction` of the chord from `datum`.
    pub fn lower(&self, name: &'static str, fraction: f64, datum: Datum) -> Result<SectionPoint> {
        self.step(name, self.locate_one(name, fraction, datum, Side::Lower))
    }

    fn locate_one(&self, name: &'static str, fraction: f64, datum: Datum, side: Side) -> Result<SectionPoint> {
        let reference = self.chord().reference(datum);
        let u = self.locator.locate(self.offset(fraction), &reference, side)?;
        self.on_airfoil(name, u[0], side == Side::Upper)
    }

    /// Upper and lower points at the same chord station.
    pub fn both(
        &self,
        upper: &'static str,
        lower: &'static str,
        fraction: f64,
        datum: Datum,
    ) -> Result<(SectionPoint, SectionPoint)> {
        let reference = self.chord().reference(datum);
        let params = self.step(upper, self.locator.locate(self.offset(fraction), &reference, Side::Both))?;
        Ok((
            self.step(upper, self.on_airfoil(upper, params[0], true))?,
            self.step(lower, self.on_airfoil(lower, params[1], false))?,
        ))
    }

    /// Point on the chord at `fraction` from `datum`.
    pub fn on_chord(&self, name: &'static str, fraction: f64, datum: Datum) -> Result<SectionPoint> {
        let reference = self.chord().reference(datum);
        let (t, point) = self.step(name, self.locator.chord_station(self.offset(fraction), &reference))?;
        debug!(point = name, station = self.station(), t, "located chord point");
        Ok(SectionPoint {
            name,
            point,
            anchor: Anchor::Chord(t),
        })
    }

    /// `from` moved into the section by `fraction` of the chord.
    pub fn inward_of(&self, name: &'static str, from: &SectionPoint, fraction: f64) -> Result<SectionPoint> {
        let inward = self.inward(from)?;
        Ok(SectionPoint {
            name,
            point: from.point + inward * self.offset(fraction),
            anchor: Anchor::Free,
        })
    }

    /// Free point, for constructions that leave the section curves.
    pub fn free(name: &'static str, point: Point3) -> SectionPoint {
        SectionPoint {
            name,
            point,
            anchor: Anchor::Free,
        }
    }

    /// Unit airfoil tangent at a surface point, in Selig direction.
    pub fn skin_tangent(&self, at: &SectionPoint) -> Result<Vector3> {
        let u = at.airfoil_parameter().ok_or_else(|| {
            WingcutError::from(OperationError::InvalidInput(format!(
                "`{}` does not lie on the airfoil",
                at.name
            )))
        });
        self.step(at.name, u.and_then(|u| self.geometry.airfoil.tangent(u)))
    }

    /// Unit in-plane normal at a surface point, pointing into the section.
    pub fn inward(&self, at: &SectionPoint) -> Result<Vector3> {
        let tangent = self.skin_tangent(at)?;
        let normal = unit(&tangent.cross(&self.chord().span_axis()));
        self.step(at.name, normal.ok_or_else(|| GeometryError::ZeroVector.into()))
    }

    pub fn lower_normal(&self) -> Vector3 {
        self.chord().lower_normal()
    }

    pub fn upper_normal(&self) -> Vector3 {
        self.chord().upper_normal()
    }

    /// Transition curve between two points with the configured tangent weight.
    pub fn transition(
        &self,
        store: &mut TopologyStore,
        from: &SectionPoint,
        to: &SectionPoint,
        start: Vector3,
        end: Vector3,
    ) -> Result<EdgeId> {
        self.weighted_transition(store, from, to, (start, 1.0), (end, 1.0))
    }

    /// Transition curve with per-end weights relative to the configured one.
    pub fn weighted_transition(
        &self,
        store: &mut TopologyStore,
        from: &SectionPoint,
        to: &SectionPoint,
        start: (Vector3, f64),
        end: (Vector3, f64),
    ) -> Result<EdgeId> {
        let weight = self.config.tangent_weight;
        let edge = MakeTransition::between(from.point, to.point, start.0, end.0)
            .with_weights(start.1 * weight, end.1 * weight)
            .execute(store);
        self.step(to.name, edge)
    }

    /// Transition curve between two points without adding it to the store.
    pub fn transition_curve(
        &self,
        from: &SectionPoint,
        to: &SectionPoint,
        start: Vector3,
        end: Vector3,
    ) -> Result<HermiteSpline> {
        let curve = MakeTransition::between(from.point, to.point, start, end)
            .with_weight(self.config.tangent_weight)
            .build();
        self.step(to.name, curve)
    }

    /// Cuts `curve` with the line through `from` along `direction`,
    /// extending one chord to either side.
    pub fn line_hit(
        &self,
        name: &'static str,
        curve: &HermiteSpline,
        from: &SectionPoint,
        direction: Vector3,
    ) -> Result<(f64, SectionPoint)> {
        let reach = self.chord().length();
        let hit = Line::between(from.point - direction * reach, from.point + direction * reach).and_then(|line| {
            CurveCurveIntersect::new(curve, &line)
                .with_tolerance(self.config.intersection_tolerance)
                .execute()
        });
        let hit = self.step(name, hit)?;
        let point = self.step(name, curve.evaluate(hit.t1))?;
        Ok((hit.t1, Self::free(name, point)))
    }

    /// Straight edge between two points.
    pub fn segment(&self, store: &mut TopologyStore, from: &SectionPoint, to: &SectionPoint) -> Result<EdgeId> {
        let edge = Line::between(from.point, to.point).and_then(|line| MakeEdge::whole(line).execute(store));
        self.step(to.name, edge)
    }

    /// The complete airfoil profile as a new edge.
    pub fn skin(&self, store: &mut TopologyStore) -> Result<EdgeId> {
        MakeEdge::whole(self.geometry.airfoil.clone()).execute(store)
    }

    /// Splits `edge` at a surface point and keeps one of the pieces.
    pub fn split_keep(
        &self,
        store: &mut TopologyStore,
        edge: EdgeId,
        at: &SectionPoint,
        keep: Extreme,
    ) -> Result<EdgeId> {
        let result = at
            .airfoil_parameter()
            .ok_or_else(|| {
                WingcutError::from(OperationError::InvalidInput(format!(
                    "cannot split the airfoil at `{}`",
                    at.name
                )))
            })
            .and_then(|u| {
                let (head, tail) = SplitEdge::at_parameter(edge, u)
                    .with_tolerance(self.config.intersection_tolerance)
                    .execute(store)?;
                let select = match keep {
                    Extreme::Longest => SelectEdge::longest(&[head, tail]),
                    Extreme::Shortest => SelectEdge::shortest(&[head, tail]),
                };
                select.execute(store)
            });
        self.step(at.name, result)
    }

    /// Piece of `edge` between two surface points, running from `from` to `to`.
    pub fn trim_between(
        &self,
        store: &mut TopologyStore,
        edge: EdgeId,
        from: &SectionPoint,
        to: &SectionPoint,
    ) -> Result<EdgeId> {
        let piece = match (from.airfoil_parameter(), to.airfoil_parameter()) {
            (Some(t0), Some(t1)) => Trim::new(edge, t0, t1).execute(store),
            _ => Err(OperationError::InvalidInput(format!(
                "cannot trim the airfoil between `{}` and `{}`",
                from.name, to.name
            ))
            .into()),
        };
        self.step(to.name, piece)
    }

    /// Straight closure of an open trailing edge, lower end to upper end.
    pub fn trailing_edge_closure(&self, store: &mut TopologyStore) -> Result<Option<EdgeId>> {
        let airfoil = &self.geometry.airfoil;
        let domain = airfoil.domain();
        let upper = airfoil.evaluate(domain.t_min)?;
        let lower = airfoil.evaluate(domain.t_max)?;
        if (upper - lower).norm() <= self.config.connection_tolerance {
            return Ok(None);
        }
        let closure = Line::between(lower, upper).and_then(|line| MakeEdge::whole(line).execute(store));
        self.step("trailing edge", closure).map(Some)
    }
}
