use tracing::{debug, info, info_span};

use crate::aircraft::LiftingSurface;
use crate::error::{ConfigurationError, Result};
use crate::operations::creation::AssembleLoop;
use crate::operations::query::Extreme;
use crate::operations::transform::Translate;
use crate::topology::{EdgeId, TopologyStore};

use super::chord::{ChordProjector, StationGeometry};
use super::config::PipelineConfig;
use super::construction::StationBuilder;
use super::features::{slat_cut, tip_closure, Cut, FlapConstruction};
use super::locator::SectionPoint;
use super::loops::{BoundaryLoop, LoopRole, SectionBoundaries, StationKind};
use super::recipe::{FeatureRecipe, FowlerFlap, SlatRecipe, TipClosure};

const CLEAN: &str = "clean wing";
const HIGH_LIFT: &str = "flap and slat";

/// Builds the closed section loops of a feature over a span interval.
///
/// Every run computes the chord and airfoil at the interval ends, cuts the
/// feature out of each section and assembles the fixed skin and the movable
/// body into separate loops. Movable bodies are moved along the span by the
/// lateral gap, outboard at the inner station and inboard at the outer one.
/// Intervals longer than the feature's support threshold get an extra fixed
/// skin loop at their midpoint.
///
/// The pipeline keeps no state between runs; all topology goes into the
/// caller's store.
pub struct SectionBoundaryPipeline<'a> {
    surface: &'a LiftingSurface,
    projector: ChordProjector<'a>,
    config: PipelineConfig,
}

impl<'a> SectionBoundaryPipeline<'a> {
    /// Creates a pipeline with the default configuration.
    #[must_use]
    pub fn new(surface: &'a LiftingSurface) -> Self {
        Self {
            surface,
            projector: ChordProjector::new(surface),
            config: PipelineConfig::default(),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Runs one feature over the span interval `[inner, outer]`.
    ///
    /// For a wingtip closure `inner` is the pre-tip station and `outer` the
    /// tip; one closure loop is built per chord fraction.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidInterval`] unless
    /// `0 <= inner < outer <= 1`, the recipe's validation error, or the first
    /// construction failure wrapped with its point, station and feature.
    pub fn run(
        &self,
        store: &mut TopologyStore,
        inner: f64,
        outer: f64,
        recipe: &FeatureRecipe,
    ) -> Result<SectionBoundaries> {
        self.check(inner, outer)?;
        recipe.validate()?;
        let span = info_span!("section_boundaries", feature = recipe.name(), inner, outer);
        let _enter = span.enter();

        let boundaries = match recipe {
            FeatureRecipe::Symmetric(r) => self.flap(store, inner, outer, r, recipe.name()),
            FeatureRecipe::NonSymmetric(r) => self.flap(store, inner, outer, r, recipe.name()),
            FeatureRecipe::Fowler(_) => Err(ConfigurationError::UnsupportedFeature(FowlerFlap::NAME).into()),
            FeatureRecipe::Slat(r) => self.slat(store, inner, outer, r),
            FeatureRecipe::WingTipClosure(r) => self.tip(store, inner, outer, r),
        }?;
        info!(loops = boundaries.len(), "feature run complete");
        Ok(boundaries)
    }

    /// Runs a trailing-edge flap and a leading-edge slat together.
    ///
    /// Each station gets one fixed skin loop carrying both coves, one flap
    /// loop and one slat loop. The support station uses the smaller of the
    /// two thresholds.
    ///
    /// # Errors
    ///
    /// As [`SectionBoundaryPipeline::run`]; additionally
    /// [`ConfigurationError::InvalidRecipe`] if `flap` is not a flap recipe or
    /// the flap cut reaches forward of the slat cut.
    pub fn run_with_slat(
        &self,
        store: &mut TopologyStore,
        inner: f64,
        outer: f64,
        flap: &FeatureRecipe,
        slat: &SlatRecipe,
    ) -> Result<SectionBoundaries> {
        self.check(inner, outer)?;
        flap.validate()?;
        slat.validate()?;
        let construction: &dyn FlapConstruction = match flap {
            FeatureRecipe::Symmetric(r) => r,
            FeatureRecipe::NonSymmetric(r) => r,
            other => {
                return Err(ConfigurationError::InvalidRecipe(format!(
                    "{} cannot be combined with a slat",
                    other.name()
                ))
                .into())
            }
        };
        let span = info_span!("section_boundaries", feature = HIGH_LIFT, inner, outer);
        let _enter = span.enter();

        let flap_name = flap.name();
        let (flap_inner, flap_outer) = construction.ratios();
        let mut out = SectionBoundaries::new(HIGH_LIFT);
        let ends = [
            (inner, flap_inner, slat.inner_chord_ratio, StationKind::Inner),
            (outer, flap_outer, slat.outer_chord_ratio, StationKind::Outer),
        ];
        for (station, flap_ratio, slat_ratio, kind) in ends {
            let geometry = self.geometry(station)?;
            let flap_builder = StationBuilder::new(&geometry, &self.config, flap_name);
            let slat_builder = StationBuilder::new(&geometry, &self.config, SlatRecipe::NAME);
            let aft = construction.cut(&flap_builder, store, flap_ratio)?;
            let fore = slat_cut(slat, &slat_builder, store, slat_ratio)?;
            let fixed = Self::high_lift_skin(&flap_builder, store, &aft, &fore)?;
            self.close(store, &mut out, fixed, LoopRole::WingCut, station, kind)?;
            let body = self.shift(store, aft.body, kind, construction.lateral_gap())?;
            self.close(store, &mut out, body, LoopRole::Flap, station, kind)?;
            let body = self.shift(store, fore.body, kind, slat.lateral_gap)?;
            self.close(store, &mut out, body, LoopRole::Slat, station, kind)?;
        }

        let threshold = construction.support_threshold().min(slat.support_threshold);
        if let Some(mid) = self.support_station(inner, outer, threshold) {
            let geometry = self.geometry(mid)?;
            let flap_builder = StationBuilder::new(&geometry, &self.config, flap_name);
            let slat_builder = StationBuilder::new(&geometry, &self.config, SlatRecipe::NAME);
            let aft = construction.cut(&flap_builder, store, 0.5 * (flap_inner + flap_outer))?;
            let slat_ratio = 0.5 * (slat.inner_chord_ratio + slat.outer_chord_ratio);
            let fore = slat_cut(slat, &slat_builder, store, slat_ratio)?;
            let fixed = Self::high_lift_skin(&flap_builder, store, &aft, &fore)?;
            self.close(store, &mut out, fixed, LoopRole::WingCut, mid, StationKind::Support)?;
        }
        info!(loops = out.len(), "feature run complete");
        Ok(out)
    }

    /// Loops of the unmodified wing over `[inner, outer]`: the airfoil and
    /// its trailing-edge closure at each end, plus a support station for
    /// intervals longer than the configured clean threshold.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidInterval`] for a bad interval or
    /// the first construction failure.
    pub fn clean(&self, store: &mut TopologyStore, inner: f64, outer: f64) -> Result<SectionBoundaries> {
        self.check(inner, outer)?;
        let span = info_span!("section_boundaries", feature = CLEAN, inner, outer);
        let _enter = span.enter();

        let mut stations = vec![(inner, StationKind::Inner), (outer, StationKind::Outer)];
        if let Some(mid) = self.support_station(inner, outer, self.config.clean_support_threshold) {
            stations.push((mid, StationKind::Support));
        }
        let mut out = SectionBoundaries::new(CLEAN);
        for (station, kind) in stations {
            let geometry = self.geometry(station)?;
            let b = StationBuilder::new(&geometry, &self.config, CLEAN);
            let mut edges = vec![b.skin(store)?];
            edges.extend(b.trailing_edge_closure(store)?);
            self.close(store, &mut out, edges, LoopRole::WingClean, station, kind)?;
        }
        Ok(out)
    }

    fn check(&self, inner: f64, outer: f64) -> Result<()> {
        self.config.validate()?;
        let unit = 0.0..=1.0;
        if unit.contains(&inner) && unit.contains(&outer) && inner < outer {
            Ok(())
        } else {
            Err(ConfigurationError::InvalidInterval { inner, outer }.into())
        }
    }

    fn geometry(&self, station: f64) -> Result<StationGeometry> {
        self.projector.section(station)
    }

    fn support_station(&self, inner: f64, outer: f64, threshold: f64) -> Option<f64> {
        ((outer - inner) * self.surface.semi_span() > threshold).then_some(0.5 * (inner + outer))
    }

    /// Copies the movable body along the span by the lateral gap.
    fn shift(&self, store: &mut TopologyStore, body: Vec<EdgeId>, kind: StationKind, gap: f64) -> Result<Vec<EdgeId>> {
        let sign = match kind {
            StationKind::Inner => 1.0,
            StationKind::Outer => -1.0,
            StationKind::Support => return Ok(body),
        };
        Translate::new(body, self.surface.span_axis() * (sign * gap)).execute(store)
    }

    fn close(
        &self,
        store: &mut TopologyStore,
        out: &mut SectionBoundaries,
        edges: Vec<EdgeId>,
        role: LoopRole,
        station: f64,
        kind: StationKind,
    ) -> Result<()> {
        let count = edges.len();
        let wire = AssembleLoop::new(edges)
            .with_tolerance(self.config.connection_tolerance)
            .execute(store)
            .map_err(|err| err.during(role.label(), station, out.feature))?;
        debug!(?role, ?kind, station, edges = count, "assembled boundary loop");
        out.push(BoundaryLoop {
            role,
            wire,
            station,
            kind,
        });
        Ok(())
    }

    fn flap<F: FlapConstruction>(
        &self,
        store: &mut TopologyStore,
        inner: f64,
        outer: f64,
        recipe: &F,
        name: &'static str,
    ) -> Result<SectionBoundaries> {
        let (ratio_inner, ratio_outer) = recipe.ratios();
        let mut out = SectionBoundaries::new(name);
        for (station, ratio, kind) in [
            (inner, ratio_inner, StationKind::Inner),
            (outer, ratio_outer, StationKind::Outer),
        ] {
            let geometry = self.geometry(station)?;
            let b = StationBuilder::new(&geometry, &self.config, name);
            let cut = recipe.cut(&b, store, ratio)?;
            let fixed = Self::flap_skin(&b, store, &cut)?;
            self.close(store, &mut out, fixed, LoopRole::WingCut, station, kind)?;
            let body = self.shift(store, cut.body, kind, recipe.lateral_gap())?;
            self.close(store, &mut out, body, LoopRole::Flap, station, kind)?;
        }
        if let Some(mid) = self.support_station(inner, outer, recipe.support_threshold()) {
            let geometry = self.geometry(mid)?;
            let b = StationBuilder::new(&geometry, &self.config, name);
            let cut = recipe.cut(&b, store, 0.5 * (ratio_inner + ratio_outer))?;
            let fixed = Self::flap_skin(&b, store, &cut)?;
            self.close(store, &mut out, fixed, LoopRole::WingCut, mid, StationKind::Support)?;
        }
        Ok(out)
    }

    fn slat(&self, store: &mut TopologyStore, inner: f64, outer: f64, recipe: &SlatRecipe) -> Result<SectionBoundaries> {
        let mut out = SectionBoundaries::new(SlatRecipe::NAME);
        for (station, ratio, kind) in [
            (inner, recipe.inner_chord_ratio, StationKind::Inner),
            (outer, recipe.outer_chord_ratio, StationKind::Outer),
        ] {
            let geometry = self.geometry(station)?;
            let b = StationBuilder::new(&geometry, &self.config, SlatRecipe::NAME);
            let cut = slat_cut(recipe, &b, store, ratio)?;
            let fixed = Self::slat_skin(&b, store, &cut)?;
            self.close(store, &mut out, fixed, LoopRole::WingCut, station, kind)?;
            let body = self.shift(store, cut.body, kind, recipe.lateral_gap)?;
            self.close(store, &mut out, body, LoopRole::Slat, station, kind)?;
        }
        if let Some(mid) = self.support_station(inner, outer, recipe.support_threshold) {
            let geometry = self.geometry(mid)?;
            let b = StationBuilder::new(&geometry, &self.config, SlatRecipe::NAME);
            let ratio = 0.5 * (recipe.inner_chord_ratio + recipe.outer_chord_ratio);
            let cut = slat_cut(recipe, &b, store, ratio)?;
            let fixed = Self::slat_skin(&b, store, &cut)?;
            self.close(store, &mut out, fixed, LoopRole::WingCut, mid, StationKind::Support)?;
        }
        Ok(out)
    }

    fn tip(&self, store: &mut TopologyStore, inner: f64, outer: f64, recipe: &TipClosure) -> Result<SectionBoundaries> {
        let tip_geometry = self.geometry(outer)?;
        let pre_geometry = self.geometry(inner)?;
        let tip = StationBuilder::new(&tip_geometry, &self.config, TipClosure::NAME);
        let pre_tip = StationBuilder::new(&pre_geometry, &self.config, TipClosure::NAME);
        let mut out = SectionBoundaries::new(TipClosure::NAME);
        for edges in tip_closure(recipe, &tip, &pre_tip, store)? {
            self.close(store, &mut out, edges.to_vec(), LoopRole::TipClosure, outer, StationKind::Outer)?;
        }
        Ok(out)
    }

    /// Fixed skin ahead of a flap: the airfoil from the upper cut round the
    /// leading edge to the lower cut, closed by the cove.
    fn flap_skin(b: &StationBuilder<'_>, store: &mut TopologyStore, cut: &Cut) -> Result<Vec<EdgeId>> {
        let skin = b.skin(store)?;
        let mut edges = vec![b.trim_between(store, skin, &cut.upper, &cut.lower)?];
        edges.extend(&cut.cove);
        Ok(edges)
    }

    /// Fixed skin aft of a slat: upper skin back to the trailing edge, lower
    /// skin forward to the cove.
    fn slat_skin(b: &StationBuilder<'_>, store: &mut TopologyStore, cut: &Cut) -> Result<Vec<EdgeId>> {
        let skin = b.skin(store)?;
        let mut edges = vec![b.split_keep(store, skin, &cut.upper, Extreme::Shortest)?];
        edges.extend(&cut.cove);
        edges.push(b.split_keep(store, skin, &cut.lower, Extreme::Shortest)?);
        edges.extend(b.trailing_edge_closure(store)?);
        Ok(edges)
    }

    /// Fixed skin between a slat and a flap, carrying both coves.
    fn high_lift_skin(b: &StationBuilder<'_>, store: &mut TopologyStore, flap: &Cut, slat: &Cut) -> Result<Vec<EdgeId>> {
        let ordered = |a: &SectionPoint, b: &SectionPoint| {
            matches!((a.airfoil_parameter(), b.airfoil_parameter()), (Some(x), Some(y)) if x < y)
        };
        if !(ordered(&flap.upper, &slat.upper) && ordered(&slat.lower, &flap.lower)) {
            let err = ConfigurationError::InvalidRecipe("the flap cut reaches forward of the slat cut".into());
            return b.step(flap.upper.name, Err(err.into()));
        }
        let skin = b.skin(store)?;
        let mut edges = vec![b.trim_between(store, skin, &flap.upper, &slat.upper)?];
        edges.extend(&slat.cove);
        edges.push(b.trim_between(store, skin, &slat.lower, &flap.lower)?);
        edges.extend(&flap.cove);
        Ok(edges)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::aircraft::{AirfoilSection, SurfaceKind};
    use crate::error::WingcutError;
    use crate::math::Vector3;
    use crate::operations::query::{EnclosedArea, Perimeter};
    use crate::geometry::Line;
    use crate::math::Point3;
    use crate::operations::creation::MakeEdge;
    use crate::section::recipe::{NonSymmetricFlap, SymmetricFlap};
    use approx::assert_relative_eq;
    use test_case::test_case;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn wing(code: &str, semi_span: f64) -> LiftingSurface {
        LiftingSurface::rectangular(
            SurfaceKind::Wing,
            1.0,
            semi_span,
            AirfoilSection::naca4(code, 60).unwrap(),
        )
        .unwrap()
    }

    fn symmetric(lateral_gap: f64) -> FeatureRecipe {
        FeatureRecipe::Symmetric(SymmetricFlap {
            lateral_gap,
            ..SymmetricFlap::default()
        })
    }

    fn area(store: &TopologyStore, boundary: &BoundaryLoop) -> f64 {
        EnclosedArea::new(boundary.wire, Vector3::y())
            .execute(store)
            .unwrap()
            .abs()
    }

    /// Area of a NACA 00xx section from the leading edge to `x`, unit chord.
    fn naca_area(t: f64, x: f64) -> f64 {
        10.0 * t
            * (0.2969 * (2.0 / 3.0) * x.powf(1.5) - 0.126 * x * x / 2.0 - 0.3516 * x.powi(3) / 3.0
                + 0.2843 * x.powi(4) / 4.0
                - 0.1036 * x.powi(5) / 5.0)
    }

    /// Half thickness of a NACA 00xx section and its slope, unit chord.
    fn naca_half(t: f64, x: f64) -> (f64, f64) {
        let y = 5.0 * t * (0.2969 * x.sqrt() - 0.126 * x - 0.3516 * x * x + 0.2843 * x.powi(3) - 0.1036 * x.powi(4));
        let dy = 5.0
            * t
            * (0.5 * 0.2969 / x.sqrt() - 0.126 - 2.0 * 0.3516 * x + 3.0 * 0.2843 * x * x
                - 4.0 * 0.1036 * x.powi(3));
        (y, dy)
    }

    /// Area between the two nose curves of a symmetric flap and the
    /// thickness line at `x_trim`. Each nose curve is the cubic leaving the
    /// skin at `x_trim` along its tangent and meeting the chord at `x_nose`
    /// square to it, with unit end tangents over chord-length parameters.
    fn nose_cap_area(t: f64, x_trim: f64, x_nose: f64) -> f64 {
        let (y, dy) = naca_half(t, x_trim);
        let reach = (x_trim - x_nose).hypot(y) / 3.0;
        let norm = dy.hypot(1.0);
        let ctrl = [
            (x_trim, y),
            (x_trim - reach / norm, y - reach * dy / norm),
            (x_nose, reach),
            (x_nose, 0.0),
        ];
        let at = |s: f64| {
            let w = [(1.0 - s).powi(3), 3.0 * s * (1.0 - s).powi(2), 3.0 * s * s * (1.0 - s), s.powi(3)];
            ctrl.iter()
                .zip(w)
                .fold((0.0, 0.0), |(x, z), (c, w)| (x + w * c.0, z + w * c.1))
        };
        let n = 2000;
        let mut half = 0.0;
        for i in 0..n {
            let (x0, z0) = at(f64::from(i) / f64::from(n));
            let (x1, z1) = at(f64::from(i + 1) / f64::from(n));
            half += 0.5 * (x0 - x1) * (z0 + z1);
        }
        2.0 * half
    }

    #[test]
    fn symmetric_flap_leaves_the_forward_section() {
        init_tracing();
        let surface = wing("0012", 5.0);
        let mut store = TopologyStore::new();
        let out = SectionBoundaryPipeline::new(&surface)
            .run(&mut store, 0.2, 0.4, &symmetric(0.0))
            .unwrap();

        assert_eq!(out.feature, SymmetricFlap::NAME);
        assert_eq!(out.len(), 4);
        assert_eq!(out.with_role(LoopRole::WingCut).count(), 2);
        assert_eq!(out.with_role(LoopRole::Flap).count(), 2);
        assert_eq!(out.at(StationKind::Support).count(), 0);

        // Default recipe on a unit chord: ratio 0.3, cove gap 0.03, nose 0.09.
        let (cut_x, nose_x, trim_x) = (1.0 - 0.33, 1.0 - 0.3, 1.0 - 0.21);
        let fixed = out.with_role(LoopRole::WingCut).next().unwrap();
        assert_eq!(fixed.kind, StationKind::Inner);
        let fixed_area = area(&store, fixed);
        assert_relative_eq!(fixed_area, naca_area(0.12, cut_x), max_relative = 0.01);

        let flap = out.with_role(LoopRole::Flap).next().unwrap();
        let cap = nose_cap_area(0.12, trim_x, nose_x);
        let flap_area = area(&store, flap);
        let expected_flap = naca_area(0.12, 1.0) - naca_area(0.12, trim_x) + cap;
        assert_relative_eq!(flap_area, expected_flap, max_relative = 0.01);

        // Fixed skin, flap and the open cove gap make up the whole section.
        let cove_gap = naca_area(0.12, trim_x) - naca_area(0.12, cut_x) - cap;
        assert_relative_eq!(
            fixed_area + flap_area + cove_gap,
            naca_area(0.12, 1.0),
            max_relative = 0.005
        );
    }

    #[test]
    fn deep_flap_cuts_keep_the_forward_skin() {
        let surface = wing("0012", 5.0);
        let mut store = TopologyStore::new();
        let recipe = SymmetricFlap {
            inner_chord_ratio: 0.6,
            outer_chord_ratio: 0.6,
            gap_factor: 0.2,
            ..SymmetricFlap::default()
        };
        recipe.validate().unwrap();
        let out = SectionBoundaryPipeline::new(&surface)
            .run(&mut store, 0.2, 0.4, &FeatureRecipe::Symmetric(recipe))
            .unwrap();
        assert_eq!(out.with_role(LoopRole::WingCut).count(), 2);
        assert_eq!(out.with_role(LoopRole::Flap).count(), 2);

        // The cut sits 0.72 of the chord from the trailing edge; the cove
        // reaches at most one lip depth further aft.
        let fixed = area(&store, out.with_role(LoopRole::WingCut).next().unwrap());
        assert!(fixed > 0.99 * naca_area(0.12, 0.28));
        assert!(fixed < naca_area(0.12, 0.28 + 0.08 * 0.12));
    }

    #[test]
    fn open_loops_report_their_station_and_feature() {
        let surface = wing("0012", 5.0);
        let mut store = TopologyStore::new();
        let segment = |a: f64, b: f64| Line::between(Point3::new(a, 0.0, 0.0), Point3::new(b, 0.0, 0.0)).unwrap();
        let edges = vec![
            MakeEdge::whole(segment(0.0, 1.0)).execute(&mut store).unwrap(),
            MakeEdge::whole(segment(2.0, 3.0)).execute(&mut store).unwrap(),
        ];
        let mut out = SectionBoundaries::new(SymmetricFlap::NAME);
        let err = SectionBoundaryPipeline::new(&surface)
            .close(&mut store, &mut out, edges, LoopRole::Flap, 0.25, StationKind::Inner)
            .unwrap_err();

        match &err {
            WingcutError::Construction {
                point,
                station,
                feature,
                ..
            } => {
                assert_eq!(*point, "flap loop");
                assert_relative_eq!(*station, 0.25);
                assert_eq!(*feature, SymmetricFlap::NAME);
            }
            other => panic!("expected construction context, got {other}"),
        }
        assert!(matches!(err.root(), WingcutError::Topology(_)));
        assert!(out.is_empty());
    }

    #[test]
    fn flap_bodies_are_moved_by_the_lateral_gap() {
        let surface = wing("0012", 5.0);
        let mut store = TopologyStore::new();
        let out = SectionBoundaryPipeline::new(&surface)
            .run(&mut store, 0.2, 0.4, &symmetric(0.05))
            .unwrap();
        let y_of = |boundary: &BoundaryLoop| {
            let wire = store.wire(boundary.wire).unwrap();
            store.edge_endpoints(wire.edges[0].edge).unwrap().0.y
        };
        let flaps: Vec<_> = out.with_role(LoopRole::Flap).collect();
        assert_relative_eq!(y_of(flaps[0]), 1.0 + 0.05, epsilon = 1e-9);
        assert_relative_eq!(y_of(flaps[1]), 2.0 - 0.05, epsilon = 1e-9);
        let fixed = out.with_role(LoopRole::WingCut).next().unwrap();
        assert_relative_eq!(y_of(fixed), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn non_symmetric_flap_on_a_cambered_wing() {
        let surface = wing("2412", 5.0);
        let mut store = TopologyStore::new();
        let recipe = FeatureRecipe::NonSymmetric(NonSymmetricFlap::default());
        let out = SectionBoundaryPipeline::new(&surface)
            .run(&mut store, 0.1, 0.3, &recipe)
            .unwrap();
        assert_eq!(out.with_role(LoopRole::WingCut).count(), 2);
        assert_eq!(out.with_role(LoopRole::Flap).count(), 2);
    }

    #[test]
    fn long_intervals_get_a_support_section() {
        let surface = wing("0012", 20.0);
        let mut store = TopologyStore::new();
        let out = SectionBoundaryPipeline::new(&surface)
            .run(&mut store, 0.1, 0.5, &symmetric(0.025))
            .unwrap();
        let support: Vec<_> = out.at(StationKind::Support).collect();
        assert_eq!(support.len(), 1);
        assert_eq!(support[0].role, LoopRole::WingCut);
        assert_relative_eq!(support[0].station, 0.3);
    }

    #[test]
    fn slat_run_builds_skin_and_slat_loops() {
        let surface = wing("2412", 5.0);
        let mut store = TopologyStore::new();
        let recipe = FeatureRecipe::Slat(SlatRecipe::default());
        let out = SectionBoundaryPipeline::new(&surface)
            .run(&mut store, 0.2, 0.4, &recipe)
            .unwrap();
        assert_eq!(out.with_role(LoopRole::WingCut).count(), 2);
        assert_eq!(out.with_role(LoopRole::Slat).count(), 2);
        let fixed = out.with_role(LoopRole::WingCut).next().unwrap();
        let slat = out.with_role(LoopRole::Slat).next().unwrap();
        assert!(area(&store, slat) < area(&store, fixed));
    }

    #[test]
    fn flap_and_slat_share_the_fixed_skin() {
        let surface = wing("2412", 5.0);
        let mut store = TopologyStore::new();
        let out = SectionBoundaryPipeline::new(&surface)
            .run_with_slat(&mut store, 0.2, 0.4, &symmetric(0.025), &SlatRecipe::default())
            .unwrap();
        assert_eq!(out.feature, HIGH_LIFT);
        assert_eq!(out.len(), 6);
        for role in [LoopRole::WingCut, LoopRole::Flap, LoopRole::Slat] {
            assert_eq!(out.with_role(role).count(), 2);
        }
        let fixed = out.with_role(LoopRole::WingCut).next().unwrap();
        let wire = store.wire(fixed.wire).unwrap();
        assert_eq!(wire.edges.len(), 2 + 2 + 4);
    }

    #[test]
    fn slat_is_not_a_flap() {
        let surface = wing("0012", 5.0);
        let mut store = TopologyStore::new();
        let err = SectionBoundaryPipeline::new(&surface)
            .run_with_slat(
                &mut store,
                0.2,
                0.4,
                &FeatureRecipe::Slat(SlatRecipe::default()),
                &SlatRecipe::default(),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            WingcutError::Configuration(ConfigurationError::InvalidRecipe(_))
        ));
    }

    #[test]
    fn fowler_flap_is_unsupported() {
        let surface = wing("0012", 5.0);
        let mut store = TopologyStore::new();
        let err = SectionBoundaryPipeline::new(&surface)
            .run(&mut store, 0.2, 0.4, &FeatureRecipe::Fowler(FowlerFlap::default()))
            .unwrap_err();
        assert!(matches!(
            err,
            WingcutError::Configuration(ConfigurationError::UnsupportedFeature(_))
        ));
        assert_eq!(store.edge_count(), 0);
    }

    #[test_case(0.4, 0.2 ; "reversed")]
    #[test_case(0.3, 0.3 ; "empty")]
    #[test_case(-0.1, 0.5 ; "inboard of the root")]
    #[test_case(0.5, 1.1 ; "beyond the tip")]
    fn rejects_bad_intervals(inner: f64, outer: f64) {
        let surface = wing("0012", 5.0);
        let mut store = TopologyStore::new();
        let err = SectionBoundaryPipeline::new(&surface)
            .run(&mut store, inner, outer, &symmetric(0.0))
            .unwrap_err();
        assert!(matches!(
            err,
            WingcutError::Configuration(ConfigurationError::InvalidInterval { .. })
        ));
    }

    #[test]
    fn clean_sections_with_support() {
        let surface = wing("0012", 5.0);
        let mut store = TopologyStore::new();
        let pipeline = SectionBoundaryPipeline::new(&surface);
        let short = pipeline.clean(&mut store, 0.2, 0.3).unwrap();
        assert_eq!(short.len(), 2);
        let long = pipeline.clean(&mut store, 0.2, 0.6).unwrap();
        assert_eq!(long.len(), 3);
        let full = area(&store, &long.loops[2]);
        assert_relative_eq!(full, naca_area(0.12, 1.0), max_relative = 0.01);
    }

    #[test]
    fn tip_closure_run() {
        let surface = wing("0012", 5.0);
        let mut store = TopologyStore::new();
        let recipe = TipClosure::default();
        let count = recipe.chord_fractions.len();
        let out = SectionBoundaryPipeline::new(&surface)
            .run(&mut store, 0.98, 1.0, &FeatureRecipe::WingTipClosure(recipe))
            .unwrap();
        assert_eq!(out.with_role(LoopRole::TipClosure).count(), count);
        assert!(out.loops.iter().all(|l| l.kind == StationKind::Outer));
    }

    #[test]
    fn identical_inputs_give_identical_loops() {
        let surface = wing("2412", 5.0);
        let recipe = symmetric(0.025);
        let measure = || {
            let mut store = TopologyStore::new();
            let out = SectionBoundaryPipeline::new(&surface)
                .run(&mut store, 0.2, 0.4, &recipe)
                .unwrap();
            out.loops
                .iter()
                .map(|l| {
                    let a = area(&store, l).to_bits();
                    let p = Perimeter::new(l.wire).execute(&store).unwrap().to_bits();
                    (a, p)
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(measure(), measure());
    }

    #[test]
    fn rejects_an_invalid_config() {
        let surface = wing("0012", 5.0);
        let mut store = TopologyStore::new();
        let config = PipelineConfig {
            tangent_weight: 0.0,
            ..PipelineConfig::default()
        };
        let result = SectionBoundaryPipeline::new(&surface)
            .with_config(config)
            .clean(&mut store, 0.2, 0.4);
        assert!(result.is_err());
    }
}
