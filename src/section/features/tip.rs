use crate::error::{GeometryError, Result};
use crate::math::{unit, Vector3};
use crate::section::chord::Datum;
use crate::section::construction::StationBuilder;
use crate::section::recipe::TipClosure;
use crate::topology::{EdgeId, TopologyStore};

const LE: Datum = Datum::LeadingEdge;

fn direction(builder: &StationBuilder<'_>, point: &'static str, v: Vector3) -> Result<Vector3> {
    builder.step(point, unit(&v).ok_or_else(|| GeometryError::ZeroVector.into()))
}

/// Vertical closure curves beyond the tip, one triple of edges per chord
/// fraction: upper point to apex, apex to lower point, then the straight
/// thickness segment back up.
///
/// `tip` builds at the tip station and `pre_tip` at a station just inboard
/// of it; the pair gives the spanwise run of the surface at the tip.
pub(crate) fn tip_closure(
    recipe: &TipClosure,
    tip: &StationBuilder<'_>,
    pre_tip: &StationBuilder<'_>,
    store: &mut TopologyStore,
) -> Result<Vec<[EdgeId; 3]>> {
    let tip_chord = tip.chord();
    let run = tip_chord.leading_edge() - pre_tip.chord().leading_edge();
    let outboard = direction(tip, "tip apex", run)?;
    let apex_tangent = direction(
        tip,
        "tip apex",
        (tip_chord.trailing_edge() - tip_chord.leading_edge()).cross(&run),
    )?;

    let mut closures = Vec::with_capacity(recipe.chord_fractions.len());
    for &fraction in &recipe.chord_fractions {
        let (upper, lower) = tip.both("tip upper", "tip lower", fraction, LE)?;
        let (pre_upper, pre_lower) = pre_tip.both("pre-tip upper", "pre-tip lower", fraction, LE)?;
        let base = tip.on_chord("tip chord point", fraction, LE)?;

        let upper_run = direction(tip, upper.name, upper.point - pre_upper.point)?;
        let lower_run = direction(tip, lower.name, lower.point - pre_lower.point)?;
        let thickness = (upper.point - lower.point).norm();
        let height = recipe.apex_height_ratio * thickness;
        let apex = StationBuilder::free("tip apex", base.point + outboard * height);
        let weight = (0.5 * thickness / height).powf(recipe.weight_exponent);

        closures.push([
            tip.weighted_transition(store, &upper, &apex, (upper_run, 1.0), (-apex_tangent, weight))?,
            tip.weighted_transition(store, &apex, &lower, (-apex_tangent, weight), (-lower_run, 1.0))?,
            tip.segment(store, &lower, &upper)?,
        ]);
    }
    Ok(closures)
}
