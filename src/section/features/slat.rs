use crate::error::Result;
use crate::geometry::curve::Curve;
use crate::operations::query::Extreme;
use crate::section::chord::Datum;
use crate::section::construction::StationBuilder;
use crate::section::recipe::SlatRecipe;
use crate::topology::TopologyStore;

use super::Cut;

const LE: Datum = Datum::LeadingEdge;

/// Cuts a leading-edge slat at chord ratio `ratio`.
///
/// The cove runs from the upper cut down to the chord and back out to the
/// lower cut. The slat body is the nose skin closed by a trailing edge that
/// follows the cove at a gap, with a short lower detail curve.
pub(crate) fn slat_cut(
    recipe: &SlatRecipe,
    b: &StationBuilder<'_>,
    store: &mut TopologyStore,
    ratio: f64,
) -> Result<Cut> {
    let o = b.step("slat offsets", recipe.offsets(ratio))?;
    let lower_normal = b.lower_normal();

    let cut_upper = b.upper("upper cut", o.upper_cut, LE)?;
    let cut_lower = b.lower("lower cut", o.lower_cut, LE)?;
    let cove_apex = b.on_chord("cove apex", o.cove_apex, LE)?;
    let cove = vec![
        b.transition(store, &cut_upper, &cove_apex, b.skin_tangent(&cut_upper)?, lower_normal)?,
        b.transition(store, &cove_apex, &cut_lower, lower_normal, b.skin_tangent(&cut_lower)?)?,
    ];

    let trim_upper = b.upper("slat upper trim", o.body_upper, LE)?;
    let trim_lower = b.lower("slat lower trim", o.body_lower, LE)?;
    let detail = b.lower("slat lower detail", o.body_detail, LE)?;
    let apex = b.on_chord("slat apex", o.body_apex, LE)?;

    let skin = b.skin(store)?;
    let nose = b.split_keep(store, skin, &trim_upper, Extreme::Longest)?;
    let nose = b.split_keep(store, nose, &detail, Extreme::Shortest)?;

    let upper_te = b.transition(store, &trim_upper, &apex, b.skin_tangent(&trim_upper)?, lower_normal)?;
    let guide = b.transition_curve(&apex, &trim_lower, lower_normal, b.skin_tangent(&trim_lower)?)?;
    let (t, heel) = b.line_hit("slat heel", &guide, &detail, b.upper_normal())?;
    let guide_tangent = b.step("slat heel", guide.tangent(t))?;
    let lower_te = b.transition(store, &heel, &apex, -guide_tangent, -lower_normal)?;
    let detail_edge = b.weighted_transition(
        store,
        &heel,
        &detail,
        (guide_tangent, 2.0),
        (-b.skin_tangent(&detail)?, 2.0),
    )?;

    Ok(Cut {
        upper: cut_upper,
        lower: cut_lower,
        cove,
        body: vec![nose, detail_edge, lower_te, upper_te],
    })
}
