use crate::error::Result;
use crate::operations::query::Extreme;
use crate::section::chord::Datum;
use crate::section::construction::StationBuilder;
use crate::section::locator::SectionPoint;
use crate::section::recipe::{NonSymmetricFlap, SymmetricFlap};
use crate::topology::{EdgeId, TopologyStore};

use super::{Cut, FlapConstruction};

const TE: Datum = Datum::TrailingEdge;

/// Skin from the trailing edge to `upper`, the nose curves, skin from
/// `lower` back to the trailing edge, then the base closure if open.
fn flap_body(
    builder: &StationBuilder<'_>,
    store: &mut TopologyStore,
    trims: (&SectionPoint, &SectionPoint),
    nose: [EdgeId; 2],
) -> Result<Vec<EdgeId>> {
    let (upper, lower) = trims;
    let skin = builder.skin(store)?;
    let mut body = vec![builder.split_keep(store, skin, upper, Extreme::Shortest)?];
    body.extend(nose);
    body.push(builder.split_keep(store, skin, lower, Extreme::Shortest)?);
    body.extend(builder.trailing_edge_closure(store)?);
    Ok(body)
}

impl FlapConstruction for SymmetricFlap {
    fn cut(&self, b: &StationBuilder<'_>, store: &mut TopologyStore, ratio: f64) -> Result<Cut> {
        let gap = self.gap_factor * ratio;
        let lip = self.lip_factor * gap;
        let nose = self.nose_factor * gap;

        let (lip_upper, lip_lower) = b.both("upper lip", "lower lip", ratio + gap - lip, TE)?;
        let (cut_upper, cut_lower) = b.both("upper cut", "lower cut", ratio + gap, TE)?;
        let inset_upper = b.inward_of("upper lip inset", &lip_upper, lip)?;
        let inset_lower = b.inward_of("lower lip inset", &lip_lower, lip)?;
        let cove_apex = b.on_chord("cove apex", ratio + gap, TE)?;

        let inward_upper = b.inward(&lip_upper)?;
        let inward_lower = b.inward(&lip_lower)?;
        let lower_normal = b.lower_normal();
        let cove = vec![
            b.transition(store, &cut_lower, &inset_lower, b.skin_tangent(&cut_lower)?, inward_lower)?,
            b.transition(store, &inset_lower, &cove_apex, inward_lower, -lower_normal)?,
            b.transition(store, &inset_upper, &cove_apex, inward_upper, lower_normal)?,
            b.transition(store, &cut_upper, &inset_upper, -b.skin_tangent(&cut_upper)?, inward_upper)?,
        ];

        let (trim_upper, trim_lower) = b.both("flap upper trim", "flap lower trim", ratio - nose, TE)?;
        let flap_nose = b.on_chord("flap nose", ratio, TE)?;
        let nose_edges = [
            b.transition(store, &trim_upper, &flap_nose, b.skin_tangent(&trim_upper)?, lower_normal)?,
            b.transition(store, &trim_lower, &flap_nose, -b.skin_tangent(&trim_lower)?, -lower_normal)?,
        ];
        let body = flap_body(b, store, (&trim_upper, &trim_lower), nose_edges)?;

        Ok(Cut {
            upper: cut_upper,
            lower: cut_lower,
            cove,
            body,
        })
    }

    fn ratios(&self) -> (f64, f64) {
        (self.inner_chord_ratio, self.outer_chord_ratio)
    }

    fn lateral_gap(&self) -> f64 {
        self.lateral_gap
    }

    fn support_threshold(&self) -> f64 {
        self.support_threshold
    }
}

impl FlapConstruction for NonSymmetricFlap {
    fn cut(&self, b: &StationBuilder<'_>, store: &mut TopologyStore, ratio: f64) -> Result<Cut> {
        let overhang = self.upper_overhang;
        let gap = self.gap_factor * overhang;
        let lip = self.lip_factor * gap;
        let trim = self.lower_trim_factor * ratio;
        let lower_gap = self.lower_gap_factor * trim;
        let nose = self.nose_factor * trim;

        // Fixed part: the upper skin overhangs the flap nose.
        let cut_upper = b.upper("upper cut", overhang + gap, TE)?;
        let cove_lower = b.lower("lower cove", ratio, TE)?;
        let cut_lower = b.lower("lower cut", ratio + lower_gap, TE)?;
        let cove_inset = b.inward_of("lower cove inset", &cove_lower, lower_gap)?;
        let lip_inset = b.inward_of("upper lip inset", &cut_upper, lip)?;

        let inward_cove = b.inward(&cove_lower)?;
        let upper_tangent = b.skin_tangent(&cut_upper)?;
        let cove = vec![
            b.transition(store, &cut_lower, &cove_inset, b.skin_tangent(&cut_lower)?, inward_cove)?,
            b.transition(store, &cove_inset, &lip_inset, inward_cove, -upper_tangent)?,
            b.transition(store, &cut_upper, &lip_inset, b.inward(&cut_upper)?, upper_tangent)?,
        ];

        // Movable part.
        let trim_upper = b.upper("flap upper trim", overhang, TE)?;
        let trim_lower = b.lower("flap lower trim", ratio - trim, TE)?;
        let nose_lower = b.lower("flap nose lower", ratio - trim + nose, TE)?;
        let flap_nose = b.inward_of("flap nose", &nose_lower, nose)?;
        let inward_nose = b.inward(&nose_lower)?;
        let nose_edges = [
            b.transition(store, &trim_upper, &flap_nose, b.skin_tangent(&trim_upper)?, -inward_nose)?,
            b.transition(store, &trim_lower, &flap_nose, -b.skin_tangent(&trim_lower)?, inward_nose)?,
        ];
        let body = flap_body(b, store, (&trim_upper, &trim_lower), nose_edges)?;

        Ok(Cut {
            upper: cut_upper,
            lower: cut_lower,
            cove,
            body,
        })
    }

    fn ratios(&self) -> (f64, f64) {
        (self.inner_chord_ratio, self.outer_chord_ratio)
    }

    fn lateral_gap(&self) -> f64 {
        self.lateral_gap
    }

    fn support_threshold(&self) -> f64 {
        self.support_threshold
    }
}
