//! Per-feature point and curve constructions.
//!
//! Each construction works on one station through a [`StationBuilder`] and
//! returns bare edges; the pipeline decides which edges close into which
//! loop and where movable bodies are translated.

mod flap;
mod slat;
mod tip;

pub(crate) use slat::slat_cut;
pub(crate) use tip::tip_closure;

use crate::error::Result;
use crate::topology::{EdgeId, TopologyStore};

use super::construction::StationBuilder;
use super::locator::SectionPoint;

/// Result of cutting a movable surface out of one section.
#[derive(Debug)]
pub(crate) struct Cut {
    /// Where the fixed skin ends on the upper surface.
    pub upper: SectionPoint,
    /// Where the fixed skin ends on the lower surface.
    pub lower: SectionPoint,
    /// Cove edges of the fixed part, in adjacency order between the cut
    /// points: from `lower` for flaps, from `upper` for slats.
    pub cove: Vec<EdgeId>,
    /// Closed outline of the movable part, in adjacency order.
    pub body: Vec<EdgeId>,
}

/// A trailing-edge device cut at a given chord ratio.
pub(crate) trait FlapConstruction {
    /// Builds the cove and the flap body at the builder's station.
    fn cut(&self, builder: &StationBuilder<'_>, store: &mut TopologyStore, ratio: f64) -> Result<Cut>;

    /// Chord ratios at the inner and outer stations.
    fn ratios(&self) -> (f64, f64);

    /// Spanwise clearance applied to the flap body, in meters.
    fn lateral_gap(&self) -> f64;

    /// Interval length above which a support station is added, in meters.
    fn support_threshold(&self) -> f64;
}
