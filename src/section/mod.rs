//! Section boundary synthesis: named construction points on the chord and
//! airfoil of a station, and the closed loops that outline movable surfaces
//! and the fixed skin around them.

mod chord;
mod config;
mod construction;
mod features;
mod locator;
mod loops;
mod pipeline;
mod recipe;

pub use chord::{ChordProjector, ChordSegment, Datum, StationGeometry};
pub use config::PipelineConfig;
pub use locator::{Anchor, SectionPoint, SectionPointLocator, Side};
pub use loops::{BoundaryLoop, LoopRole, SectionBoundaries, StationKind};
pub use pipeline::SectionBoundaryPipeline;
pub use recipe::{FeatureRecipe, FowlerFlap, NonSymmetricFlap, SlatRecipe, SymmetricFlap, TipClosure};
