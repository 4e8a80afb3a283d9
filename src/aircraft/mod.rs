//! Parametric description of the lifting surfaces whose sections are cut.

mod airfoil;
mod lifting_surface;

pub use airfoil::AirfoilSection;
pub use lifting_surface::{LiftingSurface, SpanBreakpoint, SurfaceKind};
