use crate::topology::WireId;

/// What a boundary loop outlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoopRole {
    /// Complete airfoil of an unmodified section.
    WingClean,
    /// Fixed skin left after the movable surface is cut away.
    WingCut,
    Flap,
    Slat,
    /// Rounded closure beyond the tip section.
    TipClosure,
}

impl LoopRole {
    /// Name used when reporting a loop that fails to close.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::WingClean => "clean wing loop",
            Self::WingCut => "wing cut loop",
            Self::Flap => "flap loop",
            Self::Slat => "slat loop",
            Self::TipClosure => "tip closure loop",
        }
    }
}

/// Where along the span interval a loop was built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StationKind {
    Inner,
    Outer,
    /// Interpolated station at the middle of a long interval.
    Support,
}

/// A closed wire tagged with its role and station.
#[derive(Debug, Clone, Copy)]
pub struct BoundaryLoop {
    pub role: LoopRole,
    pub wire: WireId,
    /// Span fraction of the station.
    pub station: f64,
    pub kind: StationKind,
}

/// All loops produced by one feature run, in construction order.
#[derive(Debug, Clone)]
pub struct SectionBoundaries {
    pub feature: &'static str,
    pub loops: Vec<BoundaryLoop>,
}

impl SectionBoundaries {
    #[must_use]
    pub fn new(feature: &'static str) -> Self {
        Self {
            feature,
            loops: Vec::new(),
        }
    }

    pub fn push(&mut self, boundary: BoundaryLoop) {
        self.loops.push(boundary);
    }

    /// Loops with the given role.
    pub fn with_role(&self, role: LoopRole) -> impl Iterator<Item = &BoundaryLoop> {
        self.loops.iter().filter(move |l| l.role == role)
    }

    /// Loops built at the given kind of station.
    pub fn at(&self, kind: StationKind) -> impl Iterator<Item = &BoundaryLoop> {
        self.loops.iter().filter(move |l| l.kind == kind)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.loops.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.loops.is_empty()
    }
}
