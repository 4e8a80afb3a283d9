use thiserror::Error;

/// Top-level error type for section boundary synthesis.
#[derive(Debug, Error)]
pub enum WingcutError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Intersection(#[from] IntersectionError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Operation(#[from] OperationError),

    /// A named construction step of a feature run failed.
    #[error("{feature}: construction of `{point}` at station {station} failed: {source}")]
    Construction {
        point: &'static str,
        station: f64,
        feature: &'static str,
        #[source]
        source: Box<WingcutError>,
    },
}

impl WingcutError {
    /// Wraps an error with the construction point, station and feature it occurred in.
    #[must_use]
    pub fn during(self, point: &'static str, station: f64, feature: &'static str) -> Self {
        Self::Construction {
            point,
            station,
            feature,
            source: Box::new(self),
        }
    }

    /// Returns the innermost error, unwrapping construction context.
    #[must_use]
    pub fn root(&self) -> &WingcutError {
        match self {
            Self::Construction { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("parameter {parameter} = {value} is out of range [{min}, {max}]")]
    ParameterOutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors related to topological operations.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("wire is not closed")]
    WireNotClosed,

    #[error("invalid topology: {0}")]
    InvalidTopology(String),
}

/// Errors raised by curve-curve intersection.
#[derive(Debug, Error)]
pub enum IntersectionError {
    #[error("curves do not intersect (closest approach {closest:.3e})")]
    NoSolution { closest: f64 },

    #[error("expected a single intersection, found {count}")]
    Ambiguous { count: usize },

    #[error("cannot intersect a curve with an unbounded domain")]
    Unbounded,
}

/// Errors in the aircraft description, recipes or station requests.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("span station {0} is outside [0, 1]")]
    StationOutOfRange(f64),

    #[error("invalid span interval [{inner}, {outer}]")]
    InvalidInterval { inner: f64, outer: f64 },

    #[error("unsupported feature: {0}")]
    UnsupportedFeature(&'static str),

    #[error("invalid recipe: {0}")]
    InvalidRecipe(String),

    #[error("invalid lifting surface: {0}")]
    InvalidSurface(String),

    #[error(transparent)]
    Parse(#[from] serde_json::Error),
}

/// Errors related to kernel operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Convenience type alias for results using [`WingcutError`].
pub type Result<T> = std::result::Result<T, WingcutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_context_keeps_root() {
        let err: WingcutError = IntersectionError::Ambiguous { count: 2 }.into();
        let wrapped = err.during("flap_upper", 0.25, "symmetric flap");
        assert!(matches!(
            wrapped.root(),
            WingcutError::Intersection(IntersectionError::Ambiguous { count: 2 })
        ));
        let msg = wrapped.to_string();
        assert!(msg.contains("flap_upper"));
        assert!(msg.contains("0.25"));
    }
}
