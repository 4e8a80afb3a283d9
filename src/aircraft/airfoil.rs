use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, Result};
use crate::math::Point2;

/// Normalized airfoil coordinates in Selig order.
///
/// Points run from the trailing edge along the upper surface to the
/// leading edge and back along the lower surface. `x` is the chord
/// fraction (leading edge at 0, trailing edge at 1) and `z` the height
/// over chord, positive on the upper side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirfoilSection {
    pub name: String,
    pub coordinates: Vec<[f64; 2]>,
}

impl AirfoilSection {
    /// Wraps a coordinate table.
    ///
    /// # Errors
    ///
    /// Returns an error if the table is too short or not finite.
    pub fn new(name: impl Into<String>, coordinates: Vec<[f64; 2]>) -> Result<Self> {
        let section = Self {
            name: name.into(),
            coordinates,
        };
        section.validate()?;
        Ok(section)
    }

    /// Generates a NACA 4-digit section such as `"2412"` with a closed trailing edge.
    ///
    /// `points_per_side` stations are placed on each surface with cosine spacing.
    ///
    /// # Errors
    ///
    /// Returns an error if the designation is not four digits or fewer than
    /// four points per side are requested.
    pub fn naca4(designation: &str, points_per_side: usize) -> Result<Self> {
        let digits: Vec<u32> = designation.chars().filter_map(|c| c.to_digit(10)).collect();
        if digits.len() != 4 || designation.len() != 4 {
            return Err(ConfigurationError::InvalidSurface(format!(
                "`{designation}` is not a NACA 4-digit designation"
            ))
            .into());
        }
        if points_per_side < 4 {
            return Err(ConfigurationError::InvalidSurface(
                "a NACA section needs at least four points per side".into(),
            )
            .into());
        }
        let m = f64::from(digits[0]) / 100.0;
        let p = f64::from(digits[1]) / 10.0;
        let t = f64::from(digits[2] * 10 + digits[3]) / 100.0;
        let naca = Naca4 { m, p, t };

        #[allow(clippy::cast_precision_loss)]
        let stations: Vec<f64> = (0..=points_per_side)
            .map(|i| 0.5 * (1.0 - (std::f64::consts::PI * i as f64 / points_per_side as f64).cos()))
            .collect();

        let mut coordinates = Vec::with_capacity(2 * points_per_side + 1);
        for &x in stations.iter().rev() {
            let (upper, _) = naca.surfaces(x);
            coordinates.push([upper.x, upper.y]);
        }
        for &x in &stations[1..] {
            let (_, lower) = naca.surfaces(x);
            coordinates.push([lower.x, lower.y]);
        }
        Self::new(format!("NACA {designation}"), coordinates)
    }

    /// Checks the coordinate table.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidSurface`] for fewer than three
    /// points or non-finite values.
    pub fn validate(&self) -> Result<()> {
        if self.coordinates.len() < 3 {
            return Err(ConfigurationError::InvalidSurface(format!(
                "airfoil `{}` has fewer than three points",
                self.name
            ))
            .into());
        }
        if self.coordinates.iter().flatten().any(|v| !v.is_finite()) {
            return Err(ConfigurationError::InvalidSurface(format!(
                "airfoil `{}` has non-finite coordinates",
                self.name
            ))
            .into());
        }
        Ok(())
    }

    /// Whether the first and last points coincide.
    #[must_use]
    pub fn has_closed_trailing_edge(&self) -> bool {
        match (self.coordinates.first(), self.coordinates.last()) {
            (Some(a), Some(b)) => (a[0] - b[0]).hypot(a[1] - b[1]) < 1e-9,
            _ => false,
        }
    }
}

/// NACA 4-digit camber and thickness laws on a unit chord.
struct Naca4 {
    m: f64,
    p: f64,
    t: f64,
}

impl Naca4 {
    /// Half thickness with the closed trailing edge coefficient.
    fn half_thickness(&self, x: f64) -> f64 {
        5.0 * self.t
            * (0.2969 * x.sqrt() - 0.1260 * x - 0.3516 * x.powi(2) + 0.2843 * x.powi(3)
                - 0.1036 * x.powi(4))
    }

    /// Camber height and slope.
    fn camber(&self, x: f64) -> (f64, f64) {
        let (m, p) = (self.m, self.p);
        if m.abs() < f64::EPSILON || p.abs() < f64::EPSILON {
            return (0.0, 0.0);
        }
        if x < p {
            (m / (p * p) * (2.0 * p * x - x * x), 2.0 * m / (p * p) * (p - x))
        } else {
            let q = (1.0 - p) * (1.0 - p);
            (m / q * (1.0 - 2.0 * p + 2.0 * p * x - x * x), 2.0 * m / q * (p - x))
        }
    }

    fn surfaces(&self, x: f64) -> (Point2, Point2) {
        let yt = self.half_thickness(x);
        let (yc, slope) = self.camber(x);
        let theta = slope.atan();
        let (s, c) = theta.sin_cos();
        (
            Point2::new(x - yt * s, yc + yt * c),
            Point2::new(x + yt * s, yc - yt * c),
        )
    }
}
