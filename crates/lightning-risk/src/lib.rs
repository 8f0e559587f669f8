//! Lightning Risk Assessment Library
//!
//! Implements the NFPA 780 simplified lightning risk assessment: a structure's
//! collection area, the expected annual threat occurrence and the tolerable
//! lightning frequency, compared to decide whether a Lightning Protection
//! System (LPS) is recommended.
//!
//! # Risk Model
//!
//! ```text
//! A_D = l·w + 6h(l + w) + 9π·h²          (m²)
//! N_D = Ng · A_D · C_D · 10⁻⁶             (flashes/year)
//! C   = C₂ · C₃ · C₄ · C₅
//! N_c = 1.5·10⁻³ / C                      (flashes/year)
//! LPS recommended  ⇔  N_D > N_c
//! ```
//!
//! | Factor | Table | Description |
//! |--------|-------|-------------|
//! | C₂     | 3×3   | Construction (structure × roof material) |
//! | C₃     | 1-D   | Structure contents |
//! | C₄     | 1-D   | Structure occupancy |
//! | C₅     | 1-D   | Lightning consequence |
//! | C_D    | 1-D   | Relative structure location |
//! | Ng     | bands | Ground flash density (band midpoint) |

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub mod coefficients;
pub mod evaluator;
pub mod geometry;
pub mod visualization;

pub use coefficients::{
    resolve_coefficient, CategoricalCoefficient, CoefficientCategory, ConsequenceCoefficient,
    ConstructionGrid, ConstructionSelection, ContentsCoefficient, FlashDensityBand,
    LocationCoefficient, OccupancyCoefficient, RiskCoefficients, RoofMaterial, StructureMaterial,
};
pub use evaluator::{evaluate, Recommendation, RiskAssessmentResult};
pub use geometry::compute_collection_area;
pub use visualization::{collection_figure, CollectionFigure};

/// Feet to meters
pub const FEET_TO_METERS: f64 = 0.3048;

/// Flashes/sq mile/year to flashes/km²/year, as applied by the assessment worksheet
pub const SQ_MILE_TO_SQ_KM: f64 = 0.386102;

/// Numerator of the tolerable lightning frequency N_c = 1.5e-3 / C
pub const TOLERABLE_FREQUENCY_BASE: f64 = 1.5e-3;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RiskError {
    #[error("Invalid {name}: {value} (must be a positive, finite length)")]
    InvalidDimension { name: &'static str, value: f64 },
    #[error("Unknown {category} selection: {selection:?}")]
    UnknownCategory {
        category: CoefficientCategory,
        selection: String,
    },
    #[error("Combined coefficient {0} leaves the tolerable frequency undefined")]
    DegenerateCoefficient(f64),
}

pub type Result<T> = std::result::Result<T, RiskError>;

/// Unit of the structure dimensions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LengthUnit {
    #[default]
    Feet,
    Meters,
}

impl LengthUnit {
    /// Multiplier taking a length in this unit to meters
    pub fn to_meters_factor(&self) -> f64 {
        match self {
            LengthUnit::Feet => FEET_TO_METERS,
            LengthUnit::Meters => 1.0,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            LengthUnit::Feet => "ft",
            LengthUnit::Meters => "m",
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl std::str::FromStr for LengthUnit {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ft" | "feet" | "imperial" => Ok(LengthUnit::Feet),
            "m" | "meters" | "metres" | "metric" => Ok(LengthUnit::Meters),
            other => Err(format!("unknown length unit {other:?} (expected ft or m)")),
        }
    }
}

/// Validated structure dimensions
///
/// Fields are private so a value of this type always holds strictly positive,
/// finite lengths.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StructureDimensions {
    length: f64,
    width: f64,
    height: f64,
    unit: LengthUnit,
}

impl StructureDimensions {
    pub fn new(length: f64, width: f64, height: f64, unit: LengthUnit) -> Result<Self> {
        Ok(Self {
            length: validate_dimension("length", length)?,
            width: validate_dimension("width", width)?,
            height: validate_dimension("height", height)?,
            unit,
        })
    }

    /// Dimensions in feet, the unit the assessment worksheet is filled in
    pub fn feet(length: f64, width: f64, height: f64) -> Result<Self> {
        Self::new(length, width, height, LengthUnit::Feet)
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn unit(&self) -> LengthUnit {
        self.unit
    }

    /// Same structure expressed in `unit`
    pub fn converted(&self, unit: LengthUnit) -> Self {
        let factor = self.unit.to_meters_factor() / unit.to_meters_factor();
        Self {
            length: self.length * factor,
            width: self.width * factor,
            height: self.height * factor,
            unit,
        }
    }

    pub fn to_meters(&self) -> Self {
        self.converted(LengthUnit::Meters)
    }

    /// Collection area A_D in m²
    pub fn collection_area_m2(&self) -> f64 {
        let m = self.to_meters();
        geometry::collection_area_meters(m.length, m.width, m.height)
    }
}

pub(crate) fn validate_dimension(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(RiskError::InvalidDimension { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_dimensions_reject_non_positive() {
        assert!(StructureDimensions::feet(20.0, 10.0, 10.0).is_ok());

        let err = StructureDimensions::feet(0.0, 10.0, 10.0).unwrap_err();
        assert_eq!(err, RiskError::InvalidDimension { name: "length", value: 0.0 });

        let err = StructureDimensions::feet(20.0, -1.0, 10.0).unwrap_err();
        assert!(matches!(err, RiskError::InvalidDimension { name: "width", .. }));

        let err = StructureDimensions::feet(20.0, 10.0, f64::NAN).unwrap_err();
        assert!(matches!(err, RiskError::InvalidDimension { name: "height", .. }));

        assert!(StructureDimensions::feet(f64::INFINITY, 10.0, 10.0).is_err());
    }

    #[test]
    fn test_feet_to_meters() {
        let dims = StructureDimensions::feet(20.0, 10.0, 10.0).unwrap();
        let m = dims.to_meters();
        assert_eq!(m.unit(), LengthUnit::Meters);
        assert_relative_eq!(m.length(), 6.096, epsilon = 1e-12);
        assert_relative_eq!(m.width(), 3.048, epsilon = 1e-12);
        assert_relative_eq!(m.height(), 3.048, epsilon = 1e-12);

        let back = m.converted(LengthUnit::Feet);
        assert_relative_eq!(back.length(), 20.0, epsilon = 1e-9);
    }

    #[test]
    fn test_length_unit_parse() {
        assert_eq!("ft".parse::<LengthUnit>().unwrap(), LengthUnit::Feet);
        assert_eq!("Metric".parse::<LengthUnit>().unwrap(), LengthUnit::Meters);
        assert!("yards".parse::<LengthUnit>().is_err());
    }
}
