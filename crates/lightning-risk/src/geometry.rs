//! Collection area geometry
//!
//! The collection area is the structure footprint dilated by 3H:
//! A_D = l·w + 6h(l + w) + 9π·h², evaluated in meters.

use crate::{LengthUnit, Result, StructureDimensions};
use std::f64::consts::PI;

/// Collection area A_D in m² for a structure given in `unit`
///
/// Fails with [`crate::RiskError::InvalidDimension`] unless every dimension
/// is strictly positive and finite.
pub fn compute_collection_area(
    length: f64,
    width: f64,
    height: f64,
    unit: LengthUnit,
) -> Result<f64> {
    let dims = StructureDimensions::new(length, width, height, unit)?;
    Ok(dims.collection_area_m2())
}

/// A_D for dimensions already in meters
pub(crate) fn collection_area_meters(l: f64, w: f64, h: f64) -> f64 {
    l * w + 6.0 * h * (l + w) + 9.0 * PI * h * h
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RiskError, FEET_TO_METERS};
    use approx::assert_relative_eq;

    #[test]
    fn test_unit_cube_in_feet() {
        let s = FEET_TO_METERS;
        let expected = s * s + 6.0 * s * (s + s) + 9.0 * PI * s * s;

        let area = compute_collection_area(1.0, 1.0, 1.0, LengthUnit::Feet).unwrap();
        assert_relative_eq!(area, expected, epsilon = 1e-12);
        assert_relative_eq!(area, 3.8345, epsilon = 1e-4);
    }

    #[test]
    fn test_reference_building() {
        // 20 x 10 x 10 ft
        let area = compute_collection_area(20.0, 10.0, 10.0, LengthUnit::Feet).unwrap();
        assert_relative_eq!(area, 448.483237, epsilon = 1e-5);
    }

    #[test]
    fn test_meters_skip_conversion() {
        let area = compute_collection_area(10.0, 5.0, 2.0, LengthUnit::Meters).unwrap();
        assert_relative_eq!(area, 50.0 + 180.0 + 36.0 * PI, epsilon = 1e-12);
    }

    #[test]
    fn test_rejects_zero_height() {
        let err = compute_collection_area(10.0, 10.0, 0.0, LengthUnit::Feet).unwrap_err();
        assert!(matches!(err, RiskError::InvalidDimension { name: "height", .. }));
    }

    #[test]
    fn test_height_dominates_flat_structure() {
        // Doubling height more than doubles the area for a small footprint
        let low = compute_collection_area(10.0, 10.0, 10.0, LengthUnit::Feet).unwrap();
        let high = compute_collection_area(10.0, 10.0, 20.0, LengthUnit::Feet).unwrap();
        assert!(high > 2.0 * low);
    }
}
