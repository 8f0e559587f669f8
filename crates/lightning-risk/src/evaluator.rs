//! Risk evaluation
//!
//! Combines the collection area, ground flash density and coefficients into
//! the expected threat occurrence N_D and the tolerable frequency N_c:
//!
//! ```text
//! N_D = Ng · A_D · C_D · 10⁻⁶
//! N_c = 1.5·10⁻³ / (C₂ · C₃ · C₄ · C₅)
//! ```
//!
//! An LPS is recommended when N_D > N_c and optional otherwise (ties included).

use crate::{
    FlashDensityBand, LengthUnit, Result, RiskCoefficients, RiskError, StructureDimensions,
    TOLERABLE_FREQUENCY_BASE,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Collection area is in m² while Ng is per km²
const M2_TO_KM2: f64 = 1e-6;

/// LPS recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    /// N_D <= N_c
    Optional,
    /// N_D > N_c
    Recommended,
}

impl Recommendation {
    pub fn from_frequencies(expected: f64, tolerable: f64) -> Self {
        if expected > tolerable {
            Recommendation::Recommended
        } else {
            Recommendation::Optional
        }
    }

    pub fn needs_lps(&self) -> bool {
        matches!(self, Recommendation::Recommended)
    }

    /// Sentence used in reports
    pub fn statement(&self) -> &'static str {
        match self {
            Recommendation::Optional => "A Lightning Protection System (LPS) is optional.",
            Recommendation::Recommended => "A Lightning Protection System (LPS) is recommended.",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.statement())
    }
}

/// Result of one assessment; a pure function of its inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessmentResult {
    /// A_D, m²
    pub collection_area_m2: f64,
    /// Ng as selected, flashes/sq mile/year
    pub flash_density_per_sq_mile: f64,
    /// Ng converted, flashes/km²/year
    pub flash_density_per_sq_km: f64,
    /// C_D
    pub location_coefficient: f64,
    /// N_D, flashes/year
    pub expected_threat_occurrence: f64,
    /// C = C2·C3·C4·C5
    pub combined_coefficient: f64,
    /// N_c, flashes/year
    pub tolerable_frequency: f64,
    pub needs_lps: bool,
    pub recommendation: Recommendation,
}

/// N_D = Ng · A_D · C_D · 10⁻⁶
pub fn expected_threat_occurrence(flash_density_per_sq_km: f64, area_m2: f64, cd: f64) -> f64 {
    flash_density_per_sq_km * area_m2 * cd * M2_TO_KM2
}

/// C = C2 · C3 · C4 · C5
pub fn combined_coefficient(c2: f64, c3: f64, c4: f64, c5: f64) -> f64 {
    c2 * c3 * c4 * c5
}

/// N_c = 1.5e-3 / C
///
/// Fails with [`RiskError::DegenerateCoefficient`] when C is zero, negative
/// or not finite.
pub fn tolerable_frequency(combined: f64) -> Result<f64> {
    if !(combined.is_finite() && combined > 0.0) {
        return Err(RiskError::DegenerateCoefficient(combined));
    }
    Ok(TOLERABLE_FREQUENCY_BASE / combined)
}

/// Evaluate the simplified NFPA 780 assessment
pub fn evaluate(
    dimensions: &StructureDimensions,
    coefficients: &RiskCoefficients,
    flash_density: FlashDensityBand,
) -> Result<RiskAssessmentResult> {
    let collection_area_m2 = dimensions.collection_area_m2();
    let flash_density_per_sq_km = flash_density.per_sq_km();
    let location_coefficient = coefficients.cd();

    let expected = expected_threat_occurrence(
        flash_density_per_sq_km,
        collection_area_m2,
        location_coefficient,
    );
    let combined = coefficients.combined();
    let tolerable = tolerable_frequency(combined)?;

    let recommendation = Recommendation::from_frequencies(expected, tolerable);

    debug!(
        "Evaluated A_D={:.2} m², Ng={:.3}/km², N_D={:.3e}, C={:.3}, N_c={:.3e}: {:?}",
        collection_area_m2, flash_density_per_sq_km, expected, combined, tolerable, recommendation
    );

    Ok(RiskAssessmentResult {
        collection_area_m2,
        flash_density_per_sq_mile: flash_density.midpoint(),
        flash_density_per_sq_km,
        location_coefficient,
        expected_threat_occurrence: expected,
        combined_coefficient: combined,
        tolerable_frequency: tolerable,
        needs_lps: recommendation.needs_lps(),
        recommendation,
    })
}

impl RiskAssessmentResult {
    /// N_c / N_D; below 1.0 means an LPS is recommended
    pub fn safety_margin(&self) -> f64 {
        self.tolerable_frequency / self.expected_threat_occurrence
    }

    /// Worked calculation, one step per line
    pub fn breakdown(
        &self,
        dimensions: &StructureDimensions,
        coefficients: &RiskCoefficients,
    ) -> Vec<String> {
        let ft = dimensions.converted(LengthUnit::Feet);
        let m = dimensions.to_meters();
        let mut lines = Vec::with_capacity(10);

        lines.push(format!(
            "l = {:.2} ft = {:.2} m, w = {:.2} ft = {:.2} m, h = {:.2} ft = {:.2} m",
            ft.length(),
            m.length(),
            ft.width(),
            m.width(),
            ft.height(),
            m.height()
        ));
        lines.push(format!(
            "A = l·w + 6h(l + w) + 9π·h² = {:.2} × {:.2} + 6 × {:.2} × ({:.2} + {:.2}) + 9π × {:.2}² = {:.2} m²",
            m.length(),
            m.width(),
            m.height(),
            m.length(),
            m.width(),
            m.height(),
            self.collection_area_m2
        ));
        lines.push(format!(
            "Ng = {:.2} flashes/sq mile/year = {:.2} flashes/km²/year",
            self.flash_density_per_sq_mile, self.flash_density_per_sq_km
        ));
        lines.push(format!(
            "N_D = Ng × A × C_D × 10⁻⁶ = {:.2} × {:.2} × {:.2} × 10⁻⁶ = {:.6}",
            self.flash_density_per_sq_km,
            self.collection_area_m2,
            self.location_coefficient,
            self.expected_threat_occurrence
        ));
        lines.push(format!(
            "C = C2 × C3 × C4 × C5 = {:.2} × {:.2} × {:.2} × {:.2} = {:.2}",
            coefficients.c2(),
            coefficients.c3(),
            coefficients.c4(),
            coefficients.c5(),
            self.combined_coefficient
        ));
        lines.push(format!(
            "N_c = 1.5 × 10⁻³ / C = 1.5 × 10⁻³ / {:.2} = {:.6}",
            self.combined_coefficient, self.tolerable_frequency
        ));
        lines.push(if self.needs_lps {
            "N_D > N_c ⇒ LPS is recommended".to_string()
        } else {
            "N_D ≤ N_c ⇒ LPS is optional".to_string()
        });

        lines
    }
}
