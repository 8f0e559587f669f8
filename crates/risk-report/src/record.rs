//! Assessment input and output records

use crate::Result;
use lightning_risk::{
    evaluate, CategoricalCoefficient, FlashDensityBand, RiskAssessmentResult, RiskCoefficients,
    StructureDimensions,
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Output record field names, in column order
pub const REPORT_FIELDS: [&str; 14] = [
    "Project Name",
    "Length (ft)",
    "Width (ft)",
    "Height (ft)",
    "Collection Area (m²)",
    "Ground Flash Density (flashes/sq miles/year)",
    "Expected Annual Threat Occurrence (flashes/year)",
    "Tolerable Lightning Frequency (flashes/year)",
    "Construction Coefficient",
    "Contents Coefficient",
    "Occupancy Coefficient",
    "Consequence Coefficient",
    "Location Coefficient",
    "LPS Recommendation",
];

/// Everything the worksheet asks for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentInput {
    pub project_name: String,
    pub length_ft: f64,
    pub width_ft: f64,
    pub height_ft: f64,
    pub flash_density: FlashDensityBand,
    pub coefficients: RiskCoefficients,
}

impl Default for AssessmentInput {
    fn default() -> Self {
        Self {
            project_name: String::new(),
            length_ft: 20.0,
            width_ft: 10.0,
            height_ft: 10.0,
            flash_density: FlashDensityBand::default(),
            coefficients: RiskCoefficients::default(),
        }
    }
}

impl AssessmentInput {
    pub fn dimensions(&self) -> Result<StructureDimensions> {
        Ok(StructureDimensions::feet(
            self.length_ft,
            self.width_ft,
            self.height_ft,
        )?)
    }

    /// Validate and evaluate
    pub fn assess(&self) -> Result<Assessment> {
        let dimensions = self.dimensions()?;
        let result = evaluate(&dimensions, &self.coefficients, self.flash_density)?;

        info!(
            "Assessed {:?}: N_D={:.3e} vs N_c={:.3e}, LPS {}",
            self.project_name,
            result.expected_threat_occurrence,
            result.tolerable_frequency,
            if result.needs_lps { "recommended" } else { "optional" }
        );

        Ok(Assessment {
            input: self.clone(),
            dimensions,
            result,
        })
    }
}

/// An evaluated input
#[derive(Debug, Clone, Serialize)]
pub struct Assessment {
    pub input: AssessmentInput,
    pub dimensions: StructureDimensions,
    pub result: RiskAssessmentResult,
}

impl Assessment {
    pub fn record(&self) -> ReportRecord {
        ReportRecord::new(&self.input, &self.result)
    }

    pub fn breakdown(&self) -> Vec<String> {
        self.result
            .breakdown(&self.dimensions, &self.input.coefficients)
    }
}

/// Flat output record; serialized field names are [`REPORT_FIELDS`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRecord {
    #[serde(rename = "Project Name")]
    pub project_name: String,
    #[serde(rename = "Length (ft)")]
    pub length_ft: f64,
    #[serde(rename = "Width (ft)")]
    pub width_ft: f64,
    #[serde(rename = "Height (ft)")]
    pub height_ft: f64,
    #[serde(rename = "Collection Area (m²)")]
    pub collection_area_m2: f64,
    #[serde(rename = "Ground Flash Density (flashes/sq miles/year)")]
    pub flash_density: f64,
    #[serde(rename = "Expected Annual Threat Occurrence (flashes/year)")]
    pub expected_threat_occurrence: f64,
    #[serde(rename = "Tolerable Lightning Frequency (flashes/year)")]
    pub tolerable_frequency: f64,
    #[serde(rename = "Construction Coefficient")]
    pub construction: f64,
    #[serde(rename = "Contents Coefficient")]
    pub contents: f64,
    #[serde(rename = "Occupancy Coefficient")]
    pub occupancy: f64,
    #[serde(rename = "Consequence Coefficient")]
    pub consequence: f64,
    #[serde(rename = "Location Coefficient")]
    pub location: f64,
    #[serde(rename = "LPS Recommendation")]
    pub recommendation: String,
}

impl ReportRecord {
    pub fn new(input: &AssessmentInput, result: &RiskAssessmentResult) -> Self {
        let c = &input.coefficients;
        Self {
            project_name: input.project_name.clone(),
            length_ft: input.length_ft,
            width_ft: input.width_ft,
            height_ft: input.height_ft,
            collection_area_m2: result.collection_area_m2,
            flash_density: input.flash_density.value(),
            expected_threat_occurrence: result.expected_threat_occurrence,
            tolerable_frequency: result.tolerable_frequency,
            construction: c.construction.value(),
            contents: c.contents.value(),
            occupancy: c.occupancy.value(),
            consequence: c.consequence.value(),
            location: c.location.value(),
            recommendation: result.recommendation.statement().to_string(),
        }
    }

    /// (field name, rendered value) pairs in [`REPORT_FIELDS`] order
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let values = [
            self.project_name.clone(),
            self.length_ft.to_string(),
            self.width_ft.to_string(),
            self.height_ft.to_string(),
            self.collection_area_m2.to_string(),
            self.flash_density.to_string(),
            self.expected_threat_occurrence.to_string(),
            self.tolerable_frequency.to_string(),
            self.construction.to_string(),
            self.contents.to_string(),
            self.occupancy.to_string(),
            self.consequence.to_string(),
            self.location.to_string(),
            self.recommendation.clone(),
        ];
        REPORT_FIELDS.into_iter().zip(values).collect()
    }

    /// Pretty JSON keyed by [`REPORT_FIELDS`]
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
