//! Coefficient lookup tables
//!
//! Every risk factor is a closed enumeration carrying the value the NFPA 780
//! worksheet assigns to it. Typed callers cannot build an unknown selection;
//! the string and numeric entry points ([`CategoricalCoefficient::parse`],
//! [`CategoricalCoefficient::from_value`], [`resolve_coefficient`]) reject
//! anything outside the tables with [`RiskError::UnknownCategory`].

use crate::{Result, RiskError, SQ_MILE_TO_SQ_KM};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tolerance used when mapping an imported number back onto a table entry
const VALUE_MATCH_EPSILON: f64 = 1e-9;

/// Risk factor categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoefficientCategory {
    Construction,
    Contents,
    Occupancy,
    Consequence,
    Location,
    GroundFlashDensity,
}

impl CoefficientCategory {
    pub const ALL: [CoefficientCategory; 6] = [
        CoefficientCategory::Construction,
        CoefficientCategory::Contents,
        CoefficientCategory::Occupancy,
        CoefficientCategory::Consequence,
        CoefficientCategory::Location,
        CoefficientCategory::GroundFlashDensity,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CoefficientCategory::Construction => "construction",
            CoefficientCategory::Contents => "contents",
            CoefficientCategory::Occupancy => "occupancy",
            CoefficientCategory::Consequence => "consequence",
            CoefficientCategory::Location => "location",
            CoefficientCategory::GroundFlashDensity => "ground flash density",
        }
    }

    /// Worksheet symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            CoefficientCategory::Construction => "C2",
            CoefficientCategory::Contents => "C3",
            CoefficientCategory::Occupancy => "C4",
            CoefficientCategory::Consequence => "C5",
            CoefficientCategory::Location => "CD",
            CoefficientCategory::GroundFlashDensity => "Ng",
        }
    }
}

impl fmt::Display for CoefficientCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A closed, ordered set of worksheet options with numeric values
pub trait CategoricalCoefficient: Copy + Sized + 'static {
    const CATEGORY: CoefficientCategory;

    /// All options, in worksheet order
    fn options() -> &'static [Self];

    fn value(&self) -> f64;

    /// Worksheet wording
    fn label(&self) -> &'static str;

    /// Short command-line identifier
    fn key(&self) -> &'static str;

    /// Parse a key (case-insensitive) or the exact worksheet label
    fn parse(selection: &str) -> Result<Self> {
        let wanted = selection.trim();
        Self::options()
            .iter()
            .copied()
            .find(|o| {
                o.key().eq_ignore_ascii_case(wanted) || o.label().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| unknown(Self::CATEGORY, selection))
    }

    /// First option (in worksheet order) carrying `value`
    fn from_value(value: f64) -> Result<Self> {
        Self::options()
            .iter()
            .copied()
            .find(|o| (o.value() - value).abs() < VALUE_MATCH_EPSILON)
            .ok_or_else(|| unknown(Self::CATEGORY, &value.to_string()))
    }
}

fn unknown(category: CoefficientCategory, selection: &str) -> RiskError {
    RiskError::UnknownCategory {
        category,
        selection: selection.to_string(),
    }
}

// ============================================================================
// C2: Construction (3x3 matrix)
// ============================================================================

/// Structure material (construction matrix row)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructureMaterial {
    #[default]
    Metal,
    Nonmetallic,
    Combustible,
}

/// Roof material (construction matrix column)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoofMaterial {
    #[default]
    Metal,
    Nonmetallic,
    Combustible,
}

/// C2 values, row = structure material, column = roof material
pub const CONSTRUCTION_TABLE: [[f64; 3]; 3] = [
    [0.5, 1.0, 2.0],
    [1.0, 1.0, 2.5],
    [2.0, 2.5, 3.0],
];

impl StructureMaterial {
    pub const ALL: [StructureMaterial; 3] = [
        StructureMaterial::Metal,
        StructureMaterial::Nonmetallic,
        StructureMaterial::Combustible,
    ];

    pub fn index(&self) -> usize {
        match self {
            StructureMaterial::Metal => 0,
            StructureMaterial::Nonmetallic => 1,
            StructureMaterial::Combustible => 2,
        }
    }

    pub fn from_index(row: usize) -> Option<Self> {
        Self::ALL.get(row).copied()
    }

    pub fn name(&self) -> &'static str {
        match self {
            StructureMaterial::Metal => "Metal",
            StructureMaterial::Nonmetallic => "Nonmetallic",
            StructureMaterial::Combustible => "Combustible",
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            StructureMaterial::Metal => "metal",
            StructureMaterial::Nonmetallic => "nonmetallic",
            StructureMaterial::Combustible => "combustible",
        }
    }
}

impl RoofMaterial {
    pub const ALL: [RoofMaterial; 3] = [
        RoofMaterial::Metal,
        RoofMaterial::Nonmetallic,
        RoofMaterial::Combustible,
    ];

    pub fn index(&self) -> usize {
        match self {
            RoofMaterial::Metal => 0,
            RoofMaterial::Nonmetallic => 1,
            RoofMaterial::Combustible => 2,
        }
    }

    pub fn from_index(col: usize) -> Option<Self> {
        Self::ALL.get(col).copied()
    }

    pub fn name(&self) -> &'static str {
        match self {
            RoofMaterial::Metal => "Metal Roof",
            RoofMaterial::Nonmetallic => "Nonmetallic Roof",
            RoofMaterial::Combustible => "Combustible Roof",
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            RoofMaterial::Metal => "metal",
            RoofMaterial::Nonmetallic => "nonmetallic",
            RoofMaterial::Combustible => "combustible",
        }
    }
}

impl FromStr for StructureMaterial {
    type Err = RiskError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|m| m.key().eq_ignore_ascii_case(wanted) || m.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| unknown(CoefficientCategory::Construction, s))
    }
}

impl FromStr for RoofMaterial {
    type Err = RiskError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|m| m.key().eq_ignore_ascii_case(wanted) || m.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| unknown(CoefficientCategory::Construction, s))
    }
}

/// One cell of the construction matrix
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConstructionSelection {
    pub structure: StructureMaterial,
    pub roof: RoofMaterial,
}

const fn cell(structure: StructureMaterial, roof: RoofMaterial) -> ConstructionSelection {
    ConstructionSelection { structure, roof }
}

/// Row-major cells of the construction matrix
const CONSTRUCTION_CELLS: [ConstructionSelection; 9] = [
    cell(StructureMaterial::Metal, RoofMaterial::Metal),
    cell(StructureMaterial::Metal, RoofMaterial::Nonmetallic),
    cell(StructureMaterial::Metal, RoofMaterial::Combustible),
    cell(StructureMaterial::Nonmetallic, RoofMaterial::Metal),
    cell(StructureMaterial::Nonmetallic, RoofMaterial::Nonmetallic),
    cell(StructureMaterial::Nonmetallic, RoofMaterial::Combustible),
    cell(StructureMaterial::Combustible, RoofMaterial::Metal),
    cell(StructureMaterial::Combustible, RoofMaterial::Nonmetallic),
    cell(StructureMaterial::Combustible, RoofMaterial::Combustible),
];

const CONSTRUCTION_LABELS: [&str; 9] = [
    "Metal Structure - Metal Roof",
    "Metal Structure - Nonmetallic Roof",
    "Metal Structure - Combustible Roof",
    "Nonmetallic Structure - Metal Roof",
    "Nonmetallic Structure - Nonmetallic Roof",
    "Nonmetallic Structure - Combustible Roof",
    "Combustible Structure - Metal Roof",
    "Combustible Structure - Nonmetallic Roof",
    "Combustible Structure - Combustible Roof",
];

const CONSTRUCTION_KEYS: [&str; 9] = [
    "metal/metal",
    "metal/nonmetallic",
    "metal/combustible",
    "nonmetallic/metal",
    "nonmetallic/nonmetallic",
    "nonmetallic/combustible",
    "combustible/metal",
    "combustible/nonmetallic",
    "combustible/combustible",
];

impl ConstructionSelection {
    pub fn new(structure: StructureMaterial, roof: RoofMaterial) -> Self {
        Self { structure, roof }
    }

    /// Cell at (row, col); out-of-range cells are unknown selections
    pub fn from_cell(row: usize, col: usize) -> Result<Self> {
        match (StructureMaterial::from_index(row), RoofMaterial::from_index(col)) {
            (Some(structure), Some(roof)) => Ok(Self { structure, roof }),
            _ => Err(unknown(
                CoefficientCategory::Construction,
                &format!("cell ({row}, {col})"),
            )),
        }
    }

    pub fn cell(&self) -> (usize, usize) {
        (self.structure.index(), self.roof.index())
    }

    fn ordinal(&self) -> usize {
        self.structure.index() * 3 + self.roof.index()
    }
}

impl CategoricalCoefficient for ConstructionSelection {
    const CATEGORY: CoefficientCategory = CoefficientCategory::Construction;

    fn options() -> &'static [Self] {
        &CONSTRUCTION_CELLS
    }

    fn value(&self) -> f64 {
        CONSTRUCTION_TABLE[self.structure.index()][self.roof.index()]
    }

    fn label(&self) -> &'static str {
        CONSTRUCTION_LABELS[self.ordinal()]
    }

    fn key(&self) -> &'static str {
        CONSTRUCTION_KEYS[self.ordinal()]
    }
}

/// Caller-held construction matrix selection
///
/// Remembers the last selected cell between redraws of a presentation layer.
/// A fresh grid starts on (0, 0).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructionGrid {
    selected: ConstructionSelection,
}

impl ConstructionGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the cell at (row, col), keeping the previous selection on error
    pub fn select(&mut self, row: usize, col: usize) -> Result<ConstructionSelection> {
        self.selected = ConstructionSelection::from_cell(row, col)?;
        Ok(self.selected)
    }

    pub fn select_cell(&mut self, selection: ConstructionSelection) {
        self.selected = selection;
    }

    pub fn selection(&self) -> ConstructionSelection {
        self.selected
    }

    pub fn value(&self) -> f64 {
        self.selected.value()
    }

    pub fn is_selected(&self, row: usize, col: usize) -> bool {
        self.selected.cell() == (row, col)
    }
}

// ============================================================================
// C3: Contents
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentsCoefficient {
    #[default]
    LowValueNoncombustible,
    StandardValueNoncombustible,
    HighValueModerateCombustibility,
    ExceptionalValueFlammableOrElectronics,
    ExceptionalValueIrreplaceableCultural,
}

impl ContentsCoefficient {
    pub const ALL: [ContentsCoefficient; 5] = [
        ContentsCoefficient::LowValueNoncombustible,
        ContentsCoefficient::StandardValueNoncombustible,
        ContentsCoefficient::HighValueModerateCombustibility,
        ContentsCoefficient::ExceptionalValueFlammableOrElectronics,
        ContentsCoefficient::ExceptionalValueIrreplaceableCultural,
    ];
}

impl CategoricalCoefficient for ContentsCoefficient {
    const CATEGORY: CoefficientCategory = CoefficientCategory::Contents;

    fn options() -> &'static [Self] {
        &Self::ALL
    }

    fn value(&self) -> f64 {
        match self {
            Self::LowValueNoncombustible => 0.5,
            Self::StandardValueNoncombustible => 1.0,
            Self::HighValueModerateCombustibility => 2.0,
            Self::ExceptionalValueFlammableOrElectronics => 3.0,
            Self::ExceptionalValueIrreplaceableCultural => 4.0,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::LowValueNoncombustible => "Low value and noncombustible",
            Self::StandardValueNoncombustible => "Standard value and noncombustible",
            Self::HighValueModerateCombustibility => "High value, moderate combustibility",
            Self::ExceptionalValueFlammableOrElectronics => {
                "Exceptional value, flammable liquids, computer or electronics"
            }
            Self::ExceptionalValueIrreplaceableCultural => {
                "Exceptional value, irreplaceable cultural items"
            }
        }
    }

    fn key(&self) -> &'static str {
        match self {
            Self::LowValueNoncombustible => "low-value",
            Self::StandardValueNoncombustible => "standard-value",
            Self::HighValueModerateCombustibility => "high-value",
            Self::ExceptionalValueFlammableOrElectronics => "exceptional-electronics",
            Self::ExceptionalValueIrreplaceableCultural => "exceptional-cultural",
        }
    }
}

// ============================================================================
// C4: Occupancy
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OccupancyCoefficient {
    #[default]
    Unoccupied,
    NormallyOccupied,
    DifficultToEvacuate,
}

impl OccupancyCoefficient {
    pub const ALL: [OccupancyCoefficient; 3] = [
        OccupancyCoefficient::Unoccupied,
        OccupancyCoefficient::NormallyOccupied,
        OccupancyCoefficient::DifficultToEvacuate,
    ];
}

impl CategoricalCoefficient for OccupancyCoefficient {
    const CATEGORY: CoefficientCategory = CoefficientCategory::Occupancy;

    fn options() -> &'static [Self] {
        &Self::ALL
    }

    fn value(&self) -> f64 {
        match self {
            Self::Unoccupied => 0.5,
            Self::NormallyOccupied => 1.0,
            Self::DifficultToEvacuate => 3.0,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Unoccupied => "Unoccupied",
            Self::NormallyOccupied => "Normally Occupied",
            Self::DifficultToEvacuate => "Difficult to Evacuate or risk of panic",
        }
    }

    fn key(&self) -> &'static str {
        match self {
            Self::Unoccupied => "unoccupied",
            Self::NormallyOccupied => "occupied",
            Self::DifficultToEvacuate => "difficult-evacuation",
        }
    }
}

// ============================================================================
// C5: Lightning consequence
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConsequenceCoefficient {
    #[default]
    ServicesNotRequired,
    ServicesRequired,
    EnvironmentalConsequences,
}

impl ConsequenceCoefficient {
    pub const ALL: [ConsequenceCoefficient; 3] = [
        ConsequenceCoefficient::ServicesNotRequired,
        ConsequenceCoefficient::ServicesRequired,
        ConsequenceCoefficient::EnvironmentalConsequences,
    ];
}

impl CategoricalCoefficient for ConsequenceCoefficient {
    const CATEGORY: CoefficientCategory = CoefficientCategory::Consequence;

    fn options() -> &'static [Self] {
        &Self::ALL
    }

    fn value(&self) -> f64 {
        match self {
            Self::ServicesNotRequired => 1.0,
            Self::ServicesRequired => 5.0,
            Self::EnvironmentalConsequences => 10.0,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::ServicesNotRequired => {
                "Continuation of facility services not required, no environmental impact"
            }
            Self::ServicesRequired => {
                "Continuation of facility services required, no environmental impact"
            }
            Self::EnvironmentalConsequences => "Consequences to the environment",
        }
    }

    fn key(&self) -> &'static str {
        match self {
            Self::ServicesNotRequired => "not-required",
            Self::ServicesRequired => "services-required",
            Self::EnvironmentalConsequences => "environmental",
        }
    }
}

// ============================================================================
// CD: Relative structure location
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocationCoefficient {
    #[default]
    SurroundedByTaller,
    SurroundedByEqualOrLesser,
    Isolated,
    IsolatedHilltop,
}

impl LocationCoefficient {
    pub const ALL: [LocationCoefficient; 4] = [
        LocationCoefficient::SurroundedByTaller,
        LocationCoefficient::SurroundedByEqualOrLesser,
        LocationCoefficient::Isolated,
        LocationCoefficient::IsolatedHilltop,
    ];

    /// Label with the 3H distance spelled out for a structure `height_ft` tall
    pub fn describe(&self, height_ft: f64) -> String {
        match self {
            Self::IsolatedHilltop => self.label().to_string(),
            _ => format!("{} ({}ft)", self.label(), 3.0 * height_ft),
        }
    }
}

impl CategoricalCoefficient for LocationCoefficient {
    const CATEGORY: CoefficientCategory = CoefficientCategory::Location;

    fn options() -> &'static [Self] {
        &Self::ALL
    }

    fn value(&self) -> f64 {
        match self {
            Self::SurroundedByTaller => 0.25,
            Self::SurroundedByEqualOrLesser => 0.5,
            Self::Isolated => 1.0,
            Self::IsolatedHilltop => 2.0,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::SurroundedByTaller => {
                "Structure surrounded by taller structures or trees within a distance of 3H"
            }
            Self::SurroundedByEqualOrLesser => {
                "Structure surrounded by structures of equal or lesser height within a distance of 3H"
            }
            Self::Isolated => {
                "Isolated structure, with no other structures located within a distance of 3H"
            }
            Self::IsolatedHilltop => "Isolated structure on hilltop",
        }
    }

    fn key(&self) -> &'static str {
        match self {
            Self::SurroundedByTaller => "surrounded-taller",
            Self::SurroundedByEqualOrLesser => "surrounded-lesser",
            Self::Isolated => "isolated",
            Self::IsolatedHilltop => "hilltop",
        }
    }
}

// ============================================================================
// Ng: Ground flash density bands
// ============================================================================

/// Ground flash density band, valued at its midpoint in flashes/sq mile/year
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlashDensityBand {
    #[default]
    UpTo4,
    From4To8,
    From8To12,
    From12To16,
    From16To20,
    From20To24,
    From24To28,
    Above28,
}

impl FlashDensityBand {
    pub const ALL: [FlashDensityBand; 8] = [
        FlashDensityBand::UpTo4,
        FlashDensityBand::From4To8,
        FlashDensityBand::From8To12,
        FlashDensityBand::From12To16,
        FlashDensityBand::From16To20,
        FlashDensityBand::From20To24,
        FlashDensityBand::From24To28,
        FlashDensityBand::Above28,
    ];

    /// Band midpoint, flashes/sq mile/year
    pub fn midpoint(&self) -> f64 {
        match self {
            Self::UpTo4 => 2.0,
            Self::From4To8 => 6.0,
            Self::From8To12 => 10.0,
            Self::From12To16 => 14.0,
            Self::From16To20 => 18.0,
            Self::From20To24 => 22.0,
            Self::From24To28 => 26.0,
            // open-ended band is valued at its lower bound
            Self::Above28 => 28.0,
        }
    }

    /// Midpoint converted to flashes/km²/year
    pub fn per_sq_km(&self) -> f64 {
        self.midpoint() * SQ_MILE_TO_SQ_KM
    }
}

impl CategoricalCoefficient for FlashDensityBand {
    const CATEGORY: CoefficientCategory = CoefficientCategory::GroundFlashDensity;

    fn options() -> &'static [Self] {
        &Self::ALL
    }

    fn value(&self) -> f64 {
        self.midpoint()
    }

    fn label(&self) -> &'static str {
        match self {
            Self::UpTo4 => ">0 to 4",
            Self::From4To8 => "4 to 8",
            Self::From8To12 => "8 to 12",
            Self::From12To16 => "12 to 16",
            Self::From16To20 => "16 to 20",
            Self::From20To24 => "20 to 24",
            Self::From24To28 => "24 to 28",
            Self::Above28 => "28 and up",
        }
    }

    fn key(&self) -> &'static str {
        match self {
            Self::UpTo4 => "0-4",
            Self::From4To8 => "4-8",
            Self::From8To12 => "8-12",
            Self::From12To16 => "12-16",
            Self::From16To20 => "16-20",
            Self::From20To24 => "20-24",
            Self::From24To28 => "24-28",
            Self::Above28 => "28+",
        }
    }
}

macro_rules! impl_display_from_str {
    ($($ty:ty),* $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.label())
                }
            }

            impl FromStr for $ty {
                type Err = RiskError;

                fn from_str(s: &str) -> Result<Self> {
                    <$ty as CategoricalCoefficient>::parse(s)
                }
            }
        )*
    };
}

impl_display_from_str!(
    ConstructionSelection,
    ContentsCoefficient,
    OccupancyCoefficient,
    ConsequenceCoefficient,
    LocationCoefficient,
    FlashDensityBand,
);

// ============================================================================
// Combined selection
// ============================================================================

/// The five coefficient selections of one assessment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskCoefficients {
    pub construction: ConstructionSelection,
    pub contents: ContentsCoefficient,
    pub occupancy: OccupancyCoefficient,
    pub consequence: ConsequenceCoefficient,
    pub location: LocationCoefficient,
}

impl RiskCoefficients {
    pub fn c2(&self) -> f64 {
        self.construction.value()
    }

    pub fn c3(&self) -> f64 {
        self.contents.value()
    }

    pub fn c4(&self) -> f64 {
        self.occupancy.value()
    }

    pub fn c5(&self) -> f64 {
        self.consequence.value()
    }

    pub fn cd(&self) -> f64 {
        self.location.value()
    }

    /// C = C2 · C3 · C4 · C5
    pub fn combined(&self) -> f64 {
        crate::evaluator::combined_coefficient(self.c2(), self.c3(), self.c4(), self.c5())
    }
}

/// Resolve a free-text selection to its worksheet value
///
/// For [`CoefficientCategory::GroundFlashDensity`] the value is the band
/// midpoint in flashes/sq mile/year.
pub fn resolve_coefficient(category: CoefficientCategory, selection: &str) -> Result<f64> {
    let value = match category {
        CoefficientCategory::Construction => ConstructionSelection::parse(selection)?.value(),
        CoefficientCategory::Contents => ContentsCoefficient::parse(selection)?.value(),
        CoefficientCategory::Occupancy => OccupancyCoefficient::parse(selection)?.value(),
        CoefficientCategory::Consequence => ConsequenceCoefficient::parse(selection)?.value(),
        CoefficientCategory::Location => LocationCoefficient::parse(selection)?.value(),
        CoefficientCategory::GroundFlashDensity => FlashDensityBand::parse(selection)?.value(),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_construction_matrix() {
        let expected = [
            [0.5, 1.0, 2.0],
            [1.0, 1.0, 2.5],
            [2.0, 2.5, 3.0],
        ];
        for (row, values) in expected.iter().enumerate() {
            for (col, value) in values.iter().enumerate() {
                let sel = ConstructionSelection::from_cell(row, col).unwrap();
                assert_eq!(sel.cell(), (row, col));
                assert_eq!(sel.value(), *value, "cell ({row}, {col})");
            }
        }
        assert!(ConstructionSelection::from_cell(3, 0).is_err());
        assert!(ConstructionSelection::from_cell(0, 3).is_err());
    }

    #[test]
    fn test_construction_labels_and_keys_line_up() {
        for sel in ConstructionSelection::options() {
            let expected = format!("{} Structure - {}", sel.structure.name(), sel.roof.name());
            assert_eq!(sel.label(), expected);
            assert_eq!(
                sel.key(),
                format!("{}/{}", sel.structure.key(), sel.roof.key())
            );
            assert_eq!(ConstructionSelection::parse(sel.key()).unwrap(), *sel);
        }
    }

    #[test]
    fn test_grid_remembers_selection() {
        let mut grid = ConstructionGrid::new();
        assert_eq!(grid.selection().cell(), (0, 0));
        assert_eq!(grid.value(), 0.5);

        grid.select(2, 1).unwrap();
        assert!(grid.is_selected(2, 1));
        assert_eq!(grid.value(), 2.5);

        // bad cell keeps the last good selection
        assert!(grid.select(5, 5).is_err());
        assert!(grid.is_selected(2, 1));
    }

    #[test]
    fn test_one_dimensional_tables() {
        let contents: Vec<f64> = ContentsCoefficient::ALL.iter().map(|c| c.value()).collect();
        assert_eq!(contents, vec![0.5, 1.0, 2.0, 3.0, 4.0]);

        let occupancy: Vec<f64> = OccupancyCoefficient::ALL.iter().map(|c| c.value()).collect();
        assert_eq!(occupancy, vec![0.5, 1.0, 3.0]);

        let consequence: Vec<f64> = ConsequenceCoefficient::ALL.iter().map(|c| c.value()).collect();
        assert_eq!(consequence, vec![1.0, 5.0, 10.0]);

        let location: Vec<f64> = LocationCoefficient::ALL.iter().map(|c| c.value()).collect();
        assert_eq!(location, vec![0.25, 0.5, 1.0, 2.0]);
    }

    #[test]
    fn test_flash_density_bands() {
        let midpoints: Vec<f64> = FlashDensityBand::ALL.iter().map(|b| b.midpoint()).collect();
        assert_eq!(midpoints, vec![2.0, 6.0, 10.0, 14.0, 18.0, 22.0, 26.0, 28.0]);

        let band: FlashDensityBand = ">0 to 4".parse().unwrap();
        assert_eq!(band, FlashDensityBand::UpTo4);
        assert_relative_eq!(band.per_sq_km(), 0.772204, epsilon = 1e-12);

        assert_eq!("28+".parse::<FlashDensityBand>().unwrap(), FlashDensityBand::Above28);
    }

    #[test]
    fn test_parse_by_label_or_key() {
        assert_eq!(
            "Normally Occupied".parse::<OccupancyCoefficient>().unwrap(),
            OccupancyCoefficient::NormallyOccupied
        );
        assert_eq!(
            "HILLTOP".parse::<LocationCoefficient>().unwrap(),
            LocationCoefficient::IsolatedHilltop
        );
        let err = "Mostly occupied".parse::<OccupancyCoefficient>().unwrap_err();
        assert_eq!(
            err,
            RiskError::UnknownCategory {
                category: CoefficientCategory::Occupancy,
                selection: "Mostly occupied".to_string(),
            }
        );
    }

    #[test]
    fn test_from_value_rejects_off_table_numbers() {
        assert_eq!(
            ContentsCoefficient::from_value(3.0).unwrap(),
            ContentsCoefficient::ExceptionalValueFlammableOrElectronics
        );
        assert!(ContentsCoefficient::from_value(2.5).is_err());
        assert!(LocationCoefficient::from_value(0.0).is_err());
        assert!(FlashDensityBand::from_value(3.0).is_err());

        // 1.0 appears three times in the matrix; the first row-major cell wins
        let sel = ConstructionSelection::from_value(1.0).unwrap();
        assert_eq!(sel.cell(), (0, 1));
    }

    #[test]
    fn test_resolve_coefficient() {
        assert_eq!(
            resolve_coefficient(CoefficientCategory::Construction, "combustible/combustible")
                .unwrap(),
            3.0
        );
        assert_eq!(
            resolve_coefficient(CoefficientCategory::Consequence, "Consequences to the environment")
                .unwrap(),
            10.0
        );
        assert_eq!(
            resolve_coefficient(CoefficientCategory::GroundFlashDensity, "12 to 16").unwrap(),
            14.0
        );
        assert!(matches!(
            resolve_coefficient(CoefficientCategory::Contents, "priceless"),
            Err(RiskError::UnknownCategory { category: CoefficientCategory::Contents, .. })
        ));
    }

    #[test]
    fn test_location_describe_uses_height() {
        let text = LocationCoefficient::Isolated.describe(10.0);
        assert!(text.ends_with("within a distance of 3H (30ft)"), "{text}");
        assert_eq!(
            LocationCoefficient::IsolatedHilltop.describe(10.0),
            "Isolated structure on hilltop"
        );
    }

    #[test]
    fn test_default_selection_is_first_option() {
        let coeffs = RiskCoefficients::default();
        assert_eq!(coeffs.c2(), 0.5);
        assert_eq!(coeffs.c3(), 0.5);
        assert_eq!(coeffs.c4(), 0.5);
        assert_eq!(coeffs.c5(), 1.0);
        assert_eq!(coeffs.cd(), 0.25);
        assert_eq!(coeffs.combined(), 0.125);
    }
}
