//! Lightning Risk Assessment Reports
//!
//! Turns an assessment into the flat output record and renders it as CSV,
//! flat OpenDocument text or Markdown. Previously exported CSV reports can be
//! imported again to pre-fill an assessment.
//!
//! # Output Record
//!
//! | Field | Unit |
//! |-------|------|
//! | Project Name | |
//! | Length / Width / Height | ft |
//! | Collection Area | m² |
//! | Ground Flash Density | flashes/sq mile/year (band midpoint) |
//! | Expected Annual Threat Occurrence (N_D) | flashes/year |
//! | Tolerable Lightning Frequency (N_c) | flashes/year |
//! | Construction / Contents / Occupancy / Consequence / Location Coefficient | |
//! | LPS Recommendation | text |

use thiserror::Error;

pub mod export;
pub mod import;
pub mod record;

pub use export::ExportFormat;
pub use import::{import_or_default, load_input, load_or_default, parse_input, ImportOutcome};
pub use record::{Assessment, AssessmentInput, ReportRecord, REPORT_FIELDS};

/// Report title shared by every document rendering
pub const REPORT_TITLE: &str = "NFPA 780 Lightning Risk Assessment Report";

/// Paragraph following the title
pub const REPORT_DESCRIPTION: &str =
    "This report summarizes the results of the simplified lightning risk assessment.";

/// Heading above the key/value table
pub const REPORT_SUBHEADING: &str = "Input Parameters";

#[derive(Error, Debug)]
pub enum ReportError {
    #[error(transparent)]
    Risk(#[from] lightning_risk::RiskError),
    #[error("Malformed import: {0}")]
    MalformedImport(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;
