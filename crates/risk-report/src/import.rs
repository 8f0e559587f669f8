//! Pre-filling an assessment from a CSV report
//!
//! Accepts the CSV written by [`crate::export::to_csv`] (project line
//! included). The first data row is used; every column of
//! [`REPORT_FIELDS`] must be present. Computed columns are required for the
//! file to be recognised but are recomputed, never trusted.

use crate::{AssessmentInput, ReportError, Result, REPORT_FIELDS};
use csv::StringRecord;
use lightning_risk::{CategoricalCoefficient, RiskCoefficients, StructureDimensions};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{info, warn};

/// Result of a best-effort import
#[derive(Debug, Clone, PartialEq)]
pub struct ImportOutcome {
    pub input: AssessmentInput,
    /// Set when the file was rejected and defaults were used instead
    pub warning: Option<String>,
}

impl ImportOutcome {
    pub fn used_defaults(&self) -> bool {
        self.warning.is_some()
    }
}

/// Parse the first data row of a CSV report
pub fn parse_input<R: Read>(reader: R) -> Result<AssessmentInput> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let missing: Vec<&str> = REPORT_FIELDS
        .iter()
        .copied()
        .filter(|field| !headers.iter().any(|h| h == *field))
        .collect();
    if !missing.is_empty() {
        return Err(ReportError::MalformedImport(format!(
            "missing required columns: {}",
            missing.join(", ")
        )));
    }

    let row = csv_reader
        .records()
        .next()
        .ok_or_else(|| ReportError::MalformedImport("no data row".to_string()))??;

    let column = |name: &str| field(&headers, &row, name);

    let input = AssessmentInput {
        project_name: column("Project Name")?.to_string(),
        length_ft: parse_number("Length (ft)", column("Length (ft)")?)?,
        width_ft: parse_number("Width (ft)", column("Width (ft)")?)?,
        height_ft: parse_number("Height (ft)", column("Height (ft)")?)?,
        flash_density: parse_option(column("Ground Flash Density (flashes/sq miles/year)")?)?,
        coefficients: RiskCoefficients {
            construction: parse_option(column("Construction Coefficient")?)?,
            contents: parse_option(column("Contents Coefficient")?)?,
            occupancy: parse_option(column("Occupancy Coefficient")?)?,
            consequence: parse_option(column("Consequence Coefficient")?)?,
            location: parse_option(column("Location Coefficient")?)?,
        },
    };

    // reject bad dimensions here rather than at evaluation time
    StructureDimensions::feet(input.length_ft, input.width_ft, input.height_ft)?;

    Ok(input)
}

/// Import from any reader, falling back to defaults with a warning
pub fn import_or_default<R: Read>(reader: R) -> ImportOutcome {
    match parse_input(reader) {
        Ok(input) => {
            info!("Project data loaded for {:?}", input.project_name);
            ImportOutcome {
                input,
                warning: None,
            }
        }
        Err(e) => fallback(e),
    }
}

/// Import from a CSV file
pub fn load_input(path: impl AsRef<Path>) -> Result<AssessmentInput> {
    let path = path.as_ref();
    info!("Loading project data from {:?}", path);

    let file = File::open(path)?;
    parse_input(BufReader::new(file))
}

/// Import from a CSV file, falling back to defaults with a warning
pub fn load_or_default(path: impl AsRef<Path>) -> ImportOutcome {
    match load_input(path) {
        Ok(input) => ImportOutcome {
            input,
            warning: None,
        },
        Err(e) => fallback(e),
    }
}

fn fallback(error: ReportError) -> ImportOutcome {
    let warning = format!(
        "Uploaded CSV file was not used ({}); using default input values",
        error
    );
    warn!("{}", warning);
    ImportOutcome {
        input: AssessmentInput::default(),
        warning: Some(warning),
    }
}

fn field<'r>(headers: &StringRecord, row: &'r StringRecord, name: &str) -> Result<&'r str> {
    headers
        .iter()
        .position(|h| h == name)
        .and_then(|i| row.get(i))
        .ok_or_else(|| ReportError::MalformedImport(format!("{name}: missing value")))
}

fn parse_number(field: &str, raw: &str) -> Result<f64> {
    raw.parse::<f64>()
        .map_err(|_| ReportError::MalformedImport(format!("{field}: {raw:?} is not a number")))
}

/// Numeric worksheet value or, failing that, a label or key
fn parse_option<T: CategoricalCoefficient>(raw: &str) -> Result<T> {
    let option = match raw.parse::<f64>() {
        Ok(value) => T::from_value(value)?,
        Err(_) => T::parse(raw)?,
    };
    Ok(option)
}
