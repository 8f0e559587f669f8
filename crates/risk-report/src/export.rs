//! Report rendering and export
//!
//! Every rendering is a pure function of the [`ReportRecord`].

use crate::{
    ReportError, ReportRecord, Result, REPORT_DESCRIPTION, REPORT_SUBHEADING, REPORT_TITLE,
};
use chrono::NaiveDateTime;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Prefix of the optional project line ahead of the CSV header
pub const CSV_PROJECT_PREFIX: &str = "# Project: ";

/// Single-file (flat XML) OpenDocument text
pub const FLAT_ODT_MIME_TYPE: &str = "application/vnd.oasis.opendocument.text-flat-xml";

// ============================================================================
// Formats
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Csv,
    /// Flat OpenDocument text (single XML file)
    Document,
    Markdown,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [
        ExportFormat::Csv,
        ExportFormat::Document,
        ExportFormat::Markdown,
    ];

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Document => "fodt",
            ExportFormat::Markdown => "md",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Document => FLAT_ODT_MIME_TYPE,
            ExportFormat::Markdown => "text/markdown",
        }
    }

    pub fn render(&self, record: &ReportRecord) -> Result<Vec<u8>> {
        match self {
            ExportFormat::Csv => to_csv(record, true),
            ExportFormat::Document => Ok(to_flat_odt(record).into_bytes()),
            ExportFormat::Markdown => Ok(to_markdown(record).into_bytes()),
        }
    }
}

// ============================================================================
// CSV
// ============================================================================

/// Header row plus one data row, optionally preceded by a project line
pub fn to_csv(record: &ReportRecord, project_header: bool) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    if project_header && !record.project_name.trim().is_empty() {
        writeln!(buf, "{}{}", CSV_PROJECT_PREFIX, single_line(&record.project_name))?;
    }

    // quote fields that would otherwise read back as comment lines
    let mut writer = csv::WriterBuilder::new()
        .comment(Some(b'#'))
        .from_writer(buf);
    writer.serialize(record)?;
    writer
        .into_inner()
        .map_err(|e| ReportError::Io(e.into_error()))
}

// ============================================================================
// Documents
// ============================================================================

/// Flat OpenDocument text: title, project, description, subheading, table
pub fn to_flat_odt(record: &ReportRecord) -> String {
    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str(concat!(
        "<office:document",
        " xmlns:office=\"urn:oasis:names:tc:opendocument:xmlns:office:1.0\"",
        " xmlns:text=\"urn:oasis:names:tc:opendocument:xmlns:text:1.0\"",
        " xmlns:table=\"urn:oasis:names:tc:opendocument:xmlns:table:1.0\"",
        " office:version=\"1.2\"",
    ));
    xml.push_str(&format!(" office:mimetype=\"{}\">\n", FLAT_ODT_MIME_TYPE));
    xml.push_str("  <office:body>\n    <office:text>\n");

    xml.push_str(&format!(
        "      <text:h text:outline-level=\"1\">{}</text:h>\n",
        escape_xml(REPORT_TITLE)
    ));
    if !record.project_name.trim().is_empty() {
        xml.push_str(&format!(
            "      <text:p>Project: {}</text:p>\n",
            escape_xml(&record.project_name)
        ));
    }
    xml.push_str(&format!(
        "      <text:p>{}</text:p>\n",
        escape_xml(REPORT_DESCRIPTION)
    ));
    xml.push_str(&format!(
        "      <text:h text:outline-level=\"2\">{}</text:h>\n",
        escape_xml(REPORT_SUBHEADING)
    ));

    xml.push_str("      <table:table table:name=\"Assessment\">\n");
    xml.push_str("        <table:table-column table:number-columns-repeated=\"2\"/>\n");
    for (key, value) in record.fields() {
        xml.push_str("        <table:table-row>\n");
        for cell in [key, value.as_str()] {
            xml.push_str(&format!(
                "          <table:table-cell office:value-type=\"string\"><text:p>{}</text:p></table:table-cell>\n",
                escape_xml(cell)
            ));
        }
        xml.push_str("        </table:table-row>\n");
    }
    xml.push_str("      </table:table>\n");

    xml.push_str("    </office:text>\n  </office:body>\n</office:document>\n");
    xml
}

/// Markdown rendering of the same document structure
pub fn to_markdown(record: &ReportRecord) -> String {
    let mut md = String::new();

    md.push_str(&format!("# {}\n\n", REPORT_TITLE));
    if !record.project_name.trim().is_empty() {
        md.push_str(&format!("**Project:** {}\n\n", single_line(&record.project_name)));
    }
    md.push_str(&format!("{}\n\n", REPORT_DESCRIPTION));
    md.push_str(&format!("## {}\n\n", REPORT_SUBHEADING));

    md.push_str("| Parameter | Value |\n");
    md.push_str("|-----------|-------|\n");
    for (key, value) in record.fields() {
        md.push_str(&format!("| {} | {} |\n", key, escape_markdown_cell(&value)));
    }

    md
}

// ============================================================================
// Files
// ============================================================================

/// `<project>_lightning_risk_assessment_<timestamp>.<ext>`
pub fn export_file_name(
    project_name: &str,
    timestamp: NaiveDateTime,
    format: ExportFormat,
) -> String {
    format!(
        "{}_lightning_risk_assessment_{}.{}",
        sanitize_file_stem(project_name),
        timestamp.format("%Y-%m-%d_%H-%M-%S"),
        format.extension()
    )
}

/// Render `record` into `path`
pub fn write_report(
    path: impl AsRef<Path>,
    format: ExportFormat,
    record: &ReportRecord,
) -> Result<()> {
    let path = path.as_ref();
    info!("Writing {:?} report to {:?}", format, path);

    let bytes = format.render(record)?;
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Write every format into `dir` using timestamped file names
pub fn write_all_reports(
    dir: impl AsRef<Path>,
    record: &ReportRecord,
    timestamp: NaiveDateTime,
) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(ExportFormat::ALL.len());
    for format in ExportFormat::ALL {
        let path = dir.join(export_file_name(&record.project_name, timestamp, format));
        write_report(&path, format, record)?;
        written.push(path);
    }
    Ok(written)
}

// ============================================================================
// Helpers
// ============================================================================

/// Alphanumeric, dash and underscore only; whitespace becomes underscore
fn sanitize_file_stem(name: &str) -> String {
    let stem: String = name
        .trim()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
        .take(128)
        .collect();

    if stem.is_empty() {
        "assessment".to_string()
    } else {
        stem
    }
}

fn single_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn escape_markdown_cell(s: &str) -> String {
    single_line(s).replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AssessmentInput, REPORT_FIELDS};
    use chrono::NaiveDate;

    fn record(project: &str) -> ReportRecord {
        let input = AssessmentInput {
            project_name: project.to_string(),
            ..AssessmentInput::default()
        };
        input.assess().unwrap().record()
    }

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 14)
            .unwrap()
            .and_hms_opt(9, 26, 53)
            .unwrap()
    }

    #[test]
    fn test_csv_header_round_trip() {
        let bytes = to_csv(&record("Depot"), false).unwrap();
        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, REPORT_FIELDS.to_vec());

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "Depot");
        assert_eq!(&rows[0][13], "A Lightning Protection System (LPS) is optional.");
    }

    #[test]
    fn test_csv_project_line() {
        let text = String::from_utf8(to_csv(&record("Depot\nNorth"), true).unwrap()).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("# Project: Depot North"));
        assert!(lines.next().unwrap().starts_with("Project Name,Length (ft)"));

        // a leading '#' in the data row is quoted
        let text = String::from_utf8(to_csv(&record("#2 Pump House"), true).unwrap()).unwrap();
        let data_row = text.lines().nth(2).unwrap();
        assert!(data_row.starts_with("\"#2 Pump House\","), "{data_row}");

        // no project line without a project name
        let text = String::from_utf8(to_csv(&record(""), true).unwrap()).unwrap();
        assert!(text.starts_with("Project Name,"));
    }

    #[test]
    fn test_csv_is_deterministic() {
        let r = record("Depot");
        assert_eq!(to_csv(&r, true).unwrap(), to_csv(&r, true).unwrap());
    }

    #[test]
    fn test_flat_odt_structure() {
        let xml = to_flat_odt(&record("R&D <Lab>"));
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains(
            "<text:h text:outline-level=\"1\">NFPA 780 Lightning Risk Assessment Report</text:h>"
        ));
        assert!(xml.contains(
            "office:mimetype=\"application/vnd.oasis.opendocument.text-flat-xml\""
        ));
        assert!(xml.contains("<text:p>Project: R&amp;D &lt;Lab&gt;</text:p>"));
        assert!(xml.contains("<text:h text:outline-level=\"2\">Input Parameters</text:h>"));
        assert_eq!(xml.matches("<table:table-row>").count(), REPORT_FIELDS.len());
        assert_eq!(xml.matches("<table:table-cell").count(), 2 * REPORT_FIELDS.len());
        assert!(xml.trim_end().ends_with("</office:document>"));

        let untitled = to_flat_odt(&record(""));
        assert!(!untitled.contains("Project: "));
    }

    #[test]
    fn test_markdown_structure() {
        let md = to_markdown(&record("Depot"));
        let lines: Vec<&str> = md.lines().collect();
        assert_eq!(lines[0], "# NFPA 780 Lightning Risk Assessment Report");
        assert_eq!(lines[2], "**Project:** Depot");
        assert!(md.contains("## Input Parameters"));
        assert!(md.contains("| Collection Area (m²) | "));
        assert_eq!(md.matches("\n| ").count(), REPORT_FIELDS.len() + 1);
    }

    #[test]
    fn test_document_mime_type_matches_extension() {
        assert_eq!(ExportFormat::Document.extension(), "fodt");
        assert_eq!(
            ExportFormat::Document.mime_type(),
            "application/vnd.oasis.opendocument.text-flat-xml"
        );
        assert_eq!(ExportFormat::Csv.mime_type(), "text/csv");
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(
            export_file_name("Pump House #2", timestamp(), ExportFormat::Csv),
            "Pump_House_2_lightning_risk_assessment_2026-03-14_09-26-53.csv"
        );
        assert_eq!(
            export_file_name("  ", timestamp(), ExportFormat::Document),
            "assessment_lightning_risk_assessment_2026-03-14_09-26-53.fodt"
        );
    }

    #[test]
    fn test_write_all_reports() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_all_reports(dir.path(), &record("Depot"), timestamp()).unwrap();
        assert_eq!(paths.len(), 3);
        for path in &paths {
            assert!(path.exists(), "{path:?}");
        }
        let md = std::fs::read_to_string(&paths[2]).unwrap();
        assert!(md.starts_with("# NFPA 780"));
    }
}
