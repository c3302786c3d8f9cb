use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::NaiveDate;
use tempfile::NamedTempFile;

use crate::error::{ExportError, Result};
use crate::layout::{self, DETAIL_FIELDS, HEADER_FIELDS, TRAILER_FIELDS};
use crate::model::{DateWindow, DetailRecord, InstitutionProfile};

/// Records in a submission beyond the details: the header and the trailer.
const ENVELOPE_RECORDS: usize = 2;

/// Writes a complete submission to `writer`: one `DH1` header, one `DD1`
/// record per student, one `DT1` trailer. Returns the number of detail
/// records written.
pub fn write_submission<W: Write>(
    writer: &mut W,
    profile: &InstitutionProfile,
    window: &DateWindow,
    transmission_date: NaiveDate,
    records: &[DetailRecord],
) -> Result<usize> {
    layout::validate(HEADER_FIELDS)?;
    layout::validate(DETAIL_FIELDS)?;
    layout::validate(TRAILER_FIELDS)?;

    let transmission = transmission_date.format("%Y%m%d").to_string();
    let period = window.describe();
    let header = layout::render_line(HEADER_FIELDS, |name| {
        Some(match name {
            "Record Type" => "DH1".to_string(),
            "School Code" => profile.school_code.clone(),
            "Branch Code" => profile.branch_code.clone(),
            "Official School Name" => profile.school_name.clone(),
            "Standard Report Flag" => "D".to_string(),
            "Transmission Date" => transmission.clone(),
            "Degree Period" => period.clone(),
            _ => return None,
        })
    })?;
    writeln!(writer, "{header}")?;

    for record in records {
        let line = layout::render_line(DETAIL_FIELDS, |name| {
            record.field(name).map(str::to_string)
        })?;
        writeln!(writer, "{line}")?;
    }

    let total = records.len() + ENVELOPE_RECORDS;
    let trailer = layout::render_line(TRAILER_FIELDS, |name| {
        Some(match name {
            "Record Type" => "DT1".to_string(),
            "Total Record Count" => total.to_string(),
            _ => return None,
        })
    })?;
    writeln!(writer, "{trailer}")?;

    Ok(records.len())
}

/// Writes the submission through a temporary file in the destination
/// directory, renaming into place only after every record has been written.
/// A failed run leaves no partial submission file behind.
pub fn write_submission_file(
    path: &Path,
    profile: &InstitutionProfile,
    window: &DateWindow,
    transmission_date: NaiveDate,
    records: &[DetailRecord],
) -> Result<usize> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let temp = NamedTempFile::new_in(dir)?;
    let mut writer = BufWriter::new(temp);
    let written = write_submission(&mut writer, profile, window, transmission_date, records)?;
    let temp = writer
        .into_inner()
        .map_err(|error| ExportError::Io(error.into_error()))?;
    temp.persist(path)
        .map_err(|error| ExportError::Io(error.error))?;
    Ok(written)
}
