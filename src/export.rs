use std::path::PathBuf;

use chrono::NaiveDate;
use tracing::{info, instrument};

use crate::assemble;
use crate::db::StudentDb;
use crate::error::{ExportError, Result};
use crate::io::excel_write;
use crate::io::fixed_width;
use crate::model::{DateWindow, InstitutionProfile};

/// Inputs for one export run.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub database: PathBuf,
    pub output_dir: PathBuf,
    pub window: DateWindow,
    pub profile: InstitutionProfile,
    pub transmission_date: NaiveDate,
}

/// Outcome of a successful export run.
#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub detail_records: usize,
    pub submission_path: PathBuf,
    pub workbook_path: PathBuf,
}

/// Runs the full export: retrieves the degree completions in the window,
/// assembles the detail records, and emits the review workbook and the
/// fixed-width submission file.
#[instrument(
    level = "info",
    skip_all,
    fields(
        database = %options.database.display(),
        start = %options.window.start(),
        end = %options.window.end(),
    )
)]
pub fn generate(options: &ExportOptions) -> Result<ExportSummary> {
    if !options.database.exists() {
        return Err(ExportError::MissingInput(options.database.clone()));
    }

    let db = StudentDb::open(&options.database)?;
    let completions = db.completions(&options.window)?;
    info!(row_count = completions.len(), "retrieved degree completions");
    let minors = db.minors(&options.window)?;
    let spans = db.attendance_spans()?;
    drop(db);

    let records = assemble::build_records(completions, &spans, &minors);
    info!(record_count = records.len(), "assembled detail records");

    let stem = output_stem(&options.window);
    let workbook_path = options.output_dir.join(format!("{stem}.xlsx"));
    excel_write::write_workbook(&workbook_path, &records)?;
    info!(path = %workbook_path.display(), "review workbook written");

    let submission_path = options.output_dir.join(format!("{stem}.txt"));
    let detail_records = fixed_width::write_submission_file(
        &submission_path,
        &options.profile,
        &options.window,
        options.transmission_date,
        &records,
    )?;
    info!(path = %submission_path.display(), detail_records, "submission file written");

    Ok(ExportSummary {
        detail_records,
        submission_path,
        workbook_path,
    })
}

/// Deterministic output name so identical runs produce identical paths.
fn output_stem(window: &DateWindow) -> String {
    format!(
        "DegreeVerify_{}-{}",
        window.start().format("%Y%m%d"),
        window.end().format("%Y%m%d")
    )
}
