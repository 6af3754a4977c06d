use crate::error::{ReportError, Result};
use chrono::NaiveDateTime;
use rust_xlsxwriter::Workbook;
use tracing::debug;

/// Sortable timestamp embedded in the download name.
pub const FILE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// A finished report, ready to hand to whoever persists or sends it.
#[derive(Debug, Clone)]
pub struct ReportFile {
    pub file_name: String,
    /// Instant the file name was stamped with.
    pub generated_at: NaiveDateTime,
    pub bytes: Vec<u8>,
}

impl ReportFile {
    pub const CONTENT_TYPE: &'static str =
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
}

pub fn report_file_name(generated_at: NaiveDateTime) -> String {
    format!(
        "Reporte_Tickets_{}.xlsx",
        generated_at.format(FILE_TIMESTAMP_FORMAT)
    )
}

/// Serialize the workbook into memory. Nothing is written to disk.
pub fn emit(mut workbook: Workbook, generated_at: NaiveDateTime) -> Result<ReportFile> {
    let bytes = workbook
        .save_to_buffer()
        .map_err(|e| ReportError::render(format!("failed to serialize workbook: {}", e)))?;
    let file_name = report_file_name(generated_at);
    debug!(file = %file_name, bytes = bytes.len(), "emitted workbook");
    Ok(ReportFile {
        file_name,
        generated_at,
        bytes,
    })
}
