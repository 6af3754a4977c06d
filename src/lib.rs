//! Support-ticket spreadsheet reports.
//!
//! Raw ticket rows are validated, aggregated into status and per-engineer
//! summaries, laid out across five sheets with charts bound to the exact
//! table ranges, and serialized to an in-memory `.xlsx`.

pub mod aggregate;
pub mod charts;
pub mod config;
pub mod emit;
pub mod error;
pub mod loader;
pub mod output;
pub mod sample;
pub mod sheets;
pub mod table;
pub mod theme;
pub mod types;
pub mod util;

pub use aggregate::{aggregate, Aggregates, EngineerRating, EngineerStatusMatrix, StatusSummary};
pub use emit::ReportFile;
pub use error::ReportError;
pub use sheets::WorkbookLayout;
pub use theme::ReportTheme;
pub use types::{RawTicket, Status, TicketRecord};

use chrono::{Local, NaiveDateTime};
use tracing::info;

/// A generated report together with the data and layout it was built from.
#[derive(Debug)]
pub struct Report {
    pub file: ReportFile,
    pub aggregates: Aggregates,
    pub layout: WorkbookLayout,
}

/// Validate raw rows and build the report, stamped with the local time.
pub fn generate_report(raw: &[RawTicket]) -> error::Result<ReportFile> {
    let tickets = loader::validate_tickets(raw)?;
    let report = build_report(&tickets, &ReportTheme::DEFAULT, Local::now().naive_local())?;
    Ok(report.file)
}

/// Build a report from typed tickets at a fixed timestamp.
pub fn generate_report_at(
    tickets: &[TicketRecord],
    theme: &ReportTheme,
    generated_at: NaiveDateTime,
) -> error::Result<ReportFile> {
    Ok(build_report(tickets, theme, generated_at)?.file)
}

/// Tickets are re-checked here, so hand-built records fail with the same
/// `Validation` / `DuplicateTicket` errors as raw input.
pub fn build_report(
    tickets: &[TicketRecord],
    theme: &ReportTheme,
    generated_at: NaiveDateTime,
) -> error::Result<Report> {
    loader::check_tickets(tickets)?;
    let aggregates = aggregate(tickets, &theme.weights)?;
    let (workbook, layout) = sheets::compose_workbook(tickets, &aggregates, theme)?;
    let file = emit::emit(workbook, generated_at)?;
    info!(
        tickets = aggregates.total,
        engineers = aggregates.engineer_matrix.len(),
        file = %file.file_name,
        "generated report"
    );
    Ok(Report {
        file,
        aggregates,
        layout,
    })
}
