use crate::error::{ReportError, Result};
use crate::types::{RawTicket, RawValue, Status, TicketPayload, TicketRecord};
use crate::util::{parse_datetime_safe, parse_id_safe, text_field, MAX_TICKET_ID};
use chrono::Datelike;
use csv::ReaderBuilder;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// Spreadsheet date-times cannot represent years outside this range.
const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1900..=9999;

/// Turn raw rows into validated tickets, preserving input order.
///
/// An empty slice is reported as `EmptyDataset` before any record is looked
/// at; the first invalid record aborts the whole batch.
pub fn validate_tickets(raw: &[RawTicket]) -> Result<Vec<TicketRecord>> {
    if raw.is_empty() {
        return Err(ReportError::EmptyDataset);
    }
    let mut seen: HashSet<u64> = HashSet::with_capacity(raw.len());
    let mut out = Vec::with_capacity(raw.len());
    for (index, row) in raw.iter().enumerate() {
        let ticket = validate_ticket(index, row)
            .and_then(|t| claim_id(&mut seen, index, t.ticket_id).map(|()| t))
            .inspect_err(|e| warn!("Rejected input: {}", e))?;
        out.push(ticket);
    }
    debug!(count = out.len(), "validated tickets");
    Ok(out)
}

/// Re-check tickets that were built directly rather than through
/// [`validate_tickets`]: same errors, same record indexes.
pub fn check_tickets(tickets: &[TicketRecord]) -> Result<()> {
    if tickets.is_empty() {
        return Err(ReportError::EmptyDataset);
    }
    let mut seen: HashSet<u64> = HashSet::with_capacity(tickets.len());
    for (index, t) in tickets.iter().enumerate() {
        check_record(index, t)
            .and_then(|()| claim_id(&mut seen, index, t.ticket_id))
            .inspect_err(|e| warn!("Rejected tickets: {}", e))?;
    }
    Ok(())
}

fn claim_id(seen: &mut HashSet<u64>, index: usize, ticket_id: u64) -> Result<()> {
    if !seen.insert(ticket_id) {
        return Err(ReportError::DuplicateTicket { index, ticket_id });
    }
    Ok(())
}

/// Invariants every ticket holds, however it was built.
fn check_record(index: usize, t: &TicketRecord) -> Result<()> {
    if !(1..=MAX_TICKET_ID).contains(&t.ticket_id) {
        return Err(ReportError::validation(
            index,
            "ticket_id",
            format!("{} is not between 1 and {}", t.ticket_id, MAX_TICKET_ID),
        ));
    }
    if !YEAR_RANGE.contains(&t.date.year()) {
        return Err(ReportError::validation(
            index,
            "date",
            format!("year {} is out of range", t.date.year()),
        ));
    }
    if t.engineer.trim().is_empty() {
        return Err(ReportError::validation(index, "engineer", "is missing"));
    }
    Ok(())
}

/// Fields that arrived as booleans, arrays or objects.
fn reject_unsupported(index: usize, field: &'static str, v: Option<&RawValue>) -> Result<()> {
    match v {
        Some(RawValue::Other(_)) => Err(ReportError::validation(
            index,
            field,
            "has an unsupported type",
        )),
        _ => Ok(()),
    }
}

fn validate_ticket(index: usize, row: &RawTicket) -> Result<TicketRecord> {
    reject_unsupported(index, "ticket_id", row.ticket_id.as_ref())?;
    reject_unsupported(index, "date", row.date.as_ref())?;
    reject_unsupported(index, "status", row.status.as_ref())?;
    reject_unsupported(index, "engineer", row.engineer.as_ref())?;

    let ticket_id = match &row.ticket_id {
        None => return Err(ReportError::validation(index, "ticket_id", "is missing")),
        Some(v) => parse_id_safe(Some(v)).ok_or_else(|| {
            ReportError::validation(index, "ticket_id", format!("{:?} is not a positive integer", v))
        })?,
    };

    let date = match &row.date {
        None => return Err(ReportError::validation(index, "date", "is missing")),
        Some(v) => parse_datetime_safe(Some(v)).ok_or_else(|| {
            ReportError::validation(index, "date", format!("{:?} is not a timestamp", v))
        })?,
    };

    let status_text = text_field(row.status.as_ref())
        .ok_or_else(|| ReportError::validation(index, "status", "is missing"))?;
    let status = Status::parse(&status_text).ok_or_else(|| {
        ReportError::validation(index, "status", format!("`{}` is not a known status", status_text))
    })?;

    let engineer = text_field(row.engineer.as_ref())
        .ok_or_else(|| ReportError::validation(index, "engineer", "is missing"))?;

    let ticket = TicketRecord {
        ticket_id,
        date,
        status,
        engineer,
    };
    check_record(index, &ticket)?;
    Ok(ticket)
}

/// Parse a JSON payload: either `{ "tickets": [...] }` or a bare array.
pub fn parse_json_payload(text: &str) -> std::result::Result<Vec<RawTicket>, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    if value.is_array() {
        return serde_json::from_value(value);
    }
    let payload: TicketPayload = serde_json::from_value(value)?;
    Ok(payload.tickets)
}

/// Read CSV rows with a `ticket_id,date,status,engineer` header.
pub fn parse_csv<R: Read>(reader: R) -> std::result::Result<Vec<RawTicket>, csv::Error> {
    let mut rdr = ReaderBuilder::new().flexible(true).trim(csv::Trim::All).from_reader(reader);
    let mut rows = Vec::new();
    for result in rdr.deserialize::<RawTicket>() {
        rows.push(result?);
    }
    Ok(rows)
}

/// Load raw rows from a `.json` or `.csv` file, chosen by extension.
pub fn load_raw(path: &Path) -> anyhow::Result<Vec<RawTicket>> {
    use anyhow::Context;
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if is_csv {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        return parse_csv(file).with_context(|| format!("Failed to parse CSV {}", path.display()));
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_json_payload(&text).with_context(|| format!("Failed to parse JSON {}", path.display()))
}
