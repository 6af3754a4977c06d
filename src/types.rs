use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use tabled::Tabled;

/// A loosely typed scalar as it arrives from JSON or CSV, before validation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Int(i64),
    Float(f64),
    Text(String),
    /// Anything else (booleans, arrays, objects). Kept so validation can
    /// name the record and field instead of failing the whole payload.
    Other(serde_json::Value),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTicket {
    #[serde(default)]
    pub ticket_id: Option<RawValue>,
    #[serde(default)]
    pub date: Option<RawValue>,
    #[serde(default)]
    pub status: Option<RawValue>,
    #[serde(default)]
    pub engineer: Option<RawValue>,
}

/// Request body shape: `{ "tickets": [...] }`.
#[derive(Debug, Default, Deserialize)]
pub struct TicketPayload {
    #[serde(default)]
    pub tickets: Vec<RawTicket>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Status {
    Open,
    InProgress,
    Closed,
}

impl Status {
    /// Column order used by every per-status table and chart.
    pub const ALL: [Status; 3] = [Status::Open, Status::InProgress, Status::Closed];

    /// Label written into the workbook.
    pub fn label(self) -> &'static str {
        match self {
            Status::Open => "Abierto",
            Status::InProgress => "En proceso",
            Status::Closed => "Cerrado",
        }
    }

    pub fn parse(s: &str) -> Option<Status> {
        let key = s.trim().to_lowercase();
        match key.as_str() {
            "abierto" | "open" => Some(Status::Open),
            "en proceso" | "inprogress" | "in progress" | "in_progress" => {
                Some(Status::InProgress)
            }
            "cerrado" | "closed" => Some(Status::Closed),
            _ => None,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TicketRecord {
    pub ticket_id: u64,
    pub date: NaiveDateTime,
    pub status: Status,
    pub engineer: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct StatusCountRow {
    #[serde(rename = "Estatus")]
    #[tabled(rename = "Estatus")]
    pub status: String,
    #[serde(rename = "Cantidad")]
    #[tabled(rename = "Cantidad")]
    pub count: usize,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct EngineerStatusRow {
    #[serde(rename = "engineer")]
    #[tabled(rename = "engineer")]
    pub engineer: String,
    #[serde(rename = "Abierto")]
    #[tabled(rename = "Abierto")]
    pub open: usize,
    #[serde(rename = "En proceso")]
    #[tabled(rename = "En proceso")]
    pub in_progress: usize,
    #[serde(rename = "Cerrado")]
    #[tabled(rename = "Cerrado")]
    pub closed: usize,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct EngineerRatingRow {
    #[serde(rename = "Ingeniero")]
    #[tabled(rename = "Ingeniero")]
    pub engineer: String,
    #[serde(rename = "Rating Promedio")]
    #[tabled(rename = "Rating Promedio")]
    pub rating: String,
}

/// Machine-readable companion to the workbook, written as `summary.json`.
#[derive(Debug, Serialize)]
pub struct ReportSummary {
    pub file_name: String,
    pub generated_at: String,
    pub total_tickets: usize,
    pub status_counts: Vec<StatusCountRow>,
    pub engineers: Vec<EngineerStatusRow>,
    pub top_engineer: Option<String>,
    pub top_rating: Option<f64>,
}
