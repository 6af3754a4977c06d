use crate::error::{ReportError, Result};
use crate::theme::RatingWeights;
use crate::types::{EngineerRatingRow, EngineerStatusRow, Status, StatusCountRow, TicketRecord};
use crate::util::{average_hundredths, format_hundredths};
use std::collections::{BTreeMap, HashMap};

/// Per-status counters, always holding all three statuses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub open: usize,
    pub in_progress: usize,
    pub closed: usize,
}

impl StatusCounts {
    pub fn get(&self, status: Status) -> usize {
        match status {
            Status::Open => self.open,
            Status::InProgress => self.in_progress,
            Status::Closed => self.closed,
        }
    }

    fn bump(&mut self, status: Status) {
        match status {
            Status::Open => self.open += 1,
            Status::InProgress => self.in_progress += 1,
            Status::Closed => self.closed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.open + self.in_progress + self.closed
    }
}

/// Count of tickets per status present in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSummary {
    entries: Vec<(Status, usize)>,
}

impl StatusSummary {
    /// Statuses with at least one ticket, most frequent first.
    pub fn entries(&self) -> &[(Status, usize)] {
        &self.entries
    }

    pub fn count(&self, status: Status) -> usize {
        self.entries
            .iter()
            .find(|(s, _)| *s == status)
            .map(|(_, c)| *c)
            .unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, c)| c).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn rows(&self) -> Vec<StatusCountRow> {
        self.entries
            .iter()
            .map(|(s, c)| StatusCountRow {
                status: s.label().to_string(),
                count: *c,
            })
            .collect()
    }
}

/// Engineer x status crosstab, one row per engineer ordered by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineerStatusMatrix {
    rows: Vec<(String, StatusCounts)>,
}

impl EngineerStatusMatrix {
    pub fn rows(&self) -> &[(String, StatusCounts)] {
        &self.rows
    }

    pub fn get(&self, engineer: &str) -> Option<&StatusCounts> {
        self.rows
            .iter()
            .find(|(e, _)| e == engineer)
            .map(|(_, c)| c)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn table_rows(&self) -> Vec<EngineerStatusRow> {
        self.rows
            .iter()
            .map(|(engineer, c)| EngineerStatusRow {
                engineer: engineer.clone(),
                open: c.open,
                in_progress: c.in_progress,
                closed: c.closed,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineerRating {
    pub engineer: String,
    pub tickets: usize,
    /// Average score in hundredths (`233` means 2.33).
    pub hundredths: u32,
}

impl EngineerRating {
    pub fn score(&self) -> f64 {
        self.hundredths as f64 / 100.0
    }

    pub fn display_score(&self) -> String {
        format_hundredths(self.hundredths)
    }
}

/// Everything the sheet builders consume, derived once per report.
#[derive(Debug, Clone)]
pub struct Aggregates {
    pub total: usize,
    pub status_summary: StatusSummary,
    pub engineer_matrix: EngineerStatusMatrix,
    /// Best first; ties keep first-appearance order.
    pub ratings: Vec<EngineerRating>,
}

impl Aggregates {
    pub fn top_engineer(&self) -> Option<&EngineerRating> {
        self.ratings.first()
    }

    pub fn rating_rows(&self) -> Vec<EngineerRatingRow> {
        self.ratings
            .iter()
            .map(|r| EngineerRatingRow {
                engineer: r.engineer.clone(),
                rating: r.display_score(),
            })
            .collect()
    }
}

pub fn aggregate(data: &[TicketRecord], weights: &RatingWeights) -> Result<Aggregates> {
    if data.is_empty() {
        return Err(ReportError::EmptyDataset);
    }
    Ok(Aggregates {
        total: data.len(),
        status_summary: summarize_status(data),
        engineer_matrix: engineer_matrix(data),
        ratings: engineer_ratings(data, weights),
    })
}

pub fn summarize_status(data: &[TicketRecord]) -> StatusSummary {
    let mut counts = StatusCounts::default();
    for r in data {
        counts.bump(r.status);
    }
    let mut entries: Vec<(Status, usize)> = Status::ALL
        .iter()
        .map(|s| (*s, counts.get(*s)))
        .filter(|(_, c)| *c > 0)
        .collect();
    // Stable: equal counts stay in Open, InProgress, Closed order.
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    StatusSummary { entries }
}

pub fn engineer_matrix(data: &[TicketRecord]) -> EngineerStatusMatrix {
    let mut map: BTreeMap<&str, StatusCounts> = BTreeMap::new();
    for r in data {
        map.entry(r.engineer.as_str()).or_default().bump(r.status);
    }
    EngineerStatusMatrix {
        rows: map
            .into_iter()
            .map(|(engineer, counts)| (engineer.to_string(), counts))
            .collect(),
    }
}

pub fn engineer_ratings(data: &[TicketRecord], weights: &RatingWeights) -> Vec<EngineerRating> {
    #[derive(Default)]
    struct Acc {
        first_seen: usize,
        tickets: u64,
        points: u64,
    }
    let mut map: HashMap<&str, Acc> = HashMap::new();
    for (idx, r) in data.iter().enumerate() {
        let e = map.entry(r.engineer.as_str()).or_insert_with(|| Acc {
            first_seen: idx,
            ..Acc::default()
        });
        e.tickets += 1;
        e.points += weights.weight(r.status) as u64;
    }
    let mut tmp: Vec<(usize, EngineerRating)> = map
        .into_iter()
        .map(|(engineer, acc)| {
            (
                acc.first_seen,
                EngineerRating {
                    engineer: engineer.to_string(),
                    tickets: acc.tickets as usize,
                    hundredths: average_hundredths(acc.points, acc.tickets),
                },
            )
        })
        .collect();
    tmp.sort_by(|a, b| {
        b.1.hundredths
            .cmp(&a.1.hundredths)
            .then_with(|| a.0.cmp(&b.0))
    });
    tmp.into_iter().map(|(_, rating)| rating).collect()
}
