//! Read-only lookup tables shared by the aggregator and the sheet builders.
//!
//! Nothing here is mutable at runtime; callers pass a `&ReportTheme` (or a
//! `&RatingWeights`) down the pipeline instead of reaching for globals.

use crate::types::Status;

/// Score each ticket contributes to its engineer's rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingWeights {
    pub open: u32,
    pub in_progress: u32,
    pub closed: u32,
}

impl RatingWeights {
    pub const DEFAULT: RatingWeights = RatingWeights {
        open: 1,
        in_progress: 3,
        closed: 5,
    };

    pub fn weight(&self, status: Status) -> u32 {
        match status {
            Status::Open => self.open,
            Status::InProgress => self.in_progress,
            Status::Closed => self.closed,
        }
    }

    pub fn min(&self) -> u32 {
        self.open.min(self.in_progress).min(self.closed)
    }

    pub fn max(&self) -> u32 {
        self.open.max(self.in_progress).max(self.closed)
    }
}

impl Default for RatingWeights {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Fill colors per status, as `0xRRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusPalette {
    pub open: u32,
    pub in_progress: u32,
    pub closed: u32,
}

impl StatusPalette {
    pub const DEFAULT: StatusPalette = StatusPalette {
        open: 0xFF9999,
        in_progress: 0xFFE699,
        closed: 0xC6EFCE,
    };

    pub fn color(&self, status: Status) -> u32 {
        match status {
            Status::Open => self.open,
            Status::InProgress => self.in_progress,
            Status::Closed => self.closed,
        }
    }
}

/// Everything the sheet builders need besides the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportTheme {
    pub status: StatusPalette,
    pub weights: RatingWeights,
    pub table_header: u32,
    pub table_zebra: u32,
    pub summary_header: u32,
    pub summary_title: u32,
    pub summary_tab: u32,
    pub callout: u32,
    /// Extra characters added to a header label to size its column.
    pub column_padding: usize,
}

impl ReportTheme {
    pub const DEFAULT: ReportTheme = ReportTheme {
        status: StatusPalette::DEFAULT,
        weights: RatingWeights::DEFAULT,
        table_header: 0x1F4E79,
        table_zebra: 0xD9E1F2,
        summary_header: 0x4F81BD,
        summary_title: 0xE6E6E6,
        summary_tab: 0xA6A6A6,
        callout: 0xFFF2CC,
        column_padding: 12,
    };
}

impl Default for ReportTheme {
    fn default() -> Self {
        Self::DEFAULT
    }
}
