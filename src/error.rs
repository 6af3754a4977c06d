//! Error types for report generation.

use rust_xlsxwriter::XlsxError;
use thiserror::Error;

/// Errors that can occur while turning tickets into a workbook.
#[derive(Debug, Error)]
pub enum ReportError {
    /// A record is missing a field or carries a value outside its domain.
    #[error("Invalid ticket at index {index}: field `{field}` {reason}")]
    Validation {
        index: usize,
        field: &'static str,
        reason: String,
    },

    /// Two records share the same ticket id.
    #[error("Duplicate ticket_id {ticket_id} at index {index}")]
    DuplicateTicket { index: usize, ticket_id: u64 },

    /// There are no records to aggregate.
    #[error("No tickets to report on")]
    EmptyDataset,

    /// Internal inconsistency while building a sheet or chart.
    #[error("Render error: {0}")]
    Render(String),

    /// The spreadsheet writer rejected an operation.
    #[error("Spreadsheet writer error: {0}")]
    Xlsx(#[from] XlsxError),
}

impl ReportError {
    pub fn validation(index: usize, field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            index,
            field,
            reason: reason.into(),
        }
    }

    pub fn render(reason: impl Into<String>) -> Self {
        Self::Render(reason.into())
    }

    /// Whether the caller can act on this error (fix the input, substitute data).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::DuplicateTicket { .. } | Self::EmptyDataset
        )
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_classification() {
        assert!(ReportError::EmptyDataset.is_recoverable());
        assert!(ReportError::validation(0, "status", "is unknown").is_recoverable());
        assert!(ReportError::DuplicateTicket {
            index: 1,
            ticket_id: 7
        }
        .is_recoverable());
        assert!(!ReportError::render("range mismatch").is_recoverable());
    }

    #[test]
    fn test_validation_message_names_field() {
        let err = ReportError::validation(3, "engineer", "is missing");
        assert_eq!(
            err.to_string(),
            "Invalid ticket at index 3: field `engineer` is missing"
        );
    }
}
