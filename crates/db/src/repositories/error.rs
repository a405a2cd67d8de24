//! Errors raised by the inventory repositories.

use sea_orm::DbErr;
use stockflow_core::document::DocumentError;
use stockflow_core::stock::StockError;
use stockflow_shared::types::LedgerEntryId;
use stockflow_shared::{AppError, ErrorKind};

/// Error types for code sequence operations.
#[derive(Debug, thiserror::Error)]
pub enum SequenceError {
    /// Another transaction advanced the same counter first.
    #[error("Concurrent modification of numbering template {domain}/{code_type}, please retry")]
    ConcurrentModification {
        /// Template domain.
        domain: String,
        /// Template type.
        code_type: String,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl SequenceError {
    /// Returns the broad classification of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ConcurrentModification { .. } => ErrorKind::Conflict,
            Self::Database(_) => ErrorKind::Internal,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ConcurrentModification { .. } => "CONCURRENT_MODIFICATION",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

/// Error types for document and stock ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    /// Document rule violation.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Ledger or balance failure.
    #[error(transparent)]
    Stock(#[from] StockError),

    /// Code generation failure.
    #[error(transparent)]
    Sequence(#[from] SequenceError),

    /// Ledger entry not found.
    #[error("Ledger entry not found: {0}")]
    EntryNotFound(LedgerEntryId),

    /// A stored row could not be mapped back to domain types.
    #[error("Corrupt record: {0}")]
    CorruptRecord(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl InventoryError {
    /// Returns the broad classification of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Document(e) => e.kind(),
            Self::Stock(e) => e.kind(),
            Self::Sequence(e) => e.kind(),
            Self::EntryNotFound(_) => ErrorKind::NotFound,
            Self::CorruptRecord(_) => ErrorKind::Consistency,
            Self::Database(_) => ErrorKind::Internal,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Document(e) => e.error_code(),
            Self::Stock(e) => e.error_code(),
            Self::Sequence(e) => e.error_code(),
            Self::EntryNotFound(_) => "LEDGER_ENTRY_NOT_FOUND",
            Self::CorruptRecord(_) => "CORRUPT_RECORD",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the offending input field, if the error points at one.
    #[must_use]
    pub fn field(&self) -> Option<String> {
        match self {
            Self::Document(e) => e.field(),
            _ => None,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::Validation => 422,
            ErrorKind::State | ErrorKind::Conflict => 409,
            ErrorKind::NotFound => 404,
            ErrorKind::Consistency | ErrorKind::Internal => 500,
        }
    }

    /// Returns true if the caller may retry the operation unchanged.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }
}

impl From<InventoryError> for AppError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::Database(e) | InventoryError::Sequence(SequenceError::Database(e)) => {
                Self::Database(e.to_string())
            }
            other => Self::from_kind(other.kind(), other.to_string()),
        }
    }
}
