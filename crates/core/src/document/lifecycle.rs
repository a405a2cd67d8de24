//! Document lifecycle state machine.
//!
//! Pure transition checks. Persisting the new status and emitting ledger
//! entries is the caller's job, driven by the returned [`LifecycleAction`].

use chrono::Utc;
use stockflow_shared::types::UserId;

use crate::document::error::DocumentError;
use crate::document::types::{DocumentStatus, LifecycleAction};

/// Stateless service for document status transitions.
pub struct DocumentLifecycle;

impl DocumentLifecycle {
    /// Validate a draft document.
    ///
    /// # Returns
    /// * `Ok(LifecycleAction::Validate)` if the document is a draft
    /// * `Err(DocumentError::InvalidState)` otherwise
    pub fn validate(
        current_status: DocumentStatus,
        validated_by: UserId,
    ) -> Result<LifecycleAction, DocumentError> {
        match current_status {
            DocumentStatus::Draft => Ok(LifecycleAction::Validate {
                new_status: DocumentStatus::Validated,
                validated_by,
                validated_at: Utc::now(),
            }),
            _ => Err(DocumentError::InvalidState {
                action: "validate",
                current: current_status,
            }),
        }
    }

    /// Cancel a document that is not already cancelled.
    ///
    /// `reverse_on_cancel` enables compensating entries; they are only
    /// requested when the document may have moved stock.
    pub fn cancel(
        current_status: DocumentStatus,
        cancelled_by: UserId,
        reverse_on_cancel: bool,
    ) -> Result<LifecycleAction, DocumentError> {
        match current_status {
            DocumentStatus::Cancelled => Err(DocumentError::InvalidState {
                action: "cancel",
                current: current_status,
            }),
            _ => Ok(LifecycleAction::Cancel {
                previous_status: current_status,
                new_status: DocumentStatus::Cancelled,
                cancelled_by,
                cancelled_at: Utc::now(),
                reverse_stock: reverse_on_cancel && current_status.has_stock_impact(),
            }),
        }
    }

    /// Ensures header fields and lines may be replaced.
    pub fn ensure_editable(current_status: DocumentStatus) -> Result<(), DocumentError> {
        if current_status.is_editable() {
            Ok(())
        } else {
            Err(DocumentError::InvalidState {
                action: "update",
                current: current_status,
            })
        }
    }

    /// Ensures the document may be physically deleted.
    pub fn ensure_deletable(current_status: DocumentStatus) -> Result<(), DocumentError> {
        if current_status == DocumentStatus::Draft {
            Ok(())
        } else {
            Err(DocumentError::InvalidState {
                action: "delete",
                current: current_status,
            })
        }
    }
}
