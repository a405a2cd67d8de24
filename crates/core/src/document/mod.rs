//! Commercial and stock documents.
//!
//! This module implements:
//! - Document domain types and the related-entity reference
//! - The line calculator and header totals
//! - Input validation
//! - The prepared document aggregate
//! - The lifecycle state machine

pub mod aggregate;
pub mod error;
pub mod lifecycle;
pub mod line;
pub mod types;
pub mod validation;

#[cfg(test)]
mod lifecycle_props;
#[cfg(test)]
mod line_props;

pub use aggregate::{PreparedDocument, PreparedLine};
pub use error::DocumentError;
pub use lifecycle::DocumentLifecycle;
pub use line::{AMOUNT_SCALE, DocumentTotals, LineAmounts, LineCalculator, QUANTITY_SCALE};
pub use types::{
    CreateDocumentInput, DocumentDomain, DocumentHeader, DocumentLineInput, DocumentPatch,
    DocumentStatus, LifecycleAction, RelatedEntity,
};
pub use validation::{DocumentValidator, MAX_REFERENCE_LEN};
