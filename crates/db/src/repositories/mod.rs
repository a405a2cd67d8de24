//! Repository abstractions for data access.
//!
//! Repositories own their `DatabaseConnection` and run every mutating
//! operation inside a single transaction.

pub mod document;
pub mod error;
pub mod numbering;
pub mod stock;

pub use document::{DocumentFilter, DocumentRepository, DocumentWithLines};
pub use error::{InventoryError, SequenceError};
pub use numbering::SequenceRepository;
pub use stock::{JournalFilter, StockBalanceView, StockRepository};
