//! Perpetual inventory ledger.
//!
//! This module implements:
//! - The twelve canonical movement types and their resolution from documents
//! - The ledger entry factory (sign policy, cost resolution, transfers, reversals)
//! - The balance projector and availability checks

pub mod balance;
pub mod entry;
pub mod error;
pub mod movement;

#[cfg(test)]
mod balance_props;
#[cfg(test)]
mod entry_props;

pub use balance::{BalanceProjection, BalanceProjector, EntrySnapshot, StockLevel};
pub use entry::{LedgerEntryFactory, LineMovement, NewLedgerEntry, PostedEntry};
pub use error::StockError;
pub use movement::{MovementDirection, MovementPlan, MovementResolver, MovementType, TRANSFER_TYPE};
