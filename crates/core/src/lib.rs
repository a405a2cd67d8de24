//! Core business logic for Stockflow.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `document` - Document aggregate, line calculator, and lifecycle state machine
//! - `stock` - Movement resolution, ledger entry factory, and balance projection
//! - `numbering` - Code template formatting and fallback code schemes

pub mod document;
pub mod numbering;
pub mod stock;
