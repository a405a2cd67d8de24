//! String-backed enums stored in text columns.
//!
//! Each mirrors a core enum; the `From` impls are the only bridge between
//! the persisted and domain representations.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use stockflow_core::document as core_document;
use stockflow_core::stock as core_stock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum DocumentDomain {
    #[sea_orm(string_value = "sale")]
    Sale,
    #[sea_orm(string_value = "purchase")]
    Purchase,
    #[sea_orm(string_value = "stock")]
    Stock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "validated")]
    Validated,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "archived")]
    Archived,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    #[sea_orm(string_value = "sale_invoice")]
    SaleInvoice,
    #[sea_orm(string_value = "sale_delivery")]
    SaleDelivery,
    #[sea_orm(string_value = "sale_return")]
    SaleReturn,
    #[sea_orm(string_value = "purchase_invoice")]
    PurchaseInvoice,
    #[sea_orm(string_value = "purchase_receipt")]
    PurchaseReceipt,
    #[sea_orm(string_value = "purchase_return")]
    PurchaseReturn,
    #[sea_orm(string_value = "transfer_in")]
    TransferIn,
    #[sea_orm(string_value = "transfer_out")]
    TransferOut,
    #[sea_orm(string_value = "adjustment_increase")]
    AdjustmentIncrease,
    #[sea_orm(string_value = "adjustment_decrease")]
    AdjustmentDecrease,
    #[sea_orm(string_value = "manual_entry")]
    ManualEntry,
    #[sea_orm(string_value = "manual_exit")]
    ManualExit,
}

impl From<core_document::DocumentDomain> for DocumentDomain {
    fn from(domain: core_document::DocumentDomain) -> Self {
        match domain {
            core_document::DocumentDomain::Sale => Self::Sale,
            core_document::DocumentDomain::Purchase => Self::Purchase,
            core_document::DocumentDomain::Stock => Self::Stock,
        }
    }
}

impl From<DocumentDomain> for core_document::DocumentDomain {
    fn from(domain: DocumentDomain) -> Self {
        match domain {
            DocumentDomain::Sale => Self::Sale,
            DocumentDomain::Purchase => Self::Purchase,
            DocumentDomain::Stock => Self::Stock,
        }
    }
}

impl From<core_document::DocumentStatus> for DocumentStatus {
    fn from(status: core_document::DocumentStatus) -> Self {
        match status {
            core_document::DocumentStatus::Draft => Self::Draft,
            core_document::DocumentStatus::Validated => Self::Validated,
            core_document::DocumentStatus::Cancelled => Self::Cancelled,
            core_document::DocumentStatus::Completed => Self::Completed,
            core_document::DocumentStatus::Archived => Self::Archived,
        }
    }
}

impl From<DocumentStatus> for core_document::DocumentStatus {
    fn from(status: DocumentStatus) -> Self {
        match status {
            DocumentStatus::Draft => Self::Draft,
            DocumentStatus::Validated => Self::Validated,
            DocumentStatus::Cancelled => Self::Cancelled,
            DocumentStatus::Completed => Self::Completed,
            DocumentStatus::Archived => Self::Archived,
        }
    }
}

impl From<core_stock::MovementType> for MovementType {
    fn from(kind: core_stock::MovementType) -> Self {
        match kind {
            core_stock::MovementType::SaleInvoice => Self::SaleInvoice,
            core_stock::MovementType::SaleDelivery => Self::SaleDelivery,
            core_stock::MovementType::SaleReturn => Self::SaleReturn,
            core_stock::MovementType::PurchaseInvoice => Self::PurchaseInvoice,
            core_stock::MovementType::PurchaseReceipt => Self::PurchaseReceipt,
            core_stock::MovementType::PurchaseReturn => Self::PurchaseReturn,
            core_stock::MovementType::TransferIn => Self::TransferIn,
            core_stock::MovementType::TransferOut => Self::TransferOut,
            core_stock::MovementType::AdjustmentIncrease => Self::AdjustmentIncrease,
            core_stock::MovementType::AdjustmentDecrease => Self::AdjustmentDecrease,
            core_stock::MovementType::ManualEntry => Self::ManualEntry,
            core_stock::MovementType::ManualExit => Self::ManualExit,
        }
    }
}

impl From<MovementType> for core_stock::MovementType {
    fn from(kind: MovementType) -> Self {
        match kind {
            MovementType::SaleInvoice => Self::SaleInvoice,
            MovementType::SaleDelivery => Self::SaleDelivery,
            MovementType::SaleReturn => Self::SaleReturn,
            MovementType::PurchaseInvoice => Self::PurchaseInvoice,
            MovementType::PurchaseReceipt => Self::PurchaseReceipt,
            MovementType::PurchaseReturn => Self::PurchaseReturn,
            MovementType::TransferIn => Self::TransferIn,
            MovementType::TransferOut => Self::TransferOut,
            MovementType::AdjustmentIncrease => Self::AdjustmentIncrease,
            MovementType::AdjustmentDecrease => Self::AdjustmentDecrease,
            MovementType::ManualEntry => Self::ManualEntry,
            MovementType::ManualExit => Self::ManualExit,
        }
    }
}
