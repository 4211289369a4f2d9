//! Core types and data structures for purchase documents

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::purchase::approval::ApprovalWorkflow;
use crate::purchase::totals::DocumentTotals;
use crate::tax::gst::GstError;

/// How a line item discount is expressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    /// Discount is an absolute amount for the whole line
    #[default]
    Flat,
    /// Discount is a percentage of quantity x rate
    Percentage,
}

/// The three purchase document types sharing the same total calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Purchase bill entered against a supplier invoice
    Purchase,
    /// Purchase order sent to a supplier, received through goods receipts
    PurchaseOrder,
    /// Goods returned to a supplier, subject to multi-level approval
    PurchaseReturn,
}

impl DocumentKind {
    /// TDS is deducted only on purchase orders
    pub fn applies_tds(&self) -> bool {
        matches!(self, DocumentKind::PurchaseOrder)
    }

    /// Purchase returns go through the approval workflow instead of finalization
    pub fn requires_approval(&self) -> bool {
        matches!(self, DocumentKind::PurchaseReturn)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Purchase => "purchase",
            DocumentKind::PurchaseOrder => "purchase_order",
            DocumentKind::PurchaseReturn => "purchase_return",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status shared by all purchase documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    #[default]
    Draft,
    Finalized,
    PendingApproval,
    Approved,
    Rejected,
    Cancelled,
    Completed,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Draft => "draft",
            DocumentStatus::Finalized => "finalized",
            DocumentStatus::PendingApproval => "pending_approval",
            DocumentStatus::Approved => "approved",
            DocumentStatus::Rejected => "rejected",
            DocumentStatus::Cancelled => "cancelled",
            DocumentStatus::Completed => "completed",
        }
    }

    /// Statuses that accept supplier payments or refunds
    pub fn accepts_payment(&self) -> bool {
        matches!(
            self,
            DocumentStatus::Finalized | DocumentStatus::Approved | DocumentStatus::Completed
        )
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single line on a purchase document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Selected inventory item; lines without a selection are left out of totals
    pub item_id: Option<String>,
    /// Item name or free-text description
    pub description: String,
    /// Quantity purchased, must be positive
    pub quantity: BigDecimal,
    /// Unit price before discount and tax
    pub rate: BigDecimal,
    /// Discount amount or percentage, see `discount_type`
    pub discount: BigDecimal,
    pub discount_type: DiscountType,
    /// GST rate as a percentage (e.g. 18 for 18%)
    pub tax_rate: BigDecimal,
    pub batch_number: Option<String>,
    pub expiry_date: Option<NaiveDate>,
    /// Quantity received so far through goods receipts
    #[serde(default)]
    pub received_quantity: BigDecimal,
}

impl LineItem {
    /// Create a line item without discount
    pub fn new(
        item_id: Option<String>,
        description: String,
        quantity: BigDecimal,
        rate: BigDecimal,
        tax_rate: BigDecimal,
    ) -> Self {
        Self {
            item_id,
            description,
            quantity,
            rate,
            discount: BigDecimal::from(0),
            discount_type: DiscountType::Flat,
            tax_rate,
            batch_number: None,
            expiry_date: None,
            received_quantity: BigDecimal::from(0),
        }
    }

    /// Set the discount for this line
    pub fn with_discount(mut self, discount: BigDecimal, discount_type: DiscountType) -> Self {
        self.discount = discount;
        self.discount_type = discount_type;
        self
    }

    /// Attach batch and expiry metadata
    pub fn with_batch(mut self, batch_number: String, expiry_date: Option<NaiveDate>) -> Self {
        self.batch_number = Some(batch_number);
        self.expiry_date = expiry_date;
        self
    }

    /// Whether an inventory item has been selected for this line
    pub fn is_selected(&self) -> bool {
        self.item_id
            .as_deref()
            .is_some_and(|id| !id.trim().is_empty())
    }

    /// Quantity x rate, before any discount
    pub fn base_amount(&self) -> BigDecimal {
        &self.quantity * &self.rate
    }

    /// Quantity still expected from the supplier
    pub fn pending_quantity(&self) -> BigDecimal {
        &self.quantity - &self.received_quantity
    }
}

/// Supplier details needed for tax treatment
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierRef {
    pub id: String,
    pub name: String,
    /// Two-digit GST state code of the supplier
    pub state: Option<String>,
    pub gstin: Option<String>,
}

impl SupplierRef {
    pub fn new(id: String, name: String) -> Self {
        Self {
            id,
            name,
            state: None,
            gstin: None,
        }
    }

    pub fn with_state(mut self, state: String) -> Self {
        self.state = Some(state);
        self
    }

    pub fn with_gstin(mut self, gstin: String) -> Self {
        self.gstin = Some(gstin);
        self
    }
}

/// Document-level adjustments applied after line items
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentAdjustments {
    pub bill_discount: BigDecimal,
    pub shipping_charges: BigDecimal,
    pub packing_charges: BigDecimal,
    pub other_charges: BigDecimal,
    /// Tax deducted at source, only subtracted on purchase orders
    pub tds_amount: BigDecimal,
}

impl DocumentAdjustments {
    /// Sum of shipping, packing and other charges
    pub fn total_charges(&self) -> BigDecimal {
        &self.shipping_charges + &self.packing_charges + &self.other_charges
    }
}

/// A purchase, purchase order or purchase return
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseDocument {
    /// Unique identifier for the document
    pub id: String,
    pub kind: DocumentKind,
    /// Human-readable document number (bill number, PO number, return number)
    pub number: String,
    pub date: NaiveDate,
    pub supplier: SupplierRef,
    /// GSTIN of the business recording the document
    pub business_gstin: Option<String>,
    pub line_items: Vec<LineItem>,
    #[serde(flatten)]
    pub adjustments: DocumentAdjustments,
    pub paid_amount: BigDecimal,
    pub status: DocumentStatus,
    /// Totals derived from line items and adjustments
    #[serde(flatten)]
    pub totals: DocumentTotals,
    pub cancellation_reason: Option<String>,
    /// Approval levels, present on purchase returns once submitted
    pub approval: Option<ApprovalWorkflow>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Errors that can occur while calculating or transitioning documents
#[derive(Debug, thiserror::Error)]
pub enum PurchaseError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Calculation error: {0}")]
    Calculation(String),
    #[error("Cannot {action} a document in status {from}")]
    InvalidTransition {
        from: DocumentStatus,
        action: String,
    },
    #[error("Document not found: {0}")]
    DocumentNotFound(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error(transparent)]
    Gst(#[from] GstError),
}

impl PurchaseError {
    pub(crate) fn transition(from: DocumentStatus, action: &str) -> Self {
        PurchaseError::InvalidTransition {
            from,
            action: action.to_string(),
        }
    }
}

/// Result type for purchase operations
pub type PurchaseResult<T> = Result<T, PurchaseError>;
