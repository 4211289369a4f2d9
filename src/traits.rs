//! Traits for storage abstraction and extensibility

use async_trait::async_trait;
use bigdecimal::BigDecimal;

use crate::types::*;

/// Storage abstraction for purchase documents
///
/// This trait allows the purchase core to work with any storage backend
/// (MongoDB, PostgreSQL, in-memory, etc.) by implementing these methods.
#[async_trait]
pub trait DocumentStorage: Send + Sync {
    /// Save a new document
    async fn save_document(&mut self, document: &PurchaseDocument) -> PurchaseResult<()>;

    /// Get a document by ID
    async fn get_document(&self, document_id: &str) -> PurchaseResult<Option<PurchaseDocument>>;

    /// List documents, optionally filtered by kind and status
    async fn list_documents(
        &self,
        kind: Option<DocumentKind>,
        status: Option<DocumentStatus>,
    ) -> PurchaseResult<Vec<PurchaseDocument>>;

    /// Replace an existing document
    async fn update_document(&mut self, document: &PurchaseDocument) -> PurchaseResult<()>;

    /// Delete a document
    async fn delete_document(&mut self, document_id: &str) -> PurchaseResult<()>;
}

/// Storage backend for autosaved drafts, holding serialized payloads by key
#[async_trait]
pub trait DraftStorage: Send + Sync {
    async fn save_draft(&mut self, key: &str, payload: &str) -> PurchaseResult<()>;

    async fn load_draft(&self, key: &str) -> PurchaseResult<Option<String>>;

    /// Remove a draft, returning whether one existed
    async fn remove_draft(&mut self, key: &str) -> PurchaseResult<bool>;
}

/// Trait for implementing custom line item validation rules
pub trait LineItemValidator: Send + Sync {
    /// Validate a line item before it is calculated
    fn validate_line_item(&self, item: &LineItem) -> PurchaseResult<()>;

    /// Validate document-level discount and charges
    fn validate_adjustments(&self, adjustments: &DocumentAdjustments) -> PurchaseResult<()>;
}

/// Default validator: positive quantity and non-negative amounts.
/// Lines without a selected item are not checked since they are left out
/// of totals.
pub struct DefaultLineItemValidator;

impl LineItemValidator for DefaultLineItemValidator {
    fn validate_line_item(&self, item: &LineItem) -> PurchaseResult<()> {
        if !item.is_selected() {
            return Ok(());
        }

        let zero = BigDecimal::from(0);

        if item.quantity <= zero {
            return Err(PurchaseError::Validation(format!(
                "Quantity must be positive for '{}'",
                item.description
            )));
        }

        if item.rate < zero {
            return Err(PurchaseError::Validation(format!(
                "Rate cannot be negative for '{}'",
                item.description
            )));
        }

        if item.discount < zero {
            return Err(PurchaseError::Validation(format!(
                "Discount cannot be negative for '{}'",
                item.description
            )));
        }

        if item.discount_type == DiscountType::Percentage && item.discount > BigDecimal::from(100) {
            return Err(PurchaseError::Validation(format!(
                "Discount percentage cannot exceed 100 for '{}'",
                item.description
            )));
        }

        if item.tax_rate < zero || item.tax_rate > BigDecimal::from(100) {
            return Err(PurchaseError::Validation(format!(
                "Tax rate must be between 0 and 100 for '{}'",
                item.description
            )));
        }

        Ok(())
    }

    fn validate_adjustments(&self, adjustments: &DocumentAdjustments) -> PurchaseResult<()> {
        let zero = BigDecimal::from(0);
        let fields = [
            ("Bill discount", &adjustments.bill_discount),
            ("Shipping charges", &adjustments.shipping_charges),
            ("Packing charges", &adjustments.packing_charges),
            ("Other charges", &adjustments.other_charges),
            ("TDS amount", &adjustments.tds_amount),
        ];

        for (name, amount) in fields {
            if *amount < zero {
                return Err(PurchaseError::Validation(format!(
                    "{} cannot be negative",
                    name
                )));
            }
        }

        Ok(())
    }
}
