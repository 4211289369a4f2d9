//! Purchase book orchestrating documents over a storage backend

use bigdecimal::BigDecimal;

use crate::purchase::approval::ApprovalProgress;
use crate::purchase::document::{DocumentParams, GoodsReceiptLine};
use crate::purchase::totals::PurchaseCalculator;
use crate::settings::CalculatorConfig;
use crate::traits::*;
use crate::types::*;

/// Main entry point for purchase operations. Every mutation recomputes
/// totals before the document is persisted.
pub struct PurchaseBook<S: DocumentStorage> {
    storage: S,
    calculator: PurchaseCalculator,
}

impl<S: DocumentStorage> PurchaseBook<S> {
    /// Create a new purchase book with the default configuration
    pub fn new(storage: S) -> Self {
        Self::with_calculator(storage, PurchaseCalculator::default())
    }

    /// Create a purchase book with a given configuration
    pub fn with_config(storage: S, config: CalculatorConfig) -> Self {
        Self::with_calculator(storage, PurchaseCalculator::new(config))
    }

    /// Create a purchase book with a custom calculator (and validator)
    pub fn with_calculator(storage: S, calculator: PurchaseCalculator) -> Self {
        Self {
            storage,
            calculator,
        }
    }

    pub fn calculator(&self) -> &PurchaseCalculator {
        &self.calculator
    }

    /// Create and store a new draft
    pub async fn create_draft(&mut self, params: DocumentParams) -> PurchaseResult<PurchaseDocument> {
        let document = PurchaseDocument::draft(params, &self.calculator)?;
        self.storage.save_document(&document).await?;

        tracing::info!(
            id = document.id.as_str(),
            number = document.number.as_str(),
            kind = %document.kind,
            total = %document.totals.total_amount,
            "draft created"
        );
        Ok(document)
    }

    /// Get a document by ID
    pub async fn get_document(&self, document_id: &str) -> PurchaseResult<Option<PurchaseDocument>> {
        self.storage.get_document(document_id).await
    }

    /// Get a document by ID, returning an error if not found
    pub async fn get_document_required(&self, document_id: &str) -> PurchaseResult<PurchaseDocument> {
        self.storage
            .get_document(document_id)
            .await?
            .ok_or_else(|| PurchaseError::DocumentNotFound(document_id.to_string()))
    }

    /// List documents, optionally filtered by kind and status
    pub async fn list_documents(
        &self,
        kind: Option<DocumentKind>,
        status: Option<DocumentStatus>,
    ) -> PurchaseResult<Vec<PurchaseDocument>> {
        self.storage.list_documents(kind, status).await
    }

    /// Replace the lines and adjustments of a draft
    pub async fn update_draft(
        &mut self,
        document_id: &str,
        line_items: Vec<LineItem>,
        adjustments: DocumentAdjustments,
    ) -> PurchaseResult<PurchaseDocument> {
        self.mutate(document_id, |document, calculator| {
            document.set_adjustments(adjustments, calculator)?;
            document.set_line_items(line_items, calculator)
        })
        .await
    }

    /// Finalize a purchase or purchase order
    pub async fn finalize(&mut self, document_id: &str) -> PurchaseResult<PurchaseDocument> {
        self.mutate(document_id, |document, calculator| {
            document.finalize(calculator)
        })
        .await
    }

    /// Cancel a document with a reason
    pub async fn cancel(
        &mut self,
        document_id: &str,
        reason: &str,
    ) -> PurchaseResult<PurchaseDocument> {
        self.mutate(document_id, |document, _| document.cancel(reason))
            .await
    }

    /// Record a payment against a document
    pub async fn record_payment(
        &mut self,
        document_id: &str,
        amount: BigDecimal,
    ) -> PurchaseResult<PurchaseDocument> {
        self.mutate(document_id, |document, calculator| {
            document.record_payment(amount, calculator)
        })
        .await
    }

    /// Record a goods receipt against a purchase order
    pub async fn receive_goods(
        &mut self,
        document_id: &str,
        receipt: &[GoodsReceiptLine],
    ) -> PurchaseResult<PurchaseDocument> {
        self.mutate(document_id, |document, _| {
            document.receive_goods(receipt).map(|_| ())
        })
        .await
    }

    /// Submit a purchase return for approval
    pub async fn submit_return(
        &mut self,
        document_id: &str,
        approvers: Vec<String>,
    ) -> PurchaseResult<PurchaseDocument> {
        self.mutate(document_id, |document, calculator| {
            document.submit_for_approval(approvers, calculator)
        })
        .await
    }

    /// Approve the current level of a purchase return
    pub async fn approve_return(
        &mut self,
        document_id: &str,
        approver: &str,
        comments: Option<String>,
    ) -> PurchaseResult<(PurchaseDocument, ApprovalProgress)> {
        let mut progress = None;
        let document = self
            .mutate(document_id, |document, _| {
                progress = Some(document.approve(approver, comments)?);
                Ok(())
            })
            .await?;

        let progress = progress.ok_or_else(|| {
            PurchaseError::Calculation("approval did not report progress".to_string())
        })?;
        Ok((document, progress))
    }

    /// Reject a purchase return at its current level
    pub async fn reject_return(
        &mut self,
        document_id: &str,
        approver: &str,
        comments: Option<String>,
    ) -> PurchaseResult<PurchaseDocument> {
        self.mutate(document_id, |document, _| document.reject(approver, comments))
            .await
    }

    /// Complete an approved purchase return
    pub async fn complete_return(&mut self, document_id: &str) -> PurchaseResult<PurchaseDocument> {
        self.mutate(document_id, |document, _| document.complete())
            .await
    }

    /// Delete a document that is still a draft
    pub async fn delete_draft(&mut self, document_id: &str) -> PurchaseResult<()> {
        let document = self.get_document_required(document_id).await?;
        document.ensure_status(&[DocumentStatus::Draft], "delete")?;

        self.storage.delete_document(document_id).await?;
        tracing::info!(id = document_id, "draft deleted");
        Ok(())
    }

    /// Load, apply `change` and persist. Nothing is stored if `change` fails.
    async fn mutate<F>(&mut self, document_id: &str, change: F) -> PurchaseResult<PurchaseDocument>
    where
        F: FnOnce(&mut PurchaseDocument, &PurchaseCalculator) -> PurchaseResult<()>,
    {
        let mut document = self.get_document_required(document_id).await?;
        change(&mut document, &self.calculator)?;
        self.storage.update_document(&document).await?;
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::memory_storage::MemoryStorage;
    use chrono::NaiveDate;

    fn params() -> DocumentParams {
        DocumentParams::new(
            DocumentKind::Purchase,
            "BILL-7".to_string(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            SupplierRef::new("sup-1".to_string(), "Acme Traders".to_string())
                .with_state("29".to_string()),
        )
        .business_gstin("27AAPFU0939F1ZV".to_string())
        .line_item(LineItem::new(
            Some("sku-1".to_string()),
            "Steel rod".to_string(),
            BigDecimal::from(10),
            BigDecimal::from(100),
            BigDecimal::from(18),
        ))
    }

    #[tokio::test]
    async fn test_book_basic_operations() {
        let mut book = PurchaseBook::new(MemoryStorage::new());

        let draft = book.create_draft(params()).await.unwrap();
        assert_eq!(draft.totals.aggregates.total_igst, BigDecimal::from(180));
        assert_eq!(draft.totals.total_amount, BigDecimal::from(1180));

        let finalized = book.finalize(&draft.id).await.unwrap();
        assert_eq!(finalized.status, DocumentStatus::Finalized);

        let paid = book
            .record_payment(&draft.id, BigDecimal::from(1000))
            .await
            .unwrap();
        assert_eq!(paid.totals.outstanding_amount, BigDecimal::from(180));

        let stored = book.get_document_required(&draft.id).await.unwrap();
        assert_eq!(stored, paid);
    }

    #[tokio::test]
    async fn test_failed_change_is_not_persisted() {
        let mut book = PurchaseBook::new(MemoryStorage::new());
        let draft = book.create_draft(params()).await.unwrap();

        let result = book.cancel(&draft.id, "").await;
        assert!(result.is_err());

        let stored = book.get_document_required(&draft.id).await.unwrap();
        assert_eq!(stored.status, DocumentStatus::Draft);
    }

    #[tokio::test]
    async fn test_missing_document() {
        let mut book = PurchaseBook::new(MemoryStorage::new());
        let result = book.finalize("nope").await;
        assert!(matches!(result, Err(PurchaseError::DocumentNotFound(_))));
    }

    #[tokio::test]
    async fn test_only_drafts_can_be_deleted() {
        let mut book = PurchaseBook::new(MemoryStorage::new());
        let draft = book.create_draft(params()).await.unwrap();
        book.finalize(&draft.id).await.unwrap();

        assert!(book.delete_draft(&draft.id).await.is_err());

        let other = book.create_draft(params()).await.unwrap();
        book.delete_draft(&other.id).await.unwrap();
        assert!(book.get_document(&other.id).await.unwrap().is_none());
    }
}
