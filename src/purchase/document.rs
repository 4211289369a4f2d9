//! Purchase document construction and lifecycle

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::money;
use crate::purchase::totals::{DocumentTotals, PurchaseCalculator};
use crate::types::*;
use crate::utils::validation::{validate_gstin, validate_reason};

/// Parameters for creating a draft document
#[derive(Debug, Clone)]
pub struct DocumentParams {
    pub kind: DocumentKind,
    pub number: String,
    pub date: NaiveDate,
    pub supplier: SupplierRef,
    pub business_gstin: Option<String>,
    pub line_items: Vec<LineItem>,
    pub adjustments: DocumentAdjustments,
    pub paid_amount: BigDecimal,
}

impl DocumentParams {
    /// Parameters for an empty document with no lines or adjustments
    pub fn new(kind: DocumentKind, number: String, date: NaiveDate, supplier: SupplierRef) -> Self {
        Self {
            kind,
            number,
            date,
            supplier,
            business_gstin: None,
            line_items: Vec::new(),
            adjustments: DocumentAdjustments::default(),
            paid_amount: money::zero(),
        }
    }

    pub fn business_gstin(mut self, gstin: String) -> Self {
        self.business_gstin = Some(gstin);
        self
    }

    pub fn line_item(mut self, item: LineItem) -> Self {
        self.line_items.push(item);
        self
    }

    pub fn adjustments(mut self, adjustments: DocumentAdjustments) -> Self {
        self.adjustments = adjustments;
        self
    }

    pub fn paid_amount(mut self, paid_amount: BigDecimal) -> Self {
        self.paid_amount = paid_amount;
        self
    }
}

/// Quantity received against one line of a purchase order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoodsReceiptLine {
    pub line_index: usize,
    pub quantity: BigDecimal,
}

impl PurchaseDocument {
    /// Create a new draft with computed totals
    pub fn draft(params: DocumentParams, calculator: &PurchaseCalculator) -> PurchaseResult<Self> {
        let now = chrono::Utc::now().naive_utc();
        let mut document = Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind: params.kind,
            number: params.number,
            date: params.date,
            supplier: params.supplier,
            business_gstin: params.business_gstin,
            line_items: params.line_items,
            adjustments: params.adjustments,
            paid_amount: params.paid_amount,
            status: DocumentStatus::Draft,
            totals: DocumentTotals::default(),
            cancellation_reason: None,
            approval: None,
            created_at: now,
            updated_at: now,
        };

        let gstins = [
            document.business_gstin.as_deref(),
            document.supplier.gstin.as_deref(),
        ];
        for gstin in gstins.into_iter().flatten() {
            if !gstin.trim().is_empty() {
                validate_gstin(gstin)?;
            }
        }

        if document.paid_amount < money::zero() {
            return Err(PurchaseError::Validation(
                "Paid amount cannot be negative".to_string(),
            ));
        }

        document.recalculate(calculator)?;
        Ok(document)
    }

    /// Recompute totals from the current lines and adjustments
    pub fn recalculate(&mut self, calculator: &PurchaseCalculator) -> PurchaseResult<()> {
        self.totals = calculator.calculate(self)?;
        self.updated_at = chrono::Utc::now().naive_utc();
        Ok(())
    }

    /// Lines and adjustments can only change while the document is a draft
    pub fn is_editable(&self) -> bool {
        self.status == DocumentStatus::Draft
    }

    /// Lines with a selected inventory item
    pub fn selected_lines(&self) -> impl Iterator<Item = &LineItem> {
        self.line_items.iter().filter(|item| item.is_selected())
    }

    /// Replace the line items of a draft
    pub fn set_line_items(
        &mut self,
        line_items: Vec<LineItem>,
        calculator: &PurchaseCalculator,
    ) -> PurchaseResult<()> {
        self.ensure_status(&[DocumentStatus::Draft], "edit lines of")?;

        let previous = std::mem::replace(&mut self.line_items, line_items);
        if let Err(err) = self.recalculate(calculator) {
            self.line_items = previous;
            return Err(err);
        }
        Ok(())
    }

    /// Replace the document-level adjustments of a draft
    pub fn set_adjustments(
        &mut self,
        adjustments: DocumentAdjustments,
        calculator: &PurchaseCalculator,
    ) -> PurchaseResult<()> {
        self.ensure_status(&[DocumentStatus::Draft], "edit adjustments of")?;

        let previous = std::mem::replace(&mut self.adjustments, adjustments);
        if let Err(err) = self.recalculate(calculator) {
            self.adjustments = previous;
            return Err(err);
        }
        Ok(())
    }

    /// Lock a purchase or purchase order. Returns go through approval instead.
    pub fn finalize(&mut self, calculator: &PurchaseCalculator) -> PurchaseResult<()> {
        if self.kind.requires_approval() {
            return Err(PurchaseError::Validation(
                "Purchase returns are approved, not finalized".to_string(),
            ));
        }
        self.ensure_status(&[DocumentStatus::Draft], "finalize")?;
        self.ensure_has_lines()?;

        self.recalculate(calculator)?;
        self.set_status(DocumentStatus::Finalized);
        Ok(())
    }

    /// Cancel the document with a reason
    pub fn cancel(&mut self, reason: &str) -> PurchaseResult<()> {
        let allowed: &[DocumentStatus] = if self.kind.requires_approval() {
            &[
                DocumentStatus::Draft,
                DocumentStatus::Approved,
                DocumentStatus::Completed,
            ]
        } else {
            &[DocumentStatus::Draft, DocumentStatus::Finalized]
        };
        self.ensure_status(allowed, "cancel")?;

        validate_reason(reason)?;

        self.cancellation_reason = Some(reason.trim().to_string());
        self.set_status(DocumentStatus::Cancelled);
        Ok(())
    }

    /// Record a payment to (or refund from) the supplier
    pub fn record_payment(
        &mut self,
        amount: BigDecimal,
        calculator: &PurchaseCalculator,
    ) -> PurchaseResult<()> {
        if !self.status.accepts_payment() {
            return Err(PurchaseError::transition(self.status, "record a payment on"));
        }
        if amount <= money::zero() {
            return Err(PurchaseError::Validation(
                "Payment amount must be positive".to_string(),
            ));
        }

        let previous = self.paid_amount.clone();
        self.paid_amount += amount;
        if let Err(err) = self.recalculate(calculator) {
            self.paid_amount = previous;
            return Err(err);
        }

        tracing::info!(
            document = self.number.as_str(),
            paid = %self.paid_amount,
            outstanding = %self.totals.outstanding_amount,
            "payment recorded"
        );
        Ok(())
    }

    /// Record a goods receipt against a finalized purchase order.
    ///
    /// Returns `true` when the order has been fully received, which completes it.
    pub fn receive_goods(&mut self, receipt: &[GoodsReceiptLine]) -> PurchaseResult<bool> {
        if self.kind != DocumentKind::PurchaseOrder {
            return Err(PurchaseError::Validation(
                "Goods can only be received against purchase orders".to_string(),
            ));
        }
        self.ensure_status(&[DocumentStatus::Finalized], "receive goods on")?;
        if receipt.is_empty() {
            return Err(PurchaseError::Validation(
                "Goods receipt has no lines".to_string(),
            ));
        }

        // Check every line before applying any of them
        let mut pending: Vec<BigDecimal> = self
            .line_items
            .iter()
            .map(LineItem::pending_quantity)
            .collect();
        for line in receipt {
            let item = self.line_items.get(line.line_index).ok_or_else(|| {
                PurchaseError::Validation(format!("No line at index {}", line.line_index))
            })?;
            if !item.is_selected() {
                return Err(PurchaseError::Validation(format!(
                    "Line {} has no item selected",
                    line.line_index
                )));
            }
            if line.quantity <= money::zero() {
                return Err(PurchaseError::Validation(
                    "Received quantity must be positive".to_string(),
                ));
            }
            let remaining = &mut pending[line.line_index];
            if line.quantity > *remaining {
                return Err(PurchaseError::Validation(format!(
                    "Received quantity {} exceeds pending quantity {} for '{}'",
                    line.quantity, remaining, item.description
                )));
            }
            *remaining -= &line.quantity;
        }

        for line in receipt {
            self.line_items[line.line_index].received_quantity += &line.quantity;
        }
        self.updated_at = chrono::Utc::now().naive_utc();

        let complete = self.is_fully_received();
        tracing::info!(
            document = self.number.as_str(),
            lines = receipt.len(),
            complete,
            "goods receipt recorded"
        );
        if complete {
            self.set_status(DocumentStatus::Completed);
        }
        Ok(complete)
    }

    /// Every selected line has been received in full
    pub fn is_fully_received(&self) -> bool {
        self.selected_lines()
            .all(|item| item.received_quantity >= item.quantity)
    }

    pub(crate) fn ensure_status(
        &self,
        allowed: &[DocumentStatus],
        action: &str,
    ) -> PurchaseResult<()> {
        if allowed.contains(&self.status) {
            Ok(())
        } else {
            Err(PurchaseError::transition(self.status, action))
        }
    }

    pub(crate) fn ensure_has_lines(&self) -> PurchaseResult<()> {
        if self.selected_lines().next().is_none() {
            return Err(PurchaseError::Validation(format!(
                "{} {} has no line items",
                self.kind, self.number
            )));
        }
        Ok(())
    }

    pub(crate) fn set_status(&mut self, status: DocumentStatus) {
        tracing::info!(
            document = self.number.as_str(),
            kind = %self.kind,
            from = %self.status,
            to = %status,
            "document status changed"
        );
        self.status = status;
        self.updated_at = chrono::Utc::now().naive_utc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order_with_lines() -> PurchaseDocument {
        let params = DocumentParams::new(
            DocumentKind::PurchaseOrder,
            "PO-001".to_string(),
            NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            SupplierRef::new("sup-1".to_string(), "Acme Traders".to_string()),
        )
        .line_item(LineItem::new(
            Some("bolt".to_string()),
            "Bolt".to_string(),
            BigDecimal::from(10),
            BigDecimal::from(5),
            BigDecimal::from(18),
        ))
        .line_item(LineItem::new(
            Some("nut".to_string()),
            "Nut".to_string(),
            BigDecimal::from(4),
            BigDecimal::from(2),
            BigDecimal::from(18),
        ));

        PurchaseDocument::draft(params, &PurchaseCalculator::default()).unwrap()
    }

    #[test]
    fn test_draft_has_totals() {
        let order = order_with_lines();
        assert_eq!(order.status, DocumentStatus::Draft);
        assert_eq!(order.totals.aggregates.subtotal, BigDecimal::from(58));
        // 58 + 10.44 tax = 68.44
        assert_eq!(order.totals.total_amount, BigDecimal::from(68));
    }

    #[test]
    fn test_finalize_locks_lines() {
        let calculator = PurchaseCalculator::default();
        let mut order = order_with_lines();
        order.finalize(&calculator).unwrap();

        assert_eq!(order.status, DocumentStatus::Finalized);
        let result = order.set_line_items(Vec::new(), &calculator);
        assert!(matches!(
            result,
            Err(PurchaseError::InvalidTransition {
                from: DocumentStatus::Finalized,
                ..
            })
        ));
    }

    #[test]
    fn test_finalize_requires_lines() {
        let calculator = PurchaseCalculator::default();
        let mut order = order_with_lines();
        order.set_line_items(Vec::new(), &calculator).unwrap();

        assert!(matches!(
            order.finalize(&calculator),
            Err(PurchaseError::Validation(_))
        ));
    }

    #[test]
    fn test_invalid_edit_keeps_previous_lines() {
        let calculator = PurchaseCalculator::default();
        let mut order = order_with_lines();
        let bad = LineItem::new(
            Some("bolt".to_string()),
            "Bolt".to_string(),
            BigDecimal::from(0),
            BigDecimal::from(5),
            BigDecimal::from(18),
        );

        assert!(order.set_line_items(vec![bad], &calculator).is_err());
        assert_eq!(order.line_items.len(), 2);
    }

    #[test]
    fn test_cancel_requires_reason() {
        let mut order = order_with_lines();
        assert!(matches!(
            order.cancel("   "),
            Err(PurchaseError::Validation(_))
        ));
        order.cancel("Supplier out of stock").unwrap();
        assert_eq!(order.status, DocumentStatus::Cancelled);
        assert_eq!(
            order.cancellation_reason.as_deref(),
            Some("Supplier out of stock")
        );
        assert!(order.cancel("again").is_err());
    }

    #[test]
    fn test_payment_updates_outstanding() {
        let calculator = PurchaseCalculator::default();
        let mut order = order_with_lines();

        assert!(order
            .record_payment(BigDecimal::from(10), &calculator)
            .is_err());

        order.finalize(&calculator).unwrap();
        order
            .record_payment(BigDecimal::from(60), &calculator)
            .unwrap();
        assert_eq!(order.totals.outstanding_amount, BigDecimal::from(8));

        assert!(order
            .record_payment(BigDecimal::from(0), &calculator)
            .is_err());
    }

    #[test]
    fn test_partial_and_full_goods_receipt() {
        let calculator = PurchaseCalculator::default();
        let mut order = order_with_lines();
        order.finalize(&calculator).unwrap();

        let partial = order
            .receive_goods(&[GoodsReceiptLine {
                line_index: 0,
                quantity: BigDecimal::from(6),
            }])
            .unwrap();
        assert!(!partial);
        assert_eq!(order.status, DocumentStatus::Finalized);

        let over = order.receive_goods(&[GoodsReceiptLine {
            line_index: 0,
            quantity: BigDecimal::from(5),
        }]);
        assert!(over.is_err());
        assert_eq!(order.line_items[0].received_quantity, BigDecimal::from(6));

        let complete = order
            .receive_goods(&[
                GoodsReceiptLine {
                    line_index: 0,
                    quantity: BigDecimal::from(4),
                },
                GoodsReceiptLine {
                    line_index: 1,
                    quantity: BigDecimal::from(4),
                },
            ])
            .unwrap();
        assert!(complete);
        assert_eq!(order.status, DocumentStatus::Completed);
    }

    #[test]
    fn test_receipt_only_on_orders() {
        let calculator = PurchaseCalculator::default();
        let mut purchase = order_with_lines();
        purchase.kind = DocumentKind::Purchase;
        purchase.finalize(&calculator).unwrap();

        let result = purchase.receive_goods(&[GoodsReceiptLine {
            line_index: 0,
            quantity: BigDecimal::from(1),
        }]);
        assert!(matches!(result, Err(PurchaseError::Validation(_))));
    }

    #[test]
    fn test_failed_payment_keeps_paid_amount() {
        let calculator = PurchaseCalculator::default();
        let mut order = order_with_lines();
        order.finalize(&calculator).unwrap();
        order
            .record_payment(BigDecimal::from(20), &calculator)
            .unwrap();
        let before = order.clone();

        // A line that no longer validates makes recalculation fail
        order.line_items[0].quantity = BigDecimal::from(0);
        let result = order.record_payment(BigDecimal::from(30), &calculator);

        assert!(matches!(result, Err(PurchaseError::Validation(_))));
        assert_eq!(order.paid_amount, before.paid_amount);
        assert_eq!(order.totals, before.totals);
    }
}
