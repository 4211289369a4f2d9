//! Line item aggregation into document subtotals and GST totals

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::settings::NegativeAmountPolicy;
use crate::tax::gst::TaxSplit;
use crate::tax::line::compute_line_total;
use crate::types::{LineItem, PurchaseResult};

/// Sums over all selected line items of a document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregates {
    /// Quantity x rate before discounts
    pub subtotal: BigDecimal,
    /// Line discounts as flat amounts
    pub item_discount: BigDecimal,
    #[serde(rename = "totalCGST")]
    pub total_cgst: BigDecimal,
    #[serde(rename = "totalSGST")]
    pub total_sgst: BigDecimal,
    #[serde(rename = "totalIGST")]
    pub total_igst: BigDecimal,
}

impl Aggregates {
    /// CGST + SGST + IGST
    pub fn total_tax(&self) -> BigDecimal {
        &self.total_cgst + &self.total_sgst + &self.total_igst
    }

    /// Subtotal less line discounts
    pub fn taxable_value(&self) -> BigDecimal {
        &self.subtotal - &self.item_discount
    }

    fn add_split(&mut self, split: &TaxSplit) {
        self.total_cgst += &split.cgst;
        self.total_sgst += &split.sgst;
        self.total_igst += &split.igst;
    }
}

/// Aggregate line items. Lines without a selected inventory item are skipped.
pub fn aggregate(
    items: &[LineItem],
    is_inter_state: bool,
    policy: NegativeAmountPolicy,
) -> PurchaseResult<Aggregates> {
    let mut aggregates = Aggregates::default();

    for item in items.iter().filter(|item| item.is_selected()) {
        let line = compute_line_total(item, policy)?;
        aggregates.subtotal += &line.base_amount;
        aggregates.item_discount += &line.discount_amount;
        aggregates.add_split(&TaxSplit::of(&line.tax_amount, is_inter_state));
    }

    tracing::debug!(
        lines = items.len(),
        is_inter_state,
        subtotal = %aggregates.subtotal,
        total_tax = %aggregates.total_tax(),
        "aggregated line items"
    );

    Ok(aggregates)
}
