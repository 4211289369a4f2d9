//! Document total assembly and the purchase calculator

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::money;
use crate::purchase::aggregator::{aggregate, Aggregates};
use crate::settings::CalculatorConfig;
use crate::tax::line::{compute_line_breakdown, LineTaxBreakdown};
use crate::tax::state::is_inter_state;
use crate::traits::{DefaultLineItemValidator, LineItemValidator};
use crate::types::{DocumentAdjustments, DocumentKind, LineItem, PurchaseDocument, PurchaseResult};

/// Final totals of a purchase document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentTotals {
    #[serde(flatten)]
    pub aggregates: Aggregates,
    /// Exact amount before rounding to whole currency units
    pub before_round_off: BigDecimal,
    /// `total_amount - before_round_off`, signed
    pub round_off: BigDecimal,
    pub total_amount: BigDecimal,
    pub outstanding_amount: BigDecimal,
}

/// Combine aggregates with document adjustments, round the payable amount and
/// derive the outstanding balance.
///
/// Tax is added after the bill discount and charges, never recomputed on
/// them. TDS is only deducted for purchase orders.
pub fn assemble_total(
    kind: DocumentKind,
    aggregates: Aggregates,
    adjustments: &DocumentAdjustments,
    paid_amount: &BigDecimal,
    clamp_outstanding: bool,
) -> DocumentTotals {
    let mut before_round_off = aggregates.taxable_value() - &adjustments.bill_discount
        + adjustments.total_charges()
        + aggregates.total_tax();

    if kind.applies_tds() {
        before_round_off -= &adjustments.tds_amount;
    } else if adjustments.tds_amount != money::zero() {
        tracing::debug!(%kind, tds = %adjustments.tds_amount, "ignoring TDS on non-order document");
    }

    let total_amount = money::round_half_up(&before_round_off);
    let round_off = &total_amount - &before_round_off;

    let mut outstanding_amount = &total_amount - paid_amount;
    if clamp_outstanding {
        outstanding_amount = money::non_negative(outstanding_amount);
    }

    DocumentTotals {
        aggregates,
        before_round_off,
        round_off,
        total_amount,
        outstanding_amount,
    }
}

/// Runs validation, interstate determination, aggregation and assembly
pub struct PurchaseCalculator {
    config: CalculatorConfig,
    validator: Box<dyn LineItemValidator>,
}

impl Default for PurchaseCalculator {
    fn default() -> Self {
        Self::new(CalculatorConfig::default())
    }
}

impl PurchaseCalculator {
    /// Create a calculator with the default line item validator
    pub fn new(config: CalculatorConfig) -> Self {
        Self {
            config,
            validator: Box::new(DefaultLineItemValidator),
        }
    }

    /// Create a calculator with a custom validator
    pub fn with_validator(config: CalculatorConfig, validator: Box<dyn LineItemValidator>) -> Self {
        Self { config, validator }
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    /// Validate and compute a single line with its GST split
    pub fn line_breakdown(
        &self,
        item: &LineItem,
        is_inter_state: bool,
    ) -> PurchaseResult<LineTaxBreakdown> {
        self.validator.validate_line_item(item)?;
        compute_line_breakdown(item, is_inter_state, self.config.negative_taxable)
    }

    /// Compute the totals of a document from its lines and adjustments
    pub fn calculate(&self, document: &PurchaseDocument) -> PurchaseResult<DocumentTotals> {
        for item in &document.line_items {
            self.validator.validate_line_item(item)?;
        }
        self.validator.validate_adjustments(&document.adjustments)?;

        let inter_state = is_inter_state(document.business_gstin.as_deref(), &document.supplier);
        let aggregates = aggregate(
            &document.line_items,
            inter_state,
            self.config.negative_taxable,
        )?;

        let totals = assemble_total(
            document.kind,
            aggregates,
            &document.adjustments,
            &document.paid_amount,
            self.config.clamp_outstanding,
        );

        tracing::debug!(
            document = document.number.as_str(),
            kind = %document.kind,
            total = %totals.total_amount,
            round_off = %totals.round_off,
            outstanding = %totals.outstanding_amount,
            "calculated document totals"
        );

        Ok(totals)
    }
}
